//! Document model for the TAP format
//!
//! A TAP document is an ordered list of entries (testcases and bailouts)
//! plus metadata: version, header comment, the plan and a document-wide
//! skip flag. Entries keep their insertion order regardless of declared
//! numbers; number resolution lives in the validator module.

pub mod bailout;
pub mod directive;
pub mod document;
pub mod entry;
pub mod numbering;
pub mod testcase;

pub use bailout::Bailout;
pub use directive::{parse_directives, Directive, DirectiveKind};
pub use document::Document;
pub use entry::Entry;
pub use numbering::Numbering;
pub use testcase::{DataItem, Outcome, TestResult};

/// Indent every non-empty line of `text` by `width` spaces.
pub(crate) fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    let mut out = String::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
    }
    out
}
