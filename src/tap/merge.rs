//! Merging TAP documents
//!
//! [`merge`] combines several documents into one, renumbering the
//! testcases of every document after the first so the combined sequence
//! stays collision-free. The first document's lines are kept untouched;
//! each later document has its numbers resolved leniently and shifted
//! past the highest number seen so far.

use crate::tap::ast::{Document, Entry};
use crate::tap::parser::Mode;
use crate::tap::validator;

/// Merge documents into one combined document.
///
/// The result takes the maximum version, the concatenated header
/// comments, and a plan spanning the merged number range (`1..0` when no
/// testcase survives). The plan renders at the beginning only if it did
/// in every input. Only the first bailout across all inputs is kept.
/// Inputs skipped with a reason make the merged document skipped, the
/// reasons joined by `"; "`.
pub fn merge(docs: &[Document]) -> Document {
    let mut merged = Document::new();

    let version = docs
        .iter()
        .map(Document::version)
        .max()
        .unwrap_or(Document::DEFAULT_VERSION);
    merged.set_version(version);
    if docs.iter().any(Document::version_written) {
        merged.add_version_line(version);
    }

    for doc in docs {
        for line in doc.header().lines() {
            merged.add_header_line(line);
        }
    }

    let mut offset = 0u64;
    let mut min_seen = u64::MAX;
    let mut max_seen = 0u64;
    let mut bailout_taken = false;

    for (index, doc) in docs.iter().enumerate() {
        let first = doc.numbering().map(|n| n.first()).unwrap_or(1);
        // lenient resolution never fails
        let resolved =
            validator::enumerate(&doc.testcase_numbers(), first, Mode::Lenient)
                .unwrap_or_default();

        let mut position = 0;
        for entry in doc.entries() {
            match entry {
                Entry::Testcase(tc) => {
                    let number = resolved[position].saturating_add(offset);
                    position += 1;
                    let mut tc = tc.clone();
                    if index > 0 {
                        tc.number = Some(number);
                    }
                    min_seen = min_seen.min(number);
                    max_seen = max_seen.max(number);
                    merged.add_testcase(tc);
                }
                Entry::Bailout(bo) => {
                    if !bailout_taken {
                        merged.add_bailout(bo.clone());
                        bailout_taken = true;
                    }
                }
            }
        }
        offset = max_seen;
    }

    let (min_seen, max_seen) = if min_seen == u64::MAX {
        (1, 0)
    } else {
        (min_seen, max_seen)
    };
    let at_beginning = docs.iter().all(Document::plan_at_beginning);
    merged.add_plan(min_seen, max_seen, "", at_beginning);

    let reasons: Vec<&str> = docs
        .iter()
        .filter(|d| d.skip())
        .map(|d| d.skip_reason())
        .filter(|r| !r.is_empty())
        .collect();
    if !reasons.is_empty() {
        merged.set_skip(reasons.join("; "));
    }

    merged
}
