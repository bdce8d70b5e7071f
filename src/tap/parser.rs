//! Structural parser for TAP documents
//!
//! The parser consumes the token stream line by line and assembles a
//! [`Document`]. Structure violations (a version line that is not the
//! first line, a second plan) are always errors. Recoverable oddities
//! (lookalike lines, a decreasing plan range) follow the parsing mode:
//! lenient logs them and carries on, strict turns them into errors.
//!
//! Data lines are cached and flushed when the next structural line
//! arrives: before the first entry they form the header comment, after
//! it they attach to the preceding testcase or bailout. Inside a flushed
//! run, `---` ... `...` fences delimit a YAML block; everything else is
//! kept verbatim as text.

use crate::tap::ast::{Bailout, DataItem, Document, TestResult};
use crate::tap::error::{excerpt, TapError};
use crate::tap::lexer::{tokenize, Token};
use tracing::warn;

/// How to treat recoverable input oddities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Log and continue. Errors surface late, through validation.
    #[default]
    Lenient,
    /// Raise a parse error immediately.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing consumed yet; a version line is still allowed.
    Start,
    /// Version consumed, no content yet.
    Header,
    /// Some content line consumed.
    Body,
}

/// Reusable parser configured with a [`Mode`].
#[derive(Debug, Clone, Default)]
pub struct Parser {
    mode: Mode,
}

impl Parser {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    fn warn(&self, msg: &str) -> Result<(), TapError> {
        match self.mode {
            Mode::Lenient => {
                warn!("{}", msg);
                Ok(())
            }
            Mode::Strict => Err(TapError::ParseError(msg.to_string())),
        }
    }

    /// Parse a complete TAP source into a document.
    pub fn parse(&self, source: &str) -> Result<Document, TapError> {
        let mut doc = Document::new();
        let mut state = State::Start;
        let mut plan_written = false;
        let mut entry_seen = false;
        let mut cache: Vec<String> = Vec::new();

        for token in tokenize(source) {
            match token {
                Token::VersionLine(version) => {
                    if state != State::Start {
                        return Err(TapError::ParseError(
                            "unexpected version line, must only occur as first line"
                                .to_string(),
                        ));
                    }
                    doc.add_version_line(version);
                    state = State::Header;
                }
                Token::Plan {
                    first,
                    last,
                    comment,
                } => {
                    flush(&mut doc, &mut cache)?;
                    if plan_written {
                        return Err(TapError::ParseError(
                            "plan must not occur twice in one document".to_string(),
                        ));
                    }
                    if last < first && !(first == 1 && last == 0) {
                        self.warn(&format!(
                            "plan {}..{} defines a decreasing range",
                            first, last
                        ))?;
                    }
                    // the plan counts as leading until an entry precedes
                    // it; header comments alone do not push it to the end
                    doc.add_plan(first, last, &comment, !entry_seen);
                    plan_written = true;
                    state = State::Body;
                }
                Token::Testcase {
                    outcome,
                    number,
                    description,
                    directives,
                } => {
                    flush(&mut doc, &mut cache)?;
                    let mut tc = TestResult::new(outcome, number, description);
                    tc.directives = directives;
                    doc.add_testcase(tc);
                    entry_seen = true;
                    state = State::Body;
                }
                Token::Bailout(message) => {
                    flush(&mut doc, &mut cache)?;
                    doc.add_bailout(Bailout::new(message));
                    entry_seen = true;
                    state = State::Body;
                }
                Token::Data(line) => {
                    cache.push(line);
                    state = State::Body;
                }
                Token::Warning(msg) => {
                    self.warn(&msg)?;
                    state = State::Body;
                }
            }
        }
        flush(&mut doc, &mut cache)?;

        Ok(doc)
    }
}

/// Hand the cached data lines over to the document: header text before
/// the first entry, attached data afterwards.
fn flush(doc: &mut Document, cache: &mut Vec<String>) -> Result<(), TapError> {
    if cache.is_empty() {
        return Ok(());
    }
    if doc.entries().len() == 0 {
        for line in cache.drain(..) {
            doc.add_header_line(&line);
        }
    } else {
        let items = parse_data(cache)?;
        cache.clear();
        doc.attach_to_last(items);
    }
    Ok(())
}

/// Split a run of data lines into text runs and decoded YAML blocks.
///
/// A line consisting of `---` opens a block, `...` closes it. A `...`
/// outside any block is plain text; a `---` inside one is an error, as
/// is a block still open when the run ends. Both block bodies and text
/// runs are dedented, so the two-space indent added on serialization
/// does not accumulate across parse/serialize cycles.
fn parse_data(lines: &[String]) -> Result<Vec<DataItem>, TapError> {
    let mut items = Vec::new();
    let mut yaml_mode = false;
    let mut yaml_cache: Vec<String> = Vec::new();
    let mut text_cache: Vec<String> = Vec::new();

    for line in lines {
        let trimmed = line.trim();
        if trimmed == "---" {
            if yaml_mode {
                return Err(TapError::ParseError(
                    "unexpected '---' inside structured data block".to_string(),
                ));
            }
            if !text_cache.is_empty() {
                items.push(DataItem::Text(dedent(&text_cache)));
                text_cache.clear();
            }
            yaml_mode = true;
        } else if trimmed == "..." && yaml_mode {
            let body = dedent(&yaml_cache);
            let value = serde_yaml::from_str(&body).map_err(|err| {
                TapError::ParseError(format!(
                    "invalid structured data block \"{}\": {}",
                    excerpt(&body),
                    err
                ))
            })?;
            items.push(DataItem::Yaml(value));
            yaml_cache.clear();
            yaml_mode = false;
        } else if yaml_mode {
            yaml_cache.push(line.clone());
        } else {
            text_cache.push(line.clone());
        }
    }

    if yaml_mode {
        return Err(TapError::ParseError(
            "unterminated structured data block, missing '...'".to_string(),
        ));
    }
    if !text_cache.is_empty() {
        items.push(DataItem::Text(dedent(&text_cache)));
    }
    Ok(items)
}

/// Strip the common leading whitespace of all non-blank lines.
fn dedent(lines: &[String]) -> String {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for line in lines {
        if !line.trim().is_empty() {
            out.push_str(&line[indent..]);
        }
        out.push('\n');
    }
    out
}

/// Parse a TAP source with a one-off parser.
pub fn parse_string(source: &str, mode: Mode) -> Result<Document, TapError> {
    Parser::new(mode).parse(source)
}
