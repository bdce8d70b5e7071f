//! Line tokenizer for the TAP format
//!
//! TAP is strictly line-oriented, so tokenization works on physical lines:
//! each line is classified into exactly one token by matching it against
//! the recognized line grammars in priority order (version, plan,
//! testcase, bailout). A line that matches none of them but *looks* like
//! one of them becomes a warning token so the parser can apply the
//! lenient/strict policy uniformly; everything else is carried verbatim
//! as a data line. The tokenizer is pure and stateless per line and never
//! fails.

use crate::tap::ast::{parse_directives, Directive, Outcome};
use once_cell::sync::Lazy;
use regex::Regex;

/// Full-line grammar for a version line like `TAP version 13`.
static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^TAP version (?P<version>\d+)\s*$").unwrap());

/// Full-line grammar for a plan like `1..3 # comment`.
static PLAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<first>\d+)\.\.(?P<last>\d+)\s*(?P<comment>#.*)?$").unwrap()
});

/// Full-line grammar for a testcase like `not ok 2 - desc # SKIP why`.
///
/// The `#` clause only becomes a directive when it is a SKIP/TODO
/// sequence; any other `#` text stays part of the description.
static TESTCASE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<field>(not )?ok)(\s+(?P<number>\d+))?(\s+(?P<description>.*?)(\s+#(?P<directive>(\s+(todo|skip).*?)+?))?)?\s*$",
    )
    .unwrap()
});

/// Grammar for a bailout line like `Bail out! disk full`.
static BAILOUT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Bail out!(?P<comment>.*)$").unwrap());

// Prefixes of lines that resemble a recognized form but failed its grammar.
const VERSION_LOOKALIKE: &str = "tap version";
const PLAN_LOOKALIKE: &str = "1..";
const TESTCASE_LOOKALIKES: [&str; 2] = ["not ok ", "ok "];

/// One classified physical line of a TAP document.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `TAP version <n>`
    VersionLine(u64),
    /// `<first>..<last>` with an optional `#`-introduced comment
    /// (comment markers already stripped).
    Plan {
        first: u64,
        last: u64,
        comment: String,
    },
    /// `ok` / `not ok` with optional number, description and directives.
    Testcase {
        outcome: Outcome,
        number: Option<u64>,
        description: String,
        directives: Vec<Directive>,
    },
    /// `Bail out! <reason>`
    Bailout(String),
    /// Any unrecognized line, carried verbatim. Comment markers are not
    /// stripped at this layer; attachment happens in the parser.
    Data(String),
    /// A line resembling a version/plan/testcase line that failed its
    /// grammar. Lenient parsing logs it, strict parsing raises.
    Warning(String),
}

/// Strip comment/list markers from a captured fragment: surrounding
/// whitespace plus any leading `#` or `-` characters.
fn strip_marker(text: &str) -> String {
    text.trim()
        .trim_start_matches(['#', '-'])
        .trim()
        .to_string()
}

fn lookalike(line: &str, form: &str) -> Token {
    Token::Warning(format!(
        "Line \"{}\" looks like a {}, but does not match syntax",
        line.trim(),
        form
    ))
}

/// Classify one physical line (no trailing newline) into a token.
pub fn tokenize_line(line: &str) -> Token {
    if let Some(caps) = VERSION_REGEX.captures(line) {
        if let Ok(version) = caps["version"].parse::<u64>() {
            return Token::VersionLine(version);
        }
        return lookalike(line, "version line");
    }

    if let Some(caps) = PLAN_REGEX.captures(line) {
        match (caps["first"].parse::<u64>(), caps["last"].parse::<u64>()) {
            (Ok(first), Ok(last)) => {
                let comment = caps
                    .name("comment")
                    .map(|m| strip_marker(m.as_str()))
                    .unwrap_or_default();
                return Token::Plan {
                    first,
                    last,
                    comment,
                };
            }
            _ => return lookalike(line, "plan"),
        }
    }

    if let Some(caps) = TESTCASE_REGEX.captures(line) {
        let outcome = if caps["field"].eq_ignore_ascii_case("ok") {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        let number = match caps.name("number") {
            Some(m) => match m.as_str().parse::<u64>() {
                Ok(n) => Some(n),
                Err(_) => return lookalike(line, "testcase"),
            },
            None => None,
        };
        let description = caps
            .name("description")
            .map(|m| strip_marker(m.as_str()))
            .unwrap_or_default();
        let directives = caps
            .name("directive")
            .map(|m| parse_directives(m.as_str()))
            .unwrap_or_default();
        return Token::Testcase {
            outcome,
            number,
            description,
            directives,
        };
    }

    if let Some(caps) = BAILOUT_REGEX.captures(line) {
        return Token::Bailout(caps["comment"].trim().to_string());
    }

    let sline = line.trim().to_lowercase();
    if sline.starts_with(VERSION_LOOKALIKE) {
        lookalike(line, "version line")
    } else if sline.starts_with(PLAN_LOOKALIKE) {
        lookalike(line, "plan")
    } else if TESTCASE_LOOKALIKES.iter().any(|p| sline.starts_with(p)) {
        lookalike(line, "testcase")
    } else {
        Token::Data(line.to_string())
    }
}

/// Tokenize a whole TAP source, one token per physical line, in order.
pub fn tokenize(source: &str) -> Vec<Token> {
    source.lines().map(tokenize_line).collect()
}
