//! SKIP/TODO directives attached to one testcase
//!
//! A directive clause like `# SKIP no network TODO later` is an ordered
//! sequence of tagged segments. Directives are kept as an explicit list in
//! parse order so serialization reproduces them faithfully.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two directive categories TAP knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectiveKind {
    Skip,
    Todo,
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveKind::Skip => write!(f, "SKIP"),
            DirectiveKind::Todo => write!(f, "TODO"),
        }
    }
}

/// One tagged directive segment with its free-text reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub reason: String,
}

impl Directive {
    pub fn skip(reason: impl Into<String>) -> Self {
        Self {
            kind: DirectiveKind::Skip,
            reason: reason.into(),
        }
    }

    pub fn todo(reason: impl Into<String>) -> Self {
        Self {
            kind: DirectiveKind::Todo,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} {}", self.kind, self.reason)
        }
    }
}

/// Parse a directive clause into its ordered SKIP/TODO segments.
///
/// The keywords are matched case-insensitively anywhere in the clause;
/// each occurrence starts a new segment and owns the text up to the next
/// keyword. Text before the first keyword is discarded (the tokenizer
/// only hands over clauses that start with a keyword).
pub fn parse_directives(clause: &str) -> Vec<Directive> {
    let text = clause.trim().trim_start_matches(['#']).trim_start();
    let bytes = text.as_bytes();

    let mut marks: Vec<(usize, DirectiveKind)> = Vec::new();
    let mut i = 0;
    while i + 4 <= bytes.len() {
        if bytes[i..i + 4].eq_ignore_ascii_case(b"skip") {
            marks.push((i, DirectiveKind::Skip));
            i += 4;
        } else if bytes[i..i + 4].eq_ignore_ascii_case(b"todo") {
            marks.push((i, DirectiveKind::Todo));
            i += 4;
        } else {
            i += 1;
        }
    }

    let mut directives = Vec::with_capacity(marks.len());
    for (idx, (start, kind)) in marks.iter().enumerate() {
        let reason_start = start + 4;
        let reason_end = marks.get(idx + 1).map_or(text.len(), |(next, _)| *next);
        directives.push(Directive {
            kind: *kind,
            reason: text[reason_start..reason_end].trim().to_string(),
        });
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_skip() {
        let parsed = parse_directives("SKIP no network");
        assert_eq!(parsed, vec![Directive::skip("no network")]);
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let parsed = parse_directives("sKiP why");
        assert_eq!(parsed[0].kind, DirectiveKind::Skip);
        assert_eq!(parsed[0].reason, "why");
    }

    #[test]
    fn test_order_preserved_across_kinds() {
        let parsed = parse_directives("TODO fix later SKIP flaky");
        assert_eq!(
            parsed,
            vec![Directive::todo("fix later"), Directive::skip("flaky")]
        );
    }

    #[test]
    fn test_empty_reason() {
        let parsed = parse_directives("# SKIP");
        assert_eq!(parsed, vec![Directive::skip("")]);
        assert_eq!(parsed[0].to_string(), "SKIP");
    }

    #[test]
    fn test_display_round_trip() {
        let parsed = parse_directives("SKIP a TODO b");
        let rendered = parsed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rendered, "SKIP a TODO b");
    }
}
