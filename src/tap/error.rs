//! Error types for TAP document handling
//!
//! The taxonomy mirrors the three ways a TAP document can go wrong:
//! structural violations while parsing, a missing plan when length or
//! validity is requested, and plan/numbering mismatches discovered during
//! enumeration. The tokenizer itself never raises; anomalies become data
//! or warning tokens for the parser to judge.

use std::fmt;

/// Errors raised while parsing, enumerating or validating TAP documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapError {
    /// A structural violation in the document text: version line not
    /// first, plan declared twice, an unrecognized lookalike line in
    /// strict mode, or a malformed structured data block.
    ParseError(String),
    /// Length, enumeration or validity was requested but the document
    /// never declared a plan.
    MissingPlan(String),
    /// The plan range and the testcase numbers cannot be reconciled.
    InvalidNumbering(String),
}

impl fmt::Display for TapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            TapError::MissingPlan(msg) => write!(f, "Missing plan: {}", msg),
            TapError::InvalidNumbering(msg) => write!(f, "Invalid numbering: {}", msg),
        }
    }
}

impl std::error::Error for TapError {}

/// Clip `text` to its first 20 characters for use in error messages.
pub(crate) fn excerpt(text: &str) -> String {
    let mut out: String = text.chars().take(20).collect();
    if out.len() < text.len() {
        out.push_str(" ...");
    }
    out
}
