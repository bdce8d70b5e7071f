//! # tap
//!
//! A parser, validator and serializer for the TAP (Test Anything Protocol)
//! format: line-oriented test results as emitted by test runners and
//! consumed by CI harnesses.
//!
//! The pipeline is split the same way as the format itself:
//! 1. [`tap::lexer`] classifies each physical line into a token
//! 2. [`tap::parser`] assembles tokens into a [`Document`]
//! 3. [`tap::validator`] resolves testcase numbers and decides pass/fail
//!
//! ```text
//! TAP version 13
//! 1..2
//! ok 1 - first check
//! not ok 2 - second check
//! ```

pub mod tap;

pub use tap::ast::{
    Bailout, DataItem, Directive, DirectiveKind, Document, Entry, Numbering, Outcome, TestResult,
};
pub use tap::builder::DocumentBuilder;
pub use tap::error::TapError;
pub use tap::merge::merge;
pub use tap::parser::{parse_string, Mode, Parser};
pub use tap::validator::{enumerate, validate};
