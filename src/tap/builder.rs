//! Procedural document construction
//!
//! `DocumentBuilder` is a caller-owned, chainable way to produce a TAP
//! document without going through the parser. Every builder owns its
//! own document, so several reports can be assembled concurrently.
//!
//! ```
//! use tap::{DocumentBuilder, TapError};
//!
//! fn report() -> Result<(), TapError> {
//!     let doc = DocumentBuilder::new()
//!         .plan(1, 2)?
//!         .ok("parse config")
//!         .not_ok("connect to database")
//!         .comment("connection refused on :5432")
//!         .finish();
//!     print!("{}", doc);
//!     Ok(())
//! }
//! ```

use crate::tap::ast::{Bailout, DataItem, Document, TestResult};
use crate::tap::error::TapError;

/// Chainable builder for [`Document`] values.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    doc: Document,
    plan_written: bool,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the version, rendered as a `TAP version` line.
    pub fn version(mut self, version: u64) -> Self {
        self.doc.add_version_line(version);
        self
    }

    /// Declare the plan `first..last`. At most one plan per document.
    pub fn plan(mut self, first: u64, last: u64) -> Result<Self, TapError> {
        if self.plan_written {
            return Err(TapError::ParseError(
                "plan must not occur twice in one document".to_string(),
            ));
        }
        self.doc.add_plan(first, last, "", true);
        self.plan_written = true;
        Ok(self)
    }

    /// Declare a plan for `tests` testcases numbered from 1.
    pub fn plan_tests(self, tests: u64) -> Result<Self, TapError> {
        self.plan(1, tests)
    }

    /// Record a succeeded testcase.
    pub fn ok(mut self, description: impl Into<String>) -> Self {
        self.doc.add_testcase(TestResult::pass(description));
        self
    }

    /// Record a failed testcase.
    pub fn not_ok(mut self, description: impl Into<String>) -> Self {
        self.doc.add_testcase(TestResult::fail(description));
        self
    }

    /// Flag the most recent testcase as skipped. Without a preceding
    /// testcase this does nothing.
    pub fn skip(mut self, reason: impl Into<String>) -> Self {
        if let Some(tc) = self.doc.last_testcase_mut() {
            tc.skip(reason);
        }
        self
    }

    /// Flag the most recent testcase as todo. Without a preceding
    /// testcase this does nothing.
    pub fn todo(mut self, reason: impl Into<String>) -> Self {
        if let Some(tc) = self.doc.last_testcase_mut() {
            tc.todo(reason);
        }
        self
    }

    /// Add a comment at the current position: attached to the last
    /// entry, or part of the header when no entry exists yet.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if self.doc.entries().len() == 0 {
            self.doc.add_header_line(&text);
        } else {
            let mut line = text;
            line.push('\n');
            self.doc.attach_to_last(vec![DataItem::Text(line)]);
        }
        self
    }

    /// Record a bailout at the current position.
    pub fn bailout(mut self, message: impl Into<String>) -> Self {
        self.doc.add_bailout(Bailout::new(message));
        self
    }

    pub fn finish(self) -> Document {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chained_report() {
        let doc = DocumentBuilder::new()
            .plan(1, 3)
            .unwrap()
            .ok("first")
            .ok("second")
            .not_ok("third")
            .finish();
        assert_eq!(doc.actual_length(), 3);
        assert_eq!(doc.range(), Some((1, 3)));
        assert!(!doc.valid().unwrap());
    }

    #[test]
    fn test_second_plan_is_an_error() {
        let builder = DocumentBuilder::new().plan_tests(2).unwrap();
        assert!(matches!(builder.plan(1, 5), Err(TapError::ParseError(_))));
    }

    #[test]
    fn test_skip_and_todo_flag_last_testcase() {
        let doc = DocumentBuilder::new()
            .plan_tests(2)
            .unwrap()
            .not_ok("needs network")
            .skip("no network in ci")
            .ok("half done")
            .todo("finish assertions")
            .finish();
        assert_eq!(doc.count_skip(), 1);
        assert_eq!(doc.count_todo(), 1);
        assert!(doc.valid().unwrap());
    }

    #[test]
    fn test_comment_placement() {
        let doc = DocumentBuilder::new()
            .comment("# before anything")
            .plan_tests(1)
            .unwrap()
            .ok("works")
            .comment("took 3ms")
            .finish();
        assert_eq!(doc.header(), "# before anything\n");
        let tc = doc.get(1).unwrap().unwrap();
        assert_eq!(tc.data, vec![DataItem::Text("took 3ms\n".to_string())]);
    }

    #[test]
    fn test_rendered_output() {
        let doc = DocumentBuilder::new()
            .version(13)
            .plan_tests(1)
            .unwrap()
            .ok("works")
            .finish();
        assert_eq!(doc.to_string(), "TAP version 13\n1..1\nok - works\n");
    }

    #[test]
    fn test_bailout_midway() {
        let doc = DocumentBuilder::new()
            .plan_tests(3)
            .unwrap()
            .ok("first")
            .bailout("lost the database")
            .finish();
        assert!(doc.bailed());
        assert!(!doc.valid().unwrap());
    }
}
