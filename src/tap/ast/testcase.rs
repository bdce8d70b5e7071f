//! Testcase element
//!
//! A testcase is one result line: outcome, optional declared number,
//! free-text description, SKIP/TODO directives, and attached data. Data
//! items are plain-text runs or decoded YAML blocks; copies are deep, the
//! lists are never shared between clones.

use super::directive::{Directive, DirectiveKind};
use super::indent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the testcase succeeded. `Unknown` models a result line that
/// was built programmatically before the outcome is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Pass,
    Fail,
    Unknown,
}

impl Outcome {
    pub fn is_pass(self) -> bool {
        self == Outcome::Pass
    }
}

/// One piece of data attached to a testcase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataItem {
    /// A run of consecutive plain lines, newline-terminated.
    Text(String),
    /// A decoded `---` … `...` structured block.
    Yaml(serde_yaml::Value),
}

impl fmt::Display for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataItem::Text(text) => f.write_str(text),
            DataItem::Yaml(value) => {
                let body = serde_yaml::to_string(value).unwrap_or_default();
                write!(f, "---\n{}...\n", body)
            }
        }
    }
}

/// Object representation of one result entry in a TAP document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub outcome: Outcome,
    /// The number declared on the line, if any. Resolution of absent
    /// numbers happens in the validator, never in place.
    pub number: Option<u64>,
    pub description: String,
    pub directives: Vec<Directive>,
    pub data: Vec<DataItem>,
}

impl TestResult {
    pub fn new(outcome: Outcome, number: Option<u64>, description: impl Into<String>) -> Self {
        Self {
            outcome,
            number,
            description: description.into(),
            directives: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn pass(description: impl Into<String>) -> Self {
        Self::new(Outcome::Pass, None, description)
    }

    pub fn fail(description: impl Into<String>) -> Self {
        Self::new(Outcome::Fail, None, description)
    }

    /// Is a SKIP flag annotated to this testcase?
    pub fn is_skipped(&self) -> bool {
        self.directives
            .iter()
            .any(|d| d.kind == DirectiveKind::Skip)
    }

    /// Is a TODO flag annotated to this testcase?
    pub fn is_todo(&self) -> bool {
        self.directives
            .iter()
            .any(|d| d.kind == DirectiveKind::Todo)
    }

    /// Annotate a SKIP flag with the given reason.
    pub fn skip(&mut self, why: impl Into<String>) {
        self.directives.push(Directive::skip(why));
    }

    /// Annotate a TODO flag with the given reason.
    pub fn todo(&mut self, what: impl Into<String>) {
        self.directives.push(Directive::todo(what));
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut line = String::new();
        line.push_str(if self.outcome.is_pass() {
            "ok "
        } else {
            "not ok "
        });
        if let Some(number) = self.number {
            line.push_str(&number.to_string());
            line.push(' ');
        }
        if !self.description.is_empty() {
            line.push_str("- ");
            line.push_str(&self.description);
            line.push(' ');
        }
        if !self.directives.is_empty() {
            line.push_str("# ");
            for directive in &self.directives {
                line.push_str(&directive.to_string());
                line.push(' ');
            }
        }
        writeln!(f, "{}", line.trim_end())?;

        if !self.data.is_empty() {
            let mut block = String::new();
            for item in &self.data {
                block.push_str(&item.to_string());
            }
            f.write_str(&indent(&block, 2))?;
        }
        Ok(())
    }
}
