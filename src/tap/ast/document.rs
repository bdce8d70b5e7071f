//! Document element
//!
//! A `Document` is the root of a parsed TAP text: version metadata, a
//! header comment, the plan (optional until declared), a document-wide
//! skip flag and the ordered entry list. The resolved enumeration of
//! testcase numbers is computed lazily and cached; any mutation of the
//! plan or the entry list invalidates the cache.
//!
//! Length, enumeration and validity all require a plan; requesting them
//! without one is a `MissingPlan` error. Parsing a plan-less document is
//! fine, its raw entries stay inspectable.

use super::bailout::Bailout;
use super::entry::Entry;
use super::numbering::Numbering;
use super::testcase::{DataItem, TestResult};
use crate::tap::error::TapError;
use crate::tap::validator;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;

/// An object representing a whole TAP document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    version: u64,
    version_written: bool,
    header_comment: String,
    numbering: Option<Numbering>,
    plan_at_beginning: bool,
    skip: bool,
    skip_reason: String,
    entries: Vec<Entry>,
    #[serde(skip)]
    enumeration_cache: RefCell<Option<Vec<u64>>>,
}

impl Document {
    /// TAP version assumed when no version line is present.
    pub const DEFAULT_VERSION: u64 = 13;

    pub fn new() -> Self {
        Self {
            version: Self::DEFAULT_VERSION,
            version_written: false,
            header_comment: String::new(),
            numbering: None,
            plan_at_beginning: true,
            skip: false,
            skip_reason: String::new(),
            entries: Vec::new(),
            enumeration_cache: RefCell::new(None),
        }
    }

    fn invalidate(&mut self) {
        *self.enumeration_cache.borrow_mut() = None;
    }

    // metadata

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Record a `TAP version <n>` line: sets the version and remembers
    /// that it must be serialized.
    pub fn add_version_line(&mut self, version: u64) {
        self.version = version;
        self.version_written = true;
    }

    pub fn version_written(&self) -> bool {
        self.version_written
    }

    /// Was this whole document skipped in the test run?
    pub fn skip(&self) -> bool {
        self.skip
    }

    pub fn skip_reason(&self) -> &str {
        &self.skip_reason
    }

    /// Flag the whole document as skipped. An empty reason clears the flag.
    pub fn set_skip(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if reason.trim().is_empty() {
            self.skip = false;
            self.skip_reason.clear();
        } else {
            self.skip = true;
            self.skip_reason = reason;
        }
    }

    pub fn header(&self) -> &str {
        &self.header_comment
    }

    /// Append one raw line to the header text preceding the first entry.
    pub fn add_header_line(&mut self, line: &str) {
        self.header_comment.push_str(line.trim_end());
        self.header_comment.push('\n');
    }

    // plan

    pub fn numbering(&self) -> Option<&Numbering> {
        self.numbering.as_ref()
    }

    /// Declare the plan. A comment containing the word `skip`
    /// (case-insensitive) marks the whole document skipped with that
    /// comment as reason. `at_beginning` records where the plan renders
    /// on re-serialization; it does not affect validation.
    pub fn add_plan(&mut self, first: u64, last: u64, comment: &str, at_beginning: bool) {
        self.numbering = Some(Numbering::from_range(first, last));
        self.plan_at_beginning = at_beginning;
        if comment.to_lowercase().contains("skip") {
            self.set_skip(comment);
        }
        self.invalidate();
    }

    pub fn plan_at_beginning(&self) -> bool {
        self.plan_at_beginning
    }

    /// The declared `(first, last)` bounds, if a plan exists.
    pub fn range(&self) -> Option<(u64, u64)> {
        self.numbering.as_ref().map(Numbering::range)
    }

    /// The `(min, max)` bounds of the resolved testcase numbers.
    pub fn actual_range(&self) -> Result<(u64, u64), TapError> {
        let enumeration = self.enumeration()?;
        match (enumeration.iter().min(), enumeration.iter().max()) {
            (Some(&min), Some(&max)) => Ok((min, max)),
            _ => Ok((1, 0)),
        }
    }

    /// The rendered plan line, including a SKIP comment when the
    /// document is flagged skipped.
    pub fn plan_line(&self) -> Option<String> {
        let (first, last) = self.range()?;
        Some(render_plan(first, last, &self.skip_reason, self.skip))
    }

    // entries

    pub fn add_testcase(&mut self, tc: TestResult) {
        self.entries.push(Entry::Testcase(tc));
        self.invalidate();
    }

    pub fn add_bailout(&mut self, bo: Bailout) {
        self.entries.push(Entry::Bailout(bo));
        self.invalidate();
    }

    /// Attach flushed data items to the last entry. Returns false when
    /// the document has no entries yet.
    pub fn attach_to_last(&mut self, items: Vec<DataItem>) -> bool {
        match self.entries.last_mut() {
            Some(entry) => {
                entry.attach_data(items);
                true
            }
            None => false,
        }
    }

    /// Iterate entries in insertion order, bailouts at their positions.
    pub fn entries(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn testcases(&self) -> impl Iterator<Item = &TestResult> {
        self.entries.iter().filter_map(Entry::as_testcase)
    }

    /// The most recently added testcase, if any. Directive edits do not
    /// touch numbers, so the enumeration cache stays valid.
    pub fn last_testcase_mut(&mut self) -> Option<&mut TestResult> {
        self.entries.iter_mut().rev().find_map(|entry| match entry {
            Entry::Testcase(tc) => Some(tc),
            Entry::Bailout(_) => None,
        })
    }

    /// Actual number of testcase entries, regardless of the plan.
    pub fn actual_length(&self) -> usize {
        self.testcases().count()
    }

    /// Number of tests the plan declares. Unlike [`actual_length`],
    /// this requires a plan.
    ///
    /// [`actual_length`]: Document::actual_length
    pub fn total(&self) -> Result<u64, TapError> {
        match &self.numbering {
            Some(numbering) => Ok(numbering.len()),
            None => Err(TapError::MissingPlan(
                "document requires a plan before its length can be read".to_string(),
            )),
        }
    }

    pub(crate) fn testcase_numbers(&self) -> Vec<Option<u64>> {
        self.testcases().map(|tc| tc.number).collect()
    }

    // aggregate queries

    pub fn count_failed(&self) -> usize {
        self.testcases()
            .filter(|tc| !tc.outcome.is_pass())
            .count()
    }

    pub fn count_todo(&self) -> usize {
        self.testcases().filter(|tc| tc.is_todo()).count()
    }

    pub fn count_skip(&self) -> usize {
        self.testcases().filter(|tc| tc.is_skipped()).count()
    }

    /// Was a bailout called at some point?
    pub fn bailed(&self) -> bool {
        self.entries.iter().any(|e| e.as_bailout().is_some())
    }

    /// The first bailout message in document order, if any.
    pub fn bailout_message(&self) -> Option<&str> {
        self.entries
            .iter()
            .find_map(Entry::as_bailout)
            .map(|bo| bo.message.as_str())
    }

    // numbering resolution

    /// The resolved testcase number for each testcase entry, in order.
    /// Computed lazily with the lenient policy and cached until the
    /// plan or the entry list changes.
    pub fn enumeration(&self) -> Result<Vec<u64>, TapError> {
        if let Some(cached) = self.enumeration_cache.borrow().as_ref() {
            return Ok(cached.clone());
        }
        let numbering = self.numbering.as_ref().ok_or_else(|| {
            TapError::MissingPlan(
                "document requires a plan before numbers can be resolved".to_string(),
            )
        })?;
        let numbers = self.testcase_numbers();
        validator::check_range(&numbers, numbering)?;
        let enumeration =
            validator::enumerate(&numbers, numbering.first(), crate::tap::parser::Mode::Lenient)?;
        *self.enumeration_cache.borrow_mut() = Some(enumeration.clone());
        Ok(enumeration)
    }

    /// Look up a testcase by its resolved number. Returns a deep copy
    /// with the number filled in, `Ok(None)` for an in-range hole, and
    /// an error when `number` lies outside the declared range.
    pub fn get(&self, number: u64) -> Result<Option<TestResult>, TapError> {
        let enumeration = self.enumeration()?;
        let numbering = self.numbering.as_ref().ok_or_else(|| {
            TapError::MissingPlan(
                "document requires a plan before numbers can be resolved".to_string(),
            )
        })?;
        if !numbering.contains(number) {
            let (first, last) = numbering.range();
            return Err(TapError::InvalidNumbering(format!(
                "testcase number {} is outside of plan {}..{}",
                number, first, last
            )));
        }
        match enumeration.iter().position(|&n| n == number) {
            Some(index) => {
                let mut tc = match self.testcases().nth(index) {
                    Some(tc) => tc.clone(),
                    None => return Ok(None),
                };
                tc.number = Some(number);
                Ok(Some(tc))
            }
            None => Ok(None),
        }
    }

    /// Does this document represent a successful test run?
    pub fn valid(&self) -> Result<bool, TapError> {
        validator::validate(self)
    }
}

// the enumeration cache is derived state and stays out of equality
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.version_written == other.version_written
            && self.header_comment == other.header_comment
            && self.numbering == other.numbering
            && self.plan_at_beginning == other.plan_at_beginning
            && self.skip == other.skip
            && self.skip_reason == other.skip_reason
            && self.entries == other.entries
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version_written {
            writeln!(f, "TAP version {}", self.version)?;
        }
        f.write_str(&self.header_comment)?;
        if self.plan_at_beginning {
            if let Some(plan) = self.plan_line() {
                writeln!(f, "{}", plan)?;
            }
        }
        for entry in &self.entries {
            write!(f, "{}", entry)?;
        }
        if !self.plan_at_beginning {
            if let Some(plan) = self.plan_line() {
                writeln!(f, "{}", plan)?;
            }
        }
        Ok(())
    }
}

/// Render a plan line. A skipped document always carries a `SKIP`
/// comment; the keyword is inserted if the reason does not contain it.
fn render_plan(first: u64, last: u64, reason: &str, skip: bool) -> String {
    let mut plan = format!("{}..{}", first, last);
    if skip {
        let reason = reason.trim();
        if reason.is_empty() {
            plan.push_str(" # SKIP");
        } else if reason.to_lowercase().contains("skip") {
            plan.push_str(" # ");
            plan.push_str(reason);
        } else {
            plan.push_str(" # SKIP ");
            plan.push_str(reason);
        }
    }
    plan
}
