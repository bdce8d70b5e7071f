//! Plan numbering
//!
//! The plan declares the inclusive range of testcase numbers expected in
//! a document, stored as `first` plus a length. `1..0` is the canonical
//! sentinel for "explicitly zero tests"; any other decreasing range
//! normalizes to zero length (or is rejected by the strict constructor).

use crate::tap::error::TapError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared range of testcase numbers, `first..first+length-1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numbering {
    first: u64,
    length: u64,
}

impl Numbering {
    /// Build from an inclusive `first..last` range, normalizing a
    /// decreasing range to zero length. The full `0..u64::MAX` range
    /// saturates to a length of `u64::MAX`.
    pub fn from_range(first: u64, last: u64) -> Self {
        let length = last
            .checked_sub(first)
            .map_or(0, |d| d.saturating_add(1));
        Self { first, length }
    }

    /// Like [`Numbering::from_range`] but a decreasing range other than
    /// the `1..0` sentinel is an error.
    pub fn from_range_strict(first: u64, last: u64) -> Result<Self, TapError> {
        if last < first && !(first == 1 && last == 0) {
            return Err(TapError::InvalidNumbering(format!(
                "range {}..{} is decreasing",
                first, last
            )));
        }
        Ok(Self::from_range(first, last))
    }

    /// A range starting at 1 for the given number of tests.
    pub fn with_tests(tests: u64) -> Self {
        Self {
            first: 1,
            length: tests,
        }
    }

    pub fn first(&self) -> u64 {
        self.first
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Is `number` within this range?
    pub fn contains(&self, number: u64) -> bool {
        number >= self.first && number - self.first < self.length
    }

    /// Grow the range by one new testcase.
    pub fn inc(&mut self) {
        self.length = self.length.saturating_add(1);
    }

    /// The inclusive `(first, last)` bounds. A zero-length range yields
    /// `last = first - 1`, e.g. `(1, 0)` for the empty sentinel.
    pub fn range(&self) -> (u64, u64) {
        if self.length == 0 {
            (self.first, self.first.saturating_sub(1))
        } else {
            (self.first, self.first.saturating_add(self.length - 1))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> {
        let (first, last) = self.range();
        // an inclusive range with last < first is empty
        first..=last
    }

    /// The plan rebased to start at 1.
    pub fn normalized(&self) -> String {
        format!("1..{}", self.length)
    }
}

impl fmt::Display for Numbering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, last) = self.range();
        write!(f, "{}..{}", first, last)
    }
}
