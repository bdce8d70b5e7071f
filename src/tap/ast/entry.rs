//! Document entries
//!
//! The entry list of a document is heterogeneous: result lines and abort
//! markers in insertion order. `Entry` is the explicit two-variant sum
//! type every consumer matches on exhaustively, so a bailout surfaces at
//! its position instead of being skipped silently.

use super::bailout::Bailout;
use super::testcase::{DataItem, TestResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a TAP document, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entry {
    Testcase(TestResult),
    Bailout(Bailout),
}

impl Entry {
    pub fn as_testcase(&self) -> Option<&TestResult> {
        match self {
            Entry::Testcase(tc) => Some(tc),
            Entry::Bailout(_) => None,
        }
    }

    pub fn as_bailout(&self) -> Option<&Bailout> {
        match self {
            Entry::Testcase(_) => None,
            Entry::Bailout(bo) => Some(bo),
        }
    }

    pub fn is_testcase(&self) -> bool {
        matches!(self, Entry::Testcase(_))
    }

    /// Attach flushed data items to this entry.
    pub fn attach_data(&mut self, items: Vec<DataItem>) {
        match self {
            Entry::Testcase(tc) => tc.data.extend(items),
            Entry::Bailout(bo) => bo.data.extend(items),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Testcase(tc) => write!(f, "{}", tc),
            Entry::Bailout(bo) => write!(f, "{}", bo),
        }
    }
}
