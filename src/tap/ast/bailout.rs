//! Bailout element
//!
//! `Bail out! <reason>` signals that testing stopped early. Free-text
//! lines following the bailout line attach to it as additional data. Only
//! the first bailout in document order is reported as "the" bailout, but
//! later ones stay in the entry list at their positions.

use super::testcase::DataItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An abort marker with its reason and any trailing free-text lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bailout {
    pub message: String,
    pub data: Vec<DataItem>,
}

impl Bailout {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: Vec::new(),
        }
    }
}

impl fmt::Display for Bailout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            writeln!(f, "Bail out!")?;
        } else {
            writeln!(f, "Bail out! {}", self.message)?;
        }
        for item in &self.data {
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}
