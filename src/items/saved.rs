//! Named calculations the user chose to keep.

use super::calculation::{CalculationEntry, next_stamp};
use serde::{Deserialize, Serialize};

/// A calculation tagged with a user-supplied name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCalculation {
    pub id: String,
    pub name: String,
    pub expression: String,
    pub result: String,
    pub timestamp: u64,
}

impl SavedCalculation {
    /// Save a copy of `entry` under `name` with a fresh id and timestamp.
    pub fn from_entry(entry: &CalculationEntry, name: impl Into<String>) -> Self {
        let stamp = next_stamp();
        Self {
            id: stamp.to_string(),
            name: name.into(),
            expression: entry.expression.clone(),
            result: entry.result.clone(),
            timestamp: stamp,
        }
    }

    /// The underlying calculation, keeping this item's id and timestamp.
    pub fn entry(&self) -> CalculationEntry {
        CalculationEntry {
            id: self.id.clone(),
            expression: self.expression.clone(),
            result: self.result.clone(),
            timestamp: self.timestamp,
        }
    }
}
