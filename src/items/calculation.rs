//! History entries produced by completed calculations.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Last stamp handed out, so two entries created in the same millisecond
/// still get distinct ids.
static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

/// Current time in epoch milliseconds, bumped past the previous stamp.
pub fn next_stamp() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let stamp = now.max(last + 1);
        match LAST_STAMP.compare_exchange_weak(last, stamp, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return stamp,
            Err(current) => last = current,
        }
    }
}

/// One completed computation. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationEntry {
    /// Unique, time-derived identifier.
    pub id: String,
    /// What was computed, e.g. `5+3` or `sqrt(9)`.
    pub expression: String,
    /// The formatted result.
    pub result: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: u64,
}

impl CalculationEntry {
    /// Create an entry stamped with the current time.
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        let stamp = next_stamp();
        Self {
            id: stamp.to_string(),
            expression: expression.into(),
            result: result.into(),
            timestamp: stamp,
        }
    }

    /// `expression = result`, as shown in history lists.
    pub fn summary(&self) -> String {
        format!("{} = {}", self.expression, self.result)
    }
}
