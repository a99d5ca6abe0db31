mod calculation;
mod saved;

pub use calculation::{CalculationEntry, next_stamp};
pub use saved::SavedCalculation;

/// An item that can be recalled onto the calculator display.
/// Abstracts over the history list and the saved calculations list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecallItem {
    /// An entry from the calculation history
    History(CalculationEntry),
    /// A named, saved calculation
    Saved(SavedCalculation),
}

impl RecallItem {
    /// Get the unique identifier for this item.
    pub fn id(&self) -> &str {
        match self {
            Self::History(entry) => &entry.id,
            Self::Saved(saved) => &saved.id,
        }
    }

    /// Get the display name: the saved name, or the expression for history.
    pub fn name(&self) -> &str {
        match self {
            Self::History(entry) => &entry.expression,
            Self::Saved(saved) => &saved.name,
        }
    }

    pub fn expression(&self) -> &str {
        match self {
            Self::History(entry) => &entry.expression,
            Self::Saved(saved) => &saved.expression,
        }
    }

    pub fn result(&self) -> &str {
        match self {
            Self::History(entry) => &entry.result,
            Self::Saved(saved) => &saved.result,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            Self::History(entry) => entry.timestamp,
            Self::Saved(saved) => saved.timestamp,
        }
    }

    /// Get the section name for this item type.
    pub fn section_name(&self) -> &'static str {
        match self {
            Self::History(_) => "History",
            Self::Saved(_) => "Saved",
        }
    }

    /// The calculation to load onto the display.
    pub fn to_entry(&self) -> CalculationEntry {
        match self {
            Self::History(entry) => entry.clone(),
            Self::Saved(saved) => saved.entry(),
        }
    }
}

impl From<CalculationEntry> for RecallItem {
    fn from(entry: CalculationEntry) -> Self {
        Self::History(entry)
    }
}

impl From<SavedCalculation> for RecallItem {
    fn from(saved: SavedCalculation) -> Self {
        Self::Saved(saved)
    }
}
