//! Error types shared across the crate.

use thiserror::Error;

/// Failures of the arithmetic core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Input text does not match the flat `number (operator number)*` grammar.
    #[error("invalid expression format: {0}")]
    Format(String),
    /// A division or remainder with a zero divisor.
    #[error("cannot divide by zero")]
    DivisionByZero,
    /// The result was NaN or infinite (includes domain errors such as `ln(-1)`).
    #[error("result is not a finite number")]
    NonFinite,
    /// The display does not hold a number the operation can use.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A typed key token that maps to no calculator key.
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

impl CalcError {
    /// The display sentinel used when an evaluation result is shown as text.
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::Format(_) | Self::UnknownKey(_) => "Error: Format",
            Self::DivisionByZero | Self::NonFinite | Self::InvalidInput(_) => "Error: Calculation",
        }
    }
}

/// Failures reading or writing persisted lists.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access stored key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("stored value for '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of list operations on a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("nothing to save: perform a calculation first")]
    NothingToSave,
    #[error("a saved calculation needs a name")]
    BlankName,
    #[error("no calculation with id '{0}'")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures of the equation explainer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplainError {
    #[error("no API key found in ${0}")]
    Unavailable(String),
    #[error("please enter an equation")]
    EmptyEquation,
    #[error("explanation backend failed: {0}")]
    Backend(String),
    #[error("explanation backend returned no text")]
    EmptyResponse,
}
