//! Keypad calculator with persistent history, saved calculations and an AI
//! equation explainer.

pub mod ai;
pub mod calculator;
pub mod config;
pub mod error;
pub mod items;
pub mod logging;
pub mod session;
pub mod storage;
pub mod ui;

pub use calculator::{Calculator, Key};
pub use config::Config;
pub use error::{CalcError, ExplainError, SessionError, StorageError};
pub use items::{CalculationEntry, RecallItem, SavedCalculation};
pub use session::Session;
