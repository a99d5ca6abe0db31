//! Calculator module.
//!
//! This module provides functionality to:
//! - Drive the keypad state machine one key press at a time
//! - Detect key presses in typed text
//! - Evaluate flat left-to-right arithmetic strings
//! - Format results for the display
//! - Copy results to the clipboard

mod clipboard;
mod detection;
mod evaluation;
mod format;
mod functions;
mod state;

pub use clipboard::copy_to_clipboard;
pub use detection::{parse_key, parse_keys};
pub use evaluation::{CalcResult, basic_evaluate, evaluate_expression};
pub use format::{ERROR_DISPLAY, format_display_number, format_display_result, parse_leading_number};
pub use functions::{AdvancedFunction, Operator};
pub use state::{
    Calculator, Key, MAX_DISPLAY_LENGTH, Notice, NoticeLevel, Outcome, Paren, Pending, Phase,
};
