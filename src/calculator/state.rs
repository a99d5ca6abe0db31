//! The keypad state machine.
//!
//! Each key press is one synchronous transition over an explicit [`Phase`].
//! A binary operation is tracked as a [`Pending`] left operand plus operator;
//! pressing a second operator resolves the first before recording the new
//! one, so the expression line never holds more than one operator.

use crate::calculator::format::{ERROR_DISPLAY, format_display_number, parse_leading_number};
use crate::calculator::functions::{AdvancedFunction, Operator};
use crate::error::CalcError;
use crate::items::CalculationEntry;
use std::mem;

/// Default limit on typed characters in the display.
pub const MAX_DISPLAY_LENGTH: usize = 16;

/// A cosmetic parenthesis key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paren {
    Open,
    Close,
}

impl Paren {
    pub fn glyph(self) -> char {
        match self {
            Self::Open => '(',
            Self::Close => ')',
        }
    }
}

/// One button of the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    Backspace,
    Function(AdvancedFunction),
    Paren(Paren),
}

/// A binary operation waiting for its right operand.
#[derive(Clone, Debug, PartialEq)]
pub struct Pending {
    /// The left operand as a number.
    pub lhs: f64,
    /// The left operand as it appeared on the display.
    pub lhs_text: String,
    pub operator: Operator,
}

impl Pending {
    fn resolve(&self, rhs_text: &str) -> Result<f64, CalcError> {
        let rhs = parse_leading_number(rhs_text)
            .ok_or_else(|| CalcError::InvalidInput(rhs_text.to_string()))?;
        self.operator.apply(self.lhs, rhs)
    }
}

/// Where the calculator is between key presses.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Phase {
    /// Nothing typed yet; the next digit starts a number.
    #[default]
    FreshEntry,
    /// Digits are being typed into the display.
    TypingOperand { pending: Option<Pending> },
    /// An operator was pressed; the next digit starts the right operand.
    AwaitingOperand { pending: Pending },
    /// The display holds a finished result.
    ResultShown,
    /// An advanced function failed and the display reads `Error`.
    /// A pending operation survives so typing can continue it. `awaiting`
    /// is set when the failure came before any right operand was typed.
    ErrorState {
        pending: Option<Pending>,
        awaiting: bool,
    },
}

impl Phase {
    fn pending(&self) -> Option<&Pending> {
        match self {
            Self::TypingOperand { pending } | Self::ErrorState { pending, .. } => pending.as_ref(),
            Self::AwaitingOperand { pending } => Some(pending),
            Self::FreshEntry | Self::ResultShown => None,
        }
    }
}

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient user-facing feedback for a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    pub fn info(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title,
            message: message.into(),
        }
    }

    pub fn error(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    fn from_calc_error(err: &CalcError) -> Self {
        match err {
            CalcError::DivisionByZero => Self::error("Error", "Cannot divide by zero."),
            CalcError::NonFinite => Self::error("Error", "The result is not a finite number."),
            other => Self::error("Error", other.to_string()),
        }
    }
}

/// What a key press produced besides the state change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome {
    /// A completed computation to record in history.
    pub entry: Option<CalculationEntry>,
    pub notice: Option<Notice>,
}

impl Outcome {
    fn none() -> Self {
        Self::default()
    }

    fn entry(entry: CalculationEntry) -> Self {
        Self {
            entry: Some(entry),
            notice: None,
        }
    }

    fn notice(notice: Notice) -> Self {
        Self {
            entry: None,
            notice: Some(notice),
        }
    }
}

/// The calculator: display text, expression line and phase.
#[derive(Clone, Debug, PartialEq)]
pub struct Calculator {
    display: String,
    expression: String,
    phase: Phase,
    max_display_length: usize,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_max_display_length(MAX_DISPLAY_LENGTH)
    }

    pub fn with_max_display_length(max_display_length: usize) -> Self {
        Self {
            display: "0".to_string(),
            expression: String::new(),
            phase: Phase::FreshEntry,
            max_display_length,
        }
    }

    /// The raw display text: typed digits, a result, or `Error`.
    pub fn display_value(&self) -> &str {
        &self.display
    }

    /// The value the screen shows. While an operator waits for its right
    /// operand, this is the left operand.
    pub fn shown_value(&self) -> &str {
        match &self.phase {
            Phase::AwaitingOperand { pending } => &pending.lhs_text,
            _ => &self.display,
        }
    }

    /// The line above the display: `5+` while an operation is pending, or a
    /// label such as `sqrt(9) = 3` after a function.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn operator(&self) -> Option<Operator> {
        self.phase.pending().map(|p| p.operator)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether the next digit starts a fresh number.
    pub fn waiting_for_operand(&self) -> bool {
        matches!(
            self.phase,
            Phase::FreshEntry | Phase::AwaitingOperand { .. } | Phase::ResultShown
        )
    }

    /// Whether the display holds a finished value (a result or `Error`).
    pub fn is_result_displayed(&self) -> bool {
        matches!(self.phase, Phase::ResultShown | Phase::ErrorState { .. })
    }

    /// Dispatch a key press.
    pub fn press(&mut self, key: Key) -> Outcome {
        tracing::debug!(?key, phase = ?self.phase, display = %self.display, "key press");
        match key {
            Key::Digit(d) => self.input_digit(d),
            Key::Decimal => self.input_decimal(),
            Key::Operator(op) => self.input_operator(op),
            Key::Equals => self.equals(),
            Key::Clear => self.clear(),
            Key::Backspace => self.backspace(),
            Key::Function(func) => self.apply_function(func),
            Key::Paren(paren) => self.parenthesis(paren),
        }
    }

    pub fn input_digit(&mut self, digit: u8) -> Outcome {
        let Some(c) = char::from_digit(u32::from(digit), 10) else {
            tracing::debug!(digit, "ignoring non-decimal digit");
            return Outcome::none();
        };

        self.phase = match mem::take(&mut self.phase) {
            Phase::TypingOperand { pending } => {
                if self.display.chars().count() < self.max_display_length {
                    if self.display == "0" {
                        self.display.clear();
                    }
                    self.display.push(c);
                }
                Phase::TypingOperand { pending }
            }
            Phase::FreshEntry | Phase::ResultShown => {
                self.display = c.to_string();
                Phase::TypingOperand { pending: None }
            }
            Phase::AwaitingOperand { pending } => {
                self.display = c.to_string();
                Phase::TypingOperand {
                    pending: Some(pending),
                }
            }
            Phase::ErrorState { pending, .. } => {
                self.display = c.to_string();
                Phase::TypingOperand { pending }
            }
        };
        Outcome::none()
    }

    pub fn input_decimal(&mut self) -> Outcome {
        self.phase = match mem::take(&mut self.phase) {
            Phase::TypingOperand { pending } => {
                if !self.display.contains('.') {
                    self.display.push('.');
                }
                Phase::TypingOperand { pending }
            }
            Phase::FreshEntry | Phase::ResultShown => {
                self.display = "0.".to_string();
                Phase::TypingOperand { pending: None }
            }
            Phase::AwaitingOperand { pending } => {
                self.display = "0.".to_string();
                Phase::TypingOperand {
                    pending: Some(pending),
                }
            }
            Phase::ErrorState { pending, .. } => {
                self.display = "0.".to_string();
                Phase::TypingOperand { pending }
            }
        };
        Outcome::none()
    }

    pub fn input_operator(&mut self, op: Operator) -> Outcome {
        match mem::take(&mut self.phase) {
            Phase::TypingOperand {
                pending: Some(pending),
            }
            | Phase::ErrorState {
                pending: Some(pending),
                awaiting: false,
            } => match pending.resolve(&self.display) {
                Ok(value) => {
                    let formatted = format_display_number(value);
                    tracing::debug!(%formatted, %op, "chained operation resolved");
                    self.expression = format!("{}{}", formatted, op);
                    self.display = formatted.clone();
                    self.phase = Phase::AwaitingOperand {
                        pending: Pending {
                            lhs: parse_leading_number(&formatted).unwrap_or(value),
                            lhs_text: formatted,
                            operator: op,
                        },
                    };
                    Outcome::none()
                }
                Err(err) => self.fail_and_clear(err),
            },
            Phase::AwaitingOperand { mut pending }
            | Phase::ErrorState {
                pending: Some(mut pending),
                awaiting: true,
            } => {
                pending.operator = op;
                self.expression = format!("{}{}", pending.lhs_text, op);
                self.phase = Phase::AwaitingOperand { pending };
                Outcome::none()
            }
            phase => match parse_leading_number(&self.display) {
                Some(lhs) => {
                    self.expression = format!("{}{}", self.display, op);
                    self.phase = Phase::AwaitingOperand {
                        pending: Pending {
                            lhs,
                            lhs_text: self.display.clone(),
                            operator: op,
                        },
                    };
                    Outcome::none()
                }
                None => {
                    self.phase = phase;
                    tracing::warn!(display = %self.display, "operator on non-numeric display");
                    Outcome::notice(Notice::error("Error", "Enter a number first."))
                }
            },
        }
    }

    pub fn equals(&mut self) -> Outcome {
        let pending = match &self.phase {
            Phase::TypingOperand {
                pending: Some(pending),
            }
            | Phase::ErrorState {
                pending: Some(pending),
                awaiting: false,
            } => pending.clone(),
            _ => return Outcome::none(),
        };

        let full_expression = format!("{}{}", self.expression, self.display);
        match pending.resolve(&self.display) {
            Ok(value) => {
                let formatted = format_display_number(value);
                self.display = formatted.clone();
                self.expression.clear();
                self.phase = Phase::ResultShown;

                let entry = CalculationEntry::new(full_expression, formatted);
                tracing::info!(expression = %entry.expression, result = %entry.result, "calculation completed");
                Outcome::entry(entry)
            }
            Err(err) => self.fail_and_clear(err),
        }
    }

    pub fn clear(&mut self) -> Outcome {
        self.reset();
        Outcome::none()
    }

    pub fn backspace(&mut self) -> Outcome {
        self.phase = match mem::take(&mut self.phase) {
            Phase::ResultShown | Phase::ErrorState { .. } => {
                self.reset();
                return Outcome::none();
            }
            Phase::TypingOperand { pending } => {
                self.display.pop();
                if self.display.is_empty() {
                    self.display = "0".to_string();
                    match pending {
                        Some(pending) => Phase::AwaitingOperand { pending },
                        None => Phase::FreshEntry,
                    }
                } else {
                    Phase::TypingOperand { pending }
                }
            }
            // Nothing typed since the last operator or reset.
            phase @ (Phase::FreshEntry | Phase::AwaitingOperand { .. }) => phase,
        };
        Outcome::none()
    }

    pub fn apply_function(&mut self, func: AdvancedFunction) -> Outcome {
        let Some(value) = parse_leading_number(&self.display) else {
            tracing::warn!(%func, display = %self.display, "function on non-numeric display");
            return Outcome::notice(Notice::error("Error", "Invalid input for function."));
        };

        let result = func.apply(value);
        if !result.is_finite() {
            tracing::warn!(%func, value, "function result is not finite");
            let pending = self.phase.pending().cloned();
            let awaiting = matches!(self.phase, Phase::AwaitingOperand { .. });
            self.display = ERROR_DISPLAY.to_string();
            self.phase = Phase::ErrorState { pending, awaiting };
            return Outcome::notice(Notice::error(
                "Error",
                "Invalid operation or input for function.",
            ));
        }

        let formatted = format_display_number(result);
        let label = format!("{}({})", func, self.display);
        self.expression = format!("{} = {}", label, formatted);
        self.display = formatted.clone();
        self.phase = Phase::ResultShown;

        let entry = CalculationEntry::new(label, formatted);
        tracing::info!(expression = %entry.expression, result = %entry.result, "function applied");
        Outcome::entry(entry)
    }

    /// Append a parenthesis to the display and expression line. Grouping is
    /// not evaluated; the glyph is cosmetic.
    pub fn parenthesis(&mut self, paren: Paren) -> Outcome {
        let glyph = paren.glyph();
        match mem::take(&mut self.phase) {
            Phase::ResultShown => {
                self.display = glyph.to_string();
                self.expression = glyph.to_string();
                self.phase = Phase::TypingOperand { pending: None };
            }
            Phase::ErrorState { pending, .. } => {
                self.display = glyph.to_string();
                self.expression = glyph.to_string();
                self.phase = Phase::TypingOperand { pending };
            }
            phase => {
                if self.display == "0" && paren == Paren::Open {
                    self.display = glyph.to_string();
                } else {
                    self.display.push(glyph);
                }
                self.expression.push(glyph);
                self.phase = phase;
            }
        }

        Outcome::notice(Notice::info(
            "Info",
            "Parentheses added to display. Full support requires advanced parsing.",
        ))
    }

    /// Load a previous calculation onto the display as a finished result.
    pub fn recall(&mut self, entry: &CalculationEntry) -> Outcome {
        self.display = entry.result.clone();
        self.expression = entry.expression.clone();
        self.phase = Phase::ResultShown;
        Outcome::notice(Notice::info(
            "Recalled",
            format!("Expression: {}", entry.expression),
        ))
    }

    fn reset(&mut self) {
        self.display = "0".to_string();
        self.expression.clear();
        self.phase = Phase::FreshEntry;
    }

    fn fail_and_clear(&mut self, err: CalcError) -> Outcome {
        tracing::warn!(%err, expression = %self.expression, display = %self.display, "calculation failed, clearing");
        self.reset();
        Outcome::notice(Notice::from_calc_error(&err))
    }
}
