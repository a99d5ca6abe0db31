//! Flat arithmetic evaluation.
//!
//! Accepts `number (operator number)*` where each operand may carry a leading
//! minus sign, and reduces strictly left to right: `2+3*4` is `20`, not `14`.
//! There is no grouping and no operator precedence.

use crate::calculator::format::format_display_result;
use crate::error::CalcError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// The whole normalized input must match this grammar.
    static ref FLAT_EXPRESSION: Regex =
        Regex::new(r"^-?\d+(\.\d+)?([-+*/]-?\d+(\.\d+)?)*$").unwrap();

    /// One operand with the operator that precedes it (absent for the first).
    static ref TERM: Regex =
        Regex::new(r"(?:^|([-+*/]))(-?\d+(?:\.\d+)?)").unwrap();
}

/// Result of evaluating a typed expression.
#[derive(Clone, Debug, PartialEq)]
pub enum CalcResult {
    /// Successful calculation with a finite value.
    Success {
        /// The original expression.
        expression: String,
        /// The numeric value.
        value: f64,
        /// Formatted for the display.
        display_result: String,
    },
    /// The expression was rejected or did not produce a finite number.
    Error {
        /// The original expression.
        expression: String,
        /// Why evaluation failed.
        error: CalcError,
    },
}

impl CalcResult {
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The display string: the formatted result or an error sentinel.
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Error { error, .. } => error.sentinel(),
        }
    }
}

/// Evaluate an expression and package it for display.
pub fn evaluate_expression(input: &str) -> CalcResult {
    let expression = input.trim().to_string();

    match basic_evaluate(&expression) {
        Ok(value) => CalcResult::Success {
            display_result: format_display_result(Ok(value)),
            expression,
            value,
        },
        Err(error) => {
            tracing::debug!(%expression, %error, "expression rejected");
            CalcResult::Error { expression, error }
        }
    }
}

/// Evaluate a flat arithmetic string left to right.
///
/// Whitespace is ignored and the display glyphs `×`, `÷` and `−` are
/// accepted. Empty input evaluates to `0`.
pub fn basic_evaluate(text: &str) -> Result<f64, CalcError> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Ok(0.0);
    }

    if !FLAT_EXPRESSION.is_match(&normalized) {
        return Err(CalcError::Format(normalized));
    }

    let mut acc: Option<f64> = None;
    for caps in TERM.captures_iter(&normalized) {
        let operand: f64 = caps[2]
            .parse()
            .map_err(|_| CalcError::Format(normalized.clone()))?;

        acc = Some(match (acc, caps.get(1)) {
            (None, _) => operand,
            (Some(lhs), Some(op)) => reduce(lhs, op.as_str(), operand)?,
            (Some(_), None) => return Err(CalcError::Format(normalized.clone())),
        });
    }

    let value = acc.ok_or_else(|| CalcError::Format(normalized.clone()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite)
    }
}

/// Strip whitespace and map display glyphs onto the ASCII operator set.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect()
}

/// Apply one operator. Division by zero yields an infinity here, which the
/// caller reports as a non-finite result.
fn reduce(lhs: f64, op: &str, rhs: f64) -> Result<f64, CalcError> {
    let value = match op {
        "+" => lhs + rhs,
        "-" => lhs - rhs,
        "*" => lhs * rhs,
        "/" => lhs / rhs,
        other => return Err(CalcError::Format(other.to_string())),
    };

    if value.is_nan() {
        Err(CalcError::NonFinite)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_evaluation() {
        assert_eq!(basic_evaluate("2 + 2"), Ok(4.0));
        assert_eq!(basic_evaluate("10*5"), Ok(50.0));
        assert_eq!(basic_evaluate("7"), Ok(7.0));
        assert_eq!(basic_evaluate(""), Ok(0.0));
    }

    #[test]
    fn test_left_to_right_without_precedence() {
        assert_eq!(basic_evaluate("2+3*4"), Ok(20.0));
        assert_eq!(basic_evaluate("10-4/2"), Ok(3.0));
        assert_eq!(basic_evaluate("1+2+3-4"), Ok(2.0));
    }

    #[test]
    fn test_display_glyphs() {
        assert_eq!(basic_evaluate("6 × 7"), Ok(42.0));
        assert_eq!(basic_evaluate("9÷3"), Ok(3.0));
        assert_eq!(basic_evaluate("9 − 3"), Ok(6.0));
    }

    #[test]
    fn test_signed_operands() {
        assert_eq!(basic_evaluate("-5*2"), Ok(-10.0));
        assert_eq!(basic_evaluate("5*-2"), Ok(-10.0));
        assert_eq!(basic_evaluate("5--3"), Ok(8.0));
        assert_eq!(basic_evaluate("1.5+2.25"), Ok(3.75));
    }

    #[test]
    fn test_format_errors() {
        for input in ["5++3", "+5", "5+", "(2+3)", "2^3", "abc", "1.", ".5", "5%2"] {
            assert!(
                matches!(basic_evaluate(input), Err(CalcError::Format(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_calculation_errors() {
        assert_eq!(basic_evaluate("1/0"), Err(CalcError::NonFinite));
        assert_eq!(basic_evaluate("0/0"), Err(CalcError::NonFinite));
        assert_eq!(basic_evaluate("1/0-1/0"), Err(CalcError::NonFinite));
    }

    #[test]
    fn test_evaluate_expression_display() {
        let result = evaluate_expression(" 1 / 3 ");
        assert!(result.is_success());
        assert_eq!(result.expression(), "1 / 3");
        assert_eq!(result.display(), "0.33333333");

        let result = evaluate_expression("2 +* 2");
        assert!(!result.is_success());
        assert_eq!(result.display(), "Error: Format");

        assert_eq!(evaluate_expression("4/0").display(), "Error: Calculation");
    }
}
