//! Key detection for typed input.
//!
//! Turns text such as `"12.5 × 3 ="` or `"9 sqrt"` into the sequence of
//! keypad presses it describes, so a keyboard or script can drive the
//! calculator the same way the button grid does.

use crate::calculator::functions::{AdvancedFunction, Operator};
use crate::calculator::state::{Key, Paren};
use crate::error::CalcError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A word (function name or command), a single digit, or any other
    /// non-space character. Digits are split so `"12"` is two presses.
    static ref KEY_TOKEN: Regex = Regex::new(r"[A-Za-z]+(?:10)?|\d|\S").unwrap();
}

/// Parse typed text into key presses.
///
/// Words map to commands (`AC`, `C`, `clear`, `DEL`, `backspace`) or to
/// advanced function names; `x` is accepted as multiplication.
pub fn parse_keys(input: &str) -> Result<Vec<Key>, CalcError> {
    KEY_TOKEN
        .find_iter(input)
        .map(|token| parse_key(token.as_str()))
        .collect()
}

/// Parse a single key token.
pub fn parse_key(token: &str) -> Result<Key, CalcError> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(key) = parse_symbol(c) {
            return Ok(key);
        }
    }

    match token.to_lowercase().as_str() {
        "ac" | "c" | "clear" => Ok(Key::Clear),
        "del" | "bs" | "backspace" => Ok(Key::Backspace),
        _ => token.parse::<AdvancedFunction>().map(Key::Function),
    }
}

fn parse_symbol(c: char) -> Option<Key> {
    match c {
        '0'..='9' => c.to_digit(10).map(|d| Key::Digit(d as u8)),
        '.' => Some(Key::Decimal),
        '=' => Some(Key::Equals),
        '(' => Some(Key::Paren(Paren::Open)),
        ')' => Some(Key::Paren(Paren::Close)),
        '⌫' => Some(Key::Backspace),
        other => Operator::from_symbol(other).map(Key::Operator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_split_into_presses() {
        assert_eq!(
            parse_keys("12.5").unwrap(),
            vec![Key::Digit(1), Key::Digit(2), Key::Decimal, Key::Digit(5)]
        );
    }

    #[test]
    fn test_operators_and_equals() {
        assert_eq!(
            parse_keys("5 + 3 =").unwrap(),
            vec![
                Key::Digit(5),
                Key::Operator(Operator::Add),
                Key::Digit(3),
                Key::Equals
            ]
        );
        assert_eq!(
            parse_keys("6x7").unwrap(),
            vec![Key::Digit(6), Key::Operator(Operator::Multiply), Key::Digit(7)]
        );
        assert_eq!(parse_keys("÷").unwrap(), vec![Key::Operator(Operator::Divide)]);
    }

    #[test]
    fn test_words() {
        assert_eq!(
            parse_keys("9 sqrt AC del log10").unwrap(),
            vec![
                Key::Digit(9),
                Key::Function(AdvancedFunction::Sqrt),
                Key::Clear,
                Key::Backspace,
                Key::Function(AdvancedFunction::Log10),
            ]
        );
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(
            parse_keys("()").unwrap(),
            vec![Key::Paren(Paren::Open), Key::Paren(Paren::Close)]
        );
    }

    #[test]
    fn test_unknown_tokens_rejected() {
        assert_eq!(
            parse_keys("5 pow 2"),
            Err(CalcError::UnknownKey("pow".to_string()))
        );
        assert!(parse_keys("5 ^ 2").is_err());
    }
}
