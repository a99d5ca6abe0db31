//! Number formatting for the calculator display.
//!
//! Results are rendered in plain decimal notation (exponent form only for very
//! large or very small magnitudes) and capped at 8 fractional digits.

use crate::error::CalcError;
use lazy_static::lazy_static;
use regex::Regex;

/// Literal shown on the display when a computation fails.
pub const ERROR_DISPLAY: &str = "Error";

/// Maximum number of digits kept after the decimal point.
const MAX_FRACTION_DIGITS: usize = 8;

lazy_static! {
    /// Longest numeric prefix of a display string, e.g. `"12.5("` -> `"12.5"`.
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap();
}

/// Format a computed value for the display.
///
/// NaN and infinities become [`ERROR_DISPLAY`]. Values with more than
/// 8 fractional digits are rounded to 8 places and rendered again, which
/// drops any trailing zeros the rounding produced.
pub fn format_display_number(value: f64) -> String {
    if !value.is_finite() {
        return ERROR_DISPLAY.to_string();
    }

    let rendered = render_number(value);
    match rendered.split_once('.') {
        Some((_, fraction)) if fraction.len() > MAX_FRACTION_DIGITS => {
            let rounded: f64 = format!("{:.*}", MAX_FRACTION_DIGITS, value)
                .parse()
                .unwrap_or(value);
            render_number(rounded)
        }
        _ => rendered,
    }
}

/// Format an evaluation outcome, passing error sentinels through unchanged.
pub fn format_display_result(result: Result<f64, CalcError>) -> String {
    match result {
        Ok(value) => format_display_number(value),
        Err(err) => err.sentinel().to_string(),
    }
}

/// Render a finite number in shortest round-trip form.
///
/// Integers print without a fractional part, magnitudes at or above 1e21 or
/// below 1e-6 use exponent form (`1e+21`, `1.5e-7`).
fn render_number(value: f64) -> String {
    if value == 0.0 {
        // Also covers negative zero.
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{:e}", value);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        };
    }

    format!("{}", value)
}

/// Parse the leading number of a display string.
///
/// Mirrors how a keypad display is read: `"5."` is 5, `"12("` is 12, and
/// text without a numeric prefix (such as `"Error"` or `"("`) is `None`.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let found = LEADING_NUMBER.find(text.trim_start())?;
    let number = found.as_str();
    let number = number.strip_suffix('.').unwrap_or(number);
    number.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_have_no_fraction() {
        assert_eq!(format_display_number(8.0), "8");
        assert_eq!(format_display_number(-42.0), "-42");
        assert_eq!(format_display_number(-0.0), "0");
    }

    #[test]
    fn test_long_fractions_are_rounded() {
        let third = format_display_number(1.0 / 3.0);
        assert_eq!(third, "0.33333333");
        assert_eq!(third.parse::<f64>().unwrap(), 0.33333333);
        assert_eq!(format_display_number(0.1 + 0.2), "0.3");
        assert_eq!(format_display_number(2.0 / 3.0), "0.66666667");
    }

    #[test]
    fn test_short_fractions_pass_through() {
        assert_eq!(format_display_number(2.5), "2.5");
        assert_eq!(format_display_number(0.12345678), "0.12345678");
    }

    #[test]
    fn test_non_finite_is_error() {
        assert_eq!(format_display_number(f64::NAN), "Error");
        assert_eq!(format_display_number(f64::INFINITY), "Error");
        assert_eq!(format_display_number(f64::NEG_INFINITY), "Error");
    }

    #[test]
    fn test_exponent_form() {
        assert_eq!(format_display_number(1e21), "1e+21");
        assert_eq!(format_display_number(1.5e-7), "1.5e-7");
    }

    #[test]
    fn test_sentinels_pass_through() {
        assert_eq!(
            format_display_result(Err(CalcError::Format("x".into()))),
            "Error: Format"
        );
        assert_eq!(format_display_result(Ok(4.0)), "4");
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("5."), Some(5.0));
        assert_eq!(parse_leading_number("12.5("), Some(12.5));
        assert_eq!(parse_leading_number("-3"), Some(-3.0));
        assert_eq!(parse_leading_number("1.5e-7"), Some(1.5e-7));
        assert_eq!(parse_leading_number("Error"), None);
        assert_eq!(parse_leading_number("("), None);
        assert_eq!(parse_leading_number(""), None);
    }
}
