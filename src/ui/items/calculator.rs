//! Calculator display rendering.
//!
//! Renders the display as two right-aligned lines:
//! - The expression line, muted, above
//! - The shown value, or `Error`, below

use crate::calculator::Calculator;
use crate::ui::DISPLAY_WIDTH;

/// Render the calculator display.
pub fn render_calculator(calc: &Calculator) -> String {
    let value = calc.shown_value();
    let width = DISPLAY_WIDTH.max(value.chars().count());

    format!(
        "{:>width$}\n{:>width$}",
        calc.expression(),
        value,
        width = width
    )
}
