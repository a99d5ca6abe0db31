//! Binary operators and the unary advanced functions of the keypad.

use crate::error::CalcError;
use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;

/// A binary operator key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Remainder of the left operand divided by the right.
    Percent,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Percent,
    ];

    /// The glyph shown on the key and written into the expression line.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Percent => "%",
        }
    }

    /// Map a typed operator character, accepting ASCII and display variants.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' | '−' => Some(Self::Subtract),
            '*' | '×' | 'x' | 'X' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            '%' => Some(Self::Percent),
            _ => None,
        }
    }

    /// Apply the operator to two operands.
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        let value = match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide | Self::Percent if rhs == 0.0 => return Err(CalcError::DivisionByZero),
            Self::Divide => lhs / rhs,
            Self::Percent => lhs % rhs,
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(CalcError::NonFinite)
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// A unary function from the advanced functions panel.
///
/// Trigonometric inputs are in degrees and inverse trigonometric outputs are
/// converted back to degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdvancedFunction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Ln,
    Log10,
    Sqrt,
    Square,
    Pi,
    E,
}

impl AdvancedFunction {
    pub const ALL: [AdvancedFunction; 12] = [
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Asin,
        Self::Acos,
        Self::Atan,
        Self::Ln,
        Self::Log10,
        Self::Sqrt,
        Self::Square,
        Self::Pi,
        Self::E,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Ln => "ln",
            Self::Log10 => "log10",
            Self::Sqrt => "sqrt",
            Self::Square => "square",
            Self::Pi => "pi",
            Self::E => "e",
        }
    }

    /// Map an input value to the function result. May return NaN or an
    /// infinity for out-of-domain inputs; callers check finiteness.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sin => x.to_radians().sin(),
            Self::Cos => x.to_radians().cos(),
            Self::Tan => x.to_radians().tan(),
            Self::Asin => x.asin().to_degrees(),
            Self::Acos => x.acos().to_degrees(),
            Self::Atan => x.atan().to_degrees(),
            Self::Ln => x.ln(),
            Self::Log10 => x.log10(),
            Self::Sqrt => x.sqrt(),
            Self::Square => x.powi(2),
            Self::Pi => PI,
            Self::E => E,
        }
    }
}

impl fmt::Display for AdvancedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AdvancedFunction {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|func| func.name() == lower)
            .ok_or_else(|| CalcError::UnknownKey(s.to_string()))
    }
}
