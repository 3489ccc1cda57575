use std::fmt;

use crate::LpError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, LpError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(LpError::NonFinite { what, value: v })
    }
}

/// Loosely typed input accepted by `set_value` / `set_state`.
///
/// Scripts and readback paths hand values over as numbers, integers, flags or
/// numeric-looking text; channels coerce them with [`NumericInput::to_real`]
/// or [`NumericInput::to_flag`].
#[derive(Debug, Clone, PartialEq)]
pub enum NumericInput {
    Real(Real),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl NumericInput {
    /// Coerce to a finite real number. Text is trimmed and parsed as a float.
    pub fn to_real(&self) -> Result<Real, LpError> {
        let value = match self {
            Self::Real(v) => *v,
            Self::Int(i) => *i as Real,
            Self::Bool(b) => Real::from(u8::from(*b)),
            Self::Text(s) => s.trim().parse::<Real>().map_err(|_| LpError::Coercion {
                what: "number",
                input: s.clone(),
            })?,
        };
        ensure_finite(value, "numeric input")
    }

    /// Coerce to a flag through an integer: `"0"`/`"1"`, `0`/`1` and
    /// `false`/`true` are interchangeable. Reals are truncated toward zero.
    pub fn to_flag(&self) -> Result<bool, LpError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Int(i) => Ok(*i != 0),
            Self::Real(v) => Ok(ensure_finite(*v, "flag input")?.trunc() != 0.0),
            Self::Text(s) => parse_integer_flag(s).ok_or_else(|| LpError::Coercion {
                what: "integer flag",
                input: s.clone(),
            }),
        }
    }
}

/// Integer text of any magnitude: optional sign, then ASCII digits.
fn parse_integer_flag(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.bytes().any(|b| b != b'0'))
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(v) => write!(f, "{v}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<Real> for NumericInput {
    fn from(v: Real) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for NumericInput {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for NumericInput {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for NumericInput {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for NumericInput {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn real_coercion_accepts_numeric_text() {
        assert_eq!(NumericInput::from(" 2.5 ").to_real().unwrap(), 2.5);
        assert_eq!(NumericInput::from("1e3").to_real().unwrap(), 1000.0);
        assert_eq!(NumericInput::from(3_i64).to_real().unwrap(), 3.0);
        assert_eq!(NumericInput::from(true).to_real().unwrap(), 1.0);
    }

    #[test]
    fn real_coercion_rejects_garbage_and_nan() {
        assert!(matches!(
            NumericInput::from("volts").to_real(),
            Err(LpError::Coercion { .. })
        ));
        assert!(matches!(
            NumericInput::from("nan").to_real(),
            Err(LpError::NonFinite { .. })
        ));
        assert!(NumericInput::from(Real::INFINITY).to_real().is_err());
    }

    #[test]
    fn flag_coercion_goes_through_integer() {
        for input in [
            NumericInput::from("1"),
            NumericInput::from(1_i64),
            NumericInput::from(true),
            NumericInput::from(" +7 "),
            NumericInput::from(1.9),
        ] {
            assert!(input.to_flag().unwrap(), "{input} should be true");
        }
        for input in [
            NumericInput::from("0"),
            NumericInput::from("-0"),
            NumericInput::from(0_i64),
            NumericInput::from(false),
            NumericInput::from(0.7),
        ] {
            assert!(!input.to_flag().unwrap(), "{input} should be false");
        }
    }

    #[test]
    fn flag_coercion_rejects_non_integer_text() {
        for text in ["true", "1.0", "", "  ", "0x1"] {
            assert!(NumericInput::from(text).to_flag().is_err(), "{text:?}");
        }
        assert!(NumericInput::from(Real::NAN).to_flag().is_err());
    }
}
