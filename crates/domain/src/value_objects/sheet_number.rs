//! Numeric-or-blank sheet values.
//!
//! Numeric sheet fields hold either a number or nothing. A blank number is
//! stored as the empty string `""`, matching rows already in the table.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// A numeric sheet value that may be blank.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SheetNumber {
    #[default]
    Blank,
    Value(Number),
}

impl SheetNumber {
    /// Parses user-typed input.
    ///
    /// Input is trimmed first. Returns `None` for empty or non-numeric input
    /// and for non-finite values. Integral input stays integral.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(int) = trimmed.parse::<i64>() {
            return Some(Self::Value(int.into()));
        }
        let float: f64 = trimmed.parse().ok()?;
        if !float.is_finite() {
            return None;
        }
        Some(Self::from_f64(float))
    }

    /// Parses user input, substituting `fallback` when it is not a number.
    ///
    /// Coercion never fails: each field names its own fallback.
    pub fn coerce(input: &str, fallback: SheetNumber) -> SheetNumber {
        Self::parse(input).unwrap_or(fallback)
    }

    fn from_f64(value: f64) -> Self {
        // Whole floats below 2^53 are stored as integers
        if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
            return Self::Value((value as i64).into());
        }
        Number::from_f64(value).map_or(Self::Blank, Self::Value)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Blank => None,
            Self::Value(n) => n.as_f64(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Blank => None,
            Self::Value(n) => n.as_i64(),
        }
    }
}

impl From<i64> for SheetNumber {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl fmt::Display for SheetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Value(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for SheetNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Blank => serializer.serialize_str(""),
            Self::Value(n) => n.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for SheetNumber {
    /// Accepts numbers and numeric strings; anything else is blank.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => Self::Value(n),
            Value::String(s) => Self::parse(&s).unwrap_or_default(),
            _ => Self::Blank,
        })
    }
}
