//! Computed cell values.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::format::format_number;

/// Error results produced by formula evaluation.
///
/// These are data, not faults: they are stored in caches and shown in cells
/// like any other value.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum FormulaError {
    /// Division by zero, or any arithmetic result that is not finite.
    Div0,
    /// An operand could not be interpreted as a number.
    Value,
    /// A reference to a position outside the addressable range.
    Ref,
}

impl FormulaError {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaError::Div0 => "#DIV/0!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Ref => "#REF!",
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The computed result of a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
    Error(FormulaError),
}

impl Value {
    /// An empty text value, the value of a cell with no content.
    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Interpret this value as a formula operand.
    ///
    /// - Numbers are used as-is.
    /// - Empty text counts as 0.
    /// - Text holding a decimal literal (surrounding whitespace allowed) uses that number.
    /// - Any other text is a `#VALUE!` error.
    /// - Errors come back as-is. [`Formula`](super::Formula) reports a
    ///   referenced error as `#VALUE!`.
    pub fn as_number(&self) -> Result<f64, FormulaError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Text(s) if s.is_empty() => Ok(0.0),
            Value::Text(s) => parse_decimal(s).ok_or(FormulaError::Value),
            Value::Error(e) => Err(*e),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<FormulaError> for Value {
    fn from(e: FormulaError) -> Self {
        Value::Error(e)
    }
}

impl From<Result<f64, FormulaError>> for Value {
    fn from(result: Result<f64, FormulaError>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Error(e) => write!(f, "{}", e),
        }
    }
}

fn decimal_re() -> &'static Regex {
    static DECIMAL_RE: OnceLock<Regex> = OnceLock::new();
    DECIMAL_RE.get_or_init(|| {
        Regex::new(r"^\s*-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE]-?[1-9][0-9]*)?\s*$")
            .expect("decimal literal regex must compile")
    })
}

/// Parse text as a plain decimal literal. Forms `f64::from_str` also takes,
/// such as "inf" or "+1", are rejected.
fn parse_decimal(text: &str) -> Option<f64> {
    if !decimal_re().is_match(text) {
        return None;
    }
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(FormulaError::Div0.to_string(), "#DIV/0!");
        assert_eq!(FormulaError::Value.to_string(), "#VALUE!");
        assert_eq!(FormulaError::Ref.to_string(), "#REF!");
        assert_eq!(Value::Error(FormulaError::Ref).to_string(), "#REF!");
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Number(14.0).to_string(), "14");
        assert_eq!(Value::Text("hello".into()).to_string(), "hello");
        assert_eq!(Value::empty().to_string(), "");
    }

    #[test]
    fn test_as_number_accepts_decimal_text() {
        assert_eq!(Value::Text("42".into()).as_number(), Ok(42.0));
        assert_eq!(Value::Text(" -1.5 ".into()).as_number(), Ok(-1.5));
        assert_eq!(Value::Text("2e3".into()).as_number(), Ok(2000.0));
        assert_eq!(Value::Text("1.5E-2".into()).as_number(), Ok(0.015));
        assert_eq!(Value::Text("0.25".into()).as_number(), Ok(0.25));
    }

    #[test]
    fn test_as_number_rejects_non_numeric_text() {
        for text in ["abc", "1a", "inf", "NaN", "01", "1.", "+3", "1 2", "1e+5", "1e05", "1e0", "1e"] {
            assert_eq!(
                Value::Text(text.into()).as_number(),
                Err(FormulaError::Value),
                "text {:?}",
                text
            );
        }
    }

    #[test]
    fn test_as_number_empty_and_errors() {
        assert_eq!(Value::empty().as_number(), Ok(0.0));
        assert_eq!(
            Value::Error(FormulaError::Div0).as_number(),
            Err(FormulaError::Div0)
        );
    }
}
