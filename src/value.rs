//! Scalar values passed between templates.
//!
//! Positional arguments, parameters of nested expressions and resolved
//! sub-messages are all carried as [`Value`]s. Literal parameter text is
//! coerced into the narrowest numeric type it parses as, so a template like
//! `$(items,3)` hands the integer `3` to the nested lookup rather than the
//! string `"3"`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical value for message arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value; produced by an omitted parameter such as `$(code,,x)`.
    #[default]
    Nil,
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// String value.
    String(String),
}

impl Value {
    /// Returns the type name of the value as a string (for diagnostics).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Bool(_) => "Bool",
            Value::String(_) => "String",
        }
    }

    /// Returns true if the value is Nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns the contained integer if this is an Int value, else None.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the contained float if this is a Float value, else None.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns a reference to the contained string if this is a String value, else None.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerces literal parameter text into a typed value.
    ///
    /// Tries an integer first, then a finite float, and otherwise keeps the
    /// raw text (untrimmed) as a string.
    ///
    /// ```rust
    /// use nestmsg::Value;
    /// assert_eq!(Value::coerce_literal("42"), Value::Int(42));
    /// assert_eq!(Value::coerce_literal("4.5"), Value::Float(4.5));
    /// assert_eq!(Value::coerce_literal("4a"), Value::String("4a".into()));
    /// ```
    pub fn coerce_literal(text: &str) -> Value {
        let trimmed = text.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::Int(n);
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Float(n),
            _ => Value::String(text.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "null"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{n:.1}")
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}
