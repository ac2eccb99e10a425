//! Option values and the coercion rules shared by the tokenizer and the
//! schema resolver.
//!
//! Every flag value the engine produces is a [`Value`]: a boolean, a number,
//! a string, or an array of those (when duplicate flags accumulate). The
//! helpers in this module are the single source of truth for how raw token
//! text becomes a typed value.

use std::fmt;

use serde::{Serialize, Serializer};

/// A parsed option value.
///
/// # Examples
///
/// ```
/// use cli_aid_core::Value;
///
/// assert_eq!(Value::from(3).to_string(), "3");
/// assert_eq!(Value::from(0.5).to_string(), "0.5");
/// assert_eq!(Value::from("x").as_str(), Some("x"));
/// assert!(Value::from(true).is_true());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A switch, or a flag with no value.
    Bool(bool),
    /// A finite number.
    Number(f64),
    /// Anything that was neither empty nor numeric.
    String(String),
    /// Accumulated duplicates.
    Array(Vec<Value>),
}

impl Value {
    /// Returns the boolean if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number if this is a [`Value::Number`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string slice if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is a [`Value::Array`].
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// `true` only for `Value::Bool(true)`.
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Wraps a scalar into a one-element vector; arrays are returned as-is.
    pub fn into_array(self) -> Vec<Value> {
        match self {
            Value::Array(items) => items,
            other => vec![other],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => match whole_number(*n) {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match whole_number(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

// Integral values inside the exactly-representable range print and
// serialize without a fractional part.
fn whole_number(n: f64) -> Option<i64> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        Some(n as i64)
    } else {
        None
    }
}

/// Coerces the raw text of a flag value.
///
/// The exact empty string is the boolean `true` sentinel, finite numeric text
/// becomes a number, and everything else (whitespace-only text included)
/// stays a string.
///
/// # Examples
///
/// ```
/// use cli_aid_core::{Value, coerce_raw};
///
/// assert_eq!(coerce_raw(""), Value::Bool(true));
/// assert_eq!(coerce_raw("31"), Value::Number(31.0));
/// assert_eq!(coerce_raw(" "), Value::String(" ".into()));
/// assert_eq!(coerce_raw("===1"), Value::String("===1".into()));
/// ```
pub fn coerce_raw(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Bool(true);
    }
    match parse_finite_number(raw) {
        Some(n) => Value::Number(n),
        None => Value::String(raw.to_string()),
    }
}

/// Parses the trimmed text as a finite `f64`.
///
/// Whitespace-only text, `inf` and `NaN` spellings are rejected.
pub fn parse_finite_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Boolean normalization for boolean-typed options.
///
/// `true`, the string `"true"` and the empty string are `true`; every other
/// value is `false`.
///
/// # Examples
///
/// ```
/// use cli_aid_core::{Value, to_boolean};
///
/// assert!(to_boolean(&Value::Bool(true)));
/// assert!(to_boolean(&Value::from("true")));
/// assert!(!to_boolean(&Value::from("hello")));
/// assert!(!to_boolean(&Value::from(1)));
/// ```
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s.is_empty(),
        _ => false,
    }
}

/// Converts a hyphenated option name to camelCase (`max-count` → `maxCount`).
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
