//! Usage-template extraction.
//!
//! A usage template is a whitespace-separated line such as
//! `"tinify set-key <key> <mode> [location]"`:
//!
//! - the first word is the program name,
//! - the literal words after it (up to the first `<`, `[` or `-` token) are
//!   fixed command words,
//! - `<name>` is a required positional, `<name...>` a required rest
//!   positional,
//! - `[name]` is optional and never extracted.
//!
//! [`parse_usage`] aligns the required placeholders with the positional
//! arguments of an invocation and reports which ones are missing.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::value::Value;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^>]+?)>").expect("static regex must compile"));

const REST_SUFFIX: &str = "...";

/// A required placeholder extracted from a usage template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageField {
    /// Field name with any `...` suffix removed.
    pub name: String,
    /// `true` for `<name...>`.
    pub is_rest: bool,
}

/// Result of aligning a usage template against positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageMatch {
    /// Required field names in template order.
    pub required_fields: Vec<String>,
    /// Aligned values: a string (or `None` when absent) for plain fields,
    /// an array of strings for rest fields.
    pub required_values: BTreeMap<String, Option<Value>>,
    /// Required fields with no positional to fill them, in template order.
    pub missing_fields: Vec<String>,
}

impl UsageMatch {
    /// Returns the aligned value for `field`, if one was supplied.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.required_values.get(field).and_then(Option::as_ref)
    }

    /// `true` when every required field was supplied.
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}

/// Checks that every `<` is closed by a `>` before the next `<` opens.
pub fn is_well_formed(template: &str) -> bool {
    let mut open = false;
    for ch in template.chars() {
        match ch {
            '<' if open => return false,
            '<' => open = true,
            '>' if !open => return false,
            '>' => open = false,
            _ => {}
        }
    }
    !open
}

/// Extracts the required placeholders of `template` in left-to-right order.
///
/// Malformed templates (unbalanced angle brackets) yield no fields.
///
/// # Examples
///
/// ```
/// use cli_aid_core::extract_fields;
///
/// let fields = extract_fields("tinify <filename> <imgs...> [OPTIONS]");
/// assert_eq!(fields.len(), 2);
/// assert_eq!(fields[1].name, "imgs");
/// assert!(fields[1].is_rest);
///
/// assert!(extract_fields("tinify <filename").is_empty());
/// ```
pub fn extract_fields(template: &str) -> Vec<UsageField> {
    if !is_well_formed(template) {
        return Vec::new();
    }

    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            let raw = m.as_str();
            match raw.strip_suffix(REST_SUFFIX) {
                Some(name) => UsageField {
                    name: name.to_string(),
                    is_rest: true,
                },
                None => UsageField {
                    name: raw.to_string(),
                    is_rest: false,
                },
            }
        })
        .collect()
}

/// Counts the fixed command words of `template`, excluding the program name.
///
/// # Examples
///
/// ```
/// use cli_aid_core::command_word_count;
///
/// assert_eq!(command_word_count("tinify set-key <key> <mode>"), 1);
/// assert_eq!(command_word_count("go run -v <f1> [f2]"), 1);
/// assert_eq!(command_word_count("tinify <imgs...>"), 0);
/// ```
pub fn command_word_count(template: &str) -> usize {
    template
        .split_whitespace()
        .take_while(|word| !word.starts_with(['<', '[', '-']))
        .count()
        .saturating_sub(1)
}

/// Aligns the required fields of `template` against `positionals`.
///
/// The i-th required field reads positional `command_word_count + i`; a rest
/// field takes everything from there on. Fields whose aligned index is at or
/// beyond the number of positionals are reported missing.
///
/// # Examples
///
/// ```
/// use cli_aid_core::{Value, parse_usage};
///
/// let usage = parse_usage("tinify <filename> <imgs...>", &["a.txt", "1.png", "2.png"]);
/// assert!(usage.is_complete());
/// assert_eq!(usage.value("filename"), Some(&Value::from("a.txt")));
/// assert_eq!(
///     usage.value("imgs"),
///     Some(&Value::Array(vec!["1.png".into(), "2.png".into()])),
/// );
///
/// let empty: [&str; 0] = [];
/// let usage = parse_usage("tinify <filename> <imgs...>", &empty);
/// assert_eq!(usage.missing_fields, ["filename", "imgs"]);
/// ```
pub fn parse_usage<S: AsRef<str>>(template: &str, positionals: &[S]) -> UsageMatch {
    let fields = extract_fields(template);
    let offset = command_word_count(template);

    let mut required_values = BTreeMap::new();
    for (idx, field) in fields.iter().enumerate() {
        let at = offset + idx;
        let value = if field.is_rest {
            let rest = positionals.get(at..).unwrap_or_default();
            Some(Value::Array(
                rest.iter().map(|p| Value::from(p.as_ref())).collect(),
            ))
        } else {
            positionals.get(at).map(|p| Value::from(p.as_ref()))
        };
        required_values.insert(field.name.clone(), value);
    }

    let available = positionals.len().saturating_sub(offset);
    let missing_fields = fields
        .iter()
        .skip(available)
        .map(|field| field.name.clone())
        .collect();

    UsageMatch {
        required_fields: fields.into_iter().map(|field| field.name).collect(),
        required_values,
        missing_fields,
    }
}
