//! Raw argument vector → flat key/value bag.
//!
//! [`tokenize`] makes a single left-to-right pass over the tokens with one
//! token of lookahead. It knows nothing about schemas: every flag it sees is
//! stored under the key written on the command line, and every other token
//! becomes a positional.
//!
//! Keys keep their case and any leading hyphens beyond the first two, so
//! `---foo` lands in both a `-foo` bucket and the fully-stripped `foo`
//! bucket. With [`TokenizeConfig::duplicate_as_array`] set, repeated keys
//! accumulate into arrays per bucket:
//!
//! ```
//! use cli_aid_core::{TokenizeConfig, Value, tokenize};
//!
//! let config = TokenizeConfig { group_short_flags: true, duplicate_as_array: true };
//! let bag = tokenize(&["--foo=3", "---foo=4", "---foo=4"], config);
//!
//! assert_eq!(bag.get("foo"), Some(&Value::Array(vec![3.into(), 4.into(), 4.into()])));
//! assert_eq!(bag.get("-foo"), Some(&Value::Array(vec![4.into(), 4.into()])));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::value::{Value, coerce_raw};

/// `-xy`, `-xyz=value`: one hyphen, then at least two non-hyphen non-`=` chars.
static SHORT_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^-([^-=]{2,})(?:=(.*))?$").expect("static regex must compile")
});

/// Tokenizer switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeConfig {
    /// Explode `-xy` into `-x -y`.
    pub group_short_flags: bool,
    /// Accumulate repeated keys into arrays instead of overwriting.
    pub duplicate_as_array: bool,
}

impl Default for TokenizeConfig {
    fn default() -> Self {
        Self {
            group_short_flags: true,
            duplicate_as_array: false,
        }
    }
}

/// Flags and positionals produced by [`tokenize`].
///
/// Flag entries are kept in first-insertion order; looking a key up by any
/// schema alias walks them in that order. Next to each coerced value the bag
/// keeps the text every occurrence was written as, so option transforms can
/// see `007` rather than the number `7`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBag {
    flags: Vec<FlagSlot>,
    positionals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct FlagSlot {
    key: String,
    value: Value,
    raw: Vec<String>,
}

impl ParsedBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.slot(key).map(|slot| &slot.value)
    }

    /// The uncoerced text of every occurrence stored under `key`, in scan
    /// order. A flag given without a value is recorded as `"true"`.
    ///
    /// ```
    /// use cli_aid_core::{TokenizeConfig, Value, tokenize};
    ///
    /// let bag = tokenize(&["--zip=007"], TokenizeConfig::default());
    /// assert_eq!(bag.get("zip"), Some(&Value::from(7)));
    /// assert_eq!(bag.raw("zip"), Some(&["007".to_string()][..]));
    /// ```
    pub fn raw(&self, key: &str) -> Option<&[String]> {
        self.slot(key).map(|slot| slot.raw.as_slice())
    }

    /// Keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|slot| slot.key.as_str())
    }

    /// Key/value pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.flags.iter().map(|slot| (slot.key.as_str(), &slot.value))
    }

    /// Number of flag keys.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// `true` when no flags were seen (positionals are not counted).
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Positional tokens in scan order.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Stores `value`, written on the command line as `raw`, under `key`
    /// following the duplicate-accumulation rule.
    ///
    /// Without `duplicate_as_array`, or when `key` is new, the value is set
    /// (overwriting). Otherwise the existing value becomes an array and
    /// `value` is appended to it.
    pub fn store(&mut self, key: &str, value: Value, raw: &str, duplicate_as_array: bool) {
        match self.flags.iter_mut().find(|slot| slot.key == key) {
            None => self.flags.push(FlagSlot {
                key: key.to_string(),
                value,
                raw: vec![raw.to_string()],
            }),
            Some(slot) if duplicate_as_array => {
                let mut items = std::mem::replace(&mut slot.value, Value::Bool(false)).into_array();
                items.push(value);
                slot.value = Value::Array(items);
                slot.raw.push(raw.to_string());
            }
            Some(slot) => {
                slot.value = value;
                slot.raw = vec![raw.to_string()];
            }
        }
    }

    fn slot(&self, key: &str) -> Option<&FlagSlot> {
        self.flags.iter().find(|slot| slot.key == key)
    }
}

impl Serialize for ParsedBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.flags.len() + 1))?;
        for slot in &self.flags {
            map.serialize_entry(&slot.key, &slot.value)?;
        }
        map.serialize_entry("_", &self.positionals)?;
        map.end()
    }
}

/// Tokenizes an argument vector (program name already removed).
///
/// # Examples
///
/// ```
/// use cli_aid_core::{TokenizeConfig, Value, tokenize};
///
/// let argv = "hello -x 1 -x 2 world -- --for --bar=baz -a".split(' ').collect::<Vec<_>>();
/// let bag = tokenize(&argv, TokenizeConfig::default());
///
/// assert_eq!(bag.get("x"), Some(&Value::Number(2.0)));
/// assert_eq!(bag.positionals(), ["hello", "world", "--for", "--bar=baz", "-a"]);
/// ```
pub fn tokenize<S: AsRef<str>>(tokens: &[S], config: TokenizeConfig) -> ParsedBag {
    let mut stream: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
    let mut bag = ParsedBag::new();
    let mut idx = 0;

    while idx < stream.len() {
        let token = stream[idx].clone();

        if token == "--" {
            bag.positionals.extend(stream.drain(idx + 1..));
            break;
        }

        if config.group_short_flags {
            if let Some(exploded) = explode_short_group(&token) {
                stream.splice(idx..=idx, exploded);
                continue;
            }
        }

        if !is_flag(&token) {
            bag.positionals.push(token);
            idx += 1;
            continue;
        }

        let inline = token
            .split_once('=')
            .map(|(key, raw)| (key.to_string(), coerce_raw(raw), raw.to_string()));
        let (raw_key, value, raw) = match inline {
            Some(triple) => {
                idx += 1;
                triple
            }
            None => match stream.get(idx + 1) {
                Some(next) if !next.starts_with('-') => {
                    let (value, raw) = (coerce_raw(next), next.clone());
                    idx += 2;
                    (token, value, raw)
                }
                _ => {
                    idx += 1;
                    (token, Value::Bool(true), "true".to_string())
                }
            },
        };

        let normalized = strip_two_hyphens(&raw_key);
        bag.store(normalized, value.clone(), &raw, config.duplicate_as_array);
        if normalized.starts_with('-') {
            let fully_stripped = raw_key.trim_start_matches('-');
            bag.store(fully_stripped, value, &raw, config.duplicate_as_array);
        }
    }

    debug!(
        flags = bag.len(),
        positionals = bag.positionals.len(),
        "Tokenized argument vector"
    );
    bag
}

// A lone `-` (or any hyphen-only token other than `--`) has no key and is
// kept as a positional.
fn is_flag(token: &str) -> bool {
    token.starts_with('-') && !token.trim_start_matches('-').is_empty()
}

fn strip_two_hyphens(key: &str) -> &str {
    let key = key.strip_prefix('-').unwrap_or(key);
    key.strip_prefix('-').unwrap_or(key)
}

fn explode_short_group(token: &str) -> Option<Vec<String>> {
    let caps = SHORT_GROUP.captures(token)?;
    let letters = caps.get(1)?.as_str();
    let mut exploded: Vec<String> = letters.chars().map(|ch| format!("-{ch}")).collect();
    if let Some(value) = caps.get(2) {
        exploded.push(value.as_str().to_string());
    }
    Some(exploded)
}
