//! Option schemas and resolution of a [`ParsedBag`] against them.
//!
//! A schema is an ordered list of [`SchemaEntry`] values. Each entry names an
//! option (canonical name first, then aliases) and optionally carries a
//! default, help text and a transform. [`resolve_against`] produces a
//! [`ResolvedOptions`] holding exactly one value slot per entry.
//!
//! # Example
//!
//! ```
//! use cli_aid_core::*;
//!
//! let schema = vec![
//!     SchemaEntry::new("max-count").with_alias("m").with_default(15),
//!     SchemaEntry::new("in-place").with_alias("i").with_default(false),
//!     SchemaEntry::new("output").with_alias("o"),
//! ];
//!
//! let bag = tokenize(&["-m", "3", "--in-place=true"], TokenizeConfig::default());
//! let resolved = resolve_against(&bag, &schema, true);
//!
//! assert_eq!(resolved.get("max-count"), Some(&Value::from(3)));
//! assert_eq!(resolved.get("maxCount"), Some(&Value::from(3)));
//! assert!(resolved.flag("in-place"));
//! assert!(resolved.contains("output"));
//! assert_eq!(resolved.get("output"), None);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::tokenizer::ParsedBag;
use crate::value::{Value, to_boolean, to_camel_case};

/// Canonical name of the built-in help option.
pub const HELP_KEY: &str = "help";
/// Canonical name of the built-in version option.
pub const VERSION_KEY: &str = "version";
/// Reserved key under which positionals are serialized.
pub const POSITIONALS_KEY: &str = "_";

/// Converts the raw string form of a found value into the option's value.
pub type Transform = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Stock transforms.
pub mod transform {
    use std::sync::Arc;

    use super::Transform;
    use crate::value::{Value, parse_finite_number};

    /// Keeps the raw text as a string.
    pub fn to_string() -> Transform {
        Arc::new(|raw: &str| Value::from(raw))
    }

    /// Parses the raw text as a number; non-numeric text becomes `NaN`.
    pub fn to_number() -> Transform {
        Arc::new(|raw: &str| Value::Number(parse_finite_number(raw).unwrap_or(f64::NAN)))
    }

    /// `"true"` and `""` are `true`, anything else `false`.
    pub fn to_boolean() -> Transform {
        Arc::new(|raw: &str| Value::Bool(raw == "true" || raw.is_empty()))
    }
}

/// One declared option.
///
/// Built with [`SchemaEntry::new`] and the `with_*` methods; the first name
/// is canonical, the rest are aliases.
///
/// # Examples
///
/// ```
/// use cli_aid_core::{SchemaEntry, Value};
///
/// let entry = SchemaEntry::new("max-count")
///     .with_alias("m")
///     .with_alias("c")
///     .with_default(15)
///     .with_help("The max compressing turns.");
///
/// assert_eq!(entry.canonical(), "max-count");
/// assert_eq!(entry.aliases(), ["m", "c"]);
/// assert!(entry.matches("c"));
/// assert_eq!(entry.default, Some(Value::from(15)));
/// ```
#[derive(Clone)]
pub struct SchemaEntry {
    names: Vec<String>,
    /// Value used when no alias appears on the command line.
    pub default: Option<Value>,
    /// One-line description shown in help output.
    pub help: String,
    transform: Option<Transform>,
}

impl SchemaEntry {
    /// Creates an entry with the given canonical name.
    pub fn new(name: &str) -> Self {
        Self {
            names: vec![name.to_string()],
            default: None,
            help: String::new(),
            transform: None,
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.names.push(alias.to_string());
        self
    }

    /// Adds several aliases in order.
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.names.extend(aliases.iter().map(|a| a.to_string()));
        self
    }

    /// Sets the default value. A boolean default makes the option boolean-typed.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Sets an explicit transform, replacing the default coercion.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// The first name; resolved values are keyed by it.
    pub fn canonical(&self) -> &str {
        &self.names[0]
    }

    /// Every name after the canonical one, in declaration order.
    pub fn aliases(&self) -> &[String] {
        &self.names[1..]
    }

    /// All names, canonical first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Checks whether `key` is the canonical name or any alias.
    pub fn matches(&self, key: &str) -> bool {
        self.names.iter().any(|name| name == key)
    }

    /// `true` when the default value is a boolean.
    pub fn is_boolean(&self) -> bool {
        matches!(self.default, Some(Value::Bool(_)))
    }

    /// Turns a found value into the option's value. `raw` holds the text of
    /// each occurrence, which is what a transform sees.
    fn coerce(&self, value: &Value, raw: &[String]) -> Value {
        if let Some(transform) = &self.transform {
            return match value {
                Value::Array(_) => {
                    Value::Array(raw.iter().map(|text| transform(text.as_str())).collect())
                }
                _ => transform(raw.last().map_or("", String::as_str)),
            };
        }
        if self.is_boolean() {
            return Value::Bool(to_boolean(value));
        }
        value.clone()
    }
}

impl fmt::Debug for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaEntry")
            .field("names", &self.names)
            .field("default", &self.default)
            .field("help", &self.help)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// The built-in `help` entry (`--help`, `-h`, `--docs`, `--帮助`).
pub fn help_entry() -> SchemaEntry {
    SchemaEntry::new(HELP_KEY)
        .with_aliases(&["h", "docs", "帮助"])
        .with_default(false)
        .with_help("Show this help information.")
}

/// The built-in `version` entry (`--version`, `-v`).
pub fn version_entry() -> SchemaEntry {
    SchemaEntry::new(VERSION_KEY)
        .with_alias("v")
        .with_default(false)
        .with_help("Show the version information.")
}

/// Entries every CLI starts with: help, then version.
pub fn default_schema() -> Vec<SchemaEntry> {
    vec![help_entry(), version_entry()]
}

/// camelCase aliases of hyphenated canonical names, computed once per schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    pairs: Vec<(String, String)>,
}

impl AliasTable {
    /// Only interior hyphens produce an alias; a camelCase form that equals
    /// another canonical name is skipped.
    pub fn from_schema(schema: &[SchemaEntry]) -> Self {
        let pairs = schema
            .iter()
            .map(SchemaEntry::canonical)
            .filter(|name| !name.starts_with('-') && name.contains('-'))
            .filter_map(|name| {
                let camel = to_camel_case(name);
                let taken = schema.iter().any(|entry| entry.canonical() == camel);
                (camel != name && !camel.is_empty() && !taken).then(|| (name.to_string(), camel))
            })
            .collect();
        Self { pairs }
    }

    /// The camelCase alias of `canonical`, if it has one.
    pub fn camel_for(&self, canonical: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == canonical)
            .map(|(_, camel)| camel.as_str())
    }

    /// `true` when no canonical name has a camelCase form.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Option values after resolution, keyed by canonical name.
///
/// Every schema entry has a slot; a slot is `None` when the option was
/// absent and has no default. Positionals travel alongside and serialize
/// under the reserved `_` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedOptions {
    entries: Vec<(String, Option<Value>)>,
    positionals: Vec<String>,
}

impl ResolvedOptions {
    /// An empty map with no positionals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `name`, or `None` if absent or unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slot(name).and_then(Option::as_ref)
    }

    /// `true` if `name` has a slot, even an unset one.
    pub fn contains(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    /// `true` only if `name` resolved to boolean `true`.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_true)
    }

    /// The value of `name` if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The value of `name` if it is a number.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// Sets a slot, replacing an existing one in place.
    pub fn set(&mut self, name: &str, value: Option<Value>) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Copies every slot of `other` over this one; `other`'s positionals win.
    pub fn overlay(&mut self, other: &ResolvedOptions) {
        for (name, value) in &other.entries {
            self.set(name, value.clone());
        }
        self.positionals = other.positionals.clone();
    }

    /// Slots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positional tokens, commands included.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Replaces the positional list.
    pub fn set_positionals(&mut self, positionals: Vec<String>) {
        self.positionals = positionals;
    }

    fn slot(&self, name: &str) -> Option<&Option<Value>> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

impl Serialize for ResolvedOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len() + 1))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(POSITIONALS_KEY, &self.positionals)?;
        map.end()
    }
}

/// Resolves `bag` against `schema`, computing camelCase aliases on the fly.
pub fn resolve_against(
    bag: &ParsedBag,
    schema: &[SchemaEntry],
    camel_case_expansion: bool,
) -> ResolvedOptions {
    let aliases = camel_case_expansion.then(|| AliasTable::from_schema(schema));
    resolve_with_aliases(bag, schema, aliases.as_ref())
}

/// Resolves `bag` against `schema` using a precomputed alias table.
///
/// Entries are processed in schema order: for each one the first bag key
/// (in insertion order) equal to any of its names supplies the raw value,
/// otherwise the default is used.
pub fn resolve_with_aliases(
    bag: &ParsedBag,
    schema: &[SchemaEntry],
    aliases: Option<&AliasTable>,
) -> ResolvedOptions {
    let mut resolved = ResolvedOptions::new();

    for entry in schema {
        let value = match bag.iter().find(|(key, _)| entry.matches(key)) {
            Some((key, found)) => Some(entry.coerce(found, bag.raw(key).unwrap_or_default())),
            None => entry.default.clone(),
        };

        let canonical = entry.canonical();
        let camel = aliases.and_then(|table| table.camel_for(canonical));
        resolved.set(canonical, value.clone());
        if let Some(camel) = camel {
            resolved.set(camel, value);
        }
    }

    resolved.set_positionals(bag.positionals().to_vec());
    resolved
}

/// Bag keys that match no name of any entry in `schema`.
pub fn undeclared_keys<'a>(bag: &'a ParsedBag, schema: &[SchemaEntry]) -> Vec<&'a str> {
    bag.keys()
        .filter(|key| !schema.iter().any(|entry| entry.matches(key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{TokenizeConfig, tokenize};

    fn bag(argv: &[&str]) -> ParsedBag {
        tokenize(argv, TokenizeConfig::default())
    }

    #[test]
    fn test_empty_argv_yields_defaults() {
        let mut schema = default_schema();
        schema.push(SchemaEntry::new("max-count").with_default(15));
        schema.push(SchemaEntry::new("key"));

        let resolved = resolve_against(&bag(&[]), &schema, false);

        assert_eq!(resolved.len(), 4);
        assert_eq!(resolved.get(HELP_KEY), Some(&Value::Bool(false)));
        assert_eq!(resolved.get(VERSION_KEY), Some(&Value::Bool(false)));
        assert_eq!(resolved.get("max-count"), Some(&Value::from(15)));
        assert!(resolved.contains("key"));
        assert_eq!(resolved.get("key"), None);
        assert!(resolved.positionals().is_empty());
    }

    #[test]
    fn test_boolean_normalization() {
        let schema = vec![SchemaEntry::new("in-place").with_alias("i").with_default(false)];

        for (arg, expected) in [
            ("--in-place=true", true),
            ("--in-place=false", false),
            ("--in-place=hello", false),
            ("--in-place=1", false),
            ("--in-place", true),
            ("-i", true),
        ] {
            let resolved = resolve_against(&bag(&[arg]), &schema, false);
            assert_eq!(resolved.flag("in-place"), expected, "{arg}");
        }
    }

    #[test]
    fn test_untyped_option_keeps_raw_value() {
        let schema = vec![SchemaEntry::new("in-place").with_alias("i")];
        let resolved = resolve_against(&bag(&["--in-place=true"]), &schema, false);
        assert_eq!(resolved.get("in-place"), Some(&Value::from("true")));
    }

    #[test]
    fn test_alias_lookup_uses_first_bag_key() {
        let schema = vec![SchemaEntry::new("output").with_aliases(&["o", "out"])];
        let resolved = resolve_against(&bag(&["--out=b", "-o=a"]), &schema, false);
        assert_eq!(resolved.get_str("output"), Some("b"));
    }

    #[test]
    fn test_transform_applies_to_string_form() {
        let schema = vec![
            SchemaEntry::new("name").with_transform(transform::to_string()),
            SchemaEntry::new("count").with_transform(transform::to_number()),
            SchemaEntry::new("dry").with_transform(transform::to_boolean()),
        ];
        let resolved = resolve_against(&bag(&["--name=42", "--count=7", "--dry"]), &schema, false);

        assert_eq!(resolved.get("name"), Some(&Value::from("42")));
        assert_eq!(resolved.get_f64("count"), Some(7.0));
        assert!(resolved.flag("dry"));
    }

    #[test]
    fn test_transform_sees_text_as_typed() {
        let schema = vec![
            SchemaEntry::new("zip").with_transform(transform::to_string()),
            SchemaEntry::new("ver").with_transform(transform::to_string()),
            SchemaEntry::new("big").with_transform(transform::to_string()),
        ];
        let resolved =
            resolve_against(&bag(&["--zip=007", "--ver", "1.50", "--big=1e3"]), &schema, false);

        assert_eq!(resolved.get_str("zip"), Some("007"));
        assert_eq!(resolved.get_str("ver"), Some("1.50"));
        assert_eq!(resolved.get_str("big"), Some("1e3"));
    }

    #[test]
    fn test_transform_maps_array_elements() {
        let schema = vec![SchemaEntry::new("x").with_transform(transform::to_string())];
        let config = TokenizeConfig {
            group_short_flags: true,
            duplicate_as_array: true,
        };
        let resolved = resolve_against(&tokenize(&["-x=01", "-x=2.0"], config), &schema, false);
        assert_eq!(
            resolved.get("x"),
            Some(&Value::Array(vec!["01".into(), "2.0".into()]))
        );
    }

    #[test]
    fn test_camel_case_expansion_keeps_hyphenated_key() {
        let schema = vec![
            SchemaEntry::new("max-count").with_default(15),
            SchemaEntry::new("verbose").with_default(false),
        ];
        let resolved = resolve_against(&bag(&["--max-count=3"]), &schema, true);

        assert_eq!(resolved.get("max-count"), Some(&Value::from(3)));
        assert_eq!(resolved.get("maxCount"), Some(&Value::from(3)));
        assert_eq!(resolved.len(), 3);

        let plain = resolve_against(&bag(&["--max-count=3"]), &schema, false);
        assert!(!plain.contains("maxCount"));
    }

    #[test]
    fn test_alias_table_skips_leading_hyphens_and_collisions() {
        let schema = vec![
            SchemaEntry::new("foo"),
            SchemaEntry::new("-foo"),
            SchemaEntry::new("dry-run"),
            SchemaEntry::new("dryRun"),
            SchemaEntry::new("max-count"),
        ];
        let table = AliasTable::from_schema(&schema);

        assert_eq!(table.camel_for("-foo"), None);
        assert_eq!(table.camel_for("dry-run"), None);
        assert_eq!(table.camel_for("max-count"), Some("maxCount"));
    }

    #[test]
    fn test_later_entry_overwrites_canonical_collision() {
        let schema = vec![
            SchemaEntry::new("mode").with_default("fast"),
            SchemaEntry::new("mode").with_default("slow"),
        ];
        let resolved = resolve_against(&bag(&[]), &schema, false);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.get_str("mode"), Some("slow"));
    }

    #[test]
    fn test_undeclared_keys() {
        let schema = default_schema();
        let parsed = bag(&["--help", "--debug", "---foo=1"]);
        assert_eq!(undeclared_keys(&parsed, &schema), ["debug", "-foo", "foo"]);
    }

    #[test]
    fn test_serialize_puts_positionals_last() {
        let schema = vec![SchemaEntry::new("key")];
        let resolved = resolve_against(&bag(&["a", "--key=k"]), &schema, false);
        let json = serde_json::to_string(&resolved).unwrap();
        assert_eq!(json, r#"{"key":"k","_":["a"]}"#);
    }
}
