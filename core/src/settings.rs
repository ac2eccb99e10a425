//! Parse settings.
//!
//! [`ParseSettings`] deserializes from the same camelCase record shape the
//! settings have always been written in:
//!
//! ```
//! use cli_aid_core::ParseSettings;
//!
//! let settings: ParseSettings =
//!     serde_json::from_str(r#"{ "unknownCommandAllowed": false }"#).unwrap();
//! assert!(!settings.unknown_command_allowed);
//! assert!(settings.group_short_flags);
//! ```

use serde::{Deserialize, Serialize};

use crate::tokenizer::TokenizeConfig;

/// Switches controlling tokenizing, resolution and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseSettings {
    /// Explode `-xy` into `-x -y`.
    pub group_short_flags: bool,
    /// Accumulate repeated flags into arrays.
    pub duplicate_as_array: bool,
    /// Also expose `max-count` as `maxCount`.
    pub camel_case_expansion: bool,
    /// When `false`, a positional that names no command is an error.
    pub unknown_command_allowed: bool,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            group_short_flags: true,
            duplicate_as_array: false,
            camel_case_expansion: true,
            unknown_command_allowed: true,
        }
    }
}

impl ParseSettings {
    /// The tokenizer half of the settings.
    pub fn tokenize_config(&self) -> TokenizeConfig {
        TokenizeConfig {
            group_short_flags: self.group_short_flags,
            duplicate_as_array: self.duplicate_as_array,
        }
    }
}
