//! Configuration validation.
//!
//! Run when a [`CliBuilder`](crate::CliBuilder) is frozen. Problems found here
//! never fail the build: resolution already has a defined behavior for each
//! of them (later duplicates win, malformed templates extract no fields), so
//! they are reported as warnings.
//!
//! # Examples
//!
//! ```
//! use cli_aid_core::*;
//!
//! let schema = vec![SchemaEntry::new("mode"), SchemaEntry::new("mode")];
//! assert_eq!(
//!     validate_schema("global", &schema),
//!     vec![ValidationError::DuplicateOption { scope: "global".into(), name: "mode".into() }],
//! );
//!
//! assert!(validate_usage("global", "tinify <imgs...> [OPTIONS]").is_empty());
//! assert!(!validate_usage("global", "tinify <imgs").is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::command::Command;
use crate::schema::SchemaEntry;
use crate::usage::is_well_formed;

/// A configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two entries in the same schema share a canonical name.
    #[error("duplicate option `{name}` in {scope} schema; the later declaration wins")]
    DuplicateOption { scope: String, name: String },
    /// Option declared with an empty canonical name.
    #[error("option with an empty name in {scope} schema")]
    EmptyOptionName { scope: String },
    /// Usage template with unbalanced angle brackets.
    #[error("malformed usage template for {scope}: {usage}")]
    MalformedUsage { scope: String, usage: String },
}

/// Checks a schema for empty and duplicate canonical names.
pub fn validate_schema(scope: &str, schema: &[SchemaEntry]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for entry in schema {
        let name = entry.canonical();
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyOptionName {
                scope: scope.to_string(),
            });
            continue;
        }
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateOption {
                scope: scope.to_string(),
                name: name.to_string(),
            });
        }
    }

    errors
}

/// Checks that a usage template's placeholders are balanced.
pub fn validate_usage(scope: &str, usage: &str) -> Vec<ValidationError> {
    if is_well_formed(usage) {
        Vec::new()
    } else {
        vec![ValidationError::MalformedUsage {
            scope: scope.to_string(),
            usage: usage.to_string(),
        }]
    }
}

/// Validates a command's own options and usage template.
pub fn validate_command(command: &Command) -> Vec<ValidationError> {
    let scope = format!("command `{}`", command.name);
    let mut errors = validate_schema(&scope, &command.effective_schema());
    errors.extend(validate_usage(&scope, &command.usage));
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_default_schema() {
        assert!(validate_schema("global", &crate::schema::default_schema()).is_empty());
    }

    #[test]
    fn test_reports_empty_name() {
        let errors = validate_schema("global", &[SchemaEntry::new("")]);
        assert_eq!(
            errors,
            vec![ValidationError::EmptyOptionName {
                scope: "global".into()
            }]
        );
    }

    #[test]
    fn test_command_redeclaring_help_is_reported() {
        let cmd = Command::new("base64").with_option(SchemaEntry::new("help"));
        let errors = validate_command(&cmd);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::DuplicateOption { name, .. } if name == "help"
        ));
    }

    #[test]
    fn test_command_with_malformed_usage() {
        let cmd = Command::new("base64").with_usage("tinify base64 <text");
        let errors = validate_command(&cmd);
        assert_eq!(
            errors,
            vec![ValidationError::MalformedUsage {
                scope: "command `base64`".into(),
                usage: "tinify base64 <text".into(),
            }]
        );
    }
}
