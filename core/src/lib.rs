//! Argument tokenizing, option resolution and command dispatch for CLIs.
//!
//! The pipeline has four stages, each usable on its own:
//!
//! - [`tokenize`]: turns raw argv tokens into a [`ParsedBag`] of flag
//!   entries and positionals (short-flag grouping, `--` termination,
//!   hyphen-depth duplicate accumulation, value coercion).
//! - [`parse_usage`]: aligns positionals against a usage template such as
//!   `"tinify set-key <key> <mode>"` and reports missing `<fields>`.
//! - [`resolve_against`]: resolves a bag against an ordered [`SchemaEntry`]
//!   list into [`ResolvedOptions`] keyed by canonical names.
//! - [`Cli::parse`]: routes a whole invocation to a registered [`Command`],
//!   a help or version request, or a diagnostic, as a tagged [`Outcome`].
//!
//! [`Shell`] renders outcomes as text and maps them to exit codes.
//!
//! # Example
//!
//! ```
//! use cli_aid_core::*;
//!
//! let cli = Cli::builder()
//!     .name("tinify")
//!     .version("1.0.0")
//!     .usage("tinify <IMG_URL_OR_LOCAL_IMG_PATH...> [OPTIONS]")
//!     .option(
//!         SchemaEntry::new("max-count")
//!             .with_aliases(&["m", "c"])
//!             .with_default(15)
//!             .with_help("The max compressing turns."),
//!     )
//!     .build();
//!
//! let parsed = cli.parse(&["a.png", "b.png", "-m", "3"]);
//! assert_eq!(parsed.outcome, Outcome::Idle);
//! assert_eq!(parsed.options.get_f64("maxCount"), Some(3.0));
//! assert_eq!(parsed.options.positionals(), ["a.png", "b.png"]);
//!
//! assert_eq!(cli.parse(&["--help"]).outcome, Outcome::ShowHelpRequested { command: None });
//! ```

mod command;
mod error;
mod package;
mod router;
mod schema;
mod settings;
mod shell;
mod tokenizer;
mod usage;
mod validate;
mod value;

pub use command::{Command, Handler};
pub use error::RegistrationError;
pub use package::PackageInfo;
pub use router::{Cli, CliBuilder, HELP_COMMAND, Outcome, Parsed, VERSION_COMMAND};
pub use schema::{
    AliasTable, HELP_KEY, POSITIONALS_KEY, ResolvedOptions, SchemaEntry, Transform, VERSION_KEY,
    default_schema, help_entry, resolve_against, resolve_with_aliases, transform,
    undeclared_keys, version_entry,
};
pub use settings::ParseSettings;
pub use shell::{Shell, exit_code};
pub use tokenizer::{ParsedBag, TokenizeConfig, tokenize};
pub use usage::{
    UsageField, UsageMatch, command_word_count, extract_fields, is_well_formed, parse_usage,
};
pub use validate::{ValidationError, validate_command, validate_schema, validate_usage};
pub use value::{Value, coerce_raw, parse_finite_number, to_boolean, to_camel_case};
