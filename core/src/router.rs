//! CLI configuration and top-level dispatch.
//!
//! A [`CliBuilder`] accumulates package metadata, settings, global options
//! and commands. [`CliBuilder::build`] freezes them into an immutable
//! [`Cli`], whose [`parse`](Cli::parse) runs the whole pipeline
//! (tokenize → resolve → route) and returns a [`Parsed`] value carrying the
//! resolved options and a tagged [`Outcome`]. Nothing here prints or exits;
//! that is left to the caller (see [`Shell`](crate::Shell)).
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use cli_aid_core::*;
//!
//! let seen = Arc::new(Mutex::new(None));
//! let sink = Arc::clone(&seen);
//!
//! let cli = Cli::builder()
//!     .name("app")
//!     .option(SchemaEntry::new("verbose").with_default(false))
//!     .command(
//!         Command::new("base64")
//!             .with_usage("app base64 <text>")
//!             .with_handler(move |options| {
//!                 *sink.lock().unwrap() = options.get_str("text").map(String::from);
//!             }),
//!     )
//!     .build();
//!
//! let parsed = cli.parse(&["base64", "hello"]);
//! assert_eq!(parsed.outcome, Outcome::CommandExecuted { name: "base64".into() });
//! assert_eq!(seen.lock().unwrap().as_deref(), Some("hello"));
//!
//! let parsed = cli.parse(&["base64"]);
//! assert_eq!(
//!     parsed.outcome,
//!     Outcome::MissingRequiredFields {
//!         fields: vec!["text".into()],
//!         usage: "app base64 <text>".into(),
//!     },
//! );
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::command::Command;
use crate::error::RegistrationError;
use crate::package::PackageInfo;
use crate::schema::{
    AliasTable, HELP_KEY, ResolvedOptions, SchemaEntry, VERSION_KEY, default_schema,
    resolve_with_aliases, undeclared_keys,
};
use crate::settings::ParseSettings;
use crate::tokenizer::{ParsedBag, tokenize};
use crate::usage::parse_usage;
use crate::validate::{ValidationError, validate_command, validate_schema, validate_usage};

/// Positional that requests help, globally or after a command name.
pub const HELP_COMMAND: &str = "help";
/// Positional that requests the version.
pub const VERSION_COMMAND: &str = "version";

/// Terminal state of one [`Cli::parse`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A command matched and its handler ran.
    CommandExecuted { name: String },
    /// Help was requested; `command` is set for command-specific help.
    ShowHelpRequested { command: Option<String> },
    /// The version was requested.
    ShowVersionRequested,
    /// Required `<name>` positionals were not supplied.
    MissingRequiredFields { fields: Vec<String>, usage: String },
    /// A positional named no command while unknown commands are disallowed.
    UnknownCommand { name: String },
    /// Flags matched no declared option. Advisory.
    UndeclaredFlag { keys: Vec<String> },
    /// Nothing to do; the caller consumes the options itself.
    Idle,
}

impl Outcome {
    /// `true` for outcomes that should end the process unsuccessfully.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Outcome::MissingRequiredFields { .. } | Outcome::UnknownCommand { .. }
        )
    }
}

/// Result of [`Cli::parse`].
///
/// `options` holds the global resolution, or, when a command matched, the
/// global values overlaid by the command's own options and its required
/// positional fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parsed {
    pub options: ResolvedOptions,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Fluent CLI configuration.
#[derive(Debug, Default)]
pub struct CliBuilder {
    package: PackageInfo,
    usage: Option<String>,
    settings: ParseSettings,
    options: Vec<SchemaEntry>,
    commands: Vec<Command>,
    rejected: Vec<RegistrationError>,
}

impl CliBuilder {
    /// An empty configuration; same as [`Cli::builder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges package metadata; fields not set in `package` are kept.
    pub fn package(mut self, package: PackageInfo) -> Self {
        self.package.merge(package);
        self
    }

    /// Sets the program name used in usage and version lines.
    pub fn name(mut self, name: &str) -> Self {
        self.package.name = Some(name.to_string());
        self
    }

    /// Sets the version reported for `--version`.
    pub fn version(mut self, version: &str) -> Self {
        self.package.version = Some(version.to_string());
        self
    }

    /// Sets the description shown in the help text.
    pub fn description(mut self, description: &str) -> Self {
        self.package.description = Some(description.to_string());
        self
    }

    /// Sets the top-level usage template. Defaults to `"<name> [OPTIONS]"`.
    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_string());
        self
    }

    /// Replaces the engine switches.
    pub fn settings(mut self, settings: ParseSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Declares a global option after the built-in `help` and `version`.
    pub fn option(mut self, entry: SchemaEntry) -> Self {
        self.options.push(entry);
        self
    }

    /// Declares several global options in order.
    pub fn options(mut self, entries: impl IntoIterator<Item = SchemaEntry>) -> Self {
        self.options.extend(entries);
        self
    }

    /// Registers a command.
    ///
    /// Commands with an empty name are dropped with a warning and recorded
    /// in [`rejected`](CliBuilder::rejected). Registering an existing name
    /// replaces that command in place.
    pub fn command(mut self, command: Command) -> Self {
        if let Err(err) = command.check_registration() {
            warn!(error = %err, "Dropping command registration");
            self.rejected.push(err);
            return self;
        }

        match self.commands.iter_mut().find(|c| c.name == command.name) {
            Some(existing) => {
                debug!(command = %command.name, "Replacing command registration");
                *existing = command;
            }
            None => self.commands.push(command),
        }
        self
    }

    /// Registrations dropped so far.
    pub fn rejected(&self) -> &[RegistrationError] {
        &self.rejected
    }

    /// Freezes the configuration.
    pub fn build(self) -> Cli {
        let camel = self.settings.camel_case_expansion;

        let mut schema = default_schema();
        schema.extend(self.options);
        let usage = self.usage.unwrap_or_else(|| self.package.default_usage());

        let mut warnings = validate_schema("global", &schema);
        warnings.extend(validate_usage("global", &usage));

        let commands: Vec<RegisteredCommand> = self
            .commands
            .into_iter()
            .map(|command| {
                warnings.extend(validate_command(&command));
                RegisteredCommand::new(command, camel)
            })
            .collect();

        for warning in &warnings {
            warn!(%warning, "Invalid CLI configuration");
        }

        Cli {
            aliases: camel.then(|| AliasTable::from_schema(&schema)),
            package: self.package,
            usage,
            settings: self.settings,
            schema,
            commands,
            warnings,
            rejected: self.rejected,
        }
    }
}

#[derive(Debug)]
struct RegisteredCommand {
    command: Command,
    schema: Vec<SchemaEntry>,
    aliases: Option<AliasTable>,
}

impl RegisteredCommand {
    fn new(command: Command, camel_case_expansion: bool) -> Self {
        let schema = command.effective_schema();
        let aliases = camel_case_expansion.then(|| AliasTable::from_schema(&schema));
        Self {
            command,
            schema,
            aliases,
        }
    }
}

/// Immutable CLI configuration produced by [`CliBuilder::build`].
///
/// `parse` takes `&self` and keeps no state between calls.
#[derive(Debug)]
pub struct Cli {
    package: PackageInfo,
    usage: String,
    settings: ParseSettings,
    schema: Vec<SchemaEntry>,
    aliases: Option<AliasTable>,
    commands: Vec<RegisteredCommand>,
    warnings: Vec<ValidationError>,
    rejected: Vec<RegistrationError>,
}

impl Cli {
    /// Starts a configuration with the built-in help and version options.
    pub fn builder() -> CliBuilder {
        CliBuilder::new()
    }

    /// Program metadata used for help and version output.
    pub fn package(&self) -> &PackageInfo {
        &self.package
    }

    /// Top-level usage template.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Engine switches in effect.
    pub fn settings(&self) -> &ParseSettings {
        &self.settings
    }

    /// Global schema: built-in entries first, then declared options.
    pub fn schema(&self) -> &[SchemaEntry] {
        &self.schema
    }

    /// Commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter().map(|registered| &registered.command)
    }

    /// The registered command called `name`.
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.find_registered(name).map(|registered| &registered.command)
    }

    /// Configuration problems found at build time.
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Command registrations that were dropped.
    pub fn rejected(&self) -> &[RegistrationError] {
        &self.rejected
    }

    /// Parses the process arguments, skipping the program name.
    pub fn parse_env(&self) -> Parsed {
        let argv: Vec<String> = std::env::args().skip(1).collect();
        self.parse(&argv)
    }

    /// Tokenizes, resolves and routes `argv` (program name already removed).
    pub fn parse<S: AsRef<str>>(&self, argv: &[S]) -> Parsed {
        let bag = tokenize(argv, self.settings.tokenize_config());
        let global = resolve_with_aliases(&bag, &self.schema, self.aliases.as_ref());

        let command = bag
            .positionals()
            .first()
            .and_then(|name| self.find_registered(name));
        if let Some(registered) = command {
            return self.dispatch_command(registered, &bag, global);
        }

        let outcome = self.dispatch_global(&bag, &global);
        Parsed {
            options: global,
            outcome,
        }
    }

    fn dispatch_command(
        &self,
        registered: &RegisteredCommand,
        bag: &ParsedBag,
        global: ResolvedOptions,
    ) -> Parsed {
        let command = &registered.command;
        let positionals = bag.positionals();
        let own = resolve_with_aliases(bag, &registered.schema, registered.aliases.as_ref());
        let usage = parse_usage(&command.usage, positionals);

        let help_requested = global.flag(HELP_KEY)
            || own.flag(HELP_KEY)
            || positionals.get(1).is_some_and(|p| p == HELP_COMMAND);

        let mut options = global;
        options.overlay(&own);

        if help_requested {
            debug!(command = %command.name, "Command help requested");
            return Parsed {
                options,
                outcome: Outcome::ShowHelpRequested {
                    command: Some(command.name.clone()),
                },
            };
        }

        if !usage.is_complete() {
            debug!(
                command = %command.name,
                missing = ?usage.missing_fields,
                "Missing required fields"
            );
            return Parsed {
                options,
                outcome: Outcome::MissingRequiredFields {
                    fields: usage.missing_fields,
                    usage: command.display_usage(self.package.name.as_deref()),
                },
            };
        }

        for (field, value) in usage.required_values {
            options.set(&field, value);
        }

        debug!(command = %command.name, "Dispatching command");
        if let Some(handler) = command.handler() {
            handler(&options);
        }

        Parsed {
            options,
            outcome: Outcome::CommandExecuted {
                name: command.name.clone(),
            },
        }
    }

    fn dispatch_global(&self, bag: &ParsedBag, global: &ResolvedOptions) -> Outcome {
        let positionals = bag.positionals();
        let first = positionals.first().map(String::as_str);

        if global.flag(HELP_KEY) || first == Some(HELP_COMMAND) {
            debug!("Global help requested");
            return Outcome::ShowHelpRequested { command: None };
        }

        if global.flag(VERSION_KEY) || first == Some(VERSION_COMMAND) {
            debug!("Version requested");
            return Outcome::ShowVersionRequested;
        }

        if let Some(name) = first {
            if !self.settings.unknown_command_allowed {
                warn!(command = %name, "Unknown command");
                return Outcome::UnknownCommand {
                    name: name.to_string(),
                };
            }
        }

        if positionals.is_empty() {
            let usage = parse_usage(&self.usage, positionals);
            if !usage.is_complete() {
                debug!(missing = ?usage.missing_fields, "Missing required fields");
                return Outcome::MissingRequiredFields {
                    fields: usage.missing_fields,
                    usage: self.usage.clone(),
                };
            }
        }

        let undeclared = undeclared_keys(bag, &self.schema);
        if !undeclared.is_empty() {
            warn!(keys = ?undeclared, "Undeclared flags");
            return Outcome::UndeclaredFlag {
                keys: undeclared.into_iter().map(String::from).collect(),
            };
        }

        Outcome::Idle
    }

    fn find_registered(&self, name: &str) -> Option<&RegisteredCommand> {
        self.commands
            .iter()
            .find(|registered| registered.command.name == name)
    }
}
