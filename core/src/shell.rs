//! Plain-text output and exit codes for parse outcomes.
//!
//! The router only returns an [`Outcome`]; [`Shell`] turns it into text on
//! caller-supplied writers and an exit code. Binaries typically do:
//!
//! ```no_run
//! use cli_aid_core::{Cli, Shell};
//!
//! let cli = Cli::builder().name("app").version("1.0.0").build();
//! let parsed = cli.parse_env();
//! let code = Shell::new(&cli)
//!     .report(&parsed.outcome, &mut std::io::stdout(), &mut std::io::stderr())
//!     .unwrap_or(1);
//! std::process::exit(code);
//! ```

use std::io::{self, Write};

use crate::command::Command;
use crate::router::{Cli, Outcome};

/// Renders help, version and diagnostics for a [`Cli`].
#[derive(Debug, Clone, Copy)]
pub struct Shell<'a> {
    cli: &'a Cli,
}

impl<'a> Shell<'a> {
    /// Renders output for `cli`.
    pub fn new(cli: &'a Cli) -> Self {
        Self { cli }
    }

    /// Global help: package header, usage lines, commands and options.
    ///
    /// ```
    /// use cli_aid_core::*;
    ///
    /// let cli = Cli::builder()
    ///     .name("tinify")
    ///     .version("1.0.0")
    ///     .command(Command::new("base64").with_help("Encode text.").with_handler(|_| {}))
    ///     .build();
    /// let help = Shell::new(&cli).help();
    ///
    /// assert!(help.starts_with("tinify/1.0.0"));
    /// assert!(help.contains("  tinify base64 [OPTIONS]\n"));
    /// assert!(help.contains("  --version, -v "));
    /// ```
    pub fn help(&self) -> String {
        let package = self.cli.package();
        let mut out = String::new();

        if let Some(name) = package.name.as_deref().filter(|n| !n.is_empty()) {
            out.push_str(&format!(
                "{name}/{}\n",
                package.version.as_deref().unwrap_or_default()
            ));
        }
        if let Some(description) = package.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("\n{description}\n"));
        }

        let commands: Vec<&Command> = self.cli.commands().collect();
        if !commands.is_empty() || !self.cli.usage().is_empty() {
            out.push_str("\nUsage\n");
            if !self.cli.usage().is_empty() {
                out.push_str(&format!("  {}\n", self.cli.usage()));
            }
            for command in &commands {
                out.push_str(&format!(
                    "  {}\n",
                    command.display_usage(package.name.as_deref())
                ));
            }
        }

        if !commands.is_empty() {
            out.push_str("\nCommands\n");
            let rows = commands.iter().map(|command| {
                let summary = if command.help.is_empty() {
                    command.usage.clone()
                } else {
                    command.help.clone()
                };
                (command.name.clone(), summary)
            });
            push_table(&mut out, rows.collect());
        }

        out.push_str("\nOptions\n");
        let rows = self.cli.schema().iter().map(|entry| {
            let mut key = format!("--{}", entry.canonical());
            for alias in entry.aliases() {
                key.push_str(&format!(", -{alias}"));
            }
            (key, entry.help.clone())
        });
        push_table(&mut out, rows.collect());

        out
    }

    /// Help for one command: its help text, then its usage.
    pub fn command_help(&self, command: &Command) -> String {
        let usage = command.display_usage(self.cli.package().name.as_deref());
        format!("{}\n\nUsage\n  {usage}\n", command.help)
    }

    /// `"<name>/<version> <os>-<arch>"`.
    pub fn version(&self) -> String {
        self.cli.package().version_line()
    }

    /// Writes whatever `outcome` calls for and returns the exit code.
    ///
    /// Help and version go to `out`; diagnostics go to `err`.
    pub fn report<O, E>(&self, outcome: &Outcome, out: &mut O, err: &mut E) -> io::Result<i32>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        match outcome {
            Outcome::ShowHelpRequested { command: Some(name) } => {
                match self.cli.find_command(name) {
                    Some(command) => write!(out, "{}", self.command_help(command))?,
                    None => write!(out, "{}", self.help())?,
                }
            }
            Outcome::ShowHelpRequested { command: None } => write!(out, "{}", self.help())?,
            Outcome::ShowVersionRequested => writeln!(out, "{}", self.version())?,
            Outcome::MissingRequiredFields { fields, usage } => {
                writeln!(err, "error: missing required fields: {}", fields.join(", "))?;
                writeln!(err)?;
                writeln!(err, "Usage")?;
                writeln!(err, "  {usage}")?;
            }
            Outcome::UnknownCommand { name } => {
                writeln!(err, "error: unknown command `{name}`")?;
                if let Some(program) = self.cli.package().name.as_deref() {
                    writeln!(err, "Run `{program} --help` to list the commands.")?;
                }
            }
            Outcome::UndeclaredFlag { keys } => {
                writeln!(err, "warning: undeclared options: {}", keys.join(", "))?;
            }
            Outcome::CommandExecuted { .. } | Outcome::Idle => {}
        }
        Ok(exit_code(outcome))
    }
}

/// `1` for failure outcomes, `0` otherwise.
pub fn exit_code(outcome: &Outcome) -> i32 {
    if outcome.is_failure() { 1 } else { 0 }
}

fn push_table(out: &mut String, rows: Vec<(String, String)>) {
    let width = rows
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);
    for (key, value) in rows {
        let line = format!("  {key:<width$}    {value}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
}
