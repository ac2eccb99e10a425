//! Sub-commands.

use std::fmt;
use std::sync::Arc;

use crate::error::RegistrationError;
use crate::schema::{ResolvedOptions, SchemaEntry, help_entry};

/// Callback run when a command is dispatched.
pub type Handler = Arc<dyn Fn(&ResolvedOptions) + Send + Sync>;

/// A named sub-command with its own usage template and option schema.
///
/// # Examples
///
/// ```
/// use cli_aid_core::{Command, SchemaEntry};
///
/// let cmd = Command::new("base64")
///     .with_usage("tinify base64 <text>")
///     .with_help("Output base64-encoded string of the input text.")
///     .with_option(SchemaEntry::new("verbose").with_alias("v"))
///     .with_handler(|options| {
///         let _text = options.get_str("text");
///     });
///
/// assert_eq!(cmd.name, "base64");
/// assert!(cmd.handler().is_some());
/// // built-in help first, then the declared options
/// assert_eq!(cmd.effective_schema().len(), 2);
/// ```
#[derive(Clone)]
pub struct Command {
    /// Name matched against the first positional.
    pub name: String,
    /// Usage template, e.g. `"tinify set-key <key> <mode>"`.
    pub usage: String,
    /// One-line description.
    pub help: String,
    /// Command-specific options.
    pub options: Vec<SchemaEntry>,
    handler: Option<Handler>,
}

impl Command {
    /// Creates a command with no usage, help, options or handler.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            usage: String::new(),
            help: String::new(),
            options: Vec::new(),
            handler: None,
        }
    }

    /// Sets the usage template; its `<field>` placeholders become required
    /// positionals.
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    /// Sets the one-line description shown in help output.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Declares an option that only this command resolves.
    pub fn with_option(mut self, entry: SchemaEntry) -> Self {
        self.options.push(entry);
        self
    }

    /// Sets the callback run on dispatch. Without one, dispatch is a no-op.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ResolvedOptions) + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// The dispatch callback, if one was set.
    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// The built-in help entry followed by the command's own options.
    pub fn effective_schema(&self) -> Vec<SchemaEntry> {
        std::iter::once(help_entry())
            .chain(self.options.iter().cloned())
            .collect()
    }

    /// The usage template, or `"<program> <name> [OPTIONS]"` when none was given.
    pub fn display_usage(&self, program: Option<&str>) -> String {
        if !self.usage.is_empty() {
            return self.usage.clone();
        }
        match program {
            Some(program) if !program.is_empty() => format!("{program} {} [OPTIONS]", self.name),
            _ => format!("{} [OPTIONS]", self.name),
        }
    }

    /// Checks that the command can be registered: its name must not be empty.
    pub fn check_registration(&self) -> Result<(), RegistrationError> {
        if self.name.is_empty() {
            return Err(RegistrationError::EmptyCommandName);
        }
        Ok(())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("help", &self.help)
            .field("options", &self.options)
            .field("handler", &self.handler.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_checks() {
        let ok = Command::new("base64").with_handler(|_| {});
        assert_eq!(ok.check_registration(), Ok(()));

        let unnamed = Command::new("").with_handler(|_| {});
        assert_eq!(
            unnamed.check_registration(),
            Err(RegistrationError::EmptyCommandName)
        );

        let no_handler = Command::new("ls").with_usage("app ls <dir>");
        assert_eq!(no_handler.check_registration(), Ok(()));
        assert!(no_handler.handler().is_none());

        assert_eq!(Command::new(" ").check_registration(), Ok(()));
    }

    #[test]
    fn test_display_usage_fallback() {
        let cmd = Command::new("base64");
        assert_eq!(cmd.display_usage(Some("tinify")), "tinify base64 [OPTIONS]");
        assert_eq!(cmd.display_usage(None), "base64 [OPTIONS]");

        let cmd = cmd.with_usage("tinify base64 <text>");
        assert_eq!(cmd.display_usage(Some("tinify")), "tinify base64 <text>");
    }
}
