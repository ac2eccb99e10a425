//! Plumbing shared by the demo programs under `examples/`.

use std::io;
use std::process::ExitCode;

use cli_aid_core::{Cli, Outcome, ResolvedOptions, Shell};

/// Logs to stderr, filtered by `RUST_LOG` (default `cli_aid=warn`).
pub fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "cli_aid=warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Prints whatever `outcome` calls for and converts its exit code.
pub fn finish(cli: &Cli, outcome: &Outcome) -> ExitCode {
    match Shell::new(cli).report(outcome, &mut io::stdout(), &mut io::stderr()) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Pretty JSON for debugging output; falls back to `Debug` formatting.
pub fn pretty(options: &ResolvedOptions) -> String {
    serde_json::to_string_pretty(options).unwrap_or_else(|_| format!("{options:?}"))
}

/// `true` when the caller should run its own main logic.
pub fn is_idle(outcome: &Outcome) -> bool {
    matches!(outcome, Outcome::Idle | Outcome::UndeclaredFlag { .. })
}
