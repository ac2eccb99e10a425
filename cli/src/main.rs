mod demo;

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand};
use cli_aid_core::{Outcome, Shell, TokenizeConfig, parse_usage, tokenize};
use serde::Serialize;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cli-aid")]
#[command(about = "Inspect how argv is tokenized, aligned and dispatched")]
#[command(version)]
struct Cli {
    /// Enable debug logging for the parsing engine.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tokenize raw arguments into flag entries and positionals.
    Tokenize(TokenizeArgs),
    /// Align positionals against a usage template.
    Usage(UsageArgs),
    /// Run arguments through the bundled tinify demo CLI.
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Keep `-xy` as a single `xy` flag instead of `-x -y`.
    #[arg(long)]
    no_group_short_flags: bool,
    /// Collect repeated flags into arrays.
    #[arg(long)]
    duplicate_as_array: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to parse, after `--`.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct UsageArgs {
    /// Usage template, e.g. "tinify set-key <key> <mode>".
    #[arg(long)]
    template: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Positional arguments, after `--`.
    #[arg(last = true)]
    positionals: Vec<String>,
}

#[derive(Debug, Args)]
struct DemoArgs {
    /// Reject positionals that name no command.
    #[arg(long)]
    strict: bool,
    /// Arguments passed to the demo CLI, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Tokenize(args) => run_tokenize(args),
        Command::Usage(args) => run_usage(args),
        Command::Demo(args) => run_demo(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "cli_aid=debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "cli_aid=warn".to_string())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let config = TokenizeConfig {
        group_short_flags: !args.no_group_short_flags,
        duplicate_as_array: args.duplicate_as_array,
    };
    let bag = tokenize(&args.tokens, config);
    print_formatted(&bag, args.format)
}

fn run_usage(args: UsageArgs) -> Result<(), String> {
    let usage = parse_usage(&args.template, &args.positionals);
    print_formatted(&usage, args.format)
}

fn run_demo(args: DemoArgs) -> Result<(), String> {
    let cli = demo::tinify_cli(args.strict);
    let parsed = cli.parse(&args.args);

    let code = Shell::new(&cli)
        .report(&parsed.outcome, &mut io::stdout(), &mut io::stderr())
        .map_err(|err| format!("Failed to write output: {err}"))?;

    if matches!(
        parsed.outcome,
        Outcome::Idle | Outcome::UndeclaredFlag { .. }
    ) {
        print_formatted(&parsed, CliOutputFormat::Json)?;
    }

    io::stdout()
        .flush()
        .map_err(|err| format!("Failed to flush stdout: {err}"))?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn print_formatted<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            println!("{json}");
        }
        CliOutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value)
                .map_err(|e| format!("Failed to serialize output: {e}"))?;
            print!("{yaml}");
        }
    }
    Ok(())
}
