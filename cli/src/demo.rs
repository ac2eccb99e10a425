//! The bundled tinify demo CLI.

use cli_aid_core::{Cli, Command, ParseSettings, ResolvedOptions, SchemaEntry};
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
struct Executed<'a> {
    command: &'a str,
    options: &'a ResolvedOptions,
}

/// Handler that prints the command name and its resolved options as one JSON line.
fn print_executed(name: &'static str) -> impl Fn(&ResolvedOptions) + Send + Sync + 'static {
    move |options: &ResolvedOptions| {
        let executed = Executed {
            command: name,
            options,
        };
        match serde_json::to_string(&executed) {
            Ok(json) => println!("{json}"),
            Err(err) => warn!(command = name, error = %err, "Failed to serialize options"),
        }
    }
}

pub fn tinify_cli(strict: bool) -> Cli {
    Cli::builder()
        .name("tinify")
        .version(env!("CARGO_PKG_VERSION"))
        .description("Compress images with the TinyPNG API.")
        .usage("tinify <IMG_URL_OR_LOCAL_IMG_PATH...> [OPTIONS]")
        .settings(ParseSettings {
            unknown_command_allowed: !strict,
            ..Default::default()
        })
        .option(
            SchemaEntry::new("key")
                .with_help("The Tinify key. Accessible at https://tinypng.com/developers."),
        )
        .option(
            SchemaEntry::new("output")
                .with_alias("o")
                .with_help("The compressed image file path."),
        )
        .option(
            SchemaEntry::new("max-count")
                .with_aliases(&["m", "c"])
                .with_default(15)
                .with_help("The max compressing turns. Default 15."),
        )
        .option(
            SchemaEntry::new("in-place")
                .with_alias("i")
                .with_default(false)
                .with_help("Overwrite the original image."),
        )
        .option(
            SchemaEntry::new("no-base64")
                .with_default(false)
                .with_help("Not output the base64 of the compressed image."),
        )
        .option(
            SchemaEntry::new("verbose")
                .with_default(false)
                .with_help("Show more information about each compressing turn."),
        )
        .command(
            Command::new("set-key")
                .with_usage("tinify set-key <key>")
                .with_help("Store the Tinify key for later runs.")
                .with_handler(print_executed("set-key")),
        )
        .command(
            Command::new("base64")
                .with_usage("tinify base64 <text>")
                .with_help("Output base64-encoded string of the input text.")
                .with_handler(print_executed("base64")),
        )
        .build()
}
