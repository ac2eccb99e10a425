//! Minimal client: two global options and one command.
//!
//! ```text
//! cargo run -p cli-aid-demos --example tinify_client -- base64 logo.png -i
//! ```

use std::process::ExitCode;

use cli_aid_core::{Cli, Command, SchemaEntry};
use cli_aid_demos::{finish, init_tracing, pretty};

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::builder()
        .name("tinify-client-cli")
        .version("2.0.0")
        .option(
            SchemaEntry::new("max-count")
                .with_alias("m")
                .with_default(15)
                .with_help("The max compressing turns. Default 15."),
        )
        .option(
            SchemaEntry::new("in-place")
                .with_alias("i")
                .with_default(false)
                .with_help("Overwrite the original image. Default false."),
        )
        .command(
            Command::new("base64")
                .with_usage("tinify-client-cli base64 <IMG_URL_OR_LOCAL_IMG_PATH>")
                .with_help("output base64-encoded string of the input image")
                .with_handler(|options| {
                    println!("output base64 with options: {}", pretty(options));
                }),
        )
        .build();

    let parsed = cli.parse_env();
    finish(&cli, &parsed.outcome)
}
