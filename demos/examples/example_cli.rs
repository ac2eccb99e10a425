//! A tour of the engine: global options, commands with required fields and
//! a command that shadows the built-in `version` positional.
//!
//! ```text
//! cargo run -p cli-aid-demos --example example_cli -- a.png b.png -c 3
//! cargo run -p cli-aid-demos --example example_cli -- base64 hello -v
//! cargo run -p cli-aid-demos --example example_cli -- set-key abc fast
//! cargo run -p cli-aid-demos --example example_cli -- --help
//! ```

use std::process::ExitCode;

use base64::{Engine, prelude::BASE64_STANDARD};
use cli_aid_core::{Cli, Command, PackageInfo, ParseSettings, SchemaEntry};
use cli_aid_demos::{finish, init_tracing, is_idle, pretty};

const NAME: &str = "example-cli";
const VERSION: &str = "7.0.0";

fn build() -> Cli {
    let mut package = PackageInfo::new(NAME, VERSION);
    package.description = Some("A example cli to show you the power of cli-aid.".into());

    Cli::builder()
        .settings(ParseSettings {
            unknown_command_allowed: true,
            ..Default::default()
        })
        .package(package)
        .usage("tinify <IMG_URL_OR_LOCAL_IMG_PATH...> [OPTIONS]")
        .option(
            SchemaEntry::new("dry-run").with_default(false).with_help(
                "Does everything compress would do except actually compressing. \
                 Reports the details of what would have been compressed.",
            ),
        )
        .option(
            SchemaEntry::new("max-count")
                .with_aliases(&["m", "c"])
                .with_default(15)
                .with_help("The max compressing turns. Default 15."),
        )
        .option(
            SchemaEntry::new("verbose")
                .with_default(false)
                .with_help("Show detailed information about the process of compressing."),
        )
        // one required field and a verbose option
        .command(
            Command::new("base64")
                .with_usage("tinify base64 <text>")
                .with_help("Output base64-encoded string of the input text.")
                .with_option(
                    SchemaEntry::new("verbose")
                        .with_alias("v")
                        .with_help("Show detailed information."),
                )
                .with_handler(|options| {
                    let text = options
                        .get("text")
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    println!("output base64 for text \"{text}\"");
                    println!("{}", BASE64_STANDARD.encode(text.as_bytes()));

                    if options.flag("verbose") {
                        println!();
                        println!("options: {}", pretty(options));
                    }
                }),
        )
        // two required fields
        .command(
            Command::new("set-key")
                .with_usage("tinify set-key <key> <mode>")
                .with_help("Set the tinify key.")
                .with_option(SchemaEntry::new("verbose"))
                .with_handler(|options| {
                    println!(
                        "set-key to \"{}\" with mode \"{}\"",
                        options.get_str("key").unwrap_or_default(),
                        options.get_str("mode").unwrap_or_default(),
                    );
                    println!();
                    println!("options: {}", pretty(options));
                }),
        )
        // a custom version command
        .command(
            Command::new("version")
                .with_usage(&format!("{NAME} version"))
                .with_help(&format!("Print {NAME} version."))
                .with_option(
                    SchemaEntry::new("verbose")
                        .with_alias("v")
                        .with_help("Show detailed information."),
                )
                .with_handler(|options| {
                    if options.flag("verbose") {
                        println!(
                            "{NAME}@{VERSION} {}-{}",
                            std::env::consts::OS,
                            std::env::consts::ARCH
                        );
                    } else {
                        println!("{NAME}@{VERSION}");
                    }
                }),
        )
        .build()
}

fn main() -> ExitCode {
    init_tracing();

    let cli = build();
    let parsed = cli.parse_env();
    let code = finish(&cli, &parsed.outcome);
    if !is_idle(&parsed.outcome) {
        return code;
    }

    let argv = &parsed.options;
    let max_count = argv
        .get("max-count")
        .map(ToString::to_string)
        .unwrap_or_default();
    println!(
        "start compressing {:?} with max-count: {max_count} and dry-run flag set to {} \
         and verbose flag set to {}",
        argv.positionals(),
        argv.flag("dry-run"),
        argv.flag("verbose"),
    );
    if argv.flag("verbose") {
        println!("\nargv: {}", pretty(argv));
    }
    code
}
