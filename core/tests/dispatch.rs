//! End-to-end parsing scenarios through the public API.

use std::sync::{Arc, Mutex};

use cli_aid_core::*;

const LOGO_URL: &str =
    "https://gw.alipayobjects.com/mdn/member_frontWeb/afts/img/A*h7o9Q4g2KiUAAAAAAAAAAABkARQnAQ";

fn tinify_options() -> Vec<SchemaEntry> {
    vec![
        SchemaEntry::new("key")
            .with_help("The Tinify key. Accessible at https://tinypng.com/developers."),
        SchemaEntry::new("src").with_help("Image url or local image path to compress."),
        SchemaEntry::new("output")
            .with_alias("o")
            .with_help("The compressed image file path."),
        SchemaEntry::new("max-count")
            .with_alias("m")
            .with_default(15)
            .with_help("The max compressing turns. Default 15."),
        SchemaEntry::new("verbose")
            .with_default(false)
            .with_help("Show more information about each compressing turn."),
        SchemaEntry::new("no-base64")
            .with_default(false)
            .with_help("Not output the base64 of the compressed image."),
        SchemaEntry::new("debug").with_help("Show the parsed CLI params."),
    ]
}

/// Captures the options a handler was called with.
fn recorder() -> (Arc<Mutex<Vec<ResolvedOptions>>>, impl Fn(&ResolvedOptions) + Send + Sync) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    (calls, move |options: &ResolvedOptions| {
        sink.lock().unwrap().push(options.clone())
    })
}

#[test]
fn test_minimal_cli_yields_builtin_defaults() {
    let parsed = Cli::builder().build().parse::<&str>(&[]);

    assert_eq!(parsed.outcome, Outcome::Idle);
    assert_eq!(
        serde_json::to_value(&parsed.options).unwrap(),
        serde_json::json!({ "help": false, "version": false, "_": [] })
    );
}

#[test]
fn test_declared_options_resolve_with_defaults() {
    let cli = Cli::builder()
        .name("tinify-client")
        .version("2.0.0")
        .options(tinify_options())
        .settings(ParseSettings {
            camel_case_expansion: false,
            ..Default::default()
        })
        .build();

    let parsed = cli.parse(&[LOGO_URL, "--output=./alipay-logo-2.png", "--debug"]);

    assert_eq!(parsed.outcome, Outcome::Idle);
    assert_eq!(
        serde_json::to_value(&parsed.options).unwrap(),
        serde_json::json!({
            "help": false,
            "version": false,
            "key": null,
            "src": null,
            "output": "./alipay-logo-2.png",
            "max-count": 15,
            "verbose": false,
            "no-base64": false,
            "debug": true,
            "_": [LOGO_URL],
        })
    );
}

#[test]
fn test_camel_case_keys_mirror_hyphenated_ones() {
    let cli = Cli::builder().options(tinify_options()).build();
    let parsed = cli.parse(&["-m", "3", "--no-base64"]);

    assert_eq!(parsed.options.get_f64("max-count"), Some(3.0));
    assert_eq!(parsed.options.get_f64("maxCount"), Some(3.0));
    assert!(parsed.options.flag("noBase64"));
    assert!(!parsed.options.contains("outputPath"));
}

#[test]
fn test_boolean_option_normalization() {
    let cli = Cli::builder()
        .option(
            SchemaEntry::new("in-place")
                .with_alias("i")
                .with_default(false),
        )
        .build();

    for (token, expected) in [
        ("--in-place=true", true),
        ("--in-place=false", false),
        ("--in-place=hello", false),
        ("-i", true),
    ] {
        let parsed = cli.parse(&[LOGO_URL, token]);
        assert_eq!(parsed.options.flag("in-place"), expected, "{token}");
        assert_eq!(parsed.options.positionals(), [LOGO_URL]);
    }
}

#[test]
fn test_untyped_option_keeps_string() {
    let cli = Cli::builder()
        .option(SchemaEntry::new("in-place").with_alias("i"))
        .build();
    let parsed = cli.parse(&[LOGO_URL, "--in-place=true"]);
    assert_eq!(parsed.options.get("in-place"), Some(&Value::from("true")));
}

#[test]
fn test_command_handler_receives_merged_options() {
    let (calls, handler) = recorder();
    let cli = Cli::builder()
        .option(SchemaEntry::new("verbose"))
        .command(
            Command::new("base64")
                .with_usage("example-cli base64 <IMG_URL_OR_LOCAL_IMG_PATH>")
                .with_help("output base64-encoded string of the input image")
                .with_handler(handler),
        )
        .build();

    let parsed = cli.parse(&["base64", "https://example.com/example.png"]);
    assert_eq!(
        parsed.outcome,
        Outcome::CommandExecuted {
            name: "base64".into()
        }
    );

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let options = &calls[0];
    assert!(options.contains("verbose"));
    assert!(!options.flag("help"));
    assert_eq!(
        options.get_str("IMG_URL_OR_LOCAL_IMG_PATH"),
        Some("https://example.com/example.png")
    );
    assert_eq!(
        options.positionals(),
        ["base64", "https://example.com/example.png"]
    );
}

#[test]
fn test_base64_dispatch_and_missing_text() {
    let (calls, handler) = recorder();
    let cli = Cli::builder()
        .name("app")
        .command(
            Command::new("base64")
                .with_usage("app base64 <text>")
                .with_handler(handler),
        )
        .build();

    let parsed = cli.parse(&["base64", "hello"]);
    assert!(!parsed.outcome.is_failure());
    assert_eq!(calls.lock().unwrap().len(), 1);
    assert_eq!(calls.lock().unwrap()[0].get_str("text"), Some("hello"));

    let parsed = cli.parse(&["base64"]);
    assert_eq!(
        parsed.outcome,
        Outcome::MissingRequiredFields {
            fields: vec!["text".into()],
            usage: "app base64 <text>".into(),
        }
    );
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn test_multi_field_command_reports_all_missing() {
    let (calls, handler) = recorder();
    let cli = Cli::builder()
        .command(
            Command::new("set-key")
                .with_usage("tinify set-key <key> <mode>")
                .with_handler(handler),
        )
        .build();

    let outcome = cli.parse(&["set-key"]).outcome;
    assert_eq!(
        outcome,
        Outcome::MissingRequiredFields {
            fields: vec!["key".into(), "mode".into()],
            usage: "tinify set-key <key> <mode>".into(),
        }
    );

    let outcome = cli.parse(&["set-key", "abc"]).outcome;
    assert!(matches!(
        outcome,
        Outcome::MissingRequiredFields { ref fields, .. } if fields == &["mode"]
    ));

    cli.parse(&["set-key", "abc", "fast"]);
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].get_str("key"), Some("abc"));
    assert_eq!(calls[0].get_str("mode"), Some("fast"));
}

#[test]
fn test_rest_field_collects_remaining_positionals() {
    let (calls, handler) = recorder();
    let cli = Cli::builder()
        .command(
            Command::new("compress")
                .with_usage("tinify compress <filename> <imgs...>")
                .with_handler(handler),
        )
        .build();

    cli.parse(&["compress", "a.txt", "1.png", "2.png"]);

    let calls = calls.lock().unwrap();
    assert_eq!(
        calls[0].get("imgs"),
        Some(&Value::Array(vec!["1.png".into(), "2.png".into()]))
    );
    assert_eq!(calls[0].get_str("filename"), Some("a.txt"));
}

#[test]
fn test_command_specific_help_skips_handler() {
    let (calls, handler) = recorder();
    let cli = Cli::builder()
        .name("tinify")
        .command(
            Command::new("set-key")
                .with_usage("tinify set-key <key>")
                .with_help("Store the API key.")
                .with_handler(handler),
        )
        .build();

    for argv in [&["set-key", "help"][..], &["set-key", "--help"], &["set-key", "--docs"]] {
        let outcome = cli.parse(argv).outcome;
        assert_eq!(
            outcome,
            Outcome::ShowHelpRequested {
                command: Some("set-key".into())
            }
        );

        let mut out = Vec::new();
        let code = Shell::new(&cli)
            .report(&outcome, &mut out, &mut Vec::new())
            .unwrap();
        assert_eq!(code, 0);
        assert!(String::from_utf8(out).unwrap().contains("tinify set-key <key>"));
    }
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_terminator_keeps_flags_as_positionals() {
    let cli = Cli::builder()
        .option(SchemaEntry::new("x"))
        .build();
    let parsed = cli.parse(&[
        "hello", "-x", "1", "-x", "2", "world", "--", "--for", "--bar=baz", "-a",
    ]);

    assert_eq!(parsed.options.get("x"), Some(&Value::from(2)));
    assert_eq!(
        parsed.options.positionals(),
        ["hello", "world", "--for", "--bar=baz", "-a"]
    );
    assert_eq!(parsed.outcome, Outcome::Idle);
}

#[test]
fn test_duplicate_flags_accumulate_by_hyphen_depth() {
    let cli = Cli::builder()
        .settings(ParseSettings {
            duplicate_as_array: true,
            ..Default::default()
        })
        .option(SchemaEntry::new("foo"))
        .option(SchemaEntry::new("-foo"))
        .option(SchemaEntry::new("--foo"))
        .build();

    let parsed = cli.parse(&[
        "--foo=3", "--foo=3", "---foo=4", "---foo=4", "----foo=5", "----foo=5", "-----foo=6",
    ]);

    let numbers =
        |values: &[f64]| Value::Array(values.iter().copied().map(Value::Number).collect());
    assert_eq!(
        parsed.options.get("foo"),
        Some(&numbers(&[3.0, 3.0, 4.0, 4.0, 5.0, 5.0, 6.0]))
    );
    assert_eq!(parsed.options.get("-foo"), Some(&numbers(&[4.0, 4.0])));
    assert_eq!(parsed.options.get("--foo"), Some(&numbers(&[5.0, 5.0])));
    assert_eq!(parsed.outcome, Outcome::UndeclaredFlag { keys: vec!["---foo".into()] });
}

#[test]
fn test_strict_mode_rejects_unknown_command() {
    let cli = Cli::builder()
        .name("tinify")
        .settings(ParseSettings {
            unknown_command_allowed: false,
            ..Default::default()
        })
        .command(Command::new("clear").with_handler(|_| {}))
        .build();

    let outcome = cli.parse(&["base64xyz"]).outcome;
    assert_eq!(
        outcome,
        Outcome::UnknownCommand {
            name: "base64xyz".into()
        }
    );

    let mut err = Vec::new();
    let code = Shell::new(&cli)
        .report(&outcome, &mut Vec::new(), &mut err)
        .unwrap();
    assert_eq!(code, 1);
    assert!(String::from_utf8(err).unwrap().contains("base64xyz"));

    assert_eq!(
        cli.parse(&["clear"]).outcome,
        Outcome::CommandExecuted {
            name: "clear".into()
        }
    );
}

#[test]
fn test_reparsing_is_independent() {
    let cli = Cli::builder().options(tinify_options()).build();

    let first = cli.parse(&["--output=a.png", "x"]);
    let second = cli.parse::<&str>(&[]);

    assert_eq!(first.options.get_str("output"), Some("a.png"));
    assert_eq!(second.options.get("output"), None);
    assert!(second.options.positionals().is_empty());
}

#[test]
fn test_parsed_serializes_outcome_tag() {
    let cli = Cli::builder().build();
    let json = serde_json::to_value(cli.parse(&["-v"])).unwrap();
    assert_eq!(json["outcome"], "show_version_requested");
    assert_eq!(json["options"]["version"], true);
}

#[test]
fn test_command_option_transform_keeps_leading_zeros() {
    let (calls, handler) = recorder();
    let cli = Cli::builder()
        .option(SchemaEntry::new("zip").with_transform(transform::to_string()))
        .command(
            Command::new("ship")
                .with_usage("app ship <id>")
                .with_option(SchemaEntry::new("zip").with_transform(transform::to_string()))
                .with_handler(handler),
        )
        .build();

    assert_eq!(
        cli.parse(&["--zip=007"]).options.get_str("zip"),
        Some("007")
    );

    cli.parse(&["ship", "0042", "--zip", "01230"]);
    let calls = calls.lock().unwrap();
    assert_eq!(calls[0].get_str("zip"), Some("01230"));
    assert_eq!(calls[0].get_str("id"), Some("0042"));
}
