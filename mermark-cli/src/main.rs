// Command-line interface for mermark
//
// This binary converts documents between Markdown and the rich-text editor's HTML, and exposes the
// converter's helpers (IR inspection, round-trip checks, slugs, line-ending detection) for scripting
// and debugging.
//
// All conversion logic lives in mermark-babel. This crate is the I/O boundary: it reads files,
// layers configuration, and writes output with the configured line ending.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  mermark <input> --to <format> [--from <format>] [--output <file>]          - Convert (default)
//  mermark convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above
//  mermark inspect <path> [<transform>] [--from <format>]  - Print the IR (defaults to "ir-json")
//  mermark check <path>                                     - Markdown → HTML → Markdown drift check
//  mermark slug <text>                                      - Print the heading anchor for a text
//  mermark line-ending <path>                               - Print lf, crlf or cr
//  mermark --list-formats                                   - List available formats
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix. Keys that mirror configuration (table-padding,
// heading-ids, line-ending) update the loaded configuration; the rest are passed to the target
// format's serializer, which rejects keys it does not know.
// Example:
//  mermark notes.md --to html --extra-heading-ids false

mod transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use mermark_babel::transforms::{check_markdown_round_trip, LineEndingPolicy};
use mermark_babel::{
    apply_line_ending, detect_line_ending, generate_slug, FormatRegistry, HtmlFormat,
    MarkdownFormat,
};
use mermark_config::{Loader, MermarkConfig, LOCAL_CONFIG_FILE};
use std::collections::HashMap;
use std::fs;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "MERMARK_LOG";

/// Exit status of `check` when the document drifts.
const EXIT_DRIFT: i32 = 2;

const SUBCOMMANDS: &[&str] = &["inspect", "convert", "check", "slug", "line-ending", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("mermark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between Markdown and rich-text editor HTML")
        .long_about(
            "mermark converts documents between GitHub-flavored Markdown and the rich-text\n\
            editor's HTML, keeping code blocks and mermaid diagrams intact.\n\n\
            Commands:\n  \
            - convert:     Transform between markdown and html (default command)\n  \
            - inspect:     View the intermediate representation\n  \
            - check:       Verify a Markdown file survives a round trip through HTML\n  \
            - slug:        Print the heading anchor for a text\n  \
            - line-ending: Detect a file's line ending style\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Logging:\n  \
            Set MERMARK_LOG (e.g. MERMARK_LOG=debug) or pass -v.\n\n\
            Examples:\n  \
            mermark notes.md --to html                      # Convert to HTML (stdout)\n  \
            mermark page.html --to markdown -o page.md      # Convert to a file\n  \
            mermark notes.md --to html --extra-heading-ids false\n  \
            mermark check notes.md                          # Exit 2 if the round trip drifts",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a mermark.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log conversion details to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between markdown and html.\n\n\
                    The source format is auto-detected from the file extension\n\
                    (.md/.markdown, .html/.htm). Output goes to stdout by default,\n\
                    or use -o to specify a file. Output uses the source's line\n\
                    endings unless io.line_ending is configured.\n\n\
                    Examples:\n  \
                    mermark convert notes.md --to html             # Convert to HTML (stdout)\n  \
                    mermark convert page.html --to markdown -o p.md\n  \
                    mermark notes.md --to html                     # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .long_help(
                            "Target format to convert to.\n\n\
                            Available formats: markdown, html\n\
                            Use the format name, not the file extension.",
                        )
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the intermediate representation of a document")
                .long_about(
                    "View the block IR a document parses into.\n\n\
                    Transforms:\n  \
                    - ir-json:    Full document as JSON (default)\n  \
                    - ir-outline: One line per block\n\n\
                    Examples:\n  \
                    mermark inspect notes.md\n  \
                    mermark inspect page.html ir-outline",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'ir-json'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Check that a Markdown file survives a round trip through HTML")
                .long_about(
                    "Converts the Markdown file to HTML and back, then compares line by line.\n\n\
                    Exits 0 when the result is identical and 2 when it drifted, printing\n\
                    each differing line to stderr.",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("slug")
                .about("Print the heading anchor generated for a text")
                .arg(
                    Arg::new("text")
                        .help("Heading text")
                        .required(true)
                        .num_args(1..)
                        .index(1)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("line-ending")
                .about("Print the line ending style of a file (lf, crlf or cr)")
                .arg(
                    Arg::new("path")
                        .help("Path to the file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A first argument that is not a flag or subcommand is an input file
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(matches.get_flag("verbose"));

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            let to = sub_matches.get_one::<String>("to").expect("to is required");
            let from = resolve_from(input, sub_matches.get_one::<String>("from"));
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &extra_params, &config);
        }
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or(transforms::DEFAULT_TRANSFORM);
            let from = resolve_from(path, sub_matches.get_one::<String>("from"));
            handle_inspect_command(path, &from, transform, &config);
        }
        Some(("check", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            handle_check_command(path);
        }
        Some(("slug", sub_matches)) => {
            let text: Vec<&str> = sub_matches
                .get_many::<String>("text")
                .expect("text is required")
                .map(|s| s.as_str())
                .collect();
            println!("{}", generate_slug(&text.join(" ")));
        }
        Some(("line-ending", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            println!("{}", detect_line_ending(&read_input(path)));
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, default_filter))
        .format_timestamp(None)
        .init();
}

/// Build a registry whose formats carry the configured options.
fn build_registry(config: &MermarkConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register(MarkdownFormat::new((&config.markdown).into()));
    registry.register(HtmlFormat::new((&config.html).into()));
    registry
}

/// Use the explicit --from, or detect it from the file extension.
fn resolve_from(input: &str, from_arg: Option<&String>) -> String {
    if let Some(f) = from_arg {
        return f.to_string();
    }
    match FormatRegistry::default().detect_format_from_filename(input) {
        Some(detected) => detected,
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }
    }
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &MermarkConfig,
) {
    let registry = build_registry(config);

    // Validate formats exist
    if let Err(e) = registry.get(from) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_input(input);

    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let converted = registry
        .serialize_with_options(&doc, to, extra_params)
        .unwrap_or_else(|e| {
            eprintln!("Serialization error: {e}");
            std::process::exit(1);
        });

    let text = finish_output(&converted, &source, config.io.line_ending);

    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{text}"),
    }
}

/// End non-empty output with a newline and apply the line-ending policy.
fn finish_output(converted: &str, source: &str, policy: LineEndingPolicy) -> String {
    let style = policy.resolve(source);
    let mut text = converted.to_string();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    log::debug!("writing output with {style} line endings");
    apply_line_ending(&text, style)
}

/// Handle the inspect command
fn handle_inspect_command(path: &str, from: &str, transform: &str, config: &MermarkConfig) {
    let source = read_input(path);
    let registry = build_registry(config);

    let doc = registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });

    let output = transforms::execute_transform(&doc, transform).unwrap_or_else(|e| {
        eprintln!("Execution error: {e}");
        std::process::exit(1);
    });

    print!("{output}");
}

/// Handle the check command
fn handle_check_command(path: &str) {
    let source = read_input(path);
    let report = check_markdown_round_trip(&source);

    if report.is_stable() {
        println!("{path}: stable");
        return;
    }

    eprintln!(
        "{path}: {} line(s) drift after a round trip through html",
        report.differences.len()
    );
    for diff in &report.differences {
        eprintln!("line {}:", diff.line);
        eprintln!("  - {}", diff.expected.as_deref().unwrap_or("<missing>"));
        eprintln!("  + {}", diff.actual.as_deref().unwrap_or("<missing>"));
    }
    std::process::exit(EXIT_DRIFT);
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!(
                "  {name:<10} {} (.{})",
                format.description(),
                format.file_extensions().join(", .")
            );
        }
    }

    println!("\nInspect transforms:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> MermarkConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Move extras that mirror configuration keys into `config`.
fn apply_config_overrides(config: &mut MermarkConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("table-padding") {
        config.markdown.table_padding = parse_bool_arg("table-padding", &raw);
    }
    if let Some(raw) = extra_params.remove("heading-ids") {
        config.html.heading_ids = parse_bool_arg("heading-ids", &raw);
    }
    if let Some(raw) = extra_params.remove("line-ending") {
        config.io.line_ending = raw.parse().unwrap_or_else(|err| {
            eprintln!("Invalid value for --extra-line-ending: {err}");
            std::process::exit(1);
        });
    }
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
