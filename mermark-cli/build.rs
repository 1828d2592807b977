use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &["ir-json", "ir-outline"];

const FORMATS: &[&str] = &["markdown", "html"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let format_arg = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .help(help)
            .value_parser(clap::builder::PossibleValuesParser::new(FORMATS))
            .value_hint(ValueHint::Other)
    };
    let file_arg = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .help(help)
            .required(true)
            .index(1)
            .value_hint(ValueHint::FilePath)
    };

    let mut cmd = Command::new("mermark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between Markdown and rich-text editor HTML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a mermark.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log conversion details to stderr")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats")
                .arg(file_arg("input", "Input file path"))
                .arg(format_arg("from", "Source format"))
                .arg(format_arg("to", "Target format"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the intermediate representation of a document")
                .arg(file_arg("path", "Path to the document"))
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                )
                .arg(format_arg("from", "Source format")),
        )
        .subcommand(
            Command::new("check")
                .about("Check that a Markdown file survives a round trip through HTML")
                .arg(file_arg("path", "Path to the Markdown file")),
        )
        .subcommand(
            Command::new("slug")
                .about("Print the heading anchor generated for a text")
                .arg(Arg::new("text").required(true).num_args(1..).index(1)),
        )
        .subcommand(
            Command::new("line-ending")
                .about("Print the line ending style of a file")
                .arg(file_arg("path", "Path to the file")),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "mermark", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "mermark", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "mermark", &outdir)?;

    Ok(())
}
