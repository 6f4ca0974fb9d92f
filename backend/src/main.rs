//! Pricat CLI - Transform a pricat feed into catalog JSON
//!
//! ```bash
//! pricat --pricat pricat.csv --mappings mappings.csv --output out/catalog.json
//! pricat --pricat feed.csv --mappings rules.csv --output catalog.json --delimiter ',' -v
//! ```
//!
//! Exit codes: `0` success, `2` missing input file (or bad arguments),
//! `1` any other failure. No output file is written on failure.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use pricat::logs::init_logging;
use pricat::{transform_files, NumericFields, TransformOptions};

#[derive(Parser)]
#[command(name = "pricat")]
#[command(about = "Transform a pricat CSV and its mappings into catalog JSON grouped by article", long_about = None)]
struct Cli {
    /// Pricat CSV path
    #[arg(long)]
    pricat: PathBuf,

    /// Mappings CSV path (source_type;source;destination_type;destination)
    #[arg(long)]
    mappings: PathBuf,

    /// JSON output path (parent directories are created)
    #[arg(long)]
    output: PathBuf,

    /// Pricat field delimiter (single ASCII character, or "tab")
    #[arg(short, long, default_value = ";", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Mappings field delimiter
    #[arg(long, default_value = ";", value_parser = parse_delimiter)]
    mappings_delimiter: u8,

    /// Field emitted as a number when it parses (repeatable, replaces the default set)
    #[arg(long = "numeric-field", value_name = "FIELD")]
    numeric_fields: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!("delimiter must be a single ASCII character, got '{}'", s)),
            }
        }
    }
}

fn main() {
    // Load .env file (if present), e.g. for RUST_LOG
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let numeric_fields = if cli.numeric_fields.is_empty() {
        NumericFields::default()
    } else {
        NumericFields::new(cli.numeric_fields)
    };

    let options = TransformOptions {
        pricat_delimiter: cli.delimiter,
        mappings_delimiter: cli.mappings_delimiter,
        numeric_fields,
    };

    if let Err(e) = transform_files(&cli.pricat, &cli.mappings, &cli.output, &options) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
