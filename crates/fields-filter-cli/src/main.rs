//! `fields` CLI: apply and inspect `fields` selection specs from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Keep only some fields of a JSON document (stdin → stdout)
//! echo '{"id":"srv01","title":"Server","links":[]}' | fields apply '(id,title)'
//!
//! # Drop fields, file to file
//! fields apply '!(links,extensions(effective_attributes))' -i hosts.json -o trimmed.json
//!
//! # Validate a spec and print its canonical form
//! fields check '(a~b,a~c)'
//!
//! # Ask whether dotted paths survive a spec
//! fields query '(extensions(attributes))' extensions.attributes.site links
//!
//! # Show the filter that applies below a path
//! fields nested '(value(id,extensions(folder)))' value.extensions
//! ```
//!
//! Log output goes to stderr and is controlled by `RUST_LOG` or `-v`.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use fields_filter::{parse_fields_filter_with, FieldsFilter, ParseOptions};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "fields",
    version,
    about = "Apply and inspect `fields` selection specs on JSON documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum nesting depth accepted in a spec
    #[arg(long, global = true, default_value_t = fields_filter::parser::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Increase log verbosity (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a JSON document with a spec
    Apply {
        /// Spec, e.g. "(id,extensions(attributes))" or "!(links)"
        spec: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Validate a spec and print its canonical form
    Check {
        spec: String,
    },
    /// Report whether each dotted path is kept by a spec
    Query {
        spec: String,
        /// Dotted field paths, e.g. "extensions.attributes.site"
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the filter that applies at a dotted path
    Nested {
        spec: String,
        path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let options = ParseOptions::default().with_max_depth(cli.max_depth);

    match cli.command {
        Commands::Apply {
            spec,
            input,
            output,
            compact,
        } => {
            let filter = parse_spec(&spec, &options)?;
            let json = read_input(input.as_deref())?;
            let value: serde_json::Value =
                serde_json::from_str(&json).context("Input is not valid JSON")?;
            let filtered = filter.apply_owned(value);
            let rendered = if compact {
                serde_json::to_string(&filtered)?
            } else {
                serde_json::to_string_pretty(&filtered)?
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Check { spec } => {
            let filter = parse_spec(&spec, &options)?;
            println!("polarity:  {}", filter.polarity());
            println!("canonical: {}", describe(&filter));
        }
        Commands::Query { spec, paths } => {
            let filter = parse_spec(&spec, &options)?;
            for path in &paths {
                let state = if filter.is_included(Some(path.as_str())) {
                    "included"
                } else {
                    "excluded"
                };
                println!("{path}: {state}");
            }
        }
        Commands::Nested { spec, path } => {
            let filter = parse_spec(&spec, &options)?;
            println!("{}", describe(filter.get_nested_fields(&path)));
        }
    }

    Ok(())
}

fn parse_spec(spec: &str, options: &ParseOptions) -> Result<FieldsFilter> {
    parse_fields_filter_with(spec, options).with_context(|| format!("Invalid spec: {spec}"))
}

/// Canonical spec text, with words for the two terminals that have none.
fn describe(filter: &FieldsFilter) -> String {
    match filter {
        FieldsFilter::Included => "included (everything)".to_string(),
        FieldsFilter::Excluded => "excluded (nothing)".to_string(),
        branch => branch.to_spec().unwrap_or_default(),
    }
}

fn setup_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            tracing::debug!(path, bytes = json.len(), "read input");
            Ok(json)
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            tracing::debug!(bytes = buf.len(), "read input from stdin");
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
            tracing::debug!(path, bytes = content.len(), "wrote output");
        }
        None => {
            println!("{}", content);
            tracing::debug!(bytes = content.len(), "wrote output to stdout");
        }
    }
    Ok(())
}
