//! `edtf`: parse, validate, normalize and compare EDTF date strings.
//!
//! Every command prints JSON to stdout. Diagnostics go to stderr, filtered
//! by `RUST_LOG` or `-v`.

use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Map, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use edtf_engine::{
    detect_level, normalize, parse, project, relate, Edtf, Level, ProjectionOptions, Quantifier,
    Relation,
};

#[derive(Parser, Debug)]
#[command(name = "edtf", version, about = "Parse and compare EDTF (ISO 8601-2) dates")]
struct Cli {
    /// Log more to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a string and print its JSON form
    Parse {
        input: String,
        /// Parse at exactly this level instead of detecting it
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=2))]
        level: Option<u8>,
    },
    /// Report whether a string is valid EDTF; exits 1 when it is not
    Validate {
        input: String,
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=2))]
        level: Option<u8>,
    },
    /// Print the level the detector picks for a string
    Detect { input: String },
    /// Print the normalized bounds of a value
    Normalize {
        input: String,
        /// Print a single member covering the whole value
        #[arg(long, conflicts_with = "project")]
        hull: bool,
        /// Print fixed-width storage rows instead of big-integer bounds
        #[arg(long)]
        project: bool,
        /// With --project, fail instead of clamping out-of-range bounds
        #[arg(long, requires = "project")]
        no_clamp: bool,
    },
    /// Evaluate Allen relations between two values
    Compare {
        a: String,
        b: String,
        /// One relation (e.g. before, metBy, during_or_equal); all when omitted
        #[arg(short, long)]
        relation: Option<Relation>,
        /// How members of sets and lists are combined
        #[arg(short, long, value_enum, default_value_t = QuantifierArg::Any)]
        quantifier: QuantifierArg,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum QuantifierArg {
    Any,
    All,
}

impl From<QuantifierArg> for Quantifier {
    fn from(value: QuantifierArg) -> Self {
        match value {
            QuantifierArg::Any => Quantifier::Any,
            QuantifierArg::All => Quantifier::All,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli.command)
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Parse { input, level } => {
            let value = parse_input(&input, level)?;
            print(&value.to_json()?)?;
        }
        Command::Validate { input, level } => {
            let (valid, report) = match parse(&input, to_level(level)?) {
                Ok(value) => (
                    true,
                    json!({ "input": input, "valid": true, "level": value.level() }),
                ),
                Err(failure) => (
                    false,
                    json!({ "input": input, "valid": false, "errors": failure.errors }),
                ),
            };
            print(&report)?;
            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Detect { input } => {
            print(&json!({ "input": input, "level": detect_level(input.trim()) }))?;
        }
        Command::Normalize {
            input,
            hull,
            project: as_rows,
            no_clamp,
        } => {
            let shape = normalize(&parse_input(&input, None)?);
            let output = if as_rows {
                let options = ProjectionOptions {
                    clamp: !no_clamp,
                    flatten: false,
                    ..ProjectionOptions::default()
                };
                serde_json::to_value(project(&shape, &options)?)?
            } else if hull {
                serde_json::to_value(shape.convex_hull())?
            } else {
                serde_json::to_value(&shape)?
            };
            print(&output)?;
        }
        Command::Compare {
            a,
            b,
            relation,
            quantifier,
        } => {
            let (left, right) = (parse_input(&a, None)?, parse_input(&b, None)?);
            let quantifier = Quantifier::from(quantifier);
            debug!(%left, %right, ?quantifier, "comparing");
            let output = match relation {
                Some(relation) => json!({
                    "a": left.to_string(),
                    "b": right.to_string(),
                    "relation": relation,
                    "quantifier": quantifier,
                    "result": relate(&left, &right, relation, quantifier),
                }),
                None => {
                    let results: Map<String, Value> = Relation::BASE
                        .into_iter()
                        .chain(Relation::DERIVED)
                        .map(|r| {
                            let truth = relate(&left, &right, r, quantifier);
                            (r.name().to_string(), json!(truth))
                        })
                        .collect();
                    Value::Object(results)
                }
            };
            print(&output)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn to_level(level: Option<u8>) -> Result<Option<Level>> {
    level
        .map(|n| Level::from_u8(n).ok_or_else(|| anyhow!("no EDTF level {n}")))
        .transpose()
}

fn parse_input(input: &str, level: Option<u8>) -> Result<Edtf> {
    parse(input, to_level(level)?).with_context(|| format!("failed to parse '{input}'"))
}

fn print(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
