use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use inistore::logging::init_tracing;
use inistore::key::interpolate;
use inistore::{default_path, IniStore, StoreRegistry};

const APP_NAME: &str = "inistore";

#[derive(Parser, Debug)]
#[command(name = "inistore", version, about = "Typed access to ini configuration files")]
struct Cli {
    /// Ini file to operate on (defaults to the user config directory)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value stored under KEY
    Get {
        /// Combined key (`section.key`); `{}` placeholders are filled from --arg
        key: String,
        /// Type to read the value as
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::String)]
        value_type: ValueType,
        /// Value printed when the key is missing
        #[arg(short, long)]
        default: Option<String>,
        /// Argument for the next `{}` placeholder in KEY
        #[arg(short, long = "arg")]
        args: Vec<String>,
    },
    /// Store VALUE under KEY
    Set {
        key: String,
        value: String,
        /// Type VALUE must parse as
        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::String)]
        value_type: ValueType,
    },
    /// Print the raw file contents
    Dump,
    /// Print the resolved file path
    Path,
    /// List every stored entry
    List {
        /// Print entries as a JSON object
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ValueType {
    String,
    Int,
    Float,
    Double,
    Bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let path = cli.file.unwrap_or_else(|| default_path(APP_NAME));
    let registry = StoreRegistry::new();
    let store = registry.open(&path)?;

    match cli.command {
        Command::Get {
            key,
            value_type,
            default,
            args,
        } => {
            let args: Vec<&dyn fmt::Display> =
                args.iter().map(|a| a as &dyn fmt::Display).collect();
            let key = interpolate(&key, &args)?;
            let value = read_value(&store, &key, value_type, default.as_deref())?;
            println!("{}", value);
        }
        Command::Set {
            key,
            value,
            value_type,
        } => {
            write_value(&store, &key, &value, value_type)?;
            tracing::info!(key = %key, path = %store.full_path().display(), "Value stored");
        }
        Command::Dump => store.dump_to(io::stdout().lock())?,
        Command::Path => println!("{}", store.full_path().display()),
        Command::List { json } => {
            let table = store.snapshot()?;
            let mut out = io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut out, &table)?;
                writeln!(out)?;
            } else {
                for (key, value) in &table {
                    writeln!(out, "{}={}", key, value)?;
                }
            }
        }
    }

    Ok(())
}

/// Read `key` as `value_type` and render it for printing.
fn read_value(
    store: &IniStore,
    key: &str,
    value_type: ValueType,
    default: Option<&str>,
) -> Result<String> {
    let rendered = match value_type {
        ValueType::String => store.get(key, default.unwrap_or_default().to_string())?,
        ValueType::Int => store.get(key, parse_default::<i32>(default)?)?.to_string(),
        ValueType::Float => store.get(key, parse_default::<f32>(default)?)?.to_string(),
        ValueType::Double => store.get(key, parse_default::<f64>(default)?)?.to_string(),
        ValueType::Bool => store.get(key, parse_default::<bool>(default)?)?.to_string(),
    };
    Ok(rendered)
}

fn parse_default<T>(default: Option<&str>) -> Result<T>
where
    T: std::str::FromStr + Default,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match default {
        Some(text) => text
            .parse()
            .with_context(|| format!("Invalid default value '{}'", text)),
        None => Ok(T::default()),
    }
}

/// Validate `value` against `value_type` and store it.
fn write_value(store: &IniStore, key: &str, value: &str, value_type: ValueType) -> Result<()> {
    let invalid = || format!("'{}' is not a valid {:?} value", value, value_type);
    match value_type {
        ValueType::String => store.set(key, value)?,
        ValueType::Int => store.set(key, value.parse::<i32>().with_context(invalid)?)?,
        ValueType::Float => store.set(key, value.parse::<f32>().with_context(invalid)?)?,
        ValueType::Double => store.set(key, value.parse::<f64>().with_context(invalid)?)?,
        ValueType::Bool => store.set(key, value.parse::<bool>().with_context(invalid)?)?,
    }
    Ok(())
}
