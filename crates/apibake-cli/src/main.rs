//! apibake command-line interface.
//!
//! Wraps the library in three subcommands: `validate` checks that every `$ref`
//! in a document resolves, `bake` turns a document into a JSON operation
//! registry, and `list` prints the commands of a baked registry.

use std::{fs::File, path::PathBuf, process::ExitCode};

use apibake::{BakedCli, OpenApi, Resolver};
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

mod output;

/// Bake OpenAPI specifications into CLI operation registries.
#[derive(Parser, Debug)]
#[command(name = "apibake", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that every `$ref` in a document resolves to an existing node.
    Validate {
        /// Path to the OpenAPI document (JSON or YAML).
        spec: PathBuf,
    },
    /// Bake a document into an operation registry.
    Bake {
        /// Path to the OpenAPI document (JSON or YAML).
        spec: PathBuf,

        /// Where to write the baked registry.
        #[arg(short, long, default_value = "baked.json")]
        output: PathBuf,
    },
    /// List the commands and actions of a baked registry.
    List {
        /// Path to a registry written by `bake`.
        baked: PathBuf,

        /// The output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Load(#[from] apibake::LoadError),

    #[error(transparent)]
    Bake(#[from] apibake::BakeError),

    #[error(transparent)]
    Cache(#[from] apibake::CacheError),

    #[error("document failed validation with {0} unresolved reference(s)")]
    Validation(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Validate { spec } => validate(&spec),
        Command::Bake { spec, output } => bake(&spec, &output),
        Command::List { baked, format } => list(&baked, format),
    }
}

fn validate(spec: &PathBuf) -> Result<(), CliError> {
    let document = OpenApi::from_path(spec)?;
    log::info!(
        "loaded `{}` with {} path(s)",
        spec.display(),
        document.paths.len()
    );

    let errors = Resolver::new(&document).validate();
    for error in &errors {
        eprintln!("{error}");
    }
    if errors.is_empty() {
        println!("{}: all references resolve", spec.display());
        Ok(())
    } else {
        Err(CliError::Validation(errors.len()))
    }
}

fn bake(spec: &PathBuf, output: &PathBuf) -> Result<(), CliError> {
    let document = OpenApi::from_path(spec)?;
    let baked = BakedCli::bake(&document)?;

    let operations: usize = baked.commands.values().map(|actions| actions.len()).sum();
    log::info!(
        "baked {} operation(s) across {} command(s)",
        operations,
        baked.commands.len()
    );

    baked.save(File::create(output)?)?;
    println!("wrote {}", output.display());
    Ok(())
}

fn list(baked: &PathBuf, format: OutputFormat) -> Result<(), CliError> {
    let registry = BakedCli::load(File::open(baked)?)?;
    output::print_listing(&registry, format)?;
    Ok(())
}
