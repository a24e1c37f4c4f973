//! Command-line interface implementation for plynt.
//! Provides argument parsing using clap and the command execution behind it.

use crate::config::{load_metadata, load_options};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::renderer::{to_jinja, MiniJinjaRenderer, TemplateRenderer};
use crate::EngineOptions;
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use log::debug;
use std::path::{Path, PathBuf};

/// Command-line arguments structure for plynt.
#[derive(Parser, Debug)]
#[command(author, version, about = "plynt: render placeholder templates against JSON or YAML metadata", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a template file against a metadata file
    Render {
        /// Path to the template file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// JSON or YAML metadata file
        #[arg(short, long, value_name = "FILE")]
        metadata: Option<PathBuf>,

        /// JSON or YAML engine options file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Fail on missing keys and unknown functions
        #[arg(long)]
        strict: bool,

        /// Text used for missing values without a fallback
        #[arg(long, value_name = "TEXT")]
        fallback: Option<String>,
    },

    /// Print the metadata skeleton of a template as JSON
    Metadata {
        /// Path to the template file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,
    },

    /// Convert a template to MiniJinja syntax
    Convert {
        /// Path to the template file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Render the converted template through MiniJinja instead of printing it
        #[arg(long, requires = "metadata")]
        render: bool,

        /// JSON or YAML metadata file, used with --render
        #[arg(short, long, value_name = "FILE")]
        metadata: Option<PathBuf>,
    },
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if no subcommand is given
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingSubcommand
                || e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            {
                let _ = Args::command().print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}

/// Executes a parsed command and returns the text to print.
pub fn execute(command: &Command) -> Result<String> {
    match command {
        Command::Render {
            template,
            metadata,
            config,
            strict,
            fallback,
        } => {
            let mut options = match config {
                Some(path) => load_options(path)?,
                None => EngineOptions::default(),
            };
            if *strict {
                options.strict = true;
            }
            if let Some(fallback) = fallback {
                options.fallback_value = fallback.clone();
            }

            let engine = Engine::with_options(options)?;
            let source = read_template(template)?;
            let metadata = read_metadata(metadata.as_deref())?;

            pollster::block_on(engine.render(&source, &metadata))
        }
        Command::Metadata { template } => {
            let source = read_template(template)?;
            let skeleton = Engine::new().metadata(&source);
            serde_json::to_string_pretty(&skeleton)
                .map_err(|e| Error::ConfigError(format!("Cannot serialize metadata: {e}")))
        }
        Command::Convert {
            template,
            render,
            metadata,
        } => {
            let source = read_template(template)?;
            let converted = to_jinja(&Engine::new().parse(&source));
            if *render {
                let metadata = read_metadata(metadata.as_deref())?;
                MiniJinjaRenderer::new().render(&converted, &metadata)
            } else {
                Ok(converted)
            }
        }
    }
}

fn read_template(path: &Path) -> Result<String> {
    debug!("Reading template from {}", path.display());
    std::fs::read_to_string(path).map_err(Error::IoError)
}

fn read_metadata(path: Option<&Path>) -> Result<serde_json::Value> {
    match path {
        Some(path) => load_metadata(path),
        None => Ok(serde_json::Value::Object(serde_json::Map::new())),
    }
}
