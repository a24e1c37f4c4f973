//! plynt renders strings containing `<<@namespace:key->fn@>>[(fallback)]`
//! placeholders against JSON metadata, running each resolved value through
//! a chain of named transform functions.
//! It is not a full templating language: there are no loops, conditionals
//! or includes.

/// Placeholder argument list tokenizer
pub mod args;

/// Command-line interface module for the plynt binary
pub mod cli;

/// Engine options, loadable from JSON or YAML
pub mod config;

/// Default delimiters and other constants
pub mod constants;

/// The rendering pipeline
pub mod engine;

/// Error types and handling for plynt
pub mod error;

/// Logger setup for the binary
pub mod logger;

/// Conversion to MiniJinja syntax and rendering through MiniJinja
pub mod renderer;

/// Transform functions and their registry
pub mod registry;

/// Metadata path resolution
pub mod resolver;

/// Placeholder scanner
pub mod scanner;

/// Parsed templates and reverse transformation
pub mod template;

/// Token data model
pub mod token;

pub use config::EngineOptions;
pub use engine::{Compiled, Engine, ErrorCallback, Renderer};
pub use error::{Error, ErrorContext, Result};
pub use registry::{async_fn, sync_fn, Transform, TransformRegistry};
pub use template::ParsedTemplate;
pub use token::{Delimiters, FunctionCall, Token};
