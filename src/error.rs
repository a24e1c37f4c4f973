//! Error handling for plynt.
//! Defines the error type, the per-token error context and the result alias
//! used throughout the crate.

use std::io;
use thiserror::Error;

/// Custom error types for plynt operations.
///
/// The first three variants are per-token failures raised while rendering;
/// the rest come from configuration, file access and MiniJinja conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// A placeholder path resolved to nothing, carried no fallback and the
    /// engine runs in strict mode.
    #[error("Missing key: {path}")]
    MissingKey { key: String, path: String },

    /// A function chain references a name that is not registered.
    #[error("Unknown function: {name}")]
    UnknownFunction {
        name: String,
        key: String,
        path: String,
    },

    /// A registered transform failed while executing.
    #[error("Transform '{name}' failed for {path}: {source}")]
    TransformError {
        name: String,
        key: String,
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// Represents errors that occur during configuration parsing or validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Represents errors raised by MiniJinja when rendering a converted template
    #[error("MiniJinja error: {0}")]
    MinijinjaError(#[from] minijinja::Error),
}

impl Error {
    /// Returns the token context of a per-token failure.
    ///
    /// Configuration, IO and MiniJinja errors are not tied to a token and
    /// return `None`.
    pub fn context(&self) -> Option<ErrorContext> {
        match self {
            Error::MissingKey { key, path } => Some(ErrorContext::new(key, path)),
            Error::UnknownFunction { name, key, path }
            | Error::TransformError {
                name, key, path, ..
            } => Some(ErrorContext::new(key, path).with_function(name)),
            _ => None,
        }
    }
}

/// Describes which token an error was raised for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// The token's key segment
    pub key: String,
    /// The dot-joined resolution path
    pub path: String,
    /// Name of the function being applied, if the failure happened in the chain
    pub function: Option<String>,
}

impl ErrorContext {
    pub fn new(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            function: None,
        }
    }

    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.function = Some(name.into());
        self
    }
}

/// Convenience type alias for Results with plynt's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
