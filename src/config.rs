//! Engine configuration.
//! Options can be built in code or loaded from JSON/YAML text, in which case
//! JSON is tried first and YAML second.

use crate::error::{Error, Result};
use crate::token::Delimiters;
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// Rendering options held by an [`Engine`](crate::engine::Engine).
///
/// Transform functions and the error callback are not part of this struct;
/// they are attached to the engine directly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOptions {
    /// Fail on missing keys and unknown functions instead of degrading
    pub strict: bool,
    /// Text used when a value is missing and the token has no fallback
    pub fallback_value: String,
    /// Placeholder and fallback delimiters
    pub wrapper: Delimiters,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict: false,
            fallback_value: String::new(),
            wrapper: Delimiters::default(),
        }
    }
}

impl EngineOptions {
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn fallback_value(mut self, value: impl Into<String>) -> Self {
        self.fallback_value = value.into();
        self
    }

    pub fn wrapper(mut self, wrapper: Delimiters) -> Self {
        self.wrapper = wrapper;
        self
    }

    /// Rejects delimiters the scanner cannot work with.
    ///
    /// # Errors
    /// * `Error::ConfigError` if any delimiter is empty
    pub fn validate(&self) -> Result<()> {
        let wrapper = &self.wrapper;
        let delimiters = [
            ("start", &wrapper.start),
            ("end", &wrapper.end),
            ("fallbackOpen", &wrapper.fallback_open),
            ("fallbackClose", &wrapper.fallback_close),
        ];

        for (name, value) in delimiters {
            if value.is_empty() {
                return Err(Error::ConfigError(format!(
                    "wrapper.{name} must not be empty"
                )));
            }
        }

        Ok(())
    }
}

/// Parses engine options from JSON or YAML text.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor YAML
///   options, or if the resulting options fail validation
pub fn parse_options(content: &str) -> Result<EngineOptions> {
    let options: EngineOptions = match serde_json::from_str(content) {
        Ok(options) => options,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}")))?,
    };

    options.validate()?;
    Ok(options)
}

/// Loads engine options from a JSON or YAML file.
pub fn load_options<P: AsRef<Path>>(path: P) -> Result<EngineOptions> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(Error::IoError)?;
    parse_options(&content)
}

/// Loads render metadata from a JSON or YAML file.
///
/// # Errors
/// * `Error::IoError` if the file cannot be read
/// * `Error::ConfigError` if the content is neither valid JSON nor YAML
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<serde_json::Value> {
    let path = path.as_ref();
    debug!("Loading metadata from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(Error::IoError)?;

    match serde_json::from_str(&content) {
        Ok(value) => Ok(value),
        Err(_) => serde_yaml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Invalid metadata format: {e}"))),
    }
}
