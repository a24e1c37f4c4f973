//! Data model of a scanned placeholder.

use crate::constants::{DEFAULT_END, DEFAULT_FALLBACK_CLOSE, DEFAULT_FALLBACK_OPEN, DEFAULT_START};
use serde::{Deserialize, Serialize};

/// A single call in a token's function chain, e.g. `wrap("[", "]")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// Name the transform is registered under
    pub name: String,
    /// Literal arguments, in order
    pub args: Vec<String>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// One recognised placeholder occurrence in a template.
///
/// For `<<@user:name->trim->upper@>>[(John)]` the token holds namespace
/// `user`, key `name`, path `user.name`, two calls and fallback `John`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Segment before the `:`, if any
    pub namespace: Option<String>,
    /// Segment after the `:` (or the whole path part)
    pub key: String,
    /// `namespace.key`, or `key` alone when there is no namespace
    pub path: String,
    /// Calls applied left to right
    pub functions: Vec<FunctionCall>,
    /// Text of the `[(...)]` suffix
    pub fallback: Option<String>,
    /// Exact source text, fallback suffix included
    pub raw: String,
    /// Byte offset of the opening delimiter
    pub start: usize,
    /// Byte offset right after the closing delimiter or the fallback suffix
    pub end: usize,
}

/// Delimiters recognised by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Delimiters {
    pub start: String,
    pub end: String,
    pub fallback_open: String,
    pub fallback_close: String,
}

impl Delimiters {
    /// Custom placeholder delimiters with the default fallback markers.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            ..Self::default()
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            start: DEFAULT_START.to_string(),
            end: DEFAULT_END.to_string(),
            fallback_open: DEFAULT_FALLBACK_OPEN.to_string(),
            fallback_close: DEFAULT_FALLBACK_CLOSE.to_string(),
        }
    }
}
