//! Parsed templates and reverse transformation.
//!
//! A [`ParsedTemplate`] binds a template string to its tokens. It is built
//! once and can be rendered or rewritten any number of times.

use crate::resolver::set_value;
use crate::scanner::scan;
use crate::token::{Delimiters, Token};
use serde_json::{Map, Value};

/// Immutable result of scanning a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    template: String,
    tokens: Vec<Token>,
}

impl ParsedTemplate {
    /// Scans `template` with the given delimiters.
    pub fn parse(template: impl Into<String>, delimiters: &Delimiters) -> Self {
        let template = template.into();
        let tokens = scan(&template, delimiters);
        Self { template, tokens }
    }

    /// The source text this template was scanned from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Tokens in source order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Rewrites the template, replacing each token with `replacer(token)`.
    ///
    /// Each replacement targets the first remaining occurrence of the token's
    /// raw text, in source order. Metadata and transforms are not involved.
    ///
    /// # Examples
    /// ```
    /// use plynt::template::ParsedTemplate;
    /// use plynt::token::Delimiters;
    ///
    /// let parsed = ParsedTemplate::parse("Hello, <<@user:name->capitalize@>>!", &Delimiters::default());
    /// let jinja = parsed.transform_each(|token| format!("{{{{{}}}}}", token.path));
    /// assert_eq!(jinja, "Hello, {{user.name}}!");
    /// ```
    pub fn transform_each<F>(&self, mut replacer: F) -> String
    where
        F: FnMut(&Token) -> String,
    {
        let mut result = self.template.clone();
        for token in &self.tokens {
            let replacement = replacer(token);
            replace_first(&mut result, &token.raw, &replacement);
        }
        result
    }

    /// Builds a metadata skeleton with every token's path set to its
    /// fallback text, or to `""` when the token has none.
    ///
    /// Paths are assigned in source order, so a later token wins when two
    /// tokens share a path.
    pub fn metadata(&self) -> Value {
        let mut data = Value::Object(Map::new());
        for token in &self.tokens {
            let value = token.fallback.clone().unwrap_or_default();
            set_value(&mut data, &token.path, Value::String(value));
        }
        data
    }
}

/// Replaces the first occurrence of `needle` in `haystack` in place.
/// Returns false when `needle` is not found.
pub(crate) fn replace_first(haystack: &mut String, needle: &str, replacement: &str) -> bool {
    match haystack.find(needle) {
        Some(at) => {
            haystack.replace_range(at..at + needle.len(), replacement);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(template: &str) -> ParsedTemplate {
        ParsedTemplate::parse(template, &Delimiters::default())
    }

    #[test]
    fn test_transform_each_to_other_syntax() {
        let parsed = parse("Hi <<@user:name->trim@>>[(you)], total <<@order:total@>>.");
        let result = parsed.transform_each(|token| format!("${{{}}}", token.path));
        assert_eq!(result, "Hi ${user.name}, total ${order.total}.");
    }

    #[test]
    fn test_transform_each_without_tokens() {
        let parsed = parse("plain text");
        assert_eq!(parsed.transform_each(|_| "x".to_string()), "plain text");
    }

    #[test]
    fn test_transform_each_duplicate_raw() {
        let parsed = parse("<<@a@>> and <<@a@>>");
        let mut n = 0;
        let result = parsed.transform_each(|_| {
            n += 1;
            n.to_string()
        });
        assert_eq!(result, "1 and 2");
    }

    #[test]
    fn test_metadata_skeleton() {
        let parsed = parse("<<@user:name@>>[(John)] <<@user:email@>> <<@title->upper@>>");
        assert_eq!(
            parsed.metadata(),
            json!({"user": {"name": "John", "email": ""}, "title": ""})
        );
    }

    #[test]
    fn test_metadata_skips_empty_paths() {
        let parsed = parse("<<@@>> <<@a@>>");
        assert_eq!(parsed.metadata(), json!({"a": ""}));
    }

    #[test]
    fn test_replace_first() {
        let mut text = "a-b-a".to_string();
        assert!(replace_first(&mut text, "a", "x"));
        assert_eq!(text, "x-b-a");
        assert!(!replace_first(&mut text, "z", "y"));
    }
}
