//! Placeholder scanner.
//!
//! Walks a template left to right and produces one [`Token`] per placeholder:
//!
//! ```text
//! <<@ [namespace:]key [->fn1[(args)] [->fn2 ...]] @>> [ [(fallback)] ]
//! ```
//!
//! The scanner never reports errors. A body that does not look like a
//! path still yields a token, an odd function call becomes a zero-argument
//! call named by its trimmed text, and an opening delimiter without a closing
//! one ends the scan, dropping it and everything after it.

use crate::args::tokenize_args;
use crate::constants::CHAIN_SEPARATOR;
use crate::token::{Delimiters, FunctionCall, Token};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

/// `name` optionally followed by a parenthesised argument list.
static CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([a-zA-Z_$][\w$]*)(?:\((.*)\))?$").unwrap());

/// Scans `input` and returns its tokens in source order.
///
/// Offsets are byte offsets into `input`. After each token the cursor moves
/// to the token's end, past any fallback suffix, so consecutive tokens never
/// overlap.
pub fn scan(input: &str, delimiters: &Delimiters) -> Vec<Token> {
    let mut tokens = Vec::new();

    if delimiters.start.is_empty() || delimiters.end.is_empty() {
        warn!("Empty placeholder delimiter, nothing to scan");
        return tokens;
    }

    let mut cursor = 0;
    while let Some(found) = input[cursor..].find(&delimiters.start) {
        let start = cursor + found;
        let body_start = start + delimiters.start.len();

        // The closing delimiter may overlap the opening one, so `<<@>>` is a
        // token with an empty body. It may not begin at `start` itself.
        let search_from = start + input[start..].chars().next().map_or(0, char::len_utf8);
        let Some(close) = input[search_from..].find(&delimiters.end) else {
            debug!(
                "Unterminated placeholder at byte {}, ignoring the rest of the template",
                start
            );
            break;
        };

        let body_end = search_from + close;
        let body = input.get(body_start..body_end).unwrap_or_default();
        let mut end = body_end + delimiters.end.len();

        let fallback = match_fallback(&input[end..], delimiters).map(|(text, consumed)| {
            end += consumed;
            text.to_string()
        });

        let (namespace, key, functions) = parse_body(body);
        let path = match &namespace {
            Some(ns) => format!("{ns}.{key}"),
            None => key.clone(),
        };

        tokens.push(Token {
            namespace,
            key,
            path,
            functions,
            fallback,
            raw: input[start..end].to_string(),
            start,
            end,
        });

        cursor = end;
    }

    debug!("Scanned {} token(s)", tokens.len());
    tokens
}

/// Matches `fallback_open ... fallback_close` at the very start of `rest`,
/// closing at the first `fallback_close` on the same line. Returns the inner
/// text and the number of bytes the suffix occupies.
fn match_fallback<'a>(rest: &'a str, delimiters: &Delimiters) -> Option<(&'a str, usize)> {
    if delimiters.fallback_open.is_empty() || delimiters.fallback_close.is_empty() {
        return None;
    }

    let inner = rest.strip_prefix(delimiters.fallback_open.as_str())?;
    let close = inner.find(&delimiters.fallback_close)?;
    if inner[..close].contains('\n') {
        return None;
    }

    Some((
        &inner[..close],
        delimiters.fallback_open.len() + close + delimiters.fallback_close.len(),
    ))
}

/// Splits a placeholder body into namespace, key and function calls.
fn parse_body(body: &str) -> (Option<String>, String, Vec<FunctionCall>) {
    let (path_part, chain) = match body.split_once(CHAIN_SEPARATOR) {
        Some((path, chain)) => (path, Some(chain)),
        None => (body, None),
    };

    let (namespace, key) = match path_part.split_once(':') {
        Some((ns, key)) => {
            let ns = ns.trim();
            ((!ns.is_empty()).then(|| ns.to_string()), key.trim().to_string())
        }
        None => (None, path_part.trim().to_string()),
    };

    let functions = chain
        .map(|chain| split_chain(chain).into_iter().map(parse_call).collect())
        .unwrap_or_default();

    (namespace, key, functions)
}

/// Splits a function chain on `->`, ignoring separators inside parentheses.
/// Quotes only open a region inside an argument list.
fn split_chain(chain: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    let mut part_start = 0;

    let mut iter = chain.char_indices();
    while let Some((i, ch)) = iter.next() {
        match quote {
            Some(q) if ch == q && prev != Some('\\') => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' if depth > 0 => quote = Some(ch),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ if depth == 0 && chain[i..].starts_with(CHAIN_SEPARATOR) => {
                    parts.push(&chain[part_start..i]);
                    part_start = i + CHAIN_SEPARATOR.len();
                    // skip the rest of the separator
                    for _ in 1..CHAIN_SEPARATOR.chars().count() {
                        iter.next();
                    }
                }
                _ => {}
            },
        }
        prev = Some(ch);
    }
    parts.push(&chain[part_start..]);

    parts
}

/// Parses a single `name(args)` call. Text that is not a valid call is kept
/// as a zero-argument call named by the trimmed text.
fn parse_call(part: &str) -> FunctionCall {
    let part = part.trim();

    match CALL_RE.captures(part) {
        Some(caps) => {
            let args = caps
                .get(2)
                .map(|m| tokenize_args(m.as_str()))
                .unwrap_or_default();
            FunctionCall::new(&caps[1], args)
        }
        None => FunctionCall::new(part, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_default(input: &str) -> Vec<Token> {
        scan(input, &Delimiters::default())
    }

    #[test]
    fn test_single_token_with_chain_and_fallback() {
        let tokens = scan_default("<<@user:name->trim->upper@>>[(John)]");

        assert_eq!(tokens.len(), 1);
        let token = &tokens[0];
        assert_eq!(token.namespace.as_deref(), Some("user"));
        assert_eq!(token.key, "name");
        assert_eq!(token.path, "user.name");
        assert_eq!(
            token.functions,
            vec![
                FunctionCall::new("trim", vec![]),
                FunctionCall::new("upper", vec![])
            ]
        );
        assert_eq!(token.fallback.as_deref(), Some("John"));
        assert_eq!(token.raw, "<<@user:name->trim->upper@>>[(John)]");
        assert_eq!(token.start, 0);
        assert_eq!(token.end, token.raw.len());
    }

    #[test]
    fn test_no_namespace() {
        let tokens = scan_default("Hi <<@name@>>");
        assert_eq!(tokens[0].namespace, None);
        assert_eq!(tokens[0].path, "name");
        assert_eq!(tokens[0].start, 3);
    }

    #[test]
    fn test_function_arguments() {
        let tokens = scan_default(r#"<<@a:b->pad(4, "0")->wrap("[", "]")@>>"#);
        assert_eq!(
            tokens[0].functions,
            vec![
                FunctionCall::new("pad", vec!["4".into(), "0".into()]),
                FunctionCall::new("wrap", vec!["[".into(), "]".into()]),
            ]
        );
    }

    #[test]
    fn test_separator_inside_arguments() {
        let tokens = scan_default(r#"<<@a->replace("->", " to ")->upper@>>"#);
        assert_eq!(tokens[0].functions.len(), 2);
        assert_eq!(tokens[0].functions[0].args, vec!["->", " to "]);
        assert_eq!(tokens[0].functions[1].name, "upper");
    }

    #[test]
    fn test_malformed_call_kept_as_name() {
        let tokens = scan_default("<<@a->9lives@>>");
        assert_eq!(tokens[0].functions, vec![FunctionCall::new("9lives", vec![])]);
    }

    #[test]
    fn test_unterminated_token_stops_scan() {
        let tokens = scan_default("<<@a@>> <<@broken <<@b@>>");
        // `<<@broken <<@b@>>` is read as one body, so `b` is swallowed.
        assert_eq!(tokens.len(), 2);

        let tokens = scan_default("<<@a@>> <<@broken and <<@b@");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].path, "a");
    }

    #[test]
    fn test_overlapping_delimiters_give_empty_token() {
        let tokens = scan_default("<<@>> hi <<@a@>>");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].raw, "<<@>>");
        assert_eq!(tokens[0].key, "");
        assert_eq!(tokens[0].end, 5);
        assert_eq!(tokens[1].path, "a");
        assert_eq!(tokens[1].start, 9);
    }

    #[test]
    fn test_identical_delimiters() {
        let delimiters = Delimiters::new("%%", "%%");
        let tokens = scan("%%a%% and %%b%%", &delimiters);
        let paths: Vec<_> = tokens.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_body_is_captured() {
        let tokens = scan_default("x <<@@>> y");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].key, "");
        assert_eq!(tokens[0].path, "");
    }

    #[test]
    fn test_adjacent_tokens() {
        let tokens = scan_default("<<@a@>><<@b@>>[(x)]<<@c@>>");
        let paths: Vec<_> = tokens.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "b", "c"]);
        assert_eq!(tokens[0].end, tokens[1].start);
        assert_eq!(tokens[1].end, tokens[2].start);
    }

    #[test]
    fn test_fallback_requires_close() {
        let tokens = scan_default("<<@a@>>[(never closed");
        assert_eq!(tokens[0].fallback, None);
        assert_eq!(tokens[0].raw, "<<@a@>>");
    }

    #[test]
    fn test_fallback_is_non_greedy() {
        let tokens = scan_default("<<@a@>>[(one)] and [(two)]");
        assert_eq!(tokens[0].fallback.as_deref(), Some("one"));
    }

    #[test]
    fn test_fallback_stays_on_one_line() {
        let tokens = scan_default("<<@a@>>[(x\ny)]");
        assert_eq!(tokens[0].fallback, None);
        assert_eq!(tokens[0].raw, "<<@a@>>");
    }

    #[test]
    fn test_apostrophe_outside_arguments() {
        let tokens = scan_default("<<@a->don't->upper@>>");
        assert_eq!(
            tokens[0].functions,
            vec![
                FunctionCall::new("don't", vec![]),
                FunctionCall::new("upper", vec![])
            ]
        );
    }

    #[test]
    fn test_custom_delimiters() {
        let delimiters = Delimiters::new("{{", "}}");
        let tokens = scan("Hi {{user:name->trim}}[(you)]!", &delimiters);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].path, "user.name");
        assert_eq!(tokens[0].raw, "{{user:name->trim}}[(you)]");
    }

    #[test]
    fn test_multibyte_offsets() {
        let input = "💙 <<@a@>>";
        let tokens = scan_default(input);
        assert_eq!(&input[tokens[0].start..tokens[0].end], "<<@a@>>");
    }

    #[test]
    fn test_empty_delimiters_scan_nothing() {
        let delimiters = Delimiters::new("", "@>>");
        assert!(scan("<<@a@>>", &delimiters).is_empty());
    }
}
