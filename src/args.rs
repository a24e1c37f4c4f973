//! Argument tokenizer for function calls.
//!
//! Splits the raw text between a function's parentheses into literal
//! arguments. Commas split arguments unless they sit inside a `"` or `'`
//! quoted region; a quote preceded by a backslash does not close the region
//! and is kept together with its backslash.

/// One character of the argument being built, tagged with whether it came
/// from inside quotes. Quoted whitespace survives trimming.
type Marked = (char, bool);

/// Splits a raw argument list into argument literals.
///
/// The tokenizer never fails:
/// - whitespace outside quotes around each argument is trimmed,
/// - interior empty segments (`a,,b`) are kept as empty strings,
/// - a trailing empty segment (`a,b,` or an empty input) is dropped,
/// - an explicitly quoted empty string (`''`) is kept even at the end,
/// - an unterminated quote swallows the rest of the input as one argument,
///   without the opening quote.
///
/// # Examples
/// ```
/// use plynt::args::tokenize_args;
///
/// assert_eq!(tokenize_args(r#"4, "0""#), vec!["4", "0"]);
/// assert_eq!(tokenize_args(r#"", ", ' | '"#), vec![", ", " | "]);
/// ```
pub fn tokenize_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current: Vec<Marked> = Vec::new();
    let mut quoted_segment = false;
    let mut open: Option<char> = None;
    let mut prev: Option<char> = None;

    for ch in input.chars() {
        match open {
            Some(quote) if ch == quote && prev != Some('\\') => open = None,
            Some(_) => current.push((ch, true)),
            None if ch == '"' || ch == '\'' => {
                open = Some(ch);
                quoted_segment = true;
            }
            None if ch == ',' => {
                args.push(finish(&current));
                current.clear();
                quoted_segment = false;
            }
            None => current.push((ch, false)),
        }
        prev = Some(ch);
    }

    let last = finish(&current);
    if !last.is_empty() || quoted_segment {
        args.push(last);
    }

    args
}

/// Trims unquoted whitespace at both ends and collects the rest.
fn finish(chars: &[Marked]) -> String {
    let is_padding = |&(c, quoted): &Marked| !quoted && c.is_whitespace();
    let start = chars
        .iter()
        .position(|m| !is_padding(m))
        .unwrap_or(chars.len());
    let end = chars
        .iter()
        .rposition(|m| !is_padding(m))
        .map_or(start, |i| i + 1);

    chars[start..end].iter().map(|&(c, _)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_arguments() {
        assert_eq!(tokenize_args("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize_args("").is_empty());
        assert!(tokenize_args("   ").is_empty());
    }

    #[test]
    fn test_quoted_comma() {
        assert_eq!(tokenize_args(r#""a,b", c"#), vec!["a,b", "c"]);
        assert_eq!(tokenize_args("'x, y'"), vec!["x, y"]);
    }

    #[test]
    fn test_quoted_whitespace_is_kept() {
        assert_eq!(tokenize_args(r#"  " padded "  "#), vec![" padded "]);
    }

    #[test]
    fn test_other_quote_inside_region() {
        assert_eq!(tokenize_args(r#""it's", 'say "hi"'"#), vec!["it's", "say \"hi\""]);
    }

    #[test]
    fn test_escaped_quote_keeps_backslash() {
        assert_eq!(tokenize_args(r#""a\"b", c"#), vec![r#"a\"b"#, "c"]);
        assert_eq!(tokenize_args(r#"'it\'s, fine'"#), vec![r#"it\'s, fine"#]);
    }

    #[test]
    fn test_interior_empty_kept_trailing_dropped() {
        assert_eq!(tokenize_args("a,,b"), vec!["a", "", "b"]);
        assert_eq!(tokenize_args("a,b,"), vec!["a", "b"]);
        assert_eq!(tokenize_args(",a"), vec!["", "a"]);
    }

    #[test]
    fn test_explicit_empty_string_at_end() {
        assert_eq!(tokenize_args("a, ''"), vec!["a", ""]);
    }

    #[test]
    fn test_unterminated_quote_takes_the_rest() {
        assert_eq!(tokenize_args(r#"a, "b, c"#), vec!["a", "b, c"]);
        assert_eq!(tokenize_args("'x"), vec!["x"]);
    }
}
