//! Path resolution against JSON metadata.

use serde_json::{Map, Value};

/// Resolves `path` against `metadata`.
///
/// A literal key equal to the whole path wins over traversal, so flat
/// metadata such as `{"user.name": "X"}` works alongside nested objects.
/// Otherwise the path is split on `.` and each segment descends into an
/// object field, or into an array element when the segment is an index.
///
/// `null` counts as absent; present falsy values (`""`, `0`, `false`) do not.
///
/// # Examples
/// ```
/// use plynt::resolver::resolve;
/// use serde_json::json;
///
/// let data = json!({"user.name": "Direct", "user": {"name": "Nested"}});
/// assert_eq!(resolve("user.name", &data), Some(&json!("Direct")));
/// assert_eq!(resolve("user.age", &data), None);
/// ```
pub fn resolve<'a>(path: &str, metadata: &'a Value) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let root = metadata.as_object()?;
    if let Some(direct) = root.get(path) {
        return present(direct);
    }

    let mut current = metadata;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    present(current)
}

fn present(value: &Value) -> Option<&Value> {
    (!value.is_null()).then_some(value)
}

/// Converts a resolved value to the text fed into the function chain.
///
/// Strings pass through unchanged, scalars use their display form and
/// arrays/objects their compact JSON form.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Assigns `value` at the dot-separated `path`, creating intermediate
/// objects and replacing any non-object found on the way.
///
/// Does nothing when `path` is empty or `data` is not an object.
pub fn set_value(data: &mut Value, path: &str, value: Value) {
    if path.is_empty() || !data.is_object() {
        return;
    }

    let mut segments: Vec<&str> = path.split('.').collect();
    let last = segments.pop().unwrap_or(path);

    let mut current = data;
    for segment in segments {
        let map = ensure_object(current);
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    ensure_object(current).insert(last.to_string(), value);
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_access() {
        let data = json!({"user": {"profile": {"email": "a@b.c"}}});
        assert_eq!(resolve("user.profile.email", &data), Some(&json!("a@b.c")));
    }

    #[test]
    fn test_literal_key_takes_precedence() {
        let data = json!({"a.b": 1, "a": {"b": 2}});
        assert_eq!(resolve("a.b", &data), Some(&json!(1)));
    }

    #[test]
    fn test_literal_null_is_absent() {
        let data = json!({"a.b": null, "a": {"b": 2}});
        assert_eq!(resolve("a.b", &data), None);
    }

    #[test]
    fn test_falsy_values_are_present() {
        let data = json!({"empty": "", "zero": 0, "no": false});
        assert_eq!(resolve("empty", &data), Some(&json!("")));
        assert_eq!(resolve("zero", &data), Some(&json!(0)));
        assert_eq!(resolve("no", &data), Some(&json!(false)));
    }

    #[test]
    fn test_traversal_through_scalar_fails() {
        let data = json!({"user": "plain"});
        assert_eq!(resolve("user.name", &data), None);
    }

    #[test]
    fn test_array_index() {
        let data = json!({"items": [{"name": "first"}, {"name": "second"}]});
        assert_eq!(resolve("items.1.name", &data), Some(&json!("second")));
        assert_eq!(resolve("items.x", &data), None);
    }

    #[test]
    fn test_empty_path_or_non_object() {
        assert_eq!(resolve("", &json!({"": 1})), None);
        assert_eq!(resolve("a", &json!("text")), None);
        assert_eq!(resolve("0", &json!([1])), None);
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!("x")), "x");
        assert_eq!(stringify(&json!(199.99)), "199.99");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_set_value_creates_structure() {
        let mut data = json!({});
        set_value(&mut data, "user.name", json!("John"));
        set_value(&mut data, "user.age", json!(""));
        set_value(&mut data, "title", json!("x"));
        assert_eq!(
            data,
            json!({"user": {"name": "John", "age": ""}, "title": "x"})
        );
    }

    #[test]
    fn test_set_value_replaces_scalars_on_the_way() {
        let mut data = json!({"user": "plain"});
        set_value(&mut data, "user.name", json!("John"));
        assert_eq!(data, json!({"user": {"name": "John"}}));
    }

    #[test]
    fn test_set_value_ignores_non_objects() {
        let mut data = json!([1]);
        set_value(&mut data, "a", json!(1));
        assert_eq!(data, json!([1]));
    }
}
