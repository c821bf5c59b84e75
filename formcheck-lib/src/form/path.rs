//! Dotted path lookup into JSON values.

use serde_json::Value;

/// Walks `path` through nested objects and arrays.
///
/// Segments are separated by `.`; a segment addressing an array must be a
/// decimal index. Returns `None` as soon as a segment does not resolve.
///
/// # Example
///
/// ```
/// use formcheck_lib::form::value_at;
/// use serde_json::json;
///
/// let data = json!({ "item": { "authors": [{ "name": "Ada" }] } });
/// assert_eq!(value_at(&data, "item.authors.0.name"), Some(&json!("Ada")));
/// assert_eq!(value_at(&data, "item.title"), None);
/// ```
pub fn value_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Returns `true` unless the value is absent, `null` or an empty string.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_index_segments() {
        let data = json!({ "items": [{ "sku": "A-1" }, { "sku": "B-2" }] });
        assert_eq!(value_at(&data, "items.1.sku"), Some(&json!("B-2")));
        assert_eq!(value_at(&data, "items.2.sku"), None);
        assert_eq!(value_at(&data, "items.first"), None);
    }

    #[test]
    fn test_scalar_stops_walk() {
        let data = json!({ "name": "Ada" });
        assert_eq!(value_at(&data, "name.length"), None);
    }

    #[test]
    fn test_presence() {
        assert!(!is_present(None));
        assert!(!is_present(Some(&Value::Null)));
        assert!(!is_present(Some(&json!(""))));
        assert!(is_present(Some(&json!(" "))));
        assert!(is_present(Some(&json!(0))));
        assert!(is_present(Some(&json!(false))));
        assert!(is_present(Some(&json!([]))));
    }
}
