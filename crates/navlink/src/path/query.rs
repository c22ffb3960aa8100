//! Query string parsing
//!
//! Decodes `a=1&b=two+words&b=x&flag` into a flat JSON object:
//! - `+` is a space, `%XX` sequences are percent-decoded
//! - a repeated key collects its values into an array
//! - a key without `=` maps to `null`

use serde_json::Value;

use super::decode_component;
use crate::state::Params;

fn decode_query_component(raw: &str) -> String {
    decode_component(&raw.replace('+', " ")).into_owned()
}

/// Parses a query string (without the path part)
///
/// # Examples
///
/// ```
/// use navlink::path::parse_query;
/// use serde_json::json;
///
/// let params = parse_query("?count=42&tag=a&tag=b&draft");
/// assert_eq!(params["count"], json!("42"));
/// assert_eq!(params["tag"], json!(["a", "b"]));
/// assert_eq!(params["draft"], json!(null));
/// ```
pub fn parse_query(query: &str) -> Params {
    let query = query.trim();
    let query = query
        .strip_prefix(|c: char| matches!(c, '?' | '#' | '&'))
        .unwrap_or(query);

    let mut params = Params::new();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, Value::String(decode_query_component(value))),
            None => (pair, Value::Null),
        };
        let key = decode_query_component(key);

        match params.get_mut(&key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                params.insert(key, value);
            }
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_query() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
        assert!(parse_query("&&").is_empty());
    }

    #[test]
    fn test_plus_and_percent_decoding() {
        let params = parse_query("name=jane+doe&city=New%20York&sym=%2B");
        assert_eq!(params["name"], json!("jane doe"));
        assert_eq!(params["city"], json!("New York"));
        assert_eq!(params["sym"], json!("+"));
    }

    #[test]
    fn test_value_keeps_later_equals_signs() {
        let params = parse_query("expr=a=b");
        assert_eq!(params["expr"], json!("a=b"));
    }

    #[test]
    fn test_repeated_keys_become_arrays() {
        let params = parse_query("id=1&id=2&id=3&flag&flag=on");
        assert_eq!(params["id"], json!(["1", "2", "3"]));
        assert_eq!(params["flag"], json!([null, "on"]));
    }

    #[test]
    fn test_empty_value_is_empty_string() {
        let params = parse_query("q=");
        assert_eq!(params["q"], json!(""));
    }
}
