//! Path utilities for normalization and decoding
//!
//! All functions are **pure** apart from the warning logged for undecodable
//! components: given same input, always produce same output.

use std::borrow::Cow;

pub mod query;

pub use query::parse_query;

/// Checks whether a path is already in matching form
///
/// # Rules
///
/// - Must not be empty
/// - Must not start with `/`
/// - Must end with `/`
/// - Must not contain `//` or a query string
///
/// # Examples
///
/// ```
/// use navlink::path::is_normalized;
///
/// assert!(is_normalized("chat/jane/"));
/// assert!(!is_normalized("/chat/jane"));
/// assert!(!is_normalized("chat//jane/"));
/// assert!(!is_normalized("chat/?x=1"));
/// ```
pub fn is_normalized(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && path.ends_with('/')
        && !path.contains("//")
        && !path.contains('?')
}

/// Normalizes an incoming path for matching
///
/// Returns `Cow::Borrowed` when the input is already normalized.
///
/// - Query string: `chat?x=1` → `chat/`
/// - Leading slash: `/chat` → `chat/`
/// - Repeated slashes: `a//b` → `a/b/`
/// - Empty path: `` or `/` → `/`
///
/// # Examples
///
/// ```
/// use navlink::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("chat/"), Cow::Borrowed("chat/")));
/// assert_eq!(normalize_path("//chat///jane?ref=push"), "chat/jane/");
/// assert_eq!(normalize_path("/"), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_normalized(path) {
        return Cow::Borrowed(path);
    }

    let without_query = path.split_once('?').map_or(path, |(head, _)| head);

    let mut normalized = without_query
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(String::with_capacity(without_query.len() + 1), |mut acc, segment| {
            acc.push_str(segment);
            acc.push('/');
            acc
        });

    if normalized.is_empty() {
        normalized.push('/');
    }

    Cow::Owned(normalized)
}

/// Strips a configured prefix from a normalized path
///
/// The prefix is normalized the same way as paths. Returns `None` when the
/// path does not start with it; an empty prefix strips nothing.
///
/// # Examples
///
/// ```
/// use navlink::path::strip_prefix;
///
/// assert_eq!(strip_prefix("app/chat/", "/app"), Some("chat/"));
/// assert_eq!(strip_prefix("chat/", "app"), None);
/// assert_eq!(strip_prefix("chat/", ""), Some("chat/"));
/// ```
pub fn strip_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = normalize_path(prefix);
    if prefix == "/" {
        return Some(path);
    }

    path.strip_prefix(prefix.as_ref())
}

/// Percent-decodes one path component, keeping the raw text when it is not
/// valid UTF-8 after decoding
pub fn decode_component(raw: &str) -> Cow<'_, str> {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!(raw, error = %err, "keeping undecodable path component as-is");
            Cow::Borrowed(raw)
        }
    }
}
