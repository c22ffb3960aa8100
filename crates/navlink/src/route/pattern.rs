//! Pattern segment classification
//!
//! Pure parsing of one `/`-separated segment of a screen path into a typed
//! segment. Same input → same output, no side effects.

/// Default regex for a parameter without an inline constraint
pub const DEFAULT_PARAM_REGEX: &str = "[^/]+";

/// Represents the kinds of segments a screen path can contain
///
/// # Examples
///
/// ```
/// use navlink::route::pattern::{classify_segment, PatternSegmentType};
///
/// assert!(matches!(classify_segment("chat"), PatternSegmentType::Static(_)));
/// assert!(matches!(classify_segment("*"), PatternSegmentType::Wildcard));
///
/// let seg = classify_segment(":id(\\d+)?");
/// assert_eq!(
///     seg,
///     PatternSegmentType::Param {
///         name: "id".to_string(),
///         regex: Some("\\d+".to_string()),
///         optional: true,
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PatternSegmentType {
    /// Literal text, matched verbatim
    Static(String),
    /// `:name`, `:name?`, `:name(regex)` or `:name(regex)?`
    Param {
        name: String,
        regex: Option<String>,
        optional: bool,
    },
    /// `*`: swallows the rest of the path
    Wildcard,
}

impl PatternSegmentType {
    /// Regex fragment this segment matches, without the trailing slash
    pub fn regex_body(&self) -> String {
        match self {
            Self::Static(text) => regex::escape(text),
            Self::Param { regex, .. } => regex
                .as_deref()
                .map_or_else(|| DEFAULT_PARAM_REGEX.to_string(), ascii_perl_classes),
            Self::Wildcard => ".*".to_string(),
        }
    }
}

/// Gives `\d`, `\w` and `\b` in an inline param regex their ASCII meaning
///
/// Inline regexes are written in the JavaScript dialect, where these escapes
/// only cover ASCII, while the `regex` crate makes them Unicode-aware. `\s`
/// is Unicode in both and stays as written.
///
/// # Examples
///
/// ```
/// use navlink::route::pattern::ascii_perl_classes;
///
/// assert_eq!(ascii_perl_classes("\\d+"), "[0-9]+");
/// assert_eq!(ascii_perl_classes("[\\w-]+"), "[0-9A-Za-z_-]+");
/// ```
pub fn ascii_perl_classes(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_class = false;
    let mut chars = fragment.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('d') => out.push_str(if in_class { "0-9" } else { "[0-9]" }),
                Some('w') => out.push_str(if in_class { "0-9A-Za-z_" } else { "[0-9A-Za-z_]" }),
                Some('D') => out.push_str("[^0-9]"),
                Some('W') => out.push_str("[^0-9A-Za-z_]"),
                // backspace inside a class
                Some('b') if in_class => out.push_str("\\x08"),
                Some('b') => out.push_str("(?-u:\\b)"),
                Some('B') if !in_class => out.push_str("(?-u:\\B)"),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    out
}

/// Classifies a segment into a pattern type (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Wildcard**: exactly `*`
/// 2. **Param**: starts with `:`; a trailing `?` makes it optional and a
///    trailing `(...)` group is its regex
/// 3. **Static**: anything else
pub fn classify_segment(segment: &str) -> PatternSegmentType {
    if segment == "*" {
        return PatternSegmentType::Wildcard;
    }

    match segment.strip_prefix(':') {
        Some(param) => {
            let optional = param.ends_with('?');
            let param = param.strip_suffix('?').unwrap_or(param);
            let (name, regex) = parse_param_with_constraint(param);
            PatternSegmentType::Param {
                name,
                regex,
                optional,
            }
        }
        None => PatternSegmentType::Static(segment.to_string()),
    }
}

/// Splits `name(regex)` into its name and regex (pure function)
///
/// The regex group starts at the first `(` that leaves a non-empty body
/// before the closing `)` at the very end.
///
/// # Examples
///
/// ```
/// use navlink::route::pattern::parse_param_with_constraint;
///
/// assert_eq!(parse_param_with_constraint("id"), ("id".to_string(), None));
/// assert_eq!(
///     parse_param_with_constraint("id(\\d+)"),
///     ("id".to_string(), Some("\\d+".to_string()))
/// );
/// ```
pub fn parse_param_with_constraint(param: &str) -> (String, Option<String>) {
    param
        .strip_suffix(')')
        .and_then(|body| {
            body.find('(')
                .filter(|&open| open + 1 < body.len())
                .map(|open| (body[..open].to_string(), Some(body[open + 1..].to_string())))
        })
        .unwrap_or_else(|| (param.to_string(), None))
}
