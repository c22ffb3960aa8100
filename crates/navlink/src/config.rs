//! Declarative linking configuration
//!
//! A config is a tree of screens. Each screen either maps straight to a path
//! string or carries detailed options (path, param parsers, nested screens).
//! Declaration order is significant: it breaks ties between patterns of
//! equal priority, so screens are kept in an ordered [`ScreenMap`].
//!
//! Configs can be built in code with the `with_*` builders or loaded from
//! JSON / TOML:
//!
//! ```
//! use navlink::LinkingOptions;
//!
//! let options = LinkingOptions::from_json_str(r#"{
//!     "screens": {
//!         "Chat": { "path": "chat/:author/:id", "parse": { "id": "number" } }
//!     }
//! }"#)?;
//!
//! assert!(options.screens.is_some());
//! # Ok::<(), navlink::LinkingError>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{LinkingError, Result};

// ============================================================================
// Param Parsers
// ============================================================================

/// Signature of a custom param parser
pub type ParseFn = dyn Fn(&str) -> Value + Send + Sync;

/// Converts a decoded path or query value into a typed JSON value
#[derive(Clone)]
pub enum ParamParser {
    /// Numeric conversion: blank → 0, integers stay integers, garbage → null
    Number,
    /// `"true"` / `"false"`, anything else → null
    Boolean,
    /// User supplied conversion
    Custom(Arc<ParseFn>),
}

impl ParamParser {
    /// Wraps a closure as a parser
    ///
    /// # Examples
    ///
    /// ```
    /// use navlink::ParamParser;
    /// use serde_json::json;
    ///
    /// let upper = ParamParser::custom(|raw| json!(raw.to_uppercase()));
    /// assert_eq!(upper.parse("jane"), json!("JANE"));
    /// ```
    pub fn custom<F>(parse: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(parse))
    }

    /// Applies the parser to a raw value
    pub fn parse(&self, raw: &str) -> Value {
        match self {
            Self::Number => parse_number(raw),
            Self::Boolean => parse_boolean(raw),
            Self::Custom(parse) => parse(raw),
        }
    }
}

impl fmt::Debug for ParamParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => f.write_str("Number"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for ParamParser {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        match name.as_str() {
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            other => Err(de::Error::unknown_variant(other, &["number", "boolean"])),
        }
    }
}

/// Number conversion with the rules of a JS `Number()` call
///
/// Blank input is `0` and anything that is not a finite number is `null`.
/// `0x`/`0o`/`0b` literals take no sign. Integral values come out as
/// integers, so `"1e3"` gives `1000`.
fn parse_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::from(0);
    }

    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }

    let number = match radix_literal(trimmed) {
        Some(number) => number,
        None if trimmed.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '.' | '+' | '-')) => {
            match trimmed.parse::<f64>() {
                Ok(number) => number,
                Err(_) => return Value::Null,
            }
        }
        None => return Value::Null,
    };

    if !number.is_finite() {
        return Value::Null;
    }
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        return Value::from(number as i64);
    }
    serde_json::Number::from_f64(number).map_or(Value::Null, Value::Number)
}

/// Value of a `0x`, `0o` or `0b` literal, `None` if `raw` is not one
fn radix_literal(raw: &str) -> Option<f64> {
    let (radix, digits) = match raw.get(..2)? {
        "0x" | "0X" => (16, &raw[2..]),
        "0o" | "0O" => (8, &raw[2..]),
        "0b" | "0B" => (2, &raw[2..]),
        _ => return None,
    };
    if digits.is_empty() {
        return None;
    }

    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

fn parse_boolean(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Null,
    }
}

// ============================================================================
// Screen Config Tree
// ============================================================================

/// Insertion-ordered map of screen name → config
///
/// Re-inserting an existing name replaces its config in place, like assigning
/// an existing key of an object literal.
#[derive(Debug, Clone, Default)]
pub struct ScreenMap {
    entries: Vec<(String, ScreenConfig)>,
}

impl ScreenMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a screen (functional builder)
    pub fn with_screen(mut self, name: impl Into<String>, config: impl Into<ScreenConfig>) -> Self {
        self.insert(name.into(), config.into());
        self
    }

    pub fn insert(&mut self, name: String, config: ScreenConfig) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = config,
            None => self.entries.push((name, config)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ScreenConfig> {
        self.entries
            .iter()
            .find_map(|(existing, config)| (existing == name).then_some(config))
    }

    /// Screens in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScreenConfig)> {
        self.entries
            .iter()
            .map(|(name, config)| (name.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ScreenMap
where
    K: Into<String>,
    V: Into<ScreenConfig>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (name, config)| map.with_screen(name, config))
    }
}

impl<'de> Deserialize<'de> for ScreenMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScreenMapVisitor;

        impl<'de> Visitor<'de> for ScreenMapVisitor {
            type Value = ScreenMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of screen names to path strings or screen options")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = ScreenMap::new();
                while let Some((name, config)) = access.next_entry::<String, ScreenConfig>()? {
                    map.insert(name, config);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ScreenMapVisitor)
    }
}

/// Config for a single screen
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScreenConfig {
    /// Shorthand: the screen's path and nothing else
    BarePath(String),
    /// Full options
    Detailed(ScreenOptions),
}

impl ScreenConfig {
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::BarePath(path) => Some(path),
            Self::Detailed(options) => options.path.as_deref(),
        }
    }

    pub fn initial_route_name(&self) -> Option<&str> {
        match self {
            Self::BarePath(_) => None,
            Self::Detailed(options) => options.initial_route_name.as_deref(),
        }
    }

    pub fn screens(&self) -> Option<&ScreenMap> {
        match self {
            Self::BarePath(_) => None,
            Self::Detailed(options) => options.screens.as_ref(),
        }
    }

    /// Whether this screen hosts a navigator with at least one configured child
    pub fn has_nested_screens(&self) -> bool {
        self.screens().is_some_and(|screens| !screens.is_empty())
    }
}

impl From<&str> for ScreenConfig {
    fn from(path: &str) -> Self {
        Self::BarePath(path.to_string())
    }
}

impl From<String> for ScreenConfig {
    fn from(path: String) -> Self {
        Self::BarePath(path)
    }
}

impl From<ScreenOptions> for ScreenConfig {
    fn from(options: ScreenOptions) -> Self {
        Self::Detailed(options)
    }
}

/// Detailed screen options
///
/// # Examples
///
/// ```
/// use navlink::{ParamParser, ScreenOptions};
///
/// let chat = ScreenOptions::new()
///     .with_path("chat/:author/:id")
///     .with_parse("id", ParamParser::Number);
///
/// assert_eq!(chat.path.as_deref(), Some("chat/:author/:id"));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScreenOptions {
    /// Path segment(s) contributed by this screen
    #[serde(default)]
    pub path: Option<String>,
    /// Ignore the path segments of all ancestors
    #[serde(default)]
    pub exact: bool,
    /// Param name → parser
    #[serde(default)]
    pub parse: HashMap<String, ParamParser>,
    /// Implicit first screen of the nested navigator
    #[serde(default)]
    pub initial_route_name: Option<String>,
    /// Nested navigator screens
    #[serde(default)]
    pub screens: Option<ScreenMap>,
}

impl ScreenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn with_parse(mut self, param: impl Into<String>, parser: ParamParser) -> Self {
        self.parse.insert(param.into(), parser);
        self
    }

    pub fn with_initial_route_name(mut self, name: impl Into<String>) -> Self {
        self.initial_route_name = Some(name.into());
        self
    }

    pub fn with_screens(mut self, screens: ScreenMap) -> Self {
        self.screens = Some(screens);
        self
    }

    /// Adds one nested screen, creating the nested map if needed
    pub fn with_screen(mut self, name: impl Into<String>, config: impl Into<ScreenConfig>) -> Self {
        self.screens
            .get_or_insert_with(ScreenMap::new)
            .insert(name.into(), config.into());
        self
    }
}

// ============================================================================
// Linking Options
// ============================================================================

/// Top-level linking options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkingOptions {
    /// Prefix stripped from incoming paths before matching
    #[serde(default)]
    pub path: Option<String>,
    /// Implicit first screen of the root navigator
    #[serde(default)]
    pub initial_route_name: Option<String>,
    /// Root screens; `None` means path segments are used as screen names
    #[serde(default)]
    pub screens: Option<ScreenMap>,
}

impl LinkingOptions {
    pub fn new(screens: ScreenMap) -> Self {
        Self {
            screens: Some(screens),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, prefix: impl Into<String>) -> Self {
        self.path = Some(prefix.into());
        self
    }

    pub fn with_initial_route_name(mut self, name: impl Into<String>) -> Self {
        self.initial_route_name = Some(name.into());
        self
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Rejects configs that deserialize fine but cannot be meaningful
    ///
    /// Checks every level for empty screen names, empty `initialRouteName`
    /// values and empty parse keys.
    pub fn validate(&self) -> Result<()> {
        if self.initial_route_name.as_deref() == Some("") {
            return Err(LinkingError::InvalidConfig(
                "'initialRouteName' must not be empty".to_string(),
            ));
        }

        match &self.screens {
            Some(screens) => validate_screens(screens, &[]),
            None => Ok(()),
        }
    }
}

fn validate_screens(screens: &ScreenMap, parents: &[&str]) -> Result<()> {
    screens.iter().try_for_each(|(name, config)| {
        let chain = parents
            .iter()
            .copied()
            .chain(std::iter::once(name))
            .collect::<Vec<_>>();

        if name.is_empty() {
            return Err(LinkingError::InvalidConfig(format!(
                "empty screen name under '{}'",
                parents.join(" > ")
            )));
        }

        let ScreenConfig::Detailed(options) = config else {
            return Ok(());
        };

        if options.initial_route_name.as_deref() == Some("") {
            return Err(LinkingError::InvalidConfig(format!(
                "'initialRouteName' of '{}' must not be empty",
                chain.join(" > ")
            )));
        }

        if options.parse.keys().any(String::is_empty) {
            return Err(LinkingError::InvalidConfig(format!(
                "'parse' of '{}' declares an empty param name",
                chain.join(" > ")
            )));
        }

        match &options.screens {
            Some(nested) => validate_screens(nested, &chain),
            None => Ok(()),
        }
    })
}

// ============================================================================
// Config View
// ============================================================================

/// Read-only view over one level of the config tree
///
/// The root level is built from [`LinkingOptions`], every other level from a
/// [`ScreenConfig`]. Only the navigator shape is visible: the initial route
/// and the nested screens.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ConfigNode<'a> {
    pub(crate) initial_route_name: Option<&'a str>,
    screens: Option<&'a ScreenMap>,
}

impl<'a> ConfigNode<'a> {
    pub(crate) fn root(options: Option<&'a LinkingOptions>) -> Self {
        options
            .map(|options| Self {
                initial_route_name: options.initial_route_name.as_deref(),
                screens: options.screens.as_ref(),
            })
            .unwrap_or_default()
    }

    fn from_screen(config: &'a ScreenConfig) -> Self {
        Self {
            initial_route_name: config.initial_route_name(),
            screens: config.screens(),
        }
    }

    pub(crate) fn child(&self, name: &str) -> Option<Self> {
        self.screens
            .and_then(|screens| screens.get(name))
            .map(Self::from_screen)
    }

    pub(crate) fn has_nested_screens(&self) -> bool {
        self.screens.is_some_and(|screens| !screens.is_empty())
    }
}
