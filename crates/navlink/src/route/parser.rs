//! Pattern compilation for route configs
//!
//! Pure functional compiler that turns the path contributions of a screen
//! chain into one [`RouteConfig`]: the joined pattern string, one
//! [`PatternParam`] per segment and the anchored regex.

use std::collections::HashMap;

use regex::Regex;

use super::pattern::{classify_segment, PatternSegmentType};
use super::{PatternParam, RouteConfig};
use crate::config::ParamParser;
use crate::error::{LinkingError, Result};

/// A `path` string contributed by one screen of a chain
#[derive(Debug, Clone, PartialEq)]
pub struct PathContribution {
    pub screen: String,
    pub path: String,
}

impl PathContribution {
    pub fn new(screen: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            screen: screen.into(),
            path: path.into(),
        }
    }
}

/// Internal state accumulator for fold-based compilation
///
/// Every segment appends one param entry and one regex fragment. Param
/// groups are named `param_<i>` where `i` is the segment's index in
/// `params`, so capture group names map straight back to their entry.
#[derive(Default)]
struct ParseState {
    params: Vec<PatternParam>,
    source: String,
}

impl ParseState {
    /// Adds a literal or wildcard segment
    fn with_plain_segment(mut self, screen: &str, segment: &PatternSegmentType) -> Self {
        let reg = format!("{}/", segment.regex_body());
        self.source.push_str(&reg);
        self.params.push(PatternParam {
            screen: screen.to_string(),
            name: None,
            reg,
            optional: false,
        });
        self
    }

    /// Adds a named parameter segment
    fn with_param(mut self, screen: &str, segment: &PatternSegmentType, name: &str, optional: bool) -> Self {
        let index = self.params.len();
        let reg = segment.regex_body();
        self.source.push_str(&format!(
            "(((?P<param_{index}>{reg})/){})",
            if optional { "?" } else { "" }
        ));
        self.params.push(PatternParam {
            screen: screen.to_string(),
            name: Some(name.to_string()),
            reg,
            optional,
        });
        self
    }

    fn with_segment(self, (screen, segment): (&str, &str)) -> Self {
        let classified = classify_segment(segment);
        match &classified {
            PatternSegmentType::Param { name, optional, .. } => {
                self.with_param(screen, &classified, name, *optional)
            }
            _ => self.with_plain_segment(screen, &classified),
        }
    }

    /// Anchors the regex at both ends; `None` when there is nothing to match
    fn into_regex_source(self) -> (Vec<PatternParam>, Option<String>) {
        let source = (!self.params.is_empty()).then(|| format!("^({})$", self.source));
        (self.params, source)
    }
}

/// Drops empty segments: `/a//b/` → `a/b`
fn normalize_contribution(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Compiles the chain ending at `screen` into a route config
///
/// `paths` holds the path contributions of the chain in root → leaf order.
/// Contributions that are empty after normalization add nothing.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use navlink::route::parser::{create_config_item, PathContribution};
///
/// let config = create_config_item(
///     "Chat",
///     vec!["Chat".to_string()],
///     &[PathContribution::new("Chat", "chat/:author")],
///     HashMap::new(),
/// )?;
///
/// assert_eq!(config.pattern, "chat/:author");
/// assert_eq!(config.params.len(), 2);
/// assert!(config.regex.as_ref().unwrap().is_match("chat/jane/"));
/// # Ok::<(), navlink::LinkingError>(())
/// ```
pub fn create_config_item(
    screen: &str,
    route_names: Vec<String>,
    paths: &[PathContribution],
    parse: HashMap<String, ParamParser>,
) -> Result<RouteConfig> {
    let normalized: Vec<PathContribution> = paths
        .iter()
        .map(|contribution| PathContribution::new(&contribution.screen, normalize_contribution(&contribution.path)))
        .filter(|contribution| !contribution.path.is_empty())
        .collect();

    let pattern = normalized
        .iter()
        .map(|contribution| contribution.path.as_str())
        .collect::<Vec<_>>()
        .join("/");

    let (params, source) = normalized
        .iter()
        .flat_map(|contribution| {
            contribution
                .path
                .split('/')
                .map(move |segment| (contribution.screen.as_str(), segment))
        })
        .fold(ParseState::default(), ParseState::with_segment)
        .into_regex_source();

    let regex = source
        .map(|source| Regex::new(&source))
        .transpose()
        .map_err(|source| LinkingError::InvalidPattern {
            screen: screen.to_string(),
            pattern: pattern.clone(),
            source,
        })?;

    Ok(RouteConfig {
        screen: screen.to_string(),
        pattern,
        regex,
        params,
        route_names,
        parse,
    })
}
