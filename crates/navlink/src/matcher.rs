//! Path matching against compiled route configs
//!
//! The whole remaining path is matched against each config's regex rather
//! than segment by segment, so a wildcard can catch anything left over even
//! when it is nested. Configs are tried in priority order and the first match
//! wins.

use regex::{Captures, Regex};
use serde_json::Value;

use crate::path::decode_component;
use crate::route::RouteConfig;
use crate::state::Params;

/// One resolved hop of a matched path
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedRoute {
    pub name: String,
    pub path: Option<String>,
    pub params: Option<Params>,
}

impl ParsedRoute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Result of a successful match
#[derive(Debug, Clone, PartialEq)]
pub struct PathMatch<'a> {
    /// Matched chain, root first
    pub routes: Vec<ParsedRoute>,
    /// Unconsumed rest of the path
    pub remaining: &'a str,
}

/// Matches a normalized path against configs in priority order
///
/// `remaining` must be normalized (see [`crate::path::normalize_path`]).
/// Returns `None` when no config matches.
pub fn match_against_configs<'a>(remaining: &'a str, configs: &[RouteConfig]) -> Option<PathMatch<'a>> {
    configs.iter().find_map(|config| {
        let regex = config.regex.as_ref()?;
        tracing::trace!(pattern = %config.pattern, path = remaining, "trying pattern");
        let captures = regex.captures(remaining)?;
        let whole = captures.get(0)?;

        tracing::trace!(
            pattern = %config.pattern,
            screens = %config.route_names.join(" > "),
            "path matched pattern"
        );

        let routes = config
            .route_names
            .iter()
            .map(|route_name| resolve_route(route_name, config, regex, &captures, configs))
            .collect();

        Some(PathMatch {
            routes,
            remaining: &remaining[whole.end()..],
        })
    })
}

/// Builds the hop for one screen of the matched chain
///
/// The params a screen owns are read through the config that compiled that
/// screen's own path, found by screen name and pattern prefix so the same
/// screen name at different levels does not mix up params.
fn resolve_route(
    route_name: &str,
    matched: &RouteConfig,
    regex: &Regex,
    captures: &Captures<'_>,
    configs: &[RouteConfig],
) -> ParsedRoute {
    let owner = configs
        .iter()
        .find(|config| config.screen == route_name && matched.pattern.starts_with(&config.pattern));

    let params = owner
        .map(|owner| extract_params(route_name, owner, regex, captures))
        .filter(|params| !params.is_empty());

    ParsedRoute {
        name: route_name.to_string(),
        path: None,
        params,
    }
}

fn extract_params(route_name: &str, owner: &RouteConfig, regex: &Regex, captures: &Captures<'_>) -> Params {
    regex
        .capture_names()
        .flatten()
        .filter_map(|group| {
            let index: usize = group.strip_prefix("param_")?.parse().ok()?;
            let param = owner.params.get(index)?;
            if param.screen != route_name {
                return None;
            }
            let name = param.name.as_ref()?;
            let raw = captures.name(group).map(|m| m.as_str()).filter(|raw| !raw.is_empty())?;

            let decoded = decode_component(raw);
            let value = match owner.parse.get(name) {
                Some(parser) => parser.parse(&decoded),
                None => Value::String(decoded.into_owned()),
            };

            Some((name.clone(), value))
        })
        .collect()
}
