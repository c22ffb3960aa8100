//! Builds a nested navigation state from a matched route chain

use std::collections::HashMap;

use serde_json::Value;

use crate::config::ParamParser;
use crate::matcher::ParsedRoute;
use crate::path::parse_query;
use crate::route::{InitialRouteConfig, RouteConfig};
use crate::state::{NavigationState, Params, Route};

/// Initial route to synthesize next to `name` under `parents`, if any
///
/// Only the first initial-route entry declared for exactly `parents` counts.
/// When `name` already is that initial route nothing is synthesized.
fn find_initial_route<'a>(
    name: &str,
    parents: &[String],
    initial_routes: &'a [InitialRouteConfig],
) -> Option<&'a str> {
    initial_routes
        .iter()
        .find(|config| config.parent_screens == parents)
        .map(|config| config.initial_route_name.as_str())
        .filter(|initial| *initial != name)
}

/// Builds one frame and, recursively, every frame below it
fn build_frame(
    routes: &mut std::vec::IntoIter<ParsedRoute>,
    parents: &mut Vec<String>,
    initial_routes: &[InitialRouteConfig],
) -> Option<NavigationState> {
    let parsed = routes.next()?;
    let initial = find_initial_route(&parsed.name, parents, initial_routes).map(Route::new);

    parents.push(parsed.name.clone());
    let nested = build_frame(routes, parents, initial_routes);

    let route = Route {
        key: None,
        name: parsed.name,
        params: parsed.params,
        path: parsed.path,
        state: nested.map(Box::new),
        extra: Params::new(),
    };

    Some(match initial {
        Some(initial) => NavigationState::new(vec![initial, route]).with_index(1),
        None => NavigationState::new(vec![route]),
    })
}

/// Parsers of the first config whose chain ends at `name`
fn find_parse_config_for_route<'a>(
    name: &str,
    configs: &'a [RouteConfig],
) -> Option<&'a HashMap<String, ParamParser>> {
    configs
        .iter()
        .find(|config| config.route_names.last().is_some_and(|last| last == name))
        .map(|config| &config.parse)
}

/// Query params of `path`, converted with `parse` where a parser is declared
///
/// Only plain string values are converted; repeated keys (arrays) and bare
/// keys (`null`) are kept as they are.
fn parse_query_params(path: &str, parse: Option<&HashMap<String, ParamParser>>) -> Option<Params> {
    let query = path.split('?').nth(1)?;
    let mut params = parse_query(query);

    if let Some(parse) = parse {
        for (name, value) in params.iter_mut() {
            let parsed = match (parse.get(name), &*value) {
                (Some(parser), Value::String(raw)) => parser.parse(raw),
                _ => continue,
            };
            *value = parsed;
        }
    }

    (!params.is_empty()).then_some(params)
}

/// Turns a matched chain (root first) into a nested state
///
/// The focused route gets `path` (one trailing slash removed) and the query
/// params of `path` merged over its own params. `configs` supplies the
/// query parsers; without it query values stay strings. Returns `None` for an
/// empty chain.
pub fn create_nested_state(
    path: &str,
    routes: Vec<ParsedRoute>,
    initial_routes: &[InitialRouteConfig],
    configs: Option<&[RouteConfig]>,
) -> Option<NavigationState> {
    let mut state = build_frame(&mut routes.into_iter(), &mut Vec::new(), initial_routes)?;

    let focused = state.find_focused_route_mut()?;
    focused.path = Some(path.strip_suffix('/').unwrap_or(path).to_string());

    let parse = configs.and_then(|configs| find_parse_config_for_route(&focused.name, configs));
    if let Some(query) = parse_query_params(path, parse) {
        focused.params.get_or_insert_with(Params::new).extend(query);
    }

    Some(state)
}
