//! Flattens the nested screen config into route configs
//!
//! Every screen with a `path` yields one [`RouteConfig`] for the full chain
//! from the root to that screen. Screens with nested `screens` recurse, and
//! an `initialRouteName` next to `screens` is recorded as an
//! [`InitialRouteConfig`] for the chain it belongs to.

use std::collections::HashMap;

use super::parser::{create_config_item, PathContribution};
use super::priority::{check_for_duplicates, sort_configs};
use super::{InitialRouteConfig, RouteConfig};
use crate::config::{LinkingOptions, ScreenConfig};
use crate::error::{LinkingError, Result};

/// Compiled, ordered resources derived from one set of options
#[derive(Debug, Clone, Default)]
pub struct NormalizedConfigs {
    pub configs: Vec<RouteConfig>,
    pub initial_routes: Vec<InitialRouteConfig>,
}

/// Compiles, sorts and checks all route configs of `options`
pub fn normalize_configs(options: &LinkingOptions) -> Result<NormalizedConfigs> {
    let mut normalized = NormalizedConfigs::default();

    if let Some(name) = &options.initial_route_name {
        normalized.initial_routes.push(InitialRouteConfig {
            initial_route_name: name.clone(),
            parent_screens: Vec::new(),
        });
    }

    if let Some(screens) = &options.screens {
        for (screen, config) in screens.iter() {
            collect_configs(screen, config, &[], Vec::new(), &mut normalized)?;
        }
    }

    sort_configs(&mut normalized.configs);
    check_for_duplicates(&normalized.configs)?;

    Ok(normalized)
}

/// Recursive walk over one screen and its nested screens
///
/// `parents` is the route-name chain above `screen`; `paths` are the path
/// contributions collected along it.
fn collect_configs(
    screen: &str,
    config: &ScreenConfig,
    parents: &[String],
    mut paths: Vec<PathContribution>,
    out: &mut NormalizedConfigs,
) -> Result<()> {
    let route_names: Vec<String> = parents
        .iter()
        .cloned()
        .chain(std::iter::once(screen.to_string()))
        .collect();

    match config {
        ScreenConfig::BarePath(path) => {
            paths.push(PathContribution::new(screen, path.as_str()));
            out.configs.push(create_config_item(
                screen,
                route_names,
                &paths,
                HashMap::new(),
            )?);
        }
        ScreenConfig::Detailed(options) => {
            if options.exact && options.path.is_none() {
                return Err(LinkingError::ExactWithoutPath {
                    screen: screen.to_string(),
                });
            }

            if let Some(path) = &options.path {
                if options.exact {
                    paths.clear();
                }

                paths.push(PathContribution::new(screen, path.as_str()));
                out.configs.push(create_config_item(
                    screen,
                    route_names.clone(),
                    &paths,
                    options.parse.clone(),
                )?);
            }

            if let Some(screens) = &options.screens {
                // initialRouteName without screens has no navigator to apply to
                if let Some(initial) = &options.initial_route_name {
                    out.initial_routes.push(InitialRouteConfig {
                        initial_route_name: initial.clone(),
                        parent_screens: route_names.clone(),
                    });
                }

                for (nested, nested_config) in screens.iter() {
                    collect_configs(nested, nested_config, &route_names, paths.clone(), out)?;
                }
            }
        }
    }

    Ok(())
}
