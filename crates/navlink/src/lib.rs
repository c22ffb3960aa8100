//! # navlink
//!
//! Deep-link translation between URL paths and nested navigation state:
//! - `state_from_path`: `/chat/jane/42` → a nested [`NavigationState`]
//! - `action_from_state`: a live state → one `NAVIGATE` (or `RESET`) action
//!
//! ## Config
//!
//! Screens are declared as a tree. Every screen may contribute a `path`
//! (static segments, `:params`, `:optional?` params, `:id(\d+)` params with
//! an inline regex, `*` wildcards), declare `parse` converters for its
//! params, and nest further `screens` with an `initialRouteName`.
//!
//! ## Compile once, match many
//!
//! [`Linking::new`] validates and compiles a config into a priority-ordered
//! list of patterns. The handle is cheap to clone and shares the compiled
//! resources, so keep one around instead of recompiling per path.
//!
//! ## Example
//!
//! ```
//! use navlink::{Linking, LinkingOptions, ParamParser, ScreenMap, ScreenOptions};
//! use serde_json::json;
//!
//! let linking = Linking::new(LinkingOptions::new(ScreenMap::new().with_screen(
//!     "Chat",
//!     ScreenOptions::new()
//!         .with_path("chat/:author/:id")
//!         .with_parse("id", ParamParser::Number),
//! )))?;
//!
//! let state = linking.state_from_path("/chat/jane/42").unwrap();
//! let chat = state.find_focused_route().unwrap();
//! assert_eq!(chat.name, "Chat");
//! assert_eq!(chat.params.as_ref().unwrap()["id"], json!(42));
//!
//! let action = linking.action_from_state(&state).unwrap();
//! assert_eq!(action.as_navigate().unwrap().leaf_path(), Some("/chat/jane/42"));
//! # Ok::<(), navlink::LinkingError>(())
//! ```

use std::sync::Arc;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod action;
pub mod builder;
pub mod config;
pub mod error;
pub mod matcher;
pub mod path;
pub mod route;
pub mod state;

pub use action::{action_from_state, NavigatePayload, NavigationAction, NestedTarget, ScreenParams};
pub use config::{LinkingOptions, ParamParser, ScreenConfig, ScreenMap, ScreenOptions};
pub use error::{LinkingError, Result};
pub use matcher::ParsedRoute;
pub use route::{InitialRouteConfig, RouteConfig};
pub use state::{NavigationState, Params, Route};

use builder::create_nested_state;
use matcher::match_against_configs;
use path::{decode_component, normalize_path, strip_prefix};
use route::{normalize_configs, NormalizedConfigs};

// ============================================================================
// Compiled Config Handle
// ============================================================================

#[derive(Debug)]
struct LinkingResources {
    options: LinkingOptions,
    configs: Vec<RouteConfig>,
    initial_routes: Vec<InitialRouteConfig>,
}

/// A validated, compiled linking config
///
/// Cloning shares the compiled patterns; nothing is recompiled.
#[derive(Debug, Clone)]
pub struct Linking {
    inner: Arc<LinkingResources>,
}

impl Linking {
    /// Validates and compiles `options`
    ///
    /// # Errors
    ///
    /// - [`LinkingError::InvalidConfig`] for empty names
    /// - [`LinkingError::ExactWithoutPath`] for `exact` on a screen without `path`
    /// - [`LinkingError::InvalidPattern`] when an inline param regex does not compile
    /// - [`LinkingError::DuplicatePattern`] when unrelated screens share a pattern
    pub fn new(options: LinkingOptions) -> Result<Self> {
        options.validate()?;
        let NormalizedConfigs {
            configs,
            initial_routes,
        } = normalize_configs(&options)?;

        tracing::debug!(
            patterns = configs.len(),
            initial_routes = initial_routes.len(),
            prefix = ?options.path,
            "compiled linking config"
        );

        Ok(Self {
            inner: Arc::new(LinkingResources {
                options,
                configs,
                initial_routes,
            }),
        })
    }

    pub fn options(&self) -> &LinkingOptions {
        &self.inner.options
    }

    /// Compiled patterns in matching order
    pub fn configs(&self) -> &[RouteConfig] {
        &self.inner.configs
    }

    pub fn initial_routes(&self) -> &[InitialRouteConfig] {
        &self.inner.initial_routes
    }

    /// Resolves `path` into a navigation state
    ///
    /// Returns `None` when the path does not start with the configured
    /// prefix or matches no pattern. Without any `screens` configured, the
    /// path segments themselves become the route names.
    pub fn state_from_path(&self, path: &str) -> Option<NavigationState> {
        let normalized = normalize_path(path);

        let remaining = match self.inner.options.path.as_deref() {
            Some(prefix) => match strip_prefix(&normalized, prefix) {
                Some(rest) => rest,
                None => {
                    tracing::debug!(path, prefix, "path does not start with the configured prefix");
                    return None;
                }
            },
            None => &*normalized,
        };
        let remaining = if remaining.is_empty() { "/" } else { remaining };

        if self.inner.options.screens.is_none() {
            let routes: Vec<ParsedRoute> = remaining
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(|segment| ParsedRoute::new(decode_component(segment)))
                .collect();

            return create_nested_state(path, routes, &self.inner.initial_routes, None);
        }

        let configs = self.inner.configs.as_slice();

        let routes = if remaining == "/" {
            configs.iter().find(|config| config.pattern.is_empty()).map(|config| {
                config
                    .route_names
                    .iter()
                    .map(|name| ParsedRoute::new(name.as_str()))
                    .collect()
            })
        } else {
            match_against_configs(remaining, configs).map(|matched| matched.routes)
        };

        match routes {
            Some(routes) => create_nested_state(path, routes, &self.inner.initial_routes, Some(configs)),
            None => {
                tracing::debug!(path, "path did not match any pattern");
                None
            }
        }
    }

    /// Derives the action that reproduces `state` under this config
    pub fn action_from_state(&self, state: &NavigationState) -> Option<NavigationAction> {
        action::action_from_state(state, Some(&self.inner.options))
    }
}

impl Default for Linking {
    /// A handle without screens: path segments map straight to route names
    fn default() -> Self {
        Self {
            inner: Arc::new(LinkingResources {
                options: LinkingOptions::default(),
                configs: Vec::new(),
                initial_routes: Vec::new(),
            }),
        }
    }
}

/// One-shot variant of [`Linking::state_from_path`]
///
/// Compiles `options` on every call; prefer holding a [`Linking`].
pub fn state_from_path(path: &str, options: &LinkingOptions) -> Result<Option<NavigationState>> {
    Ok(Linking::new(options.clone())?.state_from_path(path))
}
