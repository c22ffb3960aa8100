//! Derives a single navigation action from a live state
//!
//! A state whose shape is "one route" or "initial route + one route" at every
//! level can be reproduced by one `NAVIGATE` action. The nesting is carried
//! by [`NestedTarget`], a tree built fresh per level, and serialized into the
//! recursive params encoding navigators understand:
//!
//! ```json
//! {"name": "Foo", "params": {"initial": false, "screen": "Bar", "params": {"id": "42"}}, "pop": true}
//! ```
//!
//! A root that has any other shape becomes a `RESET` carrying the state as
//! is. A nested level with an unsupported shape stops the descent and is
//! attached verbatim as `params.state`.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::config::{ConfigNode, LinkingOptions};
use crate::state::{NavigationState, Params, Route};

/// Keys of a params object that encode the next nesting level
const RESERVED_KEYS: [&str; 4] = ["initial", "screen", "params", "state"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavigationAction {
    Navigate(NavigatePayload),
    Reset(NavigationState),
}

impl NavigationAction {
    pub fn as_navigate(&self) -> Option<&NavigatePayload> {
        match self {
            Self::Navigate(payload) => Some(payload),
            Self::Reset(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigatePayload {
    pub name: String,
    pub params: ScreenParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Unwind deeper screens of the same navigator before navigating
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pop: bool,
}

impl NavigatePayload {
    /// Path of the deepest screen the action targets
    pub fn leaf_path(&self) -> Option<&str> {
        let mut params = &self.params;
        let mut path = self.path.as_deref();
        while let Some(NestedTarget::Screen {
            path: screen_path,
            params: screen_params,
            ..
        }) = &params.target
        {
            path = screen_path.as_deref();
            match screen_params {
                Some(inner) if inner.target.is_some() => params = inner.as_ref(),
                _ => break,
            }
        }
        path
    }
}

/// Params of one screen plus, optionally, the next level down
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenParams {
    /// The screen's own params
    pub own: Params,
    pub target: Option<NestedTarget>,
    pub pop: bool,
}

impl ScreenParams {
    pub fn new(own: Params) -> Self {
        Self {
            own,
            ..Self::default()
        }
    }

    fn is_reserved(&self, key: &str) -> bool {
        (self.target.is_some() && RESERVED_KEYS.contains(&key)) || (self.pop && key == "pop")
    }
}

/// The level below a screen
#[derive(Debug, Clone, PartialEq)]
pub enum NestedTarget {
    /// Navigate to `screen` inside the nested navigator
    Screen {
        screen: String,
        /// Whether `screen` is the navigator's initial route
        initial: bool,
        path: Option<String>,
        params: Option<Box<ScreenParams>>,
    },
    /// Shape not expressible as a navigate; carried verbatim
    State(NavigationState),
}

impl Serialize for ScreenParams {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;

        for (key, value) in self.own.iter().filter(|(key, _)| !self.is_reserved(key)) {
            map.serialize_entry(key, value)?;
        }

        match &self.target {
            Some(NestedTarget::Screen {
                screen,
                initial,
                path,
                params,
            }) => {
                map.serialize_entry("initial", initial)?;
                map.serialize_entry("screen", screen)?;
                if let Some(params) = params {
                    map.serialize_entry("params", params)?;
                }
                if let Some(path) = path {
                    map.serialize_entry("path", path)?;
                }
            }
            Some(NestedTarget::State(state)) => map.serialize_entry("state", state)?,
            None => {}
        }

        if self.pop {
            map.serialize_entry("pop", &true)?;
        }

        map.end()
    }
}

/// `Some(initial)` when the active routes form a navigable shape
///
/// Only fresh (un-keyed) routes qualify: a single route, which is initial,
/// or the navigator's initial route followed by one more, which is not.
fn navigable_shape(active: &[Route], initial_route_name: Option<&str>) -> Option<bool> {
    match active {
        [only] if only.key.is_none() => Some(true),
        [first, second]
            if first.key.is_none()
                && second.key.is_none()
                && initial_route_name == Some(first.name.as_str()) =>
        {
            Some(false)
        }
        _ => None,
    }
}

fn has_nested_screens(config: Option<ConfigNode<'_>>) -> bool {
    config.is_some_and(|config| config.has_nested_screens())
}

/// Encodes `state`, the nested state of a route configured by `config`
///
/// Returns the target plus whether the enclosing params must pop, or `None`
/// when a level has no routes at all.
fn nested_target(state: &NavigationState, config: Option<ConfigNode<'_>>) -> Option<(NestedTarget, bool)> {
    if state.routes.is_empty() {
        return None;
    }

    let active = state.active_routes();
    let Some(initial) = navigable_shape(active, config.and_then(|config| config.initial_route_name)) else {
        tracing::debug!(
            routes = active.len(),
            "nested state cannot be expressed as navigate, attaching it verbatim"
        );
        return Some((NestedTarget::State(state.clone()), false));
    };

    let route = active.last()?;
    let child = config.and_then(|config| config.child(&route.name));

    match route.state.as_deref() {
        Some(nested) => {
            let (target, inner_pop) = nested_target(nested, child)?;
            let params = ScreenParams {
                own: route.params.clone().unwrap_or_default(),
                target: Some(target),
                pop: inner_pop || has_nested_screens(child),
            };
            let target = NestedTarget::Screen {
                screen: route.name.clone(),
                initial,
                path: None,
                params: Some(Box::new(params)),
            };
            Some((target, true))
        }
        None => {
            let target = NestedTarget::Screen {
                screen: route.name.clone(),
                initial,
                path: route.path.clone(),
                params: route.params.clone().map(|own| Box::new(ScreenParams::new(own))),
            };
            Some((target, has_nested_screens(child)))
        }
    }
}

/// Derives the action that reproduces `state`
///
/// Returns `None` when the root, or any level on the way down, has no routes.
///
/// # Examples
///
/// ```
/// use navlink::{action_from_state, NavigationAction, NavigationState, Route};
///
/// let state = NavigationState::new(vec![Route::new("Home").with_path("/home")]);
/// let action = action_from_state(&state, None).unwrap();
///
/// assert_eq!(action.as_navigate().map(|payload| payload.name.as_str()), Some("Home"));
///
/// let crowded = NavigationState::new(vec![Route::new("A"), Route::new("B"), Route::new("C")]);
/// assert!(matches!(action_from_state(&crowded, None), Some(NavigationAction::Reset(_))));
/// ```
pub fn action_from_state(state: &NavigationState, options: Option<&LinkingOptions>) -> Option<NavigationAction> {
    if state.routes.is_empty() {
        return None;
    }

    let root = ConfigNode::root(options);
    if navigable_shape(state.active_routes(), root.initial_route_name).is_none() {
        tracing::debug!(
            routes = state.routes.len(),
            index = ?state.index,
            "state cannot be expressed as navigate, falling back to reset"
        );
        return Some(NavigationAction::Reset(state.clone()));
    }

    let route = state.routes.get(state.focused_index())?;
    let config = root.child(&route.name);

    let mut params = ScreenParams::new(route.params.clone().unwrap_or_default());
    if let Some(nested) = route.state.as_deref() {
        let (target, pop) = nested_target(nested, config)?;
        params.target = Some(target);
        params.pop = pop;
    }

    let pop = params.target.is_some() || has_nested_screens(config);

    Some(NavigationAction::Navigate(NavigatePayload {
        name: route.name.clone(),
        params,
        path: route.path.clone(),
        pop,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScreenMap, ScreenOptions};
    use serde_json::json;

    fn params(value: serde_json::Value) -> Params {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_navigable_shapes() {
        assert_eq!(navigable_shape(&[Route::new("A")], None), Some(true));
        assert_eq!(navigable_shape(&[Route::new("A").with_key("a-1")], None), None);
        assert_eq!(
            navigable_shape(&[Route::new("Home"), Route::new("B")], Some("Home")),
            Some(false)
        );
        assert_eq!(navigable_shape(&[Route::new("Home"), Route::new("B")], None), None);
        assert_eq!(
            navigable_shape(&[Route::new("Home"), Route::new("B").with_key("b")], Some("Home")),
            None
        );
        assert_eq!(navigable_shape(&[], None), None);
    }

    #[test]
    fn test_flat_navigate() {
        let state = NavigationState::new(vec![Route::new("Chat")
            .with_params(params(json!({"id": 42})))
            .with_path("/chat/42")]);

        let action = action_from_state(&state, None).unwrap();
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({
                "type": "NAVIGATE",
                "payload": {"name": "Chat", "params": {"id": 42}, "path": "/chat/42"}
            })
        );
    }

    #[test]
    fn test_nested_levels_are_encoded_recursively() {
        let state = NavigationState::new(vec![Route::new("A")
            .with_params(params(json!({"a": 1})))
            .with_state(NavigationState::new(vec![Route::new("B")
                .with_params(params(json!({"b": 2})))
                .with_state(NavigationState::new(vec![Route::new("C").with_path("/c")]))]))]);

        let action = action_from_state(&state, None).unwrap();
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({
                "type": "NAVIGATE",
                "payload": {
                    "name": "A",
                    "params": {
                        "a": 1,
                        "initial": true,
                        "screen": "B",
                        "params": {"b": 2, "initial": true, "screen": "C", "path": "/c"},
                        "pop": true
                    },
                    "pop": true
                }
            })
        );
        assert_eq!(action.as_navigate().unwrap().leaf_path(), Some("/c"));
    }

    #[test]
    fn test_reserved_keys_are_overwritten() {
        let state = NavigationState::new(vec![Route::new("A")
            .with_params(params(json!({"screen": "Stale", "state": {}, "keep": true})))
            .with_state(NavigationState::new(vec![Route::new("B")]))]);

        let action = action_from_state(&state, None).unwrap();
        assert_eq!(
            serde_json::to_value(action.as_navigate().unwrap().params.clone()).unwrap(),
            json!({"keep": true, "initial": true, "screen": "B"})
        );
    }

    #[test]
    fn test_unsupported_nested_shape_is_attached_verbatim() {
        let nested = NavigationState::new(vec![Route::new("X"), Route::new("Y"), Route::new("Z")]);
        let state = NavigationState::new(vec![Route::new("A").with_state(nested.clone())]);

        let action = action_from_state(&state, None).unwrap();
        let payload = action.as_navigate().unwrap();
        assert_eq!(payload.params.target, Some(NestedTarget::State(nested)));
        assert!(payload.pop);
        assert!(!payload.params.pop);
    }

    #[test]
    fn test_pop_when_config_declares_nested_screens() {
        let options = LinkingOptions::new(ScreenMap::new().with_screen(
            "Tabs",
            ScreenOptions::new().with_path("tabs").with_screen("Feed", "feed"),
        ));
        let state = NavigationState::new(vec![Route::new("Tabs")]);

        let action = action_from_state(&state, Some(&options)).unwrap();
        assert!(action.as_navigate().unwrap().pop);

        let without_config = action_from_state(&state, None).unwrap();
        assert!(!without_config.as_navigate().unwrap().pop);
    }

    #[test]
    fn test_leaf_with_nested_screens_sets_enclosing_pop() {
        let options = LinkingOptions::new(ScreenMap::new().with_screen(
            "Root",
            ScreenOptions::new().with_screen(
                "Tabs",
                ScreenOptions::new().with_screen("Feed", "feed"),
            ),
        ));
        let state = NavigationState::new(vec![
            Route::new("Root").with_state(NavigationState::new(vec![Route::new("Tabs")])),
        ]);

        let action = action_from_state(&state, Some(&options)).unwrap();
        assert!(action.as_navigate().unwrap().params.pop);
    }

    #[test]
    fn test_empty_levels_yield_nothing() {
        assert!(action_from_state(&NavigationState::default(), None).is_none());

        let state = NavigationState::new(vec![Route::new("A").with_state(NavigationState::default())]);
        assert!(action_from_state(&state, None).is_none());
    }

    #[test]
    fn test_root_initial_pair() {
        let options = LinkingOptions::new(ScreenMap::new().with_screen("Home", "").with_screen("Chat", "chat"))
            .with_initial_route_name("Home");
        let state = NavigationState::new(vec![Route::new("Home"), Route::new("Chat").with_path("/chat")]).with_index(1);

        let action = action_from_state(&state, Some(&options)).unwrap();
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"type": "NAVIGATE", "payload": {"name": "Chat", "params": {}, "path": "/chat"}})
        );

        assert!(matches!(
            action_from_state(&state, None),
            Some(NavigationAction::Reset(_))
        ));
    }
}
