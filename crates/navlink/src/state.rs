//! Navigation state tree
//!
//! A [`NavigationState`] is one navigator: an ordered list of routes and the
//! index of the focused one. A route may hold the state of a nested
//! navigator, which makes the whole thing a tree. The focused path runs
//! through `routes[index]` at every level, where a missing `index` means the
//! last route.
//!
//! Fields a live navigator keeps beyond the ones modeled here (`key`,
//! `type`, `stale`, `routeNames` and so on) are kept in `extra` and written
//! back unchanged, so a state passed through `RESET` keeps them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Route params as a JSON object
pub type Params = serde_json::Map<String, Value>;

/// State of one navigator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default)]
    pub routes: Vec<Route>,
    /// Unmodeled fields, kept as they came in
    #[serde(flatten)]
    pub extra: Params,
}

impl NavigationState {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            index: None,
            routes,
            extra: Params::new(),
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Index of the focused route at this level
    pub fn focused_index(&self) -> usize {
        self.index
            .unwrap_or_else(|| self.routes.len().saturating_sub(1))
    }

    /// Focused route at this level
    pub fn focused_route(&self) -> Option<&Route> {
        self.routes.get(self.focused_index())
    }

    /// Routes up to and including the focused one
    ///
    /// Everything above the focused index is forward history that the
    /// focused screen cannot see.
    pub fn active_routes(&self) -> &[Route] {
        match self.index {
            Some(index) => &self.routes[..index.saturating_add(1).min(self.routes.len())],
            None => &self.routes,
        }
    }

    /// Follows the focused route down to the deepest one
    ///
    /// # Examples
    ///
    /// ```
    /// use navlink::{NavigationState, Route};
    ///
    /// let state = NavigationState::new(vec![
    ///     Route::new("Home"),
    ///     Route::new("Tabs").with_state(NavigationState::new(vec![Route::new("Feed")])),
    /// ]);
    ///
    /// assert_eq!(state.find_focused_route().map(|r| r.name.as_str()), Some("Feed"));
    /// ```
    pub fn find_focused_route(&self) -> Option<&Route> {
        let mut current = self;
        loop {
            let route = current.focused_route()?;
            match route.state.as_deref() {
                Some(nested) => current = nested,
                None => return Some(route),
            }
        }
    }

    /// Mutable variant of [`find_focused_route`](Self::find_focused_route)
    pub fn find_focused_route_mut(&mut self) -> Option<&mut Route> {
        let index = self.focused_index();
        let route = self.routes.get_mut(index)?;
        if route.state.is_some() {
            return route.state.as_deref_mut()?.find_focused_route_mut();
        }
        Some(route)
    }
}

/// A single route inside a navigator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Present on routes that already live in a navigator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Box<NavigationState>>,
    #[serde(flatten)]
    pub extra: Params,
}

impl Route {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_state(mut self, state: NavigationState) -> Self {
        self.state = Some(Box::new(state));
        self
    }
}
