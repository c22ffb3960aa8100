//! Route config compilation
//!
//! Turns the declarative screen tree into a flat, priority-ordered list of
//! [`RouteConfig`]s:
//! - [`pattern`]: classifies single path segments
//! - [`parser`]: compiles a screen chain into a pattern + regex
//! - [`priority`]: matching order and duplicate detection
//! - [`normalize`]: walks the config tree

pub mod normalize;
pub mod parser;
pub mod pattern;
pub mod priority;

use std::collections::HashMap;

use regex::Regex;

use crate::config::ParamParser;

// Re-export commonly used items
pub use normalize::{normalize_configs, NormalizedConfigs};
pub use pattern::{classify_segment, parse_param_with_constraint, PatternSegmentType};

/// One segment of a compiled pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PatternParam {
    /// Screen whose `path` contributed the segment
    pub screen: String,
    /// Param name; `None` for literal and wildcard segments
    pub name: Option<String>,
    /// Regex fragment for the segment
    pub reg: String,
    pub optional: bool,
}

/// A compiled pattern for one screen chain
///
/// `params[i]` describes segment `i` of the pattern, and param segments are
/// captured by the regex group `param_<i>`.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Last screen of the chain
    pub screen: String,
    /// Slash-joined pattern, e.g. `chat/:author/:id`
    pub pattern: String,
    /// Anchored regex; `None` for an empty pattern
    pub regex: Option<Regex>,
    pub params: Vec<PatternParam>,
    /// Screen names from the root down to `screen`
    pub route_names: Vec<String>,
    /// Parsers declared by `screen`
    pub parse: HashMap<String, ParamParser>,
}

/// Declares the implicit first screen of the navigator under `parent_screens`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialRouteConfig {
    pub initial_route_name: String,
    pub parent_screens: Vec<String>,
}
