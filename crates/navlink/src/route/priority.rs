//! Matching order and duplicate detection for compiled route configs
//!
//! Configs are tried in order and the first match wins, so more exhaustive
//! patterns must come before the ones they overlap with and wildcards must
//! come last.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::RouteConfig;
use crate::error::{LinkingError, Result};

fn is_wildcard(segment: &str) -> bool {
    segment == "*" || segment.starts_with(':')
}

fn has_regex(segment: &str) -> bool {
    segment.starts_with(':') && segment.contains('(')
}

/// Compares two configs by matching priority (`Less` = tried first)
///
/// # Priority Rules (evaluated in order)
///
/// 1. **Same pattern**: ordered by the `>`-joined route names, descending.
///    Only useful for stable duplicate error messages.
/// 2. **Prefix**: a pattern extending the other one comes first.
/// 3. **Segment by segment**:
///    - the pattern with more segments wins once the other runs out
///    - two regex-constrained params tie and the next segment decides
///    - a regex-constrained param beats anything unconstrained
///    - a literal beats a plain param or `*`
/// 4. **Fallback**: more segments first.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use std::collections::HashMap;
/// use navlink::route::parser::{create_config_item, PathContribution};
/// use navlink::route::priority::compare_configs;
///
/// let compile = |screen: &str, path: &str| {
///     create_config_item(screen, vec![screen.to_string()], &[PathContribution::new(screen, path)], HashMap::new())
/// };
///
/// let literal = compile("New", "users/new")?;
/// let param = compile("User", "users/:id")?;
/// assert_eq!(compare_configs(&literal, &param), Ordering::Less);
/// # Ok::<(), navlink::LinkingError>(())
/// ```
pub fn compare_configs(a: &RouteConfig, b: &RouteConfig) -> Ordering {
    if a.pattern == b.pattern {
        return b.route_names.join(">").cmp(&a.route_names.join(">"));
    }

    if a.pattern.starts_with(&b.pattern) {
        return Ordering::Less;
    }

    if b.pattern.starts_with(&a.pattern) {
        return Ordering::Greater;
    }

    let a_parts: Vec<&str> = a.pattern.split('/').collect();
    let b_parts: Vec<&str> = b.pattern.split('/').collect();

    for i in 0..a_parts.len().max(b_parts.len()) {
        let (a_part, b_part) = match (a_parts.get(i), b_parts.get(i)) {
            (None, _) => return Ordering::Greater,
            (_, None) => return Ordering::Less,
            (Some(a_part), Some(b_part)) => (*a_part, *b_part),
        };

        let a_wildcard = is_wildcard(a_part);
        let b_wildcard = is_wildcard(b_part);
        let a_regex = has_regex(a_part);
        let b_regex = has_regex(b_part);

        if a_wildcard && b_wildcard && a_regex && b_regex {
            continue;
        }

        if a_regex && !b_regex {
            return Ordering::Less;
        }

        if b_regex && !a_regex {
            return Ordering::Greater;
        }

        if a_wildcard && !b_wildcard {
            return Ordering::Greater;
        }

        if b_wildcard && !a_wildcard {
            return Ordering::Less;
        }
    }

    b_parts.len().cmp(&a_parts.len())
}

/// Sorts configs into matching order
///
/// `compare_configs` is not guaranteed to be transitive for exotic regex
/// segments, which `slice::sort_by` does not allow. A stable insertion sort
/// has no such requirement and configs are few.
pub fn sort_configs(configs: &mut [RouteConfig]) {
    for i in 1..configs.len() {
        let mut j = i;
        while j > 0 && compare_configs(&configs[j - 1], &configs[j]) == Ordering::Greater {
            configs.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Fails when two unrelated screen chains share a pattern
///
/// Sharing is fine when one chain is a prefix of the other: a path may
/// resolve to `A > B` or to `A > B > C` when `C` adds no path of its own.
pub fn check_for_duplicates(configs: &[RouteConfig]) -> Result<()> {
    let mut seen: HashMap<&str, &RouteConfig> = HashMap::new();

    for config in configs {
        if let Some(existing) = seen.get(config.pattern.as_str()) {
            let a = &existing.route_names;
            let b = &config.route_names;

            let intersects = if a.len() > b.len() {
                a.starts_with(b)
            } else {
                b.starts_with(a)
            };

            if !intersects {
                return Err(LinkingError::DuplicatePattern {
                    pattern: config.pattern.clone(),
                    first: a.join(" > "),
                    second: b.join(" > "),
                });
            }
        }

        seen.insert(config.pattern.as_str(), config);
    }

    Ok(())
}
