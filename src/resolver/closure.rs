//! Transitive dependency closure and graph queries
//!
//! Everything here is pure over the registry. The closure walk skips
//! dangling ids (the registry already recorded them); cycles terminate the
//! walk through the visited set, so only the ordering step rejects them.

use std::collections::{HashSet, VecDeque};

use crate::error::{ClaudekitError, Result};
use crate::registry::{Component, Registry};

/// Options for [`resolve_all_dependencies`]
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Follow `optional-dependencies` edges too
    pub include_optional: bool,
    /// Maximum dependency hops from the selection; `None` is unbounded
    pub max_depth: Option<usize>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            include_optional: false,
            max_depth: None,
        }
    }
}

/// Compute `ids` plus their transitive dependencies
///
/// The output starts with the input ids (first occurrence wins) followed by
/// discovered dependencies in breadth-first encounter order, each
/// component's edges walked in sorted-id order for determinism. The result
/// is a fixed point: running it on its own output returns the same set.
///
/// # Errors
///
/// `ComponentNotFound` when an input id is absent from the registry.
/// Dangling transitive references are skipped, not errors.
pub fn resolve_all_dependencies(
    ids: &[String],
    registry: &Registry,
    options: &ResolveOptions,
) -> Result<Vec<String>> {
    for id in ids {
        if registry.get(id).is_none() {
            return Err(ClaudekitError::ComponentNotFound { id: id.clone() });
        }
    }

    let mut result: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();

    for id in ids {
        if seen.insert(id.clone()) {
            result.push(id.clone());
            queue.push_back((id.clone(), 0));
        }
    }

    while let Some((id, depth)) = queue.pop_front() {
        if let Some(max) = options.max_depth {
            if depth >= max {
                continue;
            }
        }

        for dep in dependency_edges(&id, registry, options.include_optional) {
            if registry.get(&dep).is_none() {
                continue;
            }
            if seen.insert(dep.clone()) {
                result.push(dep.clone());
                queue.push_back((dep, depth + 1));
            }
        }
    }

    Ok(result)
}

/// What auto-inclusion would add: the closure minus the original selection
pub fn missing_dependencies(ids: &[String], registry: &Registry) -> Result<Vec<String>> {
    let closure = resolve_all_dependencies(ids, registry, &ResolveOptions::default())?;
    let selected: HashSet<&str> = ids.iter().map(String::as_str).collect();

    Ok(closure
        .into_iter()
        .filter(|id| !selected.contains(id.as_str()))
        .collect())
}

/// One component's full dependency tree, deepest first, for display
pub fn transitive_dependencies<'r>(id: &str, registry: &'r Registry) -> Vec<&'r Component> {
    let mut result: Vec<&'r Component> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(id.to_string());
    collect_deep(id, registry, &mut visited, &mut result);
    result
}

fn collect_deep<'r>(
    id: &str,
    registry: &'r Registry,
    visited: &mut HashSet<String>,
    result: &mut Vec<&'r Component>,
) {
    for dep in dependency_edges(id, registry, true) {
        if !visited.insert(dep.clone()) {
            continue;
        }
        collect_deep(&dep, registry, visited, result);
        if let Some(component) = registry.get(&dep) {
            result.push(component);
        }
    }
}

/// Whether adding the edge `from -> to` would close a loop
///
/// Simulates the addition by checking reachability from `to` back to
/// `from` in the existing graph. Guards any dynamic dependency addition;
/// the CLI has no such surface yet, so only tests exercise it.
#[allow(dead_code)]
pub fn would_create_circular_dependency(from: &str, to: &str, registry: &Registry) -> bool {
    if from == to {
        return true;
    }

    let mut queue: VecDeque<String> = VecDeque::new();
    let mut visited: HashSet<String> = HashSet::new();
    queue.push_back(to.to_string());
    visited.insert(to.to_string());

    while let Some(id) = queue.pop_front() {
        for dep in dependency_edges(&id, registry, true) {
            if dep == from {
                return true;
            }
            if registry.get(&dep).is_some() && visited.insert(dep.clone()) {
                queue.push_back(dep);
            }
        }
    }

    false
}

/// Warnings for dangling edges reachable from the selection
pub fn dangling_warnings(ids: &[String], registry: &Registry) -> Vec<String> {
    let reachable: HashSet<String> =
        match resolve_all_dependencies(ids, registry, &ResolveOptions::default()) {
            Ok(closure) => closure.into_iter().collect(),
            Err(_) => ids.iter().cloned().collect(),
        };

    registry
        .graph
        .dangling
        .iter()
        .filter(|(from, _)| reachable.contains(from))
        .map(|(from, missing)| {
            format!("component '{from}' depends on unknown component '{missing}'")
        })
        .collect()
}

/// Dependency ids of `id` in sorted order, optionally including optionals
fn dependency_edges(id: &str, registry: &Registry, include_optional: bool) -> Vec<String> {
    let Some(component) = registry.get(id) else {
        return Vec::new();
    };

    let mut deps: Vec<String> = component.dependencies.clone();
    if include_optional {
        deps.extend(component.optional_dependencies.iter().cloned());
    }
    deps.sort_unstable();
    deps.dedup();
    deps
}
