//! Dependency graph derived from the component catalog
//!
//! Built once per discovery pass. Edges point from a component to each of
//! its declared dependencies. References to unknown ids become dangling
//! edges (the resolver reports them as warnings, never as cycles). Cycles
//! are enumerated here so an already-cyclic registry can still resolve its
//! acyclic subsets.

use std::collections::{BTreeMap, HashSet};

use super::Component;

/// Directed dependency graph over component ids
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// All component ids, sorted
    pub nodes: Vec<String>,
    /// `(from, to)` pairs: `from` depends on `to`
    pub edges: Vec<(String, String)>,
    /// Id loops found in the scanned registry, each rotated to start at its
    /// smallest id
    pub cycles: Vec<Vec<String>>,
    /// `(from, missing_id)` pairs for dependencies that resolve to no
    /// known component
    pub dangling: Vec<(String, String)>,
}

impl DependencyGraph {
    /// Whether `id` participates in any recorded cycle
    pub fn in_cycle(&self, id: &str) -> bool {
        self.cycles.iter().any(|c| c.iter().any(|n| n == id))
    }

    /// The cycle containing `id`, if any
    pub fn cycle_containing(&self, id: &str) -> Option<&[String]> {
        self.cycles
            .iter()
            .find(|c| c.iter().any(|n| n == id))
            .map(Vec::as_slice)
    }
}

/// Build the graph for a catalog
pub fn build_graph(components: &BTreeMap<String, Component>) -> DependencyGraph {
    let mut graph = DependencyGraph {
        nodes: components.keys().cloned().collect(),
        ..DependencyGraph::default()
    };

    let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (id, component) in components {
        let deps = component
            .dependencies
            .iter()
            .chain(component.optional_dependencies.iter());
        for dep in deps {
            if components.contains_key(dep) {
                graph.edges.push((id.clone(), dep.clone()));
                adjacency.entry(id).or_default().push(dep);
            } else {
                graph.dangling.push((id.clone(), dep.clone()));
            }
        }
    }

    graph.cycles = find_cycles(&adjacency, &graph.nodes);
    graph
}

/// Enumerate dependency cycles via DFS over the resolved edges
///
/// Each cycle is reported once, rotated so its smallest id comes first.
fn find_cycles(adjacency: &BTreeMap<&str, Vec<&str>>, nodes: &[String]) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = Vec::new();
    let mut seen_cycles: HashSet<Vec<String>> = HashSet::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for start in nodes {
        if !visited.contains(start.as_str()) {
            let mut path: Vec<&str> = Vec::new();
            walk(
                start.as_str(),
                adjacency,
                &mut visited,
                &mut path,
                &mut cycles,
                &mut seen_cycles,
            );
        }
    }

    cycles
}

fn walk<'a>(
    node: &'a str,
    adjacency: &BTreeMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
    seen_cycles: &mut HashSet<Vec<String>>,
) {
    if let Some(pos) = path.iter().position(|n| *n == node) {
        let cycle = normalize_cycle(&path[pos..]);
        if seen_cycles.insert(cycle.clone()) {
            cycles.push(cycle);
        }
        return;
    }

    // A node may sit on several paths into a shared cycle, so only prune on
    // fully explored nodes that found none.
    if visited.contains(node) {
        return;
    }

    path.push(node);
    if let Some(deps) = adjacency.get(node) {
        for dep in deps {
            walk(dep, adjacency, visited, path, cycles, seen_cycles);
        }
    }
    path.pop();
    visited.insert(node);
}

fn normalize_cycle(path: &[&str]) -> Vec<String> {
    let min_pos = path
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map(|(pos, _)| pos)
        .unwrap_or(0);

    path[min_pos..]
        .iter()
        .chain(path[..min_pos].iter())
        .map(|s| (*s).to_string())
        .collect()
}
