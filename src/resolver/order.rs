//! Topological install ordering using depth-first search
//!
//! Three-color marking detects cycles while producing the ordering:
//! unvisited (white), on the current recursion path (gray), fully
//! processed (black). A gray node reached again is a cycle.
//!
//! Ties among mutually independent components preserve input order, and
//! transitive dependencies are visited in sorted-id order, so the result
//! is deterministic regardless of how the source tree was enumerated.

use std::collections::HashSet;

use crate::error::{ClaudekitError, Result};
use crate::registry::Registry;

/// Shared state of one sort run
struct SortContext<'a> {
    registry: &'a Registry,
    /// Fully processed ids (black)
    visited: HashSet<String>,
    /// Ids on the current recursion path (gray), for cycle detection
    in_progress: HashSet<String>,
    /// Current path, for the cycle chain in error messages
    path: Vec<String>,
    /// Only ids in this set appear in the output
    selected: HashSet<String>,
    result: Vec<String>,
}

/// Re-order `ids` so every dependency precedes its dependents
///
/// The output contains exactly the input ids. Transitive dependencies
/// outside the selection are walked (their edges still constrain the
/// order) but not emitted; take the closure first with
/// [`resolve_all_dependencies`](crate::resolver::resolve_all_dependencies)
/// when they should be installed too.
///
/// # Errors
///
/// `ComponentNotFound` for an input id absent from the registry,
/// `CircularDependency` when the selection reaches a dependency cycle.
pub fn resolve_dependency_order(ids: &[String], registry: &Registry) -> Result<Vec<String>> {
    for id in ids {
        if registry.get(id).is_none() {
            return Err(ClaudekitError::ComponentNotFound { id: id.clone() });
        }
    }

    let mut ctx = SortContext {
        registry,
        visited: HashSet::new(),
        in_progress: HashSet::new(),
        path: Vec::new(),
        selected: ids.iter().cloned().collect(),
        result: Vec::new(),
    };

    for id in ids {
        visit(&mut ctx, id)?;
    }

    Ok(ctx.result)
}

fn visit(ctx: &mut SortContext, id: &str) -> Result<()> {
    if ctx.in_progress.contains(id) {
        return Err(ClaudekitError::CircularDependency {
            chain: cycle_chain(&ctx.path, id),
        });
    }
    if ctx.visited.contains(id) {
        return Ok(());
    }

    ctx.in_progress.insert(id.to_string());
    ctx.path.push(id.to_string());

    // Sorted-id visiting keeps the order stable across scans; dangling
    // dependencies are skipped here because the registry already reported
    // them.
    let registry = ctx.registry;
    let mut deps: Vec<&str> = registry
        .all_dependencies_of(id)
        .into_iter()
        .filter(|dep| registry.get(dep).is_some())
        .collect();
    deps.sort_unstable();
    deps.dedup();

    for dep in deps {
        visit(ctx, dep)?;
    }

    ctx.path.pop();
    ctx.in_progress.remove(id);
    ctx.visited.insert(id.to_string());

    // Post-order: dependencies land before their dependents
    if ctx.selected.contains(id) {
        ctx.result.push(id.to_string());
    }

    Ok(())
}

fn cycle_chain(path: &[String], repeated: &str) -> String {
    let start = path.iter().position(|n| n == repeated).unwrap_or(0);
    let mut chain: Vec<&str> = path[start..].iter().map(String::as_str).collect();
    chain.push(repeated);
    chain.join(" -> ")
}
