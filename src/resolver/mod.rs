//! Dependency resolution over a [`Registry`](crate::registry::Registry)
//!
//! Pure functions, no I/O: topological install ordering, transitive
//! closure, missing-dependency diffs and cycle checks. The registry records
//! cycles and dangling edges at build time; resolution only fails when the
//! requested selection itself touches a problem.

pub mod closure;
pub mod order;

pub use closure::{
    ResolveOptions, dangling_warnings, missing_dependencies, resolve_all_dependencies,
    transitive_dependencies, would_create_circular_dependency,
};
pub use order::resolve_dependency_order;
