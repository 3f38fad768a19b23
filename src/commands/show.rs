//! Show command: component details and dependency tree

use std::path::PathBuf;

use console::Style;

use crate::cli::ShowArgs;
use crate::error::{ClaudekitError, Result};
use crate::resolver;

/// Run the show command
pub fn run(
    project_arg: Option<PathBuf>,
    source_arg: Option<PathBuf>,
    verbose: bool,
    args: ShowArgs,
) -> Result<()> {
    let _ = super::project_dir(project_arg)?;
    let source_dir = super::source_dir(source_arg);
    let registry = super::discover_registry(&source_dir, verbose)?;

    let component = registry
        .get(&args.id)
        .ok_or_else(|| ClaudekitError::ComponentNotFound { id: args.id.clone() })?;

    println!("{}", Style::new().bold().yellow().apply_to(&component.id));
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Name:"),
        component.name
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Kind:"),
        component.kind.as_str()
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Category:"),
        component.category.as_str()
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Description:"),
        component.description
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Source:"),
        component.path.display()
    );
    if !component.enabled {
        println!("  {}", Style::new().red().apply_to("disabled"));
    }
    if let Some(ref event) = component.event {
        println!("  {} {}", Style::new().bold().apply_to("Event:"), event);
    }

    let deps = resolver::transitive_dependencies(&args.id, &registry);
    if deps.is_empty() {
        println!(
            "  {} {}",
            Style::new().bold().apply_to("Dependencies:"),
            Style::new().dim().apply_to("none")
        );
    } else {
        println!("  {}", Style::new().bold().apply_to("Dependencies (deepest first):"));
        for dep in deps {
            println!("    - {}", Style::new().cyan().apply_to(&dep.id));
        }
    }

    if registry.graph.in_cycle(&args.id) {
        if let Some(cycle) = registry.graph.cycle_containing(&args.id) {
            println!(
                "  {} {}",
                Style::new().red().bold().apply_to("Cycle:"),
                cycle.join(" -> ")
            );
        }
    }

    Ok(())
}
