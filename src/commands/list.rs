//! List command: catalog view of discovered components

use std::path::PathBuf;

use console::Style;

use crate::cli::ListArgs;
use crate::error::Result;
use crate::registry::Component;

/// Run the list command
pub fn run(
    project_arg: Option<PathBuf>,
    source_arg: Option<PathBuf>,
    verbose: bool,
    args: ListArgs,
) -> Result<()> {
    let _ = super::project_dir(project_arg)?;
    let source_dir = super::source_dir(source_arg);
    let registry = super::discover_registry(&source_dir, verbose)?;

    let mut shown = 0usize;
    for (category, ids) in &registry.categories {
        if let Some(ref filter) = args.category {
            if category.as_str() != filter {
                continue;
            }
        }

        let components: Vec<&Component> = ids
            .iter()
            .filter_map(|id| registry.get(id))
            .filter(|c| args.all || c.enabled)
            .filter(|c| match &args.kind {
                Some(kind) => c.kind.as_str() == kind,
                None => true,
            })
            .collect();

        if components.is_empty() {
            continue;
        }

        println!("{}", Style::new().bold().green().apply_to(category.as_str()));
        for component in components {
            let flag = if component.enabled { "" } else { " (disabled)" };
            println!(
                "  {} {} {}{}",
                Style::new().bold().yellow().apply_to(&component.id),
                Style::new().dim().apply_to(format!("[{}]", component.kind.as_str())),
                component.description,
                Style::new().dim().apply_to(flag),
            );
            shown += 1;
        }
    }

    if shown == 0 {
        println!("No components matched.");
    } else {
        println!(
            "{}",
            Style::new().dim().apply_to(format!(
                "{} component(s), {} dependency edge(s)",
                registry.graph.nodes.len(),
                registry.graph.edges.len()
            ))
        );
    }
    if !registry.skipped.is_empty() {
        println!(
            "{}",
            Style::new().dim().apply_to(format!(
                "({} file(s) skipped during discovery; use -v for details)",
                registry.skipped.len()
            ))
        );
    }

    Ok(())
}
