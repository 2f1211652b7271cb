//! Path command implementation.

use lattice_graph::{DependencyGraph, ModuleId};

use crate::cli::PathArgs;
use crate::commands::Session;
use crate::error::{CliError, Result};
use crate::ui;

/// Exit code when both modules exist but no path connects them.
pub const EXIT_NO_PATH: u8 = 1;

/// Print the shortest dependency path from `args.from` to `args.to`.
///
/// When a name matches several modules every combination is tried and the
/// shortest path wins.
pub fn execute(args: PathArgs) -> Result<u8> {
    let session = Session::load(&args.input)?;
    let graph = &session.analysis.graph;
    let sources = lookup(graph, &args.from)?;
    let targets = lookup(graph, &args.to)?;

    let path = sources
        .iter()
        .flat_map(|&from| targets.iter().filter_map(move |&to| graph.shortest_path(from, to)))
        .min_by_key(Vec::len);

    match path {
        Some(path) => {
            println!("{}", render_path(graph, &path));
            ui::info(&format!("{} hops", path.len().saturating_sub(1)));
            Ok(0)
        }
        None => {
            ui::warning(&format!("No dependency path from {} to {}", args.from, args.to));
            Ok(EXIT_NO_PATH)
        }
    }
}

fn lookup(graph: &DependencyGraph, name: &str) -> Result<Vec<ModuleId>> {
    let found = graph.find(name);
    if found.is_empty() {
        return Err(CliError::InvalidArgument(format!("no module named '{name}'")));
    }
    Ok(found)
}

pub fn render_path(graph: &DependencyGraph, path: &[ModuleId]) -> String {
    path.iter()
        .map(|id| graph.module(*id).name())
        .collect::<Vec<_>>()
        .join(" -> ")
}
