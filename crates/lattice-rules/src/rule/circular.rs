use std::collections::BTreeSet;

use lattice_graph::{Detail, Diagnostic, DiagnosticKind, Location, Message, ModuleId, Severity};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::{Rule, RuleContext};

/// Reports every strongly connected component with more than one module.
#[derive(Debug, Clone)]
pub struct NoCircularDependencies {
    severity: Severity,
    location: Location,
}

impl NoCircularDependencies {
    pub fn new(severity: Severity, location: Location) -> Self {
        Self { severity, location }
    }
}

impl Rule for NoCircularDependencies {
    fn name(&self) -> &'static str {
        "no_circular_dependencies"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn check_graph(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let graph = ctx.graph;
        let mut digraph: DiGraph<ModuleId, ()> = DiGraph::with_capacity(graph.len(), graph.dependencies().len());
        // Node indices line up with module ids because both are dense and in order.
        for id in graph.module_ids() {
            digraph.add_node(id);
        }
        for dependency in graph.dependencies() {
            digraph.add_edge(
                NodeIndex::new(dependency.source().index()),
                NodeIndex::new(dependency.target().index()),
                (),
            );
        }

        let mut diagnostics: Vec<Diagnostic> = tarjan_scc(&digraph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let members: BTreeSet<ModuleId> = component.iter().map(|node| digraph[*node]).collect();
                let members: Vec<ModuleId> = members.into_iter().collect();
                let internal = graph.dependencies().iter().filter(|dependency| {
                    members.binary_search(&dependency.source()).is_ok()
                        && members.binary_search(&dependency.target()).is_ok()
                });
                let message = Message::new()
                    .text("circular dependency between ")
                    .modules(&members, Detail::Name);
                Diagnostic::new(DiagnosticKind::CircularDependency, self.severity, message)
                    .with_dependencies(internal)
                    .with_modules(members)
                    .with_location(self.location.clone())
            })
            .collect();
        diagnostics.sort_by(|a, b| a.modules.cmp(&b.modules));
        diagnostics
    }
}
