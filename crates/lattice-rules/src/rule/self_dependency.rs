use std::collections::BTreeMap;

use lattice_graph::{Dependency, Detail, Diagnostic, DiagnosticKind, Location, Message, ModuleId, Severity};

use super::{Rule, RuleContext};

/// Reports each module with at least one edge to itself.
#[derive(Debug, Clone)]
pub struct NoSelfDependencies {
    severity: Severity,
    location: Location,
}

impl NoSelfDependencies {
    pub fn new(severity: Severity, location: Location) -> Self {
        Self { severity, location }
    }
}

impl Rule for NoSelfDependencies {
    fn name(&self) -> &'static str {
        "no_self_dependencies"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn check_graph(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut by_module: BTreeMap<ModuleId, Vec<&Dependency>> = BTreeMap::new();
        for dependency in ctx.graph.dependencies().iter().filter(|d| d.is_self_reference()) {
            by_module.entry(dependency.source()).or_default().push(dependency);
        }

        by_module
            .into_iter()
            .map(|(module, edges)| {
                let message = Message::new().module(module, Detail::Full).text(" depends on itself");
                Diagnostic::new(DiagnosticKind::SelfDependency, self.severity, message)
                    .with_modules([module])
                    .with_dependencies(edges)
                    .with_location(self.location.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use lattice_graph::{DependencyKind, GraphBuilder, ReferenceSpec};

    use super::*;
    use crate::GroupAssignment;

    #[test]
    fn test_one_diagnostic_per_module() {
        let mut builder = GraphBuilder::new();
        let app = builder.declare_module("App", "App", None, None, ["C#"]);
        builder.declare_module("Lib", "Lib", None, None, ["C#"]);
        for (line, kind) in [(1, DependencyKind::ProjectReference), (2, DependencyKind::LibraryReference)] {
            builder.declare_reference(app, ReferenceSpec::new(kind, Location::new("App.csproj", line)).with_name("App"));
        }
        builder.declare_reference(
            app,
            ReferenceSpec::new(DependencyKind::ProjectReference, Location::new("App.csproj", 3)).with_name("Lib"),
        );
        let graph = builder.build().unwrap().graph;
        let groups = GroupAssignment::empty(&graph);

        let diagnostics = NoSelfDependencies::new(Severity::Warning, Location::new("lattice.toml", 2))
            .check_graph(&RuleContext::new(&graph, &groups));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].dependencies.len(), 2);
        assert_eq!(diagnostics[0].render(&graph), "App depends on itself");
    }
}
