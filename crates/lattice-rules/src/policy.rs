use std::path::PathBuf;

use lattice_graph::{
    DependencyGraph, Diagnostic, GraphBuilder, IgnoreRule, Result, Severity, sort_diagnostics,
};
use tracing::info;

use crate::{
    ArchitectureGraph, DependencyRule, GroupAssignment, GroupRule, PolicyRule, assign_groups,
    derive_architecture, validate,
};

/// A compiled policy: everything needed to turn loader input into a
/// validated graph.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    pub input_roots: Vec<PathBuf>,
    pub groups: Vec<GroupRule>,
    pub ignores: Vec<IgnoreRule>,
    pub rules: Vec<PolicyRule>,
}

impl Policy {
    pub fn dependency_rules(&self) -> impl Iterator<Item = &DependencyRule> {
        self.rules.iter().filter_map(PolicyRule::as_dependency_rule)
    }

    /// Build the graph from `builder`, assign groups and run every rule.
    ///
    /// The builder's own input roots and ignore rules are extended with the
    /// policy's.
    pub fn analyze(&self, builder: GraphBuilder) -> Result<Analysis> {
        let output = builder
            .with_input_roots(self.input_roots.iter().cloned())
            .with_ignores(self.ignores.iter().cloned())
            .build()?;

        let (groups, mut diagnostics) = assign_groups(&output.graph, &self.groups);
        diagnostics.extend(output.diagnostics);
        diagnostics.extend(validate(&output.graph, &groups, &self.rules));
        sort_diagnostics(&mut diagnostics);

        let analysis = Analysis {
            graph: output.graph,
            groups,
            diagnostics,
        };
        info!(
            modules = analysis.graph.len(),
            groups = analysis.groups.groups().count(),
            errors = analysis.error_count(),
            "analysis finished"
        );
        Ok(analysis)
    }
}

/// Outcome of [`Policy::analyze`].
#[derive(Debug)]
pub struct Analysis {
    pub graph: DependencyGraph,
    pub groups: GroupAssignment,
    /// Every diagnostic of the run, sorted.
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    /// Diagnostics that are not allowed-dependency bookkeeping.
    pub fn violations(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|diagnostic| diagnostic.is_violation())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.violations()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn architecture(&self, policy: &Policy) -> ArchitectureGraph {
        derive_architecture(&self.graph, &self.groups, policy.dependency_rules())
    }
}
