use lattice_graph::{DependencyGraph, Diagnostic, sort_diagnostics};
use tracing::{debug, info};

use crate::{GroupAssignment, Rule, RuleContext};

/// Run `rules` over `graph`.
///
/// Graph-wide hooks run first, then module hooks for every module in natural
/// order, then edge hooks for every edge in natural order. For each edge the
/// first rule that answers claims it, so declaration order decides between
/// conflicting rules. The result is sorted.
pub fn validate<R: Rule>(graph: &DependencyGraph, groups: &GroupAssignment, rules: &[R]) -> Vec<Diagnostic> {
    let ctx = RuleContext::new(graph, groups);
    let mut diagnostics = Vec::new();

    for rule in rules {
        let found = rule.check_graph(&ctx);
        debug!(rule = rule.name(), location = %rule.location(), found = found.len(), "graph hook");
        diagnostics.extend(found);
    }

    for module in graph.module_ids() {
        for rule in rules {
            diagnostics.extend(rule.check_module(&ctx, module));
        }
    }

    let mut claimed = 0usize;
    for dependency in graph.dependencies() {
        if let Some(diagnostic) = rules.iter().find_map(|rule| rule.check_dependency(&ctx, dependency)) {
            claimed += 1;
            diagnostics.push(diagnostic);
        }
    }

    sort_diagnostics(&mut diagnostics);
    info!(
        rules = rules.len(),
        dependencies = graph.dependencies().len(),
        claimed,
        diagnostics = diagnostics.len(),
        "validation finished"
    );
    diagnostics
}
