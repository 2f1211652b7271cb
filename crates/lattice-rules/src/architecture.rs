//! Group-level view of the dependency policy.
//!
//! For every ordered pair of group-assigned modules in different groups the
//! deriver asks the error-severity dependency rules how a project reference
//! and a library reference between them would be judged. The outcomes are
//! folded onto group pairs:
//!
//! | allowed seen | denied seen | relation            |
//! |--------------|-------------|---------------------|
//! | yes          | yes         | `Conflicted`        |
//! | yes          | no          | `Allowed`           |
//! | no           | no          | `Implicit`          |
//! | no           | yes         | no edge at all      |

use std::fmt;

use lattice_graph::{Dependency, DependencyGraph, DependencyKind, Group, Location, Severity, Silent};
use rustc_hash::FxHashSet as HashSet;
use serde::Serialize;
use tracing::debug;

use crate::{DependencyRule, GroupAssignment, RuleContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Some member pair is allowed and none is denied.
    Allowed,
    /// No error-severity rule says anything about the pair.
    Implicit,
    /// Member pairs are both allowed and denied.
    Conflicted,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => f.write_str("allowed"),
            Self::Implicit => f.write_str("implicit"),
            Self::Conflicted => f.write_str("conflicted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchitectureEdge {
    pub source: Group,
    pub target: Group,
    pub relation: Relation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchitectureGraph {
    /// Sorted by name.
    pub groups: Vec<Group>,
    /// Sorted by source, then target.
    pub edges: Vec<ArchitectureEdge>,
}

impl ArchitectureGraph {
    pub fn relation(&self, source: &str, target: &str) -> Option<Relation> {
        self.edges
            .iter()
            .find(|edge| edge.source.name() == source && edge.target.name() == target)
            .map(|edge| edge.relation)
    }
}

/// Derive the group graph from the error-severity rules among `rules`.
pub fn derive_architecture<'r>(
    graph: &DependencyGraph,
    groups: &GroupAssignment,
    rules: impl IntoIterator<Item = &'r DependencyRule>,
) -> ArchitectureGraph {
    let rules: Vec<&DependencyRule> = rules
        .into_iter()
        .filter(|rule| rule.severity == Severity::Error)
        .collect();
    let ctx = RuleContext::new(graph, groups);
    let members: Vec<_> = groups.assigned().collect();

    let mut allowed: HashSet<(Group, Group)> = HashSet::default();
    let mut denied: HashSet<(Group, Group)> = HashSet::default();

    for (source, source_element) in &members {
        for (target, target_element) in &members {
            let pair = (source_element.group().clone(), target_element.group().clone());
            if pair.0 == pair.1 || (allowed.contains(&pair) && denied.contains(&pair)) {
                continue;
            }

            for kind in DependencyKind::ALL {
                let probe = Dependency::new(*source, *target, kind, Location::default());
                let verdict = rules
                    .iter()
                    .find(|rule| rule.matches(&ctx, &probe, &mut Silent))
                    .map(|rule| rule.allow);
                match verdict {
                    Some(true) => {
                        allowed.insert(pair.clone());
                    }
                    Some(false) => {
                        denied.insert(pair.clone());
                    }
                    None => {}
                }
            }
        }
    }

    let names: Vec<Group> = groups.groups().cloned().collect();
    let mut edges = Vec::new();
    for source in &names {
        for target in &names {
            if source == target {
                continue;
            }
            let pair = (source.clone(), target.clone());
            let relation = match (allowed.contains(&pair), denied.contains(&pair)) {
                (true, true) => Relation::Conflicted,
                (true, false) => Relation::Allowed,
                (false, false) => Relation::Implicit,
                (false, true) => continue,
            };
            edges.push(ArchitectureEdge {
                source: source.clone(),
                target: target.clone(),
                relation,
            });
        }
    }

    debug!(groups = names.len(), edges = edges.len(), "architecture derived");
    ArchitectureGraph { groups: names, edges }
}
