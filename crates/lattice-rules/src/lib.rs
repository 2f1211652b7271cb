//! # lattice-rules
//!
//! Group assignment, policy rules, validation and architecture derivation on
//! top of a finalized [`lattice_graph::DependencyGraph`].
//!
//! ```text
//! DependencyGraph ─► assign_groups ─► validate(rules) ─► diagnostics
//!                          │
//!                          └────────► derive_architecture ─► ArchitectureGraph
//! ```
//!
//! [`Policy::analyze`] runs the whole pipeline for a [`GraphBuilder`](lattice_graph::GraphBuilder).

mod architecture;
mod group;
mod policy;
mod rule;
mod validator;

pub use architecture::{ArchitectureEdge, ArchitectureGraph, Relation, derive_architecture};
pub use group::{GroupAssignment, GroupRule, assign_groups};
pub use policy::{Analysis, Policy};
pub use rule::{
    DependencyRule, NoCircularDependencies, NoSelfDependencies, PolicyRule, Rule, RuleContext, UniqueBy,
    UniqueDependencies, UniqueProjects,
};
pub use validator::validate;

#[cfg(test)]
mod tests;
