//! # lattice-graph
//!
//! Module/reference model, matchers and the resolving graph builder.
//!
//! This crate turns raw "project declared" / "reference declared" events into
//! a finalized [`DependencyGraph`]. It has no I/O of its own: loaders feed a
//! [`GraphBuilder`], policy code evaluates [`ModuleMatcher`]s against the
//! result.
//!
//! ## Overview
//!
//! ```text
//!   declare_module / declare_reference
//!                  │
//!                  ▼
//!          ┌───────────────┐   ignore rules
//!          │ GraphBuilder  │◄──────────────
//!          └───────┬───────┘
//!                  │ build()
//!                  ▼
//!   ┌──────────────────────────────┐
//!   │ DependencyGraph + Diagnostic │
//!   └──────────────────────────────┘
//! ```
//!
//! Resolution is best effort: references are matched by path, then by
//! progressively weaker identifiers, and fall back to placeholder modules.
//! Ambiguous matches produce one edge per candidate and a warning. The only
//! fatal condition is two declarations that describe the same entity.
//!
//! ## Determinism
//!
//! Modules and edges are stored in natural order (identity key, then kind,
//! then project name and path) and diagnostics are sorted, so identical input
//! always produces identical output.

mod builder;
mod dependency;
mod diagnostic;
mod error;
mod graph;
mod group;
mod location;
pub mod matcher;
mod module;

pub use builder::{BuildOutput, GraphBuilder, IgnoreRule, ModuleHandle, ReferenceSpec};
pub use dependency::{Dependency, DependencyKind};
pub use diagnostic::{
    Detail, Diagnostic, DiagnosticKind, Message, MessageElement, Severity, sort_diagnostics,
};
pub use error::{GraphError, Result};
pub use graph::{DependencyGraph, GraphStatistics};
pub use group::{Group, GroupElement, GroupRegistry};
pub use location::Location;
pub use matcher::{
    DependencyMatcher, MatchLog, MatchReport, MatchReporter, MatchTarget, ModuleMatcher, Silent,
};
pub use module::{AliasSet, Module, ModuleId, ModuleKind, ModuleKindTag, ProjectInfo, UNKNOWN_LANGUAGE};
pub use uuid::Uuid;

#[cfg(test)]
mod tests;
