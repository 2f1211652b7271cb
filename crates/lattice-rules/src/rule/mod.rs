//! Policy rules and the hooks the validator drives them through.

mod circular;
mod dependency;
mod self_dependency;
mod unique;

use std::fmt;

use lattice_graph::{Dependency, DependencyGraph, Diagnostic, GroupElement, Location, ModuleId, Severity};

pub use circular::NoCircularDependencies;
pub use dependency::DependencyRule;
pub use self_dependency::NoSelfDependencies;
pub use unique::{UniqueBy, UniqueDependencies, UniqueProjects};

use crate::GroupAssignment;

/// What a rule sees while it is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub graph: &'a DependencyGraph,
    pub groups: &'a GroupAssignment,
}

impl<'a> RuleContext<'a> {
    pub fn new(graph: &'a DependencyGraph, groups: &'a GroupAssignment) -> Self {
        Self { graph, groups }
    }

    pub fn group_of(&self, id: ModuleId) -> Option<&'a GroupElement> {
        self.groups.get(id)
    }
}

/// A policy rule.
///
/// Rules implement whichever hooks they need; the validator calls
/// [`check_graph`](Rule::check_graph) once, [`check_module`](Rule::check_module)
/// for every module and [`check_dependency`](Rule::check_dependency) for every
/// edge until one rule answers.
pub trait Rule: Send + Sync + fmt::Debug {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn severity(&self) -> Severity;

    /// Where the rule was declared.
    fn location(&self) -> &Location;

    fn check_graph(&self, _ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        Vec::new()
    }

    fn check_module(&self, _ctx: &RuleContext<'_>, _module: ModuleId) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// `Some` claims the edge: no later rule is asked about it.
    fn check_dependency(&self, _ctx: &RuleContext<'_>, _dependency: &Dependency) -> Option<Diagnostic> {
        None
    }
}

/// Every built-in rule, in declaration order.
#[derive(Debug, Clone)]
pub enum PolicyRule {
    Dependency(DependencyRule),
    NoCircular(NoCircularDependencies),
    NoSelf(NoSelfDependencies),
    UniqueProjects(UniqueProjects),
    UniqueDependencies(UniqueDependencies),
}

impl PolicyRule {
    fn as_rule(&self) -> &dyn Rule {
        match self {
            Self::Dependency(rule) => rule,
            Self::NoCircular(rule) => rule,
            Self::NoSelf(rule) => rule,
            Self::UniqueProjects(rule) => rule,
            Self::UniqueDependencies(rule) => rule,
        }
    }

    pub fn as_dependency_rule(&self) -> Option<&DependencyRule> {
        match self {
            Self::Dependency(rule) => Some(rule),
            _ => None,
        }
    }
}

impl Rule for PolicyRule {
    fn name(&self) -> &'static str {
        self.as_rule().name()
    }

    fn severity(&self) -> Severity {
        self.as_rule().severity()
    }

    fn location(&self) -> &Location {
        self.as_rule().location()
    }

    fn check_graph(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        self.as_rule().check_graph(ctx)
    }

    fn check_module(&self, ctx: &RuleContext<'_>, module: ModuleId) -> Vec<Diagnostic> {
        self.as_rule().check_module(ctx, module)
    }

    fn check_dependency(&self, ctx: &RuleContext<'_>, dependency: &Dependency) -> Option<Diagnostic> {
        self.as_rule().check_dependency(ctx, dependency)
    }
}

impl From<DependencyRule> for PolicyRule {
    fn from(rule: DependencyRule) -> Self {
        Self::Dependency(rule)
    }
}

impl From<NoCircularDependencies> for PolicyRule {
    fn from(rule: NoCircularDependencies) -> Self {
        Self::NoCircular(rule)
    }
}

impl From<NoSelfDependencies> for PolicyRule {
    fn from(rule: NoSelfDependencies) -> Self {
        Self::NoSelf(rule)
    }
}

impl From<UniqueProjects> for PolicyRule {
    fn from(rule: UniqueProjects) -> Self {
        Self::UniqueProjects(rule)
    }
}

impl From<UniqueDependencies> for PolicyRule {
    fn from(rule: UniqueDependencies) -> Self {
        Self::UniqueDependencies(rule)
    }
}
