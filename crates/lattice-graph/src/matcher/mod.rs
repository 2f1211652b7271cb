//! Composable predicates over modules and dependencies.
//!
//! Matchers are plain enum trees so they can be built programmatically or
//! compiled from a policy document. Evaluation takes a [`MatchReporter`] that
//! receives every inspected field; it is used to explain matches in
//! diagnostics and never influences the result.
//!
//! # Group fallback
//!
//! [`ModuleMatcher::matches`] evaluates the matcher against the module and,
//! if that fails and the module has been assigned a group, against its
//! [`GroupElement`]. A rule written once therefore applies both to a single
//! module and to every member of a matching group.

mod pattern;
mod report;

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

pub use pattern::{AnchoredRegex, NamePattern, PathPrefix, normalize_path};
pub(crate) use report::Inverted;
pub use report::{MatchLog, MatchReport, MatchReporter, Silent};

use super::{Dependency, DependencyKind, GroupElement, Module, ModuleKindTag};
use crate::Result;

/// The thing a module matcher is evaluated against.
#[derive(Debug, Clone, Copy)]
pub enum MatchTarget<'a> {
    Module(&'a Module),
    /// A group element standing in for `module`.
    Group {
        element: &'a GroupElement,
        module: &'a Module,
    },
}

impl<'a> MatchTarget<'a> {
    fn module(&self) -> &'a Module {
        match *self {
            Self::Module(module) | Self::Group { module, .. } => module,
        }
    }

    /// `(field, value)` pairs answered to name matchers.
    fn names(&self) -> Vec<(&'static str, &'a str)> {
        match *self {
            Self::Module(module) => module
                .names()
                .iter()
                .map(|name| ("name", name))
                .chain(module.library_names().iter().map(|name| ("library name", name)))
                .collect(),
            Self::Group { element, .. } => vec![("group", element.group().name())],
        }
    }

    fn paths(&self) -> Vec<&'a Path> {
        match *self {
            Self::Module(module) => module.paths().iter().map(|path| path.as_path()).collect(),
            Self::Group { .. } => Vec::new(),
        }
    }

    fn languages(&self) -> &'a BTreeSet<String> {
        self.module().languages()
    }

    fn is_local(&self) -> bool {
        self.module().is_local()
    }

    fn kind(&self) -> ModuleKindTag {
        match *self {
            Self::Module(module) => module.kind_tag(),
            Self::Group { .. } => ModuleKindTag::Library,
        }
    }

    fn group_name(&self) -> Option<&'a str> {
        match *self {
            Self::Module(_) => None,
            Self::Group { element, .. } => Some(element.group().name()),
        }
    }
}

/// Evaluate `predicate` over `values`, reporting each one until the first hit.
fn first_hit<'v, I, F>(field: &str, values: I, predicate: F, reporter: &mut dyn MatchReporter) -> bool
where
    I: IntoIterator<Item = &'v str>,
    F: Fn(&str) -> bool,
{
    for value in values {
        let matched = predicate(value);
        reporter.report(field, value, matched);
        if matched {
            return true;
        }
    }
    false
}

/// Predicate over a module (or the group element standing in for it).
#[derive(Debug, Clone)]
pub enum ModuleMatcher {
    /// Matches everything.
    Any,
    /// Wildcard/alternation match over display names and library names.
    Name(NamePattern),
    /// Anchored regex over display names and library names.
    NameRegex(AnchoredRegex),
    /// Absolute path prefix over the module's paths.
    Path(PathPrefix),
    /// Anchored regex over the module's paths.
    PathRegex(AnchoredRegex),
    /// The module declares this language.
    Language(String),
    /// `is_local` equals the given value.
    Local(bool),
    Kind(ModuleKindTag),
    /// Matches only group elements whose group name matches.
    Group(NamePattern),
    And(Box<ModuleMatcher>, Box<ModuleMatcher>),
    Or(Box<ModuleMatcher>, Box<ModuleMatcher>),
    Not(Box<ModuleMatcher>),
}

impl ModuleMatcher {
    pub fn name(pattern: &str) -> Result<Self> {
        Ok(Self::Name(NamePattern::new(pattern)?))
    }

    pub fn name_regex(pattern: &str) -> Result<Self> {
        Ok(Self::NameRegex(AnchoredRegex::new(pattern)?))
    }

    pub fn path(pattern: &str) -> Result<Self> {
        Ok(Self::Path(PathPrefix::new(pattern)?))
    }

    pub fn path_regex(pattern: &str) -> Result<Self> {
        Ok(Self::PathRegex(AnchoredRegex::new(pattern)?))
    }

    pub fn language(language: impl Into<String>) -> Self {
        Self::Language(language.into())
    }

    pub fn group(pattern: &str) -> Result<Self> {
        Ok(Self::Group(NamePattern::new(pattern)?))
    }

    pub fn and(self, other: ModuleMatcher) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: ModuleMatcher) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Fold matchers with `And`; an empty list matches everything.
    pub fn all(matchers: impl IntoIterator<Item = ModuleMatcher>) -> Self {
        matchers
            .into_iter()
            .reduce(ModuleMatcher::and)
            .unwrap_or(Self::Any)
    }

    /// Fold matchers with `Or`; an empty list matches nothing.
    pub fn any(matchers: impl IntoIterator<Item = ModuleMatcher>) -> Self {
        matchers
            .into_iter()
            .reduce(ModuleMatcher::or)
            .unwrap_or_else(|| !Self::Any)
    }

    /// Evaluate against a module, falling back to its group element.
    pub fn matches(
        &self,
        module: &Module,
        group: Option<&GroupElement>,
        reporter: &mut dyn MatchReporter,
    ) -> bool {
        if self.matches_target(MatchTarget::Module(module), reporter) {
            return true;
        }
        match group {
            Some(element) => self.matches_target(MatchTarget::Group { element, module }, reporter),
            None => false,
        }
    }

    /// Evaluate against exactly one target, without group fallback.
    pub fn matches_target(&self, target: MatchTarget<'_>, reporter: &mut dyn MatchReporter) -> bool {
        match self {
            Self::Any => true,
            Self::Name(pattern) => target.names().into_iter().any(|(field, value)| {
                let matched = pattern.is_match(value);
                reporter.report(field, value, matched);
                matched
            }),
            Self::NameRegex(regex) => target.names().into_iter().any(|(field, value)| {
                let matched = regex.is_match(value);
                reporter.report(field, value, matched);
                matched
            }),
            Self::Path(prefix) => target.paths().into_iter().any(|path| {
                let matched = prefix.is_match(path);
                reporter.report("path", &path.to_string_lossy(), matched);
                matched
            }),
            Self::PathRegex(regex) => target.paths().into_iter().any(|path| {
                let value = path.to_string_lossy();
                let matched = regex.is_match(&value);
                reporter.report("path", &value, matched);
                matched
            }),
            Self::Language(language) => first_hit(
                "language",
                target.languages().iter().map(String::as_str),
                |value| value.eq_ignore_ascii_case(language),
                reporter,
            ),
            Self::Local(expected) => {
                let actual = target.is_local();
                let matched = actual == *expected;
                reporter.report("local", if actual { "true" } else { "false" }, matched);
                matched
            }
            Self::Kind(expected) => {
                let actual = target.kind();
                let matched = actual == *expected;
                reporter.report("kind", &actual.to_string(), matched);
                matched
            }
            Self::Group(pattern) => match target.group_name() {
                Some(name) => {
                    let matched = pattern.is_match(name);
                    reporter.report("group", name, matched);
                    matched
                }
                None => false,
            },
            Self::And(left, right) => {
                left.matches_target(target, reporter) && right.matches_target(target, reporter)
            }
            Self::Or(left, right) => {
                left.matches_target(target, reporter) || right.matches_target(target, reporter)
            }
            Self::Not(inner) => !inner.matches_target(target, &mut Inverted(reporter)),
        }
    }
}

impl std::ops::Not for ModuleMatcher {
    type Output = ModuleMatcher;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}

impl fmt::Display for ModuleMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Name(pattern) => write!(f, "{pattern}"),
            Self::NameRegex(regex) => write!(f, "name_regex:{regex}"),
            Self::Path(prefix) => write!(f, "path:{prefix}"),
            Self::PathRegex(regex) => write!(f, "path_regex:{regex}"),
            Self::Language(language) => write!(f, "language:{language}"),
            Self::Local(local) => write!(f, "local:{local}"),
            Self::Kind(kind) => write!(f, "kind:{kind}"),
            Self::Group(pattern) => write!(f, "group:{pattern}"),
            Self::And(left, right) => write!(f, "({left} and {right})"),
            Self::Or(left, right) => write!(f, "({left} or {right})"),
            Self::Not(inner) => write!(f, "not {inner}"),
        }
    }
}

/// Predicate over a dependency edge.
#[derive(Debug, Clone)]
pub enum DependencyMatcher {
    Any,
    Kind(DependencyKind),
    /// Absolute path prefix over the referenced path.
    Path(PathPrefix),
    /// Anchored regex over the referenced path.
    PathRegex(AnchoredRegex),
    And(Box<DependencyMatcher>, Box<DependencyMatcher>),
    Or(Box<DependencyMatcher>, Box<DependencyMatcher>),
    Not(Box<DependencyMatcher>),
}

impl DependencyMatcher {
    pub fn path(pattern: &str) -> Result<Self> {
        Ok(Self::Path(PathPrefix::new(pattern)?))
    }

    pub fn path_regex(pattern: &str) -> Result<Self> {
        Ok(Self::PathRegex(AnchoredRegex::new(pattern)?))
    }

    pub fn and(self, other: DependencyMatcher) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: DependencyMatcher) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    pub fn all(matchers: impl IntoIterator<Item = DependencyMatcher>) -> Self {
        matchers
            .into_iter()
            .reduce(DependencyMatcher::and)
            .unwrap_or(Self::Any)
    }

    pub fn any(matchers: impl IntoIterator<Item = DependencyMatcher>) -> Self {
        matchers
            .into_iter()
            .reduce(DependencyMatcher::or)
            .unwrap_or_else(|| !Self::Any)
    }

    pub fn matches(&self, dependency: &Dependency, reporter: &mut dyn MatchReporter) -> bool {
        match self {
            Self::Any => true,
            Self::Kind(expected) => {
                let matched = dependency.kind() == *expected;
                reporter.report("reference kind", &dependency.kind().to_string(), matched);
                matched
            }
            Self::Path(prefix) => match dependency.referenced_path() {
                Some(path) => {
                    let matched = prefix.is_match(path);
                    reporter.report("referenced path", &path.to_string_lossy(), matched);
                    matched
                }
                None => false,
            },
            Self::PathRegex(regex) => match dependency.referenced_path() {
                Some(path) => {
                    let value = path.to_string_lossy();
                    let matched = regex.is_match(&value);
                    reporter.report("referenced path", &value, matched);
                    matched
                }
                None => false,
            },
            Self::And(left, right) => left.matches(dependency, reporter) && right.matches(dependency, reporter),
            Self::Or(left, right) => left.matches(dependency, reporter) || right.matches(dependency, reporter),
            Self::Not(inner) => !inner.matches(dependency, &mut Inverted(reporter)),
        }
    }
}

impl std::ops::Not for DependencyMatcher {
    type Output = DependencyMatcher;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}

impl fmt::Display for DependencyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Kind(kind) => write!(f, "{kind}"),
            Self::Path(prefix) => write!(f, "path:{prefix}"),
            Self::PathRegex(regex) => write!(f, "path_regex:{regex}"),
            Self::And(left, right) => write!(f, "({left} and {right})"),
            Self::Or(left, right) => write!(f, "({left} or {right})"),
            Self::Not(inner) => write!(f, "not {inner}"),
        }
    }
}
