//! Raw serde shape of a `lattice.toml` policy document.
//!
//! Nothing here is validated beyond what serde enforces; [`crate::compile`]
//! turns these types into matchers and rules.

use std::path::PathBuf;

use lattice_graph::Severity;
use lattice_rules::UniqueBy;
use serde::Deserialize;
use toml::Spanned;

use crate::ReportFormat;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    /// Input roots; modules under one of them are local.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,

    /// Report settings, layered under env vars and CLI flags.
    #[serde(default)]
    pub settings: toml::Table,

    #[serde(default)]
    pub group: Vec<Spanned<GroupEntry>>,

    #[serde(default)]
    pub ignore: Vec<Spanned<IgnoreEntry>>,

    #[serde(default)]
    pub rule: Vec<Spanned<RuleEntry>>,

    #[serde(default)]
    pub output: Vec<OutputEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupEntry {
    /// Empty or `-` claims matching modules for no group.
    pub name: String,
    pub matches: MatcherExpr,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreEntry {
    pub matches: MatcherExpr,
}

/// A module matcher: a bare string is a name pattern, anything else is a
/// one-key table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MatcherExpr {
    Pattern(String),
    Table(MatcherTable),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherTable {
    Name(String),
    NameRegex(String),
    Path(String),
    PathRegex(String),
    Language(String),
    Local(bool),
    Kind(ModuleKindExpr),
    Group(String),
    All(Vec<MatcherExpr>),
    Any(Vec<MatcherExpr>),
    Not(Box<MatcherExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKindExpr {
    Project,
    Library,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyExpr {
    Kind(ReferenceKindExpr),
    Path(String),
    PathRegex(String),
    All(Vec<DependencyExpr>),
    Any(Vec<DependencyExpr>),
    Not(Box<DependencyExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKindExpr {
    Project,
    Library,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleEntry {
    Allow(DependencyRuleEntry),
    Deny(DependencyRuleEntry),
    NoCircularDependencies {
        #[serde(default = "default_severity")]
        severity: Severity,
    },
    NoSelfDependencies {
        #[serde(default = "default_severity")]
        severity: Severity,
    },
    UniqueProjects {
        #[serde(default = "default_severity")]
        severity: Severity,
        #[serde(default = "default_unique_by")]
        by: UniqueBy,
    },
    UniqueDependencies {
        #[serde(default = "default_severity")]
        severity: Severity,
    },
}

#[derive(Debug, Deserialize)]
pub struct DependencyRuleEntry {
    #[serde(default = "default_severity")]
    pub severity: Severity,
    /// Missing means any module.
    pub source: Option<MatcherExpr>,
    pub target: Option<MatcherExpr>,
    pub reference: Option<DependencyExpr>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputEntry {
    #[serde(default)]
    pub format: ReportFormat,
    pub path: PathBuf,
}

fn default_severity() -> Severity {
    Severity::Error
}

fn default_unique_by() -> UniqueBy {
    UniqueBy::NameAndGuid
}
