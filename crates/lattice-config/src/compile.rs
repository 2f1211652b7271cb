//! Compiling a [`PolicyDocument`] into a [`Policy`].

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use lattice_graph::{
    DependencyKind, DependencyMatcher, IgnoreRule, Location, ModuleKindTag, ModuleMatcher,
};
use lattice_rules::{
    DependencyRule, GroupRule, NoCircularDependencies, NoSelfDependencies, Policy, PolicyRule,
    UniqueDependencies, UniqueProjects,
};
use toml::Spanned;
use tracing::{debug, info};

use crate::document::{
    DependencyExpr, DependencyRuleEntry, MatcherExpr, MatcherTable, ModuleKindExpr, PolicyDocument,
    ReferenceKindExpr, RuleEntry,
};
use crate::error::{ConfigError, Result};
use crate::ReportFormat;

/// An extra report destination from an `[[output]]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub format: ReportFormat,
    pub path: PathBuf,
}

/// A loaded and compiled policy file.
#[derive(Debug, Clone)]
pub struct PolicyFile {
    pub path: PathBuf,
    pub policy: Policy,
    pub outputs: Vec<OutputSpec>,
    /// The raw `[settings]` table, see [`crate::Settings::load`].
    pub settings: toml::Table,
}

impl PolicyFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)?;
        Self::parse(path, &source)
    }

    /// Parse `source` as if it had been read from `path`. Relative input and
    /// output paths are resolved against the directory of `path`.
    pub fn parse(path: &Path, source: &str) -> Result<Self> {
        let lines = LineIndex::new(source);
        let document: PolicyDocument = toml::from_str(source).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            line: err.span().map(|span| lines.line_of(span.start)),
            message: err.message().to_string(),
        })?;

        let base = path.parent().unwrap_or(Path::new(""));
        let compiler = Compiler { path, lines, base };
        let file = compiler.compile(document)?;
        info!(
            path = %path.display(),
            groups = file.policy.groups.len(),
            ignores = file.policy.ignores.len(),
            rules = file.policy.rules.len(),
            "policy loaded"
        );
        Ok(file)
    }
}

struct Compiler<'a> {
    path: &'a Path,
    lines: LineIndex<'a>,
    base: &'a Path,
}

impl Compiler<'_> {
    fn compile(&self, document: PolicyDocument) -> Result<PolicyFile> {
        let input_roots = document.inputs.iter().map(|input| self.resolve(input)).collect();

        let groups = document
            .group
            .into_iter()
            .map(|entry| {
                let location = self.location(&entry);
                let entry = entry.into_inner();
                let matcher = self.module_matcher(&entry.matches, &location)?;
                Ok(match entry.name.trim() {
                    "" | "-" => GroupRule::no_group(matcher, location),
                    name => GroupRule::new(name, matcher, location),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let ignores = document
            .ignore
            .into_iter()
            .map(|entry| {
                let location = self.location(&entry);
                let matcher = self.module_matcher(&entry.get_ref().matches, &location)?;
                Ok(IgnoreRule::new(matcher, location))
            })
            .collect::<Result<Vec<_>>>()?;

        let rules = document
            .rule
            .into_iter()
            .map(|entry| {
                let location = self.location(&entry);
                self.rule(entry.into_inner(), location)
            })
            .collect::<Result<Vec<_>>>()?;

        let outputs = document
            .output
            .into_iter()
            .map(|output| OutputSpec {
                format: output.format,
                path: self.resolve(&output.path),
            })
            .collect();

        Ok(PolicyFile {
            path: self.path.to_path_buf(),
            policy: Policy {
                input_roots,
                groups,
                ignores,
                rules,
            },
            outputs,
            settings: document.settings,
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }

    fn location<T>(&self, entry: &Spanned<T>) -> Location {
        Location::new(self.path, self.lines.entry_line(entry.span()))
    }

    fn rule(&self, entry: RuleEntry, location: Location) -> Result<PolicyRule> {
        let rule = match entry {
            RuleEntry::Allow(entry) => self.dependency_rule(true, entry, location)?.into(),
            RuleEntry::Deny(entry) => self.dependency_rule(false, entry, location)?.into(),
            RuleEntry::NoCircularDependencies { severity } => {
                NoCircularDependencies::new(severity, location).into()
            }
            RuleEntry::NoSelfDependencies { severity } => NoSelfDependencies::new(severity, location).into(),
            RuleEntry::UniqueProjects { severity, by } => UniqueProjects::new(by, severity, location).into(),
            RuleEntry::UniqueDependencies { severity } => UniqueDependencies::new(severity, location).into(),
        };
        Ok(rule)
    }

    fn dependency_rule(
        &self,
        allow: bool,
        entry: DependencyRuleEntry,
        location: Location,
    ) -> Result<DependencyRule> {
        let source = match &entry.source {
            Some(expr) => self.module_matcher(expr, &location)?,
            None => ModuleMatcher::Any,
        };
        let target = match &entry.target {
            Some(expr) => self.module_matcher(expr, &location)?,
            None => ModuleMatcher::Any,
        };
        let rule = if allow {
            DependencyRule::allow(source, target, location.clone())
        } else {
            DependencyRule::deny(source, target, location.clone())
        }
        .with_severity(entry.severity);

        debug!(%location, allow, "compiled dependency rule");
        match &entry.reference {
            Some(expr) => Ok(rule.with_reference(self.dependency_matcher(expr, &location)?)),
            None => Ok(rule),
        }
    }

    fn module_matcher(&self, expr: &MatcherExpr, location: &Location) -> Result<ModuleMatcher> {
        let invalid = |source| ConfigError::InvalidPattern {
            location: location.clone(),
            source,
        };
        let table = match expr {
            MatcherExpr::Pattern(pattern) => return ModuleMatcher::name(pattern).map_err(invalid),
            MatcherExpr::Table(table) => table,
        };

        match table {
            MatcherTable::Name(pattern) => ModuleMatcher::name(pattern).map_err(invalid),
            MatcherTable::NameRegex(pattern) => ModuleMatcher::name_regex(pattern).map_err(invalid),
            MatcherTable::Path(pattern) => ModuleMatcher::path(pattern).map_err(invalid),
            MatcherTable::PathRegex(pattern) => ModuleMatcher::path_regex(pattern).map_err(invalid),
            MatcherTable::Group(pattern) => ModuleMatcher::group(pattern).map_err(invalid),
            MatcherTable::Language(language) => Ok(ModuleMatcher::language(language.as_str())),
            MatcherTable::Local(local) => Ok(ModuleMatcher::Local(*local)),
            MatcherTable::Kind(ModuleKindExpr::Project) => Ok(ModuleMatcher::Kind(ModuleKindTag::Project)),
            MatcherTable::Kind(ModuleKindExpr::Library) => Ok(ModuleMatcher::Kind(ModuleKindTag::Library)),
            MatcherTable::All(exprs) => {
                self.non_empty("all", exprs, location)?;
                let matchers = exprs
                    .iter()
                    .map(|expr| self.module_matcher(expr, location))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ModuleMatcher::all(matchers))
            }
            MatcherTable::Any(exprs) => {
                self.non_empty("any", exprs, location)?;
                let matchers = exprs
                    .iter()
                    .map(|expr| self.module_matcher(expr, location))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ModuleMatcher::any(matchers))
            }
            MatcherTable::Not(inner) => Ok(!self.module_matcher(inner, location)?),
        }
    }

    fn dependency_matcher(&self, expr: &DependencyExpr, location: &Location) -> Result<DependencyMatcher> {
        let invalid = |source| ConfigError::InvalidPattern {
            location: location.clone(),
            source,
        };
        match expr {
            DependencyExpr::Kind(ReferenceKindExpr::Project) => {
                Ok(DependencyMatcher::Kind(DependencyKind::ProjectReference))
            }
            DependencyExpr::Kind(ReferenceKindExpr::Library) => {
                Ok(DependencyMatcher::Kind(DependencyKind::LibraryReference))
            }
            DependencyExpr::Path(pattern) => DependencyMatcher::path(pattern).map_err(invalid),
            DependencyExpr::PathRegex(pattern) => DependencyMatcher::path_regex(pattern).map_err(invalid),
            DependencyExpr::All(exprs) => {
                self.non_empty("reference.all", exprs, location)?;
                let matchers = exprs
                    .iter()
                    .map(|expr| self.dependency_matcher(expr, location))
                    .collect::<Result<Vec<_>>>()?;
                Ok(DependencyMatcher::all(matchers))
            }
            DependencyExpr::Any(exprs) => {
                self.non_empty("reference.any", exprs, location)?;
                let matchers = exprs
                    .iter()
                    .map(|expr| self.dependency_matcher(expr, location))
                    .collect::<Result<Vec<_>>>()?;
                Ok(DependencyMatcher::any(matchers))
            }
            DependencyExpr::Not(inner) => Ok(!self.dependency_matcher(inner, location)?),
        }
    }

    /// Empty combinators are almost always a typo; `all = []` would match
    /// everything and `any = []` nothing.
    fn non_empty<T>(&self, field: &str, exprs: &[T], location: &Location) -> Result<()> {
        if exprs.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                location: location.clone(),
                hint: Some("list at least one matcher".to_string()),
            });
        }
        Ok(())
    }
}

/// Maps byte offsets of a source text to 1-based line numbers.
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();
        Self { source, starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }

    fn line_text(&self, line: usize) -> &'a str {
        let start = self.starts[line - 1];
        let end = self.starts.get(line).map_or(self.source.len(), |next| next - 1);
        &self.source[start..end]
    }

    /// Line an array-of-tables entry starts on: its `[[header]]` when the
    /// span begins at the first key below it.
    fn entry_line(&self, span: Range<usize>) -> usize {
        let line = self.line_of(span.start);
        if is_table_header(self.line_text(line)) {
            return line;
        }
        (1..line)
            .rev()
            .map(|candidate| (candidate, self.line_text(candidate).trim()))
            .find(|(_, text)| !text.is_empty() && !text.starts_with('#'))
            .filter(|(_, text)| is_table_header(text))
            .map_or(line, |(candidate, _)| candidate)
    }
}

fn is_table_header(line: &str) -> bool {
    line.trim_start().starts_with("[[")
}
