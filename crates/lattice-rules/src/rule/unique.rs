use std::collections::BTreeMap;
use std::fmt;

use lattice_graph::{
    Dependency, Detail, Diagnostic, DiagnosticKind, Location, Message, Module, ModuleId, Severity,
};
use serde::{Deserialize, Serialize};

use super::{Rule, RuleContext};

/// Which project attribute must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueBy {
    Name,
    Guid,
    NameAndGuid,
}

impl UniqueBy {
    /// Grouping key, `None` when the project has nothing to compare.
    fn key(self, module: &Module) -> Option<String> {
        let name = module.name().to_lowercase();
        match self {
            Self::Name => Some(name),
            Self::Guid => module.guid().map(|guid| guid.to_string()),
            Self::NameAndGuid => Some(format!(
                "{name}|{}",
                module.guid().map(|guid| guid.to_string()).unwrap_or_default()
            )),
        }
    }
}

impl fmt::Display for UniqueBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Guid => f.write_str("guid"),
            Self::NameAndGuid => f.write_str("name and guid"),
        }
    }
}

/// Projects must not share the configured key.
#[derive(Debug, Clone)]
pub struct UniqueProjects {
    by: UniqueBy,
    severity: Severity,
    location: Location,
}

impl UniqueProjects {
    pub fn new(by: UniqueBy, severity: Severity, location: Location) -> Self {
        Self { by, severity, location }
    }

    pub fn by(&self) -> UniqueBy {
        self.by
    }
}

impl Rule for UniqueProjects {
    fn name(&self) -> &'static str {
        "unique_projects"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn check_graph(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut by_key: BTreeMap<String, Vec<ModuleId>> = BTreeMap::new();
        for (id, module) in ctx.graph.modules().filter(|(_, module)| module.is_project()) {
            if let Some(key) = self.by.key(module) {
                by_key.entry(key).or_default().push(id);
            }
        }

        by_key
            .into_values()
            .filter(|members| members.len() > 1)
            .map(|members| {
                let message = Message::new()
                    .text(format!("projects share the same {}: ", self.by))
                    .modules(&members, Detail::Full);
                Diagnostic::new(DiagnosticKind::NonUniqueProject, self.severity, message)
                    .with_modules(members)
                    .with_location(self.location.clone())
            })
            .collect()
    }
}

/// A project must not reference the same module more than once.
#[derive(Debug, Clone)]
pub struct UniqueDependencies {
    severity: Severity,
    location: Location,
}

impl UniqueDependencies {
    pub fn new(severity: Severity, location: Location) -> Self {
        Self { severity, location }
    }
}

impl Rule for UniqueDependencies {
    fn name(&self) -> &'static str {
        "unique_dependencies"
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn check_module(&self, ctx: &RuleContext<'_>, module: ModuleId) -> Vec<Diagnostic> {
        if !ctx.graph.module(module).is_project() {
            return Vec::new();
        }

        let mut by_target: BTreeMap<ModuleId, Vec<&Dependency>> = BTreeMap::new();
        for dependency in ctx.graph.outgoing(module) {
            by_target.entry(dependency.target()).or_default().push(dependency);
        }

        by_target
            .into_iter()
            .filter(|(_, edges)| edges.len() > 1)
            .map(|(target, edges)| {
                let message = Message::new()
                    .module(module, Detail::Name)
                    .text(" references ")
                    .module(target, Detail::Name)
                    .text(format!(" {} times", edges.len()));
                Diagnostic::new(DiagnosticKind::DuplicateDependency, self.severity, message)
                    .with_modules([module, target])
                    .with_dependencies(edges)
                    .with_location(self.location.clone())
            })
            .collect()
    }
}
