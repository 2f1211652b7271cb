//! Non-fatal findings produced while building and validating a graph.
//!
//! A diagnostic's message is a list of [`MessageElement`]s mixing literal text
//! with references to modules and dependencies, so renderers can decide how
//! much detail to show for each referenced entity.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Dependency, DependencyGraph, Location, ModuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DiagnosticKind {
    /// An allow/deny rule matched a dependency.
    DependencyRule { allowed: bool },
    CircularDependency,
    SelfDependency,
    NonUniqueProject,
    DuplicateDependency,
    /// A reference resolved to more than one module.
    AmbiguousReference,
    /// A project reference only matched through a weaker identifier than its path.
    SimilarProject,
    /// A project reference matched nothing and a placeholder was created.
    ProjectNotFound,
    /// A configuration entry never matched anything.
    UnusedConfig,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::DependencyRule { allowed: true } => "dependency-allowed",
            Self::DependencyRule { allowed: false } => "dependency-denied",
            Self::CircularDependency => "circular-dependency",
            Self::SelfDependency => "self-dependency",
            Self::NonUniqueProject => "non-unique-project",
            Self::DuplicateDependency => "duplicate-dependency",
            Self::AmbiguousReference => "ambiguous-reference",
            Self::SimilarProject => "similar-project",
            Self::ProjectNotFound => "project-not-found",
            Self::UnusedConfig => "unused-config",
        };
        f.write_str(tag)
    }
}

/// How much of a referenced entity to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Detail {
    Name,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "element")]
pub enum MessageElement {
    Text { text: String },
    Module { id: ModuleId, detail: Detail },
    Dependency { dependency: Dependency, detail: Detail },
}

/// Structured diagnostic message.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Message(Vec<MessageElement>);

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.0.push(MessageElement::Text { text: text.into() });
        self
    }

    pub fn module(mut self, id: ModuleId, detail: Detail) -> Self {
        self.0.push(MessageElement::Module { id, detail });
        self
    }

    pub fn dependency(mut self, dependency: &Dependency, detail: Detail) -> Self {
        self.0.push(MessageElement::Dependency {
            dependency: dependency.clone(),
            detail,
        });
        self
    }

    /// Append `ids` as a comma-separated list.
    pub fn modules(mut self, ids: &[ModuleId], detail: Detail) -> Self {
        for (index, id) in ids.iter().enumerate() {
            if index > 0 {
                self = self.text(", ");
            }
            self = self.module(*id, detail);
        }
        self
    }

    pub fn elements(&self) -> &[MessageElement] {
        &self.0
    }

    /// Render to plain text against the graph the ids belong to.
    pub fn render(&self, graph: &DependencyGraph) -> String {
        let mut out = String::new();
        for element in &self.0 {
            match element {
                MessageElement::Text { text } => out.push_str(text),
                MessageElement::Module { id, detail } => out.push_str(&describe_module(graph, *id, *detail)),
                MessageElement::Dependency { dependency, detail } => {
                    out.push_str(&describe_module(graph, dependency.source(), Detail::Name));
                    out.push_str(" -> ");
                    out.push_str(&describe_module(graph, dependency.target(), Detail::Name));
                    if *detail == Detail::Full {
                        out.push_str(&format!(" ({}", dependency.kind()));
                        if !dependency.location().is_synthetic() {
                            out.push_str(&format!(" at {}", dependency.location()));
                        }
                        out.push(')');
                    }
                }
            }
        }
        out
    }

    fn remap(&mut self, ids: &[ModuleId]) {
        for element in &mut self.0 {
            match element {
                MessageElement::Text { .. } => {}
                MessageElement::Module { id, .. } => *id = ids[id.index()],
                MessageElement::Dependency { dependency, .. } => dependency.remap(ids),
            }
        }
    }
}

fn describe_module(graph: &DependencyGraph, id: ModuleId, detail: Detail) -> String {
    let Some(module) = graph.get(id) else {
        return id.to_string();
    };
    match detail {
        Detail::Name => module.name().to_string(),
        Detail::Full => {
            let mut text = module.name().to_string();
            if module.library_name() != module.name() {
                text.push_str(&format!(" [{}]", module.library_name()));
            }
            let paths: Vec<String> = module
                .paths()
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            if !paths.is_empty() {
                text.push_str(&format!(" ({})", paths.join(", ")));
            }
            text
        }
    }
}

/// A single non-fatal finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: Message,
    /// Modules involved, sorted.
    pub modules: Vec<ModuleId>,
    /// Dependencies involved, sorted.
    pub dependencies: Vec<Dependency>,
    /// Configuration entry that produced this diagnostic, if any.
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, severity: Severity, message: Message) -> Self {
        Self {
            kind,
            severity,
            message,
            modules: Vec::new(),
            dependencies: Vec::new(),
            location: None,
        }
    }

    pub fn with_modules(mut self, modules: impl IntoIterator<Item = ModuleId>) -> Self {
        self.modules.extend(modules);
        self.modules.sort();
        self.modules.dedup();
        self
    }

    pub fn with_dependencies<'a>(mut self, dependencies: impl IntoIterator<Item = &'a Dependency>) -> Self {
        self.dependencies.extend(dependencies.into_iter().cloned());
        self.dependencies.sort();
        self.dependencies.dedup();
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Allowed dependency matches are bookkeeping, not violations.
    pub fn is_violation(&self) -> bool {
        !matches!(self.kind, DiagnosticKind::DependencyRule { allowed: true })
    }

    pub fn render(&self, graph: &DependencyGraph) -> String {
        self.message.render(graph)
    }

    pub(crate) fn remap(&mut self, ids: &[ModuleId]) {
        self.message.remap(ids);
        for id in &mut self.modules {
            *id = ids[id.index()];
        }
        self.modules.sort();
        for dependency in &mut self.dependencies {
            dependency.remap(ids);
        }
        self.dependencies.sort();
    }

    fn sort_key(&self) -> (DiagnosticKind, &[ModuleId], &[Dependency], Option<&Location>) {
        (self.kind, &self.modules, &self.dependencies, self.location.as_ref())
    }
}

/// Sort diagnostics into their canonical, reproducible order.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(compare);
}

fn compare(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    a.sort_key()
        .cmp(&b.sort_key())
        .then_with(|| b.severity.cmp(&a.severity))
}
