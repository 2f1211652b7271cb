//! Text and JSON renderings of an analysis.
//!
//! Reports list violations only, unless `show_allowed` asks for the allow
//! rule matches as well. Both renderings are deterministic for a given input.

use std::fmt::Write as _;

use indexmap::IndexMap;
use lattice_config::ReportFormat;
use lattice_graph::{Diagnostic, DiagnosticKind, GraphStatistics, Location, ModuleId, Severity};
use lattice_rules::{Analysis, ArchitectureGraph};
use serde::Serialize;

use crate::error::Result;
use crate::ui::plural;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    /// Dependencies explicitly allowed by a rule.
    pub allowed: usize,
}

impl Summary {
    pub fn of(analysis: &Analysis) -> Self {
        Self {
            errors: analysis.count(Severity::Error),
            warnings: analysis.count(Severity::Warning),
            infos: analysis.count(Severity::Info),
            allowed: analysis.diagnostics.iter().filter(|d| !d.is_violation()).count(),
        }
    }

    pub fn violations(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            plural(self.errors, "error"),
            plural(self.warnings, "warning"),
            plural(self.infos, "info")
        )
    }
}

pub struct Report<'a> {
    analysis: &'a Analysis,
    show_allowed: bool,
}

impl<'a> Report<'a> {
    pub fn new(analysis: &'a Analysis, show_allowed: bool) -> Self {
        Self {
            analysis,
            show_allowed,
        }
    }

    fn diagnostics(&self) -> impl Iterator<Item = &'a Diagnostic> + '_ {
        self.analysis
            .diagnostics
            .iter()
            .filter(|diagnostic| self.show_allowed || diagnostic.is_violation())
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json(),
        }
    }

    pub fn render_text(&self) -> String {
        let graph = &self.analysis.graph;
        let mut out = String::new();
        for diagnostic in self.diagnostics() {
            let _ = writeln!(
                out,
                "{}[{}]: {}",
                diagnostic.severity,
                diagnostic.kind,
                diagnostic.render(graph)
            );
            if let Some(location) = &diagnostic.location {
                let _ = writeln!(out, "  --> {location}");
            }
        }
        let _ = writeln!(out, "{}", Summary::of(self.analysis));
        out
    }

    pub fn render_json(&self) -> Result<String> {
        let graph = &self.analysis.graph;
        let diagnostics: Vec<_> = self
            .diagnostics()
            .map(|diagnostic| JsonDiagnostic {
                severity: diagnostic.severity,
                kind: diagnostic.kind.to_string(),
                allowed: matches!(diagnostic.kind, DiagnosticKind::DependencyRule { allowed: true }),
                message: diagnostic.render(graph),
                location: diagnostic.location.as_ref(),
                modules: names(self.analysis, &diagnostic.modules),
            })
            .collect();

        let mut by_kind: IndexMap<String, usize> = IndexMap::new();
        for diagnostic in &diagnostics {
            *by_kind.entry(diagnostic.kind.clone()).or_default() += 1;
        }

        let report = JsonReport {
            summary: Summary::of(self.analysis),
            statistics: graph.statistics(),
            by_kind,
            diagnostics,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    statistics: GraphStatistics,
    /// Diagnostic count per kind, in report order.
    by_kind: IndexMap<String, usize>,
    diagnostics: Vec<JsonDiagnostic<'a>>,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    severity: Severity,
    kind: String,
    allowed: bool,
    message: String,
    location: Option<&'a Location>,
    modules: Vec<&'a str>,
}

fn names<'a>(analysis: &'a Analysis, ids: &[ModuleId]) -> Vec<&'a str> {
    ids.iter().map(|id| analysis.graph.module(*id).name()).collect()
}

pub fn render_architecture(architecture: &ArchitectureGraph, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(architecture)?),
        ReportFormat::Text => {
            let mut out = String::new();
            let groups: Vec<_> = architecture.groups.iter().map(|group| group.name()).collect();
            let _ = writeln!(out, "groups: {}", groups.join(", "));
            for edge in &architecture.edges {
                let _ = writeln!(out, "{} -> {}: {}", edge.source, edge.target, edge.relation);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use lattice_graph::{DependencyKind, GraphBuilder, ModuleMatcher, ReferenceSpec};
    use lattice_rules::{DependencyRule, GroupRule, NoSelfDependencies, Policy};

    use super::*;

    fn at(line: usize) -> Location {
        Location::new("/repo/lattice.toml", line)
    }

    fn name(pattern: &str) -> ModuleMatcher {
        ModuleMatcher::name(pattern).unwrap()
    }

    fn analysis() -> Analysis {
        let mut builder = GraphBuilder::new();
        let web = builder.declare_module("Web", "Web", None, Some("/repo/Web/Web.csproj".into()), ["C#"]);
        let core = builder.declare_module("Core", "Core", None, Some("/repo/Core/Core.csproj".into()), ["C#"]);
        builder.declare_reference(
            web,
            ReferenceSpec::new(DependencyKind::ProjectReference, Location::new("/repo/Web/Web.csproj", 8))
                .with_name("Core"),
        );
        builder.declare_reference(
            core,
            ReferenceSpec::new(DependencyKind::ProjectReference, Location::new("/repo/Core/Core.csproj", 5))
                .with_name("Core"),
        );

        let policy = Policy {
            groups: vec![
                GroupRule::new("UI", name("Web"), at(1)),
                GroupRule::new("Domain", name("Core"), at(4)),
            ],
            rules: vec![
                DependencyRule::allow(name("UI"), name("Domain"), at(7)).into(),
                NoSelfDependencies::new(Severity::Warning, at(12)).into(),
            ],
            ..Policy::default()
        };
        policy.analyze(builder).unwrap()
    }

    #[test]
    fn test_text_report_hides_allowed() {
        let analysis = analysis();
        insta::assert_snapshot!(Report::new(&analysis, false).render_text(), @r"
        warning[self-dependency]: Core (/repo/Core/Core.csproj) depends on itself
          --> /repo/lattice.toml:12
        0 errors, 1 warning, 0 infos
        ");
    }

    #[test]
    fn test_text_report_with_allowed() {
        let analysis = analysis();
        let text = Report::new(&analysis, true).render_text();
        assert!(text.starts_with("error[dependency-allowed]: Web -> Core"), "{text}");
        assert_eq!(Summary::of(&analysis).allowed, 1);
    }

    #[test]
    fn test_json_report() {
        let analysis = analysis();
        let json: serde_json::Value =
            serde_json::from_str(&Report::new(&analysis, false).render_json().unwrap()).unwrap();
        assert_eq!(json["summary"]["warnings"], 1);
        assert_eq!(json["statistics"]["module_count"], 2);
        assert_eq!(json["by_kind"]["self-dependency"], 1);
        let diagnostic = &json["diagnostics"][0];
        assert_eq!(diagnostic["severity"], "warning");
        assert_eq!(diagnostic["modules"], serde_json::json!(["Core"]));
        assert_eq!(diagnostic["location"]["line"], 12);
    }

    #[test]
    fn test_architecture_text() {
        let analysis = analysis();
        let policy = Policy {
            rules: vec![DependencyRule::allow(name("UI"), name("Domain"), at(7)).into()],
            ..Policy::default()
        };
        let text = render_architecture(&analysis.architecture(&policy), ReportFormat::Text).unwrap();
        insta::assert_snapshot!(text, @r"
        groups: Domain, UI
        Domain -> UI: implicit
        UI -> Domain: allowed
        ");
    }
}
