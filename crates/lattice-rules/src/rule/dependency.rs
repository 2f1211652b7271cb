use lattice_graph::{
    Dependency, DependencyMatcher, Detail, Diagnostic, DiagnosticKind, Location, MatchLog, MatchReporter,
    Message, ModuleMatcher, Severity, Silent,
};

use super::{Rule, RuleContext};

/// Allows or denies edges whose endpoints (and optionally whose reference)
/// match.
#[derive(Debug, Clone)]
pub struct DependencyRule {
    pub allow: bool,
    pub severity: Severity,
    pub source: ModuleMatcher,
    pub target: ModuleMatcher,
    pub reference: Option<DependencyMatcher>,
    pub location: Location,
}

impl DependencyRule {
    pub fn allow(source: ModuleMatcher, target: ModuleMatcher, location: Location) -> Self {
        Self {
            allow: true,
            severity: Severity::Error,
            source,
            target,
            reference: None,
            location,
        }
    }

    pub fn deny(source: ModuleMatcher, target: ModuleMatcher, location: Location) -> Self {
        Self {
            allow: false,
            ..Self::allow(source, target, location)
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_reference(mut self, reference: DependencyMatcher) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Whether `dependency` falls under this rule. Both endpoints use group
    /// fallback.
    pub fn matches(&self, ctx: &RuleContext<'_>, dependency: &Dependency, reporter: &mut dyn MatchReporter) -> bool {
        let source = dependency.source();
        let target = dependency.target();
        self.source
            .matches(ctx.graph.module(source), ctx.group_of(source), reporter)
            && self
                .target
                .matches(ctx.graph.module(target), ctx.group_of(target), reporter)
            && self
                .reference
                .as_ref()
                .is_none_or(|reference| reference.matches(dependency, reporter))
    }

    fn describe(&self) -> String {
        match &self.reference {
            Some(reference) => format!("{} -> {} ({reference})", self.source, self.target),
            None => format!("{} -> {}", self.source, self.target),
        }
    }
}

impl Rule for DependencyRule {
    fn name(&self) -> &'static str {
        if self.allow { "allow" } else { "deny" }
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn location(&self) -> &Location {
        &self.location
    }

    fn check_dependency(&self, ctx: &RuleContext<'_>, dependency: &Dependency) -> Option<Diagnostic> {
        if !self.matches(ctx, dependency, &mut Silent) {
            return None;
        }

        // Second pass only to collect what matched.
        let mut log = MatchLog::new();
        self.matches(ctx, dependency, &mut log);
        let evidence: Vec<String> = log
            .matched()
            .into_iter()
            .map(|report| format!("{} '{}'", report.field, report.value))
            .collect();

        let verb = if self.allow { "allowed" } else { "denied" };
        let mut message = Message::new()
            .dependency(dependency, Detail::Full)
            .text(format!(" is {verb} by `{}`", self.describe()));
        if !evidence.is_empty() {
            message = message.text(format!(", matched {}", evidence.join(", ")));
        }

        Some(
            Diagnostic::new(DiagnosticKind::DependencyRule { allowed: self.allow }, self.severity, message)
                .with_modules([dependency.source(), dependency.target()])
                .with_dependencies([dependency])
                .with_location(self.location.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use lattice_graph::{DependencyGraph, DependencyKind, GraphBuilder, ReferenceSpec};

    use super::*;
    use crate::GroupAssignment;

    fn graph() -> DependencyGraph {
        let mut builder = GraphBuilder::new();
        let web = builder.declare_module("Web", "Web", None, None, ["C#"]);
        builder.declare_module("Data", "Data", None, None, ["C#"]);
        builder.declare_reference(
            web,
            ReferenceSpec::new(DependencyKind::ProjectReference, Location::new("Web.csproj", 9)).with_name("Data"),
        );
        builder.build().unwrap().graph
    }

    fn name(pattern: &str) -> ModuleMatcher {
        ModuleMatcher::name(pattern).unwrap()
    }

    #[test]
    fn test_deny_rule_reports_evidence() {
        let graph = graph();
        let groups = GroupAssignment::empty(&graph);
        let ctx = RuleContext::new(&graph, &groups);
        let rule = DependencyRule::deny(name("Web"), name("Data"), Location::new("lattice.toml", 3));

        let diagnostic = rule.check_dependency(&ctx, &graph.dependencies()[0]).unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::DependencyRule { allowed: false });
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(
            diagnostic.render(&graph),
            "Web -> Data (project reference at Web.csproj:9) is denied by `Web -> Data`, matched name 'Web', name 'Data'"
        );
    }

    #[test]
    fn test_reference_matcher_narrows_the_rule() {
        let graph = graph();
        let groups = GroupAssignment::empty(&graph);
        let ctx = RuleContext::new(&graph, &groups);
        let dependency = &graph.dependencies()[0];

        let library_only = DependencyRule::deny(name("*"), name("*"), Location::default())
            .with_reference(DependencyMatcher::Kind(DependencyKind::LibraryReference));
        assert!(library_only.check_dependency(&ctx, dependency).is_none());

        let project_only = DependencyRule::allow(name("*"), name("*"), Location::default())
            .with_severity(Severity::Warning)
            .with_reference(DependencyMatcher::Kind(DependencyKind::ProjectReference));
        let diagnostic = project_only.check_dependency(&ctx, dependency).unwrap();
        assert_eq!(diagnostic.kind, DiagnosticKind::DependencyRule { allowed: true });
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert!(!diagnostic.is_violation());
    }
}
