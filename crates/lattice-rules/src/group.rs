//! Assigning modules to policy groups.

use lattice_graph::{
    DependencyGraph, Diagnostic, DiagnosticKind, Group, GroupElement, GroupRegistry, Location,
    Message, ModuleId, ModuleMatcher, Severity, Silent,
};
use tracing::debug;

/// One `[[group]]` entry. `group: None` claims matching modules for no group,
/// which stops later rules from assigning them.
#[derive(Debug, Clone)]
pub struct GroupRule {
    pub group: Option<String>,
    pub matcher: ModuleMatcher,
    pub location: Location,
}

impl GroupRule {
    pub fn new(group: impl Into<String>, matcher: ModuleMatcher, location: Location) -> Self {
        let group = group.into();
        Self {
            group: (!group.is_empty()).then_some(group),
            matcher,
            location,
        }
    }

    pub fn no_group(matcher: ModuleMatcher, location: Location) -> Self {
        Self {
            group: None,
            matcher,
            location,
        }
    }
}

/// The group element of every module, indexed by [`ModuleId`].
#[derive(Debug, Default)]
pub struct GroupAssignment {
    elements: Vec<Option<GroupElement>>,
    registry: GroupRegistry,
}

impl GroupAssignment {
    /// An assignment where no module belongs to any group.
    pub fn empty(graph: &DependencyGraph) -> Self {
        Self {
            elements: vec![None; graph.len()],
            registry: GroupRegistry::new(),
        }
    }

    pub fn get(&self, id: ModuleId) -> Option<&GroupElement> {
        self.elements.get(id.index()).and_then(Option::as_ref)
    }

    /// Every group that received at least one module, sorted by name.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.registry.groups()
    }

    /// Modules that belong to a group, in natural order.
    pub fn assigned(&self) -> impl Iterator<Item = (ModuleId, &GroupElement)> {
        self.elements
            .iter()
            .filter_map(Option::as_ref)
            .map(|element| (element.module(), element))
    }

    pub fn members<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = ModuleId> + 'a {
        self.assigned()
            .filter(move |(_, element)| element.group() == group)
            .map(|(id, _)| id)
    }
}

/// Give each module the group of the first rule that matches it.
///
/// Returns the assignment and one `Info` diagnostic per rule that matched no
/// module at all.
pub fn assign_groups(graph: &DependencyGraph, rules: &[GroupRule]) -> (GroupAssignment, Vec<Diagnostic>) {
    let mut assignment = GroupAssignment::empty(graph);
    let mut used = vec![false; rules.len()];

    for (id, module) in graph.modules() {
        let Some(index) = rules
            .iter()
            .position(|rule| rule.matcher.matches(module, None, &mut Silent))
        else {
            continue;
        };
        used[index] = true;

        let rule = &rules[index];
        if let Some(name) = &rule.group {
            debug!(module = %module, group = %name, "assigned group");
            let group = assignment.registry.get_or_create(name);
            assignment.elements[id.index()] = Some(GroupElement::new(group, rule.location.clone(), id));
        }
    }

    let diagnostics = rules
        .iter()
        .zip(used)
        .filter(|(_, used)| !used)
        .map(|(rule, _)| {
            let label = rule.group.as_deref().unwrap_or("no group");
            let message = Message::new().text(format!(
                "group rule `{}` for {label} never matched a module",
                rule.matcher
            ));
            Diagnostic::new(DiagnosticKind::UnusedConfig, Severity::Info, message).with_location(rule.location.clone())
        })
        .collect();

    (assignment, diagnostics)
}

#[cfg(test)]
mod tests {
    use lattice_graph::GraphBuilder;

    use super::*;

    fn graph() -> DependencyGraph {
        let mut builder = GraphBuilder::new();
        for name in ["Company.Core", "Company.Data", "Company.Web", "Tools"] {
            builder.declare_module(name, name, None, None, ["C#"]);
        }
        builder.build().unwrap().graph
    }

    fn rule(group: &str, pattern: &str, line: usize) -> GroupRule {
        GroupRule::new(group, ModuleMatcher::name(pattern).unwrap(), Location::new("lattice.toml", line))
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let graph = graph();
        let rules = [rule("Core", "Company.Core", 1), rule("Company", "Company.*", 2)];
        let (assignment, diagnostics) = assign_groups(&graph, &rules);

        let core = assignment.get(graph.find("Company.Core")[0]).unwrap();
        assert_eq!(core.group().name(), "Core");
        assert_eq!(core.location().line, 1);
        let data = assignment.get(graph.find("Company.Data")[0]).unwrap();
        assert_eq!(data.group().name(), "Company");
        assert!(assignment.get(graph.find("Tools")[0]).is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_no_group_rule_stops_the_search() {
        let graph = graph();
        let rules = [
            GroupRule::no_group(ModuleMatcher::name("Company.Web").unwrap(), Location::new("lattice.toml", 1)),
            rule("Company", "Company.*", 2),
        ];
        let (assignment, _) = assign_groups(&graph, &rules);
        assert!(assignment.get(graph.find("Company.Web")[0]).is_none());
        assert_eq!(assignment.assigned().count(), 2);
        let names: Vec<_> = assignment.groups().map(Group::name).collect();
        assert_eq!(names, vec!["Company"]);
    }

    #[test]
    fn test_unused_rule_reported_once() {
        let graph = graph();
        let rules = [rule("Company", "Company.*", 1), rule("Legacy", "Legacy.*", 7)];
        let (_, diagnostics) = assign_groups(&graph, &rules);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnusedConfig);
        assert_eq!(diagnostics[0].severity, Severity::Info);
        assert_eq!(diagnostics[0].location, Some(Location::new("lattice.toml", 7)));
    }

    #[test]
    fn test_shadowed_rule_counts_as_unused() {
        let graph = graph();
        let rules = [rule("Company", "Company.*", 1), rule("Core", "Company.Core", 2)];
        let (assignment, diagnostics) = assign_groups(&graph, &rules);
        let company = assignment.groups().next().unwrap().clone();
        assert_eq!(assignment.members(&company).count(), 3);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.as_ref().unwrap().line, 2);
    }
}
