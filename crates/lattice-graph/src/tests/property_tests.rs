//! Property-based tests for the graph builder.
//!
//! Run with: cargo test --features proptest --package lattice-graph property_tests

#![cfg(feature = "proptest")]

use crate::{DependencyKind, GraphBuilder, Location, ReferenceSpec};
use proptest::prelude::*;

/// Distinct project names plus references given as (source, target, kind, by_name).
type Input = (Vec<String>, Vec<(usize, usize, bool, bool)>);

fn input_strategy() -> impl Strategy<Value = Input> {
    prop::collection::btree_set("[a-z]{1,8}", 1..=12).prop_flat_map(|names| {
        let names: Vec<String> = names.into_iter().collect();
        let count = names.len();
        let references = prop::collection::vec(
            (0..count, 0..count + 3, prop::bool::ANY, prop::bool::ANY),
            0..=30,
        );
        (Just(names), references)
    })
}

fn builder_for((names, references): &Input, repeat_declarations: bool) -> GraphBuilder {
    let mut builder = GraphBuilder::new();
    let mut handles = Vec::new();
    for name in names {
        handles.push(builder.declare_module(name, &format!("lib.{name}"), None, None, ["C#"]));
        if repeat_declarations {
            builder.declare_module(name, &format!("LIB.{name}"), None, None, ["F#"]);
        }
    }
    for (line, (source, target, is_project, by_name)) in references.iter().enumerate() {
        let kind = if *is_project {
            DependencyKind::ProjectReference
        } else {
            DependencyKind::LibraryReference
        };
        // Targets past the declared range name modules that do not exist.
        let target = names
            .get(*target)
            .cloned()
            .unwrap_or_else(|| format!("external{target}"));
        let reference = ReferenceSpec::new(kind, Location::new("input.json", line + 1));
        let reference = if *by_name {
            reference.with_name(target)
        } else {
            reference.with_library_name(format!("lib.{target}"))
        };
        builder.declare_reference(handles[*source], reference);
    }
    builder
}

fn snapshot(input: &Input, repeat: bool) -> (Vec<String>, Vec<String>, Vec<String>) {
    let output = builder_for(input, repeat).build().unwrap();
    let modules = output
        .graph
        .modules()
        .map(|(_, m)| format!("{}:{}", m.kind_tag(), m.library_name()))
        .collect();
    let edges = output
        .graph
        .dependencies()
        .iter()
        .map(|d| format!("{}->{}:{}", d.source(), d.target(), d.kind()))
        .collect();
    let diagnostics = output
        .diagnostics
        .iter()
        .map(|d| format!("{}:{}", d.kind, d.render(&output.graph)))
        .collect();
    (modules, edges, diagnostics)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: identical input always yields identical output.
    #[test]
    fn prop_build_is_deterministic(input in input_strategy()) {
        prop_assert_eq!(snapshot(&input, false), snapshot(&input, false));
    }

    /// Property: re-declaring a module with the same structural key adds nothing.
    #[test]
    fn prop_repeated_declarations_are_idempotent(input in input_strategy()) {
        let (modules, edges, _) = snapshot(&input, false);
        let (repeated_modules, repeated_edges, _) = snapshot(&input, true);
        prop_assert_eq!(modules, repeated_modules);
        prop_assert_eq!(edges, repeated_edges);
    }

    /// Property: every edge endpoint is a module of the graph and adjacency
    /// is symmetric.
    #[test]
    fn prop_edges_are_indexed_both_ways(input in input_strategy()) {
        let output = builder_for(&input, false).build().unwrap();
        let graph = &output.graph;
        for dependency in graph.dependencies() {
            prop_assert!(graph.get(dependency.source()).is_some());
            prop_assert!(graph.get(dependency.target()).is_some());
            prop_assert!(graph.outgoing(dependency.source()).any(|d| d == dependency));
            prop_assert!(graph.incoming(dependency.target()).any(|d| d == dependency));
        }
    }
}
