//! Query methods for DependencyGraph.

use std::collections::{BTreeSet, VecDeque};

use rustc_hash::FxHashMap as HashMap;

use super::DependencyGraph;
use crate::ModuleId;

impl DependencyGraph {
    /// Modules whose display name, library name or any alias equals `name`
    /// case-insensitively.
    pub fn find(&self, name: &str) -> Vec<ModuleId> {
        self.modules()
            .filter(|(_, module)| {
                module.name().eq_ignore_ascii_case(name)
                    || module.names().contains(name)
                    || module.library_names().contains(name)
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Distinct direct dependencies of `id`.
    pub fn dependencies_of(&self, id: ModuleId) -> Vec<ModuleId> {
        let targets: BTreeSet<ModuleId> = self.outgoing(id).map(|d| d.target()).collect();
        targets.into_iter().collect()
    }

    /// Distinct direct dependents of `id`.
    pub fn dependents_of(&self, id: ModuleId) -> Vec<ModuleId> {
        let sources: BTreeSet<ModuleId> = self.incoming(id).map(|d| d.source()).collect();
        sources.into_iter().collect()
    }

    /// Every module reachable from `id` through one or more edges.
    pub fn reachable_from(&self, id: ModuleId) -> BTreeSet<ModuleId> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<ModuleId> = self.dependencies_of(id).into();
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            queue.extend(self.dependencies_of(current));
        }
        seen
    }

    /// Shortest dependency path from `from` to `to`, both ends included.
    ///
    /// Breadth-first over outgoing edges in natural order, so ties resolve to
    /// the lexicographically smallest path. `from == to` yields a single-module
    /// path.
    pub fn shortest_path(&self, from: ModuleId, to: ModuleId) -> Option<Vec<ModuleId>> {
        if from == to {
            return Some(vec![from]);
        }

        let mut parents: HashMap<ModuleId, ModuleId> = HashMap::default();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            for next in self.dependencies_of(current) {
                if next == from || parents.contains_key(&next) {
                    continue;
                }
                parents.insert(next, current);
                if next == to {
                    let mut path = vec![to];
                    let mut cursor = to;
                    while let Some(parent) = parents.get(&cursor) {
                        path.push(*parent);
                        cursor = *parent;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::{Dependency, DependencyGraph, DependencyKind, Location, Module, ModuleId};

    /// a -> b -> d, a -> c -> d, d -> e, f isolated
    fn diamond() -> DependencyGraph {
        let names = ["a", "b", "c", "d", "e", "f"];
        let modules = names.iter().map(|name| Module::library(*name)).collect();
        let edges = [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)]
            .into_iter()
            .map(|(s, t)| {
                Dependency::new(
                    ModuleId::new(s),
                    ModuleId::new(t),
                    DependencyKind::LibraryReference,
                    Location::default(),
                )
            })
            .collect();
        DependencyGraph::new(modules, edges).unwrap()
    }

    fn id(graph: &DependencyGraph, name: &str) -> ModuleId {
        graph.find(name)[0]
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let graph = diamond();
        assert_eq!(graph.find("A"), vec![id(&graph, "a")]);
        assert!(graph.find("zzz").is_empty());
    }

    #[test]
    fn test_direct_neighbours() {
        let graph = diamond();
        let d = id(&graph, "d");
        assert_eq!(graph.dependents_of(d), vec![id(&graph, "b"), id(&graph, "c")]);
        assert_eq!(graph.dependencies_of(d), vec![id(&graph, "e")]);
    }

    #[test]
    fn test_reachability() {
        let graph = diamond();
        let reachable = graph.reachable_from(id(&graph, "a"));
        assert_eq!(reachable.len(), 4);
        assert!(!reachable.contains(&id(&graph, "f")));
        assert!(graph.reachable_from(id(&graph, "e")).is_empty());
    }

    #[test]
    fn test_shortest_path_prefers_natural_order() {
        let graph = diamond();
        let path = graph.shortest_path(id(&graph, "a"), id(&graph, "e")).unwrap();
        let names: Vec<_> = path.iter().map(|id| graph.module(*id).name()).collect();
        assert_eq!(names, vec!["a", "b", "d", "e"]);
        assert!(graph.shortest_path(id(&graph, "e"), id(&graph, "a")).is_none());
        assert_eq!(graph.shortest_path(id(&graph, "f"), id(&graph, "f")).unwrap().len(), 1);
    }
}
