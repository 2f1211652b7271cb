//! The finalized, immutable dependency graph.
//!
//! Modules are stored in natural order and addressed by [`ModuleId`]; edges
//! are stored sorted and indexed in both directions so callers can walk
//! dependencies and dependents equally cheaply.

mod queries;
mod statistics;

pub use statistics::GraphStatistics;

use super::{Dependency, Module, ModuleId};
use crate::{GraphError, Result};

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    modules: Vec<Module>,
    dependencies: Vec<Dependency>,
    /// Per module, indices into `dependencies` of its outgoing edges.
    outgoing: Vec<Vec<usize>>,
    /// Per module, indices into `dependencies` of its incoming edges.
    incoming: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Assemble a graph from modules and edges whose ids index into `modules`.
    ///
    /// Modules are re-sorted into natural order (ids are renumbered to
    /// match) and duplicate edges collapse onto the first one given.
    pub fn new(modules: Vec<Module>, dependencies: Vec<Dependency>) -> Result<Self> {
        for dependency in &dependencies {
            for id in [dependency.source(), dependency.target()] {
                if id.index() >= modules.len() {
                    return Err(GraphError::UnknownModule(id));
                }
            }
        }
        Ok(Self::assemble(modules, dependencies).0)
    }

    /// Sort, renumber and index. Returns the old-id to new-id table.
    pub(crate) fn assemble(modules: Vec<Module>, mut dependencies: Vec<Dependency>) -> (Self, Vec<ModuleId>) {
        let mut order: Vec<usize> = (0..modules.len()).collect();
        order.sort_by(|a, b| modules[*a].cmp(&modules[*b]));

        let mut remap = vec![ModuleId::new(0); modules.len()];
        for (new_index, old_index) in order.iter().enumerate() {
            remap[*old_index] = ModuleId::new(new_index);
        }

        let mut slots: Vec<Option<Module>> = modules.into_iter().map(Some).collect();
        let modules: Vec<Module> = order
            .iter()
            .filter_map(|old_index| slots[*old_index].take())
            .collect();

        for dependency in &mut dependencies {
            dependency.remap(&remap);
        }
        // Stable sort keeps the first declaration of each duplicate edge.
        dependencies.sort();
        dependencies.dedup();

        let mut outgoing = vec![Vec::new(); modules.len()];
        let mut incoming = vec![Vec::new(); modules.len()];
        for (index, dependency) in dependencies.iter().enumerate() {
            outgoing[dependency.source().index()].push(index);
            incoming[dependency.target().index()].push(index);
        }

        let graph = Self {
            modules,
            dependencies,
            outgoing,
            incoming,
        };
        (graph, remap)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.index())
    }

    /// The module behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    /// All modules with their ids, in natural order.
    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &Module)> {
        self.modules
            .iter()
            .enumerate()
            .map(|(index, module)| (ModuleId::new(index), module))
    }

    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> + use<> {
        (0..self.modules.len()).map(ModuleId::new)
    }

    /// All edges, in natural order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Edges leaving `id`, in natural order.
    pub fn outgoing(&self, id: ModuleId) -> impl Iterator<Item = &Dependency> {
        self.outgoing
            .get(id.index())
            .into_iter()
            .flatten()
            .map(|index| &self.dependencies[*index])
    }

    /// Edges arriving at `id`, in natural order.
    pub fn incoming(&self, id: ModuleId) -> impl Iterator<Item = &Dependency> {
        self.incoming
            .get(id.index())
            .into_iter()
            .flatten()
            .map(|index| &self.dependencies[*index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DependencyKind, Location};

    fn edge(source: usize, target: usize, kind: DependencyKind, line: usize) -> Dependency {
        Dependency::new(
            ModuleId::new(source),
            ModuleId::new(target),
            kind,
            Location::new("input.json", line),
        )
    }

    #[test]
    fn test_new_renumbers_in_natural_order() {
        let graph = DependencyGraph::new(
            vec![Module::library("Zed"), Module::library("Alpha")],
            vec![edge(0, 1, DependencyKind::LibraryReference, 1)],
        )
        .unwrap();

        assert_eq!(graph.module(ModuleId::new(0)).name(), "Alpha");
        let dependency = &graph.dependencies()[0];
        assert_eq!(graph.module(dependency.source()).name(), "Zed");
        assert_eq!(graph.module(dependency.target()).name(), "Alpha");
    }

    #[test]
    fn test_duplicate_edges_collapse_onto_first() {
        let graph = DependencyGraph::new(
            vec![Module::library("A"), Module::library("B")],
            vec![
                edge(0, 1, DependencyKind::LibraryReference, 1),
                edge(0, 1, DependencyKind::LibraryReference, 2),
                edge(0, 1, DependencyKind::ProjectReference, 3),
            ],
        )
        .unwrap();

        assert_eq!(graph.dependencies().len(), 2);
        let library = graph
            .dependencies()
            .iter()
            .find(|d| d.kind() == DependencyKind::LibraryReference)
            .unwrap();
        assert_eq!(library.location().line, 1);
    }

    #[test]
    fn test_bidirectional_adjacency() {
        let graph = DependencyGraph::new(
            vec![Module::library("A"), Module::library("B"), Module::library("C")],
            vec![
                edge(0, 1, DependencyKind::LibraryReference, 1),
                edge(2, 1, DependencyKind::LibraryReference, 2),
            ],
        )
        .unwrap();

        let b = ModuleId::new(1);
        assert_eq!(graph.incoming(b).count(), 2);
        assert_eq!(graph.outgoing(b).count(), 0);
        assert_eq!(graph.outgoing(ModuleId::new(0)).count(), 1);
    }

    #[test]
    fn test_unknown_module_is_rejected() {
        let result = DependencyGraph::new(
            vec![Module::library("A")],
            vec![edge(0, 5, DependencyKind::LibraryReference, 1)],
        );
        assert!(matches!(result, Err(GraphError::UnknownModule(_))));
    }
}
