use serde::Serialize;

use super::DependencyGraph;
use crate::DependencyKind;

/// Aggregate counts over a finalized graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStatistics {
    pub module_count: usize,
    pub project_count: usize,
    pub library_count: usize,
    pub local_count: usize,
    pub dependency_count: usize,
    pub project_reference_count: usize,
    pub library_reference_count: usize,
}

impl DependencyGraph {
    /// Compute statistics snapshot for reports.
    pub fn statistics(&self) -> GraphStatistics {
        let project_count = self.modules().filter(|(_, m)| m.is_project()).count();
        let project_reference_count = self
            .dependencies()
            .iter()
            .filter(|d| d.kind() == DependencyKind::ProjectReference)
            .count();

        GraphStatistics {
            module_count: self.len(),
            project_count,
            library_count: self.len() - project_count,
            local_count: self.modules().filter(|(_, m)| m.is_local()).count(),
            dependency_count: self.dependencies().len(),
            project_reference_count,
            library_reference_count: self.dependencies().len() - project_reference_count,
        }
    }
}
