use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Location, ModuleId};

/// How a dependency was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    ProjectReference,
    LibraryReference,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 2] = [Self::ProjectReference, Self::LibraryReference];
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectReference => f.write_str("project reference"),
            Self::LibraryReference => f.write_str("library reference"),
        }
    }
}

/// A directed edge between two modules.
///
/// Identity is `(source, target, kind)`: the declaring location and the
/// referenced path are carried along for diagnostics but do not take part in
/// equality or ordering.
#[derive(Debug, Clone, Serialize)]
pub struct Dependency {
    source: ModuleId,
    target: ModuleId,
    kind: DependencyKind,
    location: Location,
    referenced_path: Option<PathBuf>,
}

impl Dependency {
    pub fn new(source: ModuleId, target: ModuleId, kind: DependencyKind, location: Location) -> Self {
        Self {
            source,
            target,
            kind,
            location,
            referenced_path: None,
        }
    }

    pub fn with_referenced_path(mut self, path: Option<PathBuf>) -> Self {
        self.referenced_path = path;
        self
    }

    pub fn source(&self) -> ModuleId {
        self.source
    }

    pub fn target(&self) -> ModuleId {
        self.target
    }

    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn referenced_path(&self) -> Option<&std::path::Path> {
        self.referenced_path.as_deref()
    }

    pub fn is_self_reference(&self) -> bool {
        self.source == self.target
    }

    pub(crate) fn remap(&mut self, ids: &[ModuleId]) {
        self.source = ids[self.source.index()];
        self.target = ids[self.target.index()];
    }

    fn key(&self) -> (ModuleId, ModuleId, DependencyKind) {
        (self.source, self.target, self.kind)
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Dependency {}

impl std::hash::Hash for Dependency {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Dependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_location() {
        let a = Dependency::new(
            ModuleId::new(0),
            ModuleId::new(1),
            DependencyKind::ProjectReference,
            Location::new("a.csproj", 3),
        );
        let b = Dependency::new(
            ModuleId::new(0),
            ModuleId::new(1),
            DependencyKind::ProjectReference,
            Location::new("a.csproj", 40),
        )
        .with_referenced_path(Some(PathBuf::from("../b/b.csproj")));
        assert_eq!(a, b);
    }

    #[test]
    fn test_ordering() {
        let edge = |s, t, k| Dependency::new(ModuleId::new(s), ModuleId::new(t), k, Location::default());
        let mut edges = vec![
            edge(1, 0, DependencyKind::ProjectReference),
            edge(0, 1, DependencyKind::LibraryReference),
            edge(0, 1, DependencyKind::ProjectReference),
        ];
        edges.sort();
        assert_eq!(edges[0].kind(), DependencyKind::ProjectReference);
        assert_eq!(edges[1].kind(), DependencyKind::LibraryReference);
        assert_eq!(edges[2].source(), ModuleId::new(1));
    }
}
