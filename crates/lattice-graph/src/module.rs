use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Language stamped on modules that never declared one.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Position of a module inside a [`DependencyGraph`](crate::DependencyGraph).
///
/// Ids are assigned in natural module order when the graph is finalized, so
/// comparing two ids compares the modules they point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModuleId(u32);

impl ModuleId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Case-folded key used by every case-insensitive comparison in the crate.
pub(crate) fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Whether normalized `path` lies inside normalized `root`, on a component boundary.
fn is_under(path: &str, root: &str) -> bool {
    match path.strip_prefix(root) {
        Some(rest) => !root.is_empty() && (rest.is_empty() || rest.starts_with('/') || root.ends_with('/')),
        None => false,
    }
}

/// Set of aliases deduplicated case-insensitively.
///
/// The first spelling seen for an alias is the one kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasSet {
    entries: BTreeMap<String, String>,
}

impl AliasSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an alias, returning `false` when an equivalent one exists.
    pub fn insert(&mut self, alias: impl Into<String>) -> bool {
        let alias = alias.into();
        if alias.is_empty() {
            return false;
        }
        let key = fold(&alias);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, alias);
        true
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(&fold(alias))
    }

    pub fn intersects(&self, other: &AliasSet) -> bool {
        self.entries.keys().any(|key| other.entries.contains_key(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn folded_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Serialize for AliasSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<S: Into<String>> FromIterator<S> for AliasSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for alias in iter {
            set.insert(alias);
        }
        set
    }
}

/// Project-only attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    /// Display name, independent of the module's identity key.
    pub name: String,
    /// Stable external identifier.
    pub guid: Option<Uuid>,
    /// Canonical project file.
    pub project_path: Option<PathBuf>,
}

/// What kind of module this is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleKind {
    /// A plain library, known only through references to it.
    Library,
    /// A project that was declared (or synthesized in its place).
    Project(ProjectInfo),
}

/// Tag-only view of [`ModuleKind`], used by matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKindTag {
    Library,
    Project,
}

impl fmt::Display for ModuleKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library => f.write_str("library"),
            Self::Project => f.write_str("project"),
        }
    }
}

/// A resolved unit of code taking part in the dependency graph.
///
/// The identity key is `library_name`. Two modules compare equal when their
/// identity keys match case-insensitively; projects additionally compare their
/// display name and project path.
#[derive(Debug, Clone, Serialize)]
pub struct Module {
    library_name: String,
    names: AliasSet,
    library_names: AliasSet,
    paths: BTreeSet<PathBuf>,
    languages: BTreeSet<String>,
    is_local: bool,
    #[serde(flatten)]
    kind: ModuleKind,
}

impl Module {
    /// Create a plain library module.
    pub fn library(library_name: impl Into<String>) -> Self {
        let library_name = library_name.into();
        let mut module = Self {
            library_name: library_name.clone(),
            names: AliasSet::new(),
            library_names: AliasSet::new(),
            paths: BTreeSet::new(),
            languages: BTreeSet::new(),
            is_local: false,
            kind: ModuleKind::Library,
        };
        module.names.insert(library_name.clone());
        module.library_names.insert(library_name);
        module
    }

    /// Create a project module.
    pub fn project(
        name: impl Into<String>,
        library_name: impl Into<String>,
        guid: Option<Uuid>,
        project_path: Option<PathBuf>,
    ) -> Self {
        let name = name.into();
        let library_name = library_name.into();
        let mut module = Self {
            library_name: library_name.clone(),
            names: AliasSet::new(),
            library_names: AliasSet::new(),
            paths: BTreeSet::new(),
            languages: BTreeSet::new(),
            is_local: false,
            kind: ModuleKind::Project(ProjectInfo {
                name: name.clone(),
                guid,
                project_path: project_path.clone(),
            }),
        };
        module.names.insert(name);
        module.library_names.insert(library_name);
        if let Some(path) = project_path {
            module.paths.insert(path);
        }
        module
    }

    /// Builder-style helper to add languages.
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_languages(languages);
        self
    }

    /// Builder-style helper to add a filesystem path.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(path.into());
        self
    }

    /// The identity key.
    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    /// Display name: the project name for projects, the identity key otherwise.
    pub fn name(&self) -> &str {
        match &self.kind {
            ModuleKind::Project(info) => &info.name,
            ModuleKind::Library => &self.library_name,
        }
    }

    pub fn names(&self) -> &AliasSet {
        &self.names
    }

    pub fn library_names(&self) -> &AliasSet {
        &self.library_names
    }

    pub fn paths(&self) -> &BTreeSet<PathBuf> {
        &self.paths
    }

    pub fn languages(&self) -> &BTreeSet<String> {
        &self.languages
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    pub fn kind(&self) -> &ModuleKind {
        &self.kind
    }

    pub fn kind_tag(&self) -> ModuleKindTag {
        match self.kind {
            ModuleKind::Library => ModuleKindTag::Library,
            ModuleKind::Project(_) => ModuleKindTag::Project,
        }
    }

    pub fn is_project(&self) -> bool {
        matches!(self.kind, ModuleKind::Project(_))
    }

    pub fn project_info(&self) -> Option<&ProjectInfo> {
        match &self.kind {
            ModuleKind::Project(info) => Some(info),
            ModuleKind::Library => None,
        }
    }

    pub fn guid(&self) -> Option<Uuid> {
        self.project_info().and_then(|info| info.guid)
    }

    pub fn project_path(&self) -> Option<&Path> {
        self.project_info().and_then(|info| info.project_path.as_deref())
    }

    /// Whether `self` and `other` describe the same real-world entity.
    ///
    /// True when the identity keys match, or when at least one side is not a
    /// project and their library-name aliases intersect.
    pub fn is_same_entity(&self, other: &Module) -> bool {
        if fold(&self.library_name) == fold(&other.library_name) {
            return true;
        }
        (!self.is_project() || !other.is_project())
            && self.library_names.intersects(&other.library_names)
    }

    pub(crate) fn add_name(&mut self, name: impl Into<String>) {
        self.names.insert(name);
    }

    pub(crate) fn add_library_name(&mut self, library_name: impl Into<String>) {
        self.library_names.insert(library_name);
    }

    pub(crate) fn add_path(&mut self, path: impl Into<PathBuf>) {
        self.paths.insert(path.into());
    }

    pub(crate) fn add_languages<I, S>(&mut self, languages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for language in languages {
            let language = language.into();
            if !language.is_empty() {
                self.languages.insert(language);
            }
        }
    }

    pub(crate) fn stamp_unknown_language(&mut self) {
        if self.languages.is_empty() {
            self.languages.insert(UNKNOWN_LANGUAGE.to_string());
        }
    }

    /// Recompute `is_local`: any input root prefixing any of the module's paths.
    pub(crate) fn update_locality(&mut self, input_roots: &[PathBuf]) {
        self.is_local = self.paths.iter().any(|path| {
            let path = crate::matcher::normalize_path(path);
            input_roots
                .iter()
                .map(|root| crate::matcher::normalize_path(root))
                .any(|root| is_under(&path, &root))
        });
    }

    fn sort_key(&self) -> (String, ModuleKindTag, String, Option<&Path>) {
        match &self.kind {
            ModuleKind::Library => (fold(&self.library_name), ModuleKindTag::Library, String::new(), None),
            ModuleKind::Project(info) => (
                fold(&self.library_name),
                ModuleKindTag::Project,
                fold(&info.name),
                info.project_path.as_deref(),
            ),
        }
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for Module {}

impl PartialOrd for Module {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Module {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_set_dedupes_case_insensitively() {
        let mut set = AliasSet::new();
        assert!(set.insert("Company.Core"));
        assert!(!set.insert("company.core"));
        assert!(!set.insert(""));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Company.Core"]);
        assert!(set.contains("COMPANY.CORE"));
    }

    #[test]
    fn test_project_seeds_aliases() {
        let module = Module::project(
            "Core",
            "Company.Core",
            None,
            Some(PathBuf::from("/src/Core/Core.csproj")),
        );
        assert_eq!(module.name(), "Core");
        assert_eq!(module.library_name(), "Company.Core");
        assert!(module.names().contains("core"));
        assert!(module.library_names().contains("company.core"));
        assert_eq!(module.paths().len(), 1);
        assert!(module.is_project());
        assert_eq!(module.project_info().map(|info| info.name.as_str()), Some("Core"));
        assert_eq!(module.project_path(), Some(Path::new("/src/Core/Core.csproj")));
        assert_eq!(module.guid(), None);
        assert!(Module::library("Lib").project_info().is_none());
    }

    #[test]
    fn test_same_entity_by_identity_key() {
        let a = Module::project("A", "Shared", None, Some(PathBuf::from("/a.csproj")));
        let b = Module::project("B", "shared", None, Some(PathBuf::from("/b.csproj")));
        assert!(a.is_same_entity(&b));
    }

    #[test]
    fn test_same_entity_alias_overlap_needs_a_library() {
        let mut a = Module::project("A", "A", None, None);
        a.add_library_name("Legacy");
        let mut b = Module::project("B", "B", None, None);
        b.add_library_name("legacy");
        assert!(!a.is_same_entity(&b), "two projects only collide on identity key");

        let lib = Module::library("LEGACY");
        assert!(a.is_same_entity(&lib));
        assert!(lib.is_same_entity(&b));
    }

    #[test]
    fn test_natural_ordering() {
        let mut modules = [
            Module::project("Zeta", "b", None, None),
            Module::library("A"),
            Module::project("Alpha", "b", None, None),
            Module::library("b"),
        ];
        modules.sort();
        let names: Vec<_> = modules.iter().map(Module::name).collect();
        assert_eq!(names, vec!["A", "b", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_project_equality_uses_name_and_path() {
        let a = Module::project("App", "App", None, Some(PathBuf::from("/x/App.csproj")));
        let b = Module::project("App", "app", Some(Uuid::nil()), Some(PathBuf::from("/x/App.csproj")));
        let c = Module::project("App", "App", None, Some(PathBuf::from("/y/App.csproj")));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_locality() {
        let mut module = Module::library("Lib").with_path("/Work/Src/lib/Lib.dll");
        module.update_locality(&[PathBuf::from("/work/src")]);
        assert!(module.is_local());
        module.update_locality(&[PathBuf::from("/other")]);
        assert!(!module.is_local());
    }

    #[test]
    fn test_locality_respects_component_boundaries() {
        let mut module = Module::library("Lib").with_path("/srcold/lib/Lib.dll");
        module.update_locality(&[PathBuf::from("/src")]);
        assert!(!module.is_local());
        module.update_locality(&[PathBuf::from("/src/")]);
        assert!(!module.is_local());
        module.update_locality(&[PathBuf::from("/srcold")]);
        assert!(module.is_local());
        module.update_locality(&[PathBuf::from("/")]);
        assert!(module.is_local());
    }

    #[test]
    fn test_unknown_language_stamp() {
        let mut module = Module::library("Lib");
        module.stamp_unknown_language();
        assert!(module.languages().contains(UNKNOWN_LANGUAGE));

        let mut module = Module::library("Lib").with_languages(["C#"]);
        module.stamp_unknown_language();
        assert_eq!(module.languages().len(), 1);
    }
}
