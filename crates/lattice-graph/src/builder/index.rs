//! Alias lookup tables used while resolving references.

use std::collections::BTreeSet;
use std::path::Path;

use rustc_hash::FxHashMap as HashMap;
use uuid::Uuid;

use crate::matcher::normalize_path;
use crate::module::{Module, fold};

/// What a reference is looked up by.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Key<'a> {
    Path(&'a Path),
    Name(&'a str),
    LibraryName(&'a str),
    NameAndLibrary(&'a str, &'a str),
    LibraryAndGuid(&'a str, Uuid),
}

/// Outcome of a lookup across the active and ignored indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lookup {
    NotFound,
    /// Only ignored modules answered; resolution must stop here.
    Ignored,
    /// Arena slots of every active candidate, ascending.
    Found(Vec<usize>),
}

/// Maps every alias, library-name alias and path of a module set to the
/// slots holding them. Keys are case-folded.
#[derive(Debug, Default)]
pub(crate) struct ModuleIndex {
    by_name: HashMap<String, BTreeSet<usize>>,
    by_library_name: HashMap<String, BTreeSet<usize>>,
    by_path: HashMap<String, BTreeSet<usize>>,
}

impl ModuleIndex {
    /// Register (or re-register after a merge) `module` under `slot`.
    pub(crate) fn insert(&mut self, slot: usize, module: &Module) {
        for name in module.names().folded_keys() {
            self.by_name.entry(name.to_string()).or_default().insert(slot);
        }
        for name in module.library_names().folded_keys() {
            self.by_library_name.entry(name.to_string()).or_default().insert(slot);
        }
        for path in module.paths() {
            self.by_path.entry(normalize_path(path)).or_default().insert(slot);
        }
    }

    /// Slots matching `key`. `modules` is the arena the slots point into.
    pub(crate) fn candidates(&self, key: Key<'_>, modules: &[Module]) -> BTreeSet<usize> {
        match key {
            Key::Path(path) => lookup(&self.by_path, &normalize_path(path)),
            Key::Name(name) => lookup(&self.by_name, &fold(name)),
            Key::LibraryName(name) => lookup(&self.by_library_name, &fold(name)),
            Key::NameAndLibrary(name, library_name) => {
                let by_library = lookup(&self.by_library_name, &fold(library_name));
                lookup(&self.by_name, &fold(name))
                    .intersection(&by_library)
                    .copied()
                    .collect()
            }
            Key::LibraryAndGuid(library_name, guid) => lookup(&self.by_library_name, &fold(library_name))
                .into_iter()
                .filter(|slot| modules[*slot].guid() == Some(guid))
                .collect(),
        }
    }
}

fn lookup(map: &HashMap<String, BTreeSet<usize>>, key: &str) -> BTreeSet<usize> {
    map.get(key).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn arena() -> Vec<Module> {
        vec![
            Module::project(
                "Core",
                "Company.Core",
                Some(Uuid::nil()),
                Some(PathBuf::from("/src/Core/Core.csproj")),
            ),
            Module::project("Data", "Company.Data", None, None),
        ]
    }

    fn indexed(modules: &[Module]) -> ModuleIndex {
        let mut index = ModuleIndex::default();
        for (slot, module) in modules.iter().enumerate() {
            index.insert(slot, module);
        }
        index
    }

    #[test]
    fn test_lookups_are_case_insensitive() {
        let modules = arena();
        let index = indexed(&modules);
        assert_eq!(index.candidates(Key::Name("CORE"), &modules), BTreeSet::from([0]));
        assert_eq!(index.candidates(Key::LibraryName("company.data"), &modules), BTreeSet::from([1]));
        assert_eq!(
            index.candidates(Key::Path(Path::new("/SRC/core/./Core.csproj")), &modules),
            BTreeSet::from([0])
        );
    }

    #[test]
    fn test_compound_keys() {
        let modules = arena();
        let index = indexed(&modules);
        assert_eq!(
            index.candidates(Key::NameAndLibrary("Core", "Company.Core"), &modules),
            BTreeSet::from([0])
        );
        assert!(index.candidates(Key::NameAndLibrary("Core", "Company.Data"), &modules).is_empty());
        assert_eq!(
            index.candidates(Key::LibraryAndGuid("Company.Core", Uuid::nil()), &modules),
            BTreeSet::from([0])
        );
        assert!(index.candidates(Key::LibraryAndGuid("Company.Data", Uuid::nil()), &modules).is_empty());
    }
}
