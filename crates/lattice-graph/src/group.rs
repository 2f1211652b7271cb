use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::{Location, ModuleId};

/// A named bucket of modules.
///
/// Groups are compared by name only, so two `Group`s built from the same name
/// are interchangeable. [`GroupRegistry`] hands out shared instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Group(Arc<str>);

impl Group {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Group {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Interns groups by name so every assignment to the same name shares one
/// allocation.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: std::collections::BTreeMap<String, Group>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, name: &str) -> Group {
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| Group::new(name))
            .clone()
    }

    /// All groups, sorted by name.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }
}

/// Binds a module to the group a policy rule assigned it to.
///
/// Matchers see a group element as a stand-in for its module: it answers name
/// matches with the group name and inherits the module's languages and
/// locality (see [`MatchTarget`](crate::MatchTarget)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupElement {
    group: Group,
    location: Location,
    module: ModuleId,
}

impl GroupElement {
    pub fn new(group: Group, location: Location, module: ModuleId) -> Self {
        Self {
            group,
            location,
            module,
        }
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Location of the group rule that produced this element.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The module this element represents.
    pub fn module(&self) -> ModuleId {
        self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_dedupes_by_name() {
        let mut registry = GroupRegistry::new();
        let a = registry.get_or_create("Core");
        let b = registry.get_or_create("Core");
        registry.get_or_create("Api");
        assert!(Arc::ptr_eq(&a.0, &b.0));
        let names: Vec<_> = registry.groups().map(Group::name).collect();
        assert_eq!(names, vec!["Api", "Core"]);
    }
}
