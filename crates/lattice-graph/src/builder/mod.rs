//! Accumulates declared modules and references and resolves them into a
//! finalized [`DependencyGraph`].
//!
//! The builder owns every mutable table; [`GraphBuilder::build`] consumes it
//! and returns an immutable graph together with the diagnostics produced
//! while resolving.
//!
//! ```
//! use lattice_graph::{DependencyKind, GraphBuilder, Location, ReferenceSpec};
//!
//! let mut builder = GraphBuilder::new();
//! let app = builder.declare_module("App", "Company.App", None, None, ["C#"]);
//! builder.declare_module("Core", "Company.Core", None, None, ["C#"]);
//! builder.declare_reference(
//!     app,
//!     ReferenceSpec::new(DependencyKind::ProjectReference, Location::new("App.csproj", 12))
//!         .with_name("Core"),
//! );
//!
//! let output = builder.build()?;
//! assert_eq!(output.graph.dependencies().len(), 1);
//! # Ok::<(), lattice_graph::GraphError>(())
//! ```

mod index;
mod resolve;

use std::path::PathBuf;

use rustc_hash::FxHashMap as HashMap;
use uuid::Uuid;

use crate::matcher::normalize_path;
use crate::module::fold;
use crate::{DependencyGraph, DependencyKind, Diagnostic, Location, Module, ModuleMatcher, Result};

/// Handle to a declared module, valid only for the builder that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleHandle(usize);

/// A module that should be left out of the graph entirely.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pub matcher: ModuleMatcher,
    pub location: Location,
}

impl IgnoreRule {
    pub fn new(matcher: ModuleMatcher, location: Location) -> Self {
        Self { matcher, location }
    }
}

/// Everything known about the target of a raw reference.
#[derive(Debug, Clone)]
pub struct ReferenceSpec {
    pub kind: DependencyKind,
    pub name: Option<String>,
    pub library_name: Option<String>,
    pub guid: Option<Uuid>,
    pub path: Option<PathBuf>,
    pub languages: Vec<String>,
    pub location: Location,
}

impl ReferenceSpec {
    pub fn new(kind: DependencyKind, location: Location) -> Self {
        Self {
            kind,
            name: None,
            library_name: None,
            guid: None,
            path: None,
            languages: Vec::new(),
            location,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_library_name(mut self, library_name: impl Into<String>) -> Self {
        self.library_name = Some(library_name.into());
        self
    }

    pub fn with_guid(mut self, guid: Uuid) -> Self {
        self.guid = Some(guid);
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages.extend(languages.into_iter().map(Into::into));
        self
    }
}

/// Result of [`GraphBuilder::build`].
#[derive(Debug)]
pub struct BuildOutput {
    pub graph: DependencyGraph,
    /// Resolution diagnostics, sorted.
    pub diagnostics: Vec<Diagnostic>,
}

/// Structural key of a declaration: display name, identity key, external id
/// and path.
type DeclarationKey = (String, String, Option<Uuid>, Option<String>);

#[derive(Debug, Default)]
pub struct GraphBuilder {
    input_roots: Vec<PathBuf>,
    ignores: Vec<IgnoreRule>,
    declared: Vec<Module>,
    declared_keys: HashMap<DeclarationKey, usize>,
    references: Vec<(ModuleHandle, ReferenceSpec)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots used to decide whether a module is local.
    pub fn with_input_roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.input_roots.extend(roots);
        self
    }

    pub fn with_ignores(mut self, ignores: impl IntoIterator<Item = IgnoreRule>) -> Self {
        self.ignores.extend(ignores);
        self
    }

    /// Declare a project module.
    ///
    /// Declaring the same `(name, library_name, guid, path)` again returns the
    /// original handle and merges the new languages into it.
    pub fn declare_module<I, S>(
        &mut self,
        name: &str,
        library_name: &str,
        guid: Option<Uuid>,
        path: Option<PathBuf>,
        languages: I,
    ) -> ModuleHandle
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = (
            fold(name),
            fold(library_name),
            guid,
            path.as_deref().map(normalize_path),
        );
        if let Some(&slot) = self.declared_keys.get(&key) {
            self.declared[slot].add_languages(languages);
            return ModuleHandle(slot);
        }

        let slot = self.declared.len();
        self.declared
            .push(Module::project(name, library_name, guid, path).with_languages(languages));
        self.declared_keys.insert(key, slot);
        ModuleHandle(slot)
    }

    /// Record a reference from a declared module. Resolution is deferred to
    /// [`build`](Self::build).
    pub fn declare_reference(&mut self, source: ModuleHandle, reference: ReferenceSpec) {
        self.references.push((source, reference));
    }

    pub fn declared_count(&self) -> usize {
        self.declared.len()
    }

    /// Resolve every reference and finalize the graph.
    ///
    /// Fails only when two declarations describe the same entity.
    pub fn build(self) -> Result<BuildOutput> {
        resolve::Resolver::new(&self.input_roots, &self.ignores).run(self.declared, self.references)
    }
}
