//! Reference resolution.
//!
//! Declared modules are admitted first, then project references are resolved
//! before library references so that a project declared later in the input
//! still wins over a placeholder library. Each reference walks an ordered list
//! of lookup keys; the first key that answers decides the targets.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::index::{Key, Lookup, ModuleIndex};
use super::{BuildOutput, IgnoreRule, ModuleHandle, ReferenceSpec};
use crate::diagnostic::sort_diagnostics;
use crate::matcher::normalize_path;
use crate::module::fold;
use crate::{
    Dependency, DependencyGraph, DependencyKind, Detail, Diagnostic, DiagnosticKind, GraphError,
    Message, Module, ModuleId, Result, Severity, Silent,
};

/// Which active indices a lookup consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Projects,
    ProjectsAndLibraries,
}

pub(super) struct Resolver<'a> {
    input_roots: &'a [PathBuf],
    ignores: &'a [IgnoreRule],
    ignore_used: Vec<bool>,
    /// Active modules; slots become [`ModuleId`]s before finalization.
    modules: Vec<Module>,
    projects: ModuleIndex,
    libraries: ModuleIndex,
    ignored_modules: Vec<Module>,
    ignored: ModuleIndex,
    dependencies: Vec<Dependency>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Resolver<'a> {
    pub(super) fn new(input_roots: &'a [PathBuf], ignores: &'a [IgnoreRule]) -> Self {
        Self {
            input_roots,
            ignores,
            ignore_used: vec![false; ignores.len()],
            modules: Vec::new(),
            projects: ModuleIndex::default(),
            libraries: ModuleIndex::default(),
            ignored_modules: Vec::new(),
            ignored: ModuleIndex::default(),
            dependencies: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(super) fn run(
        mut self,
        declared: Vec<Module>,
        references: Vec<(ModuleHandle, ReferenceSpec)>,
    ) -> Result<BuildOutput> {
        let mut slots = Vec::with_capacity(declared.len());
        for module in declared {
            slots.push(self.admit(module)?);
        }

        let (project_refs, library_refs): (Vec<_>, Vec<_>) = references
            .into_iter()
            .partition(|(_, reference)| reference.kind == DependencyKind::ProjectReference);

        for (handle, reference) in project_refs.iter().chain(&library_refs) {
            let Some(source) = slots.get(handle.0).copied().flatten() else {
                debug!(location = %reference.location, "skipping reference from ignored module");
                continue;
            };
            match reference.kind {
                DependencyKind::ProjectReference => self.resolve_project(source, reference)?,
                DependencyKind::LibraryReference => self.resolve_library(source, reference)?,
            }
        }

        Ok(self.finish())
    }

    /// Place a declared module, returning its slot unless it is ignored.
    fn admit(&mut self, mut module: Module) -> Result<Option<usize>> {
        if self.is_ignored(&mut module) {
            debug!(module = %module, "ignoring declared module");
            self.park_ignored(module);
            return Ok(None);
        }
        self.insert(module).map(Some)
    }

    /// Evaluate every ignore rule, recording each one that matches.
    ///
    /// Locality is computed first so `local` matchers see the final value.
    fn is_ignored(&mut self, module: &mut Module) -> bool {
        module.update_locality(self.input_roots);
        let mut ignored = false;
        for (rule, used) in self.ignores.iter().zip(self.ignore_used.iter_mut()) {
            if rule.matcher.matches(module, None, &mut Silent) {
                *used = true;
                ignored = true;
            }
        }
        ignored
    }

    fn park_ignored(&mut self, module: Module) {
        let slot = self.ignored_modules.len();
        self.ignored.insert(slot, &module);
        self.ignored_modules.push(module);
    }

    /// Add an active module, failing if it is the same entity as one already
    /// placed.
    fn insert(&mut self, module: Module) -> Result<usize> {
        for alias in module.library_names().iter() {
            let key = Key::LibraryName(alias);
            let mut candidates = self.projects.candidates(key, &self.modules);
            candidates.extend(self.libraries.candidates(key, &self.modules));
            if let Some(existing) = candidates
                .into_iter()
                .find(|slot| self.modules[*slot].is_same_entity(&module))
            {
                return Err(conflict(&self.modules[existing], &module));
            }
        }

        let slot = self.modules.len();
        let index = if module.is_project() {
            &mut self.projects
        } else {
            &mut self.libraries
        };
        index.insert(slot, &module);
        self.modules.push(module);
        Ok(slot)
    }

    fn lookup(&self, scope: Scope, key: Key<'_>) -> Lookup {
        let mut found = self.projects.candidates(key, &self.modules);
        if scope == Scope::ProjectsAndLibraries {
            found.extend(self.libraries.candidates(key, &self.modules));
        }
        if !found.is_empty() {
            return Lookup::Found(found.into_iter().collect());
        }
        if !self.ignored.candidates(key, &self.ignored_modules).is_empty() {
            return Lookup::Ignored;
        }
        Lookup::NotFound
    }

    /// Path, then identity key with external id, then name, then identity
    /// key alone, then a placeholder project.
    fn resolve_project(&mut self, source: usize, reference: &ReferenceSpec) -> Result<()> {
        let mut keys = Vec::new();
        if let Some(path) = &reference.path {
            keys.push(Key::Path(path));
        }
        if let (Some(library_name), Some(guid)) = (&reference.library_name, reference.guid) {
            keys.push(Key::LibraryAndGuid(library_name, guid));
        }
        if let Some(name) = &reference.name {
            keys.push(Key::Name(name));
        }
        if let Some(library_name) = &reference.library_name {
            keys.push(Key::LibraryName(library_name));
        }

        for key in keys {
            match self.lookup(Scope::Projects, key) {
                Lookup::NotFound => continue,
                Lookup::Ignored => {
                    debug!(?key, location = %reference.location, "project reference hit an ignored module");
                    return Ok(());
                }
                Lookup::Found(targets) => {
                    debug!(?key, targets = targets.len(), "resolved project reference");
                    let edges = self.connect(source, &targets, reference);
                    if let Some(path) = reference.path.as_deref().filter(|_| !matches!(key, Key::Path(_))) {
                        self.report_similar(source, path, &targets, &edges);
                    }
                    return Ok(());
                }
            }
        }

        self.create_placeholder(source, reference)
    }

    /// Path, then name with identity key, then identity key, then name, then
    /// a new library.
    fn resolve_library(&mut self, source: usize, reference: &ReferenceSpec) -> Result<()> {
        let mut keys = Vec::new();
        if let Some(path) = &reference.path {
            keys.push(Key::Path(path));
        }
        if let (Some(name), Some(library_name)) = (&reference.name, &reference.library_name) {
            keys.push(Key::NameAndLibrary(name, library_name));
        }
        if let Some(library_name) = &reference.library_name {
            keys.push(Key::LibraryName(library_name));
        }
        if let Some(name) = &reference.name {
            keys.push(Key::Name(name));
        }

        for key in keys {
            match self.lookup(Scope::ProjectsAndLibraries, key) {
                Lookup::NotFound => continue,
                Lookup::Ignored => {
                    debug!(?key, location = %reference.location, "library reference hit an ignored module");
                    return Ok(());
                }
                Lookup::Found(targets) => {
                    debug!(?key, targets = targets.len(), "resolved library reference");
                    self.connect(source, &targets, reference);
                    return Ok(());
                }
            }
        }

        let Some(library_name) = reference
            .library_name
            .clone()
            .or_else(|| reference.name.clone())
            .or_else(|| file_stem(reference.path.as_deref()))
        else {
            warn!(location = %reference.location, "dropping library reference without name or path");
            return Ok(());
        };

        let mut module = Module::library(library_name).with_languages(reference.languages.iter().cloned());
        if let Some(name) = &reference.name {
            module.add_name(name.clone());
        }
        if let Some(path) = &reference.path {
            module.add_path(path.clone());
        }
        if self.is_ignored(&mut module) {
            debug!(module = %module, "ignoring new library");
            self.park_ignored(module);
            return Ok(());
        }

        let slot = self.insert(module)?;
        self.connect(source, &[slot], reference);
        Ok(())
    }

    fn create_placeholder(&mut self, source: usize, reference: &ReferenceSpec) -> Result<()> {
        let name = reference
            .name
            .clone()
            .or_else(|| reference.library_name.clone())
            .or_else(|| file_stem(reference.path.as_deref()));
        let Some(name) = name else {
            warn!(location = %reference.location, "dropping project reference without name or path");
            return Ok(());
        };
        let library_name = reference.library_name.clone().unwrap_or_else(|| name.clone());
        let guid = reference
            .guid
            .unwrap_or_else(|| placeholder_guid(&name, &library_name, reference.path.as_deref()));

        let mut module = Module::project(name, library_name, Some(guid), reference.path.clone())
            .with_languages(reference.languages.iter().cloned());
        if self.is_ignored(&mut module) {
            debug!(module = %module, "ignoring placeholder project");
            self.park_ignored(module);
            return Ok(());
        }

        let slot = self.insert(module)?;
        let edges = self.connect(source, &[slot], reference);
        let target = ModuleId::new(slot);
        let message = Message::new()
            .text("project ")
            .module(target, Detail::Full)
            .text(" referenced by ")
            .module(ModuleId::new(source), Detail::Name)
            .text(" was not found, guessing its identity");
        self.diagnostics.push(
            Diagnostic::new(DiagnosticKind::ProjectNotFound, Severity::Info, message)
                .with_modules([ModuleId::new(source), target])
                .with_dependencies(&edges),
        );
        Ok(())
    }

    /// Merge the reference into every target and add one edge per target.
    fn connect(&mut self, source: usize, targets: &[usize], reference: &ReferenceSpec) -> Vec<Dependency> {
        let mut edges = Vec::with_capacity(targets.len());
        for &target in targets {
            self.merge(target, reference);
            let edge = Dependency::new(
                ModuleId::new(source),
                ModuleId::new(target),
                reference.kind,
                reference.location.clone(),
            )
            .with_referenced_path(reference.path.clone());
            self.dependencies.push(edge.clone());
            edges.push(edge);
        }

        if targets.len() > 1 {
            let ids: Vec<ModuleId> = targets.iter().map(|slot| ModuleId::new(*slot)).collect();
            let message = Message::new()
                .text(format!("{} from ", reference.kind))
                .module(ModuleId::new(source), Detail::Name)
                .text(" matches multiple modules: ")
                .modules(&ids, Detail::Full);
            self.diagnostics.push(
                Diagnostic::new(DiagnosticKind::AmbiguousReference, Severity::Warning, message)
                    .with_modules(ids.iter().copied().chain([ModuleId::new(source)]))
                    .with_dependencies(&edges),
            );
        }
        edges
    }

    fn merge(&mut self, target: usize, reference: &ReferenceSpec) {
        let module = &mut self.modules[target];
        if let Some(name) = &reference.name {
            module.add_name(name.clone());
        }
        if let Some(library_name) = &reference.library_name {
            module.add_library_name(library_name.clone());
        }
        if let Some(path) = &reference.path {
            module.add_path(path.clone());
        }
        module.add_languages(reference.languages.iter().cloned());

        let index = if module.is_project() {
            &mut self.projects
        } else {
            &mut self.libraries
        };
        index.insert(target, module);
    }

    fn report_similar(&mut self, source: usize, path: &Path, targets: &[usize], edges: &[Dependency]) {
        let ids: Vec<ModuleId> = targets.iter().map(|slot| ModuleId::new(*slot)).collect();
        let message = Message::new()
            .text(format!("no project found at {} for ", path.display()))
            .module(ModuleId::new(source), Detail::Name)
            .text(", only a similar project: ")
            .modules(&ids, Detail::Full);
        self.diagnostics.push(
            Diagnostic::new(DiagnosticKind::SimilarProject, Severity::Warning, message)
                .with_modules(ids.iter().copied().chain([ModuleId::new(source)]))
                .with_dependencies(edges),
        );
    }

    fn finish(mut self) -> BuildOutput {
        for module in &mut self.modules {
            module.stamp_unknown_language();
            module.update_locality(self.input_roots);
        }

        for (rule, used) in self.ignores.iter().zip(&self.ignore_used) {
            if !used {
                let message = Message::new().text(format!("ignore rule `{}` never matched a module", rule.matcher));
                self.diagnostics.push(
                    Diagnostic::new(DiagnosticKind::UnusedConfig, Severity::Info, message)
                        .with_location(rule.location.clone()),
                );
            }
        }

        let (graph, remap) = DependencyGraph::assemble(self.modules, self.dependencies);
        let mut diagnostics = self.diagnostics;
        for diagnostic in &mut diagnostics {
            diagnostic.remap(&remap);
        }
        sort_diagnostics(&mut diagnostics);

        info!(
            modules = graph.len(),
            dependencies = graph.dependencies().len(),
            ignored = self.ignored_modules.len(),
            diagnostics = diagnostics.len(),
            "dependency graph built"
        );
        BuildOutput { graph, diagnostics }
    }
}

fn conflict(existing: &Module, incoming: &Module) -> GraphError {
    let mut paths: Vec<PathBuf> = existing.paths().iter().chain(incoming.paths()).cloned().collect();
    paths.sort();
    paths.dedup();
    GraphError::IdentityConflict {
        names: vec![existing.name().to_string(), incoming.name().to_string()],
        paths,
    }
}

fn file_stem(path: Option<&Path>) -> Option<String> {
    path?.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}

/// Name-based id so repeated runs produce the same placeholder.
fn placeholder_guid(name: &str, library_name: &str, path: Option<&Path>) -> Uuid {
    let path = path.map(normalize_path).unwrap_or_default();
    let seed = format!("{}|{}|{path}", fold(name), fold(library_name));
    Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_guid_is_stable() {
        let a = placeholder_guid("Core", "Company.Core", Some(Path::new("/src/Core.csproj")));
        let b = placeholder_guid("core", "company.core", Some(Path::new("/SRC/Core.csproj")));
        assert_eq!(a, b);
        assert_ne!(a, placeholder_guid("Core", "Company.Core", None));
    }

    #[test]
    fn test_file_stem_guess() {
        assert_eq!(file_stem(Some(Path::new("/src/Core/Core.csproj"))).as_deref(), Some("Core"));
        assert_eq!(file_stem(None), None);
    }
}
