//! JSON input manifests.
//!
//! A manifest lists projects and the raw references they declare, as a
//! project-file scanner would have extracted them:
//!
//! ```json
//! { "projects": [ { "name": "App", "library_name": "Company.App",
//!     "path": "/src/App/App.csproj", "languages": ["C#"],
//!     "references": [ { "kind": "project", "name": "Core",
//!                       "path": "/src/Core/Core.csproj", "line": 12 } ] } ] }
//! ```
//!
//! Loading replays the manifest as `declare_module` / `declare_reference`
//! calls; nothing is resolved here.

use std::fs;
use std::path::{Path, PathBuf};

use lattice_graph::{DependencyKind, GraphBuilder, Location, ReferenceSpec, Uuid};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectEntry {
    pub name: String,
    /// Defaults to `name`.
    pub library_name: Option<String>,
    pub guid: Option<Uuid>,
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub references: Vec<ReferenceEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceEntry {
    pub kind: ReferenceKind,
    pub name: Option<String>,
    pub library_name: Option<String>,
    pub guid: Option<Uuid>,
    pub path: Option<PathBuf>,
    /// Line of the reference inside the declaring project file.
    #[serde(default)]
    pub line: usize,
    pub languages: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Project,
    Library,
}

impl From<ReferenceKind> for DependencyKind {
    fn from(kind: ReferenceKind) -> Self {
        match kind {
            ReferenceKind::Project => DependencyKind::ProjectReference,
            ReferenceKind::Library => DependencyKind::LibraryReference,
        }
    }
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| CliError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Declare every project and reference on `builder`.
    ///
    /// Relative paths are resolved against the directory of `origin`, the
    /// manifest file.
    /// A reference's location is its project's path plus the given line, or
    /// the manifest itself when the project has no path.
    pub fn declare(&self, origin: &Path, builder: &mut GraphBuilder) {
        let base = origin.parent().unwrap_or(Path::new(""));
        for project in &self.projects {
            let path = project.path.as_deref().map(|path| resolve(base, path));
            let handle = builder.declare_module(
                &project.name,
                project.library_name.as_deref().unwrap_or(&project.name),
                project.guid,
                path.clone(),
                project.languages.iter().cloned(),
            );

            let file = path.as_deref().unwrap_or(origin);
            for reference in &project.references {
                let mut spec = ReferenceSpec::new(reference.kind.into(), Location::new(file, reference.line));
                if let Some(name) = &reference.name {
                    spec = spec.with_name(name.as_str());
                }
                if let Some(library_name) = &reference.library_name {
                    spec = spec.with_library_name(library_name.as_str());
                }
                if let Some(guid) = reference.guid {
                    spec = spec.with_guid(guid);
                }
                if let Some(target) = &reference.path {
                    spec = spec.with_path(resolve(base, target));
                }
                if let Some(languages) = &reference.languages {
                    spec = spec.with_languages(languages.iter().cloned());
                }
                builder.declare_reference(handle, spec);
            }
        }
    }
}

/// Read every manifest, in order, into one builder.
pub fn load_manifests(paths: &[PathBuf]) -> Result<GraphBuilder> {
    let mut builder = GraphBuilder::new();
    for path in paths {
        let manifest = Manifest::load(path)?;
        manifest.declare(&std::path::absolute(path)?, &mut builder);
        debug!(path = %path.display(), projects = manifest.projects.len(), "manifest loaded");
    }
    Ok(builder)
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
