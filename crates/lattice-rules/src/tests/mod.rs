
use lattice_graph::{DependencyKind, GraphBuilder, Location, ModuleMatcher, ReferenceSpec};

use crate::GroupRule;

pub(crate) fn name(pattern: &str) -> ModuleMatcher {
    ModuleMatcher::name(pattern).unwrap()
}

pub(crate) fn at(line: usize) -> Location {
    Location::new("lattice.toml", line)
}

pub(crate) fn group(group: &str, pattern: &str, line: usize) -> GroupRule {
    GroupRule::new(group, name(pattern), at(line))
}

/// Web -> Core (project), Web -> Data (library), Core <-> Data (project),
/// Core -> Newtonsoft.Json (library).
pub(crate) fn shop() -> GraphBuilder {
    let mut builder = GraphBuilder::new();
    let web = builder.declare_module("Web", "Shop.Web", None, Some("/repo/src/Web/Web.csproj".into()), ["C#"]);
    let core = builder.declare_module("Core", "Shop.Core", None, Some("/repo/src/Core/Core.csproj".into()), ["C#"]);
    let data = builder.declare_module("Data", "Shop.Data", None, Some("/repo/src/Data/Data.csproj".into()), ["C#"]);

    let reference = |kind, file: &str, line| ReferenceSpec::new(kind, Location::new(file, line));
    builder.declare_reference(
        web,
        reference(DependencyKind::ProjectReference, "/repo/src/Web/Web.csproj", 10).with_name("Core"),
    );
    builder.declare_reference(
        web,
        reference(DependencyKind::LibraryReference, "/repo/src/Web/Web.csproj", 11).with_library_name("Shop.Data"),
    );
    builder.declare_reference(
        core,
        reference(DependencyKind::ProjectReference, "/repo/src/Core/Core.csproj", 5).with_name("Data"),
    );
    builder.declare_reference(
        core,
        reference(DependencyKind::LibraryReference, "/repo/src/Core/Core.csproj", 6)
            .with_name("Newtonsoft.Json")
            .with_path("/repo/packages/Newtonsoft.Json.dll"),
    );
    builder.declare_reference(
        data,
        reference(DependencyKind::ProjectReference, "/repo/src/Data/Data.csproj", 7).with_name("Core"),
    );
    builder
}

pub(crate) fn shop_groups() -> Vec<GroupRule> {
    vec![
        group("UI", "Shop.Web", 1),
        group("Domain", "Shop.Core", 4),
        group("Infra", "Shop.Data", 5),
        group("Legacy", "Shop.Legacy*", 7),
    ]
}
