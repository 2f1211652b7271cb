//! Arch command implementation.

use lattice_config::ReportFormat;

use crate::cli::ArchArgs;
use crate::commands::Session;
use crate::error::Result;
use crate::report::render_architecture;
use crate::ui;

/// Print the architecture graph derived from the error-severity rules.
///
/// Always exits with 0 unless loading fails.
pub fn execute(args: ArchArgs) -> Result<u8> {
    let session = Session::load(&args.input)?;
    let architecture = session.analysis.architecture(&session.policy.policy);
    let format = args.format.map_or(ReportFormat::Text, Into::into);
    print!("{}", render_architecture(&architecture, format)?);

    if architecture.groups.is_empty() {
        ui::warning("No module was assigned to a group");
    } else {
        ui::info(&format!(
            "{}, {}",
            ui::plural(architecture.groups.len(), "group"),
            ui::plural(architecture.edges.len(), "relation")
        ));
    }
    Ok(0)
}
