//! Check command implementation.

use std::fs;

use lattice_config::{Settings, SettingsOverrides};
use tracing::info;

use crate::cli::CheckArgs;
use crate::commands::Session;
use crate::error::{Result, exit_code};
use crate::report::{Report, Summary};
use crate::ui;

/// Execute the check command.
///
/// 1. Load the policy and the input manifests
/// 2. Build, group and validate the graph
/// 3. Print the report on stdout and write the policy's `[[output]]` files
///
/// Returns the number of error violations, capped at 254.
pub fn execute(args: CheckArgs) -> Result<u8> {
    let session = Session::load(&args.input)?;
    let overrides = SettingsOverrides {
        format: args.format.map(Into::into),
        show_allowed: args.show_allowed.then_some(true),
    };
    let settings = Settings::load(&session.policy.settings, &overrides)?;

    let report = Report::new(&session.analysis, settings.show_allowed);
    print!("{}", report.render(settings.format)?);

    if !args.no_outputs {
        for output in &session.policy.outputs {
            if let Some(parent) = output.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output.path, report.render(output.format)?)?;
            info!(path = %output.path.display(), format = %output.format, "report written");
        }
    }

    let summary = Summary::of(&session.analysis);
    if summary.errors > 0 {
        ui::error(&format!("Policy violated: {summary}"));
    } else if summary.violations() > 0 {
        ui::warning(&format!("Policy satisfied with findings: {summary}"));
    } else {
        ui::success(&format!(
            "No violations in {}",
            ui::plural(session.analysis.graph.len(), "module")
        ));
    }

    Ok(exit_code(summary.errors))
}
