use crate::cli::context::{AppContext, build_filter};
use crate::cli::parser::Commands;
use crate::errors::AppResult;
use crate::export::{ExportFormat, ReportBuilder, notify_export_success, write_artifact};
use crate::ui::messages::warning;
use crate::utils::path::expand_tilde;

/// Handle the `export` command
pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        filter,
        force,
    } = cmd
    {
        let target = expand_tilde(file);
        let format = match format {
            Some(f) => *f,
            None => ExportFormat::from_path(&target)?,
        };

        let ledger = ctx.open_ledger()?;
        let snapshot = ledger.load_all()?;
        let subset = ReportBuilder::filter(&snapshot, &build_filter(filter)?);

        if subset.is_empty() {
            warning("No records found for the selected filters.");
        }

        let artifact = ReportBuilder::to_tabular_bytes(&subset, format)?;
        write_artifact(&artifact, &target, *force)?;

        notify_export_success(&format.as_str().to_uppercase(), &target);
    }

    Ok(())
}
