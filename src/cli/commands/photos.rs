use crate::cli::context::{AppContext, build_filter};
use crate::cli::parser::Commands;
use crate::errors::AppResult;
use crate::export::{ReportBuilder, notify_export_success, write_artifact};
use crate::ui::messages::{info, warning};
use crate::utils::path::expand_tilde;
use std::path::Path;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Photos {
        file,
        filter,
        force,
    } = cmd
    {
        let ledger = ctx.open_ledger()?;
        let snapshot = ledger.load_all()?;
        let subset = ReportBuilder::filter(&snapshot, &build_filter(filter)?);

        let mut attached = 0;
        let mut missing = 0;
        for stored in subset.iter().filter_map(|r| r.photo_path.as_deref()) {
            attached += 1;
            if !ledger.photos().exists(Path::new(stored)) {
                missing += 1;
            }
        }

        let artifact = ReportBuilder::bundle_photos(&subset, ledger.photos())?;
        let target = expand_tilde(file);
        write_artifact(&artifact, &target, *force)?;

        if missing > 0 {
            warning(format!("{missing} photo(s) missing on disk were skipped."));
        }
        info(format!("{} photo(s) archived.", attached - missing));
        notify_export_success("Photos", &target);
    }

    Ok(())
}
