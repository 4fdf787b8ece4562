use crate::cli::context::{AppContext, read_upload};
use crate::cli::parser::Commands;
use crate::core::{MarkLogic, PhotoCleanup, PhotoUpload};
use crate::errors::{AppError, AppResult};
use crate::export::{ReportBuilder, write_artifact};
use crate::ui::messages::{info, success, warning};
use crate::utils::path::expand_tilde;
use std::path::PathBuf;

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Photo {
        id,
        file,
        out,
        force,
    } = cmd
    {
        let mut ledger = ctx.open_ledger()?;

        // replace
        if let Some(file) = file {
            let (bytes, original_name) = read_upload(file)?;
            let upload = PhotoUpload {
                bytes,
                original_name,
            };

            let cleanup = MarkLogic::replace_photo(&mut ledger, *id, &upload)?;
            success(format!("Photo of record #{id} replaced."));
            if let PhotoCleanup::Failed { path, reason } = cleanup {
                warning(format!(
                    "Previous photo {} could not be removed: {reason}",
                    path.display()
                ));
            }
            return Ok(());
        }

        let rec = ledger.get(*id)?;
        info(format!("Record #{}: {}", rec.id, rec.photo_state));

        let Some(stored) = rec.photo_path.map(PathBuf::from) else {
            info("No photo attached.");
            return Ok(());
        };

        // extract
        if let Some(out) = out {
            let artifact = match ReportBuilder::photo_artifact(ledger.photos(), &stored) {
                Ok(a) => a,
                Err(AppError::PhotoNotFound(p)) => {
                    warning(format!("Photo missing: {}", p.display()));
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            let target = expand_tilde(out);
            write_artifact(&artifact, &target, *force)?;
            success(format!(
                "Photo '{}' ({}) written to {}",
                artifact.file_name,
                artifact.mime,
                target.display()
            ));
            return Ok(());
        }

        // show
        if ledger.photos().exists(&stored) {
            info(format!("Photo file: {}", stored.display()));
        } else {
            warning(format!("Photo missing: {}", stored.display()));
        }
    }

    Ok(())
}
