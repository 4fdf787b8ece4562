use crate::cli::context::{AppContext, read_upload};
use crate::cli::parser::Commands;
use crate::core::{MarkLogic, PhotoUpload, Submission};
use crate::errors::{AppError, AppResult};
use crate::models::PhotoState;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, ctx: &AppContext) -> AppResult<()> {
    if let Commands::Mark {
        person,
        status,
        photo,
        lat,
        lon,
    } = cmd
    {
        let photo = match photo {
            Some(file) => {
                let (bytes, original_name) = read_upload(file)?;
                Some(PhotoUpload {
                    bytes,
                    original_name,
                })
            }
            None => None,
        };

        let submission = Submission {
            person: person.clone(),
            status: *status,
            photo,
            latitude: *lat,
            longitude: *lon,
        };

        let mut ledger = ctx.open_ledger()?;

        match MarkLogic::submit(&mut ledger, &ctx.directory(), submission) {
            Ok(outcome) => {
                success(format!(
                    "Attendance marked for {person}: {status} (record #{})",
                    outcome.id
                ));
                if outcome.photo_state == PhotoState::UploadFailed {
                    let reason = outcome
                        .photo_error
                        .map(|e| e.to_string())
                        .unwrap_or_default();
                    warning(format!("Photo was not saved: {reason}"));
                }
            }
            // expected condition, not a failure
            Err(AppError::DuplicateForDay { person, date }) => {
                warning(format!(
                    "{person} has already marked attendance for {date}. Nothing to do."
                ));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
