use crate::core::directory::Directory;
use crate::core::ledger::{Ledger, PhotoCleanup};
use crate::errors::{AppError, AppResult};
use crate::models::{NewRecord, PhotoState, Status};
use crate::photos::PhotoStore;
use crate::ui::messages::warning;
use std::path::PathBuf;

/// Image bytes as received from the upload, with the client's file name.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub original_name: String,
}

/// A candidate entry gathered by the presentation layer.
#[derive(Debug, Clone)]
pub struct Submission {
    pub person: String,
    pub status: Status,
    pub photo: Option<PhotoUpload>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug)]
pub struct MarkOutcome {
    pub id: i64,
    pub photo_state: PhotoState,
    /// Set when the photo could not be stored; the entry exists anyway.
    pub photo_error: Option<AppError>,
}

pub struct MarkLogic;

impl MarkLogic {
    /// Turn a submission into a ledger entry.
    ///
    /// Role and state come from the directory. A photo that fails to persist
    /// still yields an entry, with `Photo Upload Failed` and no path. A photo
    /// that was stored for a rejected entry (e.g. duplicate day) is removed.
    pub fn submit(
        ledger: &mut Ledger,
        directory: &Directory,
        sub: Submission,
    ) -> AppResult<MarkOutcome> {
        let person = directory
            .find(&sub.person)
            .ok_or_else(|| AppError::UnknownPerson(sub.person.clone()))?
            .clone();

        let (photo_state, photo_path, photo_error) = match &sub.photo {
            None => (PhotoState::NoPhoto, None, None),
            Some(upload) => match ledger.photos().save(&upload.bytes, &upload.original_name) {
                Ok(path) => (PhotoState::Uploaded, Some(path), None),
                Err(e) => (PhotoState::UploadFailed, None, Some(e)),
            },
        };

        let rec = NewRecord::new(person.name, person.role, sub.status)
            .with_state(person.state)
            .with_coords(sub.latitude, sub.longitude)
            .with_photo(
                photo_state,
                photo_path.as_ref().map(|p| p.to_string_lossy().to_string()),
            );

        match ledger.mark(rec) {
            Ok(id) => Ok(MarkOutcome {
                id,
                photo_state,
                photo_error,
            }),
            Err(e) => {
                if let Some(path) = photo_path {
                    discard_orphan(ledger.photos(), path);
                }
                Err(e)
            }
        }
    }

    /// Attach a new photo to an existing record and drop the previous file.
    ///
    /// Returns what happened to the old file; its removal is best effort.
    pub fn replace_photo(
        ledger: &mut Ledger,
        id: i64,
        upload: &PhotoUpload,
    ) -> AppResult<PhotoCleanup> {
        let previous = ledger.get(id)?.photo_path.map(PathBuf::from);

        let new_path = ledger.photos().save(&upload.bytes, &upload.original_name)?;

        if let Err(e) = ledger.set_photo(id, PhotoState::Uploaded, Some(&new_path)) {
            discard_orphan(ledger.photos(), new_path);
            return Err(e);
        }

        Ok(match previous {
            None => PhotoCleanup::NoPhoto,
            Some(old) => PhotoCleanup::remove(ledger.photos(), old),
        })
    }
}

/// Remove a file stored for an entry that was then rejected. The caller's
/// error stays the result; a file left behind is reported as a warning.
fn discard_orphan(photos: &PhotoStore, path: PathBuf) -> PhotoCleanup {
    let cleanup = PhotoCleanup::remove(photos, path);
    if let PhotoCleanup::Failed { path, reason } = &cleanup {
        warning(format!(
            "Photo {} was not stored with any record and could not be removed: {reason}",
            path.display()
        ));
    }
    cleanup
}
