use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of the photo step of a submission.
///
/// Set once at creation (`No Photo` → `Photo Uploaded` | `Photo Upload Failed`);
/// afterwards it only changes through an administrative edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhotoState {
    #[serde(rename = "Photo Uploaded")]
    Uploaded,
    #[serde(rename = "No Photo")]
    NoPhoto,
    #[serde(rename = "Photo Upload Failed")]
    UploadFailed,
}

impl PhotoState {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PhotoState::Uploaded => "Photo Uploaded",
            PhotoState::NoPhoto => "No Photo",
            PhotoState::UploadFailed => "Photo Upload Failed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Photo Uploaded" => Some(PhotoState::Uploaded),
            "No Photo" => Some(PhotoState::NoPhoto),
            "Photo Upload Failed" => Some(PhotoState::UploadFailed),
            _ => None,
        }
    }
}

impl fmt::Display for PhotoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl FromStr for PhotoState {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        if let Some(state) = PhotoState::from_db_str(s) {
            return Ok(state);
        }
        match s.trim().to_lowercase().as_str() {
            "uploaded" => Ok(PhotoState::Uploaded),
            "none" | "no-photo" => Ok(PhotoState::NoPhoto),
            "failed" => Ok(PhotoState::UploadFailed),
            _ => Err(AppError::InvalidPhotoState(s.to_string())),
        }
    }
}
