//! Unified application error type.
//! All modules (db, core, photos, export, cli) return AppError to keep the
//! error handling consistent and easy to manage.

use chrono::NaiveDate;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Ledger
    // ---------------------------
    /// Expected, user-facing: the person already has an entry for that day.
    #[error("Attendance already marked for {person} on {date}")]
    DuplicateForDay { person: String, date: NaiveDate },

    #[error("Attendance record #{0} not found")]
    RecordNotFound(i64),

    #[error("Unknown person: {0}")]
    UnknownPerson(String),

    // ---------------------------
    // Photos
    // ---------------------------
    #[error("Photo missing: {}", .0.display())]
    PhotoNotFound(PathBuf),

    #[error("Photo could not be saved: {0}")]
    PhotoWrite(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid photo state: {0}")]
    InvalidPhotoState(String),

    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, AppError::DuplicateForDay { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::RecordNotFound(_) | AppError::PhotoNotFound(_))
    }

    /// Engine-level failure unrelated to the per-day rule.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            AppError::Db(_) | AppError::Io(_) | AppError::Migration(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
