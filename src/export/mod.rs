// src/export/mod.rs

mod archive;
pub mod filter;
mod fs_utils;
mod json_csv;
pub mod logic;
mod model;
pub mod range;
mod xlsx;

pub use filter::ReportFilter;
pub use fs_utils::{ensure_writable, write_artifact};
pub use json_csv::read_csv_bytes;
pub use logic::ReportBuilder;
pub use model::RecordExport;
pub use range::parse_range;

use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

pub const MIME_CSV: &str = "text/csv";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_JSON: &str = "application/json";
pub const MIME_ZIP: &str = "application/zip";

/// Shared completion message for every export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => MIME_CSV,
            ExportFormat::Xlsx => MIME_XLSX,
            ExportFormat::Json => MIME_JSON,
        }
    }

    /// Guess the format from an output file name (`report.xlsx` → Xlsx).
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "json" => Ok(ExportFormat::Json),
            "" => Err(AppError::InvalidExportFormat(format!(
                "{} has no extension; pass --format",
                path.display()
            ))),
            other => Err(AppError::InvalidExportFormat(other.to_string())),
        }
    }
}

/// A downloadable byte buffer with a suggested file name and MIME tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}
