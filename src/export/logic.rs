// src/export/logic.rs

use crate::errors::AppResult;
use crate::export::archive;
use crate::export::filter::ReportFilter;
use crate::export::json_csv::{csv_bytes, json_bytes};
use crate::export::model::records_to_rows;
use crate::export::xlsx::xlsx_bytes;
use crate::export::{Artifact, ExportFormat, MIME_ZIP};
use crate::models::{AttendanceRecord, Status};
use crate::photos::{PhotoStore, image_mime, original_name};
use std::path::Path;

pub const RECORDS_BASENAME: &str = "attendance_records";
pub const PHOTOS_FILE_NAME: &str = "attendance_photos.zip";

/// Read-only views and export artifacts over a ledger snapshot.
pub struct ReportBuilder;

impl ReportBuilder {
    /// Records matching every criterion of `filter`, in snapshot order.
    pub fn filter(snapshot: &[AttendanceRecord], filter: &ReportFilter) -> Vec<AttendanceRecord> {
        filter.apply(snapshot)
    }

    /// Row-per-record table, every value as text.
    ///
    /// CSV decodes back with `read_csv_bytes`; `photo_path` is informational.
    pub fn to_tabular_bytes(
        subset: &[AttendanceRecord],
        format: ExportFormat,
    ) -> AppResult<Artifact> {
        let rows = records_to_rows(subset);

        let bytes = match format {
            ExportFormat::Csv => csv_bytes(&rows)?,
            ExportFormat::Xlsx => xlsx_bytes(&rows)?,
            ExportFormat::Json => json_bytes(&rows)?,
        };

        Ok(Artifact {
            bytes,
            file_name: format!("{RECORDS_BASENAME}.{}", format.as_str()),
            mime: format.mime(),
        })
    }

    /// Zip of the photos in `subset` that still resolve.
    pub fn bundle_photos(subset: &[AttendanceRecord], photos: &PhotoStore) -> AppResult<Artifact> {
        Ok(Artifact {
            bytes: archive::bundle_photos(subset, photos)?,
            file_name: PHOTOS_FILE_NAME.to_string(),
            mime: MIME_ZIP,
        })
    }

    /// A single stored photo, named after its original upload.
    pub fn photo_artifact(photos: &PhotoStore, path: &Path) -> AppResult<Artifact> {
        Ok(Artifact {
            bytes: photos.read(path)?,
            file_name: original_name(path),
            mime: image_mime(path),
        })
    }

    /// Number of records per status, in `Status::ALL` order.
    pub fn status_counts(subset: &[AttendanceRecord]) -> Vec<(Status, usize)> {
        Status::ALL
            .iter()
            .map(|s| (*s, subset.iter().filter(|r| r.status == *s).count()))
            .collect()
    }
}
