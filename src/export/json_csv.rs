// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{RecordExport, get_headers};
use crate::models::AttendanceRecord;
use std::io;

/// CSV with a fixed header, even for an empty subset.
pub(crate) fn csv_bytes(rows: &[RecordExport]) -> AppResult<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(get_headers())
        .map_err(|e| AppError::from(io::Error::other(format!("CSV write error: {e}"))))?;

    for row in rows {
        wtr.write_record(row.to_row())
            .map_err(|e| AppError::from(io::Error::other(format!("CSV write error: {e}"))))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::from(io::Error::other(format!("CSV flush error: {e}"))))
}

/// Read back bytes produced by `csv_bytes`.
pub fn read_csv_bytes(bytes: &[u8]) -> AppResult<Vec<AttendanceRecord>> {
    let mut rdr = csv::Reader::from_reader(bytes);

    let mut out = Vec::new();
    for row in rdr.deserialize::<RecordExport>() {
        let row = row.map_err(|e| AppError::Export(format!("CSV read error: {e}")))?;
        out.push(row.to_record()?);
    }
    Ok(out)
}

/// JSON pretty-printed.
pub(crate) fn json_bytes(rows: &[RecordExport]) -> AppResult<Vec<u8>> {
    serde_json::to_vec_pretty(rows)
        .map_err(|e| AppError::from(io::Error::other(format!("JSON serialization error: {e}"))))
}
