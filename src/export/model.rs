// src/export/model.rs

use crate::errors::{AppError, AppResult};
use crate::models::{AttendanceRecord, RecordTime, Role, Stored};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Flat, all-text row used by every tabular export.
///
/// Text everywhere keeps spreadsheet cells from mixing types; `photo_path`
/// is informational and not read back.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecordExport {
    pub id: String,
    pub timestamp: String,
    pub date: String,
    pub person: String,
    pub role: String,
    pub status: String,
    pub photo_state: String,
    pub latitude: String,
    pub longitude: String,
    pub state: String,
    pub photo_path: String,
}

/// Header for CSV / JSON / XLSX, in column order.
pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "id",
        "timestamp",
        "date",
        "person",
        "role",
        "status",
        "photo_state",
        "latitude",
        "longitude",
        "state",
        "photo_path",
    ]
}

fn opt_num(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl From<&AttendanceRecord> for RecordExport {
    fn from(r: &AttendanceRecord) -> Self {
        Self {
            id: r.id.to_string(),
            timestamp: r.timestamp.to_db_string(),
            date: r.date_str(),
            person: r.person.clone(),
            role: r.role.code().to_string(),
            status: r.status.to_db_str().to_string(),
            photo_state: r.photo_state.to_db_str().to_string(),
            latitude: opt_num(r.latitude),
            longitude: opt_num(r.longitude),
            state: r.state.clone(),
            photo_path: r.photo_path.clone().unwrap_or_default(),
        }
    }
}

impl RecordExport {
    pub(crate) fn to_row(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.timestamp.as_str(),
            self.date.as_str(),
            self.person.as_str(),
            self.role.as_str(),
            self.status.as_str(),
            self.photo_state.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
            self.state.as_str(),
            self.photo_path.as_str(),
        ]
    }

    /// Decode an exported row back into a record.
    pub fn to_record(&self) -> AppResult<AttendanceRecord> {
        let bad = |field: &str, v: &str| AppError::Export(format!("invalid {field} '{v}'"));

        let num = |field: &str, v: &str| -> AppResult<Option<f64>> {
            if v.is_empty() {
                Ok(None)
            } else {
                v.parse().map(Some).map_err(|_| bad(field, v))
            }
        };

        Ok(AttendanceRecord {
            id: self.id.parse().map_err(|_| bad("id", &self.id))?,
            timestamp: RecordTime::parse(&self.timestamp),
            date: if self.date.is_empty() {
                None
            } else {
                Some(
                    NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
                        .map_err(|_| bad("date", &self.date))?,
                )
            },
            person: self.person.clone(),
            role: Role::from_db_str(&self.role),
            status: Stored::from_db(&self.status),
            photo_state: Stored::from_db(&self.photo_state),
            photo_path: Some(self.photo_path.clone()).filter(|p| !p.is_empty()),
            latitude: num("latitude", &self.latitude)?,
            longitude: num("longitude", &self.longitude)?,
            state: self.state.clone(),
        })
    }
}

pub(crate) fn records_to_rows(records: &[AttendanceRecord]) -> Vec<RecordExport> {
    records.iter().map(RecordExport::from).collect()
}
