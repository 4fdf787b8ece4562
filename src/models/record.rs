use super::{photo_state::PhotoState, role::Role, status::Status, stored::Stored};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

/// Creation time of a record as read back from storage.
///
/// A stored value that does not parse resolves to `Unparseable` instead of
/// aborting the whole load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RecordTime {
    At(DateTime<FixedOffset>),
    Unparseable(String),
}

/// Offset-less `YYYY-MM-DD HH:MM:SS` written by earlier versions of the register.
pub const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl RecordTime {
    /// Same as [`RecordTime::parse_in`] with naive text read as UTC.
    pub fn parse(raw: &str) -> Self {
        Self::parse_in(raw, Utc.fix())
    }

    /// RFC 3339, or naive local time to which `offset` is attached.
    pub fn parse_in(raw: &str, offset: FixedOffset) -> Self {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return RecordTime::At(dt);
        }
        NaiveDateTime::parse_from_str(raw.trim(), NAIVE_TIMESTAMP_FORMAT)
            .ok()
            .and_then(|naive| offset.from_local_datetime(&naive).single())
            .map(RecordTime::At)
            .unwrap_or_else(|| RecordTime::Unparseable(raw.to_string()))
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            RecordTime::At(dt) => Some(dt),
            RecordTime::Unparseable(_) => None,
        }
    }

    /// Text form used in storage and exports.
    pub fn to_db_string(&self) -> String {
        match self {
            RecordTime::At(dt) => dt.to_rfc3339(),
            RecordTime::Unparseable(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for RecordTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordTime::At(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            RecordTime::Unparseable(_) => f.write_str("<unparseable>"),
        }
    }
}

/// One attendance event. ⇔ one row of the `attendance` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub timestamp: RecordTime,
    /// Local calendar day the uniqueness rule is keyed on. `None` only when
    /// the stored text is not a valid `YYYY-MM-DD`.
    pub date: Option<NaiveDate>,
    pub person: String,
    pub role: Role,
    pub status: Stored<Status>,
    pub photo_state: Stored<PhotoState>,
    pub photo_path: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub state: String,
}

impl AttendanceRecord {
    pub fn date_str(&self) -> String {
        self.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// True when the record can take part in date-bounded views.
    pub fn is_dated(&self) -> bool {
        self.date.is_some() && self.timestamp.as_datetime().is_some()
    }
}

/// Field values of a new entry, before the ledger stamps id and time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub person: String,
    pub role: Role,
    pub status: Status,
    pub photo_state: PhotoState,
    pub photo_path: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub state: Option<String>,
}

impl NewRecord {
    pub fn new(person: impl Into<String>, role: Role, status: Status) -> Self {
        Self {
            person: person.into(),
            role,
            status,
            photo_state: PhotoState::NoPhoto,
            photo_path: None,
            latitude: None,
            longitude: None,
            state: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_coords(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn with_photo(mut self, photo_state: PhotoState, photo_path: Option<String>) -> Self {
        self.photo_state = photo_state;
        self.photo_path = photo_path;
        self
    }
}

/// Administrative edit: every `Some` field is written, `None` leaves the
/// column untouched. Coordinates use a nested option so they can be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordChanges {
    pub person: Option<String>,
    pub role: Option<Role>,
    pub status: Option<Status>,
    pub photo_state: Option<PhotoState>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub state: Option<String>,
}

impl RecordChanges {
    pub fn is_empty(&self) -> bool {
        *self == RecordChanges::default()
    }

    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}
