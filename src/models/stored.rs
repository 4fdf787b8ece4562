use super::{photo_state::PhotoState, status::Status};
use serde::Serialize;
use std::fmt;

/// Closed set of values with a fixed text form in the `attendance` table.
pub trait DbText: Sized + Copy {
    fn db_text(&self) -> &'static str;
    fn from_db_text(s: &str) -> Option<Self>;
}

impl DbText for Status {
    fn db_text(&self) -> &'static str {
        self.to_db_str()
    }

    fn from_db_text(s: &str) -> Option<Self> {
        Status::from_db_str(s)
    }
}

impl DbText for PhotoState {
    fn db_text(&self) -> &'static str {
        self.to_db_str()
    }

    fn from_db_text(s: &str) -> Option<Self> {
        PhotoState::from_db_str(s)
    }
}

/// A closed-set column as read back from storage.
///
/// Tables created before the CHECK constraints can hold text outside the set
/// (`Leave`, `Sick`, ...). Such a value is kept verbatim in `Unrecognized`
/// so the row still loads and is written back unchanged on export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Stored<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: DbText> Stored<T> {
    pub fn from_db(raw: &str) -> Self {
        match T::from_db_text(raw) {
            Some(v) => Stored::Known(v),
            None => Stored::Unrecognized(raw.to_string()),
        }
    }

    pub fn known(&self) -> Option<T> {
        match self {
            Stored::Known(v) => Some(*v),
            Stored::Unrecognized(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Stored::Known(_))
    }

    /// Text as stored: the canonical form, or the raw legacy value.
    pub fn to_db_str(&self) -> &str {
        match self {
            Stored::Known(v) => v.db_text(),
            Stored::Unrecognized(raw) => raw,
        }
    }
}

impl<T> From<T> for Stored<T> {
    fn from(value: T) -> Self {
        Stored::Known(value)
    }
}

impl<T: DbText> fmt::Display for Stored<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl PartialEq<Status> for Stored<Status> {
    fn eq(&self, other: &Status) -> bool {
        self.known() == Some(*other)
    }
}

impl PartialEq<PhotoState> for Stored<PhotoState> {
    fn eq(&self, other: &PhotoState) -> bool {
        self.known() == Some(*other)
    }
}
