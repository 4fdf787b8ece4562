use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Daily attendance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Present,
    #[serde(rename = "On Leave")]
    OnLeave,
    Absent,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Present, Status::OnLeave, Status::Absent];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Status::Present => "Present",
            Status::OnLeave => "On Leave",
            Status::Absent => "Absent",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Present" => Some(Status::Present),
            "On Leave" => Some(Status::OnLeave),
            "Absent" => Some(Status::Absent),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// Lenient parser for CLI input: `present`, `on-leave`, `on leave`, `leave`, `absent`.
impl FromStr for Status {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "present" | "p" => Ok(Status::Present),
            "on leave" | "onleave" | "leave" | "l" => Ok(Status::OnLeave),
            "absent" | "a" => Ok(Status::Absent),
            _ => Err(AppError::InvalidStatus(s.to_string())),
        }
    }
}
