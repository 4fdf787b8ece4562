use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "CRP")]
    Crp, // Community Resource Person
    #[serde(rename = "FA")]
    Fa, // Field Associate
    Unknown,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Role::Crp => "CRP",
            Role::Fa => "FA",
            Role::Unknown => "Unknown",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        self.code()
    }

    /// Convert DB string → enum. Anything unrecognised is stored data we keep
    /// readable, so it maps to `Unknown` instead of failing the load.
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "CRP" => Role::Crp,
            "FA" => Role::Fa,
            _ => Role::Unknown,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "CRP" => Ok(Role::Crp),
            "FA" => Ok(Role::Fa),
            "UNKNOWN" => Ok(Role::Unknown),
            _ => Err(AppError::InvalidRole(s.to_string())),
        }
    }
}
