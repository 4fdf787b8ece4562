//! Static roster: who may mark attendance, with their role and state.

use crate::models::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub role: Role,
    #[serde(default = "unknown_state")]
    pub state: String,
}

fn unknown_state() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    persons: Vec<Person>,
}

impl Directory {
    pub fn new(persons: Vec<Person>) -> Self {
        Self { persons }
    }

    pub fn list_persons(&self) -> &[Person] {
        &self.persons
    }

    /// Exact match first, then case-insensitive.
    pub fn find(&self, name: &str) -> Option<&Person> {
        let name = name.trim();
        self.persons
            .iter()
            .find(|p| p.name == name)
            .or_else(|| self.persons.iter().find(|p| p.name.eq_ignore_ascii_case(name)))
    }

    pub fn states(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.persons.iter().map(|p| p.state.as_str()).collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

/// Roster used when the configuration file does not list one.
pub fn default_roster() -> Vec<Person> {
    [
        ("Asha", Role::Crp, "Gujarat"),
        ("Ravi", Role::Fa, "Gujarat"),
        ("Meena", Role::Crp, "Rajasthan"),
        ("Suresh", Role::Fa, "Rajasthan"),
        ("Lakshmi", Role::Crp, "Maharashtra"),
    ]
    .into_iter()
    .map(|(name, role, state)| Person {
        name: name.to_string(),
        role,
        state: state.to_string(),
    })
    .collect()
}
