// src/export/filter.rs

use crate::models::AttendanceRecord;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Selection applied to a ledger snapshot. `None` means "everything".
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Inclusive `(from, to)` day range.
    pub range: Option<(NaiveDate, NaiveDate)>,
    pub persons: Option<BTreeSet<String>>,
    pub states: Option<BTreeSet<String>>,
}

impl ReportFilter {
    pub fn with_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.range = Some((from, to));
        self
    }

    pub fn with_persons<I, S>(mut self, persons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.persons = Some(persons.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = Some(states.into_iter().map(Into::into).collect());
        self
    }

    /// Records without a usable timestamp never pass a date-bounded filter.
    pub fn matches(&self, rec: &AttendanceRecord) -> bool {
        if let Some((from, to)) = self.range {
            match rec.date {
                Some(d) if rec.is_dated() => {
                    if d < from || d > to {
                        return false;
                    }
                }
                _ => return false,
            }
        }

        if let Some(persons) = &self.persons
            && !persons.contains(&rec.person)
        {
            return false;
        }

        if let Some(states) = &self.states
            && !states.contains(&rec.state)
        {
            return false;
        }

        true
    }

    pub fn apply(&self, snapshot: &[AttendanceRecord]) -> Vec<AttendanceRecord> {
        snapshot.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
