//! Source of "now" in the register's fixed local zone.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, Utc};

pub trait Clock {
    fn now_in_fixed_zone(&self) -> DateTime<FixedOffset>;

    /// Offset given to stored timestamps that carry none.
    fn offset(&self) -> FixedOffset {
        *self.now_in_fixed_zone().offset()
    }
}

/// Wall clock shifted into a fixed UTC offset (no DST rules).
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// `utc_offset` as written in the config, e.g. `+05:30`.
    pub fn from_offset_str(utc_offset: &str) -> AppResult<Self> {
        Ok(Self::new(parse_offset(utc_offset)?))
    }
}

impl Clock for SystemClock {
    fn now_in_fixed_zone(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// Always returns the same instant; lets tests simulate a given day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    pub fn parse(rfc3339: &str) -> AppResult<Self> {
        DateTime::parse_from_rfc3339(rfc3339)
            .map(FixedClock)
            .map_err(|_| AppError::InvalidDate(rfc3339.to_string()))
    }
}

impl Clock for FixedClock {
    fn now_in_fixed_zone(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

pub fn parse_offset(s: &str) -> AppResult<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| AppError::InvalidOffset(s.to_string()));
    }
    let invalid = || AppError::InvalidOffset(s.to_string());

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let (hh, mm) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hh.parse().map_err(|_| invalid())?;
    let minutes: i32 = mm.parse().map_err(|_| invalid())?;
    if !(0..=14).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
