use crate::errors::{AppError, AppResult};
use crate::models::{
    AttendanceRecord, NewRecord, PhotoState, RecordChanges, RecordTime, Role, Stored,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Result, Row, params, params_from_iter};

const SELECT_COLUMNS: &str = "SELECT id, timestamp, date, person, role, status, photo_state,
        photo_path, latitude, longitude, state
     FROM attendance";

/// Decode one row. Text columns outside their expected shape never fail the
/// row: they come back as `Unparseable`, `Unrecognized`, `None` or `Unknown`.
/// `offset` is attached to timestamps stored without one.
pub fn map_row(row: &Row, offset: FixedOffset) -> Result<AttendanceRecord> {
    let ts_str: String = row.get("timestamp")?;
    let date_str: String = row.get("date")?;
    let status: String = row.get("status")?;
    let photo_state: String = row.get("photo_state")?;
    let role: String = row.get("role")?;

    Ok(AttendanceRecord {
        id: row.get("id")?,
        timestamp: RecordTime::parse_in(&ts_str, offset),
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").ok(),
        person: row.get("person")?,
        role: Role::from_db_str(&role),
        status: Stored::from_db(&status),
        photo_state: Stored::from_db(&photo_state),
        photo_path: row.get("photo_path")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        state: row
            .get::<_, Option<String>>("state")?
            .unwrap_or_else(|| "Unknown".to_string()),
    })
}

/// True for the engine's UNIQUE-constraint failure (the per-day rule).
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                && (code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || message
                        .as_deref()
                        .is_some_and(|m| m.contains("UNIQUE constraint failed")))
        }
        _ => false,
    }
}

/// Single INSERT; the `(person, date)` unique index decides duplicates.
pub fn insert_record(
    conn: &Connection,
    at: &DateTime<FixedOffset>,
    date: NaiveDate,
    rec: &NewRecord,
) -> AppResult<i64> {
    let res = conn.execute(
        "INSERT INTO attendance
            (timestamp, date, person, role, status, photo_state, photo_path, latitude, longitude, state)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            at.to_rfc3339(),
            date.format("%Y-%m-%d").to_string(),
            rec.person,
            rec.role.to_db_str(),
            rec.status.to_db_str(),
            rec.photo_state.to_db_str(),
            rec.photo_path,
            rec.latitude,
            rec.longitude,
            rec.state.as_deref().unwrap_or("Unknown"),
        ],
    );

    match res {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if is_unique_violation(&e) => Err(AppError::DuplicateForDay {
            person: rec.person.clone(),
            date,
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn load_all(conn: &Connection, offset: FixedOffset) -> AppResult<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY date ASC, id ASC"))?;
    let rows = stmt.query_map([], |row| map_row(row, offset))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_by_id(
    conn: &Connection,
    id: i64,
    offset: FixedOffset,
) -> AppResult<Option<AttendanceRecord>> {
    let rec = conn
        .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [id], |row| {
            map_row(row, offset)
        })
        .optional()?;
    Ok(rec)
}

/// `None` when the id does not exist, `Some(path)` otherwise.
pub fn load_photo_path(conn: &Connection, id: i64) -> AppResult<Option<Option<String>>> {
    let path = conn
        .query_row(
            "SELECT photo_path FROM attendance WHERE id = ?1",
            [id],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()?;
    Ok(path)
}

/// Build `SET col = ?` pairs for the fields present in `changes`.
fn change_set(changes: &RecordChanges) -> Vec<(&'static str, Value)> {
    let mut set: Vec<(&'static str, Value)> = Vec::new();

    if let Some(p) = &changes.person {
        set.push(("person", Value::Text(p.clone())));
    }
    if let Some(r) = changes.role {
        set.push(("role", Value::Text(r.to_db_str().to_string())));
    }
    if let Some(s) = changes.status {
        set.push(("status", Value::Text(s.to_db_str().to_string())));
    }
    if let Some(ps) = changes.photo_state {
        set.push(("photo_state", Value::Text(ps.to_db_str().to_string())));
    }
    if let Some(lat) = changes.latitude {
        set.push(("latitude", lat.map(Value::Real).unwrap_or(Value::Null)));
    }
    if let Some(lon) = changes.longitude {
        set.push(("longitude", lon.map(Value::Real).unwrap_or(Value::Null)));
    }
    if let Some(st) = &changes.state {
        set.push(("state", Value::Text(st.clone())));
    }

    set
}

/// Returns the number of rows touched (0 → unknown id).
pub fn update_record(conn: &Connection, id: i64, changes: &RecordChanges) -> AppResult<usize> {
    let set = change_set(changes);

    if set.is_empty() {
        let exists = conn
            .query_row("SELECT 1 FROM attendance WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;
        return Ok(usize::from(exists.is_some()));
    }

    let assignments: Vec<String> = set
        .iter()
        .enumerate()
        .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE attendance SET {} WHERE id = ?{}",
        assignments.join(", "),
        set.len() + 1
    );

    let mut values: Vec<Value> = set.into_iter().map(|(_, v)| v).collect();
    values.push(Value::Integer(id));

    match conn.execute(&sql, params_from_iter(values)) {
        Ok(n) => Ok(n),
        Err(e) if is_unique_violation(&e) => {
            // only reachable by renaming someone onto a day they already have
            match conflicting_key(conn, id, changes)? {
                Some((person, date)) => Err(AppError::DuplicateForDay { person, date }),
                None => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// `(person, date)` the failed update would have produced, when the stored
/// date is a real day.
fn conflicting_key(
    conn: &Connection,
    id: i64,
    changes: &RecordChanges,
) -> AppResult<Option<(String, NaiveDate)>> {
    let current = conn
        .query_row(
            "SELECT person, date FROM attendance WHERE id = ?1",
            [id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    Ok(current.and_then(|(person, date)| {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
        Some((changes.person.clone().unwrap_or(person), date))
    }))
}

pub fn set_photo(
    conn: &Connection,
    id: i64,
    photo_state: PhotoState,
    photo_path: Option<&str>,
) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE attendance SET photo_state = ?1, photo_path = ?2 WHERE id = ?3",
        params![photo_state.to_db_str(), photo_path, id],
    )?;
    Ok(n)
}

pub fn delete_record(conn: &Connection, id: i64) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM attendance WHERE id = ?1", [id])?;
    Ok(n)
}
