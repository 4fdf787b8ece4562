//! Declarative, additive schema migrations for the attendance ledger.
//!
//! Every step is probed against the live schema before it runs, so the list
//! can be replayed on every start: a database already in shape gets zero
//! changes, an older (narrower) one gets only the missing pieces.

use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};

pub const ATTENDANCE_TABLE: &str = "attendance";

/// What a migration does to the schema.
#[derive(Debug)]
pub enum Step {
    /// Create a table that does not exist yet.
    CreateTable {
        table: &'static str,
        ddl: &'static str,
    },
    /// Add each `(column, definition)` that the table does not have.
    AddColumns {
        table: &'static str,
        columns: &'static [(&'static str, &'static str)],
    },
    /// Create a (possibly unique) index that does not exist yet.
    CreateIndex {
        index: &'static str,
        ddl: &'static str,
    },
}

#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub step: Step,
}

const CREATE_ATTENDANCE: &str = r#"
CREATE TABLE attendance (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp    TEXT NOT NULL,
    date         TEXT NOT NULL,
    person       TEXT NOT NULL,
    role         TEXT NOT NULL DEFAULT 'Unknown',
    status       TEXT NOT NULL CHECK(status IN ('Present','On Leave','Absent')),
    photo_state  TEXT NOT NULL DEFAULT 'No Photo'
                 CHECK(photo_state IN ('Photo Uploaded','No Photo','Photo Upload Failed'))
);
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_attendance",
        step: Step::CreateTable {
            table: ATTENDANCE_TABLE,
            ddl: CREATE_ATTENDANCE,
        },
    },
    Migration {
        version: 2,
        name: "add_photo_path",
        step: Step::AddColumns {
            table: ATTENDANCE_TABLE,
            columns: &[("photo_path", "TEXT DEFAULT NULL")],
        },
    },
    Migration {
        version: 3,
        name: "add_coordinates",
        step: Step::AddColumns {
            table: ATTENDANCE_TABLE,
            columns: &[
                ("latitude", "REAL DEFAULT NULL"),
                ("longitude", "REAL DEFAULT NULL"),
            ],
        },
    },
    Migration {
        version: 4,
        name: "add_state",
        step: Step::AddColumns {
            table: ATTENDANCE_TABLE,
            columns: &[("state", "TEXT NOT NULL DEFAULT 'Unknown'")],
        },
    },
    Migration {
        version: 5,
        name: "unique_person_date",
        step: Step::CreateIndex {
            index: "idx_attendance_person_date",
            ddl: "CREATE UNIQUE INDEX idx_attendance_person_date ON attendance(person, date)",
        },
    },
    Migration {
        version: 6,
        name: "index_date",
        step: Step::CreateIndex {
            index: "idx_attendance_date",
            ddl: "CREATE INDEX idx_attendance_date ON attendance(date)",
        },
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn schema_object_exists(conn: &Connection, kind: &str, name: &str) -> AppResult<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = ?1 AND name = ?2",
            [kind, name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn table_exists(conn: &Connection, table: &str) -> AppResult<bool> {
    schema_object_exists(conn, "table", table)
}

pub fn table_columns(conn: &Connection, table: &str) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    let mut out = Vec::new();
    for c in cols {
        out.push(c?);
    }
    Ok(out)
}

/// Columns of an `AddColumns` step that are still missing.
fn missing_columns(
    conn: &Connection,
    table: &str,
    columns: &'static [(&'static str, &'static str)],
) -> AppResult<Vec<(&'static str, &'static str)>> {
    let present = table_columns(conn, table)?;
    Ok(columns
        .iter()
        .filter(|(name, _)| !present.iter().any(|p| p.eq_ignore_ascii_case(name)))
        .copied()
        .collect())
}

fn is_pending(conn: &Connection, step: &Step) -> AppResult<bool> {
    match step {
        Step::CreateTable { table, .. } => Ok(!table_exists(conn, table)?),
        Step::AddColumns { table, columns } => Ok(!missing_columns(conn, table, columns)?.is_empty()),
        Step::CreateIndex { index, .. } => Ok(!schema_object_exists(conn, "index", index)?),
    }
}

fn apply_step(conn: &Connection, step: &Step) -> AppResult<()> {
    match step {
        Step::CreateTable { ddl, .. } | Step::CreateIndex { ddl, .. } => {
            conn.execute_batch(ddl)?;
        }
        Step::AddColumns { table, columns } => {
            for (name, def) in missing_columns(conn, table, columns)? {
                conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {name} {def};"))?;
            }
        }
    }
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Each step runs in its own transaction together with its audit row, so a
/// failing step leaves the earlier ones applied and itself untouched.
pub fn run_pending_migrations(conn: &mut Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();

    for m in MIGRATIONS {
        if !is_pending(conn, &m.step)? {
            continue;
        }

        let tx = conn.transaction()?;
        apply_step(&tx, &m.step)
            .map_err(|e| AppError::Migration(format!("v{} {}: {}", m.version, m.name, e)))?;
        ttlog(
            &tx,
            "migration_applied",
            m.name,
            &format!("Schema migration v{} applied", m.version),
        )?;
        tx.commit()?;

        applied.push(m.name);
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn fresh() -> Connection {
        Connection::open_in_memory().expect("open in-memory db")
    }

    #[test]
    fn fresh_database_gets_every_step() {
        let mut conn = fresh();
        let applied = run_pending_migrations(&mut conn).unwrap();

        let names: Vec<&str> = MIGRATIONS.iter().map(|m| m.name).collect();
        assert_eq!(applied, names);

        let cols = table_columns(&conn, ATTENDANCE_TABLE).unwrap();
        for c in ["photo_path", "latitude", "longitude", "state"] {
            assert!(cols.iter().any(|x| x == c), "missing column {c}");
        }
    }

    #[test]
    fn second_run_is_a_no_op() {
        let mut conn = fresh();
        run_pending_migrations(&mut conn).unwrap();

        assert!(run_pending_migrations(&mut conn).unwrap().is_empty());
        assert!(run_pending_migrations(&mut conn).unwrap().is_empty());

        let logged: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(logged as usize, MIGRATIONS.len());
    }

    #[test]
    fn narrow_legacy_table_is_widened_without_touching_rows() {
        let mut conn = fresh();
        conn.execute_batch(
            "CREATE TABLE attendance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                date TEXT NOT NULL,
                person TEXT NOT NULL,
                role TEXT NOT NULL,
                status TEXT NOT NULL,
                photo_state TEXT NOT NULL,
                photo_path TEXT
            );",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO attendance (timestamp, date, person, role, status, photo_state, photo_path)
             VALUES (?1, ?2, ?3, 'CRP', 'Present', 'No Photo', NULL)",
            params!["2024-05-01T09:00:00+05:30", "2024-05-01", "Asha"],
        )
        .unwrap();

        let applied = run_pending_migrations(&mut conn).unwrap();
        assert_eq!(
            applied,
            vec!["add_coordinates", "add_state", "unique_person_date", "index_date"]
        );

        let (person, state, lat): (String, String, Option<f64>) = conn
            .query_row(
                "SELECT person, state, latitude FROM attendance WHERE id = 1",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(person, "Asha");
        assert_eq!(state, "Unknown");
        assert_eq!(lat, None);
    }

    #[test]
    fn partially_added_coordinates_only_add_the_missing_one() {
        let mut conn = fresh();
        conn.execute_batch(
            "CREATE TABLE attendance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                date TEXT NOT NULL,
                person TEXT NOT NULL,
                role TEXT NOT NULL,
                status TEXT NOT NULL,
                photo_state TEXT NOT NULL,
                latitude REAL
            );",
        )
        .unwrap();

        let applied = run_pending_migrations(&mut conn).unwrap();
        assert!(applied.contains(&"add_coordinates"));
        assert!(applied.contains(&"add_photo_path"));

        let cols = table_columns(&conn, ATTENDANCE_TABLE).unwrap();
        assert_eq!(cols.iter().filter(|c| *c == "latitude").count(), 1);
        assert!(cols.iter().any(|c| c == "longitude"));
    }

    #[test]
    fn existing_duplicates_block_the_unique_index() {
        let mut conn = fresh();
        conn.execute_batch(
            "CREATE TABLE attendance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                date TEXT NOT NULL,
                person TEXT NOT NULL,
                role TEXT NOT NULL,
                status TEXT NOT NULL,
                photo_state TEXT NOT NULL
            );
            INSERT INTO attendance (timestamp, date, person, role, status, photo_state)
            VALUES ('2024-05-01T09:00:00+05:30', '2024-05-01', 'Asha', 'CRP', 'Present', 'No Photo');
            INSERT INTO attendance (timestamp, date, person, role, status, photo_state)
            VALUES ('2024-05-01T11:00:00+05:30', '2024-05-01', 'Asha', 'CRP', 'Absent', 'No Photo');",
        )
        .unwrap();

        let err = run_pending_migrations(&mut conn).unwrap_err();
        assert!(matches!(err, AppError::Migration(ref m) if m.contains("unique_person_date")));

        // rows survive and the additive steps before the failure are kept
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM attendance", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);
        assert!(
            table_columns(&conn, ATTENDANCE_TABLE)
                .unwrap()
                .contains(&"state".to_string())
        );
    }
}
