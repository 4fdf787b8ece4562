//! The attendance ledger: single source of truth for attendance records.
//!
//! Holds the one-record-per-person-per-day rule (enforced by the unique
//! `(person, date)` index at insert time), the schema, and every mutation.

use crate::core::clock::Clock;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{AttendanceRecord, NewRecord, PhotoState, RecordChanges};
use crate::photos::PhotoStore;
use crate::ui::messages::warning;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// What happened to the photo file of a deleted record.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoCleanup {
    NoPhoto,
    Removed(PathBuf),
    /// The record is gone but the file could not be removed.
    Failed { path: PathBuf, reason: String },
}

impl PhotoCleanup {
    /// Best-effort removal of `path` from the store, reported instead of raised.
    pub fn remove(photos: &PhotoStore, path: PathBuf) -> Self {
        match photos.delete(&path) {
            Ok(()) => PhotoCleanup::Removed(path),
            Err(e) => PhotoCleanup::Failed {
                path,
                reason: e.to_string(),
            },
        }
    }
}

pub struct Ledger {
    pool: DbPool,
    photos: PhotoStore,
    clock: Box<dyn Clock>,
}

impl Ledger {
    pub fn open(db_path: &str, photos: PhotoStore, clock: Box<dyn Clock>) -> AppResult<Self> {
        Ok(Self {
            pool: DbPool::new(db_path)?,
            photos,
            clock,
        })
    }

    pub fn in_memory(photos: PhotoStore, clock: Box<dyn Clock>) -> AppResult<Self> {
        Ok(Self {
            pool: DbPool::in_memory()?,
            photos,
            clock,
        })
    }

    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    /// Bring schema and photo directory up to date. Safe on every start;
    /// returns the migration steps that actually ran.
    pub fn initialize(&mut self) -> AppResult<Vec<&'static str>> {
        let applied = init_db(&mut self.pool.conn)?;
        self.photos.ensure_dir()?;
        Ok(applied)
    }

    /// Detached copy of every record.
    pub fn load_all(&self) -> AppResult<Vec<AttendanceRecord>> {
        queries::load_all(&self.pool.conn, self.clock.offset())
    }

    pub fn get(&self, id: i64) -> AppResult<AttendanceRecord> {
        queries::load_by_id(&self.pool.conn, id, self.clock.offset())?
            .ok_or(AppError::RecordNotFound(id))
    }

    /// Insert a new entry stamped with the clock's "now".
    ///
    /// Fails with `DuplicateForDay` when the person already has an entry for
    /// the current local day; the check is the storage engine's unique index,
    /// evaluated atomically with the insert.
    pub fn mark(&mut self, rec: NewRecord) -> AppResult<i64> {
        let now = self.clock.now_in_fixed_zone();
        let date = now.date_naive();

        let id = queries::insert_record(&self.pool.conn, &now, date, &rec)?;

        self.audit(
            "mark",
            &id.to_string(),
            &format!("{} marked {} on {}", rec.person, rec.status, date),
        );
        Ok(id)
    }

    /// Apply a subset of mutable-field changes to one record.
    pub fn update(&mut self, id: i64, changes: &RecordChanges) -> AppResult<()> {
        let touched = queries::update_record(&self.pool.conn, id, changes)?;
        if touched == 0 {
            return Err(AppError::RecordNotFound(id));
        }

        if !changes.is_empty() {
            self.audit("update", &id.to_string(), &format!("{changes:?}"));
        }
        Ok(())
    }

    /// Point a record at a (new) photo file, or at none.
    pub fn set_photo(
        &mut self,
        id: i64,
        photo_state: PhotoState,
        photo_path: Option<&Path>,
    ) -> AppResult<()> {
        let path = photo_path.map(|p| p.to_string_lossy().to_string());
        let touched = queries::set_photo(&self.pool.conn, id, photo_state, path.as_deref())?;
        if touched == 0 {
            return Err(AppError::RecordNotFound(id));
        }

        self.audit(
            "photo",
            &id.to_string(),
            &format!("{photo_state}: {}", path.as_deref().unwrap_or("-")),
        );
        Ok(())
    }

    /// Remove a record and, best effort, its photo file.
    ///
    /// The two removals are independent: a file that cannot be deleted is
    /// reported in the returned `PhotoCleanup`, never as an error.
    pub fn delete(&mut self, id: i64) -> AppResult<PhotoCleanup> {
        let photo_path =
            queries::load_photo_path(&self.pool.conn, id)?.ok_or(AppError::RecordNotFound(id))?;

        let cleanup = match photo_path {
            None => PhotoCleanup::NoPhoto,
            Some(p) => PhotoCleanup::remove(&self.photos, PathBuf::from(p)),
        };

        if queries::delete_record(&self.pool.conn, id)? == 0 {
            return Err(AppError::RecordNotFound(id));
        }

        let note = match &cleanup {
            PhotoCleanup::Failed { path, reason } => {
                format!("photo {} not removed: {}", path.display(), reason)
            }
            _ => "deleted".to_string(),
        };
        self.audit("delete", &id.to_string(), &note);

        Ok(cleanup)
    }

    /// Audit rows never fail the operation that triggered them.
    fn audit(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = ttlog(&self.pool.conn, operation, target, message) {
            warning(format!("Failed to write internal log: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::export::filter::ReportFilter;
    use crate::models::{RecordTime, Role, Status, Stored};
    use chrono::NaiveDate;

    fn clock(ts: &str) -> Box<dyn Clock> {
        Box::new(FixedClock::parse(ts).unwrap())
    }

    fn ledger_at(ts: &str) -> (tempfile::TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let photos = PhotoStore::new(dir.path().join("photos"));
        let mut ledger = Ledger::in_memory(photos, clock(ts)).unwrap();
        ledger.initialize().unwrap();
        (dir, ledger)
    }

    /// Ledger over a table created before CHECK constraints and extra columns.
    fn legacy_ledger(rows: &str) -> (tempfile::TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("legacy.sqlite");
        let conn = Connection::open(&db).unwrap();
        conn.execute_batch(&format!(
            "CREATE TABLE attendance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                date TEXT NOT NULL,
                person TEXT NOT NULL,
                role TEXT NOT NULL,
                status TEXT NOT NULL,
                photo_state TEXT NOT NULL
            );
            {rows}"
        ))
        .unwrap();
        drop(conn);

        let photos = PhotoStore::new(dir.path().join("photos"));
        let mut ledger = Ledger::open(
            &db.to_string_lossy(),
            photos,
            clock("2024-05-01T09:00:00+05:30"),
        )
        .unwrap();
        ledger.initialize().unwrap();
        (dir, ledger)
    }

    fn asha() -> NewRecord {
        NewRecord::new("Asha", Role::Crp, Status::Present).with_state("Gujarat")
    }

    #[test]
    fn mark_update_and_duplicate_scenario() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:15:00+05:30");

        let id = ledger.mark(asha()).unwrap();
        assert_eq!(id, 1);

        ledger.set_clock(clock("2024-05-01T17:40:00+05:30"));
        let mut again = asha();
        again.status = Status::Absent;
        let err = ledger.mark(again).unwrap_err();
        assert!(err.is_duplicate());
        assert!(!err.is_storage());

        ledger.update(1, &RecordChanges::status(Status::OnLeave)).unwrap();

        let all = ledger.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 1);
        assert_eq!(all[0].status, Status::OnLeave);
        assert_eq!(all[0].date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(all[0].state, "Gujarat");
    }

    #[test]
    fn local_day_follows_the_fixed_offset() {
        // 18:40 UTC on April 30th is already May 1st at +05:30
        let (_dir, mut ledger) = ledger_at("2024-05-01T00:10:00+05:30");
        let id = ledger.mark(asha()).unwrap();

        let rec = ledger.get(id).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(rec.timestamp.as_datetime().unwrap().offset().local_minus_utc(), 19800);
    }

    #[test]
    fn next_day_and_other_person_are_accepted() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        ledger.mark(asha()).unwrap();
        ledger
            .mark(NewRecord::new("Ravi", Role::Fa, Status::Present))
            .unwrap();

        ledger.set_clock(clock("2024-05-02T09:00:00+05:30"));
        ledger.mark(asha()).unwrap();

        let all = ledger.load_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.iter().filter(|r| r.person == "Asha").count(), 2);
    }

    #[test]
    fn defaults_for_optional_fields() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        let id = ledger
            .mark(NewRecord::new("Ravi", Role::Fa, Status::Absent))
            .unwrap();

        let rec = ledger.get(id).unwrap();
        assert_eq!(rec.state, "Unknown");
        assert_eq!(rec.photo_state, PhotoState::NoPhoto);
        assert_eq!(rec.photo_path, None);
        assert_eq!(rec.latitude, None);
    }

    #[test]
    fn empty_ledger_loads_as_empty_snapshot() {
        let (_dir, ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        assert!(ledger.load_all().unwrap().is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        let id = ledger.mark(asha()).unwrap();

        let snapshot = ledger.load_all().unwrap();
        ledger.update(id, &RecordChanges::status(Status::Absent)).unwrap();
        ledger.delete(id).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].status, Status::Present);
    }

    #[test]
    fn update_and_delete_unknown_id_are_not_found() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");

        let err = ledger
            .update(42, &RecordChanges::status(Status::Absent))
            .unwrap_err();
        assert!(matches!(err, AppError::RecordNotFound(42)));

        assert!(ledger.update(42, &RecordChanges::default()).unwrap_err().is_not_found());
        assert!(ledger.delete(42).unwrap_err().is_not_found());
    }

    #[test]
    fn update_can_clear_coordinates_and_edit_role_state() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        let id = ledger
            .mark(asha().with_coords(Some(23.02), Some(72.57)))
            .unwrap();

        let changes = RecordChanges {
            role: Some(Role::Fa),
            state: Some("Rajasthan".into()),
            latitude: Some(None),
            longitude: Some(None),
            ..Default::default()
        };
        ledger.update(id, &changes).unwrap();

        let rec = ledger.get(id).unwrap();
        assert_eq!(rec.role, Role::Fa);
        assert_eq!(rec.state, "Rajasthan");
        assert_eq!(rec.latitude, None);
        assert_eq!(rec.longitude, None);
        assert_eq!(rec.status, Status::Present);
    }

    #[test]
    fn renaming_onto_an_existing_day_is_rejected() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        ledger.mark(asha()).unwrap();
        let ravi = ledger
            .mark(NewRecord::new("Ravi", Role::Fa, Status::Present))
            .unwrap();

        let err = ledger
            .update(
                ravi,
                &RecordChanges {
                    person: Some("Asha".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(ledger.get(ravi).unwrap().person, "Ravi");
        match err {
            AppError::DuplicateForDay { person, date } => {
                assert_eq!(person, "Asha");
                assert_eq!(Some(date), NaiveDate::from_ymd_opt(2024, 5, 1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rename_conflict_on_an_undated_row_is_a_storage_error() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        ledger
            .conn()
            .execute_batch(
                "INSERT INTO attendance (timestamp, date, person, role, status, photo_state)
                 VALUES ('2024-05-01T09:00:00+05:30', 'n/a', 'Asha', 'CRP', 'Present', 'No Photo');
                 INSERT INTO attendance (timestamp, date, person, role, status, photo_state)
                 VALUES ('2024-05-01T09:05:00+05:30', 'n/a', 'Ravi', 'FA', 'Present', 'No Photo');",
            )
            .unwrap();

        let err = ledger
            .update(
                2,
                &RecordChanges {
                    person: Some("Asha".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(!err.is_duplicate());
        assert!(err.is_storage());
    }

    #[test]
    fn delete_removes_record_and_photo() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        let path = ledger.photos().save(b"img", "asha.jpg").unwrap();

        let id = ledger
            .mark(asha().with_photo(
                PhotoState::Uploaded,
                Some(path.to_string_lossy().to_string()),
            ))
            .unwrap();

        let cleanup = ledger.delete(id).unwrap();
        assert_eq!(cleanup, PhotoCleanup::Removed(path.clone()));
        assert!(ledger.photos().read(&path).unwrap_err().is_not_found());
        assert!(ledger.load_all().unwrap().iter().all(|r| r.id != id));
    }

    #[test]
    fn delete_with_already_missing_photo_still_succeeds() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        let path = ledger.photos().save(b"img", "asha.jpg").unwrap();
        let id = ledger
            .mark(asha().with_photo(
                PhotoState::Uploaded,
                Some(path.to_string_lossy().to_string()),
            ))
            .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(ledger.delete(id).unwrap(), PhotoCleanup::Removed(_)));
        assert!(ledger.load_all().unwrap().is_empty());
    }

    #[test]
    fn undeletable_photo_is_reported_not_propagated() {
        let (dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        // a non-empty directory cannot be removed with remove_file
        let stuck = dir.path().join("stuck.jpg");
        std::fs::create_dir_all(stuck.join("inner")).unwrap();

        let id = ledger
            .mark(asha().with_photo(
                PhotoState::Uploaded,
                Some(stuck.to_string_lossy().to_string()),
            ))
            .unwrap();

        let cleanup = ledger.delete(id).unwrap();
        assert!(matches!(cleanup, PhotoCleanup::Failed { .. }));
        assert!(ledger.get(id).unwrap_err().is_not_found());
    }

    #[test]
    fn photo_cleanup_reports_instead_of_failing() {
        let (dir, ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        let stuck = dir.path().join("stuck.jpg");
        std::fs::create_dir_all(stuck.join("inner")).unwrap();
        let saved = ledger.photos().save(b"img", "asha.jpg").unwrap();

        match PhotoCleanup::remove(ledger.photos(), stuck.clone()) {
            PhotoCleanup::Failed { path, reason } => {
                assert_eq!(path, stuck);
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected cleanup: {other:?}"),
        }
        assert_eq!(
            PhotoCleanup::remove(ledger.photos(), saved.clone()),
            PhotoCleanup::Removed(saved.clone())
        );
        assert!(!saved.exists());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        let first = ledger.mark(asha()).unwrap();
        ledger.delete(first).unwrap();

        let second = ledger.mark(asha()).unwrap();
        assert!(second > first);
    }

    #[test]
    fn initialize_twice_changes_nothing_and_creates_photo_dir() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        assert!(ledger.photos().root().is_dir());

        assert!(ledger.initialize().unwrap().is_empty());
        assert!(ledger.initialize().unwrap().is_empty());
    }

    #[test]
    fn malformed_timestamp_does_not_abort_the_load() {
        let (_dir, mut ledger) = ledger_at("2024-05-01T09:00:00+05:30");
        ledger.mark(asha()).unwrap();
        ledger
            .conn()
            .execute(
                "INSERT INTO attendance (timestamp, date, person, role, status, photo_state)
                 VALUES ('yesterday-ish', '2024-04-30', 'Ravi', 'FA', 'Present', 'No Photo')",
                [],
            )
            .unwrap();

        let all = ledger.load_all().unwrap();
        assert_eq!(all.len(), 2);
        let ravi = all.iter().find(|r| r.person == "Ravi").unwrap();
        assert_eq!(ravi.timestamp, RecordTime::Unparseable("yesterday-ish".into()));
        assert!(!ravi.is_dated());
    }

    #[test]
    fn legacy_status_outside_the_set_still_loads() {
        let (_dir, mut ledger) = legacy_ledger(
            "INSERT INTO attendance (timestamp, date, person, role, status, photo_state) VALUES
                ('2024-04-01 09:00:00', '2024-04-01', 'Asha', 'CRP', 'Leave', 'No Photo'),
                ('2024-04-01 09:30:00', '2024-04-01', 'Ravi', 'FA', 'Present', 'Yes');",
        );

        let all = ledger.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].status, Stored::<Status>::Unrecognized("Leave".into()));
        assert_eq!(all[0].status.to_string(), "Leave");
        assert_eq!(all[0].photo_state, PhotoState::NoPhoto);
        assert_eq!(all[1].status, Status::Present);
        assert_eq!(all[1].photo_state.to_db_str(), "Yes");

        // an edit brings the value back into the closed set
        ledger
            .update(all[0].id, &RecordChanges::status(Status::OnLeave))
            .unwrap();
        assert_eq!(ledger.get(all[0].id).unwrap().status, Status::OnLeave);
    }

    #[test]
    fn offsetless_timestamps_take_the_register_offset() {
        let (_dir, ledger) = legacy_ledger(
            "INSERT INTO attendance (timestamp, date, person, role, status, photo_state)
             VALUES ('2024-04-01 09:00:00', '2024-04-01', 'Asha', 'CRP', 'Present', 'No Photo');",
        );

        let all = ledger.load_all().unwrap();
        let rec = &all[0];
        assert!(rec.is_dated());
        assert_eq!(
            rec.timestamp.as_datetime().unwrap().to_rfc3339(),
            "2024-04-01T09:00:00+05:30"
        );

        let day = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let kept = ReportFilter::default().with_range(day, day).apply(&all);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn two_connections_cannot_both_mark_the_same_day() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("shared.sqlite");
        let db = db.to_string_lossy();
        let photos = PhotoStore::new(dir.path().join("photos"));

        let mut a = Ledger::open(&db, photos.clone(), clock("2024-05-01T09:00:00+05:30")).unwrap();
        a.initialize().unwrap();
        let mut b = Ledger::open(&db, photos, clock("2024-05-01T09:00:01+05:30")).unwrap();
        b.initialize().unwrap();

        let first = a.mark(asha());
        let second = b.mark(asha());

        assert!(first.is_ok());
        assert!(second.unwrap_err().is_duplicate());
        assert_eq!(a.load_all().unwrap().len(), 1);
    }
}
