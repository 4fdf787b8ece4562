#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{FixedOffset, NaiveDate, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated home, database and photo directory for one test.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn home(&self) -> &Path {
        self.dir.path()
    }

    pub fn db(&self) -> String {
        self.path("attendance.sqlite")
    }

    pub fn photos(&self) -> PathBuf {
        self.dir.path().join("photos")
    }

    /// Absolute path of a file inside the test directory.
    pub fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().to_string()
    }

    /// The binary with HOME pointed at the test dir and explicit paths.
    pub fn rat(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rattendance");
        cmd.env("HOME", self.home())
            .env("APPDATA", self.home())
            .args([
                "--db",
                &self.db(),
                "--photos",
                &self.photos().to_string_lossy(),
            ]);
        cmd
    }

    /// `--test init`: schema and photo dir, no config file.
    pub fn init(&self) {
        self.rat().args(["--test", "init"]).assert().success();
    }

    /// Write a fake image next to the database and return its path.
    pub fn image(&self, name: &str, bytes: &[u8]) -> String {
        let p = self.path(name);
        fs::write(&p, bytes).expect("write image");
        p
    }

    pub fn mark(&self, person: &str, status: &str) {
        self.rat()
            .args(["mark", "--person", person, "--status", status])
            .assert()
            .success();
    }

    pub fn photo_files(&self) -> usize {
        fs::read_dir(self.photos()).map(|d| d.count()).unwrap_or(0)
    }
}

/// Attendance day as the binary computes it (default zone +05:30).
pub fn today() -> NaiveDate {
    let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("offset");
    Utc::now().with_timezone(&ist).date_naive()
}
