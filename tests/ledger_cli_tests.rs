mod common;

use common::{TestEnv, today};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

#[test]
fn test_init_runs_migrations_once() {
    let env = TestEnv::new();

    env.rat()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("Applied schema migration: create_attendance"))
        .stdout(contains("unique_person_date"));

    env.rat()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("Applied schema migration").not());

    assert!(env.photos().is_dir());
    assert!(!env.home().join(".rattendance").join("rattendance.conf").exists());
}

#[test]
fn test_init_writes_config_outside_test_mode() {
    let env = TestEnv::new();
    env.rat().arg("init").assert().success();

    let conf = env.home().join(".rattendance").join("rattendance.conf");
    let text = std::fs::read_to_string(conf).unwrap();
    assert!(text.contains("utc_offset"));
    assert!(text.contains(&env.db()));

    env.rat()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("roster"));
}

#[test]
fn test_roster_lists_people() {
    let env = TestEnv::new();

    env.rat()
        .arg("roster")
        .assert()
        .success()
        .stdout(contains("Asha"))
        .stdout(contains("Maharashtra"));

    env.rat()
        .args(["roster", "--state", "rajasthan"])
        .assert()
        .success()
        .stdout(contains("Meena"))
        .stdout(contains("Asha").not());
}

#[test]
fn test_second_mark_same_day_is_a_notice() {
    let env = TestEnv::new();
    env.init();

    env.rat()
        .args(["mark", "--person", "Asha", "--status", "present"])
        .assert()
        .success()
        .stdout(contains("Attendance marked for Asha"))
        .stdout(contains("record #1"));

    env.rat()
        .args(["mark", "--person", "Asha", "--status", "absent"])
        .assert()
        .success()
        .stdout(contains("already marked attendance"));

    env.rat()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("1 record(s)"))
        .stdout(contains("Present"))
        .stdout(contains(today().format("%Y-%m-%d").to_string()));
}

#[test]
fn test_unknown_person_is_rejected() {
    let env = TestEnv::new();
    env.init();

    env.rat()
        .args(["mark", "--person", "Nobody", "--status", "present"])
        .assert()
        .failure()
        .stderr(contains("Unknown person: Nobody"));
}

#[test]
fn test_mark_with_photo_and_coordinates() {
    let env = TestEnv::new();
    env.init();
    let img = env.image("selfie.jpg", b"\xff\xd8jpeg");

    env.rat()
        .args([
            "mark", "--person", "Ravi", "--status", "On Leave", "--photo", &img, "--lat",
            "-23.5", "--lon", "72.25",
        ])
        .assert()
        .success();

    assert_eq!(env.photo_files(), 1);

    env.rat()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Photo Uploaded"))
        .stdout(contains("-23.50000, 72.25000"))
        .stdout(contains("On Leave"));
}

#[test]
fn test_edit_changes_fields() {
    let env = TestEnv::new();
    env.init();
    env.mark("Asha", "Present");

    env.rat()
        .args(["edit", "1", "--status", "On Leave", "--state", "Bihar"])
        .assert()
        .success()
        .stdout(contains("Record #1 updated"));

    env.rat()
        .args(["list", "--state", "Bihar"])
        .assert()
        .success()
        .stdout(contains("On Leave"))
        .stdout(contains("Asha"));

    env.rat()
        .args(["edit", "42", "--status", "Absent"])
        .assert()
        .failure()
        .stderr(contains("#42 not found"));
}

#[test]
fn test_delete_removes_record_and_photo() {
    let env = TestEnv::new();
    env.init();
    let img = env.image("a.png", b"png");

    env.rat()
        .args(["mark", "--person", "Meena", "--status", "Present", "--photo", &img])
        .assert()
        .success();
    assert_eq!(env.photo_files(), 1);

    // declined prompt keeps everything
    env.rat()
        .args(["del", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));
    assert_eq!(env.photo_files(), 1);

    env.rat()
        .args(["del", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("Record #1 has been deleted"))
        .stdout(contains("Photo removed"));
    assert_eq!(env.photo_files(), 0);

    env.rat()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No attendance records found"));

    env.rat()
        .args(["del", "1", "--yes"])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn test_list_range_filters_by_day() {
    let env = TestEnv::new();
    env.init();
    env.mark("Asha", "Present");
    env.mark("Suresh", "Absent");

    let day = today().format("%Y-%m-%d").to_string();
    env.rat()
        .args(["list", "--range", &day, "--person", "Suresh"])
        .assert()
        .success()
        .stdout(contains("Suresh"))
        .stdout(contains("Asha").not())
        .stdout(contains("Absent: 1"));

    env.rat()
        .args(["list", "--range", "2001"])
        .assert()
        .success()
        .stdout(contains("No attendance records found"));

    env.rat()
        .args(["list", "--today"])
        .assert()
        .success()
        .stdout(contains("2 record(s)"));
}

#[test]
fn test_log_print_shows_operations() {
    let env = TestEnv::new();
    env.init();
    env.mark("Asha", "Present");
    env.rat().args(["edit", "1", "--status", "Absent"]).assert().success();

    env.rat()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("mark"))
        .stdout(contains("update"));
}
