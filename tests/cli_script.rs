use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

const DATASET: &str = r#"{
  "line_items": [
    { "id": "LES003", "owner_id": "STU001", "price": "150", "date": "2026-01-22" },
    { "id": "LES001", "owner_id": "STU001", "price": "150", "date": "2026-01-15" },
    { "id": "LES002", "owner_id": "STU001", "price": "180", "date": "2026-01-18" },
    { "id": "LES900", "owner_id": "STU002", "price": "95", "date": "2026-01-10" }
  ],
  "availability": [
    { "owner_id": "TCH001", "day": "Monday", "available": true, "start": "08:00", "end": "16:00" },
    { "owner_id": "TCH001", "day": "Monday", "available": true, "start": "15:00", "end": "17:00" },
    { "owner_id": "TCH002", "day": "Tuesday", "available": false }
  ]
}"#;

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("dataset.json"), DATASET).unwrap();
    dir
}

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tutordesk_cli").unwrap();
    cmd.env("TUTORDESK_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn allocate_reports_coverage_and_credit() {
    let dir = workspace();
    let dataset = dir.path().join("dataset.json");
    cli(&dir)
        .args(["allocate", dataset.to_str().unwrap(), "STU001", "400"])
        .assert()
        .success()
        .stdout(contains("Covered 2 item(s): 330.00 applied, remaining credit 70.00 USD"))
        .stdout(contains("LES003"));
}

#[test]
fn invalid_amount_is_a_warning_not_a_failure() {
    let dir = workspace();
    let dataset = dir.path().join("dataset.json");
    cli(&dir)
        .args(["allocate", dataset.to_str().unwrap(), "STU001", "lots"])
        .assert()
        .success()
        .stdout(contains("WARNING"))
        .stdout(contains("Covered 0 item(s)"));
}

#[test]
fn conflicts_lists_flagged_intervals() {
    let dir = workspace();
    let dataset = dir.path().join("dataset.json");
    cli(&dir)
        .args(["conflicts", dataset.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("CONFLICT"))
        .stdout(contains("2 of 3 interval(s) in conflict"));
}

#[test]
fn check_interval_accepts_and_rejects() {
    let dir = workspace();
    let dataset = dir.path().join("dataset.json");
    let path = dataset.to_str().unwrap();

    cli(&dir)
        .args(["check-interval", path, "TCH001", "Monday", "14:00", "20:00"])
        .assert()
        .code(3)
        .stderr(contains("overlaps existing interval"));

    cli(&dir)
        .args(["check-interval", path, "TCH002", "Monday", "14:00", "20:00"])
        .assert()
        .success()
        .stdout(contains("interval accepted: TCH002 Mon 14:00-20:00"));
}

#[test]
fn usage_errors_exit_with_code_two() {
    let dir = workspace();
    cli(&dir).args(["frobnicate"]).assert().code(2).stderr(contains("usage:"));
}

#[test]
fn missing_dataset_fails() {
    let dir = workspace();
    let missing = dir.path().join("nope.json");
    cli(&dir)
        .args(["conflicts", missing.to_str().unwrap()])
        .assert()
        .code(1);
}

#[test]
fn version_reports_package_version() {
    let dir = workspace();
    cli(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(concat!("tutordesk_cli ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn datasets_with_repeated_item_ids_are_refused() {
    let dir = workspace();
    let dataset = dir.path().join("repeated.json");
    std::fs::write(
        &dataset,
        r#"{ "line_items": [
            { "id": "LES001", "owner_id": "STU", "price": "100", "date": "2026-01-01" },
            { "id": "LES001", "owner_id": "STU", "price": "500", "date": "2026-01-20" }
        ] }"#,
    )
    .unwrap();
    cli(&dir)
        .args(["allocate", dataset.to_str().unwrap(), "STU", "100"])
        .assert()
        .code(1)
        .stderr(contains("`LES001` already exists"));
}
