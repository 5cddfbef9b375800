use bolus_config::{load_history_csv, load_readings_csv};
use std::fs;
use std::io::Write;
use tempfile::tempdir;

#[test]
fn loads_history_rows_in_file_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.csv");
    let mut f = fs::File::create(&path).unwrap();
    writeln!(f, "timestamp,dose").unwrap();
    writeln!(f, "2024-03-01T06:00:00Z,2.5").unwrap();
    writeln!(f, "2024-03-01T07:30:00Z, 4.0").unwrap();

    let rows = load_history_csv(&path).expect("load history");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].dose, 2.5);
    assert_eq!(rows[1].dose, 4.0);
    assert!(rows[0].timestamp < rows[1].timestamp);
}

#[test]
fn empty_history_is_allowed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(&path, "timestamp,dose\n").unwrap();
    assert!(load_history_csv(&path).unwrap().is_empty());
}

#[test]
fn history_rejects_wrong_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(&path, "time,units\n2024-03-01T06:00:00Z,2.5\n").unwrap();
    let err = load_history_csv(&path).expect_err("bad headers");
    assert!(format!("{err}").contains("must have headers 'timestamp,dose'"));
}

#[test]
fn history_reports_row_of_bad_timestamp() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(
        &path,
        "timestamp,dose\n2024-03-01T06:00:00Z,2.5\nyesterday,1.0\n",
    )
    .unwrap();
    let err = load_history_csv(&path).expect_err("bad timestamp");
    let msg = format!("{err}");
    assert!(msg.contains("row 3"), "{msg}");
    assert!(msg.contains("bad timestamp"), "{msg}");
}

#[test]
fn history_reports_row_of_bad_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(&path, "timestamp,dose\n2024-03-01T06:00:00Z,two\n").unwrap();
    let err = load_history_csv(&path).expect_err("bad dose");
    assert!(format!("{err}").contains("row 2"));
}

#[test]
fn loads_readings_with_glucose_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cgm.csv");
    fs::write(
        &path,
        "timestamp,glucose\n2024-03-01T07:55:00Z,150\n2024-03-01T08:00:00Z,160\n",
    )
    .unwrap();
    let rows = load_readings_csv(&path).expect("load readings");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].glucose, 160.0);
}

#[test]
fn readings_reject_history_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cgm.csv");
    fs::write(&path, "timestamp,dose\n2024-03-01T07:55:00Z,150\n").unwrap();
    assert!(load_readings_csv(&path).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = load_history_csv(&dir.path().join("nope.csv")).expect_err("missing");
    assert!(format!("{err}").contains("open CSV"));
}
