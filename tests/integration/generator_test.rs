//! Integration tests for CSV generation against real files

use chrono::{TimeZone, Utc};
use record_csv::config::{CellFailurePolicy, Dialect, GeneratorConfig, NullPolicy};
use record_csv::csv_handler::{Column, CsvGenerator, Record};
use record_csv::error::CsvExportError;
use tempfile::tempdir;

#[derive(Debug, Clone)]
struct Reading {
    sensor: String,
    taken_at: chrono::DateTime<Utc>,
    celsius: f64,
    note: Option<String>,
    calibration: Result<f64, String>,
    internal_id: u64,
}

impl Record for Reading {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("internal_id", |r: &Reading| r.internal_id).ignore(),
            Column::new("celsius", |r: &Reading| r.celsius).named("Temperature (C)"),
            Column::new("sensor", |r: &Reading| r.sensor.clone()).at(0),
            Column::optional("note", |r: &Reading| r.note.clone()),
            Column::new("taken_at", |r: &Reading| r.taken_at.format("%Y-%m-%dT%H:%M:%SZ"))
                .named("Timestamp")
                .at(1),
            Column::fallible("calibration", |r: &Reading| r.calibration.clone()),
        ]
    }
}

fn readings() -> Vec<Reading> {
    vec![
        Reading {
            sensor: "kitchen".to_string(),
            taken_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            celsius: 21.5,
            note: Some("stable".to_string()),
            calibration: Ok(0.25),
            internal_id: 9001,
        },
        Reading {
            sensor: "garage".to_string(),
            taken_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 31, 0).unwrap(),
            celsius: -3.0,
            note: None,
            calibration: Err("sensor offline".to_string()),
            internal_id: 9002,
        },
    ]
}

/// Test that the default configuration writes the ordered, filtered, relabeled output.
#[test]
fn test_generate_default_configuration() {
    let dir = tempdir().unwrap();
    let readings = readings();
    let generator = CsvGenerator::new(&readings).unwrap();

    let path = generator.generate(dir.path(), "readings").unwrap();
    let content = std::fs::read_to_string(path).unwrap();

    assert_eq!(
        content,
        "sensor, Timestamp, Temperature (C), note, calibration\n\
         kitchen, 2024-01-15T10:30:00Z, 21.5, stable, 0.25\n\
         garage, 2024-01-15T10:31:00Z, -3, , \n"
    );
    assert!(!content.contains("9001"));
}

/// Test that output has one line per record plus the header.
#[test]
fn test_generate_line_count_is_records_plus_one() {
    let dir = tempdir().unwrap();
    let readings: Vec<Reading> = readings().into_iter().cycle().take(25).collect();
    let generator = CsvGenerator::new(&readings).unwrap();

    let path = generator.generate(dir.path(), "many").unwrap();
    let content = std::fs::read_to_string(path).unwrap();
    assert_eq!(content.lines().count(), 26);
    assert!(content.ends_with('\n'));
    assert!(!content.ends_with("\n\n"));
}

/// Test that generating twice produces byte-identical files.
#[test]
fn test_generate_is_idempotent() {
    let dir = tempdir().unwrap();
    let readings = readings();
    let generator = CsvGenerator::new(&readings).unwrap();

    let path = generator.generate(dir.path(), "again").unwrap();
    let first = std::fs::read(&path).unwrap();
    generator.generate(dir.path(), "again").unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
}

/// Test that strict policies surface cell problems instead of degrading them.
#[test]
fn test_generate_strict_policies() {
    let dir = tempdir().unwrap();
    let readings = readings();

    let config = GeneratorConfig {
        on_null: NullPolicy::Abort,
        ..GeneratorConfig::default()
    };
    let generator = CsvGenerator::with_config(&readings, config).unwrap();
    let err = generator.generate(dir.path(), "strict").unwrap_err();
    assert!(matches!(err, CsvExportError::NullField { row: 1, .. }));

    let config = GeneratorConfig {
        on_unreadable: CellFailurePolicy::Abort,
        on_null: NullPolicy::Render {
            text: "-".to_string(),
        },
        ..GeneratorConfig::default()
    };
    let generator = CsvGenerator::with_config(&readings, config).unwrap();
    let err = generator.generate(dir.path(), "strict").unwrap_err();
    assert!(matches!(err, CsvExportError::FieldAccess { row: 1, .. }));
    assert!(err.to_string().contains("sensor offline"));

    assert!(!dir.path().join("strict.csv").exists());
}

/// Test that the RFC 4180 dialect produces output the csv crate reads back.
#[test]
fn test_generate_rfc4180_reads_back() {
    let dir = tempdir().unwrap();
    let mut readings = readings();
    readings[0].note = Some("door open, \"draft\"".to_string());

    let config = GeneratorConfig {
        dialect: Dialect::Rfc4180,
        ..GeneratorConfig::default()
    };
    let generator = CsvGenerator::with_config(&readings, config).unwrap();
    let path = generator.generate(dir.path(), "quoted").unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["sensor", "Timestamp", "Temperature (C)", "note", "calibration"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][3], "door open, \"draft\"");
    assert_eq!(&rows[1][0], "garage");
}

/// Test that an unwritable destination is reported as a sink error.
#[test]
fn test_generate_into_file_path_is_sink_error() {
    let dir = tempdir().unwrap();
    let not_a_dir = dir.path().join("plain-file");
    std::fs::write(&not_a_dir, "x").unwrap();

    let readings = readings();
    let generator = CsvGenerator::new(&readings).unwrap();
    let err = generator.generate(&not_a_dir, "readings").unwrap_err();
    assert!(matches!(err, CsvExportError::SinkWrite { .. }));
}

/// Test that the writer sink and file sink receive the same bytes.
#[test]
fn test_write_to_matches_generated_file() {
    let dir = tempdir().unwrap();
    let readings = readings();
    let generator = CsvGenerator::new(&readings).unwrap();

    let mut buffer = Vec::new();
    generator.write_to(&mut buffer).unwrap();
    let path = generator.generate(dir.path(), "same").unwrap();

    assert_eq!(buffer, std::fs::read(path).unwrap());
}
