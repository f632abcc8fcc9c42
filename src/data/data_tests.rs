//! Tests for the reference dataset loader.

use super::*;
use std::io::Write;

const CRIME_CSV: &str = "\
STATE/UT,DISTRICT,YEAR,MURDER
Tamil Nadu,Chennai,2001,12
Tamil Nadu,Madurai,2001,4
Kerala,Kochi,2001,3
Tamil Nadu,Chennai,2002,9
";

#[test]
fn test_from_reader_keeps_file_order() {
    let ds = ReferenceDataset::from_reader(CRIME_CSV.as_bytes()).expect("valid csv");
    assert_eq!(ds.n_rows(), 4);
    assert_eq!(ds.rows()[0], LocationRow::new("Tamil Nadu", "Chennai"));
    assert_eq!(ds.rows()[2], LocationRow::new("Kerala", "Kochi"));
    assert_eq!(ds.rows()[3], LocationRow::new("Tamil Nadu", "Chennai"));
}

#[test]
fn test_from_reader_columns_in_any_position() {
    let csv = "YEAR,DISTRICT,STATE/UT\n2001,Kochi,Kerala\n";
    let ds = ReferenceDataset::from_reader(csv.as_bytes()).expect("valid csv");
    assert_eq!(ds.rows(), &[LocationRow::new("Kerala", "Kochi")]);
}

#[test]
fn test_from_reader_missing_district_column() {
    let csv = "STATE/UT,YEAR\nKerala,2001\n";
    let err = ReferenceDataset::from_reader(csv.as_bytes()).unwrap_err();
    assert!(err.contains("DISTRICT"), "got: {err}");
}

#[test]
fn test_from_reader_ragged_row_fails() {
    let csv = "STATE/UT,DISTRICT\nKerala,Kochi\nKerala\n";
    assert!(ReferenceDataset::from_reader(csv.as_bytes()).is_err());
}

#[test]
fn test_from_reader_header_only() {
    let ds = ReferenceDataset::from_reader("STATE/UT,DISTRICT\n".as_bytes()).expect("valid csv");
    assert!(ds.is_empty());
}

#[test]
fn test_from_reader_quoted_values() {
    let csv = "STATE/UT,DISTRICT\n\"A & N Islands\",\"Andaman, North\"\n";
    let ds = ReferenceDataset::from_reader(csv.as_bytes()).expect("valid csv");
    assert_eq!(ds.rows()[0].district, "Andaman, North");
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(CRIME_CSV.as_bytes()).expect("write csv");

    let ds = ReferenceDataset::load(file.path()).expect("load");
    assert_eq!(ds.n_rows(), 4);
}

#[test]
fn test_load_missing_file_is_startup_failure() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ReferenceDataset::load(dir.path().join("crime.csv")).unwrap_err();
    assert!(matches!(
        err,
        CrimeRiskError::StartupLoadFailure {
            artifact: Artifact::Dataset,
            ..
        }
    ));
}
