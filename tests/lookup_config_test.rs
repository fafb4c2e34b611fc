//! Tests for CSV lookups and YAML configuration files

use aruco_classroom::{
    config::{Config, EXAMPLE_CONFIG},
    constants::UNKNOWN_PERSON_NAME,
    error::AppError,
    lookup::Lookups,
};
use std::{fs, path::PathBuf};

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_lookups_with_bom() {
    let dir = tempfile::tempdir().unwrap();
    let words = write(&dir, "id_words.csv", "\u{feff}id,word\n1,سیب\n2,کتاب\n");
    let users = write(&dir, "user_ids.csv", "\u{feff}id,firstname,lastname\n10,Sara,Ahmadi\n11,Ali,Karimi\n");

    let lookups = Lookups::load(&words, &users).unwrap();
    assert_eq!(lookups.card_count(), 2);
    assert_eq!(lookups.person_count(), 2);
    assert_eq!(lookups.word(2), Some("کتاب"));
    assert!(lookups.is_card(1));
    assert!(!lookups.is_card(10));
    assert!(lookups.is_person(11));
    assert_eq!(lookups.person_name(11), "Karimi");
    assert_eq!(lookups.person_name(99), UNKNOWN_PERSON_NAME);
}

#[test]
fn test_loaded_lookups_with_custom_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let words = write(&dir, "id_words.csv", "id,word\n1,apple\n");
    let users = write(&dir, "user_ids.csv", "id,lastname\n10,Ahmadi\n");

    let lookups = Lookups::load(&words, &users).unwrap().with_unknown_name("Guest");
    assert_eq!(lookups.person_name(10), "Ahmadi");
    assert_eq!(lookups.person_name(11), "Guest");
    assert_eq!(lookups.word(1), Some("apple"));
}

#[test]
fn test_missing_lookup_file() {
    let dir = tempfile::tempdir().unwrap();
    let users = write(&dir, "user_ids.csv", "id,lastname\n10,Ahmadi\n");
    let result = Lookups::load(dir.path().join("missing.csv"), &users);
    match result {
        Err(AppError::LookupError(msg)) => assert!(msg.contains("missing.csv")),
        other => panic!("Expected LookupError, got {other:?}"),
    }
}

#[test]
fn test_malformed_lookup_row_names_file() {
    let dir = tempfile::tempdir().unwrap();
    let words = write(&dir, "id_words.csv", "id,word\nx,apple\n");
    let users = write(&dir, "user_ids.csv", "id,lastname\n10,Ahmadi\n");
    match Lookups::load(&words, &users) {
        Err(AppError::LookupError(msg)) => assert!(msg.contains("id_words.csv")),
        other => panic!("Expected LookupError, got {other:?}"),
    }
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classroom.yaml");

    let mut config = Config::default();
    config.device.name = "Tablet-B".to_string();
    config.markers.student_zone_padding = 30;
    config.capture.replay = Some(PathBuf::from("recorded.jsonl"));
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.device.name, "Tablet-B");
    assert_eq!(loaded.markers.student_zone_padding, 30);
    assert_eq!(loaded.capture.replay, Some(PathBuf::from("recorded.jsonl")));
    loaded.validate().unwrap();
}

#[test]
fn test_example_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "example.yaml", EXAMPLE_CONFIG);
    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.notifier.channel_id, "ArUcoGame");
    assert!(config.notifier.pin);
    assert_eq!(config.lookups.unknown_person_name, UNKNOWN_PERSON_NAME);
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "bad.yaml", "markers: [not, a, map]\n");
    assert!(matches!(Config::from_file(&path), Err(AppError::ConfigError(_))));
}

#[test]
fn test_missing_config_is_io_error() {
    assert!(matches!(Config::from_file("/nonexistent/classroom.yaml"), Err(AppError::Io(_))));
}
