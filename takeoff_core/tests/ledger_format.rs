//! On-disk shape of `.tko` ledger files.

use std::env::temp_dir;
use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use takeoff_core::calculations::{SystemClock, Strictness};
use takeoff_core::ledger::SCHEMA_VERSION;
use takeoff_core::{
    assemble, load_ledger, save_ledger, CalcError, CalculationStore, Element, Ledger, Project,
    ProjectStore,
};

fn temp_ledger(name: &str) -> PathBuf {
    temp_dir().join(format!("takeoff_fmt_{}_{}.tko", name, std::process::id()))
}

#[test]
fn saved_ledger_uses_kebab_case_names() {
    let path = temp_ledger("kebab");

    let mut ledger = Ledger::new();
    let project = ledger.insert(Project::new("Shed", "", "")).unwrap();
    let record = assemble(
        project,
        Element::leveling_wall(3.0, 2.7, 0.02),
        Strictness::Strict,
        &SystemClock,
    )
    .unwrap();
    ledger.save(record).unwrap();
    save_ledger(&ledger, &path).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["version"], SCHEMA_VERSION);
    assert_eq!(raw["settings"]["strictness"], "strict");
    assert_eq!(raw["settings"]["report_decimals"], 3);

    let saved = &raw["calculations"][0];
    assert_eq!(saved["element"]["type"], "leveling-walls-vertical");
    assert!(saved["element"].get("width").is_none());
    assert_eq!(saved["materials"][2]["kind"], "resin");
    assert_eq!(saved["materials"][2]["unit"], "liter");

    let _ = fs::remove_file(&path);
}

#[test]
fn newer_schema_is_rejected() {
    let path = temp_ledger("future");

    let mut ledger = Ledger::new();
    ledger.version = "0.9.0".to_string();
    save_ledger(&ledger, &path).unwrap();

    match load_ledger(&path) {
        Err(CalcError::VersionMismatch { file_version, .. }) => assert_eq!(file_version, "0.9.0"),
        other => panic!("expected version mismatch, got {:?}", other),
    }

    let _ = fs::remove_file(&path);
}

#[test]
fn missing_sections_default() {
    let path = temp_ledger("minimal");
    fs::write(&path, format!(r#"{{"version": "{}"}}"#, SCHEMA_VERSION)).unwrap();

    let ledger = load_ledger(&path).unwrap();
    assert_eq!(ledger.project_count(), 0);
    assert_eq!(ledger.record_count(), 0);
    assert_eq!(ledger.settings.report_decimals, 3);

    let _ = fs::remove_file(&path);
}
