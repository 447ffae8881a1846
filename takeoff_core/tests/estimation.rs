//! End-to-end estimation through the public API.

use std::env::temp_dir;
use std::fs;
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use takeoff_core::calculations::{validate, FixedClock, Strictness};
use takeoff_core::elements::{Dimension, Element, ElementInput, ElementType};
use takeoff_core::materials::MaterialKind;
use takeoff_core::report::{ReportHeader, TextReport};
use takeoff_core::units::Unit;
use takeoff_core::{CalcError, Estimator, Ledger, LedgerStore, Project, ProjectStore};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn temp_ledger(name: &str) -> PathBuf {
    temp_dir().join(format!("takeoff_it_{}_{}.tko", name, std::process::id()))
}

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 4, 2, 14, 30, 0).unwrap())
}

#[test]
fn square_column_scenario() {
    let mut ledger = Ledger::new();
    let project = ledger.insert(Project::new("Casa Verde", "Acme", "12 Harbor Rd")).unwrap();
    let mut estimator = Estimator::new(ledger, Strictness::Strict, clock());

    let record = estimator
        .estimate(project, Element::square_column(3.0, 0.3))
        .unwrap();

    assert!(approx_eq(record.computed_volume, 0.27));
    let got: Vec<_> = record.materials.iter().map(|m| (m.kind, m.unit)).collect();
    assert_eq!(
        got,
        vec![
            (MaterialKind::Cement, Unit::Kilogram),
            (MaterialKind::Sand, Unit::CubicMeter),
            (MaterialKind::Gravel, Unit::CubicMeter),
        ]
    );
    assert!(approx_eq(record.materials[0].amount, 94.5));
    assert!(approx_eq(record.materials[1].amount, 0.162));
    assert!(approx_eq(record.materials[2].amount, 0.162));
    assert_eq!(record.date, clock().0);
}

#[test]
fn brick_wall_scenario() {
    let mut ledger = Ledger::new();
    let project = ledger.insert(Project::new("Shed", "", "")).unwrap();
    let mut estimator = Estimator::new(ledger, Strictness::Strict, clock());

    let record = estimator
        .estimate(project, Element::brick_wall(3.0, 2.5, 0.15))
        .unwrap();

    assert!(approx_eq(record.computed_volume, 1.125));
    assert_eq!(record.materials[0].kind, MaterialKind::Brick);
    assert_eq!(record.materials[0].amount, 375.0);
    assert!(approx_eq(record.materials[1].amount, 98.4375));
    assert!(approx_eq(record.materials[2].amount, 0.3375));
}

#[test]
fn missing_dimension_is_reported_by_name() {
    let mut ledger = Ledger::new();
    let project = ledger.insert(Project::new("Shed", "", "")).unwrap();
    let mut estimator = Estimator::new(ledger, Strictness::Strict, clock());

    let slab = Element::slab_subfloor(5.0, 4.0, 0.1).without(Dimension::Thickness);
    let err = estimator.estimate(project, slab).unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(err.missing_fields(), &[Dimension::Thickness]);
    assert!(err.to_string().contains("thickness"));
}

#[test]
fn zero_thickness_depends_on_strictness() {
    let floor = Element::leveling_floor(4.0, 3.0, 0.0);
    assert!(!validate(&floor, Strictness::Strict).ok);
    assert!(validate(&floor, Strictness::Lenient).ok);

    // Walls and columns never accept a zero dimension
    let wall = Element::brick_wall(3.0, 2.5, 0.0);
    assert!(!validate(&wall, Strictness::Lenient).ok);
}

#[test]
fn element_input_from_json() {
    let input: ElementInput =
        serde_json::from_str(r#"{"type": "Slab_Interfloor", "length": 5.0, "width": 4.0, "thickness": 0.12}"#)
            .unwrap();
    let element = Element::try_from(input).unwrap();
    assert_eq!(element.element_type, ElementType::SlabInterfloor);

    let unknown: ElementInput = serde_json::from_str(r#"{"type": "chimney", "height": 4.0}"#).unwrap();
    assert!(matches!(
        Element::try_from(unknown),
        Err(CalcError::UnknownElementType { .. })
    ));

    let untyped: ElementInput = serde_json::from_str(r#"{"height": 4.0}"#).unwrap();
    assert!(matches!(
        Element::try_from(untyped),
        Err(CalcError::Configuration { .. })
    ));
}

#[test]
fn ledger_file_round_trip() {
    let path = temp_ledger("roundtrip");
    let _ = fs::remove_file(&path);

    let (project, first) = {
        let mut store = LedgerStore::open(&path, "site-office").unwrap();
        let project = store
            .insert(Project::new("Casa Verde", "Acme", "12 Harbor Rd"))
            .unwrap();
        let mut estimator = Estimator::new(store, Strictness::Strict, clock());
        let first = estimator
            .estimate(project, Element::square_column(3.0, 0.3))
            .unwrap();
        estimator
            .estimate(project, Element::brick_wall(3.0, 2.5, 0.15))
            .unwrap();
        (project, first)
    };

    let store = LedgerStore::open_read_only(&path).unwrap();
    let header = ReportHeader::from(&store.get(project).unwrap());
    let estimator = Estimator::new(store, Strictness::Strict, clock());

    let history = estimator.history(project).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], first);

    let bom = estimator.bill_of_materials(project).unwrap();
    let cement = bom.iter().find(|m| m.kind == MaterialKind::Cement).unwrap();
    assert!(approx_eq(cement.amount, 94.5 + 98.4375));

    let text = TextReport::new(3).with_header(header).render_string(&history[1]);
    assert!(text.contains("12 Harbor Rd"));
    assert!(text.contains("375 pc"));

    let _ = fs::remove_file(&path);
}

#[test]
fn second_writer_is_locked_out() {
    let path = temp_ledger("locked");
    let _ = fs::remove_file(&path);

    let _first = LedgerStore::open(&path, "alice").unwrap();
    let err = match LedgerStore::open(&path, "bob") {
        Ok(_) => panic!("second writer should be refused"),
        Err(e) => e,
    };
    assert_eq!(err.error_code(), "FILE_LOCKED");
    assert!(err.is_recoverable());

    // Readers are not blocked
    assert!(LedgerStore::open_read_only(&path).is_ok());

    drop(_first);
    let _ = fs::remove_file(&path);
}
