//! End-to-end runs against real .xlsx files.

use assetgen::schema::{assets, payload_types, sheets};
use assetgen::{generate_metadata, GenerateOptions, PipelineError, SchemaError};
use rust_xlsxwriter::Workbook;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

enum V {
    S(&'static str),
    N(f64),
    Blank,
}

fn write_sheet(workbook: &mut Workbook, name: &str, headers: &[&str], rows: &[Vec<V>]) {
    let sheet = workbook.add_worksheet().set_name(name).unwrap();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            let col = col as u16;
            match value {
                V::S(s) => {
                    sheet.write_string(r, col, *s).unwrap();
                }
                V::N(n) => {
                    sheet.write_number(r, col, *n).unwrap();
                }
                V::Blank => {}
            }
        }
    }
}

/// Asset row: instance, type, then (column, value) overrides; everything else blank.
fn asset(instance: &'static str, kind: &'static str, cells: Vec<(&str, V)>) -> Vec<V> {
    let mut row: Vec<V> = assets::ALL.iter().map(|_| V::Blank).collect();
    row[0] = V::S(instance);
    row[1] = V::S(kind);
    for (column, value) in cells {
        let idx = assets::ALL.iter().position(|c| *c == column).unwrap();
        row[idx] = value;
    }
    row
}

fn point(name: &'static str, units: &'static str, kind: &'static str) -> Vec<V> {
    vec![V::S(name), V::S(units), V::S(kind)]
}

fn write_workbook(path: &Path, asset_rows: &[Vec<V>], payload_rows: &[Vec<V>]) {
    let mut workbook = Workbook::new();
    write_sheet(&mut workbook, sheets::ASSETS, &assets::ALL, asset_rows);
    write_sheet(&mut workbook, sheets::PAYLOAD_TYPES, &payload_types::ALL, payload_rows);
    workbook.save(path).unwrap();
}

fn site(dir: &Path) -> PathBuf {
    let site = dir.join("site");
    fs::create_dir_all(&site).unwrap();
    site.join("assets.xlsx")
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_ahu_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    write_workbook(
        &path,
        &[asset("AHU-1", "hvac", vec![(assets::MANUFACTURER, V::S("Acme"))])],
        &[point("temp", "F", "hvac"), point("temp", "C", "hvac")],
    );

    let report = generate_metadata(&path, &GenerateOptions::default()).unwrap();

    let asset_dir = dir.path().join("site").join("AHU-1");
    assert_eq!(report.emitted.len(), 1);
    assert_eq!(report.emitted[0].metadata_path, asset_dir.join("metadata.json"));

    let metadata = read_json(&asset_dir.join("metadata.json"));
    assert_eq!(metadata["instname"], "AHU-1");
    assert_eq!(metadata["vendorname"], "Acme");

    let pointset = read_json(&asset_dir.join("pointset.json"));
    assert_eq!(pointset, json!({ "points": { "temp": { "units": "C" } } }));
}

#[test]
fn test_metadata_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    write_workbook(
        &path,
        &[asset(
            "AHU-1",
            "hvac",
            vec![
                (assets::MANUFACTURER, V::S("Acme")),
                (assets::SERIAL_NUMBER, V::N(12345.0)),
                (assets::X_COORD, V::N(3.25)),
                (assets::IS_FED_BY, V::S("BLR-1, PMP-2")),
            ],
        )],
        &[point("temp", "C", "hvac")],
    );

    generate_metadata(&path, &GenerateOptions::default()).unwrap();

    let content = fs::read_to_string(dir.path().join("site/AHU-1/metadata.json")).unwrap();
    let expected = r#"{
  "instname": "AHU-1",
  "vendorname": "Acme",
  "modelname": "",
  "firmware": "",
  "software_version": "",
  "serial_number": 12345,
  "eng_unit_type": "",
  "eng_asset_tag": "",
  "location": {
    "x_coord": 3.25,
    "y_coord": ""
  },
  "relationships": {
    "hasLocation": "",
    "isAssociatedWith": "",
    "isPartOf": "",
    "isFedBy": [
      "BLR-1",
      "PMP-2"
    ]
  }
}"#;
    assert_eq!(content, expected);
}

#[test]
fn test_missing_fed_by_is_single_empty_string() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    write_workbook(&path, &[asset("VAV-7", "vav", vec![])], &[point("flow", "cfm", "vav")]);

    generate_metadata(&path, &GenerateOptions::default()).unwrap();

    let metadata = read_json(&dir.path().join("site/VAV-7/metadata.json"));
    assert_eq!(metadata["relationships"]["isFedBy"], json!([""]));
}

#[test]
fn test_unknown_type_produces_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    write_workbook(
        &path,
        &[asset("AHU-1", "hvac", vec![]), asset("MYSTERY-1", "unknown_type", vec![])],
        &[point("temp", "F", "hvac")],
    );

    let report = generate_metadata(&path, &GenerateOptions::default()).unwrap();

    assert_eq!(report.emitted.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(!dir.path().join("site/MYSTERY-1").exists());
}

#[test]
fn test_output_dir_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    let out = dir.path().join("out");
    write_workbook(&path, &[asset("AHU-1", "hvac", vec![])], &[point("temp", "F", "hvac")]);

    let options = GenerateOptions {
        output_dir: Some(out.clone()),
        ..Default::default()
    };
    generate_metadata(&path, &options).unwrap();

    assert!(out.join("AHU-1/metadata.json").is_file());
    assert!(!dir.path().join("site/AHU-1").exists());
}

#[test]
fn test_missing_column_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    let mut workbook = Workbook::new();
    write_sheet(&mut workbook, sheets::ASSETS, &assets::ALL, &[asset("AHU-1", "hvac", vec![])]);
    write_sheet(
        &mut workbook,
        sheets::PAYLOAD_TYPES,
        &[payload_types::POINT_NAME, payload_types::UNITS],
        &[vec![V::S("temp"), V::S("F")]],
    );
    workbook.save(&path).unwrap();

    let err = generate_metadata(&path, &GenerateOptions::default()).unwrap_err();

    match err {
        PipelineError::Schema(SchemaError::MissingColumn { column, .. }) => {
            assert_eq!(column, payload_types::POINTS_TYPE);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("site/AHU-1").exists());
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    write_workbook(
        &path,
        &[
            asset("AHU-1", "hvac", vec![(assets::MODEL, V::S("Über 9000"))]),
            asset("AHU-2", "hvac", vec![(assets::SERIAL_NUMBER, V::N(77.0))]),
        ],
        &[point("temp", "°C", "hvac"), point("rh", "%", "hvac")],
    );

    generate_metadata(&path, &GenerateOptions::default()).unwrap();
    let files = [
        "site/AHU-1/metadata.json",
        "site/AHU-1/pointset.json",
        "site/AHU-2/metadata.json",
    ];
    let read_all = || -> Vec<Vec<u8>> {
        files
            .iter()
            .map(|f| fs::read(dir.path().join(f)).unwrap())
            .collect()
    };
    let first = read_all();

    generate_metadata(&path, &GenerateOptions::default()).unwrap();
    let second = read_all();

    assert_eq!(first, second);
    let pointset = String::from_utf8(first[1].clone()).unwrap();
    assert!(pointset.contains(r#""units": "\u00b0C""#));
}

#[test]
fn test_generated_files_pass_validate() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    write_workbook(
        &path,
        &[asset("AHU-1", "hvac", vec![]), asset("VAV-7", "vav", vec![])],
        &[point("temp", "F", "hvac"), point("flow", "cfm", "vav")],
    );

    generate_metadata(&path, &GenerateOptions::default()).unwrap();
    let checks = assetgen::validate_output_dir(&dir.path().join("site")).unwrap();

    assert_eq!(checks.len(), 4);
    assert!(checks.iter().all(|c| c.is_valid()));
}

#[test]
fn test_row_numbers_count_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    let blank_line: Vec<V> = assets::ALL.iter().map(|_| V::Blank).collect();
    let mut nameless = asset("", "hvac", vec![]);
    nameless[0] = V::Blank;
    write_workbook(
        &path,
        &[asset("AHU-1", "hvac", vec![]), blank_line, nameless],
        &[point("temp", "F", "hvac")],
    );

    let err = generate_metadata(&path, &GenerateOptions::default()).unwrap_err();

    assert!(matches!(err, PipelineError::MissingInstanceName { row: 4 }));
    assert_eq!(err.to_string(), "Asset row 4 has no instance name");
}

#[test]
fn test_skipped_row_number_after_blank_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    let blank_line: Vec<V> = assets::ALL.iter().map(|_| V::Blank).collect();
    write_workbook(
        &path,
        &[
            asset("AHU-1", "hvac", vec![]),
            blank_line,
            asset("MYSTERY-1", "unknown_type", vec![]),
        ],
        &[point("temp", "F", "hvac")],
    );

    let report = generate_metadata(&path, &GenerateOptions::default()).unwrap();

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].row, 4);
    assert_eq!(report.skipped[0].instance_name, "MYSTERY-1");
}

#[test]
fn test_float_column_keeps_decimal_point() {
    let dir = tempfile::tempdir().unwrap();
    let path = site(dir.path());
    write_workbook(
        &path,
        &[
            asset("AHU-1", "hvac", vec![(assets::X_COORD, V::N(3.0))]),
            asset("AHU-2", "hvac", vec![(assets::X_COORD, V::N(4.5))]),
        ],
        &[point("temp", "F", "hvac")],
    );

    generate_metadata(&path, &GenerateOptions::default()).unwrap();

    let content = fs::read_to_string(dir.path().join("site/AHU-1/metadata.json")).unwrap();
    assert!(content.contains(r#""x_coord": 3.0,"#));
    let metadata = read_json(&dir.path().join("site/AHU-2/metadata.json"));
    assert_eq!(metadata["location"]["x_coord"], json!(4.5));
}

#[test]
fn test_absolute_instance_name_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let outside = tempfile::tempdir().unwrap();
    let target = outside.path().join("AHU-X");
    let name: &'static str = Box::leak(target.display().to_string().into_boxed_str());
    let path = site(dir.path());
    write_workbook(&path, &[asset(name, "hvac", vec![])], &[point("temp", "F", "hvac")]);

    let err = generate_metadata(&path, &GenerateOptions::default()).unwrap_err();

    assert!(matches!(err, PipelineError::InvalidInstanceName { row: 2, .. }));
    assert!(!target.exists());
}
