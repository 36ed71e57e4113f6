//! Output document integration tests
//!
//! Tests for the JSON layout and for reading written output back.

use crate::common::*;
use potlog::batch::{combine, write_json};
use potlog::parsers::potting::parse_potting_log;
use potlog::parsers::types::{CombinedLog, PottingModule};

fn rich_modules() -> Vec<PottingModule> {
    let log = PottingLogBuilder::new()
        .slot(1, 1, "m-a-1-01", "Good")
        .slot(1, 2, "M-A-1-02", "Good")
        .fiducial(1, 1, "BBM", "F1", "1.0,2.0,3.0")
        .fiducial(1, 1, "HDI", "F2", "0.5,0.25,0")
        .center(1, 1, "BBM")
        .center(1, 2, "HDI")
        .pot_line(1, 1, "Top", "Enabled")
        .pot_line(1, 2, "Top", "Disabled")
        .finish_line("Operator Name: Pat")
        .finish_line("Pressure: 40")
        .build();
    parse_potting_log(&log).unwrap().modules
}

#[test]
fn test_flat_list_round_trip() {
    let modules = rich_modules();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Potting_Logs.json");
    write_json(&path, &modules).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let back: Vec<PottingModule> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, modules);
}

#[test]
fn test_combined_round_trip() {
    let logs = combine(rich_modules(), vec![]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Potting_Logs.json");
    write_json(&path, &logs).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let back: CombinedLog = serde_json::from_str(&text).unwrap();
    assert_eq!(back, logs);
}

#[test]
fn test_json_layout() {
    let modules = rich_modules();
    let json = serde_json::to_value(&modules).unwrap();
    let first = &json[0];

    assert_eq!(first["module_id"], "m-a-1-01");
    assert_eq!(first["chuck"], "1");
    assert_eq!(
        first["BBM_fids"]["F1"]["img_pos"],
        serde_json::json!(["1.0", "2.0", "3.0"])
    );
    assert_eq!(
        first["BBM_orient"],
        serde_json::json!(["0.0", "0.0", "-0.0012", "1.0"])
    );
    assert_eq!(first["BBM_rotatn"], "-0.069");
    assert_eq!(first["pot_lines"]["Top"]["state"], "Enabled");
    assert_eq!(
        first["pot_lines"]["Top"]["global"]["start"],
        serde_json::json!(["1.0", "2.0", "3.0"])
    );
    assert_eq!(first["operator_name"], "Pat");
    assert_eq!(first["pressure"], "40");
    assert!(first.get("HDI_center").is_none());
    assert!(json[1].get("BBM_center").is_none());
    assert_eq!(json[1]["pot_lines"]["Top"]["state"], "Disabled");
}

#[test]
fn test_combined_keys_are_uppercase() {
    let logs = combine(rich_modules(), vec![]);
    let json = serde_json::to_value(&logs).unwrap();
    let object = json.as_object().unwrap();

    assert!(object.contains_key("M-A-1-01"));
    assert!(object.contains_key("M-A-1-02"));
    assert!(object["M-A-1-01"]["potting"].get("module_id").is_none());
}
