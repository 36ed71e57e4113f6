//! Tests for the gluing log parser
//!
//! Module ids are resolved through a stub resolver so no network access is
//! needed.

use crate::common::*;
use potlog::lookup::{ModuleIdResolver, NoLookup};
use potlog::parsers::gluing::Gluing;
use potlog::parsers::types::Parseable;
use std::cell::RefCell;

/// Resolver that derives a module id from the HDI id and records every call
#[derive(Default)]
struct RecordingResolver {
    calls: RefCell<Vec<String>>,
}

impl ModuleIdResolver for RecordingResolver {
    fn resolve(&self, hdi_id: &str) -> Option<String> {
        self.calls.borrow_mut().push(hdi_id.to_string());
        hdi_id
            .strip_prefix("HDI-")
            .map(|n| format!("M-A-1-{}", n))
    }
}

#[test]
fn test_four_slots_resolved() {
    let log = gluing_log(
        "03/15/2019",
        "3",
        ["BBM-1", "HDI-11", "BBM-2", "HDI-12", "BBM-3", "HDI-13", "BBM-4", "HDI-14"],
    );
    let resolver = RecordingResolver::default();
    let modules = Gluing::new(&resolver).parse(&log).unwrap();

    assert_eq!(modules.len(), 4);
    assert_eq!(
        *resolver.calls.borrow(),
        ["HDI-11", "HDI-12", "HDI-13", "HDI-14"]
    );
    for (i, module) in modules.iter().enumerate() {
        assert_eq!(module.record.slot as usize, i + 1);
        assert_eq!(module.record.chuck, "3");
        assert_eq!(module.record.date, "15/03/2019");
        assert_eq!(module.record.pressure, "60");
    }
    assert_eq!(modules[2].module_id.as_deref(), Some("M-A-1-13"));
    assert_eq!(modules[2].record.bbm_id, "BBM-3");
}

#[test]
fn test_placeholder_pairs_skip_lookup() {
    let log = gluing_log(
        "03/15/2019",
        "1",
        ["glass", "HDI-1", "BBM-2", "kapton", "---", "HDI-3", "BBM-4", "---"],
    );
    let resolver = RecordingResolver::default();
    let modules = Gluing::new(&resolver).parse(&log).unwrap();

    assert!(modules.is_empty());
    assert!(resolver.calls.borrow().is_empty());
}

#[test]
fn test_unresolved_id_is_kept_as_none() {
    let log = gluing_log(
        "12/01/2020",
        "1",
        ["BBM-1", "X-1", "glass", "kapton", "glass", "kapton", "glass", "kapton"],
    );
    let modules = Gluing::new(&NoLookup).parse(&log).unwrap();

    assert_eq!(modules.len(), 1);
    assert!(modules[0].module_id.is_none());
    assert_eq!(modules[0].record.hdi_id, "X-1");
    assert_eq!(modules[0].record.date, "01/12/2020");
}

#[test]
fn test_gluing_json_fields() {
    let log = gluing_log(
        "03/15/2019",
        "2",
        ["BBM-1", "HDI-7", "glass", "kapton", "glass", "kapton", "glass", "kapton"],
    );
    let resolver = RecordingResolver::default();
    let modules = Gluing::new(&resolver).parse(&log).unwrap();
    let json = serde_json::to_value(&modules[0]).unwrap();

    assert_eq!(json["module_id"], "M-A-1-7");
    assert_eq!(json["slot"], 1);
    assert_eq!(json["chuck"], "2");
    assert_eq!(json["araldite_batch"], "AR-77");
    assert_eq!(json["software_version"], "2.1");
}
