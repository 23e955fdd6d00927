//! Export artifact: filename, encoding, and the decode round-trip.

mod common;

use common::{body_of, csv, random_report, scenario_report, scenario_value};
use muling_core::{
    error::ViewerError,
    export::{self, EXPORT_FILENAME},
    report::AnalysisReport,
    session::AnalysisSession,
};
use serde_json::json;

#[test]
fn exported_bytes_decode_to_the_same_report() {
    for seed in 0..200 {
        let report = random_report(seed);
        let artifact = export::export(&report).expect("export");
        let decoded = AnalysisReport::from_json(&artifact.bytes).expect("re-ingest");
        assert_eq!(decoded, report, "round-trip diverged for seed {seed}");
    }
}

#[test]
fn artifact_uses_fixed_name_and_json_type() {
    let artifact = export::export(&scenario_report()).unwrap();
    assert_eq!(artifact.filename, EXPORT_FILENAME);
    assert_eq!(artifact.filename, "muling_analysis_report.json");
    assert_eq!(artifact.content_type, "application/json");
}

#[test]
fn encoding_is_two_space_pretty_in_report_order() {
    let artifact = export::export(&scenario_report()).unwrap();
    let text = String::from_utf8(artifact.bytes).expect("utf-8");

    assert!(text.starts_with("{\n  \"summary\": {\n    \"total_accounts_analyzed\": 1000,"));
    let summary = text.find("\"summary\"").unwrap();
    let accounts = text.find("\"suspicious_accounts\"").unwrap();
    let rings = text.find("\"fraud_rings\"").unwrap();
    assert!(summary < accounts && accounts < rings, "key order:\n{text}");

    let ring_id = text.find("\"ring_id\"").unwrap();
    let members = text.find("\"member_accounts\"").unwrap();
    assert!(ring_id < members);
}

#[test]
fn null_account_ring_id_is_exported_as_null() {
    let mut value = scenario_value();
    value["suspicious_accounts"][0]["ring_id"] = serde_json::Value::Null;
    let report = AnalysisReport::from_value(value).unwrap();
    assert_eq!(report.suspicious_accounts()[0].ring_id(), None);

    let bytes = export::export(&report).unwrap().bytes;
    let reread: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let account = reread["suspicious_accounts"][0].as_object().unwrap();
    assert_eq!(account.get("ring_id"), Some(&serde_json::Value::Null));
}

#[test]
fn export_is_stable_across_calls() {
    let report = scenario_report();
    assert_eq!(export::export(&report).unwrap(), export::export(&report).unwrap());
}

#[test]
fn unknown_backend_fields_survive_export() {
    let mut value = scenario_value();
    value["suspicious_accounts"][0]["ring_id"] = json!("R1");
    value["fraud_rings"][0]["detected_at"] = json!("2026-02-01T00:00:00Z");
    value["engine_version"] = json!("MoneyMulingDetector_v1.0");
    let report = AnalysisReport::from_value(value).unwrap();

    let bytes = export::export(&report).unwrap().bytes;
    let reread: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(reread["suspicious_accounts"][0]["ring_id"], "R1");
    assert_eq!(reread["fraud_rings"][0]["detected_at"], "2026-02-01T00:00:00Z");
    assert_eq!(reread["engine_version"], "MoneyMulingDetector_v1.0");
    assert_eq!(AnalysisReport::from_json(&bytes).unwrap(), report);
}

#[test]
fn session_export_requires_a_loaded_report() {
    let mut session = AnalysisSession::new();
    assert!(matches!(session.export(), Err(ViewerError::NoReportAvailable)));

    let ticket = session.submit(Some(&csv("tx.csv"))).unwrap();
    assert!(matches!(session.export(), Err(ViewerError::NoReportAvailable)));

    session.resolve(ticket, Ok(body_of(&scenario_value())));
    let artifact = session.export().expect("loaded session exports");
    assert_eq!(AnalysisReport::from_json(&artifact.bytes).unwrap(), scenario_report());
}

#[test]
fn write_to_dir_uses_artifact_name() {
    let dir = std::env::temp_dir().join(format!("muling-export-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();

    let artifact = export::export(&scenario_report()).unwrap();
    let path = artifact.write_to_dir(&dir).expect("write");
    assert_eq!(path.file_name().unwrap(), EXPORT_FILENAME);
    assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn write_to_missing_dir_is_io_error() {
    let dir = std::env::temp_dir().join(format!("muling-missing-{}", uuid::Uuid::new_v4()));
    let artifact = export::export(&scenario_report()).unwrap();
    assert!(matches!(artifact.write_to_dir(&dir), Err(ViewerError::Io(_))));
}
