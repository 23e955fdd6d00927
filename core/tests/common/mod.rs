//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use muling_core::{
    client::{AnalysisClient, UploadFile},
    error::{ViewerError, ViewerResult},
    report::AnalysisReport,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Route the crate's `log` output through the test harness. Run with
/// `RUST_LOG=debug` to see session transitions.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// AC1 flagged, ring R1 over AC1 → AC2 → AC3.
pub fn scenario_value() -> Value {
    json!({
        "summary": {
            "total_accounts_analyzed": 1000,
            "suspicious_accounts_flagged": 1,
            "fraud_rings_detected": 1,
            "processing_time_seconds": 1.25
        },
        "suspicious_accounts": [
            { "account_id": "AC1", "suspicion_score": 87.5, "detected_patterns": ["fan-in"] }
        ],
        "fraud_rings": [
            {
                "ring_id": "R1",
                "pattern_type": "layering",
                "risk_score": 92.0,
                "member_accounts": ["AC1", "AC2", "AC3"]
            }
        ]
    })
}

pub fn scenario_report() -> AnalysisReport {
    AnalysisReport::from_value(scenario_value()).expect("scenario report")
}

pub fn report_with(accounts: Value, rings: Value) -> AnalysisReport {
    let v = json!({
        "summary": {
            "total_accounts_analyzed": 10,
            "suspicious_accounts_flagged": 0,
            "fraud_rings_detected": 0,
            "processing_time_seconds": 0.5
        },
        "suspicious_accounts": accounts,
        "fraud_rings": rings
    });
    AnalysisReport::from_value(v).expect("valid report")
}

pub fn body_of(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).expect("encode body")
}

const PATTERN_TYPES: [&str; 3] = ["cycle", "smurfing_fan_in", "layered_shell"];

fn score(rng: &mut Pcg64Mcg) -> f64 {
    (rng.gen_range(0.0..100.0_f64) * 100.0).round() / 100.0
}

/// A reproducible report shaped like the backend's output: scores
/// descending, ring members drawn from a shared account pool so some
/// are flagged and some are not.
pub fn random_report_value(seed: u64) -> Value {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let pool_size = rng.gen_range(1..40usize);
    let pool: Vec<String> = (0..pool_size).map(|i| format!("ACC_{i:04}")).collect();

    let mut accounts = Vec::new();
    for id in &pool {
        if !rng.gen_bool(0.4) {
            continue;
        }
        let patterns: Vec<String> = (0..rng.gen_range(0..4usize))
            .map(|p| format!("pattern_{p}"))
            .collect();
        accounts.push((score(&mut rng), id.clone(), patterns));
    }
    accounts.sort_by(|a, b| b.0.total_cmp(&a.0));
    let accounts: Vec<Value> = accounts
        .into_iter()
        .map(|(score, id, patterns)| {
            json!({
                "account_id": id,
                "suspicion_score": score,
                "detected_patterns": patterns,
            })
        })
        .collect();

    let mut rings = Vec::new();
    for r in 0..rng.gen_range(0..8usize) {
        let mut members = Vec::new();
        for _ in 0..rng.gen_range(1..6usize) {
            members.push(pool[rng.gen_range(0..pool.len())].clone());
        }
        let pattern_type = PATTERN_TYPES[r % PATTERN_TYPES.len()];
        rings.push(json!({
            "ring_id": format!("RING_{r:03}"),
            "member_accounts": members,
            "pattern_type": pattern_type,
            "risk_score": score(&mut rng),
        }));
    }

    json!({
        "suspicious_accounts": accounts,
        "fraud_rings": rings,
        "summary": {
            "total_accounts_analyzed": pool.len(),
            "suspicious_accounts_flagged": accounts.len(),
            "fraud_rings_detected": rings.len(),
            "processing_time_seconds": score(&mut rng),
        }
    })
}

pub fn random_report(seed: u64) -> AnalysisReport {
    AnalysisReport::from_value(random_report_value(seed)).expect("generated report is valid")
}

/// Client whose responses are released by the test, per file name.
pub struct ScriptedClient {
    pending: Mutex<HashMap<String, oneshot::Receiver<ViewerResult<Vec<u8>>>>>,
    calls:   AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            calls:   AtomicUsize::new(0),
        }
    }

    /// Register a pending response for `file_name`; send on the
    /// returned channel to deliver it.
    pub fn expect(&self, file_name: &str) -> oneshot::Sender<ViewerResult<Vec<u8>>> {
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .expect("pending lock")
            .insert(file_name.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AnalysisClient for ScriptedClient {
    async fn analyze(&self, file: &UploadFile) -> ViewerResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rx = self.pending.lock().expect("pending lock").remove(&file.name);
        match rx {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ViewerError::NetworkFailure("response dropped".into()))),
            None => Err(ViewerError::NetworkFailure(format!("no script for {}", file.name))),
        }
    }
}

pub fn csv(name: &str) -> UploadFile {
    UploadFile::new(
        name,
        "transaction_id,sender_id,receiver_id,amount,timestamp\nT1,AC1,AC2,500.0,2026-01-01 10:00:00\n",
    )
}
