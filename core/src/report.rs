//! The analysis report: the typed shape of what the backend returns.
//!
//! RULE: An `AnalysisReport` is only ever built through
//! `AnalysisReport::from_json` / `from_value`. Both run the structural
//! contract check, so holding a report means holding a valid one.
//! Fields are read-only after construction.
//!
//! Fields the viewer does not know about are kept in `extra` so the
//! report passes through to export unmodified.

use crate::{
    error::ReportError,
    types::{AccountId, RingId},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_accounts_analyzed:     u64,
    pub suspicious_accounts_flagged: u64,
    pub fraud_rings_detected:        u64,
    pub processing_time_seconds:     f64,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    pub account_id:        AccountId,
    pub suspicion_score:   f64,
    pub detected_patterns: Vec<String>,
    /// Carries `ring_id` too, exactly as sent (string, `null` or absent).
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl SuspiciousAccount {
    /// Ring that first flagged this account, when the backend reports one.
    pub fn ring_id(&self) -> Option<&str> {
        self.extra.get("ring_id").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRing {
    pub ring_id:         RingId,
    pub pattern_type:    String,
    pub risk_score:      f64,
    pub member_accounts: Vec<AccountId>,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl FraudRing {
    pub fn member_count(&self) -> usize {
        self.member_accounts.len()
    }
}

/// A validated analysis report. Serialized field order is
/// summary, suspicious_accounts, fraud_rings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReport")]
pub struct AnalysisReport {
    summary:             ReportSummary,
    suspicious_accounts: Vec<SuspiciousAccount>,
    fraud_rings:         Vec<FraudRing>,
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    extra: Map<String, Value>,
}

/// Wire shape before validation.
#[derive(Deserialize)]
struct RawReport {
    summary:             ReportSummary,
    suspicious_accounts: Vec<SuspiciousAccount>,
    fraud_rings:         Vec<FraudRing>,
    #[serde(flatten, default)]
    extra: Map<String, Value>,
}

impl TryFrom<RawReport> for AnalysisReport {
    type Error = ReportError;

    fn try_from(raw: RawReport) -> Result<Self, Self::Error> {
        let report = AnalysisReport {
            summary:             raw.summary,
            suspicious_accounts: raw.suspicious_accounts,
            fraud_rings:         raw.fraud_rings,
            extra:               raw.extra,
        };
        report.validate()?;
        Ok(report)
    }
}

impl AnalysisReport {
    /// Decode and validate a raw response body.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ReportError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| ReportError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Validate an already-parsed JSON document and build the report.
    pub fn from_value(value: Value) -> Result<Self, ReportError> {
        check_collections(&value)?;
        let raw: RawReport =
            serde_json::from_value(value).map_err(|e| ReportError::Shape(e.to_string()))?;
        AnalysisReport::try_from(raw)
    }

    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    /// Suspicious accounts in backend order. The backend is the ranking
    /// authority; the viewer never re-sorts them.
    pub fn suspicious_accounts(&self) -> &[SuspiciousAccount] {
        &self.suspicious_accounts
    }

    pub fn fraud_rings(&self) -> &[FraudRing] {
        &self.fraud_rings
    }

    /// Top-level fields outside the known contract.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn is_empty(&self) -> bool {
        self.suspicious_accounts.is_empty() && self.fraud_rings.is_empty()
    }

    fn validate(&self) -> Result<(), ReportError> {
        let secs = self.summary.processing_time_seconds;
        if !secs.is_finite() || secs < 0.0 {
            return Err(ReportError::InvalidProcessingTime(secs));
        }

        for ring in &self.fraud_rings {
            if ring.member_accounts.is_empty() {
                return Err(ReportError::EmptyRing { ring_id: ring.ring_id.clone() });
            }
        }

        // Duplicate ids are tolerated: the graph resolves them last-write-wins.
        let mut seen = HashSet::new();
        for acc in &self.suspicious_accounts {
            if !seen.insert(acc.account_id.as_str()) {
                log::warn!("report: duplicate suspicious account_id {}", acc.account_id);
            }
        }
        let mut seen = HashSet::new();
        for ring in &self.fraud_rings {
            if !seen.insert(ring.ring_id.as_str()) {
                log::warn!("report: duplicate ring_id {}", ring.ring_id);
            }
        }

        if self.summary.suspicious_accounts_flagged != self.suspicious_accounts.len() as u64 {
            log::debug!(
                "report: summary flags {} suspicious accounts, body lists {}",
                self.summary.suspicious_accounts_flagged,
                self.suspicious_accounts.len()
            );
        }

        Ok(())
    }
}

/// The collections the graph is derived from must be present and be
/// sequences before anything else is looked at.
fn check_collections(value: &Value) -> Result<(), ReportError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ReportError::Shape("report must be a JSON object".to_string()))?;

    for field in ["suspicious_accounts", "fraud_rings"] {
        match obj.get(field) {
            None | Some(Value::Null) => return Err(ReportError::MissingField { field }),
            Some(Value::Array(_)) => {}
            Some(_) => return Err(ReportError::NotASequence { field }),
        }
    }

    if !obj.contains_key("summary") {
        return Err(ReportError::MissingField { field: "summary" });
    }
    Ok(())
}
