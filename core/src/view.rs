//! Read-only projections the dashboard renders.
//!
//! Nothing here draws anything. Each function turns the report (or the
//! derived graph) into rows and labels in display order.

use crate::{
    graph::{Graph, NodeView},
    ranking,
    report::{AnalysisReport, FraudRing},
    types::{AccountId, RingId},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

/// The four headline numbers, in dashboard order.
pub fn summary_cards(report: &AnalysisReport) -> [StatCard; 4] {
    let s = report.summary();
    [
        StatCard { label: "Accounts Analyzed",  value: s.total_accounts_analyzed.to_string() },
        StatCard { label: "Suspicious Flagged", value: s.suspicious_accounts_flagged.to_string() },
        StatCard { label: "Fraud Rings",        value: s.fraud_rings_detected.to_string() },
        StatCard { label: "Processing Time",    value: format!("{}s", s.processing_time_seconds) },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow<'a> {
    /// 1-based position in backend order.
    pub rank:       usize,
    pub account_id: &'a str,
    pub patterns:   &'a [String],
    pub score:      f64,
}

pub fn ranked_list(report: &AnalysisReport, k: usize) -> Vec<RankedRow<'_>> {
    ranking::top_suspicious(report, k)
        .iter()
        .enumerate()
        .map(|(i, acc)| RankedRow {
            rank:       i + 1,
            account_id: &acc.account_id,
            patterns:   &acc.detected_patterns,
            score:      acc.suspicion_score,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingRow {
    pub ring_id:      RingId,
    pub pattern_type: String,
    pub member_count: usize,
    pub risk_score:   f64,
    pub members:      String,
}

impl RingRow {
    pub fn from_ring(ring: &FraudRing) -> Self {
        Self {
            ring_id:      ring.ring_id.clone(),
            pattern_type: ring.pattern_type.clone(),
            member_count: ring.member_count(),
            risk_score:   ring.risk_score,
            members:      ring.member_accounts.join(", "),
        }
    }
}

/// Fraud ring summary table, one row per ring in report order.
pub fn ring_table(report: &AnalysisReport) -> Vec<RingRow> {
    report.fraud_rings().iter().map(RingRow::from_ring).collect()
}

/// What the detail panel shows for a selected node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetail {
    pub id:            AccountId,
    pub is_suspicious: bool,
    pub score:         Option<f64>,
    pub patterns:      Vec<String>,
    /// Rings listing this account as a member, in report order.
    pub rings:         Vec<RingId>,
}

/// Details for `id`, which may be a suspicious node or a bare edge
/// endpoint. Ids the graph never mentions give `None`.
pub fn node_detail(report: &AnalysisReport, graph: &Graph, id: &str) -> Option<NodeDetail> {
    let referenced = graph.contains(id)
        || report
            .fraud_rings()
            .iter()
            .any(|r| r.member_accounts.iter().any(|m| m == id));
    if !referenced {
        return None;
    }

    let rings = report
        .fraud_rings()
        .iter()
        .filter(|r| r.member_accounts.iter().any(|m| m == id))
        .map(|r| r.ring_id.clone())
        .collect();

    let detail = match graph.resolve(id) {
        NodeView::Suspicious(node) => NodeDetail {
            id:            node.id.clone(),
            is_suspicious: true,
            score:         node.score,
            patterns:      node.patterns.clone(),
            rings,
        },
        NodeView::Normal { id } => NodeDetail {
            id:            id.to_string(),
            is_suspicious: false,
            score:         None,
            patterns:      Vec::new(),
            rings,
        },
    };
    Some(detail)
}
