//! Report → node/edge graph derivation.
//!
//! RULES:
//!   - `build` is pure. Same report in, same graph out: node order follows
//!     `suspicious_accounts`, edge order follows ring order then pair order.
//!   - Only suspicious accounts become nodes. A duplicate account_id keeps
//!     the first position and takes the later entry's data.
//!   - Each ring links consecutive members (i, i+1). Members that are not
//!     suspicious get no node, so edges may dangle; callers resolve those
//!     through `Graph::resolve`.
//!
//! The graph is a visual overlay. It is rebuilt from the report whenever
//! needed and never patched in place.

use crate::{
    error::ReportError,
    report::AnalysisReport,
    types::{AccountId, RingId},
};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id:            AccountId,
    pub is_suspicious: bool,
    pub score:         Option<f64>,
    pub patterns:      Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source:  AccountId,
    pub target:  AccountId,
    pub ring_id: RingId,
}

/// A node as a renderer sees it: either a real suspicious node or the
/// implicit normal node standing in for a dangling edge endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeView<'a> {
    Suspicious(&'a GraphNode),
    Normal { id: &'a str },
}

impl NodeView<'_> {
    pub fn id(&self) -> &str {
        match self {
            NodeView::Suspicious(node) => &node.id,
            NodeView::Normal { id } => id,
        }
    }

    pub fn is_suspicious(&self) -> bool {
        matches!(self, NodeView::Suspicious(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    index: HashMap<AccountId, usize>,
}

impl Graph {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up an id that may only exist as an edge endpoint.
    /// Ids absent from `nodes` resolve to a minimal normal node.
    pub fn resolve<'a>(&'a self, id: &'a str) -> NodeView<'a> {
        match self.node(id) {
            Some(node) => NodeView::Suspicious(node),
            None => NodeView::Normal { id },
        }
    }

    /// Edge endpoints with no node entry, first-seen order, deduplicated.
    pub fn dangling_endpoints(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .flat_map(|e| [e.source.as_str(), e.target.as_str()])
            .filter(|id| !self.contains(id) && seen.insert(*id))
            .collect()
    }
}

/// Derive the graph from a validated report.
pub fn build(report: &AnalysisReport) -> Graph {
    let mut graph = Graph::default();

    for acc in report.suspicious_accounts() {
        let node = GraphNode {
            id:            acc.account_id.clone(),
            is_suspicious: true,
            score:         Some(acc.suspicion_score),
            patterns:      acc.detected_patterns.clone(),
        };
        match graph.index.get(&acc.account_id) {
            Some(&i) => graph.nodes[i] = node,
            None => {
                graph.index.insert(acc.account_id.clone(), graph.nodes.len());
                graph.nodes.push(node);
            }
        }
    }

    for ring in report.fraud_rings() {
        for pair in ring.member_accounts.windows(2) {
            graph.edges.push(GraphEdge {
                source:  pair[0].clone(),
                target:  pair[1].clone(),
                ring_id: ring.ring_id.clone(),
            });
        }
    }

    log::debug!(
        "graph: built {} nodes, {} edges from {} rings",
        graph.nodes.len(),
        graph.edges.len(),
        report.fraud_rings().len()
    );
    graph
}

/// Build straight from a JSON document. Fails with a malformed-report
/// error when either collection is missing or not a sequence.
pub fn build_from_value(value: &Value) -> Result<Graph, ReportError> {
    let report = AnalysisReport::from_value(value.clone())?;
    Ok(build(&report))
}

pub fn build_from_json(bytes: &[u8]) -> Result<Graph, ReportError> {
    let report = AnalysisReport::from_json(bytes)?;
    Ok(build(&report))
}
