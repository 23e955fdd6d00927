//! Session event log: every state transition, in order.
//!
//! RULE: `AnalysisSession` records one event per transition attempt,
//! including the ones it refuses (stale responses). Events are values;
//! nothing reads them back to decide state.

use crate::types::Generation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SubmissionStarted {
        generation:    Generation,
        submission_id: Uuid,
        file_name:     String,
        size_bytes:    usize,
    },
    /// A newer submit replaced one still in flight.
    SubmissionSuperseded {
        generation: Generation,
    },
    ReportLoaded {
        generation:          Generation,
        suspicious_accounts: usize,
        fraud_rings:         usize,
    },
    SubmissionFailed {
        generation: Generation,
        message:    String,
    },
    /// A response arrived for a generation that is no longer current.
    StaleResponseDiscarded {
        generation: Generation,
        current:    Generation,
    },
    SessionReset {
        generation: Generation,
    },
}

impl SessionEvent {
    /// Stable name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::SubmissionStarted { .. }      => "submission_started",
            SessionEvent::SubmissionSuperseded { .. }   => "submission_superseded",
            SessionEvent::ReportLoaded { .. }           => "report_loaded",
            SessionEvent::SubmissionFailed { .. }       => "submission_failed",
            SessionEvent::StaleResponseDiscarded { .. } => "stale_response_discarded",
            SessionEvent::SessionReset { .. }           => "session_reset",
        }
    }
}
