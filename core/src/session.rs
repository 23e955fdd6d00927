//! The analysis session: one upload-to-report cycle at a time.
//!
//! STATES:
//!   Idle ──submit──▶ Submitting ──resolve(ok)──▶ Loaded
//!                        │      ──resolve(err)─▶ Failed
//!   Loaded / Failed / Submitting ──submit──▶ Submitting (new generation)
//!   any ──reset──▶ Idle (new generation)
//!
//! RULES:
//!   - State is one enum. There is no separate loading flag.
//!   - Every accepted submit bumps the generation. A response is applied
//!     only if its ticket carries the current generation, so the last
//!     submission wins no matter which response lands first.
//!   - A report is stored whole or not at all.
//!   - Only the methods here mutate the session.

use crate::{
    client::UploadFile,
    error::{ViewerError, ViewerResult},
    event::SessionEvent,
    export::{self, ExportArtifact},
    graph::{self, Graph},
    ranking,
    report::{AnalysisReport, SuspiciousAccount},
    types::Generation,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Handed out by `submit`, handed back with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub generation:    Generation,
    /// Correlates log lines for one request. Not used for ordering.
    pub submission_id: Uuid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedReport {
    pub generation:  Generation,
    pub received_at: DateTime<Utc>,
    report:          AnalysisReport,
}

impl LoadedReport {
    pub fn report(&self) -> &AnalysisReport {
        &self.report
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Submitting {
        ticket:    SubmissionTicket,
        file_name: String,
    },
    Loaded(LoadedReport),
    Failed {
        generation: Generation,
        message:    String,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle              => "idle",
            SessionState::Submitting { .. } => "submitting",
            SessionState::Loaded(_)         => "loaded",
            SessionState::Failed { .. }     => "failed",
        }
    }
}

/// What `resolve` did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Loaded,
    Failed,
    /// The response belonged to a superseded submission and was dropped.
    Stale,
}

#[derive(Debug)]
pub struct AnalysisSession {
    state:      SessionState,
    generation: Generation,
    events:     Vec<SessionEvent>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            state:      SessionState::Idle,
            generation: 0,
            events:     Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SessionState::Submitting { .. })
    }

    /// Start a submission. An empty selection is ignored and returns
    /// `None` without touching state.
    ///
    /// Any held report is dropped immediately. A submission already in
    /// flight is superseded; its response will be discarded on arrival.
    pub fn submit(&mut self, file: Option<&UploadFile>) -> Option<SubmissionTicket> {
        let Some(file) = file else {
            log::debug!("session: empty selection ignored");
            return None;
        };

        if let SessionState::Submitting { ticket, .. } = &self.state {
            log::info!(
                "session: generation {} superseded by a new submission",
                ticket.generation
            );
            self.events.push(SessionEvent::SubmissionSuperseded {
                generation: ticket.generation,
            });
        }

        self.generation += 1;
        let ticket = SubmissionTicket {
            generation:    self.generation,
            submission_id: Uuid::new_v4(),
        };

        log::info!(
            "session: submitting {} ({} bytes) as generation {} [{}]",
            file.name,
            file.size(),
            ticket.generation,
            ticket.submission_id
        );
        self.events.push(SessionEvent::SubmissionStarted {
            generation:    ticket.generation,
            submission_id: ticket.submission_id,
            file_name:     file.name.clone(),
            size_bytes:    file.size(),
        });
        self.state = SessionState::Submitting {
            ticket,
            file_name: file.name.clone(),
        };
        Some(ticket)
    }

    /// Apply the outcome of the request identified by `ticket`.
    ///
    /// `outcome` is the raw body on success. Decoding happens here so a
    /// malformed body fails the session instead of half-loading it.
    pub fn resolve(
        &mut self,
        ticket: SubmissionTicket,
        outcome: ViewerResult<Vec<u8>>,
    ) -> Resolution {
        let current = match &self.state {
            SessionState::Submitting { ticket: t, .. } => *t == ticket,
            _ => false,
        };
        if !current || ticket.generation != self.generation {
            log::warn!(
                "session: discarding response for generation {} (current {}) [{}]",
                ticket.generation,
                self.generation,
                ticket.submission_id
            );
            self.events.push(SessionEvent::StaleResponseDiscarded {
                generation: ticket.generation,
                current:    self.generation,
            });
            return Resolution::Stale;
        }

        let decoded = outcome
            .and_then(|body| AnalysisReport::from_json(&body).map_err(ViewerError::from));

        match decoded {
            Ok(report) => {
                log::info!(
                    "session: generation {} loaded ({} suspicious accounts, {} rings)",
                    ticket.generation,
                    report.suspicious_accounts().len(),
                    report.fraud_rings().len()
                );
                self.events.push(SessionEvent::ReportLoaded {
                    generation:          ticket.generation,
                    suspicious_accounts: report.suspicious_accounts().len(),
                    fraud_rings:         report.fraud_rings().len(),
                });
                self.state = SessionState::Loaded(LoadedReport {
                    generation:  ticket.generation,
                    received_at: Utc::now(),
                    report,
                });
                Resolution::Loaded
            }
            Err(err) => {
                log::warn!(
                    "session: generation {} failed: {err} [{}]",
                    ticket.generation,
                    ticket.submission_id
                );
                let message = err.user_message();
                self.events.push(SessionEvent::SubmissionFailed {
                    generation: ticket.generation,
                    message:    message.clone(),
                });
                self.state = SessionState::Failed {
                    generation: ticket.generation,
                    message,
                };
                Resolution::Failed
            }
        }
    }

    /// Drop everything and return to `Idle`. An in-flight response is
    /// discarded when it arrives.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.events.push(SessionEvent::SessionReset {
            generation: self.generation,
        });
        log::info!("session: reset at generation {}", self.generation);
        self.state = SessionState::Idle;
    }

    pub fn report(&self) -> ViewerResult<&AnalysisReport> {
        match &self.state {
            SessionState::Loaded(loaded) => Ok(loaded.report()),
            _ => Err(ViewerError::NoReportAvailable),
        }
    }

    pub fn loaded(&self) -> Option<&LoadedReport> {
        match &self.state {
            SessionState::Loaded(loaded) => Some(loaded),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn graph(&self) -> ViewerResult<Graph> {
        Ok(graph::build(self.report()?))
    }

    pub fn top_suspicious(&self, k: usize) -> ViewerResult<&[SuspiciousAccount]> {
        Ok(ranking::top_suspicious(self.report()?, k))
    }

    pub fn export(&self) -> ViewerResult<ExportArtifact> {
        export::export(self.report()?)
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Hand the recorded events to the caller and clear the log.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
