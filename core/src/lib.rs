//! Core of the money-muling analysis viewer.
//!
//! An uploaded transaction CSV goes to the analysis backend; the report
//! that comes back is held by an `AnalysisSession`, turned into a graph
//! and ranked views on demand, and exported back to JSON.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod export;
pub mod graph;
pub mod ranking;
pub mod report;
pub mod session;
pub mod types;
pub mod view;

pub use client::{AnalysisClient, HttpAnalysisClient, UploadFile};
pub use controller::SessionController;
pub use error::{ReportError, ViewerError, ViewerResult};
pub use graph::{Graph, GraphEdge, GraphNode};
pub use report::{AnalysisReport, FraudRing, ReportSummary, SuspiciousAccount};
pub use session::{AnalysisSession, Resolution, SessionState, SubmissionTicket};
