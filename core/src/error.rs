use thiserror::Error;

/// Structural-contract violations found while decoding a report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("report body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("field '{field}' is missing")]
    MissingField { field: &'static str },

    #[error("field '{field}' must be a sequence")]
    NotASequence { field: &'static str },

    #[error("report does not match the expected shape: {0}")]
    Shape(String),

    #[error("processing_time_seconds must be a non-negative finite number, got {0}")]
    InvalidProcessingTime(f64),

    #[error("fraud ring '{ring_id}' has no member accounts")]
    EmptyRing { ring_id: String },
}

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Server returned {status}: {detail}")]
    ServerError { status: u16, detail: String },

    #[error("Malformed report: {0}")]
    MalformedReport(#[from] ReportError),

    #[error("No report available")]
    NoReportAvailable,

    /// Never returned. An empty selection is a silent no-op
    /// (`AnalysisSession::submit` gives `None`); the variant names the case.
    #[error("No file selected")]
    EmptySelection,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ViewerError {
    /// The message stored on a failed session. Never exposes transport
    /// internals beyond a one-line description.
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkFailure(_) => {
                "Error processing file. Ensure backend is running.".to_string()
            }
            Self::ServerError { status, detail } if detail.is_empty() => {
                format!("Analysis failed (HTTP {status}).")
            }
            Self::ServerError { status, detail } => {
                format!("Analysis failed (HTTP {status}): {detail}")
            }
            Self::MalformedReport(_) => {
                "The analysis service returned an unreadable report.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type ViewerResult<T> = Result<T, ViewerError>;
