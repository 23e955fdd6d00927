//! Report export: the downloadable JSON artifact.
//!
//! The artifact is the held report re-encoded as pretty JSON (2-space
//! indent, fields in report order). Decoding the bytes with
//! `AnalysisReport::from_json` yields a report equal to the one exported.

use crate::{error::ViewerResult, report::AnalysisReport};
use std::path::{Path, PathBuf};

pub const EXPORT_FILENAME: &str = "muling_analysis_report.json";
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename:     String,
    pub content_type: &'static str,
    pub bytes:        Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact into `dir` under its own filename.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> ViewerResult<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        log::info!("export: wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

/// Encode the report under the standard filename.
pub fn export(report: &AnalysisReport) -> ViewerResult<ExportArtifact> {
    export_as(report, EXPORT_FILENAME)
}

pub fn export_as(report: &AnalysisReport, filename: &str) -> ViewerResult<ExportArtifact> {
    let bytes = serde_json::to_vec_pretty(report)?;
    Ok(ExportArtifact {
        filename: filename.to_string(),
        content_type: EXPORT_CONTENT_TYPE,
        bytes,
    })
}
