//! Upload transport: the only place the viewer touches the network.
//!
//! `AnalysisClient` is the seam between the session and the analysis
//! backend: one call, one request, no retries. The HTTP implementation
//! posts the file as multipart form data and hands back the raw body;
//! decoding and validation happen in the session, not here.

use crate::error::{ViewerError, ViewerResult};
use reqwest::{
    multipart::{Form, Part},
    Url,
};
use serde::Deserialize;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/analyze";

/// Multipart field name the backend reads the upload from.
const FORM_FIELD: &str = "file";
const UPLOAD_MIME: &str = "text/csv";
const MAX_DETAIL_CHARS: usize = 200;

/// A selected transaction file. Contents are opaque to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name:  String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), bytes: bytes.into() }
    }

    pub fn from_path(path: impl AsRef<Path>) -> ViewerResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        if !name.to_ascii_lowercase().ends_with(".csv") {
            log::warn!("upload: {name} does not look like a CSV; the backend may reject it");
        }
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The analysis backend as seen by the session.
pub trait AnalysisClient {
    /// Send one file, return the raw success body.
    ///
    /// Transport failures map to `NetworkFailure`, non-2xx statuses to
    /// `ServerError`. The body is not inspected.
    fn analyze(&self, file: &UploadFile) -> impl Future<Output = ViewerResult<Vec<u8>>> + Send;
}

/// Response of the backend's `GET /` probe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendHealth {
    pub status: String,
    #[serde(default)]
    pub engine: String,
}

pub struct HttpAnalysisClient {
    http:     reqwest::Client,
    endpoint: Url,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: &str) -> ViewerResult<Self> {
        Self::with_timeout(endpoint, None)
    }

    /// No timeout is applied unless one is given here.
    pub fn with_timeout(endpoint: &str, timeout: Option<Duration>) -> ViewerResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| anyhow::anyhow!("Invalid endpoint {endpoint}: {e}"))?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ViewerError::NetworkFailure(e.to_string()))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Probe the backend root. Useful before a long upload.
    pub async fn health(&self) -> ViewerResult<BackendHealth> {
        let mut url = self.endpoint.clone();
        url.set_path("/");
        url.set_query(None);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ViewerError::NetworkFailure(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ViewerError::NetworkFailure(e.to_string()))?;
        if !status.is_success() {
            return Err(ViewerError::ServerError {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, file: &UploadFile) -> ViewerResult<Vec<u8>> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(UPLOAD_MIME)
            .map_err(|e| ViewerError::NetworkFailure(e.to_string()))?;
        let form = Form::new().part(FORM_FIELD, part);

        log::debug!("upload: POST {} ({} bytes)", self.endpoint, file.size());
        let resp = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ViewerError::NetworkFailure(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ViewerError::NetworkFailure(e.to_string()))?;

        if !status.is_success() {
            return Err(ViewerError::ServerError {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }
        Ok(body.to_vec())
    }
}

/// Pull a readable reason out of an error body. FastAPI-style
/// `{"detail": "..."}` first, raw text otherwise.
pub fn error_detail(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(s)) => return truncate(s),
            Some(other) => return truncate(&other.to_string()),
            None => {}
        }
    }
    truncate(String::from_utf8_lossy(body).trim())
}

fn truncate(s: &str) -> String {
    s.chars().take(MAX_DETAIL_CHARS).collect()
}
