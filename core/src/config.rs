use crate::{client::DEFAULT_ENDPOINT, export::EXPORT_FILENAME, ranking::DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Viewer settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub endpoint:             String,
    pub export_filename:      String,
    pub top_k:                usize,
    /// Off by default; a hung request then leaves the session submitting.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            endpoint:             DEFAULT_ENDPOINT.to_string(),
            export_filename:      EXPORT_FILENAME.to_string(),
            top_k:                DEFAULT_TOP_K,
            request_timeout_secs: None,
        }
    }
}

impl ViewerConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: ViewerConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.endpoint.trim().is_empty() {
            anyhow::bail!("endpoint must not be empty");
        }
        if self.export_filename.trim().is_empty() {
            anyhow::bail!("export_filename must not be empty");
        }
        if self.top_k == 0 {
            anyhow::bail!("top_k must be at least 1");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
