use std::path::PathBuf;

use anyhow::Context;
use log::debug;

use liftnote_domain as domain;

/// Settings stored as a JSON file. A missing file yields the defaults.
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl domain::SettingsRepository for SettingsFile {
    fn read_settings(&self) -> Result<domain::Settings, domain::ReadError> {
        if !self.path.exists() {
            debug!(
                "no settings at {}, using default settings",
                self.path.display()
            );
            return Ok(domain::Settings::default());
        }

        std::fs::read_to_string(&self.path)
            .context("failed to read settings")
            .and_then(|json| serde_json::from_str(&json).context("failed to parse settings"))
            .with_context(|| self.path.display().to_string())
            .map_err(|err| domain::StorageError::Other(err.into()).into())
    }
}
