use crate::application::state::AppState;
use crate::core::traits::StorageBackend;
use crate::utils::APP_NAME;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub struct JsonStorageBackend {
    file_path: PathBuf,
}

impl JsonStorageBackend {
    pub fn new() -> Result<Self> {
        let mut path = dirs::config_dir().context("Could not find config directory")?;
        path.push(APP_NAME);

        fs::create_dir_all(&path)?;

        path.push("settings.json");
        Ok(Self::with_path(path))
    }

    /// Store settings in a specific file instead of the config directory
    pub fn with_path(file_path: PathBuf) -> Self {
        Self { file_path }
    }
}

impl StorageBackend for JsonStorageBackend {
    fn load(&self) -> Result<AppState> {
        if !self.file_path.exists() {
            return Ok(AppState::default());
        }
        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let state: AppState = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        Ok(state)
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        Ok(())
    }
}
