use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub server: ServerSettings,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            storage: StorageSettings::default(),
            display: DisplaySettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl AdvisorConfig {
    /// Read a TOML config file, falling back to defaults when it is absent.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        if let Err(errors) = config.validate() {
            anyhow::bail!("invalid config {}: {}", path.display(), errors.join("; "));
        }
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // Storage validation
        if self.storage.snapshot_path.as_os_str().is_empty() {
            errors.push("snapshot_path must not be empty".to_string());
        }

        // Display validation
        if self.display.display_window == 0 {
            errors.push("display_window must be > 0".to_string());
        }

        // Server validation
        if self.server.host.trim().is_empty() {
            errors.push("server host must not be empty".to_string());
        }
        if self.server.port == 0 {
            errors.push("server port must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub snapshot_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("data/session.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Trailing rounds the combined state view returns.
    pub display_window: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { display_window: 72 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}
