//! Monitor settings management

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::scheduler::DEFAULT_POLL_INTERVAL;

/// User-tunable monitor settings, persisted as JSON in the platform config
/// directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Poll cadence in milliseconds while transitions are awaited
    pub poll_interval_ms: u64,
    /// Whether state-change balloons are shown at all
    pub notifications_enabled: bool,
    /// Hypervisor management namespace, e.g. a WMI root path. `None` means
    /// the provider's default for this host.
    pub hypervisor_root: Option<String>,
    /// Enable debug-level logging (RUST_LOG still overrides)
    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            notifications_enabled: true,
            hypervisor_root: None,
            debug_logging: false,
        }
    }
}

impl Settings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Fix any out-of-range values rather than erroring on a hand-edited file.
    pub fn validate(&mut self) {
        self.poll_interval_ms = self.poll_interval_ms.max(500);
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vmwatch")
            .join("settings.json")
    }

    /// Load from the config file; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let mut settings: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse settings at {}", path.display()))?;
        settings.validate();
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }
}
