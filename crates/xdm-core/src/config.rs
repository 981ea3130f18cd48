use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File-name token that identifies a reference marker.
pub const DEFAULT_MARKER_TOKEN: &str = "xdm_ref_path.txt";

/// File name every fetched artifact is written under, beside its marker.
pub const DEFAULT_DESTINATION_FILE_NAME: &str = "file.pdf";

/// Transport parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Upper bound in seconds for a single fetch, connect through last byte.
    pub fetch_timeout_secs: u64,
    /// Maximum number of redirects followed per fetch.
    pub max_redirections: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            fetch_timeout_secs: 600,
            max_redirections: 10,
        }
    }
}

impl TransportConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/xdm/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XdmConfig {
    /// A file whose name contains this token is a reference marker.
    pub marker_token: String,
    /// Name of the file written beside each marker.
    pub destination_file_name: String,
    /// Maximum fetches in flight at once; 0 = no limit.
    pub max_concurrent_fetches: usize,
    /// Optional transport section; if missing, built-in defaults are used.
    #[serde(default)]
    pub transport: Option<TransportConfig>,
}

impl Default for XdmConfig {
    fn default() -> Self {
        Self {
            marker_token: DEFAULT_MARKER_TOKEN.to_string(),
            destination_file_name: DEFAULT_DESTINATION_FILE_NAME.to_string(),
            max_concurrent_fetches: 8,
            transport: None,
        }
    }
}

impl XdmConfig {
    /// Concurrency cap for the orchestrator; `None` when unbounded.
    pub fn concurrency_limit(&self) -> Option<usize> {
        match self.max_concurrent_fetches {
            0 => None,
            n => Some(n),
        }
    }

    /// Transport settings, falling back to defaults.
    pub fn transport(&self) -> TransportConfig {
        self.transport.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("xdm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<XdmConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<XdmConfig> {
    if !path.exists() {
        let default_cfg = XdmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let cfg: XdmConfig =
        toml::from_str(&data).with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}
