use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Curl settings for the HTTP strategy (`[http]` in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connect timeout in seconds for both the probe and the transfer.
    pub connect_timeout_secs: u64,
    /// Abort when the rate stays below this many bytes/s for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Redirects followed by the HEAD probe and the GET.
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            max_redirections: 10,
            user_agent: concat!("kzn/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn low_speed_time(&self) -> Duration {
        Duration::from_secs(self.low_speed_time_secs)
    }
}

/// Wait bounds for the torrent strategy (`[torrent]` in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorrentConfig {
    /// Maximum wait for magnet/torrent metadata.
    pub metadata_timeout_secs: u64,
    /// Maximum wait for all pieces once metadata is known.
    pub completion_timeout_secs: u64,
    /// Progress bar refresh interval.
    pub progress_interval_ms: u64,
}

impl Default for TorrentConfig {
    fn default() -> Self {
        Self {
            metadata_timeout_secs: 300,
            completion_timeout_secs: 24 * 60 * 60,
            progress_interval_ms: 500,
        }
    }
}

impl TorrentConfig {
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    pub fn progress_interval(&self) -> Duration {
        // tokio::time::interval panics on a zero period.
        Duration::from_millis(self.progress_interval_ms.max(1))
    }
}

/// Global configuration loaded from `~/.config/kzn/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KznConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub torrent: TorrentConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("kzn")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<KznConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = KznConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path; missing keys take defaults.
pub fn load_from(path: &Path) -> Result<KznConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: KznConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}
