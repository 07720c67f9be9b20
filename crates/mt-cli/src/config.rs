//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use mt_core::EngineConfig;
use serde::{Deserialize, Deserializer, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file holding read/dismissed state.
    pub database_path: PathBuf,
    /// Directory containing the JSON log snapshots.
    pub logs_dir: PathBuf,
    /// The organization's own company ID, used for shipment direction.
    #[serde(deserialize_with = "string_or_number")]
    pub home_company_id: String,
    /// Days an event stays eligible for notifications.
    pub recent_window_days: u32,
    /// Events per page.
    pub page_size: usize,
    /// Seconds between refreshes in `mt watch`.
    pub poll_interval_secs: u64,
    /// Quiet period before a typed search runs in `mt watch`.
    pub search_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let engine = EngineConfig::default();
        Self {
            database_path: data_dir.join("mt.db"),
            logs_dir: data_dir.join("logs"),
            home_company_id: engine.home_company_id,
            recent_window_days: engine.recent_window_days,
            page_size: engine.page_size,
            poll_interval_secs: 60,
            search_debounce_ms: 300,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (MT_*)
        figment = figment.merge(Env::prefixed("MT_"));

        figment.extract()
    }

    /// Settings handed to the core engine.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            home_company_id: self.home_company_id.clone(),
            recent_window_days: self.recent_window_days,
            page_size: self.page_size,
        }
    }
}

/// Company IDs are often numeric; accept either form from TOML or env.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Integer(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Integer(n) => n.to_string(),
    })
}

/// Returns the platform-specific config directory for mt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mt"))
}

/// Returns the platform-specific data directory for mt.
///
/// On Linux: `~/.local/share/mt`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("mt"))
}
