//! # Application Configuration
//!
//! Settings loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! 1. Environment variables (BELLA_*)        ← highest
//! 2. Config file (config.toml)
//!      ~/.config/gestao/config.toml (Linux)
//!      ~/Library/Application Support/com.bella.gestao/config.toml (macOS)
//! 3. Defaults (this file)                    ← lowest
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! data_dir = "/home/ana/bella-data"
//! utc_offset = "-03:00"
//! pretty_json = true
//! ```
//!
//! `currency_symbol = "R$"` may be set to override the symbol derived from
//! the profile currency.
//!
//! Read-only after startup.

use chrono::{FixedOffset, Local, Offset};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Invalid UTC offset '{0}', expected e.g. -03:00")]
    InvalidOffset(String),

    #[error("No config directory available")]
    NoConfigDir,

    #[error("Failed to write config file: {0}")]
    Write(#[source] std::io::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory of the snapshot file.
    /// Default: the platform data directory
    pub data_dir: Option<PathBuf>,

    /// Display symbol. Default: derived from the profile currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,

    /// Operator's calendar offset, e.g. "-03:00".
    /// Default: the host's current offset
    pub utc_offset: Option<String>,

    /// Indent the snapshot JSON.
    pub pretty_json: bool,
}

impl Default for AppConfig {
    /// Defaults for a Brazilian single-operator shop.
    fn default() -> Self {
        AppConfig {
            data_dir: None,
            currency_symbol: None,
            utc_offset: None,
            pretty_json: true,
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| {
                    ConfigError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.offset()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Write)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(ConfigError::Write)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// ## Environment Variables
    /// - `BELLA_DATA_DIR`: snapshot directory
    /// - `BELLA_CURRENCY_SYMBOL`: display symbol
    /// - `BELLA_UTC_OFFSET`: calendar offset, e.g. `-03:00`
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("BELLA_DATA_DIR") {
            debug!(dir = %dir, "Overriding data dir from environment");
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Ok(symbol) = std::env::var("BELLA_CURRENCY_SYMBOL") {
            self.currency_symbol = Some(symbol);
        }

        if let Ok(offset) = std::env::var("BELLA_UTC_OFFSET") {
            debug!(offset = %offset, "Overriding UTC offset from environment");
            self.utc_offset = Some(offset);
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Directory holding the snapshot file.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.bella.gestao/`
    /// - **Windows**: `%APPDATA%\bella\gestao\data\`
    /// - **Linux**: `~/.local/share/gestao/`
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The operator's calendar offset.
    pub fn offset(&self) -> ConfigResult<FixedOffset> {
        match &self.utc_offset {
            Some(raw) => parse_offset(raw),
            None => Ok(Local::now().offset().fix()),
        }
    }

    /// This config with the symbol for `currency` (an ISO 4217 code)
    /// filled in, unless a symbol is configured explicitly.
    pub fn with_currency(&self, currency: &str) -> AppConfig {
        let mut config = self.clone();
        if config.currency_symbol.is_none() {
            config.currency_symbol = Some(currency_symbol_for(currency));
        }
        config
    }

    /// Formats a cent amount as a currency string, always with two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use bella_cli::state::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(1234), "R$12.34");
    /// assert_eq!(config.with_currency("EUR").format_currency(-5), "-€0.05");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let symbol = self.currency_symbol.as_deref().unwrap_or(DEFAULT_CURRENCY_SYMBOL);
        let abs = cents.unsigned_abs();

        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            symbol,
            abs / 100,
            abs % 100
        )
    }
}

/// Symbol of the default profile currency (BRL).
const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

/// Display symbol for an ISO 4217 code; unknown codes print as `"CHF "`.
pub fn currency_symbol_for(currency: &str) -> String {
    let code = currency.trim().to_uppercase();
    match code.as_str() {
        "BRL" => DEFAULT_CURRENCY_SYMBOL.to_string(),
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        _ => format!("{} ", code),
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "bella", "gestao")
}

/// Parses `±HH:MM` (or `Z`) into an offset.
pub fn parse_offset(raw: &str) -> ConfigResult<FixedOffset> {
    let invalid = || ConfigError::InvalidOffset(raw.to_string());
    let s = raw.trim();

    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Ok(chrono::Utc.fix());
    }

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 14 || minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_positive() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(1234), "R$12.34");
        assert_eq!(config.format_currency(100), "R$1.00");
        assert_eq!(config.format_currency(1), "R$0.01");
        assert_eq!(config.format_currency(0), "R$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(-1234), "-R$12.34");
        assert_eq!(config.format_currency(-1), "-R$0.01");
        assert_eq!(
            config.format_currency(i64::MIN),
            "-R$92233720368547758.08"
        );
    }

    #[test]
    fn test_decimals_setting_is_ignored() {
        let config: AppConfig = toml::from_str("currency_decimals = 0").unwrap();
        assert_eq!(config.format_currency(4990), "R$49.90");

        let config: AppConfig = toml::from_str("currency_decimals = 3").unwrap();
        assert_eq!(config.format_currency(4990), "R$49.90");
    }

    #[test]
    fn test_symbol_follows_profile_currency() {
        let config = AppConfig::default();
        assert_eq!(config.with_currency("BRL").format_currency(4990), "R$49.90");
        assert_eq!(config.with_currency("eur").format_currency(4990), "€49.90");
        assert_eq!(config.with_currency("USD").format_currency(4990), "$49.90");
        assert_eq!(config.with_currency("CHF").format_currency(4990), "CHF 49.90");

        let pinned = AppConfig {
            currency_symbol: Some("Kz".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(pinned.with_currency("EUR").format_currency(4990), "Kz49.90");
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("-03:00").unwrap().local_minus_utc(), -3 * 3600);
        assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 5 * 3600 + 1800);
        assert_eq!(parse_offset("+9").unwrap().local_minus_utc(), 9 * 3600);
        assert_eq!(parse_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_offset("03:00").is_err());
        assert!(parse_offset("-25:00").is_err());
        assert!(parse_offset("-03:xx").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig {
            data_dir: Some(dir.path().join("data")),
            currency_symbol: Some("€".to_string()),
            utc_offset: Some("+01:00".to_string()),
            pretty_json: false,
        };
        config.save(Some(path.clone())).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(toml::from_str::<AppConfig>(&raw).unwrap(), config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(r#"utc_offset = "-03:00""#).unwrap();
        assert_eq!(config.currency_symbol, None);
        assert_eq!(config.format_currency(100), "R$1.00");
        assert_eq!(config.offset().unwrap().local_minus_utc(), -3 * 3600);
    }
}
