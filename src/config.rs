// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::DonationFigures;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Immutable settings handed to every fetch and render call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sheet: SheetConfig,
    pub rate: RateConfig,
    pub polling: PollingConfig,
    pub pix: PixConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub base_url: String,
    pub sheet_id: String,
    pub sheet_name: String,
    pub backup: DonationFigures,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    pub base_url: String,
    /// EUR/BRL series on the Banco Central SGS API
    pub series_code: u32,
    pub backup_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub donation_interval_secs: u64,
    pub rate_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixConfig {
    pub key: String,
    pub notice_millis: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://docs.google.com/spreadsheets/d".to_string(),
            sheet_id: "1uYatfdAcGMl3h-3yN5d3HLuBycsAanykFVTs--lVf24".to_string(),
            sheet_name: "D4".to_string(),
            backup: DonationFigures {
                raised: 7734.45,
                needed: 46181.25,
            },
        }
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.bcb.gov.br/dados/serie".to_string(),
            series_code: 21619,
            backup_rate: 5.50,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            donation_interval_secs: 5 * 60,
            rate_interval_secs: 30 * 60,
        }
    }
}

impl Default for PixConfig {
    fn default() -> Self {
        Self {
            key: "11942157562".to_string(),
            notice_millis: 3000,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl SheetConfig {
    /// CSV export URL for the configured sheet tab
    pub fn csv_url(&self) -> String {
        format!(
            "{}/{}/gviz/tq?tqx=out:csv&sheet={}",
            self.base_url.trim_end_matches('/'),
            self.sheet_id,
            self.sheet_name
        )
    }
}

impl RateConfig {
    /// Latest single data point of the configured series
    pub fn latest_url(&self) -> String {
        format!(
            "{}/bcdata.sgs.{}/dados/ultimos/1?formato=json",
            self.base_url.trim_end_matches('/'),
            self.series_code
        )
    }
}

impl PollingConfig {
    pub fn donation_interval(&self) -> Duration {
        Duration::from_secs(self.donation_interval_secs)
    }

    pub fn rate_interval(&self) -> Duration {
        Duration::from_secs(self.rate_interval_secs)
    }

    /// Both periods must be at least one second.
    pub fn validate(&self) -> Result<()> {
        if self.donation_interval_secs == 0 {
            bail!("polling.donation_interval_secs must be greater than zero");
        }
        if self.rate_interval_secs == 0 {
            bail!("polling.rate_interval_secs must be greater than zero");
        }
        Ok(())
    }
}

impl PixConfig {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_millis)
    }
}

impl HttpConfig {
    pub fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }
}

/// Resolve which file to read: explicit flag first, then `config.toml` in the
/// working directory.
pub fn get_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Read a config file, falling back to the built-in defaults when it does not
/// exist. Environment overrides are applied last, then the result is
/// validated.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Config::default()
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    config
        .polling
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let config_str = toml::to_string_pretty(config)?;
    fs::write(path, config_str)?;
    Ok(())
}

fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(id) = lookup("DONATION_SHEET_ID") {
        config.sheet.sheet_id = id;
    }
    if let Some(name) = lookup("DONATION_SHEET_NAME") {
        config.sheet.sheet_name = name;
    }
    if let Some(url) = lookup("DONATION_SHEET_BASE_URL") {
        config.sheet.base_url = url;
    }
    if let Some(url) = lookup("DONATION_RATE_BASE_URL") {
        config.rate.base_url = url;
    }
    if let Some(code) = lookup("DONATION_SERIES_CODE") {
        config.rate.series_code = code
            .parse()
            .with_context(|| format!("DONATION_SERIES_CODE is not a number: {}", code))?;
    }
    Ok(())
}
