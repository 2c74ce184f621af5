use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    pub base_url: String,
    /// Page size; also the `limit` query parameter
    pub limit: usize,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    pub user_agent: String,
    /// First day of the query window (YYYY-MM-DD)
    pub start_date: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub title: String,
    pub source: String,
    /// File name prefix, followed by `_{start}_to_{today}.geojson`
    pub prefix: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: 20000,
            timeout_secs: 120,
            max_attempts: 3,
            retry_delay_secs: 2,
            user_agent: "quakefence/0.1".to_string(),
            start_date: "2025-03-28".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            title: "USGS Earthquakes within admin0 polygon".to_string(),
            source: "USGS FDSN Event API".to_string(),
            prefix: "usgs_earthquakes_admin0".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.fetch.base_url).context("Invalid fetch.base_url")?;
        if self.fetch.limit == 0 {
            anyhow::bail!("fetch.limit must be at least 1");
        }
        if self.fetch.max_attempts == 0 {
            anyhow::bail!("fetch.max_attempts must be at least 1");
        }
        Ok(())
    }
}
