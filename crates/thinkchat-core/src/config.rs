use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::client::DEFAULT_SERVER_URL;
use crate::settings::Theme;

pub const SERVER_URL_ENV: &str = "THINKCHAT_URL";

/// Durable preferences, stored as JSON in the user's config directory.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Rewrite only the theme key, keeping whatever else is on disk.
    pub fn save_theme(config_path: &Path, theme: Theme) -> Result<()> {
        let mut config = Self::load_from(config_path).unwrap_or_else(|_| Self::new());
        config.theme = Some(theme);
        config.save_to(config_path)
    }

    pub fn theme(&self) -> Theme {
        self.theme.unwrap_or_default()
    }

    /// Resolve the backend URL: explicit override, then env, then config, then default.
    pub fn resolve_server_url(&self, cli_override: Option<&str>) -> String {
        self.pick_server_url(cli_override, std::env::var(SERVER_URL_ENV).ok())
    }

    fn pick_server_url(&self, cli_override: Option<&str>, env_value: Option<String>) -> String {
        cli_override
            .map(str::to_string)
            .or_else(|| env_value.filter(|s| !s.is_empty()))
            .or_else(|| self.server_url.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("thinkchat").join("config.json"))
    }
}
