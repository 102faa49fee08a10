use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

const APP_DIR: &str = "movie-app";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_template_path")]
    pub template_path: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_omdb_url")]
    pub omdb_url: String,

    #[serde(default = "default_lastfm_url")]
    pub lastfm_url: String,

    // Credentials only ever come from the environment.
    #[serde(skip)]
    pub omdb_api_key: Option<String>,
    #[serde(skip)]
    pub lastfm_api_key: Option<String>,
}

fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("movies.db")
        .to_string_lossy()
        .to_string()
}

fn default_template_path() -> String {
    "_static/index_template.html".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_omdb_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_lastfm_url() -> String {
    "http://ws.audioscrobbler.com/2.0/".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            template_path: default_template_path(),
            output_dir: default_output_dir(),
            omdb_url: default_omdb_url(),
            lastfm_url: default_lastfm_url(),
            omdb_api_key: None,
            lastfm_api_key: None,
        }
    }
}

impl Config {
    /// Loads the config file (writing defaults on first run), then picks up
    /// API keys from the environment and any `.env` file.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_from(&Self::config_path())?;
        config.omdb_api_key = env_key("OMDB_API_KEY");
        config.lastfm_api_key = env_key("LASTFM_API_KEY");

        if config.omdb_api_key.is_none() {
            tracing::warn!("OMDB_API_KEY is not set; adding movies will be unavailable");
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
