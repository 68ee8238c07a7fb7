//! Server configuration read from the environment.

use std::collections::HashMap;
use std::path::Path;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default OpenRouter API root.
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Model asked to draft decks.
pub const DEFAULT_OPENROUTER_MODEL: &str = "mistralai/mixtral-8x7b-instruct";

/// Default Pexels API root.
pub const DEFAULT_PEXELS_BASE_URL: &str = "https://api.pexels.com/v1";

/// Site URL sent to OpenRouter as the referer.
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: String,

    /// OpenRouter key. Without one, decks are always built locally.
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub openrouter_model: String,

    /// Pexels key. Without one, every image is a placeholder.
    pub pexels_api_key: Option<String>,
    pub pexels_base_url: String,

    pub site_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            openrouter_api_key: None,
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            openrouter_model: DEFAULT_OPENROUTER_MODEL.to_string(),
            pexels_api_key: None,
            pexels_base_url: DEFAULT_PEXELS_BASE_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from `.env` in the working directory, if
    /// present, and the process environment.
    pub fn load() -> Self {
        match Self::from_env_file(".env") {
            Ok(config) => {
                log::info!("Loaded settings from .env");
                config
            }
            Err(e) if e.not_found() => Self::from_env(),
            Err(e) => {
                log::warn!("Ignoring unreadable .env file: {}", e);
                Self::from_env()
            }
        }
    }

    /// Read a `.env`-style file. Process variables win over file values.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, dotenvy::Error> {
        let file = dotenvy::from_path_iter(path.as_ref())?
            .collect::<Result<HashMap<String, String>, _>>()?;

        Ok(Self::from_lookup(|key| {
            std::env::var(key).ok().or_else(|| file.get(key).cloned())
        }))
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            bind: var("DECK_BIND").unwrap_or(defaults.bind),
            openrouter_api_key: var("OPENROUTER_API_KEY"),
            openrouter_base_url: var("OPENROUTER_BASE_URL").unwrap_or(defaults.openrouter_base_url),
            openrouter_model: var("OPENROUTER_MODEL").unwrap_or(defaults.openrouter_model),
            pexels_api_key: var("PEXELS_API_KEY"),
            pexels_base_url: var("PEXELS_BASE_URL").unwrap_or(defaults.pexels_base_url),
            site_url: var("SITE_URL").unwrap_or(defaults.site_url),
        }
    }
}
