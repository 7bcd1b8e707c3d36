//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.wenturc.com";

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub wenturc: WenturcConfig,
    pub cooldown: CooldownConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WenturcConfig {
    pub base_url: String,
    /// Text placed between the mention and the image attachment
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CooldownConfig {
    pub window_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub max_concurrent_fetches: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    /// Where downloaded images are staged; OS temp dir when unset
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AdaptersConfig {
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub user_id: String,
    pub nickname: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "random-image-bot".to_string(),
            prefix: "/".to_string(),
        }
    }
}

impl Default for WenturcConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            caption: None,
        }
    }
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self { window_seconds: 10 }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("random-image-bot/{}", env!("CARGO_PKG_VERSION")),
            max_concurrent_fetches: 5,
        }
    }
}

impl Default for AdaptersConfig {
    fn default() -> Self {
        Self {
            console: Some(ConsoleConfig::default()),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_id: "console".to_string(),
            nickname: None,
        }
    }
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config = Self::parse(content)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Load `path` if it exists, apply the environment and validate the result.
    ///
    /// Never fails: an unreadable or invalid file falls back to defaults plus
    /// environment, and invalid overrides fall back to plain defaults.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let content = if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => Some(content),
                Err(e) => {
                    tracing::warn!("Failed to read config {}: {}", path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        Self::resolve(content.as_deref(), |key| std::env::var(key).ok())
    }

    fn resolve(content: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(content) = content {
            let loaded = Self::parse(content).and_then(|mut config| {
                config.apply_overrides(&lookup);
                config.validate().map(|()| config)
            });
            match loaded {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Failed to load config: {}, using defaults", e),
            }
        }

        let mut config = Config::default();
        config.apply_overrides(&lookup);
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!("Ignoring environment overrides: {}", e);
                Config::default()
            }
        }
    }

    /// Environment variables override file values
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(prefix) = lookup("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }

        if let Some(base_url) = lookup("WENTURC_BASE_URL") {
            self.wenturc.base_url = base_url;
        }

        if let Some(window) = lookup("RANDOM_IMAGE_COOLDOWN") {
            match window.parse() {
                Ok(secs) => self.cooldown.window_seconds = secs,
                Err(_) => tracing::warn!("Ignoring invalid RANDOM_IMAGE_COOLDOWN: {}", window),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue("bot.prefix must not be empty".to_string()));
        }

        if self.http.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidValue("http.max-concurrent-fetches must be at least 1".to_string()));
        }

        match url::Url::parse(&self.wenturc.base_url) {
            Ok(url) if url.has_host() => Ok(()),
            _ => Err(ConfigError::InvalidValue(format!(
                "wenturc.base-url is not an absolute URL: {}",
                self.wenturc.base_url
            ))),
        }
    }

    /// Directory for downloaded images
    pub fn temp_dir(&self) -> PathBuf {
        self.storage.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn cooldown_window(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cooldown.window_seconds)
    }
}
