//! Environment variable loading and management.

use std::env;
use std::path::Path;

/// Management API base URL override
pub const API_URL_VAR: &str = "BOTCTL_API_URL";
/// Bearer token override
pub const TOKEN_VAR: &str = "BOTCTL_TOKEN";
/// Bot id override; skips the bot descriptor lookup
pub const BOT_ID_VAR: &str = "BOTCTL_BOT_ID";
/// Log level override
pub const LOG_VAR: &str = "BOTCTL_LOG";
/// Config file path
pub const CONFIG_VAR: &str = "BOTCTL_CONFIG";

/// Loads environment variables from .env file and system environment.
///
/// Values are read once, at construction.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentLoader {
    env_file: Option<String>,
    api_url: Option<String>,
    token: Option<String>,
    bot_id: Option<String>,
    log_level: Option<String>,
    config_path: Option<String>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to .env file. If None, looks for .env in current directory.
    pub fn new(env_file: Option<&Path>) -> Self {
        let env_path = env_file.unwrap_or(Path::new(".env"));

        if env_path.exists() {
            if let Err(e) = dotenv::from_path(env_path) {
                tracing::warn!("Failed to load .env file: {}", e);
            }
        }

        Self {
            env_file: env_file.map(|p| p.to_string_lossy().to_string()),
            api_url: read(API_URL_VAR),
            token: read(TOKEN_VAR),
            bot_id: read(BOT_ID_VAR),
            log_level: read(LOG_VAR),
            config_path: read(CONFIG_VAR),
        }
    }

    /// A loader with no overrides, ignoring the process environment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Override the API base URL
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Override the API token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the bot id
    pub fn with_bot_id(mut self, bot_id: impl Into<String>) -> Self {
        self.bot_id = Some(bot_id.into());
        self
    }

    /// Override the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// The .env file passed at construction
    pub fn env_file(&self) -> Option<&str> {
        self.env_file.as_deref()
    }

    /// `BOTCTL_API_URL`
    pub fn api_url(&self) -> Option<String> {
        self.api_url.clone()
    }

    /// `BOTCTL_TOKEN`
    pub fn token(&self) -> Option<String> {
        self.token.clone()
    }

    /// `BOTCTL_BOT_ID`
    pub fn bot_id(&self) -> Option<String> {
        self.bot_id.clone()
    }

    /// `BOTCTL_LOG`
    pub fn log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    /// `BOTCTL_CONFIG`
    pub fn config_path(&self) -> Option<String> {
        self.config_path.clone()
    }
}

fn read(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
