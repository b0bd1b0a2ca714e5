//! TOML configuration parsing and management.

use super::environment::EnvironmentLoader;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Built-in configuration, including the default command tree
pub const DEFAULT_CONFIG: &str = include_str!("default.toml");

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "botctl.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[cfg(feature = "cli")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<crate::cli::declarative::CommandList>,
}

/// Management API connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Static bearer token (supports `$VAR` substitution)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. `warn` or `info,botctl::api=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Markdown session log; disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Local bot project settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot descriptor file holding the bot `id` (TOML or JSON)
    #[serde(default = "default_descriptor")]
    pub descriptor: String,
}

fn default_descriptor() -> String {
    "bot.toml".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            descriptor: default_descriptor(),
        }
    }
}

/// Configuration loader
#[derive(Debug, Clone)]
pub struct ConfigurationLoader {
    /// File the configuration came from; `None` for the built-in default
    pub config_path: Option<PathBuf>,
    pub config: Configuration,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to config file. If None, searches `$BOTCTL_CONFIG`,
    ///   `./botctl.toml` and the user config directory, then falls back to the
    ///   built-in default.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let env = EnvironmentLoader::new(None);
        Self::new_with_env(config_path, &env)
    }

    /// Same as [`ConfigurationLoader::new`], reading overrides from `env`.
    pub fn new_with_env(config_path: Option<&Path>, env: &EnvironmentLoader) -> Result<Self> {
        let candidates = candidate_paths(
            config_path,
            env.config_path().as_deref(),
            dirs::config_dir().as_deref(),
        );

        let config_path = match config_path {
            // An explicit path must exist
            Some(_) => candidates.into_iter().next(),
            None => candidates.into_iter().find(|p| p.exists()),
        };

        let mut config = match &config_path {
            Some(path) => Self::load_config(path)?,
            None => Self::get_default_config()?,
        };
        Self::apply_environment(&mut config, env);

        tracing::debug!(
            path = ?config_path,
            base_url = %config.api.base_url,
            "configuration loaded"
        );

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Create a configuration loader from a pre-parsed Configuration.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config_path: None,
            config,
        }
    }

    /// Load configuration from a TOML (or `.json`) file.
    fn load_config(path: &Path) -> Result<Configuration> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            _ => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
        }
    }

    /// Get default configuration.
    pub fn get_default_config() -> Result<Configuration> {
        toml::from_str(DEFAULT_CONFIG).context("Failed to parse built-in configuration")
    }

    fn apply_environment(config: &mut Configuration, env: &EnvironmentLoader) {
        if let Some(url) = env.api_url() {
            config.api.base_url = url;
        }
        if let Some(token) = env.token() {
            config.api.token = Some(token);
        }
        if let Some(level) = env.log_level() {
            config.logging.level = level;
        }
    }

    /// The command tree, falling back to the built-in one when the file has none
    #[cfg(feature = "cli")]
    pub fn command_tree(&self) -> Result<crate::cli::declarative::CommandList> {
        match &self.config.commands {
            Some(commands) => Ok(commands.clone()),
            None => Ok(Self::get_default_config()?.commands.unwrap_or_default()),
        }
    }

    /// API base URL without a trailing slash
    pub fn api_base_url(&self) -> String {
        self.config.api.base_url.trim_end_matches('/').to_string()
    }

    /// API token with `$VARS` expanded
    pub fn api_token(&self) -> Option<String> {
        self.config
            .api
            .token
            .as_deref()
            .map(expand)
            .filter(|t| !t.is_empty())
    }

    /// Session log path, if enabled
    pub fn log_file(&self) -> Option<PathBuf> {
        self.config.logging.file.as_deref().map(expand_path)
    }

    /// Bot descriptor path
    pub fn bot_descriptor(&self) -> PathBuf {
        expand_path(&self.config.bot.descriptor)
    }
}

/// Config file candidates in lookup order
fn candidate_paths(
    explicit: Option<&Path>,
    from_env: Option<&str>,
    config_dir: Option<&Path>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(expand_path(&path.to_string_lossy()));
    }
    if let Some(path) = from_env.filter(|p| !p.is_empty()) {
        candidates.push(expand_path(path));
    }
    candidates.push(PathBuf::from(LOCAL_CONFIG_FILE));
    if let Some(dir) = config_dir {
        candidates.push(dir.join("botctl").join("config.toml"));
    }
    candidates
}

fn expand(value: &str) -> String {
    match shellexpand::full(value) {
        Ok(expanded) => expanded.into_owned(),
        Err(_) => shellexpand::tilde(value).into_owned(),
    }
}

/// Expand `~` and `$VARS` in a path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(expand(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ConfigurationLoader::get_default_config().unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.file.is_none());
        assert_eq!(config.bot.descriptor, "bot.toml");
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_default_command_tree() {
        let config = ConfigurationLoader::get_default_config().unwrap();
        let commands = config.commands.unwrap();
        let keys: Vec<&str> = commands.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["deployment", "deploy"]);

        let deployment = commands["deployment"].subcommands.as_ref().unwrap();
        let subs: Vec<&str> = deployment.keys().map(|k| k.as_str()).collect();
        assert_eq!(subs, vec!["deploy", "add-channel", "remove-channel", "drop", "list"]);
        assert_eq!(commands["deploy"].alias.as_deref(), Some("deployment-deploy"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("botctl.toml");
        fs::write(
            &path,
            r#"
[api]
base_url = "https://api.example.com/v1/"
token = "abc"
timeout_secs = 5

[logging]
level = "debug"
file = "/tmp/botctl.md"
"#,
        )
        .unwrap();

        let loader =
            ConfigurationLoader::new_with_env(Some(&path), &EnvironmentLoader::empty()).unwrap();
        assert_eq!(loader.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(loader.api_base_url(), "https://api.example.com/v1");
        assert_eq!(loader.api_token().as_deref(), Some("abc"));
        assert_eq!(loader.config.api.timeout_secs, 5);
        assert_eq!(loader.config.logging.level, "debug");
        assert_eq!(loader.log_file(), Some(PathBuf::from("/tmp/botctl.md")));
        assert_eq!(loader.bot_descriptor(), PathBuf::from("bot.toml"));
    }

    #[test]
    fn test_load_from_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("botctl.json");
        fs::write(&path, r#"{"bot": {"descriptor": "project/bot.json"}}"#).unwrap();

        let loader =
            ConfigurationLoader::new_with_env(Some(&path), &EnvironmentLoader::empty()).unwrap();
        assert_eq!(loader.config.bot.descriptor, "project/bot.json");
        assert_eq!(loader.config.api.base_url, "http://localhost:3000/api");
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = ConfigurationLoader::new_with_env(Some(&path), &EnvironmentLoader::empty())
            .unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_environment_overrides() {
        let env = EnvironmentLoader::empty()
            .with_api_url("https://staging.example.com")
            .with_token("secret")
            .with_log_level("info");

        let mut config = ConfigurationLoader::get_default_config().unwrap();
        ConfigurationLoader::apply_environment(&mut config, &env);
        assert_eq!(config.api.base_url, "https://staging.example.com");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_candidate_order() {
        let candidates = candidate_paths(
            Some(Path::new("/etc/botctl.toml")),
            Some("/from/env.toml"),
            Some(Path::new("/home/u/.config")),
        );
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/etc/botctl.toml"),
                PathBuf::from("/from/env.toml"),
                PathBuf::from("botctl.toml"),
                PathBuf::from("/home/u/.config/botctl/config.toml"),
            ]
        );

        let candidates = candidate_paths(None, Some(""), None);
        assert_eq!(candidates, vec![PathBuf::from("botctl.toml")]);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_command_tree_falls_back_to_builtin() {
        let loader = ConfigurationLoader::from_config(Configuration::default());
        let tree = loader.command_tree().unwrap();
        assert!(tree.contains_key("deployment"));
        assert!(tree.contains_key("deploy"));
    }
}
