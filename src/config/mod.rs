//! Configuration management for botctl.
//!
//! This module provides configuration loading through TOML (or JSON) files and
//! environment variable overrides via `.env` files.
//!
//! # Example
//!
//! ```no_run
//! use botctl::config::{ConfigurationLoader, EnvironmentLoader};
//!
//! // Load environment variables
//! let env = EnvironmentLoader::new(None);
//!
//! // Find and load the config file, applying environment overrides
//! let loader = ConfigurationLoader::new_with_env(None, &env).unwrap();
//!
//! println!("API: {}", loader.api_base_url());
//! println!("Bot id override: {:?}", env.bot_id());
//! ```

pub mod config;
pub mod environment;

// Re-export main types for convenience
pub use self::config::{
    expand_path, ApiConfig, BotConfig, Configuration, ConfigurationLoader, LoggingConfig,
    DEFAULT_CONFIG,
};
pub use self::environment::EnvironmentLoader;
