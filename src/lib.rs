//! botctl - deployment management CLI built on a declarative command tree
//!
//! botctl provides a set of feature-gated modules:
//!
//! - **`config`** - Configuration and environment loading
//! - **`observability`** - Session logging and tracing setup
//! - **`api`** - Deployment API client
//! - **`cli`** - Declarative command compiler and the deployment commands
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! botctl = { version = "0.3", default-features = false, features = ["api"] }
//! # Or enable everything:
//! botctl = { version = "0.3", features = ["all"] }
//! ```
//!
//! # Example: Using the config feature
//!
//! ```ignore
//! use botctl::config::{ConfigurationLoader, EnvironmentLoader};
//!
//! let env = EnvironmentLoader::new(None);
//! let loader = ConfigurationLoader::new_with_env(None, &env).unwrap();
//! println!("API: {}", loader.api_base_url());
//! ```
//!
//! # Example: Declaring a command tree
//!
//! ```ignore
//! use botctl::cli::declarative::{commands_from_toml_str, handler_fn, DeclarativeCli, MethodRegistry};
//!
//! let tree = commands_from_toml_str(r#"
//! [greet]
//! args = "<name>"
//! handler = "hello.greet"
//! "#)?;
//!
//! let mut registry = MethodRegistry::new();
//! registry.register_handler("hello.greet", handler_fn(|inv| async move {
//!     println!("hello {}", inv.arg_str(0).unwrap_or("world"));
//! }))?;
//!
//! DeclarativeCli::new(tree, registry).start(std::env::args()).await?;
//! ```

#![warn(missing_docs)]

/// Configuration management (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

/// Observability utilities (enabled with the `observability` feature)
#[cfg(feature = "observability")]
pub mod observability;

/// Deployment API client (enabled with the `api` feature)
#[cfg(feature = "api")]
pub mod api;

/// Declarative CLI and deployment commands (enabled with the `cli` feature)
#[cfg(feature = "cli")]
pub mod cli;

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "config")]
    pub use crate::config::{Configuration, ConfigurationLoader, EnvironmentLoader};

    #[cfg(feature = "observability")]
    pub use crate::observability::Logger;

    #[cfg(feature = "api")]
    pub use crate::api::{ApiClient, ApiError, Deployment, HttpApiClient};

    #[cfg(feature = "cli")]
    pub use crate::cli::declarative::{
        DeclarativeCli, Dispatch, HandlerResolver, Invocation, MethodRegistry,
    };

    #[cfg(feature = "cli")]
    pub use crate::cli::{CliError, Injector};
}
