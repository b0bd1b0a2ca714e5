//! CLI feature - declarative command tree and the deployment commands
//!
//! # Architecture
//!
//! - `declarative` compiles a TOML/JSON command tree into a clap program
//! - `injector` binds the tree's handler and middleware names to services
//! - `commands` holds the deployment command implementations
//! - `adapters` is the output seam (`CommandContext`) commands write through
//!
//! # Example
//!
//! ```rust,ignore
//! use botctl::cli::{declarative::DeclarativeCli, Injector};
//!
//! let registry = Injector::from_config(&loader, &env, None)?.registry()?;
//! DeclarativeCli::new(loader.command_tree()?, registry)
//!     .start(std::env::args())
//!     .await?;
//! ```

#[cfg(feature = "cli")]
pub mod error;

#[cfg(feature = "cli")]
pub mod adapters;

#[cfg(feature = "cli")]
pub mod commands;

#[cfg(feature = "cli")]
pub mod declarative;

#[cfg(feature = "cli")]
pub mod injector;

#[cfg(feature = "cli")]
pub mod middleware;

#[cfg(feature = "cli")]
pub mod utils;

#[cfg(all(feature = "cli", test))]
pub mod test_utils;

// Re-exports for convenience
#[cfg(feature = "cli")]
pub use error::{CliError, CliResult};

#[cfg(feature = "cli")]
pub use adapters::{CommandContext, ConsoleContext};

#[cfg(feature = "cli")]
pub use injector::Injector;

#[cfg(feature = "cli")]
pub use utils::*;
