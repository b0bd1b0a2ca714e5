//! Declarative CLI Framework
//!
//! This module turns a configuration-described command tree into a live CLI.
//! Instead of writing clap builder code per command, you describe the tree
//! (groups, aliases, commands and their parameters) and name the handler and
//! middleware each command runs. The framework:
//! - Resolves every handler and middleware name once, at compile time
//! - Registers groups as `{group}-{command}` and aliases at their own key
//! - Parses argv with clap and runs the matched command to completion
//!
//! ## Usage
//!
//! ```rust,no_run
//! use botctl::cli::declarative::{DeclarativeCli, MethodRegistry};
//!
//! # async fn run(registry: MethodRegistry) -> Result<(), Box<dyn std::error::Error>> {
//! DeclarativeCli::from_file("botctl.toml", registry)?
//!     .start(std::env::args())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod builder;
pub mod compiler;
pub mod config;
pub mod error;
pub mod executor;
pub mod program;
pub mod router;

// Re-export main types
pub use action::{
    alias_action, compose, handler_fn, middleware_fn, Action, ActionOutcome, Handler,
    HandlerFuture, Invocation, Middleware,
};
pub use compiler::CommandCompiler;
pub use config::{
    commands_from_file, commands_from_json_str, commands_from_toml_str, CommandDescriptor,
    CommandList, CommandNode, CommandType, ParamDescriptor,
};
pub use error::{DeclarativeError, DeclarativeResult};
pub use executor::DeclarativeCli;
pub use program::{Dispatch, Program, Subcommand, MAX_ALIAS_DEPTH};
pub use router::{HandlerResolver, Method, MethodRegistry};
