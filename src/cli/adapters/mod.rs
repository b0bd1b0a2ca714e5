//! Adapter traits for CLI commands
//!
//! These traits define the small interface between deployment commands and
//! the host: where output goes. The management API seam is
//! [`crate::api::ApiClient`].

pub mod context;

pub use context::{CommandContext, ConsoleContext};
