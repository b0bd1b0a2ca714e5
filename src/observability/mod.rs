//! Observability for CLI sessions.
//!
//! Two layers: `tracing` diagnostics on stderr (see [`init_tracing`]) and an
//! optional markdown session log ([`Logger`]).
//!
//! # Example
//!
//! ```no_run
//! use botctl::observability::{init_tracing, Logger};
//!
//! init_tracing("warn");
//!
//! let logger = Logger::new(None, Some("DEBUG")).unwrap();
//! logger.log_session_start(&["botctl".to_string(), "deploy".to_string()]).unwrap();
//! logger.log_dispatch("deployment-deploy", &[]).unwrap();
//! logger.log_completion("command finished").unwrap();
//! ```

pub mod logger;
pub mod subscriber;

// Re-export main types for convenience
pub use logger::Logger;
pub use subscriber::init_tracing;
