//! Test utilities and mock implementations for CLI testing
//!
//! Provides mock adapter implementations for unit testing deployment
//! commands without a terminal or a live management API.

pub mod mocks;

pub use mocks::{MockApiClient, MockCommandContext, Output};
