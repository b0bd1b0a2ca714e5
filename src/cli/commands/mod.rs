//! CLI command implementations
//!
//! Commands work through the `CommandContext` and `ApiClient` seams so they
//! can run against mocks in tests.

pub mod deployment;
