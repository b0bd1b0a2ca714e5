//! Client for the bot management API.
//!
//! [`ApiClient`] is the seam the deployment commands are written against;
//! [`HttpApiClient`] implements it with `reqwest`.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, HttpApiClient};
pub use error::{ApiError, ApiResult};
pub use types::{BotVersions, Channel, ChannelOptions, Deployment, DeploymentBody};
