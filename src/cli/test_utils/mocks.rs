//! Mock implementations of adapter traits for testing

use crate::api::{
    ApiClient, ApiError, ApiResult, BotVersions, Channel, Deployment, DeploymentBody,
};
use crate::cli::adapters::CommandContext;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex};

/// One piece of command output
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Line(String),
    Value(serde_json::Value),
}

/// Mock implementation of CommandContext for testing
#[derive(Clone, Default)]
pub struct MockCommandContext {
    pub output: Arc<Mutex<Vec<Output>>>,
    pub logs: Arc<Mutex<Vec<String>>>,
}

impl MockCommandContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_output(&self) -> Vec<Output> {
        self.output.lock().unwrap().clone()
    }

    pub fn get_lines(&self) -> Vec<String> {
        self.get_output()
            .into_iter()
            .filter_map(|o| match o {
                Output::Line(line) => Some(line),
                Output::Value(_) => None,
            })
            .collect()
    }

    pub fn get_logs(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }
}

impl CommandContext for MockCommandContext {
    fn print_line(&self, line: &str) {
        self.output.lock().unwrap().push(Output::Line(line.to_string()));
    }

    fn print_value(&self, value: &serde_json::Value) {
        self.output.lock().unwrap().push(Output::Value(value.clone()));
    }

    fn log_info(&self, message: &str) {
        self.logs.lock().unwrap().push(format!("[INFO] {}", message));
    }

    fn log_warn(&self, message: &str) {
        self.logs.lock().unwrap().push(format!("[WARN] {}", message));
    }

    fn log_error(&self, message: &str) {
        self.logs.lock().unwrap().push(format!("[ERROR] {}", message));
    }
}

type FailureFn = Arc<dyn Fn() -> ApiError + Send + Sync>;

/// In-memory management API.
///
/// Deployments are keyed by `(botId, name)`. Every call is recorded as
/// `"{operation} {args...}"`; request bodies are recorded as compact JSON.
#[derive(Clone, Default)]
pub struct MockApiClient {
    versions: BotVersions,
    deployments: Arc<Mutex<IndexMap<(String, String), Deployment>>>,
    channels: Arc<Mutex<Vec<Channel>>>,
    calls: Arc<Mutex<Vec<String>>>,
    failure: Option<FailureFn>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, versions: BotVersions) -> Self {
        self.versions = versions;
        self
    }

    pub fn with_deployment(self, bot_id: &str, deployment: Deployment) -> Self {
        self.deployments
            .lock()
            .unwrap()
            .insert((bot_id.to_string(), deployment.name.clone()), deployment);
        self
    }

    /// Fail every call with the error `make` returns
    pub fn failing_with<F>(mut self, make: F) -> Self
    where
        F: Fn() -> ApiError + Send + Sync + 'static,
    {
        self.failure = Some(Arc::new(make));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created_channels(&self) -> Vec<Channel> {
        self.channels.lock().unwrap().clone()
    }

    pub fn deployment(&self, bot_id: &str, name: &str) -> Option<Deployment> {
        self.deployments
            .lock()
            .unwrap()
            .get(&(bot_id.to_string(), name.to_string()))
            .cloned()
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }

    fn key(bot_id: &str, name: &str) -> (String, String) {
        (bot_id.to_string(), name.to_string())
    }

    fn not_found(name: &str) -> ApiError {
        ApiError::NotFound(format!("deployment '{}'", name))
    }
}

fn compact<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[async_trait]
impl ApiClient for MockApiClient {
    async fn bot_versions(&self, bot_id: &str) -> ApiResult<BotVersions> {
        self.record(format!("bot_versions {}", bot_id))?;
        Ok(self.versions.clone())
    }

    async fn get_deployment(&self, bot_id: &str, name: &str) -> ApiResult<Deployment> {
        self.record(format!("get_deployment {} {}", bot_id, name))?;
        self.deployment(bot_id, name)
            .ok_or_else(|| Self::not_found(name))
    }

    async fn list_deployments(&self, bot_id: &str) -> ApiResult<Vec<Deployment>> {
        self.record(format!("list_deployments {}", bot_id))?;
        Ok(self
            .deployments
            .lock()
            .unwrap()
            .iter()
            .filter(|((bot, _), _)| bot == bot_id)
            .map(|(_, d)| d.clone())
            .collect())
    }

    async fn create_deployment(
        &self,
        bot_id: &str,
        body: &DeploymentBody,
    ) -> ApiResult<Deployment> {
        self.record(format!("create_deployment {} {}", bot_id, compact(body)))?;
        let deployment = Deployment {
            name: body.name.clone(),
            bot_id: Some(bot_id.to_string()),
            bot_version: body.bot_version.clone(),
            channels: body.channels.clone().unwrap_or_default(),
            id: Some(format!("dep-{}", body.name)),
        };
        self.deployments
            .lock()
            .unwrap()
            .insert(Self::key(bot_id, &body.name), deployment.clone());
        Ok(deployment)
    }

    async fn update_deployment(
        &self,
        bot_id: &str,
        name: &str,
        body: &DeploymentBody,
    ) -> ApiResult<Deployment> {
        self.record(format!("update_deployment {} {} {}", bot_id, name, compact(body)))?;
        let mut deployments = self.deployments.lock().unwrap();
        let deployment = deployments
            .get_mut(&Self::key(bot_id, name))
            .ok_or_else(|| Self::not_found(name))?;
        deployment.bot_version = body.bot_version.clone();
        Ok(deployment.clone())
    }

    async fn delete_deployment(&self, bot_id: &str, name: &str) -> ApiResult<Deployment> {
        self.record(format!("delete_deployment {} {}", bot_id, name))?;
        self.deployments
            .lock()
            .unwrap()
            .shift_remove(&Self::key(bot_id, name))
            .ok_or_else(|| Self::not_found(name))
    }

    async fn create_channel(
        &self,
        bot_id: &str,
        name: &str,
        channel: &Channel,
    ) -> ApiResult<Channel> {
        self.record(format!("create_channel {} {} {}", bot_id, name, compact(channel)))?;
        let mut created = channel.clone();
        if created.id.is_none() {
            created.id = Some(format!("chan-{}", channel.name));
        }
        self.channels.lock().unwrap().push(channel.clone());
        Ok(created)
    }

    async fn delete_channel(&self, bot_id: &str, name: &str, channel_id: &str) -> ApiResult<()> {
        self.record(format!("delete_channel {} {} {}", bot_id, name, channel_id))?;
        Ok(())
    }
}
