//! Dependency injector - binds handler and middleware names to services
//!
//! The command tree refers to handlers as `deployment.*` and to middleware
//! as `helper.*`. [`Injector::registry`] builds the [`MethodRegistry`] the
//! compiler resolves those names against.

use super::adapters::{CommandContext, ConsoleContext};
use super::commands::deployment::{self, Operation};
use super::declarative::{handler_fn, DeclarativeResult, Handler, MethodRegistry};
use super::error::CliResult;
use super::middleware::{self, BotIdSource};
use crate::api::{ApiClient, HttpApiClient};
use crate::config::{ConfigurationLoader, EnvironmentLoader};
use crate::observability::Logger;
use std::sync::Arc;
use std::time::Duration;

/// Middleware names
pub const BOT_ID_MIDDLEWARE: &str = "helper.bot_id";
pub const TRACE_MIDDLEWARE: &str = "helper.trace";

/// Application services handlers are built from
#[derive(Clone)]
pub struct Injector {
    api: Arc<dyn ApiClient>,
    ctx: Arc<dyn CommandContext>,
    bot_id: BotIdSource,
}

impl Injector {
    pub fn new(api: Arc<dyn ApiClient>, ctx: Arc<dyn CommandContext>, bot_id: BotIdSource) -> Self {
        Self { api, ctx, bot_id }
    }

    /// Wire the HTTP client and console output from configuration
    pub fn from_config(
        loader: &ConfigurationLoader,
        env: &EnvironmentLoader,
        logger: Option<Arc<Logger>>,
    ) -> CliResult<Self> {
        let mut client = HttpApiClient::new(
            loader.api_base_url(),
            loader.api_token(),
            Duration::from_secs(loader.config.api.timeout_secs),
        )?;
        if let Some(logger) = logger {
            client = client.with_logger(logger);
        }

        let bot_id = BotIdSource::new(env.bot_id(), loader.bot_descriptor());
        Ok(Self::new(Arc::new(client), Arc::new(ConsoleContext::new()), bot_id))
    }

    fn handler(&self, op: Operation) -> Handler {
        let api = self.api.clone();
        let ctx = self.ctx.clone();
        handler_fn(move |invocation| {
            let api = api.clone();
            let ctx = ctx.clone();
            async move {
                deployment::run(ctx.as_ref(), api.as_ref(), op, invocation).await;
            }
        })
    }

    /// Registry with every `deployment.*` handler and `helper.*` middleware
    pub fn registry(&self) -> DeclarativeResult<MethodRegistry> {
        let mut registry = MethodRegistry::new();
        for op in Operation::ALL {
            registry.register_handler(op.handler_name(), self.handler(op))?;
        }
        registry.register_middleware(BOT_ID_MIDDLEWARE, middleware::bot_id(self.bot_id.clone()))?;
        registry.register_middleware(TRACE_MIDDLEWARE, middleware::trace())?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::declarative::{HandlerResolver, Invocation};
    use crate::cli::test_utils::{MockApiClient, MockCommandContext};

    fn injector(ctx: MockCommandContext, api: MockApiClient) -> Injector {
        Injector::new(
            Arc::new(api),
            Arc::new(ctx),
            BotIdSource::new(Some("bot-1".to_string()), "/nonexistent/bot.toml"),
        )
    }

    #[test]
    fn test_registry_entries() {
        let registry = injector(MockCommandContext::new(), MockApiClient::new())
            .registry()
            .unwrap();
        assert_eq!(
            registry.entries(),
            vec![
                ("deployment.deploy", "handler"),
                ("deployment.add_channel", "handler"),
                ("deployment.remove_channel", "handler"),
                ("deployment.drop", "handler"),
                ("deployment.list", "handler"),
                ("helper.bot_id", "middleware"),
                ("helper.trace", "middleware"),
            ]
        );
    }

    #[tokio::test]
    async fn test_from_config_takes_bot_id_from_environment() {
        let loader =
            ConfigurationLoader::from_config(ConfigurationLoader::get_default_config().unwrap());
        let env = EnvironmentLoader::empty().with_bot_id("bot-9");
        let registry = Injector::from_config(&loader, &env, None)
            .unwrap()
            .registry()
            .unwrap();

        let bot_id = registry.resolve_middleware(BOT_ID_MIDDLEWARE).await.unwrap();
        let inv = bot_id(Invocation::new("deployment-list"));
        assert_eq!(inv.arg_str(0), Some("bot-9"));
    }

    #[tokio::test]
    async fn test_resolved_handler_runs_command() {
        let ctx = MockCommandContext::new();
        let api = MockApiClient::new();
        let registry = injector(ctx.clone(), api.clone()).registry().unwrap();

        let bot_id = registry.resolve_middleware("helper.bot_id").await.unwrap();
        let handler = registry.resolve_handler("deployment.list").await.unwrap();
        handler(bot_id(Invocation::new("deployment-list"))).await;

        assert_eq!(api.calls(), vec!["list_deployments bot-1".to_string()]);
        assert_eq!(ctx.get_lines(), vec![deployment::NO_DEPLOYMENTS.to_string()]);
    }
}
