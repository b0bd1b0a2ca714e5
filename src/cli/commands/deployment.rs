//! Deployment commands - bind bot versions to channels
//!
//! Each command takes the bot id as its first argument (injected by the
//! `helper.bot_id` middleware) followed by its own positionals. Outcomes the
//! user can act on (unknown version, name taken, channel missing) are printed
//! as status lines; everything else is a [`CliError`].

use crate::api::{ApiClient, Channel, ChannelOptions, Deployment, DeploymentBody};
use crate::cli::adapters::CommandContext;
use crate::cli::declarative::Invocation;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::truncate_with_ellipsis;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::{Map, Value};

pub const BOT_ID_NOT_FOUND: &str = "BOT ID NOT FOUND";
pub const INVALID_VERSION: &str = "INVALID_VERSION";
pub const DEPLOYMENT_CREATED: &str = "DEPLOYMENT CREATED SUCCESSFULLY";
pub const DEPLOYMENT_UPDATED: &str = "DEPLOYMENT UPDATED SUCCESSFULLY";
pub const DEPLOYMENT_DELETED: &str = "DEPLOYMENT DELETED SUCCESSFULLY";
pub const CHANNEL_NAME_USED: &str = "CHANNEL NAME HAS BEEN USED";
pub const CHANNEL_ADDED: &str = "CHANNEL ADDED SUCCESSFULLY";
pub const CHANNEL_NOT_FOUND: &str = "CHANNEL NOT FOUND";
pub const CHANNEL_REMOVED: &str = "CHANNEL REMOVED SUCCESSFULLY";
pub const NO_DEPLOYMENTS: &str = "NO DEPLOYMENTS";

/// Options for deploying a bot version
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub bot_id: String,
    pub name: String,
    /// Defaults to the latest published version
    pub version: Option<String>,
}

/// Options for binding a channel
#[derive(Debug, Clone)]
pub struct AddChannelOptions {
    pub bot_id: String,
    pub name: String,
    pub channel: String,
    /// Channel definition as JSON
    pub data: Option<String>,
}

/// Options for unbinding a channel
#[derive(Debug, Clone)]
pub struct RemoveChannelOptions {
    pub bot_id: String,
    pub name: String,
    pub channel: String,
}

/// Options for deleting a deployment
#[derive(Debug, Clone)]
pub struct DropOptions {
    pub bot_id: String,
    pub name: String,
}

/// Options for listing deployments
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub bot_id: String,
}

/// The deployment operations, keyed by handler name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deploy,
    AddChannel,
    RemoveChannel,
    Drop,
    List,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Deploy,
        Operation::AddChannel,
        Operation::RemoveChannel,
        Operation::Drop,
        Operation::List,
    ];

    /// Name the command tree refers to this operation by
    pub fn handler_name(self) -> &'static str {
        match self {
            Operation::Deploy => "deployment.deploy",
            Operation::AddChannel => "deployment.add_channel",
            Operation::RemoveChannel => "deployment.remove_channel",
            Operation::Drop => "deployment.drop",
            Operation::List => "deployment.list",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Operation::Deploy => "Deploy failed",
            Operation::AddChannel => "Adding channel failed",
            Operation::RemoveChannel => "Removing channel failed",
            Operation::Drop => "Dropping deployment failed",
            Operation::List => "Listing deployments failed",
        }
    }
}

/// Run `op` for an invocation shaped `[botId, ...positionals]`.
///
/// Never fails: a missing bot id is printed as [`BOT_ID_NOT_FOUND`] and
/// errors are reported through the context.
pub async fn run<C, A>(ctx: &C, api: &A, op: Operation, invocation: Invocation)
where
    C: CommandContext + ?Sized,
    A: ApiClient + ?Sized,
{
    let Some(bot_id) = invocation.arg_str(0).map(str::to_string) else {
        ctx.print_line(BOT_ID_NOT_FOUND);
        return;
    };

    let result = match op {
        Operation::Deploy => match positional(&invocation, 1, "name") {
            Ok(name) => {
                let version = invocation.arg_str(2).map(str::to_string);
                deploy(ctx, api, DeployOptions { bot_id, name, version }).await
            }
            Err(e) => Err(e),
        },
        Operation::AddChannel => {
            match (positional(&invocation, 1, "name"), positional(&invocation, 2, "channel")) {
                (Ok(name), Ok(channel)) => {
                    let data = invocation.option_str("data").map(str::to_string);
                    let opts = AddChannelOptions { bot_id, name, channel, data };
                    add_channel(ctx, api, opts).await
                }
                (Err(e), _) | (_, Err(e)) => Err(e),
            }
        }
        Operation::RemoveChannel => {
            match (positional(&invocation, 1, "name"), positional(&invocation, 2, "channel")) {
                (Ok(name), Ok(channel)) => {
                    let opts = RemoveChannelOptions { bot_id, name, channel };
                    remove_channel(ctx, api, opts).await
                }
                (Err(e), _) | (_, Err(e)) => Err(e),
            }
        }
        Operation::Drop => match positional(&invocation, 1, "name") {
            Ok(name) => drop_deployment(ctx, api, DropOptions { bot_id, name }).await,
            Err(e) => Err(e),
        },
        Operation::List => list(ctx, api, ListOptions { bot_id }).await,
    };

    if let Err(e) = result {
        ctx.report_error(&e, op.label());
    }
}

fn positional(invocation: &Invocation, index: usize, name: &str) -> CliResult<String> {
    invocation
        .arg_str(index)
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidInput(format!("missing argument <{}>", name)))
}

fn print_json<C, T>(ctx: &C, value: &T) -> CliResult<()>
where
    C: CommandContext + ?Sized,
    T: serde::Serialize,
{
    ctx.print_value(&serde_json::to_value(value)?);
    Ok(())
}

/// Deploy `version` (or the latest one), creating the deployment if needed
pub async fn deploy<C, A>(ctx: &C, api: &A, opts: DeployOptions) -> CliResult<()>
where
    C: CommandContext + ?Sized,
    A: ApiClient + ?Sized,
{
    let versions = api.bot_versions(&opts.bot_id).await?;
    let target = match opts.version.or_else(|| versions.latest.clone()) {
        Some(version) if versions.contains(&version) => version,
        _ => {
            ctx.print_line(INVALID_VERSION);
            return Ok(());
        }
    };

    match api.get_deployment(&opts.bot_id, &opts.name).await {
        Ok(_) => {
            let body = DeploymentBody::update(&opts.name, &target);
            let updated = api.update_deployment(&opts.bot_id, &opts.name, &body).await?;
            ctx.print_line(DEPLOYMENT_UPDATED);
            print_json(ctx, &updated)
        }
        Err(e) if e.is_not_found() => {
            ctx.log_info(&format!("Creating deployment '{}'", opts.name));
            let body = DeploymentBody::create(&opts.name, &target);
            let created = api.create_deployment(&opts.bot_id, &body).await?;
            ctx.print_line(DEPLOYMENT_CREATED);
            print_json(ctx, &created)
        }
        Err(e) => Err(e.into()),
    }
}

/// Build the channel sent to the API from `--data`.
///
/// Credentials may be given flat (`token`, `refreshToken`, `secret`) or
/// under `options`; flat keys win.
pub fn parse_channel(name: &str, data: &str) -> CliResult<Channel> {
    let value: Value = serde_json::from_str(data)?;
    let object = value
        .as_object()
        .ok_or_else(|| CliError::InvalidInput("--data must be a JSON object".to_string()))?;

    let text = |map: &Map<String, Value>, key: &str| -> Option<String> {
        map.get(key).and_then(Value::as_str).map(str::to_string)
    };

    let nested = object
        .get("options")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    Ok(Channel {
        id: text(object, "id"),
        name: name.to_string(),
        kind: text(object, "type").unwrap_or_default(),
        url: text(object, "url"),
        options: ChannelOptions {
            token: text(object, "token").or_else(|| text(&nested, "token")),
            refresh_token: text(object, "refreshToken").or_else(|| text(&nested, "refreshToken")),
            secret: text(object, "secret").or_else(|| text(&nested, "secret")),
        },
    })
}

/// Bind a new channel under `opts.channel`
pub async fn add_channel<C, A>(ctx: &C, api: &A, opts: AddChannelOptions) -> CliResult<()>
where
    C: CommandContext + ?Sized,
    A: ApiClient + ?Sized,
{
    let mut deployment = api.get_deployment(&opts.bot_id, &opts.name).await?;
    if deployment.channel_id(&opts.channel).is_some() {
        ctx.print_line(CHANNEL_NAME_USED);
        return Ok(());
    }

    let data = opts.data.as_deref().ok_or_else(|| {
        CliError::InvalidInput("--data with a JSON channel definition is required".to_string())
    })?;
    let channel = parse_channel(&opts.channel, data)?;

    let created = api.create_channel(&opts.bot_id, &opts.name, &channel).await?;
    let channel_id = created.id.or(channel.id).ok_or_else(|| {
        CliError::ExecutionError("API returned a channel without an id".to_string())
    })?;

    deployment.channels.insert(opts.channel, channel_id);
    ctx.print_line(CHANNEL_ADDED);
    print_json(ctx, &deployment)
}

/// Unbind the channel named `opts.channel`
pub async fn remove_channel<C, A>(ctx: &C, api: &A, opts: RemoveChannelOptions) -> CliResult<()>
where
    C: CommandContext + ?Sized,
    A: ApiClient + ?Sized,
{
    let deployment = api.get_deployment(&opts.bot_id, &opts.name).await?;
    let Some(channel_id) = deployment.channel_id(&opts.channel) else {
        ctx.print_line(CHANNEL_NOT_FOUND);
        return Ok(());
    };

    api.delete_channel(&opts.bot_id, &opts.name, channel_id).await?;
    ctx.print_line(CHANNEL_REMOVED);
    Ok(())
}

/// Delete a deployment and print what was deleted
pub async fn drop_deployment<C, A>(ctx: &C, api: &A, opts: DropOptions) -> CliResult<()>
where
    C: CommandContext + ?Sized,
    A: ApiClient + ?Sized,
{
    let deleted = api.delete_deployment(&opts.bot_id, &opts.name).await?;
    print_json(ctx, &deleted)?;
    ctx.print_line(DEPLOYMENT_DELETED);
    Ok(())
}

/// Render deployments as a table
pub fn deployments_table(deployments: &[Deployment]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Version", "Channels"]);

    for deployment in deployments {
        let channels = deployment
            .channels
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            deployment.name.clone(),
            deployment.bot_version.clone(),
            truncate_with_ellipsis(&channels, 48),
        ]);
    }
    table
}

/// List the bot's deployments
pub async fn list<C, A>(ctx: &C, api: &A, opts: ListOptions) -> CliResult<()>
where
    C: CommandContext + ?Sized,
    A: ApiClient + ?Sized,
{
    let deployments = api.list_deployments(&opts.bot_id).await?;
    if deployments.is_empty() {
        ctx.print_line(NO_DEPLOYMENTS);
        return Ok(());
    }

    ctx.print_line(&deployments_table(&deployments).to_string());
    Ok(())
}
