use botctl::cli::declarative::{DeclarativeCli, DeclarativeError};
use botctl::cli::{display_error_with_suggestions, CliError, CliResult, Injector};
use botctl::config::{ConfigurationLoader, EnvironmentLoader};
use botctl::observability::{init_tracing, Logger};
use std::process::ExitCode;
use std::sync::Arc;

const APP_NAME: &str = "botctl";
const ABOUT: &str = "Manage bot deployments and their channels";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Declarative(DeclarativeError::ParseError(message))) => {
            eprint!("{}", message);
            ExitCode::from(2)
        }
        Err(e) => {
            display_error_with_suggestions(&e, "botctl failed", Some(APP_NAME));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CliResult<()> {
    let env = EnvironmentLoader::new(None);
    let loader = ConfigurationLoader::new_with_env(None, &env)?;
    init_tracing(&loader.config.logging.level);

    if let Some(path) = loader.config_path.as_deref() {
        tracing::debug!(path = %path.display(), "configuration loaded");
    }

    let logger = match loader.log_file() {
        Some(path) => Some(Arc::new(Logger::new(
            Some(&path),
            Some(&loader.config.logging.level),
        )?)),
        None => None,
    };

    let registry = Injector::from_config(&loader, &env, logger.clone())?.registry()?;
    let mut cli = DeclarativeCli::new(loader.command_tree()?, registry)
        .with_name(APP_NAME)
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_about(ABOUT);
    if let Some(logger) = logger {
        cli = cli.with_logger(logger);
    }

    cli.start(std::env::args()).await?;
    Ok(())
}
