//! CLI executor - the main DeclarativeCli type
//!
//! This is the entry point for the declarative CLI framework.
//! Usage: `DeclarativeCli::new(commands, resolver).start(std::env::args()).await`

use super::compiler::CommandCompiler;
use super::config::{commands_from_file, CommandList};
use super::error::DeclarativeResult;
use super::program::{Dispatch, Program};
use super::router::HandlerResolver;
use crate::observability::Logger;
use std::path::Path;
use std::sync::Arc;

/// Main declarative CLI type
pub struct DeclarativeCli<R: HandlerResolver> {
    commands: CommandList,
    resolver: R,
    name: String,
    version: Option<String>,
    about: Option<String>,
    logger: Option<Arc<Logger>>,
}

impl<R: HandlerResolver> DeclarativeCli<R> {
    /// Create a CLI for a command tree and the resolver its names refer to
    pub fn new(commands: CommandList, resolver: R) -> Self {
        Self {
            commands,
            resolver,
            name: env!("CARGO_PKG_NAME").to_string(),
            version: None,
            about: None,
            logger: None,
        }
    }

    /// Load the command tree from a TOML or JSON file
    pub fn from_file(path: impl AsRef<Path>, resolver: R) -> DeclarativeResult<Self> {
        let commands = commands_from_file(path)?;
        Ok(Self::new(commands, resolver))
    }

    /// Set the program name used for help output and alias re-dispatch
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the version shown by `--version`
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the top-level help text
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Record sessions in a markdown log
    pub fn with_logger(mut self, logger: impl Into<Arc<Logger>>) -> Self {
        self.logger = Some(logger.into());
        self
    }

    /// Compile the command tree into a fresh program
    pub async fn compile(&self) -> DeclarativeResult<Program> {
        let mut program = Program::new(self.name.clone());
        if let Some(version) = &self.version {
            program = program.with_version(version.clone());
        }
        if let Some(about) = &self.about {
            program = program.with_about(about.clone());
        }

        CommandCompiler::new(&self.resolver)
            .compile(&self.commands, &mut program, "")
            .await?;
        tracing::debug!(commands = program.len(), "command tree compiled");
        Ok(program)
    }

    /// Compile the command tree, then parse `argv` (binary name first) and
    /// run the matched command to completion.
    ///
    /// A bad tree fails here before anything is parsed.
    pub async fn start<I, T>(&self, argv: I) -> DeclarativeResult<Dispatch>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        self.log(|logger| logger.log_session_start(&argv));

        let result = match self.compile().await {
            Ok(program) => program.parse(argv.iter().cloned()).await,
            Err(e) => Err(e),
        };

        match &result {
            Ok(Dispatch::Ran {
                command,
                redispatches,
            }) => {
                self.log(|logger| logger.log_dispatch(command, redispatches));
                self.log(|logger| logger.log_completion("command finished"));
            }
            Ok(Dispatch::Displayed) => {
                self.log(|logger| logger.log_completion("help or version displayed"));
            }
            Err(e) => {
                let context = serde_json::json!({ "argv": argv });
                self.log(|logger| logger.log_error(&e.to_string(), Some(&context)));
                self.log(|logger| logger.log_completion("failed"));
            }
        }

        result
    }

    fn log<F>(&self, write: F)
    where
        F: FnOnce(&Logger) -> anyhow::Result<()>,
    {
        if let Some(logger) = &self.logger {
            if let Err(e) = write(logger) {
                tracing::warn!("failed to write session log: {}", e);
            }
        }
    }
}
