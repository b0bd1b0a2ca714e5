//! The CLI program - command registry and dispatch
//!
//! A [`Program`] collects command registrations ([`Subcommand`]s), builds a
//! clap [`Command`] from them on every parse, and dispatches the matched
//! command's [`Action`]. Alias actions ask for a full re-parse of a new
//! argument vector, which is why parsing loops (bounded by
//! [`MAX_ALIAS_DEPTH`]).

use super::action::{Action, ActionOutcome};
use super::builder::{self, OptionSpec, PositionalSpec, Signature};
use super::error::{DeclarativeError, DeclarativeResult};
use clap::error::ErrorKind;
use clap::Command;
use indexmap::IndexMap;
use std::ffi::OsString;
use tracing::debug;

/// Maximum number of alias re-dispatches for a single parse
pub const MAX_ALIAS_DEPTH: usize = 16;

/// A registered command
pub struct Subcommand {
    signature: String,
    name: String,
    positionals: Vec<PositionalSpec>,
    options: Vec<OptionSpec>,
    description: Option<String>,
    passthrough: bool,
    action: Option<Action>,
}

impl Subcommand {
    fn new(signature: Signature, raw: &str) -> Self {
        Self {
            signature: raw.split_whitespace().collect::<Vec<_>>().join(" "),
            name: signature.name,
            positionals: signature.positionals,
            options: Vec::new(),
            description: None,
            passthrough: false,
            action: None,
        }
    }

    /// Add an option, e.g. `option("-f, --foo <value>", "Foo", Some("bar"))`
    pub fn option(
        &mut self,
        flags: &str,
        description: &str,
        default: Option<&str>,
    ) -> DeclarativeResult<&mut Self> {
        let spec = OptionSpec::parse(flags, description, default)?;
        let clashes = self.positionals.iter().any(|p| p.name == spec.long)
            || self
                .options
                .iter()
                .any(|o| o.long == spec.long || (spec.short.is_some() && o.short == spec.short));
        if clashes {
            return Err(DeclarativeError::InvalidFlag(format!(
                "{} (duplicate on '{}')",
                flags, self.name
            )));
        }
        self.options.push(spec);
        Ok(self)
    }

    /// Set the help text
    pub fn description(&mut self, text: impl Into<String>) -> &mut Self {
        self.description = Some(text.into());
        self
    }

    /// Bind the action run on dispatch
    pub fn action(&mut self, action: Action) -> &mut Self {
        self.action = Some(action);
        self
    }

    /// Forward hyphenated words to the trailing variadic instead of parsing them as flags
    pub fn passthrough(&mut self) -> &mut Self {
        self.passthrough = true;
        self
    }

    /// Command name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signature as registered (whitespace-normalized)
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Positional arguments
    pub fn positionals(&self) -> &[PositionalSpec] {
        &self.positionals
    }

    /// Options in registration order
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    fn to_clap(&self) -> Command {
        builder::build_subcommand(
            &self.name,
            self.description.as_deref(),
            &self.positionals,
            &self.options,
            self.passthrough,
        )
    }
}

/// Result of a successful parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A command ran to completion
    Ran {
        /// Name of the command whose handler ran
        command: String,
        /// Argument vectors produced by alias re-dispatch, in order
        redispatches: Vec<Vec<String>>,
    },
    /// clap printed help or version output instead of dispatching
    Displayed,
}

/// Command registry and dispatcher
pub struct Program {
    name: String,
    version: Option<String>,
    about: Option<String>,
    commands: IndexMap<String, Subcommand>,
}

impl Program {
    /// Create an empty program; `name` fills the binary-name slot on re-dispatch
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            about: None,
            commands: IndexMap::new(),
        }
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

    /// Program name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a command from its signature, e.g. `deploy <name> [version]`
    pub fn command(&mut self, signature: &str) -> DeclarativeResult<&mut Subcommand> {
        let parsed = Signature::parse(signature)?;
        let name = parsed.name.clone();
        if self.commands.contains_key(&name) {
            return Err(DeclarativeError::DuplicateCommand(name));
        }
        debug!(command = %name, signature, "registering command");
        let entry = self
            .commands
            .entry(name)
            .or_insert_with(|| Subcommand::new(parsed, signature));
        Ok(entry)
    }

    /// Look up a registered command
    pub fn get(&self, name: &str) -> Option<&Subcommand> {
        self.commands.get(name)
    }

    /// Registered signatures in registration order
    pub fn signatures(&self) -> Vec<&str> {
        self.commands.values().map(|c| c.signature()).collect()
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Build the clap command for the current registrations
    pub fn build(&self) -> Command {
        let mut app = Command::new(self.name.clone())
            .subcommand_required(true)
            .arg_required_else_help(true)
            .disable_help_subcommand(true);

        if let Some(version) = &self.version {
            app = app.version(version.clone());
        }
        if let Some(about) = &self.about {
            app = app.about(about.clone());
        }

        for cmd in self.commands.values() {
            app = app.subcommand(cmd.to_clap());
        }
        app
    }

    /// Parse `argv` (binary name first) and run the matched command.
    ///
    /// The handler future is awaited here, so the caller regains control only
    /// once the command has finished.
    pub async fn parse<I, T>(&self, argv: I) -> DeclarativeResult<Dispatch>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        let mut redispatches: Vec<Vec<String>> = Vec::new();

        loop {
            let matches = match self.build().try_get_matches_from(argv.iter()) {
                Ok(matches) => matches,
                Err(e) => {
                    return match e.kind() {
                        ErrorKind::DisplayHelp
                        | ErrorKind::DisplayVersion
                        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                            e.print()?;
                            Ok(Dispatch::Displayed)
                        }
                        _ => Err(DeclarativeError::ParseError(e.to_string())),
                    };
                }
            };

            let (name, sub_matches) = matches
                .subcommand()
                .ok_or_else(|| DeclarativeError::ParseError("no command given".to_string()))?;
            let cmd = self
                .commands
                .get(name)
                .ok_or_else(|| DeclarativeError::ParseError(format!("unknown command '{}'", name)))?;
            let action = cmd
                .action
                .as_ref()
                .ok_or_else(|| DeclarativeError::config(format!("command '{}' has no action", name)))?;

            let invocation =
                builder::extract_invocation(&cmd.name, &cmd.positionals, &cmd.options, sub_matches);
            debug!(command = %name, args = ?invocation.args, "dispatching");

            match action(invocation) {
                ActionOutcome::Run(handler) => {
                    handler.await;
                    return Ok(Dispatch::Ran {
                        command: name.to_string(),
                        redispatches,
                    });
                }
                ActionOutcome::Redispatch(words) => {
                    if redispatches.len() >= MAX_ALIAS_DEPTH {
                        return Err(DeclarativeError::AliasDepthExceeded(MAX_ALIAS_DEPTH));
                    }
                    debug!(from = %name, argv = ?words, "alias re-dispatch");
                    argv = std::iter::once(OsString::from(&self.name))
                        .chain(words.iter().map(OsString::from))
                        .collect();
                    redispatches.push(words);
                }
            }
        }
    }
}
