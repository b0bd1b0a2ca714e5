//! Command compiler - registers a descriptor tree onto a [`Program`]
//!
//! Groups nest their children under `{key}-`, aliases register at their own
//! key and re-dispatch through the program, and plain commands get a composed
//! middleware/handler action. Every name is resolved while compiling, so a
//! bad tree fails before any argument is parsed.

use super::action::{alias_action, compose, Action};
use super::config::{CommandDescriptor, CommandList, CommandNode};
use super::error::DeclarativeResult;
use super::program::Program;
use super::router::HandlerResolver;
use futures_util::future::BoxFuture;
use tracing::debug;

/// Compiles command trees against a resolver
pub struct CommandCompiler<'r, R: HandlerResolver + ?Sized> {
    resolver: &'r R,
}

impl<'r, R: HandlerResolver + ?Sized> CommandCompiler<'r, R> {
    /// Create a compiler that resolves names through `resolver`
    pub fn new(resolver: &'r R) -> Self {
        Self { resolver }
    }

    /// Register every command of `commands` on `program`, in configuration order.
    ///
    /// `prefix` is the accumulated group path (`""` at the root).
    pub fn compile<'a>(
        &'a self,
        commands: &'a CommandList,
        program: &'a mut Program,
        prefix: &'a str,
    ) -> BoxFuture<'a, DeclarativeResult<()>> {
        Box::pin(async move {
            for (key, descriptor) in commands {
                let path = format!("{}{}", prefix, key);
                match descriptor.node(&path)? {
                    CommandNode::Group(subcommands) => {
                        let child_prefix = format!("{}-", path);
                        self.compile(subcommands, program, &child_prefix).await?;
                    }
                    CommandNode::Alias(template) => {
                        Self::compile_alias(key, template, descriptor, program).map_err(|e| e.at(key.as_str()))?;
                    }
                    CommandNode::Command { handler, descriptor } => {
                        self.compile_command(&path, handler, descriptor, program)
                            .await
                            .map_err(|e| e.at(path.as_str()))?;
                    }
                }
            }
            Ok(())
        })
    }

    /// Register an alias at its unprefixed key
    fn compile_alias(
        key: &str,
        template: &str,
        descriptor: &CommandDescriptor,
        program: &mut Program,
    ) -> DeclarativeResult<()> {
        debug!(alias = key, template, "compiling alias");
        let description = descriptor
            .desc
            .clone()
            .unwrap_or_else(|| format!("Alias for '{}'", template.trim()));

        program
            .command(&format!("{} [args...]", key))?
            .passthrough()
            .description(description)
            .action(alias_action(template));
        Ok(())
    }

    /// Register a plain command with its options and composed action
    pub async fn compile_command(
        &self,
        key: &str,
        handler: &str,
        descriptor: &CommandDescriptor,
        program: &mut Program,
    ) -> DeclarativeResult<()> {
        let action = self.create_action(handler, &descriptor.middleware).await?;

        let name = descriptor.alias.as_deref().unwrap_or(key);
        let signature = match &descriptor.args {
            Some(args) => format!("{} {}", name, args),
            None => name.to_string(),
        };
        debug!(signature = %signature, handler, "compiling command");

        let subcommand = program.command(&signature)?;
        if let Some(desc) = &descriptor.desc {
            subcommand.description(desc.clone());
        }

        if let Some(params) = &descriptor.params {
            for (param_name, param) in params {
                let flag = match param.short {
                    Some(short) => format!("-{}, --{}", short, param_name),
                    None => format!("--{}", param_name),
                };
                let desc = param.desc.as_deref().unwrap_or("");

                if let Some(default) = param.default_value() {
                    subcommand.option(&format!("{} <value>", flag), desc, Some(&default))?;
                } else if param.is_bool {
                    subcommand.option(&flag, desc, None)?;
                } else {
                    subcommand.option(&format!("{} [value]", flag), desc, None)?;
                }
            }
        }

        subcommand.action(action);
        Ok(())
    }

    /// Resolve the middleware chain and handler once, and compose them
    pub async fn create_action(&self, handler: &str, middleware: &[String]) -> DeclarativeResult<Action> {
        let mut stages = Vec::with_capacity(middleware.len());
        for name in middleware {
            stages.push(self.resolver.resolve_middleware(name).await?);
        }
        let handler = self.resolver.resolve_handler(handler).await?;
        Ok(compose(stages, handler))
    }
}
