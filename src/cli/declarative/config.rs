//! Command descriptor schema for the declarative CLI
//!
//! Describes the TOML/JSON shape of a command tree. A tree is an ordered
//! mapping from key to [`CommandDescriptor`]; every descriptor is a group,
//! an alias or a plain command.
//!
//! ```toml
//! [deployment]
//! type = "group"
//!
//! [deployment.subcommands.deploy]
//! args = "<name> [version]"
//! handler = "deployment.deploy"
//! middleware = ["helper.bot_id"]
//!
//! [deploy]
//! type = "alias"
//! alias = "deployment-deploy"
//! ```

use super::error::{DeclarativeError, DeclarativeResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root of a command tree; iteration follows configuration order
pub type CommandList = IndexMap<String, CommandDescriptor>;

/// Discriminant of a [`CommandDescriptor`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    /// Nests its children under a `{key}-` prefix
    Group,
    /// Re-dispatches to another command line
    Alias,
    /// Invocable command bound to a handler
    #[default]
    Command,
}

/// A node in the command tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Node kind; absent means plain command
    #[serde(rename = "type", default)]
    pub kind: CommandType,

    /// Children of a group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcommands: Option<CommandList>,

    /// Argument template for aliases, or a name override for plain commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Positional signature, e.g. `<name> [version]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,

    /// Help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    /// Options keyed by long flag name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<IndexMap<String, ParamDescriptor>>,

    /// Terminal handler name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    /// Middleware names, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub middleware: Vec<String>,
}

/// An option flag of a plain command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamDescriptor {
    /// Single-character alias (`-f`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,

    /// Help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    /// Default value; when present the flag requires a value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    /// Presence-only flag
    #[serde(rename = "bool", default)]
    pub is_bool: bool,
}

impl ParamDescriptor {
    /// Default value rendered as the string handed to the CLI program
    pub fn default_value(&self) -> Option<String> {
        self.value.as_ref().map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Validated view of a descriptor
#[derive(Debug, Clone, Copy)]
pub enum CommandNode<'a> {
    /// Group with its children
    Group(&'a CommandList),
    /// Alias with its argument template
    Alias(&'a str),
    /// Plain command with its handler name
    Command {
        /// Handler name
        handler: &'a str,
        /// Full descriptor (args, params, middleware)
        descriptor: &'a CommandDescriptor,
    },
}

impl CommandDescriptor {
    /// Classify this descriptor, rejecting shapes that are not exactly one kind.
    ///
    /// `path` is only used to label errors.
    pub fn node(&self, path: &str) -> DeclarativeResult<CommandNode<'_>> {
        match self.kind {
            CommandType::Group => {
                if self.handler.is_some() {
                    return Err(DeclarativeError::invalid_descriptor(
                        path,
                        "a group cannot have a handler",
                    ));
                }
                let subcommands = self.subcommands.as_ref().ok_or_else(|| {
                    DeclarativeError::invalid_descriptor(path, "group is missing 'subcommands'")
                })?;
                Ok(CommandNode::Group(subcommands))
            }
            CommandType::Alias => {
                let template = self
                    .alias
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(|| {
                        DeclarativeError::invalid_descriptor(path, "alias is missing its 'alias' template")
                    })?;
                if self.handler.is_some() || self.subcommands.is_some() {
                    return Err(DeclarativeError::invalid_descriptor(
                        path,
                        "an alias cannot have a handler or subcommands",
                    ));
                }
                Ok(CommandNode::Alias(template))
            }
            CommandType::Command => {
                if self.subcommands.is_some() {
                    return Err(DeclarativeError::invalid_descriptor(
                        path,
                        "'subcommands' is only valid on type = \"group\"",
                    ));
                }
                let handler = self.handler.as_deref().ok_or_else(|| {
                    DeclarativeError::invalid_descriptor(path, "command is missing 'handler'")
                })?;
                Ok(CommandNode::Command {
                    handler,
                    descriptor: self,
                })
            }
        }
    }
}

/// Load a command tree from a TOML string
pub fn commands_from_toml_str(content: &str) -> DeclarativeResult<CommandList> {
    toml::from_str(content)
        .map_err(|e| DeclarativeError::config(format!("Failed to parse TOML: {}", e)))
}

/// Load a command tree from a JSON string
pub fn commands_from_json_str(content: &str) -> DeclarativeResult<CommandList> {
    serde_json::from_str(content)
        .map_err(|e| DeclarativeError::config(format!("Failed to parse JSON: {}", e)))
}

/// Load a command tree from a file, picking the format by extension (TOML by default)
pub fn commands_from_file(path: impl AsRef<Path>) -> DeclarativeResult<CommandList> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        DeclarativeError::config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => commands_from_json_str(&content),
        _ => commands_from_toml_str(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree_preserves_order() {
        let toml = r#"
            [zeta]
            handler = "z"

            [alpha]
            type = "group"

            [alpha.subcommands.one]
            handler = "a.one"

            [mid]
            type = "alias"
            alias = "alpha-one"
        "#;

        let commands = commands_from_toml_str(toml).unwrap();
        let keys: Vec<&str> = commands.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(commands["alpha"].kind, CommandType::Group);
        assert_eq!(commands["mid"].kind, CommandType::Alias);
        assert_eq!(commands["zeta"].kind, CommandType::Command);
    }

    #[test]
    fn test_parse_params() {
        let toml = r#"
            [add]
            args = "<name>"
            handler = "h"
            middleware = ["m1", "m2"]

            [add.params.data]
            short = "d"
            desc = "Channel data"

            [add.params.retries]
            value = 3

            [add.params.force]
            bool = true
        "#;

        let commands = commands_from_toml_str(toml).unwrap();
        let add = &commands["add"];
        assert_eq!(add.middleware, vec!["m1", "m2"]);
        let params = add.params.as_ref().unwrap();
        assert_eq!(params["data"].short, Some('d'));
        assert_eq!(params["retries"].default_value(), Some("3".to_string()));
        assert!(params["force"].is_bool);
        assert_eq!(params["force"].default_value(), None);
    }

    #[test]
    fn test_parse_json_tree() {
        let json = r#"{"b": {"handler": "hb"}, "a": {"type": "alias", "alias": "b x"}}"#;
        let commands = commands_from_json_str(json).unwrap();
        assert_eq!(commands.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_node_rejects_group_without_subcommands() {
        let descriptor = CommandDescriptor {
            kind: CommandType::Group,
            ..Default::default()
        };
        let err = descriptor.node("deployment").unwrap_err();
        assert!(err.to_string().contains("deployment"));
        assert!(err.to_string().contains("subcommands"));
    }

    #[test]
    fn test_node_rejects_group_with_handler() {
        let descriptor = CommandDescriptor {
            kind: CommandType::Group,
            subcommands: Some(CommandList::new()),
            handler: Some("h".to_string()),
            ..Default::default()
        };
        assert!(descriptor.node("g").is_err());
    }

    #[test]
    fn test_node_rejects_command_without_handler() {
        let descriptor = CommandDescriptor::default();
        let err = descriptor.node("deployment-drop").unwrap_err();
        assert!(err.to_string().contains("deployment-drop"));
        assert!(err.to_string().contains("handler"));
    }

    #[test]
    fn test_node_rejects_blank_alias() {
        let descriptor = CommandDescriptor {
            kind: CommandType::Alias,
            alias: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(descriptor.node("d").is_err());
    }

    #[test]
    fn test_node_classifies_command() {
        let descriptor = CommandDescriptor {
            handler: Some("deployment.drop".to_string()),
            ..Default::default()
        };
        match descriptor.node("drop").unwrap() {
            CommandNode::Command { handler, .. } => assert_eq!(handler, "deployment.drop"),
            other => panic!("Expected plain command, got {:?}", other),
        }
    }
}
