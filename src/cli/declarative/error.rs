//! Error types for the declarative command compiler

use thiserror::Error;

/// Result type for declarative CLI operations
pub type DeclarativeResult<T> = Result<T, DeclarativeError>;

/// Errors raised while loading, compiling or dispatching a command tree
#[derive(Debug, Error)]
pub enum DeclarativeError {
    /// Config file errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A descriptor violates the group/alias/command shape rules
    #[error("Invalid command descriptor at '{path}': {reason}")]
    InvalidDescriptor {
        /// Key path of the offending descriptor (e.g. `deployment-deploy`)
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// Handler name is unknown to the resolver
    #[error("Handler not found: {0}")]
    HandlerNotFound(String),

    /// Middleware name is unknown to the resolver
    #[error("Middleware not found: {0}")]
    MiddlewareNotFound(String),

    /// The same name was registered twice in the resolver
    #[error("Method already registered: {0}")]
    DuplicateMethod(String),

    /// Two descriptors compile to the same command name
    #[error("Command already registered: {0}")]
    DuplicateCommand(String),

    /// Malformed command signature (e.g. `deploy <name> [version]`)
    #[error("Invalid command signature '{0}'")]
    InvalidSignature(String),

    /// Malformed option flag spec (e.g. `-f, --foo <value>`)
    #[error("Invalid option flag '{0}'")]
    InvalidFlag(String),

    /// Alias re-dispatch did not settle on a concrete command
    #[error("Alias re-dispatch exceeded maximum depth of {0}")]
    AliasDepthExceeded(usize),

    /// Error raised while compiling the descriptor at `path`
    #[error("Command '{path}': {source}")]
    At {
        /// Key path of the descriptor being compiled
        path: String,
        /// Underlying error
        #[source]
        source: Box<DeclarativeError>,
    },

    /// Command-line parsing failed (message rendered by clap)
    #[error("{0}")]
    ParseError(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeclarativeError {
    /// Create a config error with context
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an invalid-descriptor error for the given key path
    pub fn invalid_descriptor(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Attach the key path of the descriptor being compiled
    pub fn at(self, path: impl Into<String>) -> Self {
        match self {
            Self::InvalidDescriptor { .. } | Self::At { .. } => self,
            other => Self::At {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The error without any key-path wrapping
    pub fn root(&self) -> &Self {
        match self {
            Self::At { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error is a configuration problem (as opposed to bad user input)
    pub fn is_configuration_error(&self) -> bool {
        !matches!(
            self.root(),
            Self::ParseError(_) | Self::AliasDepthExceeded(_) | Self::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_descriptor_names_path() {
        let err = DeclarativeError::invalid_descriptor("deployment-deploy", "missing handler");
        let msg = err.to_string();
        assert!(msg.contains("deployment-deploy"));
        assert!(msg.contains("missing handler"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_at_wraps_once_and_keeps_root() {
        let err = DeclarativeError::HandlerNotFound("deployment.nope".to_string())
            .at("deployment-deploy")
            .at("ignored");
        assert!(err.to_string().contains("deployment-deploy"));
        assert!(!err.to_string().contains("ignored"));
        assert!(matches!(err.root(), DeclarativeError::HandlerNotFound(name) if name == "deployment.nope"));
    }

    #[test]
    fn test_parse_error_is_not_configuration_error() {
        let err = DeclarativeError::ParseError("unexpected argument".to_string());
        assert!(!err.is_configuration_error());
        assert_eq!(err.to_string(), "unexpected argument");
    }
}
