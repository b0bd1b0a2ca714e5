//! CommandContext adapter trait
//!
//! Provides output and logging to CLI commands without coupling them to the
//! terminal.

use crate::cli::error::CliError;
use crate::cli::utils::display_error_with_suggestions;

/// Provides context for CLI command execution
///
/// Commands write their results through this trait, so tests can capture
/// output instead of reading stdout.
///
/// # Example
///
/// ```rust,ignore
/// use botctl::cli::CommandContext;
///
/// struct QuietContext;
///
/// impl CommandContext for QuietContext {
///     fn print_line(&self, line: &str) {
///         println!("{}", line);
///     }
///
///     fn print_value(&self, value: &serde_json::Value) {
///         println!("{}", value);
///     }
///
///     fn log_info(&self, _message: &str) {}
///
///     fn log_warn(&self, message: &str) {
///         eprintln!("{}", message);
///     }
/// }
/// ```
pub trait CommandContext: Send + Sync {
    /// Name used in suggestions, e.g. `botctl`
    fn app_name(&self) -> &str {
        env!("CARGO_PKG_NAME")
    }

    /// Print a line of command output
    fn print_line(&self, line: &str);

    /// Print a structured result
    fn print_value(&self, value: &serde_json::Value);

    /// Log an informational message
    fn log_info(&self, message: &str);

    /// Log a warning message
    fn log_warn(&self, message: &str);

    /// Log an error message
    fn log_error(&self, message: &str) {
        self.log_warn(message);
    }

    /// Report a failed command to the user
    fn report_error(&self, error: &CliError, context: &str) {
        self.log_error(&format!("{}: {}", context, error));
    }
}

/// Terminal implementation: output on stdout, diagnostics on stderr
#[derive(Debug, Clone, Default)]
pub struct ConsoleContext {
    app_name: Option<String>,
}

impl ConsoleContext {
    /// Create a console context
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `name` in suggestions instead of the package name
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }
}

impl CommandContext for ConsoleContext {
    fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or(env!("CARGO_PKG_NAME"))
    }

    fn print_line(&self, line: &str) {
        println!("{}", line);
    }

    fn print_value(&self, value: &serde_json::Value) {
        match serde_json::to_string_pretty(value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", value),
        }
    }

    fn log_info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn log_warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn log_error(&self, message: &str) {
        tracing::error!("{}", message);
    }

    fn report_error(&self, error: &CliError, context: &str) {
        tracing::debug!(?error, context, "command failed");
        display_error_with_suggestions(error, context, Some(self.app_name()));
    }
}
