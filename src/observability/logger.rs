//! Session log for CLI invocations.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Markdown log of CLI sessions.
///
/// Each process run appends one session: the argument vector, every command
/// dispatch (including alias re-dispatches), errors and the completion
/// marker. Console echoes go through `tracing` so they never mix with
/// command output on stdout.
#[derive(Debug)]
pub struct Logger {
    log_file: PathBuf,
    log_level: String,
}

impl Logger {
    /// Initialize logger.
    ///
    /// # Arguments
    /// * `log_file` - Path to log file. If None, creates a timestamped file in temp directory.
    /// * `log_level` - Logging level (defaults to "INFO").
    pub fn new(log_file: Option<&Path>, log_level: Option<&str>) -> Result<Self> {
        let log_file = match log_file {
            Some(p) => p.to_path_buf(),
            None => {
                let mut dir = std::env::temp_dir();
                dir.push("botctl-logs");
                std::fs::create_dir_all(&dir).with_context(|| {
                    format!("Failed to create log directory: {}", dir.display())
                })?;
                let filename = format!(
                    "session_{}_{}.md",
                    Utc::now().timestamp_millis(),
                    std::process::id()
                );
                dir.join(filename)
            }
        };

        let log_level = log_level.unwrap_or("INFO").to_uppercase();

        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let logger = Self {
            log_file,
            log_level,
        };

        if !logger.log_file.exists() {
            logger.initialize_log_file()?;
        }

        Ok(logger)
    }

    /// Path of the log file.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Configured level.
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    fn is_debug(&self) -> bool {
        matches!(self.log_level.as_str(), "DEBUG" | "TRACE")
    }

    fn initialize_log_file(&self) -> Result<()> {
        let mut file = File::create(&self.log_file)
            .with_context(|| format!("Failed to create log file: {}", self.log_file.display()))?;

        let now: DateTime<Utc> = Utc::now();

        writeln!(file, "# botctl Session Log\n")?;
        writeln!(file, "Log started: {}\n", now.to_rfc3339())?;
        writeln!(file, "---\n")?;

        Ok(())
    }

    fn append_to_log(&self, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .with_context(|| format!("Failed to open log file: {}", self.log_file.display()))?;

        write!(file, "{}", content).with_context(|| "Failed to write to log file")?;

        Ok(())
    }

    /// Log session start.
    ///
    /// # Arguments
    /// * `argv` - Process arguments, binary name first.
    pub fn log_session_start(&self, argv: &[String]) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let content = format!(
            "## Session Started - {}\n\n**Argv:** `{}`\n\n",
            now.to_rfc3339(),
            argv.join(" ")
        );

        self.append_to_log(&content)?;
        tracing::debug!(argv = ?argv, "session started");
        Ok(())
    }

    /// Log a command dispatch.
    ///
    /// # Arguments
    /// * `command` - Name of the command whose handler ran.
    /// * `redispatches` - Argument vectors produced by aliases on the way.
    pub fn log_dispatch(&self, command: &str, redispatches: &[Vec<String>]) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let mut content = format!(
            "### Command Dispatch - {}\n\n**Command:** `{}`\n\n",
            now.to_rfc3339(),
            command
        );

        if !redispatches.is_empty() {
            content.push_str("**Alias chain:**\n");
            for argv in redispatches {
                content.push_str(&format!("- `{}`\n", argv.join(" ")));
            }
            content.push('\n');
        }

        self.append_to_log(&content)?;
        tracing::info!(command, aliases = redispatches.len(), "command dispatched");
        Ok(())
    }

    /// Log an outbound API request.
    ///
    /// Only written at DEBUG level.
    pub fn log_api_request(&self, method: &str, url: &str, status: Option<u16>) -> Result<()> {
        if !self.is_debug() {
            return Ok(());
        }

        let now: DateTime<Utc> = Utc::now();
        let status = status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
        let content = format!(
            "### API Request - {}\n\n**Request:** `{} {}`\n**Status:** {}\n\n",
            now.to_rfc3339(),
            method,
            url,
            status
        );

        self.append_to_log(&content)
    }

    /// Log error with context.
    ///
    /// # Arguments
    /// * `error` - Error message.
    /// * `context` - Additional context information.
    pub fn log_error(&self, error: &str, context: Option<&serde_json::Value>) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let mut content = format!(
            "### Error - {}\n\n**Error:** {}\n\n",
            now.to_rfc3339(),
            error
        );

        if let Some(ctx) = context {
            content.push_str(&format!(
                "**Context:**\n```json\n{}\n```\n\n",
                serde_json::to_string_pretty(ctx).unwrap_or_default()
            ));
        }

        self.append_to_log(&content)?;
        tracing::error!("{}", error);
        Ok(())
    }

    /// Log session completion.
    ///
    /// # Arguments
    /// * `reason` - Reason for completion.
    pub fn log_completion(&self, reason: &str) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let content = format!(
            "### Session Completed - {}\n\n**Reason:** {}\n\n---\n\n",
            now.to_rfc3339(),
            reason
        );

        self.append_to_log(&content)?;
        tracing::debug!(reason, "session completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
