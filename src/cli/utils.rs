//! Shared utility functions for CLI commands

use colored::*;

/// Suggestions for an error message, empty when nothing specific applies
pub fn error_suggestions(error: &str, app_name: &str) -> Vec<String> {
    let error_str = error.to_lowercase();
    if error_str.contains("bot id not found") || error_str.contains("bot.toml") {
        vec![
            format!("Run '{}' from the bot project directory", app_name),
            "Set BOTCTL_BOT_ID to the bot id".to_string(),
            "Point [bot] descriptor at the bot descriptor file".to_string(),
        ]
    } else if error_str.contains("http 401") || error_str.contains("http 403") {
        vec![
            "Check the token in [api] token or BOTCTL_TOKEN".to_string(),
            "Make sure the token has access to this bot".to_string(),
        ]
    } else if error_str.contains("not found") {
        vec![
            format!("Run '{} deployment-list' to see existing deployments", app_name),
            "Check the deployment and channel names".to_string(),
        ]
    } else if error_str.contains("connection")
        || error_str.contains("network")
        || error_str.contains("timed out")
        || error_str.contains("request to")
    {
        vec![
            "Check your internet connection".to_string(),
            "Verify [api] base_url or BOTCTL_API_URL".to_string(),
            "Try again in a few moments".to_string(),
        ]
    } else if error_str.contains("serialization") || error_str.contains("json") {
        vec!["Check that --data is valid JSON".to_string()]
    } else {
        Vec::new()
    }
}

/// Display a user-friendly error message with suggestions
pub fn display_error_with_suggestions<E: std::fmt::Display>(
    error: &E,
    context: &str,
    app_name: Option<&str>,
) {
    let app = app_name.unwrap_or(env!("CARGO_PKG_NAME"));

    eprintln!("{} {}", "Error:".red().bold(), context);
    eprintln!("   {}", error.to_string().red());

    let suggestions = error_suggestions(&error.to_string(), app);
    if !suggestions.is_empty() {
        eprintln!("{}", "Suggestions:".blue());
        for suggestion in suggestions {
            eprintln!("   • {}", suggestion);
        }
    }
}

/// Truncate text with ellipsis if it exceeds max length (in characters)
pub fn truncate_with_ellipsis(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
