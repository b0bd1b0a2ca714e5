//! Middleware shipped with botctl
//!
//! - `helper.bot_id`: prepends the current bot id (or `null`) to the arguments
//! - `helper.trace`: logs the invocation at debug level

use super::declarative::{middleware_fn, Invocation, Middleware};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Where the current bot id comes from
#[derive(Debug, Clone)]
pub struct BotIdSource {
    /// Takes precedence over the descriptor (from `BOTCTL_BOT_ID`)
    pub override_id: Option<String>,
    /// Bot descriptor file holding a top-level `id`
    pub descriptor: PathBuf,
}

impl BotIdSource {
    pub fn new(override_id: Option<String>, descriptor: impl Into<PathBuf>) -> Self {
        Self {
            override_id,
            descriptor: descriptor.into(),
        }
    }

    /// The bot id, or `None` when neither the override nor the descriptor has one
    pub fn resolve(&self) -> Option<String> {
        if let Some(id) = self.override_id.as_deref().filter(|id| !id.trim().is_empty()) {
            return Some(id.to_string());
        }
        read_descriptor_id(&self.descriptor)
    }
}

fn read_descriptor_id(path: &Path) -> Option<String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(path = %path.display(), "bot descriptor not readable: {}", e);
            return None;
        }
    };

    let document: Value = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).ok()?,
        _ => match toml::from_str::<toml::Value>(&content) {
            Ok(value) => serde_json::to_value(value).ok()?,
            Err(e) => {
                tracing::warn!(path = %path.display(), "invalid bot descriptor: {}", e);
                return None;
            }
        },
    };

    match document.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

/// `helper.bot_id`
pub fn bot_id(source: BotIdSource) -> Middleware {
    middleware_fn(move |invocation: Invocation| {
        let id = source.resolve().map(Value::String).unwrap_or(Value::Null);
        invocation.prepend_arg(id)
    })
}

/// `helper.trace`
pub fn trace() -> Middleware {
    middleware_fn(|invocation: Invocation| {
        tracing::debug!(
            command = %invocation.command,
            args = ?invocation.args,
            options = ?invocation.options,
            "invocation"
        );
        invocation
    })
}
