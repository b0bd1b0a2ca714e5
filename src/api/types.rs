//! Wire types of the management API (camelCase JSON).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A deployment: one bot version bound to a set of channels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub bot_version: String,
    /// Channel name to channel id
    #[serde(default)]
    pub channels: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Deployment {
    /// Id of the channel bound under `name`
    pub fn channel_id(&self, name: &str) -> Option<&str> {
        self.channels.get(name).map(|id| id.as_str())
    }
}

/// Body of create and update requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentBody {
    pub name: String,
    pub bot_version: String,
    /// Sent on create only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<IndexMap<String, String>>,
}

impl DeploymentBody {
    /// Body for creating an empty deployment
    pub fn create(name: impl Into<String>, bot_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bot_version: bot_version.into(),
            channels: Some(IndexMap::new()),
        }
    }

    /// Body for moving an existing deployment to another version
    pub fn update(name: impl Into<String>, bot_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bot_version: bot_version.into(),
            channels: None,
        }
    }
}

/// Channel credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// A messaging channel (e.g. a messenger page or a LINE account)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub options: ChannelOptions,
}

/// Published versions of a bot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotVersions {
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub latest: Option<String>,
}

impl BotVersions {
    /// Whether `version` has been published
    pub fn contains(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deployment_wire_format() {
        let deployment: Deployment = serde_json::from_value(json!({
            "name": "test",
            "botId": "739b5e9f",
            "botVersion": "1.0.5",
            "channels": {"fb": "a228", "line": "b02e"}
        }))
        .unwrap();

        assert_eq!(deployment.bot_id.as_deref(), Some("739b5e9f"));
        assert_eq!(deployment.channel_id("fb"), Some("a228"));
        assert_eq!(deployment.channel_id("slack"), None);
        let keys: Vec<&str> = deployment.channels.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["fb", "line"]);
    }

    #[test]
    fn test_body_shapes() {
        assert_eq!(
            serde_json::to_value(DeploymentBody::create("test", "1.0.5")).unwrap(),
            json!({"name": "test", "botVersion": "1.0.5", "channels": {}})
        );
        assert_eq!(
            serde_json::to_value(DeploymentBody::update("test", "1.0.5")).unwrap(),
            json!({"name": "test", "botVersion": "1.0.5"})
        );
    }

    #[test]
    fn test_channel_serializes_type_and_options() {
        let channel = Channel {
            id: None,
            name: "fb".to_string(),
            kind: "messenger".to_string(),
            url: Some("http://url".to_string()),
            options: ChannelOptions {
                token: Some("t".to_string()),
                refresh_token: Some("r".to_string()),
                secret: None,
            },
        };
        assert_eq!(
            serde_json::to_value(&channel).unwrap(),
            json!({
                "name": "fb",
                "type": "messenger",
                "url": "http://url",
                "options": {"token": "t", "refreshToken": "r"}
            })
        );
    }
}
