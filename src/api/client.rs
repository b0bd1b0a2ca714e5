//! HTTP client for the bot management API.
//!
//! Endpoints live under `{base_url}/bots/{botId}`. Every request carries the
//! static bearer token when one is configured.

use super::types::{BotVersions, Channel, Deployment, DeploymentBody};
use super::{ApiError, ApiResult};
use crate::observability::Logger;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Operations the deployment commands need from the management API.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// `GET /bots/{botId}/versions`
    async fn bot_versions(&self, bot_id: &str) -> ApiResult<BotVersions>;

    /// `GET /bots/{botId}/deployments/{name}`; 404 is [`ApiError::NotFound`]
    async fn get_deployment(&self, bot_id: &str, name: &str) -> ApiResult<Deployment>;

    /// `GET /bots/{botId}/deployments`
    async fn list_deployments(&self, bot_id: &str) -> ApiResult<Vec<Deployment>>;

    /// `POST /bots/{botId}/deployments`
    async fn create_deployment(&self, bot_id: &str, body: &DeploymentBody)
        -> ApiResult<Deployment>;

    /// `PUT /bots/{botId}/deployments/{name}`
    async fn update_deployment(
        &self,
        bot_id: &str,
        name: &str,
        body: &DeploymentBody,
    ) -> ApiResult<Deployment>;

    /// `DELETE /bots/{botId}/deployments/{name}`; returns the deleted deployment
    async fn delete_deployment(&self, bot_id: &str, name: &str) -> ApiResult<Deployment>;

    /// `POST /bots/{botId}/deployments/{name}/channels`
    async fn create_channel(&self, bot_id: &str, name: &str, channel: &Channel)
        -> ApiResult<Channel>;

    /// `DELETE /bots/{botId}/deployments/{name}/channels/{channelId}`
    async fn delete_channel(&self, bot_id: &str, name: &str, channel_id: &str) -> ApiResult<()>;
}

/// [`ApiClient`] over HTTP.
pub struct HttpApiClient {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    logger: Option<Arc<Logger>>,
}

impl HttpApiClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://api.example.com/v1`
    /// * `token` - Bearer token, sent when present
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            logger: None,
        })
    }

    /// Record requests in the session log
    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// API root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/bots/{botId}/...` with every segment percent-encoded
    fn url(&self, bot_id: &str, segments: &[&str]) -> String {
        let mut url = format!("{}/bots/{}", self.base_url, urlencoding::encode(bot_id));
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self.http_client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn log_request(&self, method: &Method, url: &str, status: Option<StatusCode>) {
        tracing::debug!(%method, url, status = ?status.map(|s| s.as_u16()), "api request");
        if let Some(logger) = &self.logger {
            if let Err(e) = logger.log_api_request(method.as_str(), url, status.map(|s| s.as_u16())) {
                tracing::warn!("failed to write session log: {}", e);
            }
        }
    }

    /// Send a request and turn non-success statuses into errors.
    ///
    /// `what` names the resource in [`ApiError::NotFound`].
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
        what: &str,
    ) -> ApiResult<Response> {
        let mut request = self.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.log_request(&method, url, None);
                return Err(ApiError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        self.log_request(&method, url, Some(status));

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                text
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> ApiResult<T> {
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<serde_json::Value>,
        what: &str,
    ) -> ApiResult<T> {
        let response = self.send(method, &url, body, what).await?;
        Self::decode(response, &url).await
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Config(format!("Invalid request body: {}", e)))
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn bot_versions(&self, bot_id: &str) -> ApiResult<BotVersions> {
        let url = self.url(bot_id, &["versions"]);
        self.fetch(Method::GET, url, None, &format!("bot '{}'", bot_id))
            .await
    }

    async fn get_deployment(&self, bot_id: &str, name: &str) -> ApiResult<Deployment> {
        let url = self.url(bot_id, &["deployments", name]);
        self.fetch(Method::GET, url, None, &format!("deployment '{}'", name))
            .await
    }

    async fn list_deployments(&self, bot_id: &str) -> ApiResult<Vec<Deployment>> {
        let url = self.url(bot_id, &["deployments"]);
        self.fetch(Method::GET, url, None, &format!("bot '{}'", bot_id))
            .await
    }

    async fn create_deployment(
        &self,
        bot_id: &str,
        body: &DeploymentBody,
    ) -> ApiResult<Deployment> {
        let url = self.url(bot_id, &["deployments"]);
        self.fetch(Method::POST, url, Some(to_body(body)?), &format!("bot '{}'", bot_id))
            .await
    }

    async fn update_deployment(
        &self,
        bot_id: &str,
        name: &str,
        body: &DeploymentBody,
    ) -> ApiResult<Deployment> {
        let url = self.url(bot_id, &["deployments", name]);
        self.fetch(
            Method::PUT,
            url,
            Some(to_body(body)?),
            &format!("deployment '{}'", name),
        )
        .await
    }

    async fn delete_deployment(&self, bot_id: &str, name: &str) -> ApiResult<Deployment> {
        let url = self.url(bot_id, &["deployments", name]);
        self.fetch(Method::DELETE, url, None, &format!("deployment '{}'", name))
            .await
    }

    async fn create_channel(
        &self,
        bot_id: &str,
        name: &str,
        channel: &Channel,
    ) -> ApiResult<Channel> {
        let url = self.url(bot_id, &["deployments", name, "channels"]);
        self.fetch(
            Method::POST,
            url,
            Some(to_body(channel)?),
            &format!("deployment '{}'", name),
        )
        .await
    }

    async fn delete_channel(&self, bot_id: &str, name: &str, channel_id: &str) -> ApiResult<()> {
        let url = self.url(bot_id, &["deployments", name, "channels", channel_id]);
        self.send(Method::DELETE, &url, None, &format!("channel '{}'", channel_id))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpApiClient {
        HttpApiClient::new(server.uri(), Some("tok".to_string()), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_encodes_segments() {
        let client =
            HttpApiClient::new("http://api.local/v1/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://api.local/v1");
        assert_eq!(
            client.url("bot 1", &["deployments", "a/b"]),
            "http://api.local/v1/bots/bot%201/deployments/a%2Fb"
        );
    }

    #[tokio::test]
    async fn test_bot_versions_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bots/b1/versions"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"versions": ["1.0.0", "1.0.5"], "latest": "1.0.5"})),
            )
            .mount(&server)
            .await;

        let versions = client(&server).bot_versions("b1").await.unwrap();
        assert_eq!(versions.latest.as_deref(), Some("1.0.5"));
        assert!(versions.contains("1.0.0"));
    }

    #[tokio::test]
    async fn test_get_deployment_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bots/b1/deployments/test"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server).get_deployment("b1", "test").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("deployment 'test'"));
    }

    #[tokio::test]
    async fn test_create_deployment_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bots/b1/deployments"))
            .and(body_json(json!({"name": "test", "botVersion": "1.0.5", "channels": {}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "d1", "name": "test", "botId": "b1", "botVersion": "1.0.5", "channels": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client(&server)
            .create_deployment("b1", &DeploymentBody::create("test", "1.0.5"))
            .await
            .unwrap();
        assert_eq!(created.id.as_deref(), Some("d1"));
    }

    #[tokio::test]
    async fn test_server_error_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/bots/b1/deployments/test/channels/c1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
            .mount(&server)
            .await;

        let err = client(&server).delete_channel("b1", "test", "c1").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Status { status: 500, ref message } if message == "database down"
        ));
    }

    #[tokio::test]
    async fn test_delete_channel_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/bots/b1/deployments/test/channels/c1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client(&server).delete_channel("b1", "test", "c1").await.unwrap();
    }

    #[tokio::test]
    async fn test_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bots/b1/deployments"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server).list_deployments("b1").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
