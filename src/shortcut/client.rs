//! `reqwest` implementation of the Shortcut story gateway.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::branch::StoryId;
use crate::error::{Service, SyncError};

use super::models::{ApiEpic, ApiStory, Epic, Story};
use super::{ShortcutToken, StoryGateway};

/// Public Shortcut API host.
pub const DEFAULT_SHORTCUT_API_URL: &str = "https://api.app.shortcut.com";

const TOKEN_HEADER: &str = "shortcut-token";
const ERROR_BODY_LIMIT: usize = 160;

/// Shortcut gateway backed by an async `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestStoryGateway {
    client: Client,
    base_url: Url,
}

impl ReqwestStoryGateway {
    /// Builds a client that authenticates every request with `token`.
    ///
    /// `base_url` is the API host without the `/api/v3` suffix, for example
    /// [`DEFAULT_SHORTCUT_API_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] when the base URL does not parse,
    /// the token is not a valid header value, or the HTTP client cannot be
    /// built.
    pub fn for_token(token: &ShortcutToken, base_url: &str) -> Result<Self, SyncError> {
        let parsed_base = Url::parse(base_url).map_err(|error| SyncError::Configuration {
            message: format!("Shortcut API URL '{base_url}' is invalid: {error}"),
        })?;

        let mut token_value =
            HeaderValue::from_str(token.value()).map_err(|error| SyncError::Configuration {
                message: format!("Shortcut token is not a valid header value: {error}"),
            })?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(TOKEN_HEADER), token_value);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|error| SyncError::Configuration {
                message: format!("failed to configure Shortcut HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            base_url: parsed_base,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/v3/{path}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    async fn fetch<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<T, SyncError> {
        let url = self.endpoint(path);
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| SyncError::Network {
                service: Service::Shortcut,
                message: format!("{operation} failed: {error}"),
            })?;

        let checked = check_status(operation, response).await?;
        checked.json::<T>().await.map_err(|error| SyncError::Api {
            service: Service::Shortcut,
            message: format!("{operation} response could not be decoded: {error}"),
        })
    }
}

#[async_trait]
impl StoryGateway for ReqwestStoryGateway {
    async fn story(&self, story_id: &StoryId) -> Result<Story, SyncError> {
        self.fetch::<ApiStory>("fetch story", &format!("stories/{story_id}"))
            .await
            .map(Story::from)
    }

    async fn epic(&self, epic_id: u64) -> Result<Epic, SyncError> {
        self.fetch::<ApiEpic>("fetch epic", &format!("epics/{epic_id}"))
            .await
            .map(Epic::from)
    }
}

async fn check_status(operation: &str, response: Response) -> Result<Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body)
        .unwrap_or_else(|| truncate_for_message(body.trim(), ERROR_BODY_LIMIT));

    Err(map_status_error(operation, status, &message))
}

fn map_status_error(operation: &str, status: StatusCode, message: &str) -> SyncError {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        SyncError::Authentication {
            service: Service::Shortcut,
            message: format!("{operation} failed: Shortcut returned {status} {message}"),
        }
    } else {
        SyncError::Api {
            service: Service::Shortcut,
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

fn truncate_for_message(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_owned();
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str("...");
    truncated
}
