//! Google Calendar v3 over REST.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error, Result,
    calendar::{CalendarLocator, EventPayload, EventService, ServiceError},
};

const RATE_LIMIT_REASONS: [&str; 2] = ["rateLimitExceeded", "userRateLimitExceeded"];

#[derive(Debug, Deserialize)]
struct CalendarListPage {
    #[serde(default)]
    items: Vec<CalendarEntry>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarEntry {
    id: String,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(default)]
    reason: String,
}

/// Google Calendar v3 client authorized with a bearer access token.
pub struct GoogleCalendar {
    client: Client,
    base_url: String,
    access_token: String,
}

impl GoogleCalendar {
    /// Public API root
    pub const API_ROOT: &'static str = "https://www.googleapis.com/calendar/v3";

    /// Client with a 30 second request timeout
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(access_token, 30)
    }

    /// Client with a custom request timeout
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn with_timeout(access_token: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("kurser/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: Self::API_ROOT.to_string(),
            access_token: access_token.into(),
        })
    }

    /// Point the client at another API root, e.g. a local mock
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid API root '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("API root '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Non-success responses that are worth retrying: rate limits and
    /// server-side errors
    fn classify_status(status: StatusCode, body: &str) -> ServiceError {
        let detail = serde_json::from_str::<ErrorBody>(body).ok().map(|b| b.error);
        let message = match &detail {
            Some(d) if !d.message.is_empty() => format!("HTTP {}: {}", status, d.message),
            _ => format!("HTTP {}", status),
        };

        let rate_limited = status == StatusCode::FORBIDDEN
            && detail.as_ref().is_some_and(|d| {
                d.errors
                    .iter()
                    .any(|e| RATE_LIMIT_REASONS.contains(&e.reason.as_str()))
            });

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS || rate_limited {
            ServiceError::Transient(message)
        } else {
            ServiceError::Fatal(message)
        }
    }

    fn classify_request_error(error: reqwest::Error) -> ServiceError {
        if error.is_timeout() || error.is_connect() {
            ServiceError::Transient(format!("Request failed: {}", error))
        } else {
            ServiceError::Fatal(format!("Request failed: {}", error))
        }
    }

    async fn api_error(response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Error::CalendarApi(Self::classify_status(status, &body).to_string())
    }
}

#[async_trait]
impl EventService for GoogleCalendar {
    async fn insert(
        &self,
        calendar_id: &str,
        payload: &EventPayload,
    ) -> std::result::Result<(), ServiceError> {
        let url = self
            .url(&["calendars", calendar_id, "events"])
            .map_err(|e| ServiceError::Fatal(e.to_string()))?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(payload)
            .send()
            .await
            .map_err(Self::classify_request_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::classify_status(status, &body))
    }
}

#[async_trait]
impl CalendarLocator for GoogleCalendar {
    async fn find_calendar(&self, name: &str) -> Result<Option<String>> {
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.url(&["users", "me", "calendarList"])?;
            if let Some(ref token) = page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.access_token)
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(Self::api_error(response).await);
            }

            let page: CalendarListPage = response.json().await?;
            if let Some(entry) = page.items.into_iter().find(|c| c.summary == name) {
                return Ok(Some(entry.id));
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => return Ok(None),
            }
        }
    }

    async fn create_calendar(&self, name: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url(&["calendars"])?)
            .bearer_auth(&self.access_token)
            .json(&json!({ "summary": name }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let created: CalendarEntry = response.json().await?;
        tracing::info!("Created calendar {} ({})", name, created.id);
        Ok(created.id)
    }

    async fn delete_calendar(&self, calendar_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&["calendars", calendar_id])?)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        tracing::info!("Deleted calendar {}", calendar_id);
        Ok(())
    }
}
