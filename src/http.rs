//! HTTP transport for overlay navigations.
//!
//! A thin wrapper over a shared `reqwest` client that attaches the referrer
//! header every navigation carries and hands the response body plus the
//! metadata the render step needs back to the navigator.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::types::{NavError, NavigatorConfig};

/// Header carrying the host page URL as referrer context on every request.
pub const REFERER_HEADER: &str = "X-Referer";

const DEFAULT_USER_AGENT: &str = "remote-overlay/1.0";

/// HTTP client bound to a host page.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: reqwest::Client,
    referrer: Url,
}

impl Transport {
    pub fn new(referrer: Url, config: &NavigatorConfig) -> Result<Self, NavError> {
        let user_agent = config
            .user_agent
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds())))
            .build()?;

        Ok(Self { client, referrer })
    }

    /// Issue a request to `location`, form-encoding `body` when present.
    pub async fn send(
        &self,
        location: &Url,
        method: Method,
        body: Option<&[(String, String)]>,
    ) -> Result<FetchedResponse, NavError> {
        let mut request = self
            .client
            .request(method, location.clone())
            .header(REFERER_HEADER, self.referrer.as_str());

        if let Some(fields) = body {
            request = request.form(fields);
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        Ok(FetchedResponse {
            status,
            content_type,
            body,
        })
    }
}

/// A settled response, ready for classification.
///
/// Non-2xx statuses are carried as data, not errors: a server error page
/// with an HTML body renders like any other content.
#[derive(Debug, Clone)]
pub(crate) struct FetchedResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchedResponse {
    /// Whether the declared media type marks this body as HTML.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|value| value.trim_start().to_ascii_lowercase().starts_with("text/html"))
    }

    /// Human-readable status text for the alert fallback.
    pub fn status_text(&self) -> String {
        self.status
            .canonical_reason()
            .map_or_else(|| self.status.as_str().to_string(), str::to_string)
    }
}
