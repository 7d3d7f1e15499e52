//! `reqwest` transport for the Sim API.

use std::time::Duration;

use dune_store::schema::{API_KEY_HEADER, DEFAULT_SIM_BASE_URL};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::{ClientError, PageBody, PageRequest, SimTransport};

const MAX_ERROR_BODY_CHARS: usize = 512;
/// Upper bound on bytes read from a non-2xx response.
const MAX_ERROR_BODY_BYTES: usize = 4 * MAX_ERROR_BODY_CHARS;

/// Configuration for the Sim HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl HttpClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SIM_BASE_URL)
    }
}

/// Sim API client backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpSimClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSimClient {
    /// Builds a client with the configured timeout.
    ///
    /// # Errors
    /// Returns `ClientError` if the underlying HTTP client cannot be built.
    pub fn new(config: &HttpClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("dune-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl SimTransport for HttpSimClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageBody, ClientError> {
        let url = request.url(&self.base_url)?;
        debug!(endpoint = request.endpoint.name(), %url, query = ?request.query, "requesting Sim page");

        let mut response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &request.api_key)
            .query(&request.query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_prefix(&mut response, MAX_ERROR_BODY_BYTES).await?;
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));
        let text = response.text().await?;

        Ok(read_body(is_json, text))
    }
}

/// Malformed JSON is kept as text so the page validator rejects it.
fn read_body(is_json: bool, text: String) -> PageBody {
    let parsed = if is_json {
        serde_json::from_str(&text).ok()
    } else {
        None
    };
    parsed.map_or(PageBody::Text(text), PageBody::Json)
}

/// Reads at most `limit` bytes of the body and drops the rest of the stream.
async fn read_prefix(response: &mut reqwest::Response, limit: usize) -> Result<String, ClientError> {
    let mut prefix = Vec::new();
    while prefix.len() < limit {
        let Some(chunk) = response.chunk().await? else {
            break;
        };
        let take = chunk.len().min(limit - prefix.len());
        prefix.extend_from_slice(&chunk[..take]);
    }
    let mut text = String::from_utf8_lossy(&prefix).into_owned();
    if prefix.len() == limit {
        text.push_str("...");
    }
    Ok(text)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_parsed_only_for_json_content() {
        assert_eq!(
            read_body(true, r#"{"next_offset":"a"}"#.to_string()),
            PageBody::Json(serde_json::json!({ "next_offset": "a" }))
        );
        assert_eq!(
            read_body(false, r#"{"next_offset":"a"}"#.to_string()),
            PageBody::Text(r#"{"next_offset":"a"}"#.to_string())
        );
        assert_eq!(
            read_body(true, "not json".to_string()),
            PageBody::Text("not json".to_string())
        );
    }

    #[test]
    fn truncate_limits_error_bodies() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
