//! Shared HTTP plumbing for protocol APIs.

use crate::common::ProtocolError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use solstake_lib::env;
use tracing::{debug, error};

/// Client shared by all protocol adapters, with the configured request timeout.
pub fn api_client() -> Result<reqwest::Client, ProtocolError> {
    reqwest::Client::builder()
        .timeout(env::timeouts::http_request())
        .build()
        .map_err(|e| ProtocolError::Network(format!("Failed to build HTTP client: {e}")))
}

pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Sends a prepared request and parses a JSON body, mapping non-2xx to an error.
pub async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ProtocolError> {
    let response = request.headers(json_headers()).send().await?;
    let status = response.status();
    let url = response.url().to_string();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProtocolError::Network(format!("HTTP {status} from {url}: {body}")));
    }

    let text = response.text().await?;
    debug!(
        "Response from {} (first 500 chars): {}",
        url,
        &text[..text.char_indices().nth(500).map_or(text.len(), |(i, _)| i)]
    );

    serde_json::from_str(&text).map_err(|e| {
        error!("Failed to parse JSON from {}: {}", url, e);
        ProtocolError::Network(format!("Invalid JSON from {url}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_client_builds_or_reports_the_builder_error() {
        match api_client() {
            Ok(_) => {}
            Err(ProtocolError::Network(message)) => {
                assert!(message.starts_with("Failed to build HTTP client"))
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn json_headers_accept_and_send_json() {
        let headers = json_headers();
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }
}
