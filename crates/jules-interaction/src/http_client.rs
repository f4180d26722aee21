//! Authenticated HTTP transport for the Jules REST API.
//!
//! Every request carries the API key header; every response is mapped to
//! exactly one of success, [`SdkError::Api`] or [`SdkError::Network`].

use jules_core::config::{ClientConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use jules_core::{SdkError, SdkResult};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

const API_KEY_HEADER: &str = "X-Goog-Api-Key";

/// Low-level client: knows URLs, headers and status mapping, not resources.
#[derive(Clone)]
pub struct JulesHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    api_version: String,
}

impl JulesHttpClient {
    /// Creates a transport against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key, DEFAULT_BASE_URL, DEFAULT_API_VERSION)
    }

    /// Creates a transport with an explicit reqwest client and endpoint.
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: api_version.into().trim_matches('/').to_string(),
        }
    }

    /// Builds a transport from the client configuration (endpoint + timeout).
    pub fn from_config(api_key: impl Into<String>, config: &ClientConfig) -> SdkResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| SdkError::network(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self::with_client(
            client,
            api_key,
            config.base_url.clone(),
            config.api_version.clone(),
        ))
    }

    /// Full URL for a resource path such as `sessions/1:sendMessage`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            self.api_version,
            path.trim_start_matches('/')
        )
    }

    /// Issues a GET with optional query parameters.
    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> SdkResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path).query(query);
        self.execute(request, Method::GET, path).await
    }

    /// Issues a POST with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> SdkResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        self.execute(request, Method::POST, path).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    async fn execute<T>(&self, request: RequestBuilder, method: Method, path: &str) -> SdkResult<T>
    where
        T: DeserializeOwned,
    {
        debug!(%method, path, "sending request");

        let response = request.send().await.map_err(|err| {
            warn!(%method, path, error = %err, "request failed");
            SdkError::network(format!("{method} {path} failed: {err}"))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            warn!(%method, path, %status, error = %err, "failed to read response body");
            SdkError::network(format!("Failed to read response body: {err}"))
        })?;

        if !status.is_success() {
            warn!(%method, path, status = status.as_u16(), "request rejected");
            return Err(map_http_error(status, body));
        }

        info!(%method, path, status = status.as_u16(), "request completed");
        decode_body(&body)
    }
}

/// Non-2xx responses keep their raw body; it is never parsed.
fn map_http_error(status: StatusCode, body: String) -> SdkError {
    SdkError::api(status.as_u16(), body)
}

/// Decodes a 2xx body. An empty body is treated as `{}`.
fn decode_body<T>(body: &str) -> SdkResult<T>
where
    T: DeserializeOwned,
{
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body)
        .map_err(|err| SdkError::network(format!("Failed to decode response: {err}")))
}

/// Query parameters shared by the paginated list calls.
pub(crate) fn page_query(
    page_size: Option<u32>,
    page_token: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(size) = page_size {
        query.push(("pageSize", size.to_string()));
    }
    if let Some(token) = page_token.filter(|token| !token.is_empty()) {
        query.push(("pageToken", token.to_string()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Empty {}

    #[test]
    fn test_url_joins_base_version_and_path() {
        let client = JulesHttpClient::with_client(
            Client::new(),
            "test-key",
            "https://test.com/",
            "v1",
        );
        assert_eq!(client.url("/sources"), "https://test.com/v1/sources");
        assert_eq!(
            client.url("sessions/1:approvePlan"),
            "https://test.com/v1/sessions/1:approvePlan"
        );
    }

    #[test]
    fn test_error_status_keeps_raw_body() {
        let err = map_http_error(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#.to_string());
        assert_eq!(err, SdkError::api(404, r#"{"error":"not found"}"#));
    }

    #[test]
    fn test_decode_body_success() {
        let decoded: HashMap<String, String> = decode_body(r#"{"key":"value"}"#).unwrap();
        assert_eq!(decoded.get("key").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_decode_empty_body_as_empty_object() {
        let decoded: Empty = decode_body("").unwrap();
        assert_eq!(decoded, Empty {});
    }

    #[test]
    fn test_decode_garbage_is_network_error() {
        let result: SdkResult<Empty> = decode_body("<html>");
        assert!(result.unwrap_err().is_network());
    }

    #[test]
    fn test_page_query_skips_unset_and_empty_values() {
        assert!(page_query(None, None).is_empty());
        assert!(page_query(None, Some("")).is_empty());
        assert_eq!(
            page_query(Some(10), Some("abc")),
            vec![("pageSize", "10".to_string()), ("pageToken", "abc".to_string())]
        );
    }
}
