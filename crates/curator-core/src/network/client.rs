//! HTTP client wrapper.
//!
//! Provides a thin layer over reqwest with:
//! - Configurable per-client timeouts
//! - User-agent management
//! - Transport failures mapped onto [`CuratorError::Network`]

use crate::config::NetworkConfig;
use crate::{CuratorError, Result};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

/// HTTP client used by the remote source and the catalog client.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    /// Timeout applied to every request.
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| CuratorError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                status_code: None,
            })?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Make a GET request with custom headers.
    ///
    /// Non-success statuses are returned to the caller as a normal response;
    /// only transport failures are errors.
    pub async fn get_with_headers(&self, url: &str, headers: &[(&str, String)]) -> Result<Response> {
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(*key, value.as_str());
        }

        let response = self.send(url, request).await?;
        debug!("GET {} -> {}", url, response.status());
        Ok(response)
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_query(&self, url: &str, query: &[(String, String)]) -> Result<Response> {
        let response = self.send(url, self.client.get(url).query(query)).await?;
        debug!("GET {} -> {}", response.url(), response.status());
        Ok(response)
    }

    /// Send a prepared request. Timeouts name the configured limit; other
    /// transport failures go through `From<reqwest::Error>`.
    async fn send(&self, url: &str, request: RequestBuilder) -> Result<Response> {
        match request.send().await {
            Ok(response) => Ok(response),
            Err(e) if e.is_timeout() => Err(CuratorError::Network {
                message: format!("GET {} timed out after {:?}", url, self.timeout),
                status_code: None,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Extract the host from a URL for log messages.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("https://api.wordpress.org/plugins/info/1.2/"),
            "api.wordpress.org"
        );
        assert_eq!(extract_domain("invalid-url"), "unknown");
    }

    #[test]
    fn test_client_with_timeout() {
        let client = HttpClient::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let client = HttpClient::with_timeout(Duration::from_secs(2)).unwrap();
        // Reserve a port, then release it so nothing is listening there.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = client
            .get_with_headers(&format!("http://127.0.0.1:{}/list.json", port), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CuratorError::Network { status_code: None, .. }));
    }

    #[tokio::test]
    async fn test_timeout_names_the_limit() {
        use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_millis(200)).unwrap();
        let err = client
            .get_with_query(&format!("{}/plugins/info/1.2/", server.uri()), &[])
            .await
            .unwrap_err();
        match err {
            CuratorError::Network {
                message,
                status_code: None,
            } => assert!(message.contains("timed out after 200ms"), "{}", message),
            other => panic!("expected network error, got {:?}", other),
        }
    }
}
