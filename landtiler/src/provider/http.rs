//! HTTP client abstraction for testability

use std::time::Duration;

use reqwest::StatusCode;

use super::types::FetchError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP client backed by reqwest.
///
/// The request timeout doubles as the per-tile fetch timeout.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("landtiler/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            return Err(FetchError::OutOfCoverage);
        }
        if !status.is_success() {
            return Err(FetchError::Http(format!("HTTP {} from {}", status, url)));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| FetchError::Http(format!("Failed to read response: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock HTTP client that returns a canned response and records the
    /// requested URLs.
    pub struct MockHttpClient {
        pub response: Result<Vec<u8>, FetchError>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new(response: Result<Vec<u8>, FetchError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_body(body: &str) -> Self {
            Self::new(Ok(body.as_bytes().to_vec()))
        }

        pub fn last_url(&self) -> Option<String> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient::new(Ok(vec![1, 2, 3, 4]));

        let result = mock.get("http://example.com");
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.last_url().as_deref(), Some("http://example.com"));
    }

    #[test]
    fn test_mock_client_error() {
        let mock = MockHttpClient::new(Err(FetchError::Http("Test error".to_string())));
        assert!(mock.get("http://example.com").is_err());
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(ReqwestClient::with_timeout(5).is_ok());
    }
}
