//! Authenticated JSON client for the CRM API
//!
//! Reads are retried on transient failures; mutations are sent exactly once.

use std::sync::Arc;
use std::time::Duration;

use dealflow_domain::constants::{DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_READ_ATTEMPTS};
use dealflow_domain::ApiConfig;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::auth::AccessTokenProvider;
use super::errors::ApiError;
use crate::http::{HttpClient, RetryPolicy};

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Scheme and host without a trailing slash, e.g. `http://localhost:3001`.
    pub base_url: String,
    /// Timeout for a single attempt.
    pub timeout: Duration,
    /// Total attempts for GET requests.
    pub max_read_attempts: usize,
    /// Delay before the first read retry.
    pub retry_backoff: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            max_read_attempts: DEFAULT_MAX_READ_ATTEMPTS,
            retry_backoff: Duration::from_millis(200),
        }
    }
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(settings: &ApiConfig) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(settings.timeout_secs),
            max_read_attempts: settings.max_read_attempts.max(1),
            ..Self::default()
        }
    }
}

/// JSON client that attaches the session's bearer token to every call.
pub struct ApiClient {
    http: HttpClient,
    auth: Arc<dyn AccessTokenProvider>,
    base_url: String,
    attempt_timeout: Duration,
}

impl ApiClient {
    /// # Errors
    /// `Config` when the underlying HTTP client cannot be built.
    pub fn new(
        config: ApiClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .read_policy(RetryPolicy::new(config.max_read_attempts, config.retry_backoff))
            .user_agent(concat!("dealflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("http client: {e}")))?;

        Ok(Self {
            http,
            auth,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            attempt_timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the JSON body.
    ///
    /// # Errors
    /// Any [`ApiError`]; transient failures are retried first.
    #[instrument(skip(self))]
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let response = self.execute(Method::GET, path, None).await?;
        decode(response).await
    }

    /// # Errors
    /// Any [`ApiError`]. Never retried.
    #[instrument(skip(self, body))]
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.send_body(Method::POST, path, body).await
    }

    /// # Errors
    /// Any [`ApiError`]. Never retried.
    #[instrument(skip(self, body))]
    pub async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.send_body(Method::PUT, path, body).await
    }

    /// # Errors
    /// Any [`ApiError`]. Never retried.
    #[instrument(skip(self, body))]
    pub async fn patch<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.send_body(Method::PATCH, path, body).await
    }

    /// DELETE `path`, ignoring whatever body comes back.
    ///
    /// # Errors
    /// Any [`ApiError`]. Never retried.
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, None).await.map(drop)
    }

    async fn send_body<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("request body: {e}")))?;
        let response = self.execute(method, path, Some(body)).await?;
        decode(response).await
    }

    /// One logical call: token lookup, send under the method's retry
    /// policy, status check.
    ///
    /// The token is resolved before anything touches the network.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let token = self.auth.access_token().await?;
        let url = format!("{}{path}", self.base_url);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = &body {
            request = request.json(body);
        }

        let policy =
            if method == Method::GET { self.http.read_policy() } else { RetryPolicy::once() };
        let budget = policy.time_budget(self.attempt_timeout);

        let response = tokio::time::timeout(budget, self.http.send_with_policy(request, policy))
            .await
            .map_err(|_| ApiError::Timeout(budget))??;

        let status = response.status();
        debug!(%method, %url, %status, "api response");
        if status.is_success() {
            return Ok(response);
        }
        let detail = response.text().await.unwrap_or_default();
        let err = status_error(status, &method, path, &detail);
        warn!(category = ?err.category(), retryable = err.should_retry(), error = %err, "api call failed");
        Err(err)
    }
}

/// Decode a success body. An empty body decodes as JSON `null`, which
/// satisfies `()` and `Option<_>` targets.
async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    let status = response.status();
    let text = response.text().await.map_err(|e| ApiError::Network(format!("response body: {e}")))?;

    if text.trim().is_empty() {
        return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
            ApiError::Decode(format!("status {} carried no body", status.as_u16()))
        });
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

fn status_error(status: StatusCode, method: &Method, path: &str, detail: &str) -> ApiError {
    let message = match detail.trim() {
        "" => format!("{method} {path}: {status}"),
        detail => format!("{method} {path}: {status}: {detail}"),
    };

    match status.as_u16() {
        401 | 403 => ApiError::Auth(message),
        404 => ApiError::NotFound(message),
        429 => ApiError::RateLimit(message),
        500..=599 => ApiError::Server(message),
        400..=499 => ApiError::Client(message),
        _ => ApiError::Network(message),
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::auth::Session;

    #[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
    }

    #[derive(Debug, serde::Serialize)]
    struct TestRequest {
        data: String,
    }

    fn client_for(server: &MockServer, token: Option<&str>) -> ApiClient {
        let config = ApiClientConfig {
            base_url: server.uri(),
            retry_backoff: Duration::from_millis(5),
            ..Default::default()
        };
        let auth = Arc::new(Session::from_token(token.map(str::to_string)));
        ApiClient::new(config, auth).unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(TestResponse { message: "success".to_string() }),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Some("test-token"));
        let result: TestResponse = client.get("/test").await.unwrap();
        assert_eq!(result.message, "success");
    }

    #[tokio::test]
    async fn test_missing_session_sends_nothing() {
        let mock_server = MockServer::start().await;

        let client = client_for(&mock_server, None);
        let result: Result<TestResponse, ApiError> = client.get("/test").await;

        assert!(matches!(result, Err(ApiError::Auth(_))));
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_with_204_no_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/no-content"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Some("test-token"));
        let result: Result<(), ApiError> = client.get("/no-content").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_post_with_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/create"))
            .and(body_json(serde_json::json!({ "data": "test" })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(TestResponse { message: "created".to_string() }),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Some("test-token"));
        let request = TestRequest { data: "test".to_string() };
        let result: TestResponse = client.post("/create", &request).await.unwrap();
        assert_eq!(result.message, "created");
    }

    #[tokio::test]
    async fn test_get_retries_server_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Some("test-token"));
        let result: Result<TestResponse, ApiError> = client.get("/flaky").await;
        assert!(matches!(result, Err(ApiError::Server(_))));
    }

    #[tokio::test]
    async fn test_backoff_longer_than_attempt_timeout_is_not_a_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow-retry"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&mock_server)
            .await;

        let config = ApiClientConfig {
            base_url: mock_server.uri(),
            timeout: Duration::from_millis(150),
            max_read_attempts: 2,
            retry_backoff: Duration::from_millis(400),
        };
        let auth = Arc::new(Session::from_token(Some("test-token".to_string())));
        let client = ApiClient::new(config, auth).unwrap();

        let result: Result<TestResponse, ApiError> = client.get("/slow-retry").await;
        assert!(matches!(result, Err(ApiError::Server(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn test_patch_is_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/deals/1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Some("test-token"));
        let result: Result<TestResponse, ApiError> =
            client.patch("/deals/1", &serde_json::json!({ "stage": "PROPOSAL" })).await;
        match result {
            Err(ApiError::Server(msg)) => assert!(msg.contains("boom")),
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mock_server = MockServer::start().await;

        for (route, status) in [("/auth", 401), ("/missing", 404), ("/limited", 429), ("/bad", 422)] {
            Mock::given(method("DELETE"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status))
                .mount(&mock_server)
                .await;
        }

        let client = client_for(&mock_server, Some("test-token"));
        assert!(matches!(client.delete("/auth").await, Err(ApiError::Auth(_))));
        assert!(matches!(client.delete("/missing").await, Err(ApiError::NotFound(_))));
        assert!(matches!(client.delete("/limited").await, Err(ApiError::RateLimit(_))));
        assert!(matches!(client.delete("/bad").await, Err(ApiError::Client(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, Some("test-token"));
        let result: Result<TestResponse, ApiError> = client.get("/garbled").await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_config_from_settings_trims_slash() {
        let settings = ApiConfig {
            base_url: "http://crm.test/".into(),
            timeout_secs: 5,
            max_read_attempts: 0,
        };
        let config = ApiClientConfig::from(&settings);
        assert_eq!(config.base_url, "http://crm.test");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_read_attempts, 1);
    }
}
