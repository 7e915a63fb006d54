//! Thin reqwest wrapper with a per-call retry policy
//!
//! The policy decides how often a request may be sent. Reads use the
//! configured [`RetryPolicy`]; anything that mutates server state goes out
//! under [`RetryPolicy::once`] so an applied change is never replayed.

use std::time::Duration;

use dealflow_domain::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_READ_ATTEMPTS};
use dealflow_domain::CrmError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::errors::InfraError;

const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(200);
const MAX_BACKOFF_DOUBLINGS: u32 = 8;

/// How many times a request may be sent and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total sends, including the first one. Never zero.
    pub max_attempts: usize,
    /// Wait before the first retry; doubles for each further retry.
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_backoff }
    }

    /// Single send, no retries.
    pub fn once() -> Self {
        Self { max_attempts: 1, base_backoff: Duration::ZERO }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_before(&self, retry: usize) -> Duration {
        let doublings = u32::try_from(retry.saturating_sub(1))
            .unwrap_or(MAX_BACKOFF_DOUBLINGS)
            .min(MAX_BACKOFF_DOUBLINGS);
        self.base_backoff.saturating_mul(1 << doublings)
    }

    /// Sum of every backoff sleep the policy can take.
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts)
            .map(|retry| self.delay_before(retry))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Wall-clock bound for a whole send: each attempt may use
    /// `attempt_timeout`, plus the sleeps between them.
    pub fn time_budget(&self, attempt_timeout: Duration) -> Duration {
        let attempts = u32::try_from(self.max_attempts).unwrap_or(u32::MAX);
        attempt_timeout.saturating_mul(attempts).saturating_add(self.total_backoff())
    }

    fn has_budget_after(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_READ_ATTEMPTS, DEFAULT_BASE_BACKOFF)
    }
}

/// Pooled HTTP client shared by every API call.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    read_policy: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn read_policy(&self) -> RetryPolicy {
        self.read_policy
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send a read, retrying connection failures and 5xx responses.
    ///
    /// # Errors
    /// Transport failures of the final attempt, mapped to `CrmError`.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, CrmError> {
        self.send_with_policy(builder, self.read_policy).await
    }

    /// Send exactly once.
    ///
    /// # Errors
    /// The transport failure, mapped to `CrmError`.
    pub async fn send_once(&self, builder: RequestBuilder) -> Result<Response, CrmError> {
        self.send_with_policy(builder, RetryPolicy::once()).await
    }

    /// Send under an explicit policy. Non-2xx statuses are returned as
    /// responses; only transport failures become errors.
    ///
    /// # Errors
    /// `Internal` when the body cannot be replayed, otherwise the mapped
    /// transport failure of the last attempt.
    pub async fn send_with_policy(
        &self,
        builder: RequestBuilder,
        policy: RetryPolicy,
    ) -> Result<Response, CrmError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let request = builder
                .try_clone()
                .ok_or_else(|| CrmError::Internal("streaming request bodies cannot be retried".into()))?
                .build()
                .map_err(|err| CrmError::from(InfraError::from(err)))?;
            let method = request.method().clone();
            let url = request.url().clone();

            match self.client.execute(request).await {
                Ok(response) if response.status().is_server_error() => {
                    if !policy.has_budget_after(attempt) {
                        return Ok(response);
                    }
                    warn!(attempt, %method, %url, status = %response.status(), "server error, retrying");
                }
                Ok(response) => {
                    debug!(attempt, %method, %url, status = %response.status(), "response received");
                    return Ok(response);
                }
                Err(err) => {
                    if !(policy.has_budget_after(attempt) && is_transient(&err)) {
                        return Err(InfraError::from(err).into());
                    }
                    warn!(attempt, %method, %url, error = %err, "transport failure, retrying");
                }
            }

            let delay = policy.delay_before(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    read_policy: RetryPolicy,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            read_policy: RetryPolicy::default(),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn read_policy(mut self, policy: RetryPolicy) -> Self {
        self.read_policy = policy;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// `Config` when the TLS backend or client cannot be initialised.
    pub fn build(self) -> Result<HttpClient, CrmError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder.build().map_err(|err| CrmError::from(InfraError::from(err)))?;

        Ok(HttpClient { client, read_policy: self.read_policy })
    }
}
