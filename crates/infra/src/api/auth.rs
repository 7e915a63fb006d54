//! Session credentials for the CRM API
//!
//! The session holds an opaque bearer token issued at sign-in. Token refresh
//! is not part of this client: a rejected token surfaces as an auth error
//! and the user signs in again.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::errors::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get the token to present on the next request.
    ///
    /// # Errors
    /// `ApiError::Auth` when no session is active.
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// In-memory session holding the current bearer token.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
}

impl Session {
    /// Session with no credentials; every request fails with an auth error
    /// until [`Session::sign_in`] is called.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session seeded from configuration. Blank tokens count as absent.
    pub fn from_token(token: Option<String>) -> Self {
        let session = Self::default();
        if let Some(token) = token {
            session.sign_in(token);
        }
        session
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        let token = token.into();
        if token.trim().is_empty() {
            debug!("ignoring blank session token");
            return;
        }
        *self.token.write() = Some(token);
        info!("session started");
    }

    pub fn sign_out(&self) {
        if self.token.write().take().is_some() {
            info!("session ended");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }
}

#[async_trait]
impl AccessTokenProvider for Session {
    async fn access_token(&self) -> Result<String, ApiError> {
        self.token.read().clone().ok_or_else(|| ApiError::Auth("not signed in".into()))
    }
}
