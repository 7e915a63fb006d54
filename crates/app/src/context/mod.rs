//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use dealflow_core::{
    ContactDirectory, ContactService, DealService, QueryCache, RepositorySource,
    StageTransitionController,
};
use dealflow_domain::{AppConfig, Result};
use dealflow_infra::{ApiClient, ApiClientConfig, CrmApi, Session};
use tracing::info;

use crate::notifications::NotificationCenter;

/// Application context - holds all services and dependencies
///
/// One instance per running client. Every service shares the same query
/// cache, so a mutation made through any of them is visible to all readers.
pub struct AppContext {
    pub config: AppConfig,
    pub session: Arc<Session>,
    pub cache: Arc<QueryCache>,
    pub transitions: Arc<StageTransitionController>,
    pub deals: Arc<DealService>,
    pub contacts: Arc<ContactService>,
    pub directory: ContactDirectory,
    pub notifications: Arc<NotificationCenter>,
}

impl AppContext {
    /// Build a context from the environment or a probed config file,
    /// falling back to defaults when neither is present.
    ///
    /// # Errors
    /// Returns `Config` when a present configuration source is invalid.
    pub fn new() -> Result<Self> {
        let config = dealflow_infra::config::load_or_default()?;
        Self::new_with_config(config)
    }

    /// Build a context from an explicit configuration.
    ///
    /// # Errors
    /// Returns `Config` when the HTTP client cannot be constructed.
    pub fn new_with_config(config: AppConfig) -> Result<Self> {
        let session = Arc::new(Session::from_token(config.session.token.clone()));
        let client = ApiClient::new(ApiClientConfig::from(&config.api), session.clone())?;
        let api = Arc::new(CrmApi::new(Arc::new(client)));

        let source = RepositorySource::new(api.clone(), api.clone(), api.clone());
        let mut cache = QueryCache::new(Arc::new(source));
        if let Some(secs) = config.cache.stale_after_secs {
            cache = cache.with_stale_after(Duration::from_secs(secs));
        }
        let cache = Arc::new(cache);

        let notifications = Arc::new(NotificationCenter::new());
        let transitions = Arc::new(StageTransitionController::new(
            api.clone(),
            cache.clone(),
            notifications.clone(),
        ));
        let deals = Arc::new(DealService::new(api.clone(), cache.clone(), notifications.clone()));
        let contacts = Arc::new(ContactService::new(api, cache.clone(), notifications.clone()));
        let directory = ContactDirectory::new(cache.clone());

        info!(
            base_url = %config.api.base_url,
            authenticated = session.is_authenticated(),
            "application context ready"
        );

        Ok(Self {
            config,
            session,
            cache,
            transitions,
            deals,
            contacts,
            directory,
            notifications,
        })
    }
}
