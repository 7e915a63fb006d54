//! Port that feeds the query cache

use std::sync::Arc;

use async_trait::async_trait;
use dealflow_domain::Result;

use super::key::{Resource, ResourceKey};
use crate::contacts::ports::ContactRepository;
use crate::deals::ports::DealRepository;
use crate::report_ports::ReportRepository;

/// Loads a fresh snapshot for a cache key.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn fetch(&self, key: ResourceKey) -> Result<Resource>;
}

/// [`ResourceSource`] backed by the repository ports.
#[derive(Clone)]
pub struct RepositorySource {
    deals: Arc<dyn DealRepository>,
    contacts: Arc<dyn ContactRepository>,
    reports: Arc<dyn ReportRepository>,
}

impl RepositorySource {
    pub fn new(
        deals: Arc<dyn DealRepository>,
        contacts: Arc<dyn ContactRepository>,
        reports: Arc<dyn ReportRepository>,
    ) -> Self {
        Self { deals, contacts, reports }
    }
}

#[async_trait]
impl ResourceSource for RepositorySource {
    async fn fetch(&self, key: ResourceKey) -> Result<Resource> {
        let resource = match key {
            ResourceKey::Deals => Resource::Deals(Arc::new(self.deals.list().await?)),
            ResourceKey::Contacts => Resource::Contacts(Arc::new(self.contacts.list_contacts().await?)),
            ResourceKey::Companies => {
                Resource::Companies(Arc::new(self.contacts.list_companies().await?))
            }
            ResourceKey::Dashboard => Resource::Dashboard(Arc::new(self.reports.dashboard().await?)),
        };
        Ok(resource)
    }
}
