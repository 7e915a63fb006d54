//! CRM endpoints behind the core repository ports

use std::sync::Arc;

use async_trait::async_trait;
use dealflow_core::{ContactRepository, DealRepository, ReportRepository};
use dealflow_domain::{
    Company, Contact, ContactDraft, CrmError, DashboardReport, Deal, DealDraft, Result, Stage,
    StageUpdate,
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::client::ApiClient;

const DEALS_PATH: &str = "/api/deals";
const CONTACTS_PATH: &str = "/api/contacts";
const COMPANIES_PATH: &str = "/api/companies";
const DASHBOARD_PATH: &str = "/api/reports/dashboard";

#[derive(Deserialize)]
struct DealList {
    #[serde(default)]
    deals: Vec<Deal>,
}

#[derive(Deserialize)]
struct ContactList {
    #[serde(default)]
    contacts: Vec<Contact>,
}

#[derive(Deserialize)]
struct CompanyList {
    #[serde(default)]
    companies: Vec<Company>,
}

/// Mutation responses come back either bare or wrapped in `{ "deal": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum DealEnvelope {
    Wrapped { deal: Deal },
    Bare(Deal),
}

impl From<DealEnvelope> for Deal {
    fn from(envelope: DealEnvelope) -> Self {
        match envelope {
            DealEnvelope::Wrapped { deal } | DealEnvelope::Bare(deal) => deal,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContactEnvelope {
    Wrapped { contact: Contact },
    Bare(Contact),
}

impl From<ContactEnvelope> for Contact {
    fn from(envelope: ContactEnvelope) -> Self {
        match envelope {
            ContactEnvelope::Wrapped { contact } | ContactEnvelope::Bare(contact) => contact,
        }
    }
}

/// Remote data store adapter.
#[derive(Clone)]
pub struct CrmApi {
    client: Arc<ApiClient>,
}

impl CrmApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn deal_path(id: &str) -> Result<String> {
        item_path(DEALS_PATH, "deal", id)
    }

    fn contact_path(id: &str) -> Result<String> {
        item_path(CONTACTS_PATH, "contact", id)
    }
}

fn item_path(collection: &str, kind: &str, id: &str) -> Result<String> {
    if id.trim().is_empty() {
        return Err(CrmError::InvalidInput(format!("{kind} id must not be empty")));
    }
    Ok(format!("{collection}/{}", urlencoding::encode(id)))
}

#[async_trait]
impl DealRepository for CrmApi {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Deal>> {
        let list: DealList = self.client.get(DEALS_PATH).await?;
        debug!(count = list.deals.len(), "deals fetched");
        Ok(list.deals)
    }

    #[instrument(skip(self, draft))]
    async fn create(&self, draft: &DealDraft) -> Result<Deal> {
        let created: DealEnvelope = self.client.post(DEALS_PATH, draft).await?;
        Ok(created.into())
    }

    #[instrument(skip(self, draft))]
    async fn update(&self, id: &str, draft: &DealDraft) -> Result<Deal> {
        let updated: DealEnvelope = self.client.put(&Self::deal_path(id)?, draft).await?;
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn update_stage(&self, id: &str, stage: Stage) -> Result<Deal> {
        let moved: DealEnvelope =
            self.client.patch(&Self::deal_path(id)?, &StageUpdate { stage }).await?;
        Ok(moved.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&Self::deal_path(id)?).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactRepository for CrmApi {
    #[instrument(skip(self))]
    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let list: ContactList = self.client.get(CONTACTS_PATH).await?;
        Ok(list.contacts)
    }

    #[instrument(skip(self))]
    async fn list_companies(&self) -> Result<Vec<Company>> {
        let list: CompanyList = self.client.get(COMPANIES_PATH).await?;
        Ok(list.companies)
    }

    #[instrument(skip(self, draft))]
    async fn create_contact(&self, draft: &ContactDraft) -> Result<Contact> {
        let created: ContactEnvelope = self.client.post(CONTACTS_PATH, draft).await?;
        Ok(created.into())
    }

    #[instrument(skip(self, draft))]
    async fn update_contact(&self, id: &str, draft: &ContactDraft) -> Result<Contact> {
        let updated: ContactEnvelope = self.client.put(&Self::contact_path(id)?, draft).await?;
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    async fn delete_contact(&self, id: &str) -> Result<()> {
        self.client.delete(&Self::contact_path(id)?).await?;
        Ok(())
    }
}

#[async_trait]
impl ReportRepository for CrmApi {
    #[instrument(skip(self))]
    async fn dashboard(&self) -> Result<DashboardReport> {
        Ok(self.client.get(DASHBOARD_PATH).await?)
    }
}
