//! Mock repository implementations for testing
//!
//! In-memory stand-ins for the remote data store. Each mock counts the calls
//! it receives so tests can assert how many requests an operation issued.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use dealflow_core::{ContactRepository, DealRepository, ReportRepository};
use dealflow_domain::{
    Company, Contact, ContactDraft, CrmError, DashboardReport, Deal, DealDraft,
    Result as DomainResult, Stage,
};
use tokio::sync::Notify;

/// In-memory mock for `DealRepository`.
///
/// Mutations apply to the stored list so a later `list` reflects them, which
/// mirrors a server that persists every accepted change.
#[derive(Default)]
pub struct MockDealRepository {
    deals: Mutex<Vec<Deal>>,
    fail_mutations: AtomicBool,
    fail_deletes_for: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
    list_calls: AtomicUsize,
    stage_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl MockDealRepository {
    /// Create a new mock seeded with the provided deals.
    pub fn new(deals: Vec<Deal>) -> Self {
        Self { deals: Mutex::new(deals), ..Self::default() }
    }

    /// Make every mutation fail with a network error.
    pub fn failing(self) -> Self {
        self.fail_mutations.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_mutations.store(failing, Ordering::SeqCst);
    }

    /// Refuse deletes of `id` only.
    pub fn fail_delete_of(&self, id: &str) {
        self.fail_deletes_for.lock().unwrap().push(id.to_string());
    }

    /// Hold stage updates until `gate` is notified.
    pub fn hold_stage_updates(&self, gate: Arc<Notify>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    pub fn stored(&self) -> Vec<Deal> {
        self.deals.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn stage_calls(&self) -> usize {
        self.stage_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> DomainResult<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(CrmError::Network("connection reset".into()));
        }
        Ok(())
    }

    fn apply_draft(deal: &mut Deal, draft: &DealDraft) {
        deal.title = draft.title.clone();
        deal.value = Some(draft.value);
        deal.stage = draft.stage;
        deal.probability = Some(draft.probability);
        deal.contact_id = draft.contact_id.clone();
        deal.expected_close_date = draft.expected_close_date;
        deal.notes = draft.notes.clone();
    }
}

#[async_trait]
impl DealRepository for MockDealRepository {
    async fn list(&self) -> DomainResult<Vec<Deal>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.stored())
    }

    async fn create(&self, draft: &DealDraft) -> DomainResult<Deal> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let id = format!("new_{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut deal = Deal {
            id,
            title: String::new(),
            value: None,
            stage: Stage::Prospecting,
            probability: None,
            contact_id: String::new(),
            contact: None,
            user: None,
            expected_close_date: None,
            notes: None,
            created_at: Utc::now(),
        };
        Self::apply_draft(&mut deal, draft);
        self.deals.lock().unwrap().push(deal.clone());
        Ok(deal)
    }

    async fn update(&self, id: &str, draft: &DealDraft) -> DomainResult<Deal> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let mut deals = self.deals.lock().unwrap();
        let deal = deals
            .iter_mut()
            .find(|deal| deal.id == id)
            .ok_or_else(|| CrmError::NotFound(format!("deal {id}")))?;
        Self::apply_draft(deal, draft);
        Ok(deal.clone())
    }

    async fn update_stage(&self, id: &str, stage: Stage) -> DomainResult<Deal> {
        self.stage_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check_failure()?;

        let mut deals = self.deals.lock().unwrap();
        let deal = deals
            .iter_mut()
            .find(|deal| deal.id == id)
            .ok_or_else(|| CrmError::NotFound(format!("deal {id}")))?;
        deal.stage = stage;
        Ok(deal.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        if self.fail_deletes_for.lock().unwrap().iter().any(|failing| failing == id) {
            return Err(CrmError::Remote(format!("deal {id} is locked")));
        }

        let mut deals = self.deals.lock().unwrap();
        let before = deals.len();
        deals.retain(|deal| deal.id != id);
        if deals.len() == before {
            return Err(CrmError::NotFound(format!("deal {id}")));
        }
        Ok(())
    }
}

/// In-memory mock for `ContactRepository`.
///
/// `calls` counts list reads; mutations have their own counter and apply to
/// the stored contact list.
#[derive(Default)]
pub struct MockContactRepository {
    contacts: Mutex<Vec<Contact>>,
    companies: Vec<Company>,
    fail_mutations: AtomicBool,
    fail_deletes_for: Mutex<Vec<String>>,
    calls: AtomicUsize,
    mutation_calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl MockContactRepository {
    pub fn new(contacts: Vec<Contact>, companies: Vec<Company>) -> Self {
        Self { contacts: Mutex::new(contacts), companies, ..Self::default() }
    }

    /// Make every mutation fail with a network error.
    pub fn failing(self) -> Self {
        self.fail_mutations.store(true, Ordering::SeqCst);
        self
    }

    /// Refuse deletes of `id` only.
    pub fn fail_delete_of(&self, id: &str) {
        self.fail_deletes_for.lock().unwrap().push(id.to_string());
    }

    pub fn stored(&self) -> Vec<Contact> {
        self.contacts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    fn begin_mutation(&self) -> DomainResult<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(CrmError::Network("connection reset".into()));
        }
        Ok(())
    }

    fn apply_draft(contact: &mut Contact, draft: &ContactDraft) {
        contact.name = draft.name.clone();
        contact.email = draft.email.clone();
        contact.phone = draft.phone.clone();
        contact.position = draft.position.clone();
        contact.company_id = draft.company_id.clone();
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn list_contacts(&self) -> DomainResult<Vec<Contact>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.stored())
    }

    async fn list_companies(&self) -> DomainResult<Vec<Company>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.companies.clone())
    }

    async fn create_contact(&self, draft: &ContactDraft) -> DomainResult<Contact> {
        self.begin_mutation()?;
        let mut contact = Contact {
            id: format!("contact_{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            name: String::new(),
            email: String::new(),
            phone: None,
            position: None,
            company_id: None,
            company: None,
            created_at: Some(Utc::now()),
        };
        Self::apply_draft(&mut contact, draft);
        self.contacts.lock().unwrap().push(contact.clone());
        Ok(contact)
    }

    async fn update_contact(&self, id: &str, draft: &ContactDraft) -> DomainResult<Contact> {
        self.begin_mutation()?;
        let mut contacts = self.contacts.lock().unwrap();
        let contact = contacts
            .iter_mut()
            .find(|contact| contact.id == id)
            .ok_or_else(|| CrmError::NotFound(format!("contact {id}")))?;
        Self::apply_draft(contact, draft);
        Ok(contact.clone())
    }

    async fn delete_contact(&self, id: &str) -> DomainResult<()> {
        self.begin_mutation()?;
        if self.fail_deletes_for.lock().unwrap().iter().any(|failing| failing == id) {
            return Err(CrmError::Remote(format!("contact {id} has open deals")));
        }
        let mut contacts = self.contacts.lock().unwrap();
        let before = contacts.len();
        contacts.retain(|contact| contact.id != id);
        if contacts.len() == before {
            return Err(CrmError::NotFound(format!("contact {id}")));
        }
        Ok(())
    }
}

/// In-memory mock for `ReportRepository` returning a fixed report.
#[derive(Default)]
pub struct MockReportRepository {
    report: DashboardReport,
    calls: AtomicUsize,
}

impl MockReportRepository {
    pub fn new(report: DashboardReport) -> Self {
        Self { report, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportRepository for MockReportRepository {
    async fn dashboard(&self) -> DomainResult<DashboardReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.report.clone())
    }
}
