//! Contact lookup and search

use std::sync::Arc;

use dealflow_domain::{Company, Contact, Result};

use crate::query::{QueryCache, QueryState};

/// Read-only view over cached contacts and companies.
#[derive(Clone)]
pub struct ContactDirectory {
    cache: Arc<QueryCache>,
}

impl ContactDirectory {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self { cache }
    }

    pub async fn contacts(&self) -> QueryState<Arc<Vec<Contact>>> {
        self.cache.contacts().await
    }

    pub async fn companies(&self) -> QueryState<Arc<Vec<Company>>> {
        self.cache.companies().await
    }

    /// Contacts whose name, email or company name contains `query`,
    /// ignoring case. A blank query returns every contact.
    ///
    /// # Errors
    /// Returns the fetch error when no contact snapshot is available.
    pub async fn search(&self, query: &str) -> Result<Vec<Contact>> {
        let contacts = self.cache.contacts().await.into_result()?;
        Ok(filter_contacts(&contacts, query))
    }
}

/// Pure filtering step of [`ContactDirectory::search`].
pub fn filter_contacts(contacts: &[Contact], query: &str) -> Vec<Contact> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return contacts.to_vec();
    }
    contacts.iter().filter(|contact| contact.matches_query(&needle)).cloned().collect()
}
