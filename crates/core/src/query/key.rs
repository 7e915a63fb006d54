//! Cache keys and the snapshots stored under them

use std::sync::Arc;

use dealflow_domain::{impl_domain_enum_conversions, Company, Contact, DashboardReport, Deal};

/// Logical name of a cached remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Deals,
    Contacts,
    Companies,
    Dashboard,
}

impl_domain_enum_conversions!(ResourceKey {
    Deals => "deals",
    Contacts => "contacts",
    Companies => "companies",
    Dashboard => "dashboard",
});

impl ResourceKey {
    pub const ALL: [ResourceKey; 4] =
        [ResourceKey::Deals, ResourceKey::Contacts, ResourceKey::Companies, ResourceKey::Dashboard];

    /// Keys whose snapshots are derived from the deal collection.
    pub const DEAL_DEPENDENTS: [ResourceKey; 2] = [ResourceKey::Deals, ResourceKey::Dashboard];

    /// Keys that embed contact data. Deals carry the contact name inline.
    pub const CONTACT_DEPENDENTS: [ResourceKey; 3] =
        [ResourceKey::Contacts, ResourceKey::Deals, ResourceKey::Dashboard];
}

/// Immutable snapshot of a remote collection.
///
/// Payloads sit behind `Arc` so every consumer of one fetch observes the
/// same allocation.
#[derive(Debug, Clone)]
pub enum Resource {
    Deals(Arc<Vec<Deal>>),
    Contacts(Arc<Vec<Contact>>),
    Companies(Arc<Vec<Company>>),
    Dashboard(Arc<DashboardReport>),
}

impl Resource {
    pub fn key(&self) -> ResourceKey {
        match self {
            Self::Deals(_) => ResourceKey::Deals,
            Self::Contacts(_) => ResourceKey::Contacts,
            Self::Companies(_) => ResourceKey::Companies,
            Self::Dashboard(_) => ResourceKey::Dashboard,
        }
    }

    /// True when both snapshots share the same allocation.
    pub fn ptr_eq(&self, other: &Resource) -> bool {
        match (self, other) {
            (Self::Deals(a), Self::Deals(b)) => Arc::ptr_eq(a, b),
            (Self::Contacts(a), Self::Contacts(b)) => Arc::ptr_eq(a, b),
            (Self::Companies(a), Self::Companies(b)) => Arc::ptr_eq(a, b),
            (Self::Dashboard(a), Self::Dashboard(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn into_deals(self) -> Option<Arc<Vec<Deal>>> {
        match self {
            Self::Deals(deals) => Some(deals),
            _ => None,
        }
    }

    pub fn into_contacts(self) -> Option<Arc<Vec<Contact>>> {
        match self {
            Self::Contacts(contacts) => Some(contacts),
            _ => None,
        }
    }

    pub fn into_companies(self) -> Option<Arc<Vec<Company>>> {
        match self {
            Self::Companies(companies) => Some(companies),
            _ => None,
        }
    }

    pub fn into_dashboard(self) -> Option<Arc<DashboardReport>> {
        match self {
            Self::Dashboard(report) => Some(report),
            _ => None,
        }
    }
}
