//! Deal and contact fixtures

use chrono::{TimeZone, Utc};
use dealflow_domain::{
    CompanySummary, Contact, ContactDraft, ContactSummary, Deal, DealDraft, Stage,
};
use rust_decimal::Decimal;

/// Build a deal with a fixed creation timestamp.
pub fn deal(id: &str, title: &str, value: i64, stage: Stage) -> Deal {
    Deal {
        id: id.into(),
        title: title.into(),
        value: Some(Decimal::from(value)),
        stage,
        probability: Some(50),
        contact_id: format!("contact_{id}"),
        contact: Some(ContactSummary {
            id: Some(format!("contact_{id}")),
            name: format!("Contact {id}"),
            company: None,
        }),
        user: None,
        expected_close_date: None,
        notes: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

/// Two prospecting deals worth 1000 and 2000 plus one won deal worth 500.
pub fn seeded_deals() -> Vec<Deal> {
    vec![
        deal("1", "Contract A", 1000, Stage::Prospecting),
        deal("2", "Contract B", 2000, Stage::Prospecting),
        deal("3", "Deal C", 500, Stage::ClosedWon),
    ]
}

pub fn draft(title: &str, value: i64) -> DealDraft {
    DealDraft {
        title: title.into(),
        value: Decimal::from(value),
        stage: Stage::Prospecting,
        probability: 30,
        contact_id: "contact_1".into(),
        expected_close_date: None,
        notes: None,
    }
}

pub fn contact(id: &str, name: &str, email: &str, company: Option<&str>) -> Contact {
    Contact {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        phone: None,
        position: None,
        company_id: None,
        company: company.map(|name| CompanySummary { name: name.into() }),
        created_at: None,
    }
}

pub fn contact_draft(name: &str, email: &str) -> ContactDraft {
    ContactDraft { name: name.into(), email: email.into(), ..ContactDraft::default() }
}
