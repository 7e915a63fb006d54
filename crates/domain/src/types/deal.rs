//! Deal (sales opportunity) types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::contact::ContactSummary;
use super::stage::Stage;
use crate::constants::{MAX_PROBABILITY, MODERATE_PROBABILITY_THRESHOLD, STRONG_PROBABILITY_THRESHOLD};
use crate::errors::{CrmError, Result};
use crate::utils::dates::optional_date;
use crate::utils::lenient::null_as_default;

/// A sales opportunity tracked through the pipeline.
///
/// Owned by the remote data store; the client only ever holds a cached copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub title: String,
    /// Monetary value. Older records may omit it; aggregates treat that as 0.
    #[serde(default)]
    pub value: Option<Decimal>,
    pub stage: Stage,
    #[serde(default)]
    pub probability: Option<u8>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_id: String,
    #[serde(default)]
    pub contact: Option<ContactSummary>,
    #[serde(default)]
    pub user: Option<DealOwner>,
    #[serde(default, with = "optional_date", skip_serializing_if = "Option::is_none")]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Deal {
    /// Value with a missing amount treated as zero.
    pub fn value_or_zero(&self) -> Decimal {
        self.value.unwrap_or(Decimal::ZERO)
    }

    /// Name of the associated contact, empty when the payload did not embed it.
    pub fn contact_name(&self) -> &str {
        self.contact.as_ref().map_or("", |contact| contact.name.as_str())
    }

    pub fn company_name(&self) -> Option<&str> {
        self.contact.as_ref().and_then(ContactSummary::company_name)
    }

    pub fn probability_band(&self) -> ProbabilityBand {
        ProbabilityBand::from_percent(self.probability.unwrap_or(0))
    }

    /// Case-insensitive match of `needle` against title or contact name.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.contact_name().to_lowercase().contains(needle)
    }
}

/// User that owns a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealOwner {
    pub name: String,
}

/// Health bucket derived from a deal's win probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityBand {
    /// Above 70%
    Strong,
    /// Above 40%
    Moderate,
    Weak,
}

impl ProbabilityBand {
    pub fn from_percent(percent: u8) -> Self {
        if percent > STRONG_PROBABILITY_THRESHOLD {
            Self::Strong
        } else if percent > MODERATE_PROBABILITY_THRESHOLD {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

/// Writable fields of a deal, sent on create and full update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealDraft {
    pub title: String,
    pub value: Decimal,
    pub stage: Stage,
    pub probability: u8,
    pub contact_id: String,
    #[serde(default, with = "optional_date", skip_serializing_if = "Option::is_none")]
    pub expected_close_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DealDraft {
    /// Check the draft before it is sent anywhere.
    ///
    /// # Errors
    /// Returns `CrmError::InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CrmError::InvalidInput("title is required".into()));
        }
        if self.contact_id.trim().is_empty() {
            return Err(CrmError::InvalidInput("contact is required".into()));
        }
        if self.value.is_sign_negative() && !self.value.is_zero() {
            return Err(CrmError::InvalidInput(format!(
                "value must not be negative (got {})",
                self.value
            )));
        }
        if self.probability > MAX_PROBABILITY {
            return Err(CrmError::InvalidInput(format!(
                "probability must be between 0 and {MAX_PROBABILITY} (got {})",
                self.probability
            )));
        }
        Ok(())
    }
}

impl From<&Deal> for DealDraft {
    fn from(deal: &Deal) -> Self {
        Self {
            title: deal.title.clone(),
            value: deal.value_or_zero(),
            stage: deal.stage,
            probability: deal.probability.unwrap_or(0),
            contact_id: deal.contact_id.clone(),
            expected_close_date: deal.expected_close_date,
            notes: deal.notes.clone(),
        }
    }
}

/// Partial update body used for stage transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageUpdate {
    pub stage: Stage,
}
