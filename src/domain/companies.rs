//! Travel-company catalog records and status rules.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    Pending,
    Active,
    Inactive,
    Dissolved,
}

impl CompanyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CompanyStatus::Pending => "pending",
            CompanyStatus::Active => "active",
            CompanyStatus::Inactive => "inactive",
            CompanyStatus::Dissolved => "dissolved",
        }
    }

    /// Inverse of [`as_str`](Self::as_str), for text-typed store columns.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(CompanyStatus::Pending),
            "active" => Some(CompanyStatus::Active),
            "inactive" => Some(CompanyStatus::Inactive),
            "dissolved" => Some(CompanyStatus::Dissolved),
            _ => None,
        }
    }

    /// Dissolution is terminal; every other transition is allowed.
    pub fn can_transition_to(self, next: CompanyStatus) -> bool {
        self != CompanyStatus::Dissolved || next == CompanyStatus::Dissolved
    }
}

/// A travel company as persisted by the primary store.
///
/// `registry_id` is the public registry number, unique across the catalog
/// and immutable once assigned. Companies are never deleted; the catalog
/// retires them by status instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: String,
    pub registry_id: String,
    pub name: String,
    pub status: CompanyStatus,
    pub city: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validate the identifying fields of a new company.
pub fn validate_company_identity(registry_id: &str, name: &str) -> Result<(), DomainError> {
    if registry_id.trim().is_empty() {
        return Err(DomainError::validation("registry id must not be blank"));
    }
    if registry_id.contains(':') {
        return Err(DomainError::validation(
            "registry id must not contain a colon",
        ));
    }
    validate_company_name(name)
}

pub fn validate_company_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("company name must not be blank"));
    }
    Ok(())
}

/// Check a status transition against the catalog rules.
pub fn validate_status_transition(
    current: CompanyStatus,
    next: CompanyStatus,
) -> Result<(), DomainError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(DomainError::invariant(format!(
            "company status cannot change from {} to {}",
            current.as_str(),
            next.as_str()
        )))
    }
}
