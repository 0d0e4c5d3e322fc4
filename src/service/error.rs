//! The error surface entity services expose to callers.
//!
//! Absence is never an error here; reads return `Ok(None)` and deletes
//! return `Ok(false)` instead. Cache failures never appear at all, they
//! are absorbed by the cache layer.

use thiserror::Error;

use crate::domain::error::DomainError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("forbidden: {message}")]
    Forbidden { message: String },
}

impl AccessError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }
}
