//! Error type shared by the engine, the stores and the loaders

use thiserror::Error;

use crate::leads::LeadId;

#[derive(Debug, Error)]
pub enum RoiError {
    #[error("Unknown financing profile: credit rating {rating:?}, loan term {term:?}")]
    UnknownFinancingProfile { rating: String, term: String },

    #[error("Invalid financing terms: {field}: {reason}")]
    InvalidFinancingTerms { field: String, reason: String },

    #[error("Invalid project input: {field}: {reason}")]
    InvalidProjectInput { field: String, reason: String },

    #[error("Invalid assumption table: {0}")]
    InvalidAssumptions(String),

    #[error("Lead {0} already exists")]
    DuplicateLead(LeadId),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RoiError {
    pub(crate) fn financing(field: &str, reason: impl Into<String>) -> Self {
        RoiError::InvalidFinancingTerms {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn project(field: &str, reason: impl Into<String>) -> Self {
        RoiError::InvalidProjectInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RoiError::UnknownFinancingProfile { .. }
                | RoiError::InvalidFinancingTerms { .. }
                | RoiError::InvalidProjectInput { .. }
                | RoiError::Parse(_)
        )
    }
}

pub type RoiResult<T> = Result<T, RoiError>;
