//! Error types for the TripWeaver domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures of the multi-step generation capability.
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    #[error("Turn limit of {max_turns} exhausted before a final answer")]
    TurnLimitExceeded { max_turns: u32 },

    #[error("Agent '{agent}' failed: {source}")]
    Provider {
        agent: String,
        #[source]
        source: ProviderError,
    },

    #[error("Unknown delegate agent: {0}")]
    UnknownDelegate(String),
}

/// Validation failures when building a [`crate::TripRequest`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripError {
    #[error("Destination must be at least 2 characters, got {0:?}")]
    DestinationTooShort(String),

    #[error("End date {end} must not be before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("Budget must be a non-negative number, got {0}")]
    InvalidBudget(f64),

    #[error("Minimum budget {min} must not exceed maximum budget {max}")]
    BudgetInverted { min: f64, max: f64 },

    #[error("Unknown pace '{0}' (expected relaxed, moderate or packed)")]
    UnknownPace(String),

    #[error("Unknown content filter '{0}' (expected family_friendly or adults_only)")]
    UnknownContentFilter(String),
}
