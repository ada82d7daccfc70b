//! Error types for leg resolution and trip planning.

use chrono::{DateTime, Utc};

/// Why a single leg produced no duration.
///
/// The engine treats every variant the same way: the leg has no result.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LegFailure {
    #[error("routing request failed: {0}")]
    Transport(String),
    #[error("no route found")]
    NoRoute,
    #[error("routing response was malformed: {0}")]
    InvalidResponse(String),
    #[error("evaluation was cancelled")]
    Cancelled,
    #[error("evaluation deadline passed before the leg started")]
    DeadlineExceeded,
}

impl From<reqwest::Error> for LegFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LegFailure::InvalidResponse(err.to_string())
        } else {
            LegFailure::Transport(err.to_string())
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateSourceError {
    #[error("place search failed: {0}")]
    Transport(String),
    #[error("place search response was malformed: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for CandidateSourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CandidateSourceError::InvalidResponse(err.to_string())
        } else {
            CandidateSourceError::Transport(err.to_string())
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location signal unavailable")]
    SignalUnavailable,
    #[error("timed out waiting for a location fix")]
    TimedOut,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("no location found for '{0}'")]
    NotFound(String),
    #[error("could not parse '{0}' as a coordinate")]
    Unparseable(String),
}

/// Failures that stop the planning flow before or around evaluation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("origin unavailable: {0}")]
    OriginUnavailable(#[from] LocationError),
    #[error("destination unresolved: {0}")]
    DestinationUnresolved(#[from] AddressError),
    #[error("no destination entered")]
    EmptyDestination,
    #[error("arrival deadline {deadline} must be after departure {departure}")]
    InvalidWindow {
        departure: DateTime<Utc>,
        deadline: DateTime<Utc>,
    },
    #[error("direct route failed: {0}")]
    DirectRouteFailed(LegFailure),
}
