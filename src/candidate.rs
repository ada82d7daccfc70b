//! Waypoint candidates and the detour data attached to them.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::LegFailure;
use crate::traits::Coordinate;

/// A named waypoint that might be visited on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub position: Coordinate,
}

impl Candidate {
    pub fn new(name: impl Into<String>, position: Coordinate) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Outcome of one leg resolution, in whole minutes.
pub type LegOutcome = Result<u32, LegFailure>;

/// The two legs of a detour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    /// Origin to waypoint.
    Outbound,
    /// Waypoint to destination.
    Inbound,
}

/// Detour figures for one candidate.
///
/// Either every field derived from the legs is present or none is;
/// `is_on_time` additionally needs a deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DetourResult {
    pub total_detour_minutes: Option<u32>,
    pub projected_arrival: Option<DateTime<Utc>>,
    pub is_on_time: Option<bool>,
}

impl DetourResult {
    /// Result for a candidate with at least one failed leg.
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// Combines two resolved legs with the stop overhead.
    ///
    /// Fails when the total does not fit in `u32` minutes or the arrival
    /// falls outside the representable time range.
    pub fn resolved(
        outbound_minutes: u32,
        inbound_minutes: u32,
        stop_overhead_minutes: u32,
        departure: DateTime<Utc>,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Self, LegFailure> {
        let total = outbound_minutes
            .checked_add(inbound_minutes)
            .and_then(|minutes| minutes.checked_add(stop_overhead_minutes))
            .ok_or_else(|| {
                LegFailure::InvalidResponse(format!(
                    "detour of {outbound_minutes} + {inbound_minutes} + {stop_overhead_minutes} minutes overflows"
                ))
            })?;
        let arrival = departure
            .checked_add_signed(Duration::minutes(i64::from(total)))
            .ok_or_else(|| {
                LegFailure::InvalidResponse(format!("arrival {total} minutes out is out of range"))
            })?;

        Ok(Self {
            total_detour_minutes: Some(total),
            projected_arrival: Some(arrival),
            is_on_time: deadline.map(|deadline| arrival <= deadline),
        })
    }

    pub fn is_resolved(&self) -> bool {
        self.total_detour_minutes.is_some()
    }
}

/// Which leg failed first for an unresolved candidate, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegFailureReport {
    pub leg: Leg,
    pub failure: LegFailure,
}

/// A candidate paired with its evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedCandidate {
    pub candidate: Candidate,
    pub detour: DetourResult,
    /// Diagnostic only; not part of the detour figures.
    #[serde(skip)]
    pub failure: Option<LegFailureReport>,
}
