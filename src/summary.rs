//! On-time verdicts for the direct trip and each detour option.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::candidate::EvaluatedCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalStatus {
    OnTime,
    Late,
    /// No detour figures, or no deadline to compare against.
    Unknown,
}

impl From<Option<bool>> for ArrivalStatus {
    fn from(is_on_time: Option<bool>) -> Self {
        match is_on_time {
            Some(true) => ArrivalStatus::OnTime,
            Some(false) => ArrivalStatus::Late,
            None => ArrivalStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateVerdict {
    pub name: String,
    pub detour_minutes: Option<u32>,
    pub arrival: Option<DateTime<Utc>>,
    pub status: ArrivalStatus,
}

impl CandidateVerdict {
    /// First display line: name, plus detour minutes when known.
    pub fn headline(&self) -> String {
        match self.detour_minutes {
            Some(minutes) => format!("{} (+{} min)", self.name, minutes),
            None => self.name.clone(),
        }
    }

    /// Second display line; empty for unresolved candidates.
    pub fn detail(&self) -> String {
        let mut detail = String::new();
        if let Some(arrival) = self.arrival {
            detail.push_str(&format!("ETA: {}", arrival.format("%H:%M")));
        }
        match self.status {
            ArrivalStatus::OnTime => detail.push_str(" * ON TIME"),
            ArrivalStatus::Late => detail.push_str(" * LATE"),
            ArrivalStatus::Unknown => {}
        }
        detail
    }
}

impl fmt::Display for CandidateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.detail();
        if detail.is_empty() {
            write!(f, "{}", self.headline())
        } else {
            write!(f, "{}\n    {}", self.headline(), detail)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub direct_minutes: u32,
    pub minutes_available: u32,
    pub deadline: DateTime<Utc>,
    pub direct_arrival: DateTime<Utc>,
    pub direct_on_time: bool,
    pub options: Vec<CandidateVerdict>,
}

impl TripSummary {
    pub fn new(
        departure: DateTime<Utc>,
        deadline: DateTime<Utc>,
        direct_minutes: u32,
        minutes_available: u32,
        evaluated: &[EvaluatedCandidate],
    ) -> Self {
        let options = evaluated
            .iter()
            .map(|evaluated| CandidateVerdict {
                name: evaluated.candidate.name.clone(),
                detour_minutes: evaluated.detour.total_detour_minutes,
                arrival: evaluated.detour.projected_arrival,
                status: evaluated.detour.is_on_time.into(),
            })
            .collect();

        Self {
            direct_minutes,
            minutes_available,
            deadline,
            direct_arrival: departure + Duration::minutes(i64::from(direct_minutes)),
            direct_on_time: direct_minutes <= minutes_available,
            options,
        }
    }

    pub fn direct_status(&self) -> &'static str {
        if self.direct_on_time {
            "ON TIME"
        } else {
            "LATE!"
        }
    }

    /// Options that still arrive by the deadline.
    pub fn on_time_options(&self) -> impl Iterator<Item = &CandidateVerdict> {
        self.options
            .iter()
            .filter(|verdict| verdict.status == ArrivalStatus::OnTime)
    }
}

/// Whole minutes between two instants, rounded up.
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds();
    seconds.div_euclid(60) + i64::from(seconds.rem_euclid(60) > 0)
}
