//! Core seams for the commute planner.
//!
//! Everything that touches the outside world (routing, place search, GPS,
//! geocoding, turn-by-turn navigation) sits behind one of these traits so the
//! evaluation engine stays free of I/O concerns.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::error::{AddressError, CandidateSourceError, LegFailure, LocationError};
use crate::navigation::NavigationPlan;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Stable text key, six decimals (~10 cm).
    pub fn key(&self) -> String {
        format!("{:.6},{:.6}", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Resolves the travel time of a single leg.
///
/// Implementations are called from many worker threads at once, with no
/// ordering between calls. Durations are whole minutes, rounded up.
pub trait LegResolver: Sync {
    fn resolve_leg(&self, from: Coordinate, to: Coordinate) -> Result<u32, LegFailure>;
}

impl<T: LegResolver + ?Sized> LegResolver for &T {
    fn resolve_leg(&self, from: Coordinate, to: Coordinate) -> Result<u32, LegFailure> {
        (**self).resolve_leg(from, to)
    }
}

/// Supplies up to `max_results` named waypoints near a coordinate.
pub trait CandidateSource {
    fn candidates_near(
        &self,
        center: Coordinate,
        max_results: usize,
    ) -> Result<Vec<Candidate>, CandidateSourceError>;
}

impl<T: CandidateSource + ?Sized> CandidateSource for Box<T> {
    fn candidates_near(
        &self,
        center: Coordinate,
        max_results: usize,
    ) -> Result<Vec<Candidate>, CandidateSourceError> {
        (**self).candidates_near(center, max_results)
    }
}

/// A single position fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
}

/// Provides the traveller's current position.
pub trait LocationProvider {
    fn current_location(&self) -> Result<LocationFix, LocationError>;
}

/// Turns free text into exactly one destination coordinate.
pub trait AddressResolver {
    fn resolve_address(&self, text: &str) -> Result<Coordinate, AddressError>;
}

/// Receives the committed route once the traveller picks an option.
pub trait NavigationHandoff {
    fn hand_off(&self, plan: &NavigationPlan);
}
