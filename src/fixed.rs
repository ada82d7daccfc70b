//! In-process stand-ins for GPS, geocoding and place search.
//!
//! Used by the command-line tool, where positions arrive as text.

use chrono::Utc;

use crate::candidate::Candidate;
use crate::error::{AddressError, CandidateSourceError, LocationError};
use crate::traits::{
    AddressResolver, CandidateSource, Coordinate, LocationFix, LocationProvider,
};

/// A location provider that always reports the same position.
#[derive(Debug, Clone)]
pub struct FixedLocation(pub Option<Coordinate>);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> Result<LocationFix, LocationError> {
        let coordinate = self.0.ok_or(LocationError::SignalUnavailable)?;
        Ok(LocationFix {
            coordinate,
            timestamp: Utc::now(),
        })
    }
}

/// Resolves addresses written as `lat,lng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateText;

impl AddressResolver for CoordinateText {
    fn resolve_address(&self, text: &str) -> Result<Coordinate, AddressError> {
        parse_coordinate(text).ok_or_else(|| AddressError::Unparseable(text.trim().to_string()))
    }
}

/// A fixed candidate list, ignoring the search center.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidates(pub Vec<Candidate>);

impl CandidateSource for StaticCandidates {
    fn candidates_near(
        &self,
        _center: Coordinate,
        max_results: usize,
    ) -> Result<Vec<Candidate>, CandidateSourceError> {
        Ok(self.0.iter().take(max_results).cloned().collect())
    }
}

/// Parses `lat,lng` in decimal degrees, rejecting out-of-range values.
pub fn parse_coordinate(text: &str) -> Option<Coordinate> {
    let (lat, lng) = text.trim().split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng))
        .then(|| Coordinate::new(lat, lng))
}

/// Parses `name@lat,lng`. The name must not be blank.
pub fn parse_candidate(text: &str) -> Option<Candidate> {
    let (name, position) = text.rsplit_once('@')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(Candidate::new(name, parse_coordinate(position)?))
}
