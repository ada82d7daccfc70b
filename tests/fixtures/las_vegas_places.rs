//! Real Las Vegas places for commute scenarios.
//!
//! Coordinates sourced from OpenStreetMap via Overpass API; routable with
//! OSRM Nevada data.

use detour_planner::candidate::Candidate;
use detour_planner::traits::Coordinate;

/// A named place with coordinates.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn candidate(&self) -> Candidate {
        Candidate::new(self.name, self.coordinate())
    }
}

/// Home: south Strip.
pub const HOME: Place = Place::new("MGM Grand", 36.1023654, -115.1688720);

/// Work: downtown.
pub const WORK: Place = Place::new("Fremont Street", 36.1707, -115.1440);

pub const CAFES: &[Place] = &[
    Place::new("Earl of Sandwich Planet Hollywood", 36.1093912, -115.1720087),
    Place::new("Hash House A Go Go", 36.1181377, -115.1710989),
    Place::new("Flour & Barley", 36.1173688, -115.1702674),
    Place::new("Public House", 36.1219193, -115.1689317),
];

pub fn cafe_candidates() -> Vec<Candidate> {
    CAFES.iter().map(Place::candidate).collect()
}
