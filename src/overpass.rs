//! Overpass API adapter for finding cafés near a coordinate.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::debug;

use crate::candidate::Candidate;
use crate::config::OverpassConfig;
use crate::error::CandidateSourceError;
use crate::traits::{CandidateSource, Coordinate};

const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

#[derive(Debug, Clone)]
pub struct OverpassClient {
    config: OverpassConfig,
    /// Side length of the square search region, in meters.
    region_side_m: f64,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig, region_side_m: f64) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            region_side_m,
            client,
        })
    }

    fn query(&self, center: Coordinate) -> String {
        let bbox = BoundingBox::around(center, self.region_side_m);
        format!(
            "[out:json][timeout:{}];node[\"amenity\"=\"cafe\"]({:.6},{:.6},{:.6},{:.6});out body;",
            self.config.timeout_secs, bbox.south, bbox.west, bbox.north, bbox.east
        )
    }
}

impl CandidateSource for OverpassClient {
    fn candidates_near(
        &self,
        center: Coordinate,
        max_results: usize,
    ) -> Result<Vec<Candidate>, CandidateSourceError> {
        let query = self.query(center);
        debug!(%query, "querying Overpass");

        let response = self
            .client
            .post(&self.config.base_url)
            .form(&[("data", query)])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OverpassResponse>())?;

        Ok(response.into_candidates(max_results))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BoundingBox {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl BoundingBox {
    fn around(center: Coordinate, side_m: f64) -> Self {
        let half = side_m / 2.0;
        let dlat = half / METERS_PER_DEGREE_LAT;
        let dlng = half / (METERS_PER_DEGREE_LAT * center.lat.to_radians().cos().max(1e-6));
        Self {
            south: center.lat - dlat,
            west: center.lng - dlng,
            north: center.lat + dlat,
            east: center.lng + dlng,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl OverpassResponse {
    /// Named, deduplicated, first `max_results` entries in response order.
    fn into_candidates(self, max_results: usize) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        self.elements
            .into_iter()
            .filter_map(|element| {
                let name = element.tags.get("name")?.trim().to_string();
                if name.is_empty() {
                    return None;
                }
                let position = Coordinate::new(element.lat?, element.lon?);
                Some(Candidate::new(name, position))
            })
            .filter(|candidate| seen.insert((candidate.name.clone(), candidate.position.key())))
            .take(max_results)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "elements": [
            {"type":"node","id":1,"lat":36.1000,"lon":-115.1000,"tags":{"amenity":"cafe","name":"Blue Door"}},
            {"type":"node","id":2,"lat":36.1010,"lon":-115.1010,"tags":{"amenity":"cafe"}},
            {"type":"node","id":3,"lat":36.1000,"lon":-115.1000,"tags":{"amenity":"cafe","name":"Blue Door"}},
            {"type":"node","id":4,"lat":36.1020,"lon":-115.1020,"tags":{"amenity":"cafe","name":"  "}},
            {"type":"node","id":5,"lat":36.1030,"lon":-115.1030,"tags":{"amenity":"cafe","name":"Slow Drip"}},
            {"type":"node","id":6,"lat":36.1040,"lon":-115.1040,"tags":{"amenity":"cafe","name":"Bean There"}}
        ]
    }"#;

    fn response() -> OverpassResponse {
        serde_json::from_str(BODY).unwrap()
    }

    #[test]
    fn test_drops_unnamed_and_duplicates() {
        let names: Vec<_> = response()
            .into_candidates(10)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Blue Door", "Slow Drip", "Bean There"]);
    }

    #[test]
    fn test_truncates_to_max_results() {
        let candidates = response().into_candidates(2);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].name, "Slow Drip");
    }

    #[test]
    fn test_empty_response_is_valid() {
        let response: OverpassResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_candidates(5).is_empty());
    }

    #[test]
    fn test_bounding_box_is_centered() {
        let center = Coordinate::new(36.1, -115.1);
        let bbox = BoundingBox::around(center, 2000.0);
        assert!((bbox.north - center.lat - (center.lat - bbox.south)).abs() < 1e-9);
        assert!((bbox.north - bbox.south - 2000.0 / METERS_PER_DEGREE_LAT).abs() < 1e-9);
        assert!(bbox.east - bbox.west > bbox.north - bbox.south);
    }
}
