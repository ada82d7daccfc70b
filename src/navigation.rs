//! Committed route handed to a turn-by-turn navigation app.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::traits::Coordinate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim().to_ascii_lowercase().as_str() {
            "driving" | "drive" | "car" => Ok(Self::Driving),
            "walking" | "walk" | "foot" => Ok(Self::Walking),
            "cycling" | "cycle" | "bike" => Ok(Self::Cycling),
            other => Err(format!("unknown transport mode '{other}'")),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationStop {
    pub label: String,
    pub position: Coordinate,
}

/// Ordered stops: origin, optional waypoint, destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationPlan {
    stops: Vec<NavigationStop>,
    pub mode: TransportMode,
}

impl NavigationPlan {
    pub fn direct(origin: Coordinate, destination: Coordinate, mode: TransportMode) -> Self {
        Self {
            stops: vec![
                NavigationStop {
                    label: "Start".to_string(),
                    position: origin,
                },
                NavigationStop {
                    label: "Destination".to_string(),
                    position: destination,
                },
            ],
            mode,
        }
    }

    pub fn via(
        origin: Coordinate,
        waypoint: NavigationStop,
        destination: Coordinate,
        mode: TransportMode,
    ) -> Self {
        let mut plan = Self::direct(origin, destination, mode);
        plan.stops.insert(1, waypoint);
        plan
    }

    pub fn stops(&self) -> &[NavigationStop] {
        &self.stops
    }

    pub fn waypoint(&self) -> Option<&NavigationStop> {
        (self.stops.len() == 3).then(|| &self.stops[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_via_inserts_waypoint_between_endpoints() {
        let plan = NavigationPlan::via(
            Coordinate::new(0.0, 0.0),
            NavigationStop {
                label: "Blue Door".to_string(),
                position: Coordinate::new(5.0, 0.0),
            },
            Coordinate::new(10.0, 0.0),
            TransportMode::Driving,
        );

        let labels: Vec<_> = plan.stops().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Start", "Blue Door", "Destination"]);
        assert_eq!(plan.waypoint().map(|s| s.position), Some(Coordinate::new(5.0, 0.0)));
    }

    #[test]
    fn test_direct_has_no_waypoint() {
        let plan = NavigationPlan::direct(
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
            TransportMode::default(),
        );
        assert_eq!(plan.stops().len(), 2);
        assert!(plan.waypoint().is_none());
        assert_eq!(plan.mode, TransportMode::Driving);
    }

    #[test]
    fn test_mode_parses_common_names() {
        assert_eq!("walk".parse::<TransportMode>(), Ok(TransportMode::Walking));
        assert_eq!(" Cycling ".parse::<TransportMode>(), Ok(TransportMode::Cycling));
        assert_eq!("car".parse::<TransportMode>(), Ok(TransportMode::Driving));
        assert!("teleport".parse::<TransportMode>().is_err());
        assert_eq!(TransportMode::Walking.to_string(), "walking");
    }
}
