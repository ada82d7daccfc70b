//! Planner configuration: defaults, overlaid from `DETOUR_*` environment variables.

use std::env;
use std::str::FromStr;

/// Fixed time spent picking up a coffee.
pub const DEFAULT_COFFEE_STOP_MINUTES: u32 = 10;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub coffee_stop_minutes: u32,
    /// Upper bound on candidates handed to the engine.
    pub max_candidates: usize,
    /// Side length of the square search region, in meters.
    pub search_region_m: f64,
    pub worker_threads: usize,
    /// Wall-clock budget for one evaluation; legs not yet started fail after it.
    pub evaluation_timeout_secs: Option<u64>,
    pub osrm: OsrmConfig,
    pub overpass: OverpassConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            coffee_stop_minutes: DEFAULT_COFFEE_STOP_MINUTES,
            max_candidates: 5,
            search_region_m: 2000.0,
            worker_threads: 8,
            evaluation_timeout_secs: None,
            osrm: OsrmConfig::default(),
            overpass: OverpassConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// Unparseable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            coffee_stop_minutes: parse(lookup("DETOUR_COFFEE_STOP_MINUTES"))
                .unwrap_or(defaults.coffee_stop_minutes),
            max_candidates: parse(lookup("DETOUR_MAX_CANDIDATES"))
                .unwrap_or(defaults.max_candidates),
            search_region_m: parse(lookup("DETOUR_SEARCH_REGION_M"))
                .unwrap_or(defaults.search_region_m),
            worker_threads: parse(lookup("DETOUR_WORKER_THREADS"))
                .unwrap_or(defaults.worker_threads),
            evaluation_timeout_secs: parse(lookup("DETOUR_EVALUATION_TIMEOUT_SECS"))
                .or(defaults.evaluation_timeout_secs),
            osrm: OsrmConfig {
                base_url: lookup("DETOUR_OSRM_URL").unwrap_or(defaults.osrm.base_url),
                profile: lookup("DETOUR_OSRM_PROFILE").unwrap_or(defaults.osrm.profile),
                ..defaults.osrm
            },
            overpass: OverpassConfig {
                base_url: lookup("DETOUR_OVERPASS_URL").unwrap_or(defaults.overpass.base_url),
                ..defaults.overpass
            },
        }
    }
}

fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value?.trim().parse().ok()
}
