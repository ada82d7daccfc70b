//! detour-planner
//!
//! Plans a commute with an optional coffee stop: checks whether the direct
//! trip is on time and, for each nearby waypoint, whether stopping there
//! still makes the deadline.

pub mod traits;
pub mod candidate;
pub mod error;
pub mod engine;
pub mod summary;
pub mod planner;
pub mod navigation;
pub mod config;
pub mod osrm;
pub mod overpass;
pub mod haversine;
pub mod fixed;
