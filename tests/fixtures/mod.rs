//! Test fixtures for detour-planner.
//!
//! Provides:
//! - Real Las Vegas places for realistic scenarios
//! - Scripted and randomized-latency leg resolvers
//! - Recording stand-ins for the external collaborators

#![allow(dead_code)]

pub mod las_vegas_places;

pub use las_vegas_places::*;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use detour_planner::candidate::Candidate;
use detour_planner::error::{CandidateSourceError, LegFailure};
use detour_planner::navigation::NavigationPlan;
use detour_planner::traits::{CandidateSource, Coordinate, LegResolver, NavigationHandoff};

/// Timestamp on a fixed test day.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}

/// Resolver answering from a table keyed by (from, to).
///
/// Unknown legs fail with `NoRoute`. Every call is counted.
#[derive(Default)]
pub struct ScriptedResolver {
    legs: HashMap<(String, String), (Result<u32, LegFailure>, Duration)>,
    calls: AtomicUsize,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leg(self, from: Coordinate, to: Coordinate, minutes: u32) -> Self {
        self.leg_after(from, to, Ok(minutes), Duration::ZERO)
    }

    pub fn failing_leg(self, from: Coordinate, to: Coordinate, failure: LegFailure) -> Self {
        self.leg_after(from, to, Err(failure), Duration::ZERO)
    }

    pub fn leg_after(
        mut self,
        from: Coordinate,
        to: Coordinate,
        outcome: Result<u32, LegFailure>,
        latency: Duration,
    ) -> Self {
        self.legs.insert((from.key(), to.key()), (outcome, latency));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LegResolver for ScriptedResolver {
    fn resolve_leg(&self, from: Coordinate, to: Coordinate) -> Result<u32, LegFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.legs.get(&(from.key(), to.key())) {
            Some((outcome, latency)) => {
                if !latency.is_zero() {
                    thread::sleep(*latency);
                }
                outcome.clone()
            }
            None => Err(LegFailure::NoRoute),
        }
    }
}

/// Deterministic durations with random per-call latency and failures.
///
/// The duration of a leg depends only on its endpoints, so results are
/// reproducible while completion order is not.
pub struct JitteryResolver {
    rng: Mutex<StdRng>,
    max_latency_ms: u64,
    calls: AtomicUsize,
}

impl JitteryResolver {
    pub fn new(seed: u64, max_latency_ms: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            max_latency_ms,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Expected minutes for a leg; `None` for legs that always fail.
    pub fn minutes_for(from: Coordinate, to: Coordinate) -> Option<u32> {
        let seed = (from.lat * 1000.0 + from.lng * 10.0 + to.lat * 100.0 + to.lng).abs() as u32;
        (seed % 7 != 0).then_some(seed % 45)
    }
}

impl LegResolver for JitteryResolver {
    fn resolve_leg(&self, from: Coordinate, to: Coordinate) -> Result<u32, LegFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.rng.lock().unwrap().random_range(0..=self.max_latency_ms);
        thread::sleep(Duration::from_millis(latency));
        Self::minutes_for(from, to).ok_or_else(|| LegFailure::Transport("connection reset".into()))
    }
}

/// Candidate grid with distinct, integral positions.
pub fn grid_candidates(count: usize) -> Vec<Candidate> {
    (0..count)
        .map(|i| {
            Candidate::new(
                format!("Cafe {i}"),
                Coordinate::new((i % 17) as f64, (i / 17) as f64 + 1.0),
            )
        })
        .collect()
}

pub struct FailingSource;

impl CandidateSource for FailingSource {
    fn candidates_near(
        &self,
        _center: Coordinate,
        _max_results: usize,
    ) -> Result<Vec<Candidate>, CandidateSourceError> {
        Err(CandidateSourceError::Transport("search offline".into()))
    }
}

#[derive(Default)]
pub struct RecordingHandoff {
    pub plans: Mutex<Vec<NavigationPlan>>,
}

impl NavigationHandoff for RecordingHandoff {
    fn hand_off(&self, plan: &NavigationPlan) {
        self.plans.lock().unwrap().push(plan.clone());
    }
}
