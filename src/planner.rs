//! End-to-end trip planning: inputs → direct leg → candidates → detours → verdicts.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::candidate::EvaluatedCandidate;
use crate::config::PlannerConfig;
use crate::engine::{CancelToken, DetourEngine, DetourRequest, EvaluationOptions};
use crate::error::PlanError;
use crate::navigation::{NavigationPlan, NavigationStop, TransportMode};
use crate::summary::{minutes_between, TripSummary};
use crate::traits::{
    AddressResolver, CandidateSource, Coordinate, LegResolver, LocationProvider,
    NavigationHandoff,
};

#[derive(Debug, Clone)]
pub struct TripRequest {
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    /// Passed through to the navigation hand-off.
    pub mode: TransportMode,
}

#[derive(Debug, Clone)]
pub struct TripPlan {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub departure: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub options: Vec<EvaluatedCandidate>,
    pub summary: TripSummary,
    pub mode: TransportMode,
}

impl TripPlan {
    /// Stops for the chosen option; `None` picks the direct route.
    ///
    /// Returns `None` when `choice` is out of range.
    pub fn navigation_plan(&self, choice: Option<usize>) -> Option<NavigationPlan> {
        match choice {
            None => Some(NavigationPlan::direct(self.origin, self.destination, self.mode)),
            Some(index) => {
                let chosen = &self.options.get(index)?.candidate;
                let waypoint = NavigationStop {
                    label: chosen.name.clone(),
                    position: chosen.position,
                };
                Some(NavigationPlan::via(self.origin, waypoint, self.destination, self.mode))
            }
        }
    }

    pub fn commit(&self, choice: Option<usize>, handoff: &impl NavigationHandoff) -> bool {
        match self.navigation_plan(choice) {
            Some(plan) => {
                handoff.hand_off(&plan);
                true
            }
            None => false,
        }
    }
}

pub struct TripPlanner<R, S, L, A> {
    engine: DetourEngine<R>,
    candidates: S,
    location: L,
    addresses: A,
    config: PlannerConfig,
}

impl<R, S, L, A> TripPlanner<R, S, L, A>
where
    R: LegResolver,
    S: CandidateSource,
    L: LocationProvider,
    A: AddressResolver,
{
    pub fn new(
        engine: DetourEngine<R>,
        candidates: S,
        location: L,
        addresses: A,
        config: PlannerConfig,
    ) -> Self {
        Self {
            engine,
            candidates,
            location,
            addresses,
            config,
        }
    }

    pub fn engine(&self) -> &DetourEngine<R> {
        &self.engine
    }

    pub fn plan(&self, request: &TripRequest) -> Result<TripPlan, PlanError> {
        self.plan_with(request, None)
    }

    pub fn plan_with(
        &self,
        request: &TripRequest,
        cancel: Option<CancelToken>,
    ) -> Result<TripPlan, PlanError> {
        if request.destination.trim().is_empty() {
            return Err(PlanError::EmptyDestination);
        }
        if request.deadline <= request.departure {
            return Err(PlanError::InvalidWindow {
                departure: request.departure,
                deadline: request.deadline,
            });
        }
        let minutes_available = minutes_between(request.departure, request.deadline);
        let minutes_available = u32::try_from(minutes_available).unwrap_or(u32::MAX);

        let origin = self.location.current_location()?.coordinate;
        let destination = self.addresses.resolve_address(&request.destination)?;
        info!(%origin, %destination, minutes_available, "planning trip");

        let options = EvaluationOptions {
            cancel,
            deadline: self
                .config
                .evaluation_timeout_secs
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        };

        let direct_minutes = self
            .engine
            .resolve_direct(origin, destination, &options)
            .map_err(PlanError::DirectRouteFailed)?;
        info!(direct_minutes, "direct route resolved");

        let candidates = match self
            .candidates
            .candidates_near(origin, self.config.max_candidates)
        {
            Ok(mut candidates) => {
                candidates.truncate(self.config.max_candidates);
                candidates
            }
            Err(err) => {
                warn!(%err, "candidate search failed, continuing without detours");
                Vec::new()
            }
        };

        let evaluated = self.engine.evaluate_with_options(
            DetourRequest {
                origin,
                destination,
                candidates,
                departure: request.departure,
                deadline: Some(request.deadline),
                stop_overhead_minutes: self.config.coffee_stop_minutes,
            },
            &options,
        );

        let summary = TripSummary::new(
            request.departure,
            request.deadline,
            direct_minutes,
            minutes_available,
            &evaluated,
        );

        Ok(TripPlan {
            origin,
            destination,
            departure: request.departure,
            deadline: request.deadline,
            options: evaluated,
            summary,
            mode: request.mode,
        })
    }
}
