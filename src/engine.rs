//! Detour evaluation engine.
//!
//! Given N candidate waypoints, resolves origin→waypoint and
//! waypoint→destination for every candidate at the same time on a worker
//! pool, merges each pair as soon as its second leg lands, and hands the
//! enriched list (input order, same length) to a completion callback exactly
//! once after the last candidate settles.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::candidate::{
    Candidate, DetourResult, EvaluatedCandidate, Leg, LegFailureReport, LegOutcome,
};
use crate::error::LegFailure;
use crate::traits::{Coordinate, LegResolver};

/// Inputs for one evaluation.
#[derive(Debug, Clone)]
pub struct DetourRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub candidates: Vec<Candidate>,
    pub departure: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    /// Minutes spent at the waypoint itself.
    pub stop_overhead_minutes: u32,
}

/// Shared flag that stops legs which have not started yet.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Abort controls for an evaluation.
///
/// A leg that starts after cancellation or after `deadline` settles as a
/// failure without touching the resolver. Legs already in flight run to
/// completion (bounded by the resolver's own timeout).
#[derive(Debug, Clone, Default)]
pub struct EvaluationOptions {
    pub cancel: Option<CancelToken>,
    pub deadline: Option<Instant>,
}

impl EvaluationOptions {
    fn admit(&self) -> Result<(), LegFailure> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(LegFailure::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(LegFailure::DeadlineExceeded);
        }
        Ok(())
    }
}

/// Concurrent two-leg evaluator over a dedicated worker pool.
pub struct DetourEngine<R> {
    resolver: R,
    pool: ThreadPool,
}

impl<R: LegResolver> DetourEngine<R> {
    pub fn new(resolver: R, worker_threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_threads.max(1))
            .thread_name(|index| format!("detour-leg-{index}"))
            .build()?;

        Ok(Self { resolver, pool })
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolves a single leg on the pool, honouring `options`.
    pub fn resolve_direct(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        options: &EvaluationOptions,
    ) -> LegOutcome {
        self.pool.install(|| -> LegOutcome {
            options.admit()?;
            self.resolver.resolve_leg(origin, destination)
        })
    }

    pub fn evaluate(&self, request: DetourRequest) -> Vec<EvaluatedCandidate> {
        self.evaluate_with_options(request, &EvaluationOptions::default())
    }

    pub fn evaluate_with_options(
        &self,
        request: DetourRequest,
        options: &EvaluationOptions,
    ) -> Vec<EvaluatedCandidate> {
        let mut output = Vec::new();
        self.evaluate_with(request, options, |results| output = results);
        output
    }

    /// Evaluates every candidate and calls `on_complete` exactly once.
    ///
    /// Blocks until all legs have settled. The callback runs on the worker
    /// that settled the last candidate, or on the calling thread when there
    /// are no candidates.
    pub fn evaluate_with<F>(
        &self,
        request: DetourRequest,
        options: &EvaluationOptions,
        on_complete: F,
    ) where
        F: FnOnce(Vec<EvaluatedCandidate>) + Send,
    {
        if request.candidates.is_empty() {
            debug!("no candidates, skipping detour evaluation");
            on_complete(Vec::new());
            return;
        }

        let origin = request.origin;
        let destination = request.destination;
        let positions: Vec<Coordinate> = request
            .candidates
            .iter()
            .map(|candidate| candidate.position)
            .collect();
        let batch = EvaluationBatch::new(request, &self.resolver, options, on_complete);

        debug!(candidates = positions.len(), "starting detour evaluation");

        self.pool.scope(|scope| {
            let batch = &batch;
            for (index, position) in positions.into_iter().enumerate() {
                scope.spawn(move |_| batch.run_leg(index, Leg::Outbound, origin, position));
                scope.spawn(move |_| batch.run_leg(index, Leg::Inbound, position, destination));
            }
        });
    }
}

/// Per-invocation state: one slot per candidate plus the settlement counter.
struct EvaluationBatch<'a, R, F> {
    resolver: &'a R,
    options: &'a EvaluationOptions,
    departure: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
    stop_overhead_minutes: u32,
    slots: Vec<Mutex<CandidateSlot>>,
    settled: AtomicUsize,
    on_complete: Mutex<Option<F>>,
}

struct CandidateSlot {
    candidate: Option<Candidate>,
    outbound: Option<LegOutcome>,
    inbound: Option<LegOutcome>,
    evaluated: Option<EvaluatedCandidate>,
}

impl CandidateSlot {
    fn new(candidate: Candidate) -> Self {
        Self {
            candidate: Some(candidate),
            outbound: None,
            inbound: None,
            evaluated: None,
        }
    }

    fn leg_mut(&mut self, leg: Leg) -> &mut Option<LegOutcome> {
        match leg {
            Leg::Outbound => &mut self.outbound,
            Leg::Inbound => &mut self.inbound,
        }
    }
}

impl<'a, R, F> EvaluationBatch<'a, R, F>
where
    R: LegResolver,
    F: FnOnce(Vec<EvaluatedCandidate>) + Send,
{
    fn new(
        request: DetourRequest,
        resolver: &'a R,
        options: &'a EvaluationOptions,
        on_complete: F,
    ) -> Self {
        Self {
            resolver,
            options,
            departure: request.departure,
            deadline: request.deadline,
            stop_overhead_minutes: request.stop_overhead_minutes,
            slots: request
                .candidates
                .into_iter()
                .map(|candidate| Mutex::new(CandidateSlot::new(candidate)))
                .collect(),
            settled: AtomicUsize::new(0),
            on_complete: Mutex::new(Some(on_complete)),
        }
    }

    fn run_leg(&self, index: usize, leg: Leg, from: Coordinate, to: Coordinate) {
        let outcome = self
            .options
            .admit()
            .and_then(|()| self.resolver.resolve_leg(from, to));

        match &outcome {
            Ok(minutes) => debug!(index, ?leg, minutes, "leg resolved"),
            Err(failure) => debug!(index, ?leg, %failure, "leg failed"),
        }

        self.record(index, leg, outcome);
    }

    fn record(&self, index: usize, leg: Leg, outcome: LegOutcome) {
        let settled_now = {
            let mut slot = lock(&self.slots[index]);
            let entry = slot.leg_mut(leg);
            if entry.is_some() {
                warn!(index, ?leg, "leg reported twice, keeping the first outcome");
                return;
            }
            *entry = Some(outcome);
            self.try_settle(&mut slot)
        };

        if settled_now {
            let settled = self.settled.fetch_add(1, Ordering::AcqRel) + 1;
            if settled == self.slots.len() {
                self.complete();
            }
        }
    }

    /// Merges both legs once they are present. Returns true on the merge.
    fn try_settle(&self, slot: &mut CandidateSlot) -> bool {
        let (Some(outbound), Some(inbound)) = (&slot.outbound, &slot.inbound) else {
            return false;
        };
        let Some(candidate) = slot.candidate.take() else {
            return false;
        };

        let (detour, failure) = match (outbound, inbound) {
            (Ok(outbound), Ok(inbound)) => match DetourResult::resolved(
                *outbound,
                *inbound,
                self.stop_overhead_minutes,
                self.departure,
                self.deadline,
            ) {
                Ok(detour) => (detour, None),
                // Blame the longer leg for a total that does not fit.
                Err(failure) => (
                    DetourResult::unresolved(),
                    Some(LegFailureReport {
                        leg: if outbound >= inbound {
                            Leg::Outbound
                        } else {
                            Leg::Inbound
                        },
                        failure,
                    }),
                ),
            },
            (Err(failure), _) => (
                DetourResult::unresolved(),
                Some(LegFailureReport {
                    leg: Leg::Outbound,
                    failure: failure.clone(),
                }),
            ),
            (_, Err(failure)) => (
                DetourResult::unresolved(),
                Some(LegFailureReport {
                    leg: Leg::Inbound,
                    failure: failure.clone(),
                }),
            ),
        };

        if let Some(report) = &failure {
            warn!(
                candidate = %candidate.name,
                leg = ?report.leg,
                failure = %report.failure,
                "detour unresolved"
            );
        }

        slot.evaluated = Some(EvaluatedCandidate {
            candidate,
            detour,
            failure,
        });
        true
    }

    fn complete(&self) {
        let Some(on_complete) = lock(&self.on_complete).take() else {
            return;
        };

        let results: Vec<EvaluatedCandidate> = self
            .slots
            .iter()
            .filter_map(|slot| lock(slot).evaluated.take())
            .collect();
        debug_assert_eq!(results.len(), self.slots.len());

        let resolved = results
            .iter()
            .filter(|evaluated| evaluated.detour.is_resolved())
            .count();
        info!(candidates = results.len(), resolved, "detour evaluation complete");

        on_complete(results);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
