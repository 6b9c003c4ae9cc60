//! # Event solver
//!
//! Root finding on time-dependent observables. Two strategies are provided:
//!
//! * [`newton::newton_refine`]: Newton iteration with a symmetric finite-difference derivative,
//!   for smooth observables known to vanish near a seed (lunar elongation).
//! * [`secant::find_threshold_crossing`]: a coarse scan over a day ([`scan`]) followed by secant
//!   refinement, for observables that must reach a moving threshold (horizon crossings).
//!
//! Observables are plain closures `FnMut(Instant) -> Result<_, AlmanacError>`: a provider failure
//! inside an evaluation aborts the search and is propagated unchanged.
//!
//! Each solve walks the state machine
//! `Searching → Bracketed → Refining → {Converged | MaxIterExceeded | NoCrossing}`
//! described by [`SolverState`]. Non-convergence is reported through
//! [`EventResult::converged`], the absence of an event through [`SearchOutcome::NoEvent`];
//! neither is an error.

use serde::Serialize;

use crate::time::Instant;

pub mod newton;
pub mod scan;
pub mod secant;

/// Outcome of a refinement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventResult {
    /// Best estimate of the event instant, on the scale of the seed.
    pub instant: Instant,
    /// Observable value (minus target, for threshold searches) at `instant`.
    pub residual: f64,
    pub iterations: usize,
    /// `false` when the iteration cap was reached first; `instant` is then the last estimate.
    pub converged: bool,
}

/// Result of a search that may legitimately find nothing (e.g. no moonrise on a given day).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SearchOutcome {
    Found(EventResult),
    NoEvent,
}

impl SearchOutcome {
    pub fn event(&self) -> Option<&EventResult> {
        match self {
            SearchOutcome::Found(event) => Some(event),
            SearchOutcome::NoEvent => None,
        }
    }

    pub fn is_no_event(&self) -> bool {
        matches!(self, SearchOutcome::NoEvent)
    }

    /// Terminal solver state this outcome corresponds to.
    pub fn state(&self) -> SolverState {
        match self {
            SearchOutcome::Found(event) if event.converged => SolverState::Converged,
            SearchOutcome::Found(_) => SolverState::MaxIterExceeded,
            SearchOutcome::NoEvent => SolverState::NoCrossing,
        }
    }
}

impl From<EventResult> for SearchOutcome {
    fn from(event: EventResult) -> Self {
        SearchOutcome::Found(event)
    }
}

/// Progress of a single solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SolverState {
    /// Looking for a seed or a bracketing interval.
    Searching,
    /// A seed or a bracket is available.
    Bracketed,
    /// Iterating.
    Refining,
    Converged,
    MaxIterExceeded,
    /// The scan found no acceptable crossing.
    NoCrossing,
}

impl SolverState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SolverState::Converged | SolverState::MaxIterExceeded | SolverState::NoCrossing
        )
    }

    /// Whether `next` may follow `self`. There is no transition out of a terminal state,
    /// and none back towards `Searching`.
    pub fn can_transition_to(&self, next: SolverState) -> bool {
        use SolverState::*;
        matches!(
            (self, next),
            (Searching, Bracketed)
                | (Searching, NoCrossing)
                | (Bracketed, Refining)
                | (Refining, Refining)
                | (Refining, Converged)
                | (Refining, MaxIterExceeded)
        )
    }

    /// Move to `next`, checking the transition in debug builds.
    pub(crate) fn advance(self, next: SolverState) -> SolverState {
        debug_assert!(
            self.can_transition_to(next),
            "invalid solver transition {self:?} -> {next:?}"
        );
        next
    }
}
