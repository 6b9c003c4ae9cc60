//! Secant refinement of threshold crossings, and the combined scan-then-refine search.

use crate::almanac_errors::AlmanacError;
use crate::config::AlmanacParams;
use crate::event_solver::scan::{bracket_crossings, Crossing, ThresholdSample};
use crate::event_solver::{EventResult, SearchOutcome, SolverState};
use crate::time::Instant;

/// Secant denominators below this are treated as a flat observable.
const FLAT_DENOMINATOR: f64 = 1e-12;

/// Refine a bracketed crossing with the secant method.
///
/// Arguments
/// ---------
/// * `sample`: threshold observable.
/// * `base`: reference midnight; the estimate is `base + t_aprox`.
/// * `t_aprox`: approximate offset [d] of the crossing, typically the end of the scan bracket.
/// * `params`: `secant_seed_offset`, `secant_tolerance` and `secant_max_iterations`.
///
/// Algorithm
/// ---------
/// Starting from `u1 = base + t_aprox` and `u0 = u1 − secant_seed_offset`:
/// ```text
/// u2 = u0 + (u1 − u0)·(target(u1) − a(u0)) / (a(u1) − a(u0))
/// ```
/// The target is re-evaluated at every `u1`, so a distance-dependent threshold follows the body.
/// Iteration stops when `|u2 − u1| < secant_tolerance` (converged), when the denominator
/// vanishes, or at the iteration cap. The observable is evaluated once more at the final
/// estimate to report the residual `value − target`.
pub fn secant_refine<F>(
    sample: &mut F,
    base: Instant,
    t_aprox: f64,
    params: &AlmanacParams,
) -> Result<EventResult, AlmanacError>
where
    F: FnMut(Instant) -> Result<ThresholdSample, AlmanacError>,
{
    let scale = base.scale();
    let mut state = SolverState::Bracketed.advance(SolverState::Refining);

    let mut u1 = base.jd() + t_aprox;
    let mut u0 = u1 - params.secant_seed_offset;
    let mut a0 = sample(Instant::new(u0, scale))?.value;

    let mut estimate = None;
    let mut iterations = 0;

    for _ in 0..params.secant_max_iterations {
        iterations += 1;
        let ThresholdSample { value: a1, target } = sample(Instant::new(u1, scale))?;

        let denominator = a1 - a0;
        if denominator.abs() < FLAT_DENOMINATOR {
            break;
        }
        let u2 = u0 + (u1 - u0) * (target - a0) / denominator;

        if (u2 - u1).abs() < params.secant_tolerance {
            estimate = Some(u2);
            break;
        }

        u0 = u1;
        u1 = u2;
        a0 = a1;
    }

    let converged = estimate.is_some();
    state = state.advance(if converged {
        SolverState::Converged
    } else {
        SolverState::MaxIterExceeded
    });

    let instant = Instant::new(estimate.unwrap_or(u1), scale);
    let residual = sample(instant)?.excess();

    Ok(EventResult {
        instant,
        residual,
        iterations,
        converged: state == SolverState::Converged,
    })
}

/// Scan a day for a threshold crossing and refine it.
///
/// Arguments
/// ---------
/// * `sample`: threshold observable.
/// * `base`: reference midnight of the day.
/// * `direction`: which way the value passes through the target.
/// * `params`: scan and secant parameters.
///
/// Algorithm
/// ---------
/// Bracketed crossings are refined in time order. The first refined instant whose offset from
/// `base` lies in `(min_crossing_offset_hours, 24h)` is the event of the day; refined instants
/// outside that window belong to the previous or the next day and are skipped.
///
/// Returns
/// --------
/// * [`SearchOutcome::NoEvent`] when no refined crossing falls within the day,
///   otherwise the refined event.
///
/// # See also
/// * [`bracket_crossings`](crate::event_solver::scan::bracket_crossings)
/// * [`secant_refine`]
pub fn find_threshold_crossing<F>(
    mut sample: F,
    base: Instant,
    direction: Crossing,
    params: &AlmanacParams,
) -> Result<SearchOutcome, AlmanacError>
where
    F: FnMut(Instant) -> Result<ThresholdSample, AlmanacError>,
{
    params.validate()?;
    let state = SolverState::Searching;
    for t_aprox in bracket_crossings(&mut sample, base, direction, params)? {
        let event = secant_refine(&mut sample, base, t_aprox, params)?;
        if within_day(event.instant.jd() - base.jd(), params) {
            state.advance(SolverState::Bracketed);
            return Ok(SearchOutcome::Found(event));
        }
    }
    state.advance(SolverState::NoCrossing);
    Ok(SearchOutcome::NoEvent)
}

/// Whether an offset [d] from the reference midnight belongs to that day.
fn within_day(offset: f64, params: &AlmanacParams) -> bool {
    offset * 24.0 > params.min_crossing_offset_hours && offset < 1.0
}
