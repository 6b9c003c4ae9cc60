//! Newton refinement with a symmetric finite-difference derivative.

use crate::almanac_errors::AlmanacError;
use crate::config::AlmanacParams;
use crate::event_solver::{EventResult, SolverState};
use crate::time::Instant;

/// Refine the zero of a smooth observable near `seed`.
///
/// Arguments
/// ---------
/// * `observable`: function of time whose zero is sought.
/// * `seed`: starting instant; the result is on the same scale.
/// * `params`: `newton_initial_step`, `newton_tolerance` and `newton_max_iterations` are used.
///
/// Returns
/// --------
/// * An [`EventResult`] with the final estimate, `|f|` at that estimate and the number of
///   iterations. `converged` is `false` when the cap was reached first.
///
/// Algorithm
/// ---------
/// Each iteration, with step `h` (initially `newton_initial_step`):
/// ```text
/// v     = (f(t + h) − f(t − h)) / 2h
/// t_new = t − f(t) / v
/// h     = |f(t_new) / v| / 2
/// ```
/// The loop ends once `h ≤ newton_tolerance`. A zero derivative leaves `t` and `h` unchanged,
/// unless `f` already vanishes, in which case the search is done.
pub fn newton_refine<F>(
    mut observable: F,
    seed: Instant,
    params: &AlmanacParams,
) -> Result<EventResult, AlmanacError>
where
    F: FnMut(Instant) -> Result<f64, AlmanacError>,
{
    params.validate()?;
    let mut state = SolverState::Searching
        .advance(SolverState::Bracketed)
        .advance(SolverState::Refining);

    let mut t = seed;
    let mut h = params.newton_initial_step;
    let mut residual = f64::NAN;
    let mut iterations = 0;

    while h > params.newton_tolerance {
        if iterations == params.newton_max_iterations {
            state = state.advance(SolverState::MaxIterExceeded);
            break;
        }
        iterations += 1;

        let before = observable(t.offset(-h))?;
        let after = observable(t.offset(h))?;
        let v = (after - before) / (2.0 * h);

        let f0 = observable(t)?;
        let correction = if v != 0.0 { f0 / v } else { 0.0 };
        t = t.offset(-correction);

        let f_new = observable(t)?;
        residual = f_new.abs();

        if v != 0.0 {
            h = (f_new / v).abs() / 2.0;
        } else if f_new == 0.0 {
            h = 0.0;
        }
    }

    if iterations == 0 {
        residual = observable(t)?.abs();
    }
    if !state.is_terminal() {
        state = state.advance(SolverState::Converged);
    }

    Ok(EventResult {
        instant: t,
        residual,
        iterations,
        converged: state == SolverState::Converged,
    })
}
