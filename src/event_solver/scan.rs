//! Coarse sampling of an observable to bracket a crossing before refinement.
//!
//! Evaluations are made once per grid point, in increasing time order.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::almanac_errors::AlmanacError;
use crate::config::AlmanacParams;
use crate::time::Instant;

/// Direction in which an observable passes through its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crossing {
    /// The value grows through the target (a zenith distance at set).
    Upward,
    /// The value decreases through the target (a zenith distance at rise).
    Downward,
}

impl Crossing {
    /// Sign applied to `target − value` so that the sought crossing is always a fall
    /// through zero.
    pub fn sign(&self) -> f64 {
        match self {
            Crossing::Upward => 1.0,
            Crossing::Downward => -1.0,
        }
    }
}

/// One evaluation of a threshold observable: the value and the target it is compared with.
///
/// The target may depend on time (e.g. a horizon corrected for the Moon's distance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSample {
    pub value: f64,
    pub target: f64,
}

impl ThresholdSample {
    pub fn new(value: f64, target: f64) -> Self {
        ThresholdSample { value, target }
    }

    /// `value − target`
    pub fn excess(&self) -> f64 {
        self.value - self.target
    }
}

/// Scan the grid `base + params.scan_offsets()` for crossings in `direction`.
///
/// Arguments
/// ---------
/// * `sample`: threshold observable.
/// * `base`: reference midnight of the searched day.
/// * `direction`: which way the value must pass through the target.
/// * `params`: scan window, sample count and `min_crossing_offset_hours`.
///
/// Returns
/// --------
/// * In increasing time order, the offsets in days from `base` of the grid points that close
///   a bracket `d[i] ≥ 0 ∧ d[i+1] ≤ 0` (with `d = sign · (target − value)`) and lie after
///   `min_crossing_offset_hours`. Earlier brackets belong to the previous day.
/// * An empty vector if no such bracket exists.
pub fn bracket_crossings<F>(
    sample: &mut F,
    base: Instant,
    direction: Crossing,
    params: &AlmanacParams,
) -> Result<Vec<f64>, AlmanacError>
where
    F: FnMut(Instant) -> Result<ThresholdSample, AlmanacError>,
{
    let offsets = params.scan_offsets();
    let sign = direction.sign();

    let difs = offsets
        .iter()
        .map(|&dt| sample(base.offset(dt)).map(|s| sign * (s.target - s.value)))
        .collect::<Result<Vec<f64>, AlmanacError>>()?;

    Ok(offsets
        .iter()
        .zip(difs.iter())
        .tuple_windows()
        .filter_map(|((_, &d0), (&t1, &d1))| {
            (d0 >= 0.0 && d1 <= 0.0 && t1 * 24.0 > params.min_crossing_offset_hours)
                .then_some(t1)
        })
        .collect())
}

/// Find the first step of a regular grid over `[start, start + span]` where `f` goes from
/// negative to non-negative.
///
/// Sign changes whose jump `f(b) − f(a)` reaches `max_jump` are taken for wrap-arounds of an
/// angular observable and skipped.
///
/// Returns
/// --------
/// * The bracketing pair `(a, b)`, or `None`.
///
/// Errors
/// ------
/// * [`AlmanacError::InvalidParams`] if `step` is not a positive number or `span` is negative.
pub fn first_rising_zero<F>(
    f: &mut F,
    start: Instant,
    span: f64,
    step: f64,
    max_jump: f64,
) -> Result<Option<(Instant, Instant)>, AlmanacError>
where
    F: FnMut(Instant) -> Result<f64, AlmanacError>,
{
    if !(step > 0.0 && step.is_finite()) || !(span >= 0.0 && span.is_finite()) {
        return Err(AlmanacError::InvalidParams(format!(
            "scan step must be > 0 and span >= 0, got step = {step}, span = {span}"
        )));
    }
    let n = (span / step).ceil() as usize;
    let grid = (0..=n).map(|k| start.offset((k as f64 * step).min(span)));

    let mut previous: Option<(Instant, f64)> = None;
    for t in grid {
        let value = f(t)?;
        if let Some((t_prev, v_prev)) = previous {
            if v_prev < 0.0 && value >= 0.0 && value - v_prev < max_jump {
                return Ok(Some((t_prev, t)));
            }
        }
        previous = Some((t, value));
    }
    Ok(None)
}
