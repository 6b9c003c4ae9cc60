//! # Solver configuration
//!
//! [`AlmanacParams`] gathers every numerical knob of the event searches: Newton and secant
//! tolerances and iteration caps, the coarse scan grid used to bracket horizon crossings,
//! the horizon threshold, and the stepping of the lunar phase and meridian transit searches.
//!
//! The defaults reproduce the reference almanac behaviour; [`AlmanacParamsBuilder`] lets a
//! caller override individual values and validates the result. Deserialized parameters go
//! through the same checks, and every search validates the parameters it is handed, so a
//! hand-built struct with a zero step is rejected instead of stalling a scan.

use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::almanac_errors::AlmanacError;
use crate::constants::{Radian, HORIZON_ZENITH_DISTANCE};

/// Numerical parameters of the event searches.
///
/// Default values:
///
/// * `newton_tolerance`: 1e-5 d (half-step below which the phase search stops)
/// * `newton_max_iterations`: 10
/// * `newton_initial_step`: 0.5 d
/// * `secant_tolerance`: 1.388e-4 d (~12 s)
/// * `secant_max_iterations`: 10
/// * `secant_seed_offset`: 6.944e-4 d (1 min before the bracketing sample)
/// * `scan_start`, `scan_end`, `scan_samples`: −0.02 d, 1.05 d, 52 samples
/// * `min_crossing_offset_hours`: −0.00833 h (−0.5 min)
/// * `horizon_zenith_distance`: 90°34′
/// * `transit_scan_step`: 0.04 d
/// * `phase_nudge`: 3.47222e-4 d (30 s)
/// * `phase_margin_days`: 30 d
///
/// See also
/// -----------------
/// * [`newton_refine`](crate::event_solver::newton::newton_refine)
/// * [`find_threshold_crossing`](crate::event_solver::secant::find_threshold_crossing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedParams")]
pub struct AlmanacParams {
    // --- Newton refinement ---
    /// Half-step size [d] at which Newton refinement is considered converged.
    pub newton_tolerance: f64,
    pub newton_max_iterations: usize,
    /// Finite-difference step [d] used on the first Newton iteration.
    pub newton_initial_step: f64,

    // --- Secant refinement ---
    /// Successive estimates closer than this [d] end the secant refinement.
    pub secant_tolerance: f64,
    pub secant_max_iterations: usize,
    /// Distance [d] between the two secant seeds.
    pub secant_seed_offset: f64,

    // --- Coarse scan ---
    /// First sample offset from the reference midnight [d].
    pub scan_start: f64,
    /// Last sample offset from the reference midnight [d].
    pub scan_end: f64,
    pub scan_samples: usize,
    /// Crossings bracketed before this offset [h] belong to the previous day.
    pub min_crossing_offset_hours: f64,

    // --- Phenomena ---
    /// Zenith distance of the upper limb at rise/set, before disk corrections [rad].
    pub horizon_zenith_distance: Radian,
    /// Sampling step [d] of the meridian transit scan.
    pub transit_scan_step: f64,
    /// Nudge [d] added after each lunar phase before seeding the next one.
    pub phase_nudge: f64,
    /// Margin [d] searched beyond the end of the year for lunar phases.
    pub phase_margin_days: f64,
}

impl AlmanacParams {
    /// Equivalent to [`AlmanacParams::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Fluent builder starting from the defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use almanac::config::AlmanacParams;
    ///
    /// let params = AlmanacParams::builder()
    ///     .secant_tolerance(1e-5)
    ///     .scan_samples(97)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.scan_samples, 97);
    /// ```
    pub fn builder() -> AlmanacParamsBuilder {
        AlmanacParamsBuilder::new()
    }

    /// Sample offsets [d] of the coarse scan, evenly spaced from `scan_start` to `scan_end`
    /// inclusive. Empty when `scan_samples` is zero.
    pub fn scan_offsets(&self) -> Vec<f64> {
        let n = self.scan_samples;
        let step = (self.scan_end - self.scan_start) / n.saturating_sub(1).max(1) as f64;
        (0..n)
            .map(|i| {
                if i == n - 1 {
                    self.scan_end
                } else {
                    self.scan_start + i as f64 * step
                }
            })
            .collect()
    }
}

impl Default for AlmanacParams {
    fn default() -> Self {
        AlmanacParams {
            newton_tolerance: 1e-5,
            newton_max_iterations: 10,
            newton_initial_step: 0.5,

            secant_tolerance: 1.388e-4,
            secant_max_iterations: 10,
            secant_seed_offset: 6.944e-4,

            scan_start: -0.02,
            scan_end: 1.05,
            scan_samples: 52,
            min_crossing_offset_hours: -0.00833,

            horizon_zenith_distance: HORIZON_ZENITH_DISTANCE,
            transit_scan_step: 0.04,
            phase_nudge: 3.47222e-4,
            phase_margin_days: 30.0,
        }
    }
}

/// Builder for [`AlmanacParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct AlmanacParamsBuilder {
    params: AlmanacParams,
}

impl AlmanacParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: AlmanacParams::default(),
        }
    }

    // --- Newton ---
    pub fn newton_tolerance(mut self, v: f64) -> Self {
        self.params.newton_tolerance = v;
        self
    }
    pub fn newton_max_iterations(mut self, v: usize) -> Self {
        self.params.newton_max_iterations = v;
        self
    }
    pub fn newton_initial_step(mut self, v: f64) -> Self {
        self.params.newton_initial_step = v;
        self
    }

    // --- Secant ---
    pub fn secant_tolerance(mut self, v: f64) -> Self {
        self.params.secant_tolerance = v;
        self
    }
    pub fn secant_max_iterations(mut self, v: usize) -> Self {
        self.params.secant_max_iterations = v;
        self
    }
    pub fn secant_seed_offset(mut self, v: f64) -> Self {
        self.params.secant_seed_offset = v;
        self
    }

    // --- Scan ---
    pub fn scan_window(mut self, start: f64, end: f64) -> Self {
        self.params.scan_start = start;
        self.params.scan_end = end;
        self
    }
    pub fn scan_samples(mut self, v: usize) -> Self {
        self.params.scan_samples = v;
        self
    }
    pub fn min_crossing_offset_hours(mut self, v: f64) -> Self {
        self.params.min_crossing_offset_hours = v;
        self
    }

    // --- Phenomena ---
    pub fn horizon_zenith_distance(mut self, v: Radian) -> Self {
        self.params.horizon_zenith_distance = v;
        self
    }
    pub fn transit_scan_step(mut self, v: f64) -> Self {
        self.params.transit_scan_step = v;
        self
    }
    pub fn phase_nudge(mut self, v: f64) -> Self {
        self.params.phase_nudge = v;
        self
    }
    pub fn phase_margin_days(mut self, v: f64) -> Self {
        self.params.phase_margin_days = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(AlmanacParams)` or [`AlmanacError::InvalidParams`] naming the first failed rule,
    ///   see [`AlmanacParams::validate`].
    pub fn build(self) -> Result<AlmanacParams, AlmanacError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

/// Return true iff x > 0.0 and comparable (i.e., not NaN).
#[inline]
fn gt0(x: f64) -> bool {
    x.partial_cmp(&0.0) == Some(Greater)
}

/// Return true iff x >= 0.0 and comparable (i.e., not NaN).
#[inline]
fn ge0(x: f64) -> bool {
    matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
}

/// Return true iff a < b and comparable (i.e., not NaN).
#[inline]
fn lt(a: f64, b: f64) -> bool {
    a.partial_cmp(&b) == Some(Less)
}

impl AlmanacParams {
    /// Check the parameters.
    ///
    /// Validation rules
    /// -----------------
    /// * tolerances, steps and the seed offset must be `> 0`;
    /// * `phase_nudge` and `phase_margin_days` must be `>= 0`;
    /// * iteration caps must be `>= 1`;
    /// * the scan needs at least two samples and `scan_start < scan_end`;
    /// * `min_crossing_offset_hours` must not be NaN;
    /// * `horizon_zenith_distance` must lie in `(0, π)`.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(())` or [`AlmanacError::InvalidParams`] naming the first failed rule.
    pub fn validate(&self) -> Result<(), AlmanacError> {
        // --- Strictly positive ---
        for (name, value) in [
            ("newton_tolerance", self.newton_tolerance),
            ("newton_initial_step", self.newton_initial_step),
            ("secant_tolerance", self.secant_tolerance),
            ("secant_seed_offset", self.secant_seed_offset),
            ("transit_scan_step", self.transit_scan_step),
        ] {
            if !gt0(value) {
                return Err(AlmanacError::InvalidParams(format!("{name} must be > 0")));
            }
        }

        if !ge0(self.phase_nudge) || !ge0(self.phase_margin_days) {
            return Err(AlmanacError::InvalidParams(
                "phase_nudge and phase_margin_days must be >= 0".into(),
            ));
        }

        // --- Iteration counts (>= 1) ---
        if self.newton_max_iterations == 0 || self.secant_max_iterations == 0 {
            return Err(AlmanacError::InvalidParams(
                "iteration caps must be >= 1".into(),
            ));
        }

        // --- Scan grid ---
        if self.scan_samples < 2 {
            return Err(AlmanacError::InvalidParams(
                "scan_samples must be >= 2".into(),
            ));
        }
        if !lt(self.scan_start, self.scan_end) {
            return Err(AlmanacError::InvalidParams(
                "require scan_start < scan_end".into(),
            ));
        }
        if self.min_crossing_offset_hours.is_nan() {
            return Err(AlmanacError::InvalidParams(
                "min_crossing_offset_hours must not be NaN".into(),
            ));
        }

        if !(gt0(self.horizon_zenith_distance)
            && lt(self.horizon_zenith_distance, std::f64::consts::PI))
        {
            return Err(AlmanacError::InvalidParams(
                "horizon_zenith_distance must lie in (0, π)".into(),
            ));
        }

        Ok(())
    }
}

/// Field-by-field image of [`AlmanacParams`] as read by serde, before validation.
/// Missing fields take their default value.
#[derive(Deserialize)]
#[serde(default)]
struct UncheckedParams {
    newton_tolerance: f64,
    newton_max_iterations: usize,
    newton_initial_step: f64,
    secant_tolerance: f64,
    secant_max_iterations: usize,
    secant_seed_offset: f64,
    scan_start: f64,
    scan_end: f64,
    scan_samples: usize,
    min_crossing_offset_hours: f64,
    horizon_zenith_distance: Radian,
    transit_scan_step: f64,
    phase_nudge: f64,
    phase_margin_days: f64,
}

impl Default for UncheckedParams {
    fn default() -> Self {
        let p = AlmanacParams::default();
        UncheckedParams {
            newton_tolerance: p.newton_tolerance,
            newton_max_iterations: p.newton_max_iterations,
            newton_initial_step: p.newton_initial_step,
            secant_tolerance: p.secant_tolerance,
            secant_max_iterations: p.secant_max_iterations,
            secant_seed_offset: p.secant_seed_offset,
            scan_start: p.scan_start,
            scan_end: p.scan_end,
            scan_samples: p.scan_samples,
            min_crossing_offset_hours: p.min_crossing_offset_hours,
            horizon_zenith_distance: p.horizon_zenith_distance,
            transit_scan_step: p.transit_scan_step,
            phase_nudge: p.phase_nudge,
            phase_margin_days: p.phase_margin_days,
        }
    }
}

impl TryFrom<UncheckedParams> for AlmanacParams {
    type Error = AlmanacError;

    fn try_from(raw: UncheckedParams) -> Result<Self, Self::Error> {
        let params = AlmanacParams {
            newton_tolerance: raw.newton_tolerance,
            newton_max_iterations: raw.newton_max_iterations,
            newton_initial_step: raw.newton_initial_step,
            secant_tolerance: raw.secant_tolerance,
            secant_max_iterations: raw.secant_max_iterations,
            secant_seed_offset: raw.secant_seed_offset,
            scan_start: raw.scan_start,
            scan_end: raw.scan_end,
            scan_samples: raw.scan_samples,
            min_crossing_offset_hours: raw.min_crossing_offset_hours,
            horizon_zenith_distance: raw.horizon_zenith_distance,
            transit_scan_step: raw.transit_scan_step,
            phase_nudge: raw.phase_nudge,
            phase_margin_days: raw.phase_margin_days,
        };
        params.validate()?;
        Ok(params)
    }
}

impl fmt::Display for AlmanacParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Almanac solver parameters")?;
        writeln!(
            f,
            "  newton : tol = {:e} d, max_it = {}, h0 = {} d",
            self.newton_tolerance, self.newton_max_iterations, self.newton_initial_step
        )?;
        writeln!(
            f,
            "  secant : tol = {:e} d, max_it = {}, seed offset = {:e} d",
            self.secant_tolerance, self.secant_max_iterations, self.secant_seed_offset
        )?;
        writeln!(
            f,
            "  scan   : [{}, {}] d, {} samples, min offset = {} h",
            self.scan_start, self.scan_end, self.scan_samples, self.min_crossing_offset_hours
        )?;
        write!(
            f,
            "  events : horizon z = {:.9} rad, transit step = {} d, phase nudge = {:e} d, margin = {} d",
            self.horizon_zenith_distance,
            self.transit_scan_step,
            self.phase_nudge,
            self.phase_margin_days
        )
    }
}

#[cfg(test)]
mod config_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_values() {
        let p = AlmanacParams::default();
        assert_eq!(p.newton_max_iterations, 10);
        assert_eq!(p.secant_max_iterations, 10);
        assert_eq!(p.scan_samples, 52);
        assert_eq!(p.horizon_zenith_distance, 1.580686525889531153);
        assert_eq!(AlmanacParams::builder().build().unwrap(), p);
    }

    #[test]
    fn test_scan_offsets() {
        let offsets = AlmanacParams::default().scan_offsets();
        assert_eq!(offsets.len(), 52);
        assert_eq!(offsets[0], -0.02);
        assert_eq!(offsets[51], 1.05);
        assert_relative_eq!(offsets[1] - offsets[0], 1.07 / 51.0, epsilon = 1e-15);
    }

    #[test]
    fn test_builder_overrides() {
        let p = AlmanacParams::builder()
            .newton_tolerance(1e-8)
            .scan_window(0.0, 1.0)
            .scan_samples(25)
            .build()
            .unwrap();
        assert_eq!(p.newton_tolerance, 1e-8);
        assert_eq!(p.scan_offsets()[24], 1.0);
    }

    #[test]
    fn test_builder_rejects_invalid() {
        assert_eq!(
            AlmanacParams::builder().secant_tolerance(0.0).build(),
            Err(AlmanacError::InvalidParams(
                "secant_tolerance must be > 0".into()
            ))
        );
        assert!(AlmanacParams::builder().newton_tolerance(f64::NAN).build().is_err());
        assert!(AlmanacParams::builder().scan_samples(1).build().is_err());
        assert!(AlmanacParams::builder().scan_window(1.0, 0.5).build().is_err());
        assert!(AlmanacParams::builder().newton_max_iterations(0).build().is_err());
        assert!(AlmanacParams::builder()
            .horizon_zenith_distance(4.0)
            .build()
            .is_err());
    }

    #[test]
    fn test_validate_hand_built_struct() {
        let p = AlmanacParams {
            transit_scan_step: 0.0,
            ..Default::default()
        };
        assert_eq!(
            p.validate(),
            Err(AlmanacError::InvalidParams(
                "transit_scan_step must be > 0".into()
            ))
        );
        assert!(AlmanacParams {
            min_crossing_offset_hours: f64::NAN,
            ..Default::default()
        }
        .validate()
        .is_err());
        assert_eq!(AlmanacParams::default().validate(), Ok(()));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let p: AlmanacParams = serde_json::from_str(r#"{"scan_samples": 97}"#).unwrap();
        assert_eq!(p.scan_samples, 97);
        assert_eq!(p.secant_tolerance, AlmanacParams::default().secant_tolerance);

        let round_trip: AlmanacParams =
            serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
        assert_eq!(round_trip, p);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let err = serde_json::from_str::<AlmanacParams>(r#"{"transit_scan_step": 0.0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("transit_scan_step must be > 0"));
        assert!(serde_json::from_str::<AlmanacParams>(r#"{"scan_samples": 1}"#).is_err());
    }

    #[test]
    fn test_display() {
        let text = format!("{}", AlmanacParams::default());
        assert!(text.starts_with("Almanac solver parameters"));
        assert!(text.contains("52 samples"));
    }
}
