//! Upper transit across the Greenwich meridian.
//!
//! The observable is the Greenwich hour angle wrapped to (−π, π]: it is negative before the
//! transit and becomes positive right after. The day is sampled every `transit_scan_step` from
//! UT1 midnight; jumps of the wrapped angle at the lower transit are skipped. When no transit
//! is bracketed the result is the documented fallback, 12h of the day.

use serde::Serialize;

use crate::almanac_errors::AlmanacError;
use crate::config::AlmanacParams;
use crate::ephemeris::EphemerisProvider;
use crate::event_solver::scan::{first_rising_zero, ThresholdSample};
use crate::event_solver::secant::secant_refine;
use crate::event_solver::EventResult;
use crate::phenomena::hour_angle::{greenwich_hour_angle, signed_angle};
use crate::phenomena::Target;
use crate::time::{DeltaT, Instant, Scale};

/// Outcome of a transit search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Transit {
    Found(EventResult),
    /// No transit bracketed during the day; the instant is 12h UT1.
    Fallback(Instant),
}

impl Transit {
    pub fn instant(&self) -> Instant {
        match self {
            Transit::Found(event) => event.instant,
            Transit::Fallback(instant) => *instant,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Transit::Fallback(_))
    }

    /// Hours after the UT1 midnight of `day`, which may be given on any scale.
    pub fn hours(&self, day: Instant, delta_t: DeltaT) -> f64 {
        let midnight = day.to_scale(Scale::Ut1, delta_t);
        self.instant()
            .to_scale(Scale::Ut1, delta_t)
            .days_since(&midnight)
            * 24.0
    }
}

/// Search the zero of a wrapped hour-angle observable during the day starting at `day`.
///
/// Arguments
/// ---------
/// * `hour_angle`: angle in (−π, π], increasing through zero at the transit.
/// * `day`: UT1 midnight.
/// * `params`: `transit_scan_step` and the secant parameters.
///
/// Returns
/// --------
/// * [`Transit::Found`] with the refined instant, or [`Transit::Fallback`] at `day + 0.5`.
///
/// Errors
/// ------
/// * [`AlmanacError::InvalidParams`] when `params` fails [`AlmanacParams::validate`].
pub fn find_transit<F>(
    mut hour_angle: F,
    day: Instant,
    params: &AlmanacParams,
) -> Result<Transit, AlmanacError>
where
    F: FnMut(Instant) -> Result<f64, AlmanacError>,
{
    params.validate()?;
    let bracket = first_rising_zero(
        &mut hour_angle,
        day,
        1.0,
        params.transit_scan_step,
        std::f64::consts::PI,
    )?;

    let Some((_, after)) = bracket else {
        return Ok(Transit::Fallback(day.offset(0.5)));
    };

    let mut sample = |t: Instant| hour_angle(t).map(|h| ThresholdSample::new(h, 0.0));
    let event = secant_refine(&mut sample, day, after.days_since(&day), params)?;
    Ok(Transit::Found(event))
}

/// Upper transit of a target across the Greenwich meridian on the day starting at `day`.
///
/// `day` is converted to UT1; the returned instant is UT1.
pub fn meridian_transit<P: EphemerisProvider + ?Sized>(
    provider: &P,
    target: &Target,
    day: Instant,
    delta_t: DeltaT,
    params: &AlmanacParams,
) -> Result<Transit, AlmanacError> {
    let day = day.to_scale(Scale::Ut1, delta_t);
    find_transit(
        |t| Ok(signed_angle(greenwich_hour_angle(provider, target, t, delta_t)?.gha)),
        day,
        params,
    )
}

/// Daily retardation of the transit, in whole minutes: the transit time of the next day minus
/// that of `day`, each rounded to the minute. Fallback transits take part as 12h.
pub fn meridian_retardation<P: EphemerisProvider + ?Sized>(
    provider: &P,
    target: &Target,
    day: Instant,
    delta_t: DeltaT,
    params: &AlmanacParams,
) -> Result<i64, AlmanacError> {
    let day = day.to_scale(Scale::Ut1, delta_t);
    let next = day.offset(1.0);
    let today = meridian_transit(provider, target, day, delta_t, params)?;
    let tomorrow = meridian_transit(provider, target, next, delta_t, params)?;

    let minutes = |transit: &Transit, midnight: Instant| {
        (60.0 * transit.hours(midnight, delta_t)).round() as i64
    };
    Ok(minutes(&tomorrow, next) - minutes(&today, day))
}

#[cfg(test)]
mod meridian_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::TAU;

    #[test]
    fn test_decreasing_observable_falls_back_to_noon() {
        let day = Instant::ut1(2_451_544.5);
        let transit = find_transit(
            |t: Instant| Ok(-0.1 - 0.5 * t.days_since(&day)),
            day,
            &AlmanacParams::default(),
        )
        .unwrap();

        assert!(transit.is_fallback());
        assert_eq!(transit, Transit::Fallback(Instant::ut1(2_451_545.0)));
        assert_eq!(transit.hours(day, DeltaT::default()), 12.0);
    }

    #[test]
    fn test_rotating_hour_angle() {
        // One turn per 1.035 d (Moon-like), transit at 17.3h.
        let day = Instant::ut1(2_451_544.5);
        let transit_offset = 17.3 / 24.0;
        let hour_angle = |t: Instant| {
            Ok(signed_angle((t.days_since(&day) - transit_offset) * TAU / 1.035))
        };

        let transit = find_transit(hour_angle, day, &AlmanacParams::default()).unwrap();
        let Transit::Found(event) = transit else {
            panic!("expected a transit, got {transit:?}");
        };
        assert!(event.converged);
        assert_abs_diff_eq!(transit.hours(day, DeltaT::default()), 17.3, epsilon = 1e-6);
        assert!(event.residual.abs() < 1e-8);
    }

    #[test]
    fn test_hours_from_a_tt_day() {
        let delta_t = DeltaT::from_seconds(64.0);
        let day = Instant::ut1(2_451_544.5);
        let transit = Transit::Fallback(day.offset(0.5));
        let tt_day = day.to_scale(Scale::Tt, delta_t);
        assert_abs_diff_eq!(transit.hours(tt_day, delta_t), 12.0, epsilon = 1e-8);
    }

    #[test]
    fn test_zero_scan_step_is_rejected() {
        let day = Instant::ut1(2_451_544.5);
        let params = AlmanacParams {
            transit_scan_step: 0.0,
            ..Default::default()
        };
        let mut calls = 0usize;
        let transit = find_transit(
            |t: Instant| {
                calls += 1;
                Ok(signed_angle(t.days_since(&day) * TAU))
            },
            day,
            &params,
        );
        assert_eq!(
            transit,
            Err(AlmanacError::InvalidParams(
                "transit_scan_step must be > 0".into()
            ))
        );
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_lower_transit_wrap_is_not_a_transit() {
        // Starts at +π/2, wraps from +π to −π at 6h and reaches zero at 18h.
        let day = Instant::ut1(2_451_544.5);
        let hour_angle = |t: Instant| Ok(signed_angle((t.days_since(&day) - 0.75) * TAU));
        let transit = find_transit(hour_angle, day, &AlmanacParams::default()).unwrap();
        assert_abs_diff_eq!(transit.hours(day, DeltaT::default()), 18.0, epsilon = 1e-6);
    }
}
