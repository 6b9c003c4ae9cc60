//! Principal lunar phases.
//!
//! A phase occurs when the apparent ecliptic longitude of the Moon exceeds the Sun's by the
//! phase angle (0, π/2, π, 3π/2). Phases are found one after the other with Newton refinement
//! on the wrapped difference `λ☉ − λ☾ + φ`, each search seeded just after the previous event.

use serde::{Deserialize, Serialize};

use crate::almanac_errors::AlmanacError;
use crate::apparent::ecliptic_apparent;
use crate::config::AlmanacParams;
use crate::constants::{JulianDay, Radian, DPI, SYNODIC_MONTH};
use crate::ephemeris::{BodyId, EphemerisProvider};
use crate::event_solver::newton::newton_refine;
use crate::event_solver::EventResult;
use crate::phenomena::hour_angle::signed_angle;
use crate::time::{julian_day, DeltaT, Instant, Scale};

/// Lunation number of the reference phases of early 1998.
const REFERENCE_LUNATION: i64 = 930;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LunarPhase {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl LunarPhase {
    pub const ALL: [LunarPhase; 4] = [
        LunarPhase::New,
        LunarPhase::FirstQuarter,
        LunarPhase::Full,
        LunarPhase::LastQuarter,
    ];

    pub fn index(&self) -> usize {
        match self {
            LunarPhase::New => 0,
            LunarPhase::FirstQuarter => 1,
            LunarPhase::Full => 2,
            LunarPhase::LastQuarter => 3,
        }
    }

    /// Phase for an index taken modulo 4.
    pub fn from_index(index: usize) -> LunarPhase {
        LunarPhase::ALL[index % 4]
    }

    pub fn next(&self) -> LunarPhase {
        LunarPhase::from_index(self.index() + 1)
    }

    /// Excess of the Moon's longitude over the Sun's at this phase.
    pub fn angle(&self) -> Radian {
        self.index() as f64 * std::f64::consts::FRAC_PI_2
    }

    /// UT1 Julian Day of the phase that starts lunation 930 (February-March 1998).
    fn reference_epoch(&self) -> JulianDay {
        match self {
            LunarPhase::New => 2_450_870.5 + 17.433 / 24.0,
            LunarPhase::FirstQuarter => 2_450_877.5 + 8.683 / 24.0,
            LunarPhase::Full => 2_450_885.5 + 4.567 / 24.0,
            LunarPhase::LastQuarter => 2_450_893.5 + 7.633 / 24.0,
        }
    }
}

/// A phase event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarPhaseEvent {
    pub phase: LunarPhase,
    /// Refinement result; the instant is UT1.
    pub event: EventResult,
    pub lunation: i64,
}

impl LunarPhaseEvent {
    pub fn instant(&self) -> Instant {
        self.event.instant
    }
}

/// Lunation number of a phase occurring at `jd_ut1`.
///
/// ```text
/// lunation = 930 + round((jd − jd_ref(phase)) / 29.53059028)
/// ```
pub fn lunation_number(phase: LunarPhase, jd_ut1: JulianDay) -> i64 {
    REFERENCE_LUNATION + ((jd_ut1 - phase.reference_epoch()) / SYNODIC_MONTH).round() as i64
}

/// Apparent ecliptic longitudes of the Sun and the Moon.
fn longitudes<P: EphemerisProvider + ?Sized>(
    provider: &P,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<(Radian, Radian), AlmanacError> {
    let sun = ecliptic_apparent(provider, BodyId::Sun, epoch, delta_t)?.lon;
    let moon = ecliptic_apparent(provider, BodyId::Moon, epoch, delta_t)?.lon;
    Ok((sun, moon))
}

/// Phase observable: `(λ☉ − λ☾ + φ)` wrapped to (−π, π], zero at the phase.
pub fn phase_residual<P: EphemerisProvider + ?Sized>(
    provider: &P,
    epoch: Instant,
    phase: LunarPhase,
    delta_t: DeltaT,
) -> Result<Radian, AlmanacError> {
    let (sun, moon) = longitudes(provider, epoch, delta_t)?;
    Ok(signed_angle(DPI + sun - moon + phase.angle()))
}

/// Last principal phase reached at `epoch`: the quadrant of the elongation `λ☾ − λ☉`.
pub fn current_phase<P: EphemerisProvider + ?Sized>(
    provider: &P,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<LunarPhase, AlmanacError> {
    let (sun, moon) = longitudes(provider, epoch, delta_t)?;
    let elongation = (DPI + moon - sun).rem_euclid(DPI);
    Ok(LunarPhase::from_index(
        (elongation / std::f64::consts::FRAC_PI_2) as usize,
    ))
}

/// Every principal phase from 1 December of `year − 1` until `phase_margin_days` after the
/// end of `year`.
///
/// Arguments
/// ---------
/// * `provider`: ephemeris provider, queried for the Sun and the Moon.
/// * `year`: calendar year of the table.
/// * `delta_t`: TT − UT1.
/// * `params`: Newton parameters, `phase_nudge` and `phase_margin_days`.
///
/// Returns
/// --------
/// * The phases in chronological order, cycling New → First Quarter → Full → Last Quarter.
///   Each instant is UT1; a phase whose refinement hit the iteration cap is kept with
///   `converged = false`.
///
/// Algorithm
/// ---------
/// The first target is the phase following the quadrant of the elongation at the start
/// instant. After each event the next search is seeded `phase_nudge` later, converted to TT.
pub fn find_lunar_phases<P: EphemerisProvider + ?Sized>(
    provider: &P,
    year: i32,
    delta_t: DeltaT,
    params: &AlmanacParams,
) -> Result<Vec<LunarPhaseEvent>, AlmanacError> {
    let mut ut = julian_day(year - 1, 12, 1, 0.0)?;
    let end = julian_day(year, 12, 31, 24.0)? + params.phase_margin_days;

    let mut seed = Instant::ut1(ut).to_scale(Scale::Tt, delta_t);
    let mut phase = current_phase(provider, seed, delta_t)?;
    let mut events = Vec::with_capacity(64);

    while ut < end {
        phase = phase.next();
        let result = newton_refine(
            |t| phase_residual(provider, t, phase, delta_t),
            seed,
            params,
        )?;

        let instant = result.instant.to_scale(Scale::Ut1, delta_t);
        events.push(LunarPhaseEvent {
            phase,
            event: EventResult { instant, ..result },
            lunation: lunation_number(phase, instant.jd()),
        });

        ut = instant.jd() + params.phase_nudge;
        seed = Instant::ut1(ut).to_scale(Scale::Tt, delta_t);
    }
    Ok(events)
}

/// Age of the Moon at `instant`: days elapsed since the latest New Moon of `phases` not after it.
///
/// `phases` must be chronological, as returned by [`find_lunar_phases`]. Returns `None` when
/// no New Moon precedes `instant`.
pub fn moon_age(phases: &[LunarPhaseEvent], instant: Instant) -> Option<f64> {
    phases
        .iter()
        .rev()
        .find(|p| p.phase == LunarPhase::New && p.instant().jd() <= instant.jd())
        .map(|p| instant.jd() - p.instant().jd())
}

#[cfg(test)]
mod lunar_phase_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_phase_cycle() {
        assert_eq!(LunarPhase::LastQuarter.next(), LunarPhase::New);
        assert_eq!(LunarPhase::from_index(6), LunarPhase::Full);
        assert_eq!(LunarPhase::Full.angle(), std::f64::consts::PI);
        for phase in LunarPhase::ALL {
            assert_eq!(LunarPhase::from_index(phase.index()), phase);
        }
    }

    #[test]
    fn test_lunation_number() {
        let reference = LunarPhase::New.reference_epoch();
        assert_eq!(lunation_number(LunarPhase::New, reference), 930);
        assert_eq!(lunation_number(LunarPhase::New, reference + 29.6), 931);
        assert_eq!(lunation_number(LunarPhase::New, reference - 29.4), 929);
        // First New Moon of 2000 (6 Jan 18:14 UT): lunation 953.
        assert_eq!(lunation_number(LunarPhase::New, 2_451_550.26), 953);
    }

    fn event(phase: LunarPhase, jd: f64) -> LunarPhaseEvent {
        LunarPhaseEvent {
            phase,
            event: EventResult {
                instant: Instant::ut1(jd),
                residual: 0.0,
                iterations: 3,
                converged: true,
            },
            lunation: lunation_number(phase, jd),
        }
    }

    #[test]
    fn test_moon_age() {
        let phases = [
            event(LunarPhase::New, 2_451_550.26),
            event(LunarPhase::FirstQuarter, 2_451_557.7),
            event(LunarPhase::Full, 2_451_564.7),
            event(LunarPhase::LastQuarter, 2_451_571.2),
            event(LunarPhase::New, 2_451_579.8),
        ];
        assert_eq!(moon_age(&phases, Instant::ut1(2_451_549.0)), None);
        assert_abs_diff_eq!(
            moon_age(&phases, Instant::ut1(2_451_560.26)).unwrap(),
            10.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            moon_age(&phases, Instant::ut1(2_451_580.8)).unwrap(),
            1.0,
            epsilon = 1e-9
        );
    }
}
