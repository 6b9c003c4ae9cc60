//! Rise and set times.
//!
//! A body rises or sets when its geocentric zenith distance reaches
//! `90°34′ + semi-diameter − horizontal parallax`; both corrections follow the body's distance
//! along the search, and vanish for stars. The day is scanned from its UT1 midnight, then the
//! bracketed crossings are refined with the secant method until one falls within the day.

use serde::{Deserialize, Serialize};

use crate::almanac_errors::AlmanacError;
use crate::config::AlmanacParams;
use crate::constants::Radian;
use crate::ephemeris::EphemerisProvider;
use crate::event_solver::scan::{Crossing, ThresholdSample};
use crate::event_solver::secant::find_threshold_crossing;
use crate::event_solver::SearchOutcome;
use crate::phenomena::disk::{horizontal_parallax, semi_diameter};
use crate::phenomena::hour_angle::{apparent_sidereal_time, target_equatorial};
use crate::phenomena::{Observer, Target};
use crate::time::{DeltaT, Instant, Scale};

/// Which horizon crossing is sought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiseSetEvent {
    Rise,
    Set,
}

impl RiseSetEvent {
    /// Direction in which the zenith distance crosses the horizon threshold.
    pub fn crossing(&self) -> Crossing {
        match self {
            RiseSetEvent::Rise => Crossing::Downward,
            RiseSetEvent::Set => Crossing::Upward,
        }
    }
}

/// Zenith distance from the spherical law of cosines:
/// `z = acos(sin φ·sin δ + cos φ·cos δ·cos H)`, the cosine clamped to [−1, 1].
pub fn zenith_distance(latitude: Radian, dec: Radian, hour_angle: Radian) -> Radian {
    let (sp, cp) = latitude.sin_cos();
    let (sd, cd) = dec.sin_cos();
    (sp * sd + cp * cd * hour_angle.cos())
        .clamp(-1.0, 1.0)
        .acos()
}

/// Zenith distance of the target and the horizon threshold at `epoch`.
fn horizon_sample<P: EphemerisProvider + ?Sized>(
    provider: &P,
    target: &Target,
    observer: &Observer,
    epoch: Instant,
    delta_t: DeltaT,
    horizon: Radian,
) -> Result<ThresholdSample, AlmanacError> {
    let sidereal = apparent_sidereal_time(provider, epoch, delta_t)?;
    let place = target_equatorial(provider, target, epoch, delta_t)?;

    let local_hour_angle = sidereal + observer.longitude() - place.ra;
    let z = zenith_distance(observer.latitude(), place.dec, local_hour_angle);

    let (sd, hp) = match target {
        Target::Body(body) => (
            semi_diameter(*body, place.distance),
            horizontal_parallax(place.distance),
        ),
        Target::Star(_) => (0.0, 0.0),
    };
    Ok(ThresholdSample::new(z, horizon + sd - hp))
}

/// Find the rise or set of a target on a given day.
///
/// Arguments
/// ---------
/// * `provider`: ephemeris provider.
/// * `target`: body or star. [`BodyId::Aries`](crate::ephemeris::BodyId::Aries) is accepted
///   with zero disk corrections.
/// * `observer`: geographic position.
/// * `day`: midnight of the day; converted to UT1 if given on another scale.
/// * `event`: rise or set.
/// * `delta_t`: TT − UT1.
/// * `params`: scan grid, horizon threshold and secant parameters.
///
/// Returns
/// --------
/// * [`SearchOutcome::Found`] with the UT1 instant of the event, or [`SearchOutcome::NoEvent`]
///   when the target does not cross the horizon that day in the requested direction
///   (circumpolar or never-rising target, or a moonrise slipping to the next day).
///
/// Errors
/// ------
/// * Provider failures and degenerate geometries propagate unchanged.
pub fn rise_set<P: EphemerisProvider + ?Sized>(
    provider: &P,
    target: &Target,
    observer: &Observer,
    day: Instant,
    event: RiseSetEvent,
    delta_t: DeltaT,
    params: &AlmanacParams,
) -> Result<SearchOutcome, AlmanacError> {
    let base = day.to_scale(Scale::Ut1, delta_t);
    let horizon = params.horizon_zenith_distance;

    find_threshold_crossing(
        |t| horizon_sample(provider, target, observer, t, delta_t, horizon),
        base,
        event.crossing(),
        params,
    )
}

/// Hours after the UT1 midnight of `day` of a rise/set outcome, `None` when there is no
/// event. `day` may be given on any scale.
pub fn event_hours(outcome: &SearchOutcome, day: Instant, delta_t: DeltaT) -> Option<f64> {
    let midnight = day.to_scale(Scale::Ut1, delta_t);
    outcome.event().map(|e| {
        e.instant
            .to_scale(Scale::Ut1, delta_t)
            .days_since(&midnight)
            * 24.0
    })
}
