//! Apparent disk of a body: semi-diameter and equatorial horizontal parallax, and the table of
//! days on which the Sun's tabulated semi-diameter changes.

use serde::Serialize;

use crate::almanac_errors::AlmanacError;
use crate::constants::{JulianDay, Kilometer, Radian, AU, EARTH_EQUATORIAL_RADIUS, RADMIN};
use crate::ephemeris::{geocentric_state, BodyId, EphemerisProvider};
use crate::time::{calendar_date, julian_day, CalendarDate, DeltaT, Instant, Scale};

/// Reference value subtracted from the Sun's semi-diameter in the change table [arcmin].
const SUN_REFERENCE_SEMI_DIAMETER: f64 = 16.0;

/// Angle subtended by a radius `radius` [km] seen from `distance` [AU].
fn angular_radius(radius: Kilometer, distance: f64) -> Radian {
    if radius == 0.0 || !distance.is_finite() || distance <= 0.0 {
        return 0.0;
    }
    (radius / AU / distance).clamp(-1.0, 1.0).asin()
}

/// Geocentric semi-diameter of `body` at `distance` [AU].
///
/// Zero for Aries, for a non-positive distance and for an infinite distance (stars).
pub fn semi_diameter(body: BodyId, distance: f64) -> Radian {
    angular_radius(body.radius(), distance)
}

/// Equatorial horizontal parallax of a body at `distance` [AU]: `asin(R⊕ / distance)`.
pub fn horizontal_parallax(distance: f64) -> Radian {
    angular_radius(EARTH_EQUATORIAL_RADIUS, distance)
}

/// A day from which the Sun's semi-diameter, rounded to 0.1′, takes a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SemiDiameterChange {
    /// UT1 midnight of the day the new value applies to.
    pub jd: JulianDay,
    pub date: CalendarDate,
    /// Semi-diameter minus 16′, in tenths of arcminute.
    pub excess_tenths: i32,
}

impl SemiDiameterChange {
    /// Semi-diameter minus 16′, in arcminutes.
    pub fn excess_arcmin(&self) -> f64 {
        self.excess_tenths as f64 / 10.0
    }
}

fn sun_excess_tenths<P: EphemerisProvider + ?Sized>(
    provider: &P,
    jd_ut1: JulianDay,
    delta_t: DeltaT,
) -> Result<i32, AlmanacError> {
    let tdb = Instant::ut1(jd_ut1).to_scale(Scale::Tdb, delta_t);
    let distance = geocentric_state(provider, tdb, BodyId::Sun)?.position.norm();
    let excess = semi_diameter(BodyId::Sun, distance) / RADMIN - SUN_REFERENCE_SEMI_DIAMETER;
    Ok((excess * 10.0).round() as i32)
}

/// Days of `year` on which the Sun's semi-diameter, rounded to 0.1′, changes.
///
/// The first entry is 1 January with the value evaluated at 2 January 0h. Each following
/// day `d` is evaluated at 0h of day `d + 1`, and a change is attributed to day `d`.
///
/// Returns
/// --------
/// * The changes in chronological order, 1 January first.
pub fn sun_semi_diameter_changes<P: EphemerisProvider + ?Sized>(
    provider: &P,
    year: i32,
    delta_t: DeltaT,
) -> Result<Vec<SemiDiameterChange>, AlmanacError> {
    let jan1 = julian_day(year, 1, 1, 0.0)?;
    let days = (julian_day(year + 1, 1, 1, 0.0)? - jan1).round() as usize;

    let mut current = sun_excess_tenths(provider, jan1 + 1.0, delta_t)?;
    let mut changes = vec![SemiDiameterChange {
        jd: jan1,
        date: calendar_date(jan1),
        excess_tenths: current,
    }];

    for d in 1..days {
        let value = sun_excess_tenths(provider, jan1 + d as f64, delta_t)?;
        if value != current {
            current = value;
            let jd = jan1 + (d - 1) as f64;
            changes.push(SemiDiameterChange {
                jd,
                date: calendar_date(jd),
                excess_tenths: value,
            });
        }
    }
    Ok(changes)
}
