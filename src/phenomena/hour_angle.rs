//! Greenwich hour angles, apparent sidereal time and the next-year correction table.

use serde::Serialize;

use crate::almanac_errors::AlmanacError;
use crate::apparent::{equatorial_apparent, star_true_place, Equatorial};
use crate::constants::{Radian, DPI};
use crate::earth_orientation::equation_of_equinoxes;
use crate::ephemeris::{BodyId, EphemerisProvider};
use crate::phenomena::Target;
use crate::time::{centuries_since_j2000, gast, julian_day, DeltaT, Instant, Scale};

/// Greenwich hour angle, declination and distance of a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourAngle {
    /// In [0, 2π)
    pub gha: Radian,
    pub dec: Radian,
    /// [AU], zero for Aries and infinite for stars
    pub distance: f64,
}

/// Wrap an angle to (−π, π].
pub(crate) fn signed_angle(angle: Radian) -> Radian {
    let a = angle.rem_euclid(DPI);
    if a > std::f64::consts::PI {
        a - DPI
    } else {
        a
    }
}

/// Greenwich apparent sidereal time at `epoch`.
///
/// The equation of the equinoxes uses the provider's nutation in longitude at the same instant.
pub fn apparent_sidereal_time<P: EphemerisProvider + ?Sized>(
    provider: &P,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<Radian, AlmanacError> {
    let ut1 = epoch.to_scale(Scale::Ut1, delta_t);
    let tt = epoch.to_scale(Scale::Tt, delta_t);
    let t = centuries_since_j2000(tt.jd());
    let (dpsi, _) = provider.nutation_angles(epoch.to_scale(Scale::Tdb, delta_t))?;
    Ok(gast(ut1.jd(), equation_of_equinoxes(t, dpsi)))
}

/// Apparent right ascension, declination and distance of any target.
pub(crate) fn target_equatorial<P: EphemerisProvider + ?Sized>(
    provider: &P,
    target: &Target,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<Equatorial, AlmanacError> {
    match target {
        Target::Body(body) => equatorial_apparent(provider, *body, epoch, delta_t),
        Target::Star(star) => star_true_place(provider, star, epoch, delta_t),
    }
}

/// Greenwich hour angle of a target: `GHA = (GAST − α) mod 2π`.
///
/// For the First Point of Aries the right ascension is zero, so `GHA = GAST`, with zero
/// declination and distance.
pub fn greenwich_hour_angle<P: EphemerisProvider + ?Sized>(
    provider: &P,
    target: &Target,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<HourAngle, AlmanacError> {
    let sidereal = apparent_sidereal_time(provider, epoch, delta_t)?;
    let Equatorial { ra, dec, distance } = target_equatorial(provider, target, epoch, delta_t)?;
    Ok(HourAngle {
        gha: (sidereal - ra).rem_euclid(DPI),
        dec,
        distance,
    })
}

/// Correction to apply when the almanac of `year` is used one year later, for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NextYearCorrection {
    pub month: u8,
    pub day: u8,
    /// `GHA☉(year + 1) − GHA☉(year)` at 0h UT1, in [−π, π]
    pub correction: Radian,
}

/// Difference of the Sun's Greenwich hour angle between the same calendar date at 0h UT1
/// in `year + 1` and in `year`.
///
/// Returns
/// --------
/// * `Ok(None)` when the date does not exist in one of the two years (29 February,
///   31 April, …).
pub fn next_year_correction<P: EphemerisProvider + ?Sized>(
    provider: &P,
    year: i32,
    month: u8,
    day: u8,
    delta_t: DeltaT,
) -> Result<Option<Radian>, AlmanacError> {
    let (Ok(jd1), Ok(jd2)) = (
        julian_day(year, month, day, 0.0),
        julian_day(year + 1, month, day, 0.0),
    ) else {
        return Ok(None);
    };

    let sun = Target::Body(BodyId::Sun);
    let gha1 = greenwich_hour_angle(provider, &sun, Instant::ut1(jd1), delta_t)?.gha;
    let gha2 = greenwich_hour_angle(provider, &sun, Instant::ut1(jd2), delta_t)?.gha;
    Ok(Some(signed_angle(gha2 - gha1)))
}

/// [`next_year_correction`] for every date of the year, month by month.
pub fn next_year_corrections<P: EphemerisProvider + ?Sized>(
    provider: &P,
    year: i32,
    delta_t: DeltaT,
) -> Result<Vec<NextYearCorrection>, AlmanacError> {
    let mut table = Vec::with_capacity(366);
    for month in 1..=12u8 {
        for day in 1..=31u8 {
            if let Some(correction) = next_year_correction(provider, year, month, day, delta_t)? {
                table.push(NextYearCorrection {
                    month,
                    day,
                    correction,
                });
            }
        }
    }
    Ok(table)
}
