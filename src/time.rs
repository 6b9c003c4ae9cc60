//! # Time scales and Julian Day arithmetic
//!
//! Every instant handled by the crate is a Julian Day tagged with its time scale
//! ([`Scale::Ut1`], [`Scale::Tt`] or [`Scale::Tdb`]). Conversions are pure functions of the
//! numeric value, plus the TT − UT1 offset ([`DeltaT`]) which is always passed explicitly.
//!
//! Calendar dates are converted with [`hifitime`] on a leap-second-free (TAI-labelled) epoch,
//! so that a calendar label maps to a uniform Julian Day in whatever scale the caller means.

use hifitime::{Epoch, TimeScale};
use serde::{Deserialize, Serialize};

use crate::almanac_errors::AlmanacError;
use crate::constants::{
    JulianDay, Radian, DAYS_PER_CENTURY, DPI, J2000, JDTOMJD, RADEG, SECONDS_PER_DAY, T2000,
};

/// Time scale attached to a Julian Day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    /// Universal Time, tied to Earth rotation
    Ut1,
    /// Terrestrial Time
    Tt,
    /// Barycentric Dynamical Time
    Tdb,
}

/// TT − UT1 offset, stored in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeltaT(f64);

impl DeltaT {
    pub fn from_seconds(seconds: f64) -> Self {
        DeltaT(seconds)
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }

    /// Offset expressed in days, ready to be added to a UT1 Julian Day.
    pub fn days(&self) -> f64 {
        self.0 / SECONDS_PER_DAY
    }
}

/// A Julian Day tagged with its time scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Instant {
    jd: JulianDay,
    scale: Scale,
}

/// Calendar label of a Julian Day: year, month, day and decimal hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: f64,
}

impl Instant {
    pub fn new(jd: JulianDay, scale: Scale) -> Self {
        Instant { jd, scale }
    }

    pub fn ut1(jd: JulianDay) -> Self {
        Instant::new(jd, Scale::Ut1)
    }

    pub fn tt(jd: JulianDay) -> Self {
        Instant::new(jd, Scale::Tt)
    }

    pub fn tdb(jd: JulianDay) -> Self {
        Instant::new(jd, Scale::Tdb)
    }

    /// Build an instant from a calendar date and a decimal hour (which may reach 24.0).
    pub fn from_calendar(
        year: i32,
        month: u8,
        day: u8,
        hour: f64,
        scale: Scale,
    ) -> Result<Self, AlmanacError> {
        Ok(Instant::new(julian_day(year, month, day, hour)?, scale))
    }

    pub fn jd(&self) -> JulianDay {
        self.jd
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Same scale, shifted by `days`.
    pub fn offset(&self, days: f64) -> Self {
        Instant::new(self.jd + days, self.scale)
    }

    /// Elapsed days from `earlier` to `self`. Both instants are expected on the same scale.
    pub fn days_since(&self, earlier: &Instant) -> f64 {
        debug_assert_eq!(self.scale, earlier.scale);
        self.jd - earlier.jd
    }

    /// Convert to another time scale.
    ///
    /// Arguments
    /// ---------
    /// * `target`: the scale of the returned instant.
    /// * `delta_t`: TT − UT1, only used when UT1 is one of the two ends.
    ///
    /// Returns
    /// --------
    /// * The same physical instant labelled in `target`.
    ///
    /// TDB → TT subtracts the periodic term evaluated at the TDB value, which is exact
    /// to well below a microsecond.
    pub fn to_scale(&self, target: Scale, delta_t: DeltaT) -> Instant {
        let jd = match (self.scale, target) {
            (Scale::Ut1, Scale::Ut1) | (Scale::Tt, Scale::Tt) | (Scale::Tdb, Scale::Tdb) => self.jd,
            (Scale::Ut1, Scale::Tt) => self.jd + delta_t.days(),
            (Scale::Ut1, Scale::Tdb) => tt_to_tdb(self.jd + delta_t.days()),
            (Scale::Tt, Scale::Ut1) => self.jd - delta_t.days(),
            (Scale::Tt, Scale::Tdb) => tt_to_tdb(self.jd),
            (Scale::Tdb, Scale::Tt) => tdb_to_tt(self.jd),
            (Scale::Tdb, Scale::Ut1) => tdb_to_tt(self.jd) - delta_t.days(),
        };
        Instant::new(jd, target)
    }

    pub fn calendar_date(&self) -> CalendarDate {
        calendar_date(self.jd)
    }
}

/// Periodic TDB − TT difference in days at the given Julian Day.
fn tdb_minus_tt(jd: JulianDay) -> f64 {
    let g = (357.53 + (jd - J2000) * 0.985_600_28) * RADEG;
    ((g.sin() * 0.1658e-2) + (2.0 * g).sin() * 0.14e-4) / SECONDS_PER_DAY
}

/// Convert a TT Julian Day into TDB.
///
/// The difference is the classical two-term periodic expression driven by the mean
/// anomaly of the Sun `g = 357.53° + 0.98560028°·(tt − J2000)`:
///
/// ```text
/// tdb = tt + (1.658e-3·sin g + 1.4e-5·sin 2g) / 86400
/// ```
pub fn tt_to_tdb(jd_tt: JulianDay) -> JulianDay {
    jd_tt + tdb_minus_tt(jd_tt)
}

/// Approximate inverse of [`tt_to_tdb`].
pub fn tdb_to_tt(jd_tdb: JulianDay) -> JulianDay {
    jd_tdb - tdb_minus_tt(jd_tdb)
}

/// Julian centuries elapsed from `epoch` to `tdb`.
pub fn julian_centuries(tdb: JulianDay, epoch: JulianDay) -> f64 {
    (tdb - epoch) / DAYS_PER_CENTURY
}

/// Julian centuries of TDB since J2000.0 for a TT Julian Day.
///
/// This is the time argument of every precession, obliquity and nutation polynomial
/// in the crate.
pub fn centuries_since_j2000(jd_tt: JulianDay) -> f64 {
    julian_centuries(tt_to_tdb(jd_tt), J2000)
}

/// Julian Day of a calendar date at a decimal hour.
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: Gregorian calendar date.
/// * `hour`: decimal hour, `24.0` designates the end of the day.
///
/// Returns
/// --------
/// * The Julian Day, or [`AlmanacError::InvalidCalendarDate`] if the date does not exist.
pub fn julian_day(year: i32, month: u8, day: u8, hour: f64) -> Result<JulianDay, AlmanacError> {
    let midnight = Epoch::maybe_from_gregorian(year, month, day, 0, 0, 0, 0, TimeScale::TAI)
        .map_err(|e| AlmanacError::InvalidCalendarDate(format!("{year}-{month}-{day}: {e}")))?;
    Ok(midnight.to_jde_tai_days() + hour / 24.0)
}

/// Calendar label (year, month, day, decimal hour) of a Julian Day.
pub fn calendar_date(jd: JulianDay) -> CalendarDate {
    let (year, month, day, hour, minute, second, nanos) = Epoch::from_jde_tai(jd).to_gregorian_tai();
    CalendarDate {
        year,
        month,
        day,
        hour: hour as f64
            + minute as f64 / 60.0
            + (second as f64 + nanos as f64 * 1e-9) / 3600.0,
    }
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Julian Day (UT1 time scale).
///
/// The IAU 1982 polynomial gives the mean sidereal time at 0h UT1; the rotation accumulated
/// during the fraction of the day is added with the sidereal/solar rate ratio `RAP`.
///
/// # Arguments
/// * `jd_ut1` - Julian Day, UT1 time scale
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(jd_ut1: JulianDay) -> Radian {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    // Integer MJD is 0h UT1
    let tjm = jd_ut1 - JDTOMJD;
    let t = (tjm.floor() - T2000) / DAYS_PER_CENTURY;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;
    let h = tjm.fract() * DPI;

    (gmst0 + h * RAP).rem_euclid(DPI)
}

/// Greenwich Apparent Sidereal Time: GMST plus the equation of the equinoxes.
///
/// See [`equation_of_equinoxes`](crate::earth_orientation::equation_of_equinoxes).
pub fn gast(jd_ut1: JulianDay, equation_of_equinoxes: Radian) -> Radian {
    (gmst(jd_ut1) + equation_of_equinoxes).rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_julian_day_j2000() {
        let jd = julian_day(2000, 1, 1, 12.0).unwrap();
        assert_relative_eq!(jd, J2000, epsilon = 1e-9);

        let jd = julian_day(2021, 1, 1, 0.0).unwrap();
        assert_relative_eq!(jd, 2459215.5, epsilon = 1e-9);
    }

    #[test]
    fn test_julian_day_end_of_day() {
        let end = julian_day(2024, 12, 31, 24.0).unwrap();
        let next = julian_day(2025, 1, 1, 0.0).unwrap();
        assert_relative_eq!(end, next, epsilon = 1e-9);
    }

    #[test]
    fn test_julian_day_invalid() {
        assert!(matches!(
            julian_day(2023, 2, 29, 0.0),
            Err(AlmanacError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_calendar_date() {
        let date = calendar_date(2459215.5 + 0.75);
        assert_eq!((date.year, date.month, date.day), (2021, 1, 1));
        assert_relative_eq!(date.hour, 18.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tt_to_tdb_bound() {
        let mut rng = StdRng::seed_from_u64(0x7DB);
        for _ in 0..1000 {
            let tt = J2000 + rng.random_range(-36525.0..36525.0);
            let diff_seconds = (tt_to_tdb(tt) - tt) * SECONDS_PER_DAY;
            assert!(diff_seconds.abs() < 0.002, "TDB - TT = {diff_seconds} s");
        }
    }

    #[test]
    fn test_tdb_to_tt_inverse() {
        let tt = 2460310.5;
        let back = tdb_to_tt(tt_to_tdb(tt));
        assert_relative_eq!(back, tt, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_conversions() {
        let dt = DeltaT::from_seconds(69.184);
        let ut = Instant::ut1(2460310.5);

        let tt = ut.to_scale(Scale::Tt, dt);
        assert_eq!(tt.scale(), Scale::Tt);
        assert_relative_eq!(tt.days_since(&Instant::tt(ut.jd())), dt.days(), epsilon = 1e-12);

        let back = tt.to_scale(Scale::Ut1, dt);
        assert_relative_eq!(back.jd(), ut.jd(), epsilon = 1e-12);

        let tdb = ut.to_scale(Scale::Tdb, dt);
        assert_relative_eq!(tdb.jd(), tt_to_tdb(tt.jd()), epsilon = 1e-12);
        assert_relative_eq!(
            tdb.to_scale(Scale::Ut1, dt).jd(),
            ut.jd(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_julian_centuries() {
        assert_eq!(julian_centuries(J2000 + 36525.0, J2000), 1.0);
        assert_eq!(julian_centuries(J2000, J2000), 0.0);
    }

    #[test]
    fn test_gmst() {
        let res_gmst = gmst(J2000);
        assert_relative_eq!(res_gmst, 4.894961212789145, epsilon = 1e-12);

        let res_gmst = gmst(57028.478514610404 + JDTOMJD);
        assert_relative_eq!(res_gmst, 4.851925725092499, epsilon = 1e-8);
    }

    #[test]
    fn test_gast_adds_equation_of_equinoxes() {
        let jd = 2460310.5;
        let eqeq = -5.0e-5;
        assert_relative_eq!(gast(jd, eqeq), gmst(jd) + eqeq, epsilon = 1e-14);
    }
}
