#![allow(dead_code)]

use almanac::almanac_errors::AlmanacError;
use almanac::constants::{AU, J2000, RADEG};
use almanac::earth_orientation::{mean_obliquity, precession_matrix};
use almanac::ephemeris::{BodyId, EphemerisProvider, StateVector};
use almanac::time::{DeltaT, Instant, Scale};
use nalgebra::{Rotation3, Vector3};

/// Interval covered by [`LowPrecision`], TDB Julian Days (1900-2100).
pub const COVERAGE: (f64, f64) = (2_415_020.5, 2_488_069.5);

/// Step of the central difference used for velocities [day].
const VELOCITY_STEP: f64 = 0.01;

/// Geocentric Sun and Moon from truncated analytic theories, good to a few arcminutes.
///
/// Positions are built in the mean ecliptic of date, then rotated back to the J2000 equator,
/// so that the almanac reductions recover the theory's longitudes.
pub struct LowPrecision;

fn centuries(jd_tdb: f64) -> f64 {
    (jd_tdb - J2000) / 36525.0
}

/// Longitude, latitude [rad] and distance [AU] of the Sun, mean ecliptic of date.
fn sun_ecliptic(t: f64) -> (f64, f64, f64) {
    let l0 = 280.46646 + 36000.76983 * t;
    let m = (357.52911 + 35999.05029 * t) * RADEG;
    let e = 0.016708634 - 0.000042037 * t;
    let c = (1.914602 - 0.004817 * t) * m.sin() + 0.019993 * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();

    let nu = m + c * RADEG;
    let r = 1.000001018 * (1.0 - e * e) / (1.0 + e * nu.cos());
    ((l0 + c) * RADEG, 0.0, r)
}

/// Longitude, latitude [rad] and distance [AU] of the Moon, mean ecliptic of date.
fn moon_ecliptic(t: f64) -> (f64, f64, f64) {
    let lp = 218.3164477 + 481267.88123421 * t;
    let d = (297.8501921 + 445267.1114034 * t) * RADEG;
    let m = (357.5291092 + 35999.0502909 * t) * RADEG;
    let mp = (134.9633964 + 477198.8675055 * t) * RADEG;
    let f = (93.2720950 + 483202.0175233 * t) * RADEG;

    let lon = lp
        + 6.288774 * mp.sin()
        + 1.274027 * (2.0 * d - mp).sin()
        + 0.658314 * (2.0 * d).sin()
        + 0.213618 * (2.0 * mp).sin()
        - 0.185116 * m.sin()
        - 0.114332 * (2.0 * f).sin()
        + 0.058793 * (2.0 * d - 2.0 * mp).sin()
        + 0.057066 * (2.0 * d - m - mp).sin()
        + 0.053322 * (2.0 * d + mp).sin()
        + 0.045758 * (2.0 * d - m).sin();

    let lat = 5.128122 * f.sin()
        + 0.280602 * (mp + f).sin()
        + 0.277693 * (mp - f).sin()
        + 0.173237 * (2.0 * d - f).sin();

    let km = 385_000.56
        - 20_905.355 * mp.cos()
        - 3_699.111 * (2.0 * d - mp).cos()
        - 2_955.968 * (2.0 * d).cos()
        - 569.925 * (2.0 * mp).cos();

    (lon * RADEG, lat * RADEG, km / AU)
}

impl LowPrecision {
    fn position(&self, jd_tdb: f64, body: BodyId) -> Vector3<f64> {
        let t = centuries(jd_tdb);
        let (lon, lat, r) = match body {
            BodyId::Sun => sun_ecliptic(t),
            _ => moon_ecliptic(t),
        };
        let ecliptic = Vector3::new(
            r * lat.cos() * lon.cos(),
            r * lat.cos() * lon.sin(),
            r * lat.sin(),
        );
        let equator_of_date = Rotation3::from_axis_angle(&Vector3::x_axis(), mean_obliquity(t))
            * ecliptic;
        precession_matrix(t).transpose() * equator_of_date
    }
}

impl EphemerisProvider for LowPrecision {
    fn query_state(
        &self,
        epoch: Instant,
        body: BodyId,
        center: BodyId,
    ) -> Result<StateVector, AlmanacError> {
        if body.is_fictitious() {
            return Err(AlmanacError::FictitiousBody(body));
        }
        if center != BodyId::Earth || !matches!(body, BodyId::Sun | BodyId::Moon) {
            return Err(AlmanacError::EphemerisUnavailable(format!(
                "{body:?} relative to {center:?}"
            )));
        }

        let jd = epoch.to_scale(Scale::Tdb, DeltaT::default()).jd();
        if jd < COVERAGE.0 || jd > COVERAGE.1 {
            return Err(AlmanacError::EpochOutOfRange {
                jd,
                start: COVERAGE.0,
                end: COVERAGE.1,
            });
        }

        let before = self.position(jd - VELOCITY_STEP, body);
        let after = self.position(jd + VELOCITY_STEP, body);
        Ok(StateVector {
            position: self.position(jd, body),
            velocity: (after - before) / (2.0 * VELOCITY_STEP),
        })
    }
}

/// Smallest angular separation between two angles [rad].
pub fn angle_gap(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(std::f64::consts::TAU);
    d.min(std::f64::consts::TAU - d)
}
