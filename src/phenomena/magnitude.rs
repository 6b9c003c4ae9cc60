//! Visual magnitude of the planets.
//!
//! `V = 5·log10(r·Δ) + V(1, α)`, with `r` the heliocentric and `Δ` the geocentric distance in
//! AU and `α` the phase angle (Sun–planet–Earth) in degrees. The phase curves are the
//! photometric fits of Mallama & Hilton (2018). Saturn includes its rings through the
//! saturnicentric latitude of the Earth, Uranus through the mean of the sub-Earth and sub-Sun
//! latitudes.
//!
//! Each fit is only defined over the phase angles it was derived from; outside that range,
//! and for the Sun, the Moon, Pluto and Aries, no magnitude is given.

use nalgebra::Vector3;
use serde::Serialize;

use crate::almanac_errors::AlmanacError;
use crate::constants::{Degree, J2000, RADEG};
use crate::ephemeris::{geocentric_state, BodyId, EphemerisProvider};
use crate::ref_system::equatorial_to_cartesian;
use crate::time::{DeltaT, Instant, Scale};

/// Saturn north pole, J2000 right ascension and declination [deg].
const SATURN_POLE: (Degree, Degree) = (40.589, 83.537);
/// Uranus north pole, J2000 right ascension and declination [deg].
const URANUS_POLE: (Degree, Degree) = (257.311, -15.175);

/// Sun–planet–Earth configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseGeometry {
    /// Planet–Sun distance [AU]
    pub sun_distance: f64,
    /// Planet–Earth distance [AU]
    pub earth_distance: f64,
    /// Angle at the planet between the Sun and the Earth [deg]
    pub phase_angle: Degree,
}

impl PhaseGeometry {
    /// Build the geometry from the geocentric J2000 vectors of the planet and of the Sun.
    ///
    /// Errors
    /// ------
    /// * [`AlmanacError::DegenerateVector`] if the planet coincides with the Earth or the Sun.
    pub fn new(planet: &Vector3<f64>, sun: &Vector3<f64>) -> Result<Self, AlmanacError> {
        let to_sun = sun - planet;
        let to_earth = -planet;
        let (r, delta) = (to_sun.norm(), to_earth.norm());
        if r == 0.0 || delta == 0.0 {
            return Err(AlmanacError::DegenerateVector("PhaseGeometry::new"));
        }
        let cos_alpha = (to_sun.dot(&to_earth) / (r * delta)).clamp(-1.0, 1.0);
        Ok(PhaseGeometry {
            sun_distance: r,
            earth_distance: delta,
            phase_angle: cos_alpha.acos() / RADEG,
        })
    }

    fn distance_term(&self) -> f64 {
        5.0 * (self.sun_distance * self.earth_distance).log10()
    }
}

/// Latitude [deg] of the direction `v` above the equator of a planet whose pole is `pole`.
fn planetocentric_latitude(pole: (Degree, Degree), v: &Vector3<f64>) -> Degree {
    let axis = equatorial_to_cartesian(pole.0 * RADEG, pole.1 * RADEG, 1.0);
    (axis.dot(v) / v.norm()).clamp(-1.0, 1.0).asin() / RADEG
}

fn mercury(a: Degree) -> Option<f64> {
    (a <= 170.0).then(|| {
        -0.613 + 6.3280e-02 * a - 1.6336e-03 * a.powi(2) + 3.3644e-05 * a.powi(3)
            - 3.4265e-07 * a.powi(4)
            + 1.6893e-09 * a.powi(5)
            - 3.0334e-12 * a.powi(6)
    })
}

fn venus(a: Degree) -> Option<f64> {
    if a < 163.7 {
        Some(-4.384 - 1.044e-03 * a + 3.687e-04 * a.powi(2) - 2.814e-06 * a.powi(3)
            + 8.938e-09 * a.powi(4))
    } else if a <= 179.0 {
        Some(236.05828 - 2.81914 * a + 8.39034e-03 * a.powi(2))
    } else {
        None
    }
}

fn mars(a: Degree) -> Option<f64> {
    if a <= 50.0 {
        Some(-1.601 + 0.02267 * a - 0.0001302 * a.powi(2))
    } else if a <= 120.0 {
        Some(-0.367 - 0.02573 * a + 0.0003445 * a.powi(2))
    } else {
        None
    }
}

fn jupiter(a: Degree) -> Option<f64> {
    if a <= 12.0 {
        return Some(-9.395 - 3.7e-04 * a + 6.16e-04 * a.powi(2));
    }
    let x = a / 180.0;
    let ratio = 1.0 - 1.507 * x - 0.363 * x.powi(2) - 0.062 * x.powi(3) + 2.809 * x.powi(4)
        - 1.876 * x.powi(5);
    (a <= 130.0 && ratio > 0.0).then(|| -9.428 + 2.5 * ratio.log10())
}

/// Globe and rings, for `a ≤ 6.5°` and a ring opening up to 27°.
fn saturn(a: Degree, ring_opening: Degree) -> Option<f64> {
    let beta = ring_opening.abs();
    if a > 6.5 || beta > 27.0 {
        return None;
    }
    let s = (beta * RADEG).sin();
    Some(-8.914 - 1.825 * s + 0.026 * a - 0.378 * s * (-2.25 * a).exp())
}

fn uranus(a: Degree, mean_latitude: Degree) -> Option<f64> {
    (a <= 3.1).then(|| -7.110 - 8.4e-04 * mean_latitude + 6.587e-3 * a + 1.045e-4 * a.powi(2))
}

/// Neptune brightened by about 0.1 mag between 1980 and 2000.
fn neptune(a: Degree, year: f64) -> Option<f64> {
    let v10 = if year >= 2000.0 {
        -7.00
    } else if year > 1980.0 {
        -6.89 - 0.0054 * (year - 1980.0)
    } else {
        -6.89
    };
    if a <= 1.9 {
        Some(v10)
    } else if a <= 133.14 {
        Some(v10 + 7.944e-3 * a + 9.617e-5 * a.powi(2))
    } else {
        None
    }
}

/// Visual magnitude of a planet from its geocentric J2000 vector and that of the Sun.
///
/// Arguments
/// ---------
/// * `body`: the planet.
/// * `planet`, `sun`: geocentric J2000 positions [AU].
/// * `year`: decimal year, only used for Neptune.
///
/// Returns
/// --------
/// * `Some(V)`, or `None` for a body without a photometric model or a phase angle outside
///   the range of its fit.
pub fn magnitude_from_vectors(
    body: BodyId,
    planet: &Vector3<f64>,
    sun: &Vector3<f64>,
    year: f64,
) -> Result<Option<f64>, AlmanacError> {
    if matches!(
        body,
        BodyId::Sun | BodyId::Moon | BodyId::Earth | BodyId::Pluto | BodyId::Aries
    ) {
        return Ok(None);
    }

    let geometry = PhaseGeometry::new(planet, sun)?;
    let a = geometry.phase_angle;
    let phase_term = match body {
        BodyId::Mercury => mercury(a),
        BodyId::Venus => venus(a),
        BodyId::Mars => mars(a),
        BodyId::Jupiter => jupiter(a),
        BodyId::Saturn => saturn(a, planetocentric_latitude(SATURN_POLE, &-planet)),
        BodyId::Uranus => {
            let earth = planetocentric_latitude(URANUS_POLE, &-planet).abs();
            let sun = planetocentric_latitude(URANUS_POLE, &(sun - planet)).abs();
            uranus(a, 0.5 * (earth + sun))
        }
        BodyId::Neptune => neptune(a, year),
        _ => None,
    };
    Ok(phase_term.map(|v| v + geometry.distance_term()))
}

/// Visual magnitude of a planet at `epoch`.
///
/// The geometric geocentric vectors of the planet and the Sun are taken at the same TDB
/// instant; light time is neglected.
///
/// # See also
/// * [`magnitude_from_vectors`]
pub fn visual_magnitude<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: BodyId,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<Option<f64>, AlmanacError> {
    if body.is_fictitious() {
        return Ok(None);
    }
    let tt = epoch.to_scale(Scale::Tt, delta_t);
    let tdb = epoch.to_scale(Scale::Tdb, delta_t);
    let planet = geocentric_state(provider, tdb, body)?.position;
    let sun = geocentric_state(provider, tdb, BodyId::Sun)?.position;
    let year = 2000.0 + (tt.jd() - J2000) / 365.25;
    magnitude_from_vectors(body, &planet, &sun, year)
}
