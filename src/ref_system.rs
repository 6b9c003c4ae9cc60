//! # Vector corrections and coordinate conversions
//!
//! Geocentric position vectors coming from the ephemeris provider are corrected here for
//! gravitational light deflection and planetary aberration, rotated with the matrices of
//! [`earth_orientation`](crate::earth_orientation), and converted between Cartesian,
//! equatorial and ecliptic representations.

use nalgebra::{Matrix3, Vector3};

use crate::almanac_errors::AlmanacError;
use crate::constants::{Radian, DEFLECTION_FACTOR, DPI, VLIGHT_AU};

/// Denominator `1 + e·q` below which light deflection is considered singular.
const DEFLECTION_GUARD: f64 = 1e-10;

/// Rotate a vector: `m · v`.
pub fn apply_matrix(v: &Vector3<f64>, m: &Matrix3<f64>) -> Vector3<f64> {
    m * v
}

/// Apply the relativistic deflection of light by the Sun to a geocentric position.
///
/// Arguments
/// ---------
/// * `p`: geocentric position of the body [AU].
/// * `sun`: geocentric position of the Sun [AU].
///
/// Returns
/// --------
/// * The deflected position vector, or an error when the geometry is degenerate.
///
/// Formula
/// -------
/// With `e = −sun/|sun|` (Sun → observer), `q = (p − sun)/|p − sun|` (Sun → body) and
/// `g = DEFLECTION_FACTOR/|sun|`:
/// ```text
/// p' = p + g / (1 + e·q) · (e·(p·q) − q·(p·e))
/// ```
///
/// Errors
/// ------
/// * [`AlmanacError::DegenerateVector`] when the Sun sits at the observer or the body at the Sun.
/// * [`AlmanacError::LightDeflectionSingularity`] when the body is (almost) exactly behind the Sun,
///   i.e. `1 + e·q` falls below `1e-10`.
pub fn light_deflection(
    p: &Vector3<f64>,
    sun: &Vector3<f64>,
) -> Result<Vector3<f64>, AlmanacError> {
    let sun_dist = sun.norm();
    if sun_dist == 0.0 {
        return Err(AlmanacError::DegenerateVector("light_deflection (Sun position)"));
    }
    let sun_to_body = p - sun;
    let body_dist = sun_to_body.norm();
    if body_dist == 0.0 {
        return Err(AlmanacError::DegenerateVector("light_deflection (Sun → body)"));
    }

    let e = -sun / sun_dist;
    let q = sun_to_body / body_dist;

    let denominator = e.dot(&q) + 1.0;
    if denominator < DEFLECTION_GUARD {
        return Err(AlmanacError::LightDeflectionSingularity { denominator });
    }

    let g = DEFLECTION_FACTOR / sun_dist / denominator;
    Ok(p + g * (e * p.dot(&q) - q * p.dot(&e)))
}

/// Correct a position for planetary aberration (light-time, first order).
///
/// Formula
/// -------
/// ```text
/// x_corr = pos − (‖pos‖ / c) · vel
/// ```
/// where `c` is the speed of light in AU/day (`VLIGHT_AU`).
pub fn planetary_aberration(pos: &Vector3<f64>, vel: &Vector3<f64>) -> Vector3<f64> {
    let light_time = pos.norm() / VLIGHT_AU;
    pos - light_time * vel
}

/// Convert a Cartesian equatorial vector to right ascension and declination.
///
/// Returns
/// --------
/// * `(α, δ)` with α in [0, 2π) and δ in [−π/2, π/2].
///
/// Errors
/// ------
/// * [`AlmanacError::DegenerateVector`] for the zero vector.
pub fn cartesian_to_equatorial(v: &Vector3<f64>) -> Result<(Radian, Radian), AlmanacError> {
    let dist = v.norm();
    if dist == 0.0 {
        return Err(AlmanacError::DegenerateVector("cartesian_to_equatorial"));
    }
    let ra = v.y.atan2(v.x).rem_euclid(DPI);
    let dec = (v.z / dist).clamp(-1.0, 1.0).asin();
    Ok((ra, dec))
}

/// Cartesian vector of norm `r` pointing at `(ra, dec)`.
pub fn equatorial_to_cartesian(ra: Radian, dec: Radian, r: f64) -> Vector3<f64> {
    let (sd, cd) = dec.sin_cos();
    let (sa, ca) = ra.sin_cos();
    Vector3::new(r * cd * ca, r * cd * sa, r * sd)
}

/// Convert equatorial coordinates to ecliptic longitude and latitude for obliquity `eps`.
///
/// ```text
/// λ = atan2(sin δ·sin ε + cos δ·sin α·cos ε, cos α·cos δ)
/// β = asin(sin δ·cos ε − cos δ·sin α·sin ε)
/// ```
///
/// Returns
/// --------
/// * `(λ, β)` with λ in [0, 2π).
pub fn equatorial_to_ecliptic(eps: Radian, ra: Radian, dec: Radian) -> (Radian, Radian) {
    let (se, ce) = eps.sin_cos();
    let (sd, cd) = dec.sin_cos();
    let au = cd * ra.sin();

    let lon = (sd * se + au * ce).atan2(ra.cos() * cd).rem_euclid(DPI);
    let lat = (sd * ce - au * se).clamp(-1.0, 1.0).asin();
    (lon, lat)
}
