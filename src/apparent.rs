//! # Apparent places
//!
//! Reduction of the geometric geocentric J2000 vectors delivered by an [`EphemerisProvider`]
//! into apparent places: gravitational light deflection, planetary aberration, then the
//! precession-nutation rotation to the true equator and equinox of date.
//!
//! Every function takes the epoch as an [`Instant`] on any scale together with the TT − UT1
//! offset; the frame polynomials run on TT (as TDB centuries) and the provider is queried in TDB.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::almanac_errors::AlmanacError;
use crate::constants::{Radian, B1950};
use crate::earth_orientation::{
    mean_obliquity, precess_coordinates, precession_matrix, precession_nutation_matrix,
};
use crate::ephemeris::{geocentric_state, BodyId, EphemerisProvider};
use crate::ref_system::{
    apply_matrix, cartesian_to_equatorial, equatorial_to_cartesian, equatorial_to_ecliptic,
    light_deflection, planetary_aberration,
};
use crate::time::{centuries_since_j2000, tt_to_tdb, DeltaT, Instant, Scale};

/// Which corrections are applied on the way to the true frame of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Reduction {
    /// Light deflection (except for the Sun), planetary aberration, precession-nutation.
    #[default]
    Full,
    /// Planetary aberration and precession-nutation.
    NoDeflection,
    /// Precession-nutation of the geometric vector only.
    RotationOnly,
}

/// Apparent geocentric vector in the true equator and equinox of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApparentPlace {
    pub position: Vector3<f64>,
    /// True geometric distance [AU]
    pub distance: f64,
    /// Nutation in longitude used for the rotation [rad]
    pub dpsi: Radian,
    /// Nutation in obliquity used for the rotation [rad]
    pub deps: Radian,
}

/// Right ascension, declination [rad] and distance [AU].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Equatorial {
    pub ra: Radian,
    pub dec: Radian,
    pub distance: f64,
}

/// Ecliptic longitude, latitude [rad] and distance [AU].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ecliptic {
    pub lon: Radian,
    pub lat: Radian,
    pub distance: f64,
}

/// A catalogue star, mean place at J2000.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStar {
    pub ra: Radian,
    pub dec: Radian,
}

/// Time arguments shared by every reduction: the TDB query epoch and `T` for the polynomials.
struct Epochs {
    tdb: Instant,
    t: f64,
}

fn epochs(epoch: Instant, delta_t: DeltaT) -> Epochs {
    let tt = epoch.to_scale(Scale::Tt, delta_t).jd();
    Epochs {
        tdb: Instant::tdb(tt_to_tdb(tt)),
        t: centuries_since_j2000(tt),
    }
}

/// Deflection (skipped for the Sun) followed by planetary aberration, in the J2000 frame.
fn deflect_and_aberrate<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: BodyId,
    tdb: Instant,
    position: Vector3<f64>,
    velocity: Vector3<f64>,
) -> Result<Vector3<f64>, AlmanacError> {
    let position = if body == BodyId::Sun {
        position
    } else {
        let sun = geocentric_state(provider, tdb, BodyId::Sun)?;
        light_deflection(&position, &sun.position)?
    };
    Ok(planetary_aberration(&position, &velocity))
}

/// Compute the apparent geocentric place of a body.
///
/// Arguments
/// ---------
/// * `provider`: source of geometric states and nutation angles.
/// * `body`: any real body; [`BodyId::Aries`] is rejected.
/// * `epoch`: instant of observation, any scale.
/// * `delta_t`: TT − UT1.
/// * `reduction`: corrections to apply, see [`Reduction`].
///
/// Returns
/// --------
/// * The apparent vector in the true equator and equinox of date, the true geometric
///   distance and the nutation angles used.
///
/// # See also
/// * [`equatorial_apparent`] and [`ecliptic_apparent`] – spherical forms of the same place
pub fn apparent_place<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: BodyId,
    epoch: Instant,
    delta_t: DeltaT,
    reduction: Reduction,
) -> Result<ApparentPlace, AlmanacError> {
    let Epochs { tdb, t } = epochs(epoch, delta_t);
    let (dpsi, deps) = provider.nutation_angles(tdb)?;
    let pn = precession_nutation_matrix(t, dpsi, deps);

    let state = geocentric_state(provider, tdb, body)?;
    let distance = state.position.norm();

    let corrected = match reduction {
        Reduction::Full => {
            deflect_and_aberrate(provider, body, tdb, state.position, state.velocity)?
        }
        Reduction::NoDeflection => planetary_aberration(&state.position, &state.velocity),
        Reduction::RotationOnly => state.position,
    };

    Ok(ApparentPlace {
        position: apply_matrix(&corrected, &pn),
        distance,
        dpsi,
        deps,
    })
}

/// Apparent right ascension and declination of a body, with its true distance.
///
/// [`BodyId::Aries`] is accepted here and returns the true equinox itself:
/// `(0, 0)` at zero distance.
pub fn equatorial_apparent<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: BodyId,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<Equatorial, AlmanacError> {
    if body.is_fictitious() {
        return Ok(Equatorial {
            ra: 0.0,
            dec: 0.0,
            distance: 0.0,
        });
    }
    let place = apparent_place(provider, body, epoch, delta_t, Reduction::Full)?;
    let (ra, dec) = cartesian_to_equatorial(&place.position)?;
    Ok(Equatorial {
        ra,
        dec,
        distance: place.distance,
    })
}

/// Apparent ecliptic longitude and latitude of a body, referred to the true obliquity `ε₀ + Δε`.
pub fn ecliptic_apparent<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: BodyId,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<Ecliptic, AlmanacError> {
    let place = apparent_place(provider, body, epoch, delta_t, Reduction::Full)?;
    let (ra, dec) = cartesian_to_equatorial(&place.position)?;

    let t = epochs(epoch, delta_t).t;
    let (lon, lat) = equatorial_to_ecliptic(mean_obliquity(t) + place.deps, ra, dec);
    Ok(Ecliptic {
        lon,
        lat,
        distance: place.distance,
    })
}

/// Deflected and aberrated vector left in the J2000 frame, with the true distance.
pub fn apparent_j2000<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: BodyId,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<(Vector3<f64>, f64), AlmanacError> {
    let tdb = epochs(epoch, delta_t).tdb;
    let state = geocentric_state(provider, tdb, body)?;
    let corrected = deflect_and_aberrate(provider, body, tdb, state.position, state.velocity)?;
    Ok((corrected, state.position.norm()))
}

/// Precession matrix to B1950 combined with the nutation of the observation epoch `tdb`.
fn b1950_matrix<P: EphemerisProvider + ?Sized>(
    provider: &P,
    tdb: Instant,
) -> Result<Matrix3<f64>, AlmanacError> {
    let (dpsi, deps) = provider.nutation_angles(tdb)?;
    Ok(precession_nutation_matrix(centuries_since_j2000(B1950), dpsi, deps))
}

/// Geometric vector rotated to the equator and equinox of B1950, nutation taken at `epoch`.
pub fn geometric_b1950<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: BodyId,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<Vector3<f64>, AlmanacError> {
    let tdb = epochs(epoch, delta_t).tdb;
    let state = geocentric_state(provider, tdb, body)?;
    Ok(apply_matrix(&state.position, &b1950_matrix(provider, tdb)?))
}

/// Deflected and aberrated vector in the B1950 frame of [`geometric_b1950`], with the true
/// distance.
pub fn apparent_b1950<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: BodyId,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<(Vector3<f64>, f64), AlmanacError> {
    let tdb = epochs(epoch, delta_t).tdb;
    let (corrected, distance) = apparent_j2000(provider, body, epoch, delta_t)?;
    Ok((apply_matrix(&corrected, &b1950_matrix(provider, tdb)?), distance))
}

/// Geometric vector precessed (no nutation) to the mean equator and equinox of B1950.
pub fn mean_b1950<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: BodyId,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<(Vector3<f64>, f64), AlmanacError> {
    let tdb = epochs(epoch, delta_t).tdb;
    let state = geocentric_state(provider, tdb, body)?;
    let p = precession_matrix(centuries_since_j2000(B1950));
    Ok((apply_matrix(&state.position, &p), state.position.norm()))
}

/// Mean B1950 right ascension and declination, obtained by precessing the geometric J2000
/// direction on the sphere.
pub fn equatorial_b1950<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: BodyId,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<Equatorial, AlmanacError> {
    let tdb = epochs(epoch, delta_t).tdb;
    let state = geocentric_state(provider, tdb, body)?;
    let (ra0, dec0) = cartesian_to_equatorial(&state.position)?;
    let (ra, dec) = precess_coordinates(centuries_since_j2000(B1950), ra0, dec0);
    Ok(Equatorial {
        ra,
        dec,
        distance: state.position.norm(),
    })
}

/// True place of date of a catalogue star: its J2000 direction rotated by precession-nutation.
///
/// The distance is reported as infinite so that disk corrections vanish.
pub fn star_true_place<P: EphemerisProvider + ?Sized>(
    provider: &P,
    star: &FixedStar,
    epoch: Instant,
    delta_t: DeltaT,
) -> Result<Equatorial, AlmanacError> {
    let Epochs { tdb, t } = epochs(epoch, delta_t);
    let (dpsi, deps) = provider.nutation_angles(tdb)?;
    let pn = precession_nutation_matrix(t, dpsi, deps);
    let direction = apply_matrix(&equatorial_to_cartesian(star.ra, star.dec, 1.0), &pn);
    let (ra, dec) = cartesian_to_equatorial(&direction)?;
    Ok(Equatorial {
        ra,
        dec,
        distance: f64::INFINITY,
    })
}
