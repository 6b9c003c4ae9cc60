//! # Ephemeris provider contract
//!
//! The almanac core never computes raw geometric positions itself: it consumes them from an
//! [`EphemerisProvider`], passed by reference into every operation that needs one. A provider
//! typically wraps a JPL DE kernel; tests use analytic low-precision theories.
//!
//! Bodies are identified by the closed [`BodyId`] enumeration, which includes the fictitious
//! First Point of Aries. Aries has no state vector and is handled explicitly by the hour-angle
//! computations.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::almanac_errors::AlmanacError;
use crate::constants::{Kilometer, Radian};
use crate::earth_orientation::nutation_iau1980;
use crate::time::{centuries_since_j2000, DeltaT, Instant, Scale};

/// Bodies tabulated by the almanac.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyId {
    Sun,
    Moon,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    /// First Point of Aries: a direction, not a body. Zero distance, no state vector.
    Aries,
}

impl BodyId {
    /// NAIF integer code of the body, `None` for Aries.
    pub fn naif_id(&self) -> Option<i32> {
        match self {
            BodyId::Sun => Some(10),
            BodyId::Moon => Some(301),
            BodyId::Mercury => Some(199),
            BodyId::Venus => Some(299),
            BodyId::Earth => Some(399),
            BodyId::Mars => Some(499),
            BodyId::Jupiter => Some(599),
            BodyId::Saturn => Some(699),
            BodyId::Uranus => Some(799),
            BodyId::Neptune => Some(899),
            BodyId::Pluto => Some(999),
            BodyId::Aries => None,
        }
    }

    pub fn is_fictitious(&self) -> bool {
        matches!(self, BodyId::Aries)
    }

    /// Mean radius of the body (equatorial for the Earth), zero for Aries.
    pub fn radius(&self) -> Kilometer {
        match self {
            BodyId::Sun => 696_000.0,
            BodyId::Moon => 1_737.4,
            BodyId::Mercury => 2_439.7,
            BodyId::Venus => 6_051.8,
            BodyId::Earth => 6_378.137,
            BodyId::Mars => 3_389.5,
            BodyId::Jupiter => 69_911.0,
            BodyId::Saturn => 58_232.0,
            BodyId::Uranus => 25_362.0,
            BodyId::Neptune => 24_622.0,
            BodyId::Pluto => 1_188.3,
            BodyId::Aries => 0.0,
        }
    }
}

/// Position [AU] and velocity [AU/day] of a body relative to a center, J2000 equatorial frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// Source of geometric state vectors.
///
/// Implementations must be safe to share between threads when the caller parallelizes
/// per-day searches; caching, if any, is the provider's own business.
pub trait EphemerisProvider {
    /// State of `body` relative to `center` at `epoch` (TDB).
    ///
    /// Errors
    /// ------
    /// * [`AlmanacError::EpochOutOfRange`] when `epoch` lies outside the provider's interval.
    ///   A provider must never return zeros instead.
    /// * [`AlmanacError::FictitiousBody`] when asked for [`BodyId::Aries`].
    fn query_state(
        &self,
        epoch: Instant,
        body: BodyId,
        center: BodyId,
    ) -> Result<StateVector, AlmanacError>;

    /// Nutation in longitude and obliquity `(Δψ, Δε)` at a TDB epoch, in radians.
    ///
    /// Defaults to the IAU 1980 series; providers carrying tabulated nutations override it.
    fn nutation_angles(&self, epoch: Instant) -> Result<(Radian, Radian), AlmanacError> {
        let tt = epoch.to_scale(Scale::Tt, DeltaT::default());
        Ok(nutation_iau1980(centuries_since_j2000(tt.jd())))
    }
}

/// Geocentric state of a real body at a TDB epoch.
pub(crate) fn geocentric_state<P: EphemerisProvider + ?Sized>(
    provider: &P,
    epoch: Instant,
    body: BodyId,
) -> Result<StateVector, AlmanacError> {
    if body.is_fictitious() {
        return Err(AlmanacError::FictitiousBody(body));
    }
    provider.query_state(epoch, body, BodyId::Earth)
}

#[cfg(test)]
mod ephemeris_test {
    use super::*;
    use crate::constants::{J2000, RADSEC};
    use approx::assert_relative_eq;

    struct Empty;

    impl EphemerisProvider for Empty {
        fn query_state(
            &self,
            epoch: Instant,
            _body: BodyId,
            _center: BodyId,
        ) -> Result<StateVector, AlmanacError> {
            Err(AlmanacError::EpochOutOfRange {
                jd: epoch.jd(),
                start: 0.0,
                end: 0.0,
            })
        }
    }

    #[test]
    fn test_default_nutation_is_iau1980() {
        let (dpsi, deps) = Empty.nutation_angles(Instant::tdb(J2000)).unwrap();
        assert_relative_eq!(dpsi / RADSEC, -13.923385169502602, epsilon = 1e-6);
        assert_relative_eq!(deps / RADSEC, -5.773808263765919, epsilon = 1e-6);
    }

    #[test]
    fn test_aries_has_no_state() {
        assert_eq!(
            geocentric_state(&Empty, Instant::tdb(J2000), BodyId::Aries),
            Err(AlmanacError::FictitiousBody(BodyId::Aries))
        );
        assert!(BodyId::Aries.naif_id().is_none());
        assert_eq!(BodyId::Aries.radius(), 0.0);
    }

    #[test]
    fn test_provider_errors_propagate() {
        let err = geocentric_state(&Empty, Instant::tdb(2_460_000.5), BodyId::Moon).unwrap_err();
        assert_eq!(
            err,
            AlmanacError::EpochOutOfRange {
                jd: 2_460_000.5,
                start: 0.0,
                end: 0.0
            }
        );
    }
}
