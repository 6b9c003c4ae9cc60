//! # Almanac phenomena
//!
//! Event searches built on the [`event_solver`](crate::event_solver) and the apparent places
//! of [`apparent`](crate::apparent):
//!
//! * [`lunar_phase`]: instants of the four principal lunar phases over a year.
//! * [`rise_set`]: rise and set of a body or a star for an observer.
//! * [`meridian`]: upper transit across the Greenwich meridian, with a fixed fallback.
//! * [`hour_angle`]: Greenwich hour angles, including the First Point of Aries.
//! * [`disk`]: semi-diameter and horizontal parallax.
//! * [`magnitude`]: visual magnitude of the planets.
//!
//! Every search takes the ephemeris provider by reference and the TT − UT1 offset explicitly,
//! so independent days or bodies can be computed on separate threads.

use serde::{Deserialize, Serialize};

use crate::almanac_errors::AlmanacError;
use crate::apparent::FixedStar;
use crate::constants::{Degree, Radian, RADEG};
use crate::ephemeris::BodyId;

pub mod disk;
pub mod hour_angle;
pub mod lunar_phase;
pub mod magnitude;
pub mod meridian;
pub mod rise_set;

/// Geographic position of an observer on the Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    latitude: Radian,
    longitude: Radian,
}

impl Observer {
    /// Create an observer.
    ///
    /// Arguments
    /// ---------
    /// * `latitude`: geodetic latitude [rad], north positive, in [−π/2, π/2].
    /// * `longitude`: longitude [rad], east positive, in [−π, π].
    ///
    /// Errors
    /// ------
    /// * [`AlmanacError::InvalidObserver`] for out-of-range or non-finite coordinates.
    pub fn new(latitude: Radian, longitude: Radian) -> Result<Self, AlmanacError> {
        if latitude.is_nan() || latitude.abs() > std::f64::consts::FRAC_PI_2 {
            return Err(AlmanacError::InvalidObserver(format!(
                "latitude {latitude} rad outside [-π/2, π/2]"
            )));
        }
        if longitude.is_nan() || longitude.abs() > std::f64::consts::PI {
            return Err(AlmanacError::InvalidObserver(format!(
                "longitude {longitude} rad outside [-π, π]"
            )));
        }
        Ok(Observer {
            latitude,
            longitude,
        })
    }

    /// Same as [`Observer::new`] with coordinates in degrees.
    pub fn from_degrees(latitude: Degree, longitude: Degree) -> Result<Self, AlmanacError> {
        Observer::new(latitude * RADEG, longitude * RADEG)
    }

    pub fn latitude(&self) -> Radian {
        self.latitude
    }

    pub fn longitude(&self) -> Radian {
        self.longitude
    }
}

/// What an event search is about: a solar-system body (or Aries) or a catalogue star.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    Body(BodyId),
    Star(FixedStar),
}

impl From<BodyId> for Target {
    fn from(body: BodyId) -> Self {
        Target::Body(body)
    }
}

impl From<FixedStar> for Target {
    fn from(star: FixedStar) -> Self {
        Target::Star(star)
    }
}
