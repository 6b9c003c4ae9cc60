//! Numerical core of a nautical almanac: time scales, precession-nutation, apparent places of
//! the Sun, Moon, planets and stars, and the event searches (lunar phases, rise and set,
//! meridian transit) built on them.
//!
//! Geometric positions come from an [`ephemeris::EphemerisProvider`] supplied by the caller.

pub mod almanac_errors;
pub mod apparent;
pub mod config;
pub mod constants;
pub mod earth_orientation;
pub mod ephemeris;
pub mod event_solver;
pub mod phenomena;
pub mod ref_system;
pub mod time;
