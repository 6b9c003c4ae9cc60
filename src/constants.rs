//! # Constants and type definitions for the almanac core
//!
//! This module centralizes the **physical constants**, **conversion factors**, **reference
//! epochs** and **unit type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Angular conversions (degrees, arcseconds, hours ↔ radians)
//! - Time constants (seconds per day, Julian century, reference epochs)
//! - Distances (astronomical unit, body radii) and the speed of light
//! - Relativistic light-deflection factor
//! - Unit aliases used in public signatures

// -------------------------------------------------------------------------------------------------
// Angles
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = 1.745329251994330e-2;

/// Arcseconds → radians
pub const RADSEC: f64 = 4.848136811095360e-6;

/// Arcminutes → radians
pub const RADMIN: f64 = RADEG / 60.0;

// -------------------------------------------------------------------------------------------------
// Time
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Julian Day of J2000.0 (2000-01-01 12:00:00 TDB)
pub const J2000: f64 = 2_451_545.0;

/// Julian Day of the Besselian epoch B1950.0
pub const B1950: f64 = 2_433_282.423;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2_400_000.5;

/// MJD epoch of J2000.0
pub const T2000: f64 = 51_544.5;

/// Mean synodic month in days
pub const SYNODIC_MONTH: f64 = 29.530_590_28;

// -------------------------------------------------------------------------------------------------
// Distances and physical constants
// -------------------------------------------------------------------------------------------------

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Speed of light in astronomical units per day
pub const VLIGHT_AU: f64 = 173.144_633_484_420_6;

/// 2·GM☉/c² expressed in AU, the light-deflection scale factor
pub const DEFLECTION_FACTOR: f64 = 1.974_125_722_240_729e-8;

/// Earth equatorial radius in kilometers (GRS1980/WGS84)
pub const EARTH_EQUATORIAL_RADIUS: Kilometer = 6_378.137;

/// Standard altitude of the upper limb at rise/set: zenith distance 90°34′ in radians
pub const HORIZON_ZENITH_DISTANCE: Radian = 1.580_686_525_889_531_153;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Julian Day (days)
pub type JulianDay = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
