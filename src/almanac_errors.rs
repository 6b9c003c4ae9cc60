use thiserror::Error;

use crate::ephemeris::BodyId;

#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("Degenerate vector (zero norm) passed to {0}")]
    DegenerateVector(&'static str),

    #[error("Light deflection is singular: body lies behind the Sun (1 + e·q = {denominator:e})")]
    LightDeflectionSingularity { denominator: f64 },

    #[error("Epoch JD {jd} outside the ephemeris interval [{start}, {end}]")]
    EpochOutOfRange { jd: f64, start: f64, end: f64 },

    #[error("Ephemeris provider failure: {0}")]
    EphemerisUnavailable(String),

    #[error("No state vector exists for the fictitious body {0:?}")]
    FictitiousBody(BodyId),

    #[error("Invalid calendar date: {0}")]
    InvalidCalendarDate(String),

    #[error("Invalid solver parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid observer: {0}")]
    InvalidObserver(String),
}

impl PartialEq for AlmanacError {
    fn eq(&self, other: &Self) -> bool {
        use AlmanacError::*;
        match (self, other) {
            (DegenerateVector(a), DegenerateVector(b)) => a == b,
            (
                LightDeflectionSingularity { denominator: a },
                LightDeflectionSingularity { denominator: b },
            ) => a.to_bits() == b.to_bits(),
            (
                EpochOutOfRange {
                    jd: a,
                    start: sa,
                    end: ea,
                },
                EpochOutOfRange {
                    jd: b,
                    start: sb,
                    end: eb,
                },
            ) => a == b && sa == sb && ea == eb,
            (EphemerisUnavailable(a), EphemerisUnavailable(b)) => a == b,
            (FictitiousBody(a), FictitiousBody(b)) => a == b,
            (InvalidCalendarDate(a), InvalidCalendarDate(b)) => a == b,
            (InvalidParams(a), InvalidParams(b)) => a == b,
            (InvalidObserver(a), InvalidObserver(b)) => a == b,
            _ => false,
        }
    }
}
