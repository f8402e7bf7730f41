use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementsError {
    #[error("apogee ({apogee} km) is below perigee ({perigee} km)")]
    ApsidesOrder { apogee: f64, perigee: f64 },
    #[error("apsis distances must be positive (apogee {apogee} km, perigee {perigee} km)")]
    NonPositiveApsis { apogee: f64, perigee: f64 },
    #[error("{field} = {value} is outside {range}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        range: &'static str,
    },
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
    #[error("mean motion has not been set")]
    MeanMotionUnset,
}
