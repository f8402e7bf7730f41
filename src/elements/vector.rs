use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use super::error::ElementsError;

pub const ELEMENT_COUNT: usize = 6;

/// The six classical Keplerian elements, in the order the simulator reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElementVector {
    /// Mean motion (rad/s)
    pub mean_motion: f64,
    pub eccentricity: f64,
    /// Inclination (rad), within [0, π]
    pub inclination: f64,
    /// Longitude of the ascending node (rad), within [0, 2π)
    pub longitude_of_ascending_node: f64,
    /// Argument of periapsis (rad), within [0, 2π)
    pub argument_of_periapsis: f64,
    /// Mean anomaly at epoch (rad), within [0, 2π)
    pub mean_anomaly: f64,
}

impl OrbitalElementVector {
    /// Wire layout: `[mean_motion, eccentricity, inclination, RAAN, argument_of_periapsis, mean_anomaly]`.
    pub fn to_array(&self) -> [f64; ELEMENT_COUNT] {
        [
            self.mean_motion,
            self.eccentricity,
            self.inclination,
            self.longitude_of_ascending_node,
            self.argument_of_periapsis,
            self.mean_anomaly,
        ]
    }

    /// Read a wire array back, rejecting any slot outside its range.
    pub fn from_array(elements: [f64; ELEMENT_COUNT]) -> Result<Self, ElementsError> {
        let vector = Self {
            mean_motion: elements[0],
            eccentricity: elements[1],
            inclination: elements[2],
            longitude_of_ascending_node: elements[3],
            argument_of_periapsis: elements[4],
            mean_anomaly: elements[5],
        };
        vector.validate()?;
        Ok(vector)
    }

    pub fn validate(&self) -> Result<(), ElementsError> {
        check_mean_motion(self.mean_motion)?;
        check_eccentricity(self.eccentricity)?;
        check_inclination(self.inclination)?;
        check_angle("longitude_of_ascending_node", self.longitude_of_ascending_node)?;
        check_angle("argument_of_periapsis", self.argument_of_periapsis)?;
        check_angle("mean_anomaly", self.mean_anomaly)?;
        Ok(())
    }
}

pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<f64, ElementsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ElementsError::NotFinite { field })
    }
}

pub(crate) fn check_mean_motion(value: f64) -> Result<f64, ElementsError> {
    check_finite("mean_motion", value)?;
    if value <= 0.0 {
        return Err(ElementsError::OutOfRange {
            field: "mean_motion",
            value,
            range: "(0, inf)",
        });
    }
    Ok(value)
}

pub(crate) fn check_eccentricity(value: f64) -> Result<f64, ElementsError> {
    check_finite("eccentricity", value)?;
    if !(0.0..1.0).contains(&value) {
        return Err(ElementsError::OutOfRange {
            field: "eccentricity",
            value,
            range: "[0, 1)",
        });
    }
    Ok(value)
}

pub(crate) fn check_inclination(value: f64) -> Result<f64, ElementsError> {
    check_finite("inclination", value)?;
    if !(0.0..=PI).contains(&value) {
        return Err(ElementsError::OutOfRange {
            field: "inclination",
            value,
            range: "[0, pi]",
        });
    }
    Ok(value)
}

fn check_angle(field: &'static str, value: f64) -> Result<f64, ElementsError> {
    check_finite(field, value)?;
    if !(0.0..TAU).contains(&value) {
        return Err(ElementsError::OutOfRange {
            field,
            value,
            range: "[0, 2pi)",
        });
    }
    Ok(value)
}

/// Fold any finite angle into [0, 2π).
pub(crate) fn wrap_angle(field: &'static str, value: f64) -> Result<f64, ElementsError> {
    let wrapped = check_finite(field, value)?.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly 2π
    if wrapped >= TAU {
        Ok(0.0)
    } else {
        Ok(wrapped)
    }
}
