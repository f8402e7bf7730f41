use serde::{Deserialize, Serialize};

use super::constants::{EARTH_MEAN_RADIUS_KM, EARTH_MU_KM3_S2};
use super::error::ElementsError;
use super::vector::{
    check_eccentricity, check_finite, check_inclination, check_mean_motion, wrap_angle,
    OrbitalElementVector,
};

/// A satellite ready to be sent to the simulator.
///
/// Values are owned snapshots: nothing here points back into the builder
/// that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    pub id: String,
    pub elements: OrbitalElementVector,
}

/// Mutable scratchpad for orbital elements.
///
/// A single builder is meant to be reused: set the shared elements once,
/// then vary one or two slots between [`build`](Self::build) calls.
#[derive(Debug, Clone, Default)]
pub struct OrbitalElementBuilder {
    id: String,
    elements: OrbitalElementVector,
}

impl OrbitalElementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    pub fn set_mean_motion(&mut self, value: f64) -> Result<&mut Self, ElementsError> {
        self.elements.mean_motion = check_mean_motion(value)?;
        Ok(self)
    }

    pub fn set_eccentricity(&mut self, value: f64) -> Result<&mut Self, ElementsError> {
        self.elements.eccentricity = check_eccentricity(value)?;
        Ok(self)
    }

    pub fn set_inclination(&mut self, value: f64) -> Result<&mut Self, ElementsError> {
        self.elements.inclination = check_inclination(value)?;
        Ok(self)
    }

    pub fn set_longitude_of_ascending_node(
        &mut self,
        value: f64,
    ) -> Result<&mut Self, ElementsError> {
        self.elements.longitude_of_ascending_node =
            wrap_angle("longitude_of_ascending_node", value)?;
        Ok(self)
    }

    pub fn set_argument_of_periapsis(&mut self, value: f64) -> Result<&mut Self, ElementsError> {
        self.elements.argument_of_periapsis = wrap_angle("argument_of_periapsis", value)?;
        Ok(self)
    }

    pub fn set_mean_anomaly(&mut self, value: f64) -> Result<&mut Self, ElementsError> {
        self.elements.mean_anomaly = wrap_angle("mean_anomaly", value)?;
        Ok(self)
    }

    /// Derive eccentricity and mean motion from the apsis distances.
    ///
    /// Both distances are measured from the centre of the Earth, in km.
    /// `apogee == perigee` describes a circular orbit. Only the mean motion
    /// and eccentricity slots are touched.
    pub fn set_apogee_perigee(
        &mut self,
        apogee: f64,
        perigee: f64,
    ) -> Result<&mut Self, ElementsError> {
        check_finite("apogee", apogee)?;
        check_finite("perigee", perigee)?;
        if apogee <= 0.0 || perigee <= 0.0 {
            return Err(ElementsError::NonPositiveApsis { apogee, perigee });
        }
        if apogee < perigee {
            return Err(ElementsError::ApsidesOrder { apogee, perigee });
        }

        // e = (ra - rp) / (ra + rp)
        // n = sqrt(mu / a^3), a = (ra + rp) / 2
        let eccentricity = (apogee - perigee) / (apogee + perigee);
        let semi_major_axis = (apogee + perigee) / 2.0;
        let mean_motion = (EARTH_MU_KM3_S2 / semi_major_axis.powi(3)).sqrt();

        self.elements.eccentricity = check_eccentricity(eccentricity)?;
        self.elements.mean_motion = check_mean_motion(mean_motion)?;
        Ok(self)
    }

    /// Same as [`set_apogee_perigee`](Self::set_apogee_perigee), with both
    /// values given as altitudes above the mean Earth radius.
    pub fn set_apogee_perigee_altitudes(
        &mut self,
        apogee_altitude: f64,
        perigee_altitude: f64,
    ) -> Result<&mut Self, ElementsError> {
        self.set_apogee_perigee(
            apogee_altitude + EARTH_MEAN_RADIUS_KM,
            perigee_altitude + EARTH_MEAN_RADIUS_KM,
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn elements(&self) -> &OrbitalElementVector {
        &self.elements
    }

    /// Snapshot the current state into an independent [`Satellite`].
    pub fn build(&self) -> Result<Satellite, ElementsError> {
        if self.elements.mean_motion == 0.0 {
            return Err(ElementsError::MeanMotionUnset);
        }
        self.elements.validate()?;
        Ok(Satellite {
            id: self.id.clone(),
            elements: self.elements,
        })
    }
}
