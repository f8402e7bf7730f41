use std::f64::consts::TAU;

use serde::Deserialize;

use crate::elements::{OrbitalElementBuilder, Satellite};

use super::error::PlanError;

/// Walker-style constellation: `planes` evenly spaced nodes, each carrying
/// `satellites_per_plane` evenly spaced slots.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConstellationPlan {
    #[serde(default)]
    pub name: Option<String>,
    pub apogee_altitude_km: f64,
    pub perigee_altitude_km: f64,
    pub inclination_deg: f64,
    #[serde(default)]
    pub argument_of_periapsis_deg: f64,
    pub planes: u32,
    pub satellites_per_plane: u32,
    /// Walker phasing factor F, shifts each plane by F * 2π / T
    #[serde(default)]
    pub phasing: u32,
}

impl ConstellationPlan {
    pub fn from_file(path: &str) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, PlanError> {
        let plan: ConstellationPlan = serde_yaml::from_str(yaml)?;
        plan.check()?;
        Ok(plan)
    }

    pub fn total(&self) -> usize {
        self.planes as usize * self.satellites_per_plane as usize
    }

    fn check(&self) -> Result<(), PlanError> {
        if self.planes == 0 || self.satellites_per_plane == 0 {
            return Err(PlanError::Empty);
        }
        if self.phasing >= self.planes {
            return Err(PlanError::Phasing {
                phasing: self.phasing,
                planes: self.planes,
            });
        }
        Ok(())
    }

    /// Expand the plan, ids are `{name}_{plane}_{slot}`.
    pub fn satellites(&self) -> Result<Vec<Satellite>, PlanError> {
        self.check()?;

        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("constellation-{}", uuid::Uuid::new_v4()));

        let mut builder = OrbitalElementBuilder::new();
        builder
            .set_apogee_perigee_altitudes(self.apogee_altitude_km, self.perigee_altitude_km)?
            .set_inclination(self.inclination_deg.to_radians())?
            .set_argument_of_periapsis(self.argument_of_periapsis_deg.to_radians())?;

        let planes = f64::from(self.planes);
        let per_plane = f64::from(self.satellites_per_plane);
        let total = planes * per_plane;

        let mut satellites = Vec::with_capacity(self.total());
        for plane in 0..self.planes {
            builder.set_longitude_of_ascending_node(TAU * f64::from(plane) / planes)?;
            let offset = TAU * f64::from(self.phasing) * f64::from(plane) / total;
            for slot in 0..self.satellites_per_plane {
                builder
                    .set_mean_anomaly(TAU * f64::from(slot) / per_plane + offset)?
                    .set_id(format!("{}_{}_{}", name, plane, slot));
                satellites.push(builder.build()?);
            }
        }

        log::debug!("Expanded plan {} into {} satellites", name, satellites.len());
        Ok(satellites)
    }
}
