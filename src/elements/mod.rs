mod builder;
mod constants;
mod error;
mod vector;

pub use builder::{OrbitalElementBuilder, Satellite};
pub use constants::{EARTH_MEAN_RADIUS_KM, EARTH_MU_KM3_S2};
pub use error::ElementsError;
pub use vector::{OrbitalElementVector, ELEMENT_COUNT};
