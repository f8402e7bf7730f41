use thiserror::Error;

use crate::elements::ElementsError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("plan needs at least one plane and one satellite per plane")]
    Empty,
    #[error("phasing factor {phasing} must be below the plane count {planes}")]
    Phasing { phasing: u32, planes: u32 },
    #[error("invalid orbit: {0}")]
    Elements(#[from] ElementsError),
}
