mod error;
mod plan;

pub use error::PlanError;
pub use plan::ConstellationPlan;
