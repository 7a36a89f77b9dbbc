pub mod fixtures;
pub mod model;
pub mod plan;

pub use plan::{plan, Plan, PlanInput};
