pub mod config;
pub mod error;
pub mod types;

pub use config::PlannerConfig;
pub use error::{PlannerError, PlannerResult};
