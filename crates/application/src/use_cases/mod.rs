//! Application use cases (business logic orchestration).

mod execute_scenario;

pub use execute_scenario::{ExecuteScenario, ExecuteScenarioError};
