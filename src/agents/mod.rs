pub mod agent;
pub mod roster;
pub mod types;

pub use agent::Agent;
pub use roster::{COORDINATOR, ROSTER, SPECIALISTS};
pub use types::AgentResponse;
