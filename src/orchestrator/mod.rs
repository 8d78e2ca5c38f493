pub mod report;
pub mod team;

pub use report::{Stage, TeamReport};
pub use team::{SpecialistMode, Team};
