//! BDD step definitions for the tech tracker client

pub mod common_steps;
pub mod update_steps;
