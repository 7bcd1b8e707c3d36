//! Application services - Business logic orchestration

pub mod command_service;
pub mod cooldown;

pub use command_service::CommandService;
pub use cooldown::{CooldownActive, CooldownGate};
