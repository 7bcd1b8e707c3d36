//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Errors: Typed errors per layer and per image stage
//! - Image: Resolve, fetch and respond stages
//! - Services: Command registry, cooldown gate
//! - Messaging: Message parsing, dispatching

pub mod errors;
pub mod image;
pub mod services;
pub mod messaging;
