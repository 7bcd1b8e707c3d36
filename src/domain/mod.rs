//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (User, Message, Command, Reply)
//! - Traits: Abstractions for infrastructure (Bot, HttpClient, Clock)

pub mod entities;
pub mod traits;
