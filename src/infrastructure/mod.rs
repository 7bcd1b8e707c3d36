//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Http: reqwest-backed HttpClient
//! - Adapters: Platform integrations (console)

pub mod config;
pub mod http;
pub mod adapters;
