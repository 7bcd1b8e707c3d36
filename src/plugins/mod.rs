//! Plugin system
//! 
//! Plugins own one or more commands and answer them through the `Bot` they
//! are handed at dispatch time.

pub mod manager;
pub mod metadata;
pub mod random_image;
pub mod trait_def;
pub mod wenturc;

pub use manager::{PluginInfo, PluginManager};
pub use random_image::RandomImagePlugin;
pub use trait_def::{Plugin, PluginContext};
pub use wenturc::WenturcPlugin;
