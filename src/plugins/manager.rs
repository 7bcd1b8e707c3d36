//! Plugin manager - handles plugin registration and execution

use crate::application::errors::BotError;
use crate::domain::entities::Command;
use crate::plugins::trait_def::{Plugin, PluginContext};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn, error};

/// Manages all plugins for the bot
#[derive(Default)]
pub struct PluginManager {
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) -> Result<(), BotError> {
        self.register_arc(Arc::new(plugin))
    }

    pub fn register_arc(&mut self, plugin: Arc<dyn Plugin>) -> Result<(), BotError> {
        let name = plugin.name().to_string();

        if self.plugins.contains_key(&name) {
            return Err(BotError::Plugin(format!("Plugin '{}' already registered", name)));
        }

        info!("Registering plugin: {}", name);
        self.plugins.insert(name, plugin);
        Ok(())
    }

    /// Commands of every registered plugin, tagged with their owner
    pub fn commands(&self) -> Vec<Command> {
        self.plugins
            .iter()
            .flat_map(|(name, plugin)| {
                plugin.commands()
                    .into_iter()
                    .map(move |cmd| cmd.with_plugin(name.clone()))
            })
            .collect()
    }

    /// Execute a plugin by name
    pub async fn execute(&self, name: &str, ctx: &PluginContext<'_>) -> Result<(), BotError> {
        let Some(plugin) = self.plugins.get(name) else {
            warn!("Plugin '{}' not found", name);
            return Err(BotError::Plugin(format!("Plugin '{}' not found", name)));
        };

        plugin.handle(ctx).await.map_err(|e| {
            error!("Plugin '{}' error: {}", name, e);
            e
        })
    }

    /// List all registered plugins, sorted by name
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        let mut list: Vec<PluginInfo> = self.plugins.iter().map(|(name, plugin)| {
            PluginInfo {
                name: name.clone(),
                description: plugin.description().to_string(),
                metadata: plugin.metadata(),
            }
        }).collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        list
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Plugin information for listing
#[derive(Debug, Clone, serde::Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub metadata: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Dummy(&'static str);

    #[async_trait]
    impl Plugin for Dummy {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "dummy"
        }

        fn commands(&self) -> Vec<Command> {
            vec![Command::new(format!("{}_cmd", self.0))]
        }

        async fn handle(&self, _ctx: &PluginContext<'_>) -> Result<(), BotError> {
            Ok(())
        }
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut manager = PluginManager::new();
        assert!(manager.register(Dummy("a")).is_ok());
        assert!(manager.register(Dummy("a")).is_err());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_commands_are_tagged_with_owner() {
        let mut manager = PluginManager::new();
        manager.register(Dummy("a")).unwrap();
        manager.register(Dummy("b")).unwrap();

        let mut owners: Vec<(String, Option<String>)> = manager.commands()
            .into_iter()
            .map(|c| (c.name, c.plugin))
            .collect();
        owners.sort();
        assert_eq!(owners, vec![
            ("a_cmd".to_string(), Some("a".to_string())),
            ("b_cmd".to_string(), Some("b".to_string())),
        ]);
    }

    #[test]
    fn test_list_plugins_sorted() {
        let mut manager = PluginManager::new();
        manager.register(Dummy("zeta")).unwrap();
        manager.register(Dummy("alpha")).unwrap();

        let names: Vec<String> = manager.list_plugins().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
