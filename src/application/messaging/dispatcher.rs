//! Message dispatcher - Routes messages to plugins

use std::sync::Arc;
use crate::domain::entities::{Message, Content, User};
use crate::domain::traits::Bot;
use crate::application::errors::{BotError, CommandError};
use crate::application::services::CommandService;
use crate::application::services::command_service::{HELP_COMMAND, VERSION_COMMAND};
use crate::plugins::{Plugin, PluginContext, PluginManager};
use super::parser::MessageParser;

/// Message dispatcher - parses text, finds the command and runs its plugin
pub struct MessageDispatcher {
    parser: MessageParser,
    commands: CommandService,
    plugins: PluginManager,
}

impl MessageDispatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let mut commands = CommandService::new(prefix.clone());
        commands.register_defaults();

        Self {
            parser: MessageParser::new(prefix),
            commands,
            plugins: PluginManager::new(),
        }
    }

    /// Register a plugin together with its commands
    pub fn register_plugin<P: Plugin + 'static>(&mut self, plugin: P) -> Result<(), BotError> {
        let plugin: Arc<dyn Plugin> = Arc::new(plugin);
        let name = plugin.name().to_string();
        let commands = plugin.commands();

        self.plugins.register_arc(plugin)?;
        for command in commands {
            self.commands.register(command.with_plugin(name.clone()));
        }
        Ok(())
    }

    pub fn commands(&self) -> &CommandService {
        &self.commands
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    /// Process a raw text message
    pub async fn process_text(
        &self,
        bot: &dyn Bot,
        chat_id: impl Into<String>,
        text: impl Into<String>,
        sender: Option<User>,
    ) -> Result<(), BotError> {
        let message = self
            .parser
            .parse(chat_id, text, sender)
            .with_platform(bot.platform());
        self.dispatch(bot, &message).await
    }

    /// Route a parsed message to its handler
    pub async fn dispatch(&self, bot: &dyn Bot, message: &Message) -> Result<(), BotError> {
        let command = match self.commands.resolve(message) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(()),
            Err(CommandError::NotFound(name)) => {
                tracing::debug!("[{}] Ignoring unknown command: {}", message.chat_id, name);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            "[{}/{}] {} -> {}{}",
            message.platform,
            message.chat_id,
            message.sender_id(),
            self.commands.prefix(),
            command.name
        );

        match &command.plugin {
            Some(plugin) => {
                let ctx = PluginContext::new(message, &command.name, bot);
                self.plugins.execute(plugin, &ctx).await
            }
            None => self.run_builtin(bot, message, &command.name).await,
        }
    }

    async fn run_builtin(&self, bot: &dyn Bot, message: &Message, name: &str) -> Result<(), BotError> {
        let text = match name {
            HELP_COMMAND => self.help_text(message),
            VERSION_COMMAND => format!("random-image-bot v{}", env!("CARGO_PKG_VERSION")),
            other => return Err(CommandError::ExecutionFailed(format!("no handler for {}", other)).into()),
        };

        bot.send_message(&message.chat_id, &text).await?;
        Ok(())
    }

    fn help_text(&self, message: &Message) -> String {
        let topic = match &message.content {
            Content::Command { args, .. } => args.first().map(String::as_str),
            _ => None,
        };

        let mut help = self.commands.get_help(topic);
        if topic.is_none() && !self.plugins.is_empty() {
            help.push_str("插件:\n");
            for info in self.plugins.list_plugins() {
                let version = info.metadata.get("version").map(String::as_str).unwrap_or("-");
                help.push_str(&format!("  {} v{} - {}\n", info.name, version, info.description));
            }
        }
        help
    }
}
