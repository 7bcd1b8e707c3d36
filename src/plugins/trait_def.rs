//! Plugin trait definitions

use async_trait::async_trait;
use std::collections::HashMap;

use crate::application::errors::BotError;
use crate::domain::entities::{Command, Message, Reply};
use crate::domain::traits::Bot;

/// What a plugin sees while handling one command
pub struct PluginContext<'a> {
    pub message: &'a Message,
    /// Canonical name of the matched command (aliases already resolved)
    pub command: &'a str,
    pub bot: &'a dyn Bot,
}

impl<'a> PluginContext<'a> {
    pub fn new(message: &'a Message, command: &'a str, bot: &'a dyn Bot) -> Self {
        Self { message, command, bot }
    }

    /// Send a reply to the chat the command came from
    pub async fn reply(&self, reply: Reply) -> Result<String, BotError> {
        self.bot.send_reply(&self.message.chat_id, &reply).await
    }

    pub async fn reply_text(&self, text: impl Into<String> + Send) -> Result<String, BotError> {
        self.reply(Reply::plain(text)).await
    }
}

/// Core plugin trait that all plugins must implement
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique identifier for the plugin
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// Commands this plugin answers to
    fn commands(&self) -> Vec<Command>;

    /// Handle one command invocation.
    ///
    /// User-facing failures are replied as text and return `Ok`; `Err` is
    /// reserved for failures to reach the user at all.
    async fn handle(&self, ctx: &PluginContext<'_>) -> Result<(), BotError>;

    /// Optional: Get plugin metadata
    fn metadata(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}
