//! Random image by JSON API, downloaded and sent as a file attachment

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::application::errors::{BotError, ImageError};
use crate::application::image::{send_file_chain, ImageFetcher, JsonResolver, TempImage};
use crate::application::services::CooldownGate;
use crate::domain::entities::Command;
use crate::domain::traits::HttpClient;
use crate::plugins::metadata;
use crate::plugins::trait_def::{Plugin, PluginContext};

pub const PLUGIN_NAME: &str = "random_image";
pub const COMMAND: &str = "random_image";
pub const HELP_COMMAND: &str = "random_image_help";

/// Caption placed between the mention and the image
pub const DEFAULT_CAPTION: &str = " 这是你要的随机图片～";

/// Which stage of a delivery failed
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("resolve failed: {0}")]
    Resolve(#[source] ImageError),

    #[error("fetch failed: {0}")]
    Fetch(#[source] ImageError),

    #[error("store failed: {0}")]
    Store(#[source] ImageError),

    #[error("send failed: {0}")]
    Send(#[source] BotError),
}

impl DeliveryError {
    /// Text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            DeliveryError::Resolve(e) => format!("获取随机图片地址失败: {}", e),
            DeliveryError::Fetch(ImageError::ContentType(ct)) => {
                format!("下载图片失败: 返回的内容不是图片 ({})", ct)
            }
            DeliveryError::Fetch(e) => format!("下载图片失败: {}", e),
            DeliveryError::Store(e) => format!("保存图片失败: {}", e),
            DeliveryError::Send(e) => format!("发送图片失败: {}", e),
        }
    }
}

pub struct RandomImagePlugin {
    resolver: JsonResolver,
    fetcher: ImageFetcher,
    cooldown: CooldownGate,
    temp_dir: PathBuf,
    caption: String,
    prefix: String,
}

impl RandomImagePlugin {
    pub fn new(
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        max_concurrent: usize,
        cooldown: CooldownGate,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver: JsonResolver::new(http.clone(), base_url),
            fetcher: ImageFetcher::new(http, max_concurrent),
            cooldown,
            temp_dir: temp_dir.into(),
            caption: DEFAULT_CAPTION.to_string(),
            prefix: "/".to_string(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Command prefix shown in the help text
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn cooldown(&self) -> &CooldownGate {
        &self.cooldown
    }

    pub fn help_text(&self) -> String {
        format!(
            "随机图片插件\n\
             {}{} - 获取一张随机图片\n\
             {}{} - 显示本帮助\n\
             每位用户每 {} 秒只能使用一次。",
            self.prefix,
            COMMAND,
            self.prefix,
            HELP_COMMAND,
            self.cooldown.window().as_secs()
        )
    }

    /// Resolve, download, store and send. The temp file never outlives this call.
    async fn deliver(&self, ctx: &PluginContext<'_>) -> Result<(), DeliveryError> {
        let url = self.resolver.resolve().await.map_err(DeliveryError::Resolve)?;
        let image = self.fetcher.fetch(&url).await.map_err(DeliveryError::Fetch)?;
        let file = TempImage::write(&self.temp_dir, &image.content_type, &image.bytes)
            .await
            .map_err(DeliveryError::Store)?;

        send_file_chain(
            ctx.bot,
            &ctx.message.chat_id,
            ctx.message.sender_id(),
            &self.caption,
            file,
        )
        .await
        .map_err(DeliveryError::Send)?;

        Ok(())
    }
}

#[async_trait]
impl Plugin for RandomImagePlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn description(&self) -> &str {
        metadata::DESCRIPTION
    }

    fn commands(&self) -> Vec<Command> {
        vec![
            Command::new(COMMAND)
                .with_description("获取一张随机图片（以文件发送）")
                .with_usage(format!("{}{}", self.prefix, COMMAND)),
            Command::new(HELP_COMMAND)
                .with_description("随机图片插件帮助"),
        ]
    }

    async fn handle(&self, ctx: &PluginContext<'_>) -> Result<(), BotError> {
        if ctx.command == HELP_COMMAND {
            ctx.reply_text(self.help_text()).await?;
            return Ok(());
        }

        let user_id = ctx.message.sender_id();

        if let Err(active) = self.cooldown.check(user_id) {
            tracing::debug!("User {} is cooling down ({:.1}s left)", user_id, active.remaining_secs());
            ctx.reply_text(format!("冷却中，请在 {:.1} 秒后再试。", active.remaining_secs())).await?;
            return Ok(());
        }

        match self.deliver(ctx).await {
            Ok(()) => {
                self.cooldown.record(user_id);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("random_image for {} failed: {}", user_id, e);
                ctx.reply_text(e.user_message()).await?;
                Ok(())
            }
        }
    }

    fn metadata(&self) -> HashMap<String, String> {
        metadata::wenturc_metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_error_messages() {
        let err = DeliveryError::Fetch(ImageError::ContentType("text/html".to_string()));
        assert!(err.user_message().contains("text/html"));

        let err = DeliveryError::Resolve(ImageError::Parse("missing `url` field".to_string()));
        assert!(err.user_message().starts_with("获取随机图片地址失败"));
    }
}
