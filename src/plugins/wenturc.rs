//! Random image by HTML scrape, answered as an image URL

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::{BotError, ImageError};
use crate::application::image::{url_reply, HtmlResolver};
use crate::domain::entities::{Command, Reply};
use crate::domain::traits::HttpClient;
use crate::plugins::metadata;
use crate::plugins::trait_def::{Plugin, PluginContext};

pub const PLUGIN_NAME: &str = "wenturc";

/// Trigger words, all routed to the same handler
pub const TRIGGERS: [&str; 9] = ["小姐姐", "setu", "黑丝", "白丝", "玉足", "美女", "rimg", "色图", "涩图"];

/// Replies with the raw URL as JSON text instead of an image
pub const JSON_FLAG: &str = "--json";

pub struct WenturcPlugin {
    resolver: HtmlResolver,
}

impl WenturcPlugin {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            resolver: HtmlResolver::new(http, base_url),
        }
    }

    fn error_text(err: &ImageError) -> String {
        match err {
            ImageError::Status(code) => format!("请求随机图片出错: 请求失败，状态码: {}", code),
            ImageError::Network(msg) => format!("请求随机图片出错: {}", msg),
            ImageError::NotFound(_) => "未能通过XPath找到随机图片。".to_string(),
            ImageError::EmptySource => "图片链接为空。".to_string(),
            other => format!("解析随机图片时出错: {}", other),
        }
    }
}

#[async_trait]
impl Plugin for WenturcPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn description(&self) -> &str {
        metadata::DESCRIPTION
    }

    fn commands(&self) -> Vec<Command> {
        vec![Command::new(PLUGIN_NAME)
            .with_description("从 wenturc 随机抓取一张图片")
            .with_aliases(TRIGGERS)
            .with_usage(format!("setu [{}]", JSON_FLAG))]
    }

    async fn handle(&self, ctx: &PluginContext<'_>) -> Result<(), BotError> {
        let as_json = ctx.message.has_flag(JSON_FLAG);

        let reply = match self.resolver.resolve().await {
            Ok(src) => {
                tracing::debug!("Resolved wenturc image: {}", src);
                url_reply(&src, as_json)
            }
            Err(e) => {
                tracing::warn!("wenturc resolve failed: {}", e);
                Reply::plain(Self::error_text(&e))
            }
        };

        ctx.reply(reply).await?;
        Ok(())
    }

    fn metadata(&self) -> HashMap<String, String> {
        metadata::wenturc_metadata()
    }
}
