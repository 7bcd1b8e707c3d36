//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use crate::domain::entities::{Reply, Segment, User};
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

pub const PLATFORM: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    user: User,
    lines: Mutex<Lines<BufReader<Stdin>>>,
    next_id: AtomicU64,
}

impl ConsoleAdapter {
    pub fn new(user: User) -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "random-image-bot".to_string(),
                username: "console".to_string(),
            },
            user,
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            next_id: AtomicU64::new(1),
        }
    }

    /// The user every console line is attributed to
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Prompt and read one line; `None` on EOF
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        let mut stdout = tokio::io::stdout();
        if let Err(e) = stdout.write_all(prompt.as_bytes()).await {
            tracing::debug!("Failed to write prompt: {}", e);
        }
        if let Err(e) = stdout.flush().await {
            tracing::debug!("Failed to flush stdout: {}", e);
        }

        match self.lines.lock().await.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read stdin: {}", e);
                None
            }
        }
    }
}

/// Render a reply chain as one line of terminal text
pub fn render(reply: &Reply) -> String {
    reply.segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain(text) => text.clone(),
            Segment::Mention(user_id) => format!("@{}", user_id),
            Segment::ImageUrl(url) => format!("[图片] {}", url),
            Segment::ImageFile(path) => {
                let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
                format!("[文件] {} ({} bytes)", path.display(), size)
            }
        })
        .collect()
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_reply(&self, _chat_id: &str, reply: &Reply) -> Result<String, BotError> {
        println!("[BOT] {}", render(reply));
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Ok(format!("console_msg_{}", id))
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }

    fn platform(&self) -> &str {
        PLATFORM
    }
}
