//! Responder - turns resolved images into outbound replies

use std::path::{Path, PathBuf};

use crate::application::errors::{BotError, ImageError};
use crate::domain::entities::Reply;
use crate::domain::traits::Bot;

/// Base name of downloaded images in the temp directory
pub const TEMP_FILE_BASE: &str = "random_image";

/// File extension for a declared image content type
pub fn extension_for(content_type: &str) -> &'static str {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        _ => ".jpg",
    }
}

/// Image-by-URL reply, or the URL wrapped as JSON text when `as_json` is set
pub fn url_reply(src: &str, as_json: bool) -> Reply {
    if as_json {
        Reply::plain(serde_json::json!({ "url": src }).to_string())
    } else {
        Reply::image_url(src)
    }
}

/// A downloaded image on disk, deleted when released.
///
/// Call [`TempImage::remove`] once the file is no longer needed; dropping an
/// unreleased guard removes the file synchronously.
#[derive(Debug)]
pub struct TempImage {
    path: PathBuf,
    released: bool,
}

impl TempImage {
    pub async fn write(dir: &Path, content_type: &str, bytes: &[u8]) -> Result<Self, ImageError> {
        let file_name = format!(
            "{}_{}{}",
            TEMP_FILE_BASE,
            uuid::Uuid::new_v4().simple(),
            extension_for(content_type)
        );
        let path = dir.join(file_name);

        if let Err(e) = tokio::fs::write(&path, bytes).await {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(ImageError::Filesystem(e));
        }

        tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(Self { path, released: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file; failures are logged, never returned
    pub async fn remove(mut self) {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::debug!("Removed temp file {}", self.path.display()),
            Err(e) => tracing::warn!("Failed to remove temp file {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove temp file {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Send `@user caption [file]` and delete the file whatever the send outcome
pub async fn send_file_chain(
    bot: &dyn Bot,
    chat_id: &str,
    user_id: &str,
    caption: &str,
    image: TempImage,
) -> Result<String, BotError> {
    let reply = Reply::new()
        .mention(user_id)
        .text(caption)
        .file(image.path());

    let sent = bot.send_reply(chat_id, &reply).await;
    image.remove().await;
    sent
}
