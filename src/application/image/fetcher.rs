//! Image fetcher - downloads a resolved image under a concurrency cap

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::application::errors::ImageError;
use crate::domain::traits::HttpClient;

/// Downloaded image bytes plus the declared content type
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct ImageFetcher {
    http: Arc<dyn HttpClient>,
    permits: Arc<Semaphore>,
}

impl ImageFetcher {
    pub fn new(http: Arc<dyn HttpClient>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            http,
            permits: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Permits currently free
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub async fn fetch(&self, url: &str) -> Result<FetchedImage, ImageError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ImageError::Network("fetch limiter closed".to_string()))?;

        tracing::debug!("Fetching image: {}", url);
        let response = self.http.get(url).await?;

        if !response.is_ok() {
            return Err(ImageError::Status(response.status));
        }

        let content_type = response.content_type.unwrap_or_default();
        if !content_type.contains("image") {
            let declared = if content_type.is_empty() {
                "missing content type".to_string()
            } else {
                content_type
            };
            return Err(ImageError::ContentType(declared));
        }

        Ok(FetchedImage {
            bytes: response.body,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::HttpResponse;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticHttp(HttpResponse);

    #[async_trait]
    impl HttpClient for StaticHttp {
        async fn get(&self, _url: &str) -> Result<HttpResponse, ImageError> {
            Ok(self.0.clone())
        }
    }

    /// Tracks how many requests are in flight at once
    #[derive(Default)]
    struct SlowHttp {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl HttpClient for SlowHttp {
        async fn get(&self, _url: &str) -> Result<HttpResponse, ImageError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(HttpResponse::new(200, vec![0xFF, 0xD8]).with_content_type("image/jpeg"))
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_bytes_and_type() {
        let http = StaticHttp(HttpResponse::new(200, vec![1, 2, 3]).with_content_type("image/png"));
        let fetcher = ImageFetcher::new(Arc::new(http), 5);

        let image = fetcher.fetch("https://x/y.png").await.unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_status() {
        let http = StaticHttp(HttpResponse::new(404, "gone").with_content_type("text/html"));
        let fetcher = ImageFetcher::new(Arc::new(http), 5);

        assert!(matches!(fetcher.fetch("https://x/y.png").await, Err(ImageError::Status(404))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_image() {
        let http = StaticHttp(HttpResponse::new(200, "<html>").with_content_type("text/html; charset=utf-8"));
        let fetcher = ImageFetcher::new(Arc::new(http), 5);

        match fetcher.fetch("https://x/y.png").await {
            Err(ImageError::ContentType(ct)) => assert!(ct.starts_with("text/html")),
            other => panic!("expected content type error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_missing_content_type() {
        let fetcher = ImageFetcher::new(Arc::new(StaticHttp(HttpResponse::new(200, vec![1]))), 5);
        assert!(matches!(fetcher.fetch("https://x/y").await, Err(ImageError::ContentType(_))));
    }

    #[tokio::test]
    async fn test_fetch_respects_concurrency_cap() {
        let http = Arc::new(SlowHttp::default());
        let fetcher = Arc::new(ImageFetcher::new(http.clone(), 2));

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..8 {
            let fetcher = fetcher.clone();
            tasks.spawn(async move { fetcher.fetch(&format!("https://x/{}.jpg", i)).await });
        }
        while let Some(result) = tasks.join_next().await {
            assert!(result.unwrap().is_ok());
        }

        assert!(http.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(fetcher.available(), 2);
    }
}
