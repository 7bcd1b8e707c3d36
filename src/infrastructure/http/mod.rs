//! reqwest-backed HTTP client

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use std::time::Duration;

use crate::application::errors::{BotError, ImageError};
use crate::domain::traits::{HttpClient, HttpResponse};
use crate::infrastructure::config::HttpConfig;

/// Redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, BotError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| BotError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ImageError> {
        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageError::Network(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| ImageError::Network(format!("Failed to read body: {}", e)))?;

        Ok(HttpResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}
