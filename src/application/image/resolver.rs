//! Image resolvers - turn an upstream API response into a candidate image URL

use std::sync::Arc;

use scraper::{Html, Selector};
use serde::Deserialize;
use url::Url;

use crate::application::errors::ImageError;
use crate::domain::traits::HttpClient;

/// Page that renders one random post
pub const RANDOM_PAGE_PATH: &str = "/index.php?page=dapi&s=random";

/// Endpoint answering `{"url": "..."}`
pub const RANDOM_JSON_PATH: &str = "/index.php?json";

/// `/html/body/div[5]/div/div[2]/div[1]/div[2]/div[1]/img` as a CSS chain.
pub const IMAGE_NODE_SELECTOR: &str = "html > body > div:nth-of-type(5) > div > div:nth-of-type(2) \
     > div:nth-of-type(1) > div:nth-of-type(2) > div:nth-of-type(1) > img";

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Scrapes the random page and extracts the image `src` (Variant A)
pub struct HtmlResolver {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl HtmlResolver {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn page_url(&self) -> String {
        endpoint(&self.base_url, RANDOM_PAGE_PATH)
    }

    pub async fn resolve(&self) -> Result<String, ImageError> {
        let url = self.page_url();
        let response = self.http.get(&url).await?;

        if !response.is_ok() {
            return Err(ImageError::Status(response.status));
        }

        extract_image_src(&response.text())
    }
}

/// Select the image node from a random page and return its `src`
pub fn extract_image_src(html: &str) -> Result<String, ImageError> {
    let selector = Selector::parse(IMAGE_NODE_SELECTOR)
        .map_err(|e| ImageError::Parse(format!("invalid selector: {:?}", e)))?;
    let document = Html::parse_document(html);

    let node = document
        .select(&selector)
        .next()
        .ok_or_else(|| ImageError::NotFound(IMAGE_NODE_SELECTOR.to_string()))?;

    match node.value().attr("src").map(str::trim) {
        Some(src) if !src.is_empty() => Ok(src.to_string()),
        _ => Err(ImageError::EmptySource),
    }
}

#[derive(Debug, Deserialize)]
struct RandomImagePayload {
    url: Option<String>,
}

/// Queries the JSON endpoint and absolutizes the returned URL (Variant B)
pub struct JsonResolver {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl JsonResolver {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn api_url(&self) -> String {
        endpoint(&self.base_url, RANDOM_JSON_PATH)
    }

    pub async fn resolve(&self) -> Result<String, ImageError> {
        let response = self.http.get(&self.api_url()).await?;

        if !response.is_ok() {
            return Err(ImageError::Status(response.status));
        }

        let raw = parse_url_field(&response.body)?;
        absolutize(&self.base_url, &raw)
    }
}

/// Pull the `url` field out of a JSON body
pub fn parse_url_field(body: &[u8]) -> Result<String, ImageError> {
    let payload: RandomImagePayload = serde_json::from_slice(body)
        .map_err(|e| ImageError::Parse(format!("invalid JSON: {}", e)))?;

    match payload.url {
        Some(url) if !url.trim().is_empty() => Ok(url.trim().to_string()),
        _ => Err(ImageError::Parse("missing `url` field".to_string())),
    }
}

/// Rewrite an API-relative image path into an absolute URL.
///
/// `./x` and `/./x` become `{origin}/x`; absolute URLs pass through; any
/// other relative reference is joined against the API origin.
pub fn absolutize(base_url: &str, raw: &str) -> Result<String, ImageError> {
    let base = Url::parse(base_url)
        .map_err(|e| ImageError::Parse(format!("invalid base url `{}`: {}", base_url, e)))?;

    if let Some(rest) = raw.strip_prefix("/./").or_else(|| raw.strip_prefix("./")) {
        return Ok(format!("{}/{}", base.origin().ascii_serialization(), rest));
    }

    if Url::parse(raw).is_ok() {
        return Ok(raw.to_string());
    }

    base.join(raw)
        .map(String::from)
        .map_err(|e| ImageError::Parse(format!("cannot join `{}`: {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.wenturc.com";

    fn page_with_image(img: &str) -> String {
        format!(
            r#"<html><head><title>random</title></head><body>
            <div>nav</div><div>banner</div><div>search</div><div>notice</div>
            <div>
              <div>
                <div>sidebar</div>
                <div>
                  <div>
                    <div>tags</div>
                    <div>
                      <div>{}</div>
                    </div>
                  </div>
                </div>
              </div>
            </div>
            </body></html>"#,
            img
        )
    }

    #[test]
    fn test_extract_returns_node_src() {
        let html = page_with_image(r#"<img src="https://img.wenturc.com/a/b.jpg" alt="x">"#);
        assert_eq!(extract_image_src(&html).unwrap(), "https://img.wenturc.com/a/b.jpg");
    }

    #[test]
    fn test_extract_missing_node() {
        let html = "<html><body><div><img src=\"https://elsewhere/x.png\"></div></body></html>";
        assert!(matches!(extract_image_src(html), Err(ImageError::NotFound(_))));
    }

    #[test]
    fn test_extract_node_without_src() {
        let html = page_with_image(r#"<img alt="no source">"#);
        assert!(matches!(extract_image_src(&html), Err(ImageError::EmptySource)));

        let html = page_with_image(r#"<img src="  ">"#);
        assert!(matches!(extract_image_src(&html), Err(ImageError::EmptySource)));
    }

    #[test]
    fn test_extract_ignores_images_outside_path() {
        // A decoy under the fourth div must not be picked
        let html = page_with_image(r#"<img src="https://img.wenturc.com/real.png">"#)
            .replace("<div>notice</div>", r#"<div><img src="https://decoy/x.png"></div>"#);
        assert_eq!(extract_image_src(&html).unwrap(), "https://img.wenturc.com/real.png");
    }

    #[test]
    fn test_absolutize_dot_slash() {
        assert_eq!(absolutize(BASE, "./img/1.jpg").unwrap(), "https://api.wenturc.com/img/1.jpg");
        assert_eq!(absolutize(BASE, "/./img/1.jpg").unwrap(), "https://api.wenturc.com/img/1.jpg");
    }

    #[test]
    fn test_absolutize_uses_origin_not_path() {
        let base = "https://api.wenturc.com/deep/path/";
        assert_eq!(absolutize(base, "./img/1.jpg").unwrap(), "https://api.wenturc.com/img/1.jpg");
    }

    #[test]
    fn test_absolutize_passes_absolute_through() {
        assert_eq!(absolutize(BASE, "https://x/y.png").unwrap(), "https://x/y.png");
    }

    #[test]
    fn test_absolutize_joins_other_relative() {
        assert_eq!(absolutize(BASE, "/img/2.png").unwrap(), "https://api.wenturc.com/img/2.png");
    }

    #[test]
    fn test_parse_url_field() {
        assert_eq!(parse_url_field(br#"{"url": "./img/1.jpg"}"#).unwrap(), "./img/1.jpg");
        assert!(matches!(parse_url_field(br#"{"code": 200}"#), Err(ImageError::Parse(_))));
        assert!(matches!(parse_url_field(br#"{"url": ""}"#), Err(ImageError::Parse(_))));
        assert!(matches!(parse_url_field(b"<html>"), Err(ImageError::Parse(_))));
    }
}
