//! Image pipeline - resolve, fetch, respond

pub mod fetcher;
pub mod resolver;
pub mod responder;

pub use fetcher::{FetchedImage, ImageFetcher};
pub use resolver::{HtmlResolver, JsonResolver};
pub use responder::{send_file_chain, url_reply, TempImage};
