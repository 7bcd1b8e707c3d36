use std::path::PathBuf;

/// One component of an outbound message chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    /// Mention a user by id
    Mention(String),
    /// Image the platform downloads by itself
    ImageUrl(String),
    /// Image uploaded from a local file
    ImageFile(PathBuf),
}

impl Segment {
    pub fn kind(&self) -> &str {
        match self {
            Segment::Plain(_) => "plain",
            Segment::Mention(_) => "at",
            Segment::ImageUrl(_) => "image",
            Segment::ImageFile(_) => "file",
        }
    }
}

/// An outbound message: an ordered chain of segments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub segments: Vec<Segment>,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new().text(text)
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::ImageUrl(url.into())],
        }
    }

    pub fn mention(mut self, user_id: impl Into<String>) -> Self {
        self.segments.push(Segment::Mention(user_id.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Plain(text.into()));
        self
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.segments.push(Segment::ImageFile(path.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Concatenated plain-text segments
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Plain(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_image(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::ImageUrl(_) | Segment::ImageFile(_)))
    }
}
