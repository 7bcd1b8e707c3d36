use super::User;
use chrono::{DateTime, Utc};

/// Parsed message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Command { name: String, args: Vec<String> },
    Empty,
}

impl Content {
    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }

    pub fn command_name(&self) -> Option<&str> {
        match self {
            Content::Command { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// An incoming message; read-only to plugins
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender: Option<User>,
    pub content: Content,
    /// Text exactly as the user typed it, before command parsing
    pub raw_text: String,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, content: Content) -> Self {
        let raw_text = match &content {
            Content::Text(s) => s.clone(),
            Content::Command { name, args } if args.is_empty() => name.clone(),
            Content::Command { name, args } => format!("{} {}", name, args.join(" ")),
            Content::Empty => String::new(),
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender: None,
            content,
            raw_text,
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
        }
    }

    pub fn from_text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(chat_id, Content::Text(text.into()))
    }

    pub fn from_command(chat_id: impl Into<String>, name: impl Into<String>, args: Vec<String>) -> Self {
        Self::new(chat_id, Content::Command { name: name.into(), args })
    }

    pub fn with_sender(mut self, user: User) -> Self {
        self.sender = Some(user);
        self
    }

    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }

    pub fn with_raw_text(mut self, text: impl Into<String>) -> Self {
        self.raw_text = text.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Sender id, falling back to the chat id for anonymous sources
    pub fn sender_id(&self) -> &str {
        self.sender
            .as_ref()
            .map(|u| u.id.as_str())
            .unwrap_or(&self.chat_id)
    }

    /// Whether `flag` appears anywhere in the raw text, ignoring case
    pub fn has_flag(&self, flag: &str) -> bool {
        self.raw_text.to_lowercase().contains(&flag.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_flag_is_case_insensitive() {
        let msg = Message::from_text("c1", "/setu --JSON");
        assert!(msg.has_flag("--json"));
        assert!(!Message::from_text("c1", "/setu").has_flag("--json"));
    }

    #[test]
    fn test_sender_id_falls_back_to_chat() {
        let msg = Message::from_command("c1", "setu", vec![]);
        assert_eq!(msg.sender_id(), "c1");
        assert_eq!(msg.with_sender(User::new("u1")).sender_id(), "u1");
    }
}
