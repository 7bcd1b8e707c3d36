//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Message, Content, User};

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Message::new(chat_id, Content::Empty)
                .with_raw_text(text)
                .with_sender_opt(sender);
        }

        if !self.command_prefix.is_empty() && trimmed.starts_with(&self.command_prefix) {
            return self.parse_command(chat_id, &text, sender);
        }

        Message::from_text(chat_id, text).with_sender_opt(sender)
    }

    /// Parse a command message
    fn parse_command(&self, chat_id: String, text: &str, sender: Option<User>) -> Message {
        let cmd_text = text.trim()
            .strip_prefix(&self.command_prefix)
            .unwrap_or_default();

        // Split command and arguments
        let mut parts = cmd_text.split_whitespace();
        let name = parts.next().unwrap_or_default().to_string();
        let args = parts.map(str::to_string).collect();

        Message::new(chat_id, Content::Command { name, args })
            .with_raw_text(text)
            .with_sender_opt(sender)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_with_args() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("c1", "/setu --json", Some(User::new("u1")));

        assert_eq!(msg.content, Content::Command { name: "setu".to_string(), args: vec!["--json".to_string()] });
        assert_eq!(msg.raw_text, "/setu --json");
        assert_eq!(msg.sender_id(), "u1");
    }

    #[test]
    fn test_parse_unicode_alias() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("c1", "  /小姐姐 ", None);
        assert_eq!(msg.content.command_name(), Some("小姐姐"));
    }

    #[test]
    fn test_parse_plain_text() {
        let parser = MessageParser::new("/");
        let msg = parser.parse("c1", "setu please", None);
        assert_eq!(msg.content, Content::Text("setu please".to_string()));
    }

    #[test]
    fn test_custom_prefix() {
        let parser = MessageParser::new("#");
        assert!(parser.parse("c1", "#rimg", None).content.is_command());
        assert!(!parser.parse("c1", "/rimg", None).content.is_command());
    }

    #[test]
    fn test_parse_empty() {
        let parser = MessageParser::new("/");
        assert_eq!(parser.parse("c1", "   ", None).content, Content::Empty);
    }
}
