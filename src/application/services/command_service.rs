use crate::domain::entities::{Command, CommandRegistry, Message, Content};
use crate::application::errors::CommandError;

/// Name of the built-in help command
pub const HELP_COMMAND: &str = "help";
/// Name of the built-in version command
pub const VERSION_COMMAND: &str = "version";

/// Service for registering commands and resolving messages to them
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    pub fn register_defaults(&mut self) {
        self.register(Command::new(HELP_COMMAND)
            .with_description("显示指令列表")
            .with_usage(format!("{}help [command]", self.prefix)));

        self.register(Command::new(VERSION_COMMAND)
            .with_description("显示版本"));
    }

    /// Resolve a message to its command. `Ok(None)` for plain text.
    pub fn resolve(&self, message: &Message) -> Result<Option<&Command>, CommandError> {
        let Content::Command { name, .. } = &message.content else {
            return Ok(None);
        };

        self.registry.find(name)
            .map(Some)
            .ok_or_else(|| CommandError::NotFound(name.clone()))
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            if let Some(cmd) = self.registry.find(name) {
                let mut help = format!("{}{} - {}", self.prefix, cmd.name, cmd.description.as_deref().unwrap_or("暂无说明"));
                if !cmd.aliases.is_empty() {
                    help.push_str(&format!("\n别名: {}", cmd.aliases.join(", ")));
                }
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\n用法: {}", usage));
                }
                return help;
            }
            return format!("未找到指令 {}{}", self.prefix, name);
        }

        let mut help = "可用指令:\n".to_string();
        for cmd in self.registry.all() {
            help.push_str(&format!("  {}{} - {}\n", self.prefix, cmd.name, cmd.description.as_deref().unwrap_or("")));
        }
        help
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
