//! Chat transcript types.

use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Status notes from the session itself
    System,
    /// Questions typed by the user
    User,
    /// Replies from the response engine
    Assistant,
}

impl Role {
    /// Get the display name for this role.
    pub fn name(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(rename = "content")]
    pub text: String,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

/// Ordered, append-only transcript. The only way to remove messages is
/// [`ChatSession::reset`], which leaves a single system message behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Start a transcript with one system message.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(greeting)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        log::trace!("💬 [{}] {}", message.role.name(), message.text);
        self.messages.push(message);
    }

    /// Drop every message and start over with a single system message.
    pub fn reset(&mut self, greeting: impl Into<String>) {
        self.messages.clear();
        self.messages.push(ChatMessage::system(greeting));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_single_system_message() {
        let chat = ChatSession::new("hello");
        assert_eq!(chat.messages(), &[ChatMessage::system("hello")]);
    }

    #[test]
    fn test_push_preserves_order() {
        let mut chat = ChatSession::new("hello");
        chat.push(ChatMessage::user("q"));
        chat.push(ChatMessage::assistant("a"));
        let roles: Vec<Role> = chat.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }

    #[test]
    fn test_reset() {
        let mut chat = ChatSession::new("hello");
        chat.push(ChatMessage::user("q"));
        chat.reset("cleared");
        assert_eq!(chat.len(), 1);
        assert_eq!(chat.last(), Some(&ChatMessage::system("cleared")));
    }

    #[test]
    fn test_message_json_shape() {
        let json = serde_json::to_string(&ChatMessage::user("hi")).expect("serialize");
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
