//! Prompt types for the scholar CLI.
//!
//! Domain entities for conversation turns and the retrieved passages that
//! feed the answering prompt.

use serde::{Deserialize, Serialize};

/// Who produced a conversation turn.
///
/// Serialized as "User"/"Bot", which is also how turns are rendered into
/// the prompt transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Bot,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRole::User => write!(f, "User"),
            ChatRole::Bot => write!(f, "Bot"),
        }
    }
}

/// One turn of the in-memory conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    /// A turn spoken by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// A turn answered by the model.
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Bot,
            content: content.into(),
        }
    }
}

/// A retrieved passage presented to the model as article context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextPassage {
    /// Document the passage came from
    pub source: String,

    /// Passage text
    pub text: String,
}

impl ContextPassage {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}
