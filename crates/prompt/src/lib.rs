//! Prompt system for the scholar CLI.
//!
//! This crate assembles the prompt sent to the generative model:
//! - Handlebars template rendering (plain text, escaping disabled)
//! - Retrieved passages rendered as per-article context blocks
//! - In-memory conversation transcript injection

pub mod builder;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, build_prompt_with_instruction, ANSWER_INSTRUCTION};
pub use types::{ChatRole, ChatTurn, ContextPassage};
