//! Turns and Conversations
//!
//! A Turn is one message tagged with its speaker. A Conversation is the
//! in-memory ordered list of Turns used for rendering and for building the
//! next model prompt. It always starts with exactly one synthesized system
//! Turn, which is never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain-restriction instruction sent to the model as the first Turn
pub const SYSTEM_INSTRUCTION: &str = "You are an expert construction assistant. \
You will ONLY answer questions strictly related to construction, including materials, BOQ, codes, \
contracts, safety, construction methods, and project management. If a user asks anything unrelated \
to construction, you MUST reply exactly with: 'I can answer only construction-related queries.' \
Do NOT provide any other information.";

/// Speaker of a Turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Lowercase name, as stored in the `role` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Capitalized name used in the model transcript
    pub fn label(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }

    /// Parse a stored role name. Returns None for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// The fixed system Turn. Synthesized on every load, never stored, so the
/// instruction wording can change without migrating history.
pub fn fixed_system_turn() -> Turn {
    Turn::new(Role::System, SYSTEM_INSTRUCTION)
}

/// Ordered list of Turns, headed by the fixed system Turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// A conversation holding only the system Turn
    pub fn seeded() -> Self {
        Self {
            turns: vec![fixed_system_turn()],
        }
    }

    /// System Turn followed by the given history, in order.
    ///
    /// History is taken as-is: a stored `system` Turn is kept as an ordinary
    /// entry and is not deduplicated against the synthesized one.
    pub fn from_history(history: Vec<Turn>) -> Self {
        let mut turns = Vec::with_capacity(history.len() + 1);
        turns.push(fixed_system_turn());
        turns.extend(history);
        Self { turns }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All Turns including the system Turn
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns shown in the scrollback (everything after the system Turn)
    pub fn visible(&self) -> &[Turn] {
        &self.turns[1..]
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when nothing beyond the system Turn has been said
    pub fn is_empty(&self) -> bool {
        self.turns.len() <= 1
    }

    /// Render as `"<Role>: <content>"` lines joined by newlines, one per Turn
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role.label(), t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_has_only_system_turn() {
        let convo = Conversation::seeded();
        assert_eq!(convo.len(), 1);
        assert_eq!(convo.turns()[0].role, Role::System);
        assert!(convo.visible().is_empty());
        assert!(convo.is_empty());
    }

    #[test]
    fn test_from_history_prepends_system_turn() {
        let convo = Conversation::from_history(vec![
            Turn::user("steel grades?"),
            Turn::assistant("Fe415 and Fe500 are common."),
        ]);

        assert_eq!(convo.len(), 3);
        assert_eq!(convo.turns()[0], fixed_system_turn());
        assert_eq!(convo.visible()[0].content, "steel grades?");
        assert_eq!(convo.visible()[1].role, Role::Assistant);
    }

    #[test]
    fn test_stored_system_turn_is_not_special_cased() {
        let convo = Conversation::from_history(vec![Turn::new(Role::System, "old instruction")]);
        let system_count = convo
            .turns()
            .iter()
            .filter(|t| t.role == Role::System)
            .count();
        assert_eq!(system_count, 2);
    }

    #[test]
    fn test_transcript_format() {
        let mut convo = Conversation::seeded();
        convo.push(Turn::user("cement ratio for M20?"));
        convo.push(Turn::assistant("1:1.5:3"));

        let transcript = convo.transcript();
        let lines: Vec<&str> = transcript.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("System: You are an expert construction assistant."));
        assert_eq!(lines[1], "User: cement ratio for M20?");
        assert_eq!(lines[2], "Assistant: 1:1.5:3");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
        assert_eq!(Role::parse("system"), Some(Role::System));
        assert_eq!(Role::parse("User"), None);
        assert_eq!(Role::parse("tool"), None);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Turn::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
