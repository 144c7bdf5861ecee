//! UI-agnostic conversation types
//!
//! This module contains data structures that are shared between the core
//! session logic and any front-end rendering it, without depending on a
//! specific UI framework.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Opaque identifier for a turn, unique for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

/// The author of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// A single message in the conversation.
///
/// Fields are private so a turn cannot be edited once it has been created;
/// the role in particular is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    id: TurnId,
    text: String,
    role: ChatRole,
    created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            text: text.into(),
            role,
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, text)
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> ChatRole {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
