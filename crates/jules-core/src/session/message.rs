//! Conversation messages and diagnostic log entries.
//!
//! Both are client-local: nothing here is persisted server-side.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a chat turn is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Typed locally by the user.
    User,
    /// Reported by the remote agent (or synthesized on its behalf).
    Agent,
    /// Synthesized error notice.
    Error,
}

/// A single turn in the chat transcript of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub text: String,
    /// Timestamp when the message was created locally (RFC 3339).
    pub timestamp: String,
}

impl Message {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Agent, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Error, text)
    }
}

/// Timestamped operational record. Purely observational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub text: String,
}

impl LogEntry {
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            text: text.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.text)
    }
}
