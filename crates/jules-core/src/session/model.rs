//! Session domain model and the request/response shapes around it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::source::SourceContext;

/// Server-authoritative lifecycle state of a session.
///
/// Unknown values are kept verbatim so a newer server never breaks decoding;
/// they are treated as in-progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionState {
    #[default]
    Unspecified,
    Created,
    Queued,
    Planning,
    AwaitingPlanApproval,
    AwaitingUserFeedback,
    Running,
    InProgress,
    Paused,
    Completed,
    Failed,
    Other(String),
}

impl SessionState {
    /// `COMPLETED` and `FAILED` end a session for good.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unspecified => "STATE_UNSPECIFIED",
            Self::Created => "CREATED",
            Self::Queued => "QUEUED",
            Self::Planning => "PLANNING",
            Self::AwaitingPlanApproval => "AWAITING_PLAN_APPROVAL",
            Self::AwaitingUserFeedback => "AWAITING_USER_FEEDBACK",
            Self::Running => "RUNNING",
            Self::InProgress => "IN_PROGRESS",
            Self::Paused => "PAUSED",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for SessionState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "" | "STATE_UNSPECIFIED" => Self::Unspecified,
            "CREATED" => Self::Created,
            "QUEUED" => Self::Queued,
            "PLANNING" => Self::Planning,
            "AWAITING_PLAN_APPROVAL" => Self::AwaitingPlanApproval,
            "AWAITING_USER_FEEDBACK" => Self::AwaitingUserFeedback,
            "RUNNING" => Self::Running,
            "IN_PROGRESS" => Self::InProgress,
            "PAUSED" => Self::Paused,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            _ => Self::Other(raw),
        }
    }
}

impl From<SessionState> for String {
    fn from(state: SessionState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A server-owned unit of work bound to one source.
///
/// The client never writes `state`; it only observes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Resource name (`sessions/{id}`), the primary key.
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_context: Option<SourceContext>,
    #[serde(default)]
    pub state: SessionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Session {
    /// Minimal session value, mostly useful for fakes and tests.
    pub fn new(name: impl Into<String>, state: SessionState) -> Self {
        let name = name.into();
        let id = name.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            name,
            id,
            title: String::new(),
            prompt: String::new(),
            source_context: None,
            state,
            url: None,
            create_time: None,
            update_time: None,
        }
    }
}

/// Body of `createSession`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub prompt: String,
    pub source_context: SourceContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_plan_approval: Option<bool>,
}

impl CreateSessionRequest {
    pub fn new(prompt: impl Into<String>, source_context: SourceContext) -> Self {
        Self {
            prompt: prompt.into(),
            source_context,
            title: None,
            require_plan_approval: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_plan_approval(mut self, required: bool) -> Self {
        self.require_plan_approval = Some(required);
        self
    }
}

/// One page of `listSessions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSessionsResponse {
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Body of `sendMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub prompt: String,
}

/// Reply of `sendMessage`. The server usually returns `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Maps a bare id or a full resource name to the `sessions/{id}` path.
pub fn session_path(session: &str) -> String {
    if session.starts_with("sessions/") {
        session.to_string()
    } else {
        format!("sessions/{session}")
    }
}
