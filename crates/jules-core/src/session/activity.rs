//! Activities: immutable, server-appended records of a session's history.

use serde::Deserialize;
use serde_json::Value;

/// What an activity is about.
///
/// The wire format carries exactly one payload field per activity; it is
/// folded into this sum type so consumers match instead of probing fields.
/// [`ActivityKind::Unknown`] covers payloads this client does not know yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityKind {
    AgentMessaged { text: String },
    UserMessaged { text: String },
    PlanGenerated,
    PlanApproved,
    ProgressUpdated { title: String, description: String },
    SessionCompleted,
    SessionFailed { reason: String },
    Unknown,
}

impl ActivityKind {
    /// Short label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AgentMessaged { .. } => "agentMessaged",
            Self::UserMessaged { .. } => "userMessaged",
            Self::PlanGenerated => "planGenerated",
            Self::PlanApproved => "planApproved",
            Self::ProgressUpdated { .. } => "progressUpdated",
            Self::SessionCompleted => "sessionCompleted",
            Self::SessionFailed { .. } => "sessionFailed",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ActivityRecord")]
pub struct Activity {
    pub name: String,
    /// Unique within the session; the dedup key.
    pub id: String,
    pub create_time: Option<String>,
    pub originator: Option<String>,
    pub kind: ActivityKind,
}

impl Activity {
    pub fn new(id: impl Into<String>, kind: ActivityKind) -> Self {
        let id = id.into();
        Self {
            name: String::new(),
            id,
            create_time: None,
            originator: None,
            kind,
        }
    }

    pub fn agent_message(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, ActivityKind::AgentMessaged { text: text.into() })
    }
}

/// Raw wire shape of an activity.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    create_time: Option<String>,
    #[serde(default)]
    originator: Option<String>,
    #[serde(default)]
    agent_messaged: Option<AgentMessaged>,
    #[serde(default)]
    user_messaged: Option<UserMessaged>,
    #[serde(default)]
    plan_generated: Option<Value>,
    #[serde(default)]
    plan_approved: Option<Value>,
    #[serde(default)]
    progress_updated: Option<ProgressUpdated>,
    #[serde(default)]
    session_completed: Option<Value>,
    #[serde(default)]
    session_failed: Option<SessionFailed>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AgentMessaged {
    #[serde(default)]
    agent_message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserMessaged {
    #[serde(default)]
    user_message: String,
}

#[derive(Deserialize)]
struct ProgressUpdated {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct SessionFailed {
    #[serde(default)]
    reason: String,
}

impl From<ActivityRecord> for Activity {
    fn from(record: ActivityRecord) -> Self {
        let kind = if let Some(agent) = record.agent_messaged {
            ActivityKind::AgentMessaged {
                text: agent.agent_message,
            }
        } else if let Some(user) = record.user_messaged {
            ActivityKind::UserMessaged {
                text: user.user_message,
            }
        } else if record.plan_generated.is_some() {
            ActivityKind::PlanGenerated
        } else if record.plan_approved.is_some() {
            ActivityKind::PlanApproved
        } else if let Some(progress) = record.progress_updated {
            ActivityKind::ProgressUpdated {
                title: progress.title,
                description: progress.description,
            }
        } else if record.session_completed.is_some() {
            ActivityKind::SessionCompleted
        } else if let Some(failed) = record.session_failed {
            ActivityKind::SessionFailed {
                reason: failed.reason,
            }
        } else {
            ActivityKind::Unknown
        };

        // Older payloads only carry the resource name.
        let id = if record.id.is_empty() {
            record.name.rsplit('/').next().unwrap_or_default().to_string()
        } else {
            record.id
        };

        Self {
            name: record.name,
            id,
            create_time: record.create_time,
            originator: record.originator,
            kind,
        }
    }
}

/// One page of `listActivities`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActivitiesResponse {
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl ListActivitiesResponse {
    /// The continuation token, treating an empty string as "no more pages".
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}
