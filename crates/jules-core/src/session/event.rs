use serde::{Deserialize, Serialize};

use super::{LogEntry, Message, Session, SessionState};
use crate::source::Source;

/// Everything a consumer of the SDK can observe, in emission order.
///
/// The polling engine emits `StateChanged`, `NewMessage`, `SessionEnded` and
/// `LogAppended`; the controller emits the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A long-running request is in flight.
    Loading,
    /// `listSources` returned a non-empty list.
    SourcesLoaded { sources: Vec<Source> },
    /// A new session was created; any previous transcript is obsolete.
    SessionStarted { session: Session },
    /// The observed server state differs from the last observation.
    StateChanged {
        session_name: String,
        state: SessionState,
    },
    /// A chat turn to append to the transcript.
    NewMessage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_name: Option<String>,
        message: Message,
    },
    /// A terminal state was observed; polling for the session has stopped.
    SessionEnded {
        session_name: String,
        state: SessionState,
    },
    /// A one-shot operation failed in a way the user should see.
    ApiFailure { message: String },
    /// Diagnostic side channel.
    LogAppended { entry: LogEntry },
}

impl SessionEvent {
    pub fn log(text: impl Into<String>) -> Self {
        Self::LogAppended {
            entry: LogEntry::now(text),
        }
    }

    /// A message emitted outside of any polling loop.
    pub fn local_message(message: Message) -> Self {
        Self::NewMessage {
            session_name: None,
            message,
        }
    }

    /// The session this event is attributed to, if any.
    pub fn session_name(&self) -> Option<&str> {
        match self {
            Self::StateChanged { session_name, .. } | Self::SessionEnded { session_name, .. } => {
                Some(session_name)
            }
            Self::NewMessage { session_name, .. } => session_name.as_deref(),
            Self::SessionStarted { session } => Some(&session.name),
            _ => None,
        }
    }
}
