//! Display-ready projection of the event stream.
//!
//! [`reduce`] is a pure fold; a UI keeps one [`UiState`] and feeds it every
//! [`SessionEvent`] in arrival order.

use jules_core::{LogEntry, Message, Session, SessionEvent, SessionState, Source};

/// Top-level status shown by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UiStatus {
    #[default]
    Idle,
    Loading,
    SourcesLoaded,
    SessionActive {
        session_name: String,
    },
    SessionEnded {
        session_name: String,
        state: SessionState,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub status: UiStatus,
    pub sources: Vec<Source>,
    pub session: Option<Session>,
    /// Last state observed by polling.
    pub session_state: Option<SessionState>,
    /// Transcript of the current session only.
    pub messages: Vec<Message>,
    /// Diagnostic log, kept across sessions.
    pub logs: Vec<LogEntry>,
}

impl UiState {
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Loading => self.status = UiStatus::Loading,
            SessionEvent::SourcesLoaded { sources } => {
                self.sources = sources;
                self.status = UiStatus::SourcesLoaded;
            }
            SessionEvent::SessionStarted { session } => {
                self.messages.clear();
                self.session_state = Some(session.state.clone());
                self.status = UiStatus::SessionActive {
                    session_name: session.name.clone(),
                };
                self.session = Some(session);
            }
            SessionEvent::StateChanged {
                session_name,
                state,
            } => {
                if self.is_current(&session_name) {
                    self.session_state = Some(state);
                }
            }
            SessionEvent::NewMessage { message, .. } => self.messages.push(message),
            SessionEvent::SessionEnded {
                session_name,
                state,
            } => {
                if self.is_current(&session_name) {
                    self.session_state = Some(state.clone());
                    self.status = UiStatus::SessionEnded {
                        session_name,
                        state,
                    };
                }
            }
            SessionEvent::ApiFailure { message } => self.status = UiStatus::Error { message },
            SessionEvent::LogAppended { entry } => self.logs.push(entry),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == UiStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            UiStatus::Error { message } => Some(message),
            _ => None,
        }
    }

    fn is_current(&self, session_name: &str) -> bool {
        self.session
            .as_ref()
            .is_none_or(|session| session.name == session_name)
    }
}

/// `(prior state, event) -> new state`.
pub fn reduce(mut state: UiState, event: SessionEvent) -> UiState {
    state.apply(event);
    state
}
