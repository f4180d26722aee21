pub mod activity;
pub mod event;
pub mod message;
pub mod model;

pub use activity::{Activity, ActivityKind, ListActivitiesResponse};
pub use event::SessionEvent;
pub use message::{LogEntry, Message, MessageRole};
pub use model::{
    CreateSessionRequest, ListSessionsResponse, MessageResponse, SendMessageRequest, Session,
    SessionState, session_path,
};
