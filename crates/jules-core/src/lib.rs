//! Domain model and contracts for the Jules SDK.
//!
//! Nothing in this crate performs I/O: the transport lives in
//! `jules-interaction`, storage in `jules-infrastructure` and the polling
//! engine in `jules-application`.

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod settings;
pub mod source;

pub use api::JulesApi;
pub use config::ClientConfig;
pub use error::{SdkError, SdkResult};
pub use session::{
    Activity, ActivityKind, LogEntry, Message, MessageRole, Session, SessionEvent, SessionState,
};
pub use settings::{Settings, SettingsRepository};
pub use source::{Source, SourceContext};
