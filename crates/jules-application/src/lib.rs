//! Application layer for the Jules SDK.
//!
//! Coordinates a resource client ([`jules_core::JulesApi`]) with the session
//! polling engine and exposes the results as a stream of
//! [`jules_core::SessionEvent`]s.

pub mod controller;
pub mod events;
pub mod sdk;
pub mod session;
pub mod ui_state;

pub use controller::{ClientFactory, SessionController};
pub use events::EventSink;
pub use sdk::JulesSdk;
pub use session::{
    ActivityReconciler, PollOutcome, PollerConfig, PollerState, SessionHandle, SessionPoller,
};
pub use ui_state::{UiState, UiStatus, reduce};
