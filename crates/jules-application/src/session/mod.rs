//! Session-scoped services: the handle, the polling engine and its
//! reconciliation step.
//!
//! # Module Structure
//!
//! - `handle`: `SessionHandle`, one session bound to a resource client
//! - `poller`: `SessionPoller`, the background polling loop
//! - `reconciler`: `ActivityReconciler`, the per-run seen-set

mod handle;
mod poller;
mod reconciler;


pub use handle::SessionHandle;
pub use poller::{PollOutcome, PollerConfig, PollerState, SessionPoller};
pub use reconciler::ActivityReconciler;
