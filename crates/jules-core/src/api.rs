//! Resource client trait.
//!
//! Defines one call per remote operation of the Jules API.

use async_trait::async_trait;

use crate::error::SdkResult;
use crate::session::{
    Activity, CreateSessionRequest, ListActivitiesResponse, ListSessionsResponse,
    MessageResponse, Session,
};
use crate::source::{ListSourcesResponse, Source};

/// Typed façade over the remote API.
///
/// This trait decouples the polling engine and controllers from the HTTP
/// transport, so they can be driven by in-memory fakes in tests.
///
/// Session arguments accept either a bare id (`123`) or a resource name
/// (`sessions/123`).
///
/// # Implementation Notes
///
/// Implementations must map every outcome to exactly one of `Ok`,
/// [`SdkError::Api`](crate::SdkError::Api) or
/// [`SdkError::Network`](crate::SdkError::Network), and must never log the
/// API key.
#[async_trait]
pub trait JulesApi: Send + Sync {
    /// Lists one page of the sources available to the API key.
    ///
    /// `filter` is passed through verbatim as the server's filter expression.
    async fn list_sources(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
        filter: Option<&str>,
    ) -> SdkResult<ListSourcesResponse>;

    /// Fetches a single source by id.
    async fn get_source(&self, source_id: &str) -> SdkResult<Source>;

    /// Creates a new session.
    async fn create_session(&self, request: &CreateSessionRequest) -> SdkResult<Session>;

    /// Lists sessions, optionally paginated.
    async fn list_sessions(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> SdkResult<ListSessionsResponse>;

    /// Fetches the current state of a session.
    async fn get_session(&self, session: &str) -> SdkResult<Session>;

    /// Sends a user turn to a session.
    ///
    /// Success only means the server accepted the message; the reply shows up
    /// later as an activity.
    async fn send_message(&self, session: &str, prompt: &str) -> SdkResult<MessageResponse>;

    /// Approves the plan a session is waiting on.
    async fn approve_plan(&self, session: &str) -> SdkResult<()>;

    /// Fetches one page of a session's activities.
    async fn list_activities(
        &self,
        session: &str,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> SdkResult<ListActivitiesResponse>;

    /// Fetches a single activity.
    async fn get_activity(&self, session: &str, activity_id: &str) -> SdkResult<Activity>;
}
