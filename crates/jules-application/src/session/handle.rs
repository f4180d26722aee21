use std::sync::Arc;

use jules_core::session::{ListActivitiesResponse, MessageResponse};
use jules_core::{JulesApi, SdkResult, Session};
use tracing::info;

use super::poller::{PollerState, SessionPoller};

/// One session bound to the resource client that created it.
///
/// Cloning is cheap; clones share the client and the poller.
#[derive(Clone)]
pub struct SessionHandle {
    api: Arc<dyn JulesApi>,
    session: Session,
    poller: Arc<SessionPoller>,
}

impl SessionHandle {
    pub fn new(api: Arc<dyn JulesApi>, session: Session, poller: Arc<SessionPoller>) -> Self {
        Self {
            api,
            session,
            poller,
        }
    }

    /// The session as last fetched; its state is not kept current.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn name(&self) -> &str {
        &self.session.name
    }

    /// Sends a user turn. The reply is only observable through polling.
    pub async fn send(&self, text: &str) -> SdkResult<MessageResponse> {
        let response = self.api.send_message(&self.session.name, text).await?;
        info!(session = %self.session.name, "message sent");
        Ok(response)
    }

    pub async fn approve_plan(&self) -> SdkResult<()> {
        self.api.approve_plan(&self.session.name).await?;
        info!(session = %self.session.name, "plan approved");
        Ok(())
    }

    /// Fetches one page of this session's activities.
    pub async fn list_activities(
        &self,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> SdkResult<ListActivitiesResponse> {
        self.api
            .list_activities(&self.session.name, page_size, page_token)
            .await
    }

    /// Re-fetches the session and stores the result in this handle.
    pub async fn refresh(&mut self) -> SdkResult<&Session> {
        self.session = self.api.get_session(&self.session.name).await?;
        Ok(&self.session)
    }

    /// Starts polling this session, superseding any other session's run.
    pub async fn start(&self) {
        self.poller.start(&self.session.name).await;
    }

    /// Stops polling if the active run belongs to this session.
    pub async fn stop(&self) -> bool {
        self.poller.stop_session(&self.session.name).await
    }

    pub async fn is_polling(&self) -> bool {
        self.poller.state() == PollerState::Polling
            && self.poller.active_session().await.as_deref() == Some(self.name())
    }
}
