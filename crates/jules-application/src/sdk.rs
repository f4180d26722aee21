//! Entry point for SDK consumers.

use std::sync::Arc;

use jules_core::session::CreateSessionRequest;
use jules_core::{ClientConfig, JulesApi, SdkResult, Session, Source};
use tracing::info;

use crate::events::EventSink;
use crate::session::{PollerConfig, SessionHandle, SessionPoller};

/// A resource client plus the one polling engine that serves it.
///
/// Every [`SessionHandle`] produced here shares the same poller, so at most
/// one session is polled at a time.
pub struct JulesSdk {
    api: Arc<dyn JulesApi>,
    poller: Arc<SessionPoller>,
    session_title: String,
}

impl JulesSdk {
    pub fn new(api: Arc<dyn JulesApi>, config: &ClientConfig, events: EventSink) -> Self {
        let poller = Arc::new(SessionPoller::new(
            Arc::clone(&api),
            PollerConfig::from(config),
            events,
        ));
        Self {
            api,
            poller,
            session_title: config.session_title.clone(),
        }
    }

    pub fn api(&self) -> &Arc<dyn JulesApi> {
        &self.api
    }

    pub fn poller(&self) -> &Arc<SessionPoller> {
        &self.poller
    }

    /// Every source visible to the API key, following `nextPageToken` to the end.
    pub async fn list_sources(&self) -> SdkResult<Vec<Source>> {
        let mut sources = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let response = self
                .api
                .list_sources(None, page_token.as_deref(), None)
                .await?;
            pages += 1;
            let next = response.continuation().map(str::to_owned);
            sources.extend(response.sources);

            match next {
                // Stop if the server echoes the token back.
                Some(token) if page_token.as_deref() != Some(token.as_str()) => {
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        info!(count = sources.len(), pages, "sources listed");
        Ok(sources)
    }

    /// Creates a session against `source`. Polling is not started.
    pub async fn start_session(&self, source: &Source) -> SdkResult<SessionHandle> {
        let request = CreateSessionRequest::new(&self.session_title, source.to_context())
            .with_title(&self.session_title);
        let session = self.api.create_session(&request).await?;
        info!(session = %session.name, source = %source.name, "session created");
        Ok(self.attach(session))
    }

    /// Wraps an existing session, e.g. one picked from `listSessions`.
    pub fn attach(&self, session: Session) -> SessionHandle {
        SessionHandle::new(Arc::clone(&self.api), session, Arc::clone(&self.poller))
    }

    /// Stops the poller. Safe to call repeatedly.
    pub async fn shutdown(&self) {
        self.poller.stop().await;
    }
}
