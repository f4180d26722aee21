//! View-model behind the demo application.
//!
//! Every outcome, success or failure, is reported as a [`SessionEvent`] so a
//! UI only has to fold the event stream. The returned `SdkResult`s are for
//! callers that want to branch on the outcome as well.

use std::sync::Arc;

use jules_core::{ClientConfig, JulesApi, Message, SdkError, SdkResult, SessionEvent, Source};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::events::EventSink;
use crate::sdk::JulesSdk;
use crate::session::{PollerState, SessionHandle};

/// Builds a resource client for an API key.
pub type ClientFactory = Arc<dyn Fn(&str) -> SdkResult<Arc<dyn JulesApi>> + Send + Sync>;

pub const NO_API_KEY: &str = "API Key is not set.";
pub const NO_SOURCES: &str = "No sources found for this API key.";
pub const NO_CLIENT_FOR_SESSION: &str = "API Key not set. Please configure in Settings.";
pub const NO_SESSION: &str =
    "Session not created. Please configure API Key and Source in Settings.";

pub struct SessionController {
    config: ClientConfig,
    factory: ClientFactory,
    events: EventSink,
    sdk: RwLock<Option<Arc<JulesSdk>>>,
    session: RwLock<Option<SessionHandle>>,
}

impl SessionController {
    pub fn new(config: ClientConfig, factory: ClientFactory, events: EventSink) -> Self {
        Self {
            config,
            factory,
            events,
            sdk: RwLock::new(None),
            session: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replaces the resource client. Polling of the previous client stops.
    pub async fn initialize_client(&self, api_key: &str) -> SdkResult<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            let err = SdkError::precondition("API Key is empty.");
            self.events.log(format!("Error: {err}"));
            return Err(err);
        }

        let previous = self.sdk.write().await.take();
        if let Some(previous) = previous {
            previous.shutdown().await;
        }
        self.session.write().await.take();

        let api = match (self.factory)(api_key) {
            Ok(api) => api,
            Err(e) => {
                warn!(error = %e, "client initialization failed");
                self.events.log(format!("Error initializing client: {e}"));
                return Err(e);
            }
        };

        let sdk = JulesSdk::new(api, &self.config, self.events.clone());
        *self.sdk.write().await = Some(Arc::new(sdk));
        info!("client initialized");
        self.events.log("Jules client initialized.");
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.sdk.read().await.is_some()
    }

    pub async fn load_sources(&self) -> SdkResult<Vec<Source>> {
        let Some(sdk) = self.current_sdk().await else {
            self.events.emit(SessionEvent::ApiFailure {
                message: NO_API_KEY.to_string(),
            });
            return Err(SdkError::precondition(NO_API_KEY));
        };

        self.events.emit(SessionEvent::Loading);
        self.events.log("Loading sources...");

        match sdk.list_sources().await {
            Ok(sources) if sources.is_empty() => {
                self.events.log(NO_SOURCES);
                self.events.emit(SessionEvent::ApiFailure {
                    message: NO_SOURCES.to_string(),
                });
                Ok(sources)
            }
            Ok(sources) => {
                self.events.log(format!("Loaded {} sources", sources.len()));
                self.events.emit(SessionEvent::SourcesLoaded {
                    sources: sources.clone(),
                });
                Ok(sources)
            }
            Err(e) => {
                let message = format!("Error loading sources: {e}");
                self.events.log(message.clone());
                self.events.emit(SessionEvent::ApiFailure { message });
                Err(e)
            }
        }
    }

    /// Creates a session against `source` and starts polling it right away.
    pub async fn create_session(&self, source: &Source) -> SdkResult<SessionHandle> {
        let Some(sdk) = self.current_sdk().await else {
            self.events
                .emit(SessionEvent::local_message(Message::error(NO_CLIENT_FOR_SESSION)));
            return Err(SdkError::precondition(NO_CLIENT_FOR_SESSION));
        };

        // The old run must be gone before the new transcript starts.
        sdk.poller().stop().await;
        self.session.write().await.take();

        self.events
            .log(format!("Creating session with source: {}", source.name));
        let handle = match sdk.start_session(source).await {
            Ok(handle) => handle,
            Err(e) => {
                let message = format!("Error creating session: {e}");
                self.events.log(message.clone());
                self.events
                    .emit(SessionEvent::local_message(Message::error(message)));
                return Err(e);
            }
        };

        self.events.emit(SessionEvent::SessionStarted {
            session: handle.session().clone(),
        });
        self.events.emit(SessionEvent::NewMessage {
            session_name: Some(handle.name().to_string()),
            message: Message::agent(format!("Session created with source: {}", source.name)),
        });
        self.events.log(format!("Session created: {}", handle.name()));

        *self.session.write().await = Some(handle.clone());
        handle.start().await;
        Ok(handle)
    }

    pub async fn send_message(&self, text: &str) -> SdkResult<()> {
        let handle = self.require_session().await?;

        self.events.emit(SessionEvent::NewMessage {
            session_name: Some(handle.name().to_string()),
            message: Message::user(text),
        });

        match handle.send(text).await {
            Ok(response) => {
                match response.message {
                    Some(reply) => self
                        .events
                        .log(format!("Message sent to {}: {reply}", handle.name())),
                    None => self.events.log(format!("Message sent to {}", handle.name())),
                }
                Ok(())
            }
            Err(e) => {
                self.report_session_error(&handle, format!("Error sending message: {e}"));
                Err(e)
            }
        }
    }

    pub async fn approve_plan(&self) -> SdkResult<()> {
        let handle = self.require_session().await?;

        match handle.approve_plan().await {
            Ok(()) => {
                self.events.log(format!("Plan approved for {}", handle.name()));
                Ok(())
            }
            Err(e) => {
                self.report_session_error(&handle, format!("Error approving plan: {e}"));
                Err(e)
            }
        }
    }

    /// Stops polling the current session. Returns whether a run was stopped.
    pub async fn stop_polling(&self) -> SdkResult<bool> {
        let handle = self.require_session().await?;
        Ok(handle.stop().await)
    }

    pub async fn active_session(&self) -> Option<SessionHandle> {
        self.session.read().await.clone()
    }

    pub async fn poller_state(&self) -> PollerState {
        match self.current_sdk().await {
            Some(sdk) => sdk.poller().state(),
            None => PollerState::Idle,
        }
    }

    pub async fn shutdown(&self) {
        if let Some(sdk) = self.current_sdk().await {
            sdk.shutdown().await;
        }
    }

    async fn current_sdk(&self) -> Option<Arc<JulesSdk>> {
        self.sdk.read().await.clone()
    }

    async fn require_session(&self) -> SdkResult<SessionHandle> {
        match self.active_session().await {
            Some(handle) => Ok(handle),
            None => {
                self.events
                    .emit(SessionEvent::local_message(Message::error(NO_SESSION)));
                Err(SdkError::precondition(NO_SESSION))
            }
        }
    }

    fn report_session_error(&self, handle: &SessionHandle, message: String) {
        warn!(session = %handle.name(), error = %message, "session operation failed");
        self.events.log(message.clone());
        self.events.emit(SessionEvent::NewMessage {
            session_name: Some(handle.name().to_string()),
            message: Message::error(message),
        });
    }
}
