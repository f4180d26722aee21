use async_trait::async_trait;
use jules_application::controller::{NO_API_KEY, NO_CLIENT_FOR_SESSION, NO_SESSION, NO_SOURCES};
use jules_application::{
    ClientFactory, EventSink, PollerState, SessionController, UiState, UiStatus, reduce,
};
use jules_core::session::{
    CreateSessionRequest, ListActivitiesResponse, ListSessionsResponse, MessageResponse,
};
use jules_core::source::ListSourcesResponse;
use jules_core::{
    Activity, ClientConfig, JulesApi, MessageRole, SdkError, SdkResult, Session, SessionEvent,
    SessionState, Source,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Default)]
struct FakeApi {
    sources: Vec<Source>,
    /// Sources per `listSources` page; 0 serves everything on one page.
    sources_per_page: usize,
    source_tokens: Mutex<Vec<Option<String>>>,
    /// Activities returned on every poll, keyed by session name.
    activities: HashMap<String, Vec<Activity>>,
    fail_send: bool,
    created: Mutex<Vec<CreateSessionRequest>>,
    sent: Mutex<Vec<(String, String)>>,
    polled: Mutex<Vec<String>>,
}

impl FakeApi {
    fn polled(&self, session: &str) -> usize {
        self.polled
            .lock()
            .unwrap()
            .iter()
            .filter(|name| name.as_str() == session)
            .count()
    }
}

#[async_trait]
impl JulesApi for FakeApi {
    async fn list_sources(
        &self,
        _page_size: Option<u32>,
        page_token: Option<&str>,
        _filter: Option<&str>,
    ) -> SdkResult<ListSourcesResponse> {
        self.source_tokens
            .lock()
            .unwrap()
            .push(page_token.map(str::to_string));
        if self.sources_per_page == 0 {
            return Ok(ListSourcesResponse {
                sources: self.sources.clone(),
                next_page_token: None,
            });
        }

        let start: usize = page_token.map_or(0, |token| token.parse().unwrap());
        let end = (start + self.sources_per_page).min(self.sources.len());
        Ok(ListSourcesResponse {
            sources: self.sources[start..end].to_vec(),
            next_page_token: (end < self.sources.len()).then(|| end.to_string()),
        })
    }

    async fn get_source(&self, source_id: &str) -> SdkResult<Source> {
        Err(SdkError::api(404, format!("no source {source_id}")))
    }

    async fn create_session(&self, request: &CreateSessionRequest) -> SdkResult<Session> {
        let mut created = self.created.lock().unwrap();
        created.push(request.clone());
        let mut session = Session::new(
            format!("sessions/{}", created.len()),
            SessionState::Created,
        );
        session.title = request.title.clone().unwrap_or_default();
        Ok(session)
    }

    async fn list_sessions(
        &self,
        _page_size: Option<u32>,
        _page_token: Option<&str>,
    ) -> SdkResult<ListSessionsResponse> {
        Ok(ListSessionsResponse::default())
    }

    async fn get_session(&self, session: &str) -> SdkResult<Session> {
        self.polled.lock().unwrap().push(session.to_string());
        Ok(Session::new(session, SessionState::Running))
    }

    async fn send_message(&self, session: &str, prompt: &str) -> SdkResult<MessageResponse> {
        if self.fail_send {
            return Err(SdkError::api(500, "{\"error\":\"internal\"}"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((session.to_string(), prompt.to_string()));
        Ok(MessageResponse::default())
    }

    async fn approve_plan(&self, _session: &str) -> SdkResult<()> {
        Ok(())
    }

    async fn list_activities(
        &self,
        session: &str,
        _page_size: Option<u32>,
        _page_token: Option<&str>,
    ) -> SdkResult<ListActivitiesResponse> {
        Ok(ListActivitiesResponse {
            activities: self.activities.get(session).cloned().unwrap_or_default(),
            next_page_token: None,
        })
    }

    async fn get_activity(&self, _session: &str, activity_id: &str) -> SdkResult<Activity> {
        Err(SdkError::api(404, format!("no activity {activity_id}")))
    }
}

fn factory_for(api: Arc<FakeApi>) -> ClientFactory {
    Arc::new(move |_key: &str| -> SdkResult<Arc<dyn JulesApi>> { Ok(api.clone()) })
}

fn controller(api: Arc<FakeApi>) -> (SessionController, UnboundedReceiver<SessionEvent>) {
    let (events, rx) = EventSink::channel();
    let config = ClientConfig {
        poll_interval_secs: 5,
        ..ClientConfig::default()
    };
    (SessionController::new(config, factory_for(api), events), rx)
}

fn drain(rx: &mut UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn fold(events: Vec<SessionEvent>) -> UiState {
    events.into_iter().fold(UiState::default(), reduce)
}

fn logs(events: &[SessionEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::LogAppended { entry } => Some(entry.text.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_load_sources_without_client_reports_missing_key() {
    let (controller, mut rx) = controller(Arc::new(FakeApi::default()));

    let err = controller.load_sources().await.unwrap_err();
    assert!(err.is_precondition());

    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![SessionEvent::ApiFailure {
            message: NO_API_KEY.to_string()
        }]
    );
}

#[tokio::test]
async fn test_blank_key_is_rejected_locally() {
    let (controller, mut rx) = controller(Arc::new(FakeApi::default()));

    let err = controller.initialize_client("   ").await.unwrap_err();
    assert!(err.is_precondition());
    assert!(!controller.is_initialized().await);
    assert_eq!(logs(&drain(&mut rx)).len(), 1);
}

#[tokio::test]
async fn test_factory_failure_leaves_client_unset() {
    let (events, mut rx) = EventSink::channel();
    let factory: ClientFactory = Arc::new(|_key: &str| -> SdkResult<Arc<dyn JulesApi>> {
        Err(SdkError::network("invalid header value"))
    });
    let controller = SessionController::new(ClientConfig::default(), factory, events);

    let err = controller.initialize_client("key").await.unwrap_err();
    assert!(err.is_network());
    assert!(!controller.is_initialized().await);
    assert!(
        logs(&drain(&mut rx))
            .iter()
            .any(|text| text.contains("invalid header value"))
    );
}

#[tokio::test]
async fn test_empty_source_list_is_reported_not_fatal() {
    let (controller, mut rx) = controller(Arc::new(FakeApi::default()));
    controller.initialize_client("key").await.unwrap();

    let sources = controller.load_sources().await.unwrap();
    assert!(sources.is_empty());

    let events = drain(&mut rx);
    assert!(events.contains(&SessionEvent::Loading));
    assert!(logs(&events).iter().any(|text| text == NO_SOURCES));

    let state = fold(events);
    assert_eq!(state.error(), Some(NO_SOURCES));
    assert!(state.sources.is_empty());
}

#[tokio::test]
async fn test_sources_loaded() {
    let api = Arc::new(FakeApi {
        sources: vec![Source::named("sources/github/octo/hello")],
        ..FakeApi::default()
    });
    let (controller, mut rx) = controller(api);
    controller.initialize_client("key").await.unwrap();

    controller.load_sources().await.unwrap();

    let state = fold(drain(&mut rx));
    assert_eq!(state.status, UiStatus::SourcesLoaded);
    assert_eq!(state.sources[0].name, "sources/github/octo/hello");
}

#[tokio::test]
async fn test_sources_loaded_across_pages() {
    let api = Arc::new(FakeApi {
        sources: vec![
            Source::named("sources/github/octo/one"),
            Source::named("sources/github/octo/two"),
            Source::named("sources/github/octo/three"),
        ],
        sources_per_page: 2,
        ..FakeApi::default()
    });
    let (controller, mut rx) = controller(api.clone());
    controller.initialize_client("key").await.unwrap();

    controller.load_sources().await.unwrap();

    let state = fold(drain(&mut rx));
    let names: Vec<_> = state.sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "sources/github/octo/one",
            "sources/github/octo/two",
            "sources/github/octo/three",
        ]
    );
    assert_eq!(
        *api.source_tokens.lock().unwrap(),
        vec![None, Some("2".to_string())]
    );
}

#[tokio::test]
async fn test_session_operations_require_client_and_session() {
    let (controller, mut rx) = controller(Arc::new(FakeApi::default()));

    assert!(
        controller
            .create_session(&Source::named("repo/foo"))
            .await
            .is_err()
    );
    assert!(controller.send_message("hello").await.is_err());
    assert!(controller.approve_plan().await.is_err());
    assert!(controller.stop_polling().await.is_err());

    let state = fold(drain(&mut rx));
    let texts: Vec<_> = state
        .messages
        .iter()
        .map(|message| (message.role, message.text.as_str()))
        .collect();
    assert_eq!(
        texts,
        vec![
            (MessageRole::Error, NO_CLIENT_FOR_SESSION),
            (MessageRole::Error, NO_SESSION),
            (MessageRole::Error, NO_SESSION),
            (MessageRole::Error, NO_SESSION),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_create_send_and_receive_reply_once() {
    let api = Arc::new(FakeApi {
        activities: HashMap::from([(
            "sessions/1".to_string(),
            vec![Activity::agent_message("a1", "hi")],
        )]),
        ..FakeApi::default()
    });
    let (controller, mut rx) = controller(api.clone());
    controller.initialize_client("key").await.unwrap();

    let handle = controller
        .create_session(&Source::named("repo/foo"))
        .await
        .unwrap();
    assert_eq!(handle.name(), "sessions/1");
    assert_eq!(controller.poller_state().await, PollerState::Polling);

    controller.send_message("hello").await.unwrap();

    // Two cycles: the second sees `a1` again and must not re-deliver it.
    tokio::time::sleep(Duration::from_secs(7)).await;
    assert_eq!(api.polled("sessions/1"), 2);

    let state = fold(drain(&mut rx));
    let agent: Vec<_> = state
        .messages
        .iter()
        .filter(|message| message.role == MessageRole::Agent)
        .map(|message| message.text.as_str())
        .collect();
    assert_eq!(agent, vec!["Session created with source: repo/foo", "hi"]);
    assert_eq!(
        state
            .messages
            .iter()
            .filter(|message| message.role == MessageRole::User)
            .count(),
        1
    );
    assert_eq!(state.session_state, Some(SessionState::Running));

    let created = api.created.lock().unwrap();
    assert_eq!(created[0].title.as_deref(), Some("Test Application"));
    assert_eq!(created[0].source_context.source, "repo/foo");
    assert_eq!(
        *api.sent.lock().unwrap(),
        vec![("sessions/1".to_string(), "hello".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_session_supersedes_first() {
    let api = Arc::new(FakeApi {
        activities: HashMap::from([
            (
                "sessions/1".to_string(),
                vec![Activity::agent_message("a1", "from first")],
            ),
            (
                "sessions/2".to_string(),
                vec![Activity::agent_message("b1", "from second")],
            ),
        ]),
        ..FakeApi::default()
    });
    let (controller, mut rx) = controller(api.clone());
    controller.initialize_client("key").await.unwrap();

    controller
        .create_session(&Source::named("repo/foo"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    controller
        .create_session(&Source::named("repo/bar"))
        .await
        .unwrap();
    let first_polls = api.polled("sessions/1");

    tokio::time::sleep(Duration::from_secs(12)).await;
    assert_eq!(api.polled("sessions/1"), first_polls);

    let state = fold(drain(&mut rx));
    let texts: Vec<_> = state
        .messages
        .iter()
        .map(|message| message.text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec!["Session created with source: repo/bar", "from second"]
    );
    assert!(state.logs.len() > 2);
}

#[tokio::test(start_paused = true)]
async fn test_send_failure_becomes_error_message() {
    let api = Arc::new(FakeApi {
        fail_send: true,
        ..FakeApi::default()
    });
    let (controller, mut rx) = controller(api);
    controller.initialize_client("key").await.unwrap();
    controller
        .create_session(&Source::named("repo/foo"))
        .await
        .unwrap();

    let err = controller.send_message("hello").await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    let state = fold(drain(&mut rx));
    let last = state.messages.last().unwrap();
    assert_eq!(last.role, MessageRole::Error);
    assert!(last.text.starts_with("Error sending message: API error 500"));
}

#[tokio::test(start_paused = true)]
async fn test_reinitializing_stops_previous_polling() {
    let api = Arc::new(FakeApi::default());
    let (controller, mut rx) = controller(api.clone());
    controller.initialize_client("key").await.unwrap();
    controller
        .create_session(&Source::named("repo/foo"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    controller.initialize_client("other-key").await.unwrap();
    let polls = api.polled("sessions/1");
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert_eq!(api.polled("sessions/1"), polls);
    assert!(controller.active_session().await.is_none());
    assert_eq!(controller.poller_state().await, PollerState::Idle);
    assert!(
        logs(&drain(&mut rx))
            .iter()
            .any(|text| text == "Polling stopped for sessions/1")
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_polling_halts_current_session() {
    let api = Arc::new(FakeApi::default());
    let (controller, _rx) = controller(api.clone());
    controller.initialize_client("key").await.unwrap();
    controller
        .create_session(&Source::named("repo/foo"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(controller.stop_polling().await.unwrap());
    tokio::time::sleep(Duration::from_secs(20)).await;

    assert_eq!(api.polled("sessions/1"), 1);
    assert_eq!(controller.poller_state().await, PollerState::Stopped);
}
