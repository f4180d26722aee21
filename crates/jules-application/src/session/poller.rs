//! Background polling of one session at a time.
//!
//! The remote API offers no push channel, so session progress is observed by
//! repeatedly fetching the session state and its activity log. Each run owns
//! its own [`ActivityReconciler`]; at most one run is active per poller.

use std::sync::Arc;
use std::time::Duration;

use jules_core::{ClientConfig, JulesApi, SdkResult, SessionEvent, SessionState};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::reconciler::ActivityReconciler;
use crate::events::EventSink;

/// Timing and paging knobs of the polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Fixed delay between the end of one cycle and the start of the next.
    pub interval: Duration,
    pub page_size: Option<u32>,
    /// Upper bound on `listActivities` calls within one cycle. Pages past the
    /// cap are fetched by the following cycles.
    pub max_pages_per_cycle: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            page_size: Some(50),
            max_pages_per_cycle: 20,
        }
    }
}

impl From<&ClientConfig> for PollerConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            page_size: config.page_size,
            max_pages_per_cycle: config.max_pages_per_cycle,
        }
    }
}

/// Observable lifecycle of the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Never started.
    Idle,
    Polling,
    /// Terminal state observed, cancelled, or superseded.
    Stopped,
}

/// How a polling run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Ended(SessionState),
    Cancelled,
}

struct ActivePoll {
    session_name: String,
    cancel: CancellationToken,
    task: JoinHandle<PollOutcome>,
}

impl ActivePoll {
    /// Cancels the run and waits for it to return.
    async fn shutdown(self) -> Option<PollOutcome> {
        self.cancel.cancel();
        match self.task.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(session = %self.session_name, error = %e, "polling task join failed");
                None
            }
        }
    }
}

/// Owns the single polling loop of a client.
pub struct SessionPoller {
    api: Arc<dyn JulesApi>,
    config: PollerConfig,
    events: EventSink,
    active: Mutex<Option<ActivePoll>>,
    state: Arc<watch::Sender<PollerState>>,
}

impl SessionPoller {
    pub fn new(api: Arc<dyn JulesApi>, config: PollerConfig, events: EventSink) -> Self {
        let (state, _) = watch::channel(PollerState::Idle);
        Self {
            api,
            config,
            events,
            active: Mutex::new(None),
            state: Arc::new(state),
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Starts polling `session_name`, stopping any run for another session first.
    ///
    /// The previous run is fully joined before the new one is spawned, so no
    /// event of the old session can be emitted after this returns. Starting
    /// the session that is already being polled is a no-op.
    pub async fn start(&self, session_name: &str) {
        let mut guard = self.active.lock().await;

        if let Some(active) = guard.as_ref() {
            if active.session_name == session_name && !active.task.is_finished() {
                debug!(session = %session_name, "already polling");
                return;
            }
        }

        if let Some(previous) = guard.take() {
            let previous_name = previous.session_name.clone();
            if let Some(PollOutcome::Cancelled) = previous.shutdown().await {
                info!(previous = %previous_name, next = %session_name, "polling superseded");
                self.events.log(format!(
                    "Stopped polling {previous_name}: superseded by {session_name}"
                ));
            }
        }

        let cancel = CancellationToken::new();
        let run = PollRun {
            api: Arc::clone(&self.api),
            config: self.config.clone(),
            events: self.events.clone(),
            session_name: session_name.to_string(),
            cancel: cancel.clone(),
        };
        let state = Arc::clone(&self.state);

        self.state.send_replace(PollerState::Polling);
        let task = tokio::spawn(async move {
            let outcome = run.run().await;
            state.send_replace(PollerState::Stopped);
            outcome
        });

        info!(session = %session_name, interval = ?self.config.interval, "polling started");
        self.events.log(format!(
            "Polling {session_name} every {}s",
            self.config.interval.as_secs()
        ));

        *guard = Some(ActivePoll {
            session_name: session_name.to_string(),
            cancel,
            task,
        });
    }

    /// Stops whatever run is active. Returns `false` if there was none.
    pub async fn stop(&self) -> bool {
        let previous = self.active.lock().await.take();
        let Some(previous) = previous else {
            return false;
        };

        let session_name = previous.session_name.clone();
        if let Some(PollOutcome::Cancelled) = previous.shutdown().await {
            info!(session = %session_name, "polling stopped");
            self.events.log(format!("Polling stopped for {session_name}"));
        }
        self.state.send_replace(PollerState::Stopped);
        true
    }

    /// Stops the active run only if it belongs to `session_name`.
    pub async fn stop_session(&self, session_name: &str) -> bool {
        let owns_run = self
            .active
            .lock()
            .await
            .as_ref()
            .is_some_and(|active| active.session_name == session_name);
        owns_run && self.stop().await
    }

    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<PollerState> {
        self.state.subscribe()
    }

    /// Resolves once the poller is `Stopped`.
    pub async fn wait_stopped(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|state| *state == PollerState::Stopped).await;
    }

    /// Session of the current run, if it is still going.
    pub async fn active_session(&self) -> Option<String> {
        self.active
            .lock()
            .await
            .as_ref()
            .filter(|active| !active.task.is_finished())
            .map(|active| active.session_name.clone())
    }
}

enum CycleOutcome {
    Continue,
    Ended(SessionState),
    Cancelled,
}

/// What one run carries from cycle to cycle.
///
/// `resume_token` is set when a cycle stops before the last page (page cap or
/// a failed page); the next cycle continues from there instead of page one.
struct RunProgress {
    reconciler: ActivityReconciler,
    last_state: Option<SessionState>,
    resume_token: Option<String>,
}

impl RunProgress {
    fn new(session_name: &str) -> Self {
        Self {
            reconciler: ActivityReconciler::new(session_name),
            last_state: None,
            resume_token: None,
        }
    }
}

/// Everything one polling run needs, moved into the spawned task.
struct PollRun {
    api: Arc<dyn JulesApi>,
    config: PollerConfig,
    events: EventSink,
    session_name: String,
    cancel: CancellationToken,
}

impl PollRun {
    async fn run(self) -> PollOutcome {
        let mut progress = RunProgress::new(&self.session_name);
        let mut cycle = 0u64;

        loop {
            if self.cancel.is_cancelled() {
                return PollOutcome::Cancelled;
            }

            cycle += 1;
            match self.cycle(&mut progress).await {
                Ok(CycleOutcome::Continue) => {
                    debug!(
                        session = %self.session_name,
                        cycle,
                        seen = progress.reconciler.seen_count(),
                        "cycle done"
                    );
                }
                Ok(CycleOutcome::Ended(state)) => return PollOutcome::Ended(state),
                Ok(CycleOutcome::Cancelled) => return PollOutcome::Cancelled,
                Err(e) => {
                    warn!(session = %self.session_name, cycle, error = %e, "polling cycle failed");
                    self.events
                        .log(format!("Polling {} failed: {e}", self.session_name));
                }
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return PollOutcome::Cancelled,
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }

    async fn cycle(&self, progress: &mut RunProgress) -> SdkResult<CycleOutcome> {
        let session = self.api.get_session(&self.session_name).await;
        if self.cancel.is_cancelled() {
            return Ok(CycleOutcome::Cancelled);
        }
        let state = session?.state;

        if progress.last_state.as_ref() != Some(&state) {
            debug!(session = %self.session_name, state = %state, "state changed");
            self.events.emit(SessionEvent::StateChanged {
                session_name: self.session_name.clone(),
                state: state.clone(),
            });
            progress.last_state = Some(state.clone());
        }

        if state.is_terminal() {
            info!(session = %self.session_name, state = %state, "session ended");
            self.events.emit(SessionEvent::SessionEnded {
                session_name: self.session_name.clone(),
                state: state.clone(),
            });
            self.events.log(format!(
                "Session {} ended with state {state}; polling stopped",
                self.session_name
            ));
            return Ok(CycleOutcome::Ended(state));
        }

        let mut page_token = progress.resume_token.take();
        for page in 0..self.config.max_pages_per_cycle.max(1) {
            let response = self
                .api
                .list_activities(&self.session_name, self.config.page_size, page_token.as_deref())
                .await;
            if self.cancel.is_cancelled() {
                return Ok(CycleOutcome::Cancelled);
            }
            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    progress.resume_token = page_token;
                    return Err(e);
                }
            };

            let next = response.continuation().map(str::to_owned);
            for event in progress.reconciler.reconcile(response.activities) {
                self.events.emit(event);
            }

            match next {
                Some(token) => page_token = Some(token),
                None => return Ok(CycleOutcome::Continue),
            }
            debug!(session = %self.session_name, page, "following next page");
        }

        debug!(
            session = %self.session_name,
            max_pages = self.config.max_pages_per_cycle,
            "page limit reached; next cycle resumes from the last token"
        );
        progress.resume_token = page_token;
        Ok(CycleOutcome::Continue)
    }
}
