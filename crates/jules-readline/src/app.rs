//! Glue between REPL commands and the session controller.
//!
//! Commands run as background tasks; their outcomes come back through the
//! event stream and are printed by the event pump.

use std::sync::{Arc, Mutex};

use colored::Colorize;
use jules_application::SessionController;
use jules_core::{Settings, SettingsRepository, Source};
use jules_infrastructure::TomlSettingsRepository;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::command::Command;
use crate::view::{Line, Tab, View};

pub fn print_lines(lines: Vec<Line>) {
    for line in lines {
        println!("{}", line.render());
    }
}

pub struct App {
    controller: Arc<SessionController>,
    settings: TomlSettingsRepository,
    view: Arc<Mutex<View>>,
    api_key: Mutex<Option<String>>,
}

impl App {
    pub fn new(
        controller: Arc<SessionController>,
        settings: TomlSettingsRepository,
        selected_source: Option<String>,
    ) -> Self {
        Self {
            controller,
            settings,
            view: Arc::new(Mutex::new(View::new(selected_source))),
            api_key: Mutex::new(None),
        }
    }

    /// Folds every event into the view and prints what the active tab shows.
    pub fn spawn_event_pump(
        &self,
        mut rx: UnboundedReceiver<jules_core::SessionEvent>,
    ) -> JoinHandle<()> {
        let view = Arc::clone(&self.view);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let lines = match view.lock() {
                    Ok(mut view) => view.apply(event),
                    Err(_) => break,
                };
                print_lines(lines);
            }
        })
    }

    /// Executes one command. Returns `false` when the REPL should exit.
    pub fn dispatch(self: &Arc<Self>, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::SwitchTab(tab) => self.switch_to(tab),
            Command::SetKey(key) => {
                let app = Arc::clone(self);
                tokio::spawn(async move { app.set_api_key(&key).await });
            }
            Command::LoadSources => {
                let controller = Arc::clone(&self.controller);
                tokio::spawn(async move {
                    let _ = controller.load_sources().await;
                });
            }
            Command::Select(index) => match self.resolve_source(index) {
                Ok(source) => {
                    self.switch_to(Tab::Chat);
                    let app = Arc::clone(self);
                    tokio::spawn(async move { app.create_session(source).await });
                }
                Err(message) => print_lines(vec![Line::Error(message)]),
            },
            Command::Approve => {
                let controller = Arc::clone(&self.controller);
                tokio::spawn(async move {
                    let _ = controller.approve_plan().await;
                });
            }
            Command::Stop => {
                let controller = Arc::clone(&self.controller);
                tokio::spawn(async move {
                    let _ = controller.stop_polling().await;
                });
            }
            Command::Send(text) => {
                let controller = Arc::clone(&self.controller);
                tokio::spawn(async move {
                    let _ = controller.send_message(&text).await;
                });
            }
            Command::Help => print_help(),
            Command::Invalid(message) => print_lines(vec![Line::Error(message)]),
        }
        true
    }

    /// Initializes the client and, on success, loads sources.
    pub async fn set_api_key(&self, key: &str) {
        if self.controller.initialize_client(key).await.is_err() {
            return;
        }
        if let Ok(mut current) = self.api_key.lock() {
            *current = Some(key.trim().to_string());
        }
        if let Ok(mut view) = self.view.lock() {
            view.set_has_api_key(true);
        }
        let _ = self.controller.load_sources().await;
    }

    pub fn switch_to(&self, tab: Tab) {
        let lines = match self.view.lock() {
            Ok(mut view) => view.switch_to(tab),
            Err(_) => return,
        };
        print_lines(lines);
    }

    pub async fn shutdown(&self) {
        self.controller.shutdown().await;
    }

    async fn create_session(&self, source: Source) {
        if self.controller.create_session(&source).await.is_err() {
            return;
        }
        if let Ok(mut view) = self.view.lock() {
            view.select_source(source.name.clone());
        }

        let settings = Settings {
            api_key: self.api_key.lock().ok().and_then(|key| key.clone()),
            selected_source_name: Some(source.name),
        };
        if let Err(e) = self.settings.save(&settings).await {
            warn!(error = %e, "failed to persist settings");
            eprintln!("{}", format!("Failed to save settings: {e}").red());
        }
    }

    fn resolve_source(&self, index: Option<usize>) -> Result<Source, String> {
        let view = self
            .view
            .lock()
            .map_err(|_| "View state is unavailable".to_string())?;
        let sources = &view.state().sources;

        match index {
            Some(index) => sources.get(index - 1).cloned().ok_or_else(|| {
                format!("No source #{index}. Load sources with /sources first.")
            }),
            None => {
                let saved = view
                    .selected_source()
                    .ok_or_else(|| "Usage: /select <n>".to_string())?;
                Ok(sources
                    .iter()
                    .find(|source| source.name == saved)
                    .cloned()
                    .unwrap_or_else(|| Source::named(saved)))
            }
        }
    }
}

pub fn print_help() {
    let help = [
        ("/settings, /chat, /log", "switch tab"),
        ("/key <key>", "set the API key and load sources"),
        ("/sources", "reload sources"),
        ("/select [n]", "create a session against source n (default: saved source)"),
        ("/approve", "approve the pending plan"),
        ("/stop", "stop polling the current session"),
        ("quit, exit", "leave"),
    ];
    for (command, description) in help {
        println!("{} {}", format!("{command:<24}").bright_cyan(), description.bright_black());
    }
    println!("{}", "Anything else is sent to the current session.".bright_black());
}
