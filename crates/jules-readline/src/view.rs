//! Terminal rendering of the folded UI state.
//!
//! The REPL has three tabs. Events are always folded into [`UiState`]; what
//! gets printed depends on the tab that is active when the event arrives.

use colored::Colorize;
use jules_application::UiState;
use jules_core::{LogEntry, Message, MessageRole, SessionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Settings,
    Chat,
    Log,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::Settings => "Settings",
            Tab::Chat => "Chat",
            Tab::Log => "Log",
        }
    }
}

/// One printable unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Chat(Message),
    Log(LogEntry),
    Status(String),
    Error(String),
}

impl Line {
    pub fn render(&self) -> String {
        match self {
            Line::Chat(message) => match message.role {
                MessageRole::User => format!("> {}", message.text).green().to_string(),
                MessageRole::Agent => message.text.bright_blue().to_string(),
                MessageRole::Error => message.text.red().to_string(),
            },
            Line::Log(entry) => entry.to_string().bright_black().to_string(),
            Line::Status(text) => text.bright_yellow().to_string(),
            Line::Error(text) => format!("Error: {text}").red().to_string(),
        }
    }
}

pub struct View {
    tab: Tab,
    state: UiState,
    has_api_key: bool,
    /// Resource name of the preselected source.
    selected_source: Option<String>,
}

impl View {
    pub fn new(selected_source: Option<String>) -> Self {
        Self {
            tab: Tab::Chat,
            state: UiState::default(),
            has_api_key: false,
            selected_source,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn set_has_api_key(&mut self, has_api_key: bool) {
        self.has_api_key = has_api_key;
    }

    pub fn selected_source(&self) -> Option<&str> {
        self.selected_source.as_deref()
    }

    pub fn select_source(&mut self, name: impl Into<String>) {
        self.selected_source = Some(name.into());
    }

    /// Switches tabs and returns the full content of the new tab.
    pub fn switch_to(&mut self, tab: Tab) -> Vec<Line> {
        self.tab = tab;
        let mut lines = vec![Line::Status(format!("=== {} ===", tab.title()))];
        lines.extend(self.render_tab());
        lines
    }

    /// Folds `event` and returns what the active tab should print.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Line> {
        let lines = match (&event, self.tab) {
            (SessionEvent::NewMessage { message, .. }, Tab::Chat) => {
                vec![Line::Chat(message.clone())]
            }
            (SessionEvent::LogAppended { entry }, Tab::Log) => vec![Line::Log(entry.clone())],
            (SessionEvent::ApiFailure { message }, Tab::Settings | Tab::Chat) => {
                vec![Line::Error(message.clone())]
            }
            (SessionEvent::Loading, Tab::Settings) => vec![Line::Status("Loading...".to_string())],
            (SessionEvent::SessionStarted { session }, Tab::Settings | Tab::Chat) => {
                vec![Line::Status(format!("Session started: {}", session.name))]
            }
            (SessionEvent::StateChanged { state, .. }, Tab::Chat) => {
                vec![Line::Status(format!("[state: {state}]"))]
            }
            (SessionEvent::SessionEnded { state, .. }, Tab::Settings | Tab::Chat) => {
                vec![Line::Status(format!("Session ended: {state}"))]
            }
            _ => Vec::new(),
        };

        let sources_loaded = matches!(event, SessionEvent::SourcesLoaded { .. });
        self.state.apply(event);

        if sources_loaded && self.tab == Tab::Settings {
            return self.source_lines();
        }
        lines
    }

    fn render_tab(&self) -> Vec<Line> {
        match self.tab {
            Tab::Settings => {
                let mut lines = vec![Line::Status(format!(
                    "API key: {}",
                    if self.has_api_key { "set" } else { "not set" }
                ))];
                if let Some(message) = self.state.error() {
                    lines.push(Line::Error(message.to_string()));
                }
                lines.extend(self.source_lines());
                lines
            }
            Tab::Chat => self.state.messages.iter().cloned().map(Line::Chat).collect(),
            Tab::Log => self.state.logs.iter().cloned().map(Line::Log).collect(),
        }
    }

    fn source_lines(&self) -> Vec<Line> {
        if self.state.sources.is_empty() {
            return vec![Line::Status("No sources loaded. Use /sources.".to_string())];
        }
        self.state
            .sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                let marker = if self.selected_source.as_deref() == Some(source.name.as_str()) {
                    "*"
                } else {
                    " "
                };
                Line::Status(format!(
                    "{marker} {}. {} ({})",
                    index + 1,
                    source.display_name(),
                    source.display_url()
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jules_core::Source;

    fn agent(text: &str) -> SessionEvent {
        SessionEvent::NewMessage {
            session_name: Some("sessions/1".to_string()),
            message: Message::agent(text),
        }
    }

    #[test]
    fn test_chat_tab_prints_messages_not_logs() {
        let mut view = View::new(None);

        assert_eq!(view.apply(agent("hi")).len(), 1);
        assert!(view.apply(SessionEvent::log("request completed")).is_empty());
        assert_eq!(view.state().logs.len(), 1);
    }

    #[test]
    fn test_switching_to_log_replays_history() {
        let mut view = View::new(None);
        view.apply(SessionEvent::log("one"));
        view.apply(SessionEvent::log("two"));

        let lines = view.switch_to(Tab::Log);
        assert_eq!(lines.len(), 3);
        assert!(matches!(&lines[2], Line::Log(entry) if entry.text == "two"));
    }

    #[test]
    fn test_settings_tab_lists_sources_with_saved_selection() {
        let mut view = View::new(Some("sources/github/octo/hello".to_string()));
        view.switch_to(Tab::Settings);

        let lines = view.apply(SessionEvent::SourcesLoaded {
            sources: vec![
                Source::named("sources/github/octo/other"),
                Source::named("sources/github/octo/hello"),
            ],
        });

        let texts: Vec<_> = lines
            .iter()
            .filter_map(|line| match line {
                Line::Status(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].starts_with("  1."));
        assert!(texts[1].starts_with("* 2."));
    }

    #[test]
    fn test_api_failure_shown_outside_log_tab() {
        let mut view = View::new(None);
        let failure = SessionEvent::ApiFailure {
            message: "API Key is not set.".to_string(),
        };

        assert_eq!(
            view.apply(failure.clone()),
            vec![Line::Error("API Key is not set.".to_string())]
        );
        view.switch_to(Tab::Log);
        assert!(view.apply(failure).is_empty());
    }
}
