//! Parsing of REPL input lines.

use crate::view::Tab;

/// Completion candidates, in the order they are offered.
pub const COMMANDS: &[&str] = &[
    "/settings",
    "/chat",
    "/log",
    "/key",
    "/sources",
    "/select",
    "/approve",
    "/stop",
    "/help",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SwitchTab(Tab),
    SetKey(String),
    LoadSources,
    /// 1-based index into the loaded sources; `None` reuses the saved source.
    Select(Option<usize>),
    Approve,
    Stop,
    Help,
    Quit,
    Send(String),
    Invalid(String),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Some(Command::Quit);
    }
    if !trimmed.starts_with('/') {
        return Some(Command::Send(trimmed.to_string()));
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (trimmed, ""),
    };

    let command = match name {
        "/settings" => Command::SwitchTab(Tab::Settings),
        "/chat" => Command::SwitchTab(Tab::Chat),
        "/log" => Command::SwitchTab(Tab::Log),
        "/key" if arg.is_empty() => Command::Invalid("Usage: /key <api key>".to_string()),
        "/key" => Command::SetKey(arg.to_string()),
        "/sources" => Command::LoadSources,
        "/select" if arg.is_empty() => Command::Select(None),
        "/select" => match arg.parse::<usize>() {
            Ok(index) if index > 0 => Command::Select(Some(index)),
            _ => Command::Invalid(format!("Invalid source number: {arg}")),
        },
        "/approve" => Command::Approve,
        "/stop" => Command::Stop,
        "/help" => Command::Help,
        other => Command::Invalid(format!("Unknown command: {other}")),
    };
    Some(command)
}
