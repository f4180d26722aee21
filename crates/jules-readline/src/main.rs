use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;

use jules_application::{ClientFactory, EventSink, SessionController};
use jules_core::{JulesApi, SdkResult, SettingsRepository};
use jules_infrastructure::{ConfigService, JulesPaths, TomlSettingsRepository, api_key_from_env};
use jules_interaction::JulesClient;

mod app;
mod command;
mod helper;
mod view;

use app::App;
use helper::CliHelper;

#[derive(Parser)]
#[command(name = "jules-demo")]
#[command(about = "Interactive demo of the Jules SDK", long_about = None)]
struct Cli {
    /// Configuration directory (default: $JULES_CONFIG_DIR or ~/.config/jules)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// API key; overrides $JULES_API_KEY and the saved key
    #[arg(long)]
    api_key: Option<String>,

    /// Seconds between polling cycles
    #[arg(long)]
    poll_interval: Option<u64>,
}

/// Entry point of the demo REPL.
///
/// 1. Resolves paths, loads `config.toml` and the saved settings
/// 2. Installs tracing (file + diagnostic log forwarding)
/// 3. Auto-initializes the client when a key is known
/// 4. Reads commands until `quit`
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ===== Configuration =====
    let paths = JulesPaths::new(cli.config_dir.as_deref())?;
    let mut config = ConfigService::new(&paths).load()?;
    if let Some(secs) = cli.poll_interval {
        config.poll_interval_secs = secs;
    }

    let (events, rx) = EventSink::channel();
    let _log_guard =
        jules_diagnostics::init_tracing(&paths.logs_dir(), "info", Some(events.clone()))?;

    let settings_repo = TomlSettingsRepository::new(&paths);
    let settings = settings_repo.load().await.map_err(|e| anyhow!(e))?;

    // ===== Backend Initialization =====
    let client_config = config.clone();
    let factory: ClientFactory = Arc::new(move |key: &str| -> SdkResult<Arc<dyn JulesApi>> {
        let client = JulesClient::from_config(key, &client_config)?;
        Ok(Arc::new(client))
    });
    let controller = Arc::new(SessionController::new(config, factory, events));

    let app = Arc::new(App::new(
        controller,
        settings_repo,
        settings.selected_source_name.clone(),
    ));
    let pump = app.spawn_event_pump(rx);

    println!("{}", "=== Jules Demo ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/help' for commands, '/settings' to pick a source, or 'quit' to exit."
            .bright_black()
    );
    println!();

    let api_key = cli
        .api_key
        .or_else(api_key_from_env)
        .or_else(|| settings.api_key().map(str::to_string));
    match api_key {
        Some(key) => {
            let startup = Arc::clone(&app);
            tokio::spawn(async move { startup.set_api_key(&key).await });
        }
        None => app.switch_to(view::Tab::Settings),
    }

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let Some(command) = command::parse(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.trim());
                if !app.dispatch(command) {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    app.shutdown().await;
    pump.abort();

    Ok(())
}
