//! `chatdesk`: terminal client for the Chatdesk agent backend.
//!
//! Without a subcommand it opens the interactive transcript UI. The one-shot
//! subcommands run a single operation and print the bubbles it appended.

mod app_state;
mod tui;
mod ui;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use chatdesk_sdk::{Bridge, ClientConfig, DisplayBubble, HttpTransport, Operation};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app_state::AppController;
use crate::tui::EventHandler;
use crate::ui::chat::ChatApp;

/// UI tick interval in milliseconds.
const TICK_RATE_MS: u64 = 250;

#[derive(Parser, Debug)]
#[command(name = "chatdesk")]
#[command(about = "Terminal client for the Chatdesk agent backend")]
#[command(author, version, long_about = None)]
struct Cli {
    /// Backend origin (overrides CHATDESK_URL)
    #[arg(long)]
    url: Option<String>,

    /// Initial contents of the identifier field
    #[arg(long)]
    user: Option<String>,

    /// Identifier used when the field is blank (overrides CHATDESK_FALLBACK_USER)
    #[arg(long)]
    fallback_user: Option<String>,

    /// Log file for the interactive UI
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Interactive UI (the default)
    Tui,
    /// Send one chat message
    Chat {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Reset the conversation
    Reset,
    /// Show recent turns
    History,
    /// Ask for a radar report
    Radar,
    /// Show the pulse feed
    Pulse,
    /// Show the alerts feed
    Alerts,
}

impl Command {
    /// The operation a one-shot subcommand runs; `None` for the UI.
    fn operation(&self) -> Option<Operation> {
        match self {
            Self::Tui => None,
            Self::Chat { text } => Some(Operation::Chat(text.join(" "))),
            Self::Reset => Some(Operation::reset()),
            Self::History => Some(Operation::History),
            Self::Radar => Some(Operation::Radar),
            Self::Pulse => Some(Operation::Pulse),
            Self::Alerts => Some(Operation::Alerts),
        }
    }
}

impl Cli {
    /// Environment configuration with command-line flags layered on top.
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.url {
            config.base_url.clone_from(url);
        }
        if let Some(fallback) = self.fallback_user.as_deref().filter(|f| !f.trim().is_empty()) {
            config.fallback_user_id = fallback.trim().to_string();
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.client_config();

    match cli.command.as_ref().and_then(Command::operation) {
        Some(operation) => {
            init_stderr_logging();
            run_once(&config, cli.user, operation).await
        }
        None => {
            let log_path = init_file_logging(cli.log_file.clone())?;
            info!(url = %config.base_url, log = %log_path.display(), "starting interactive client");
            run_tui(&config, cli.user).await
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Route logs to a file so they do not draw over the UI.
fn init_file_logging(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let path = path
        .or_else(default_log_path)
        .context("no cache directory available; pass --log-file")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(path)
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("chatdesk").join("chatdesk.log"))
}

// ---------------------------------------------------------------------------
// One-shot mode
// ---------------------------------------------------------------------------

async fn run_once(config: &ClientConfig, user: Option<String>, operation: Operation) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config.base_url)?;
    let mut bridge = Bridge::new(transport, config);
    if let Some(user) = user {
        bridge.set_user_field(user);
    }

    let mark = bridge.transcript().len();
    if bridge.run(operation).await.is_none() {
        anyhow::bail!("message is blank, nothing sent");
    }

    write_bubbles(&mut std::io::stdout().lock(), bridge.transcript().since(mark))?;
    Ok(())
}

fn write_bubbles(out: &mut impl Write, bubbles: &[DisplayBubble]) -> std::io::Result<()> {
    for bubble in bubbles {
        writeln!(out, "{}", format_bubble(bubble))?;
    }
    out.flush()
}

/// `me> text` / `bot> text`, with continuation lines indented under the text.
fn format_bubble(bubble: &DisplayBubble) -> String {
    let prefix = format!("{}> ", bubble.sender);
    let indent = " ".repeat(prefix.len());
    let mut out = String::new();
    for (i, line) in bubble.text.split('\n').enumerate() {
        out.push_str(if i == 0 { &prefix } else { &indent });
        out.push_str(line);
        out.push('\n');
    }
    out.pop();
    out
}

// ---------------------------------------------------------------------------
// Interactive mode
// ---------------------------------------------------------------------------

async fn run_tui(config: &ClientConfig, user: Option<String>) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config.base_url)?;
    let mut bridge = Bridge::new(transport, config);
    if let Some(user) = user {
        bridge.set_user_field(user);
    }

    let mut events = EventHandler::new(TICK_RATE_MS);
    let mut app = ChatApp::new(bridge, config.base_url.clone(), events.sender());

    let mut terminal = tui::init()?;
    let result = event_loop(&mut terminal, &mut events, &mut app).await;
    tui::restore()?;
    result
}

async fn event_loop(
    terminal: &mut tui::Tui,
    events: &mut EventHandler,
    app: &mut impl AppController,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        let Some(action) = events.next().await else {
            break;
        };
        app.update(action);
        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
