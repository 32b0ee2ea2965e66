use chatdesk_sdk::CompletedCall;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub fn init() -> io::Result<Tui> {
    execute!(io::stdout(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

pub fn restore() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

#[derive(Debug, Clone)]
pub enum Action {
    Tick,
    Quit,
    Resize,
    Key(event::KeyEvent),
    /// A network call finished on its task and is ready to render.
    Completed(CompletedCall),
}

pub struct EventHandler {
    sender: mpsc::UnboundedSender<Action>,
    receiver: mpsc::UnboundedReceiver<Action>,
}

impl EventHandler {
    pub fn new(tick_rate: u64) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let tick_sender = sender.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(tick_rate));
            loop {
                interval.tick().await;
                if tick_sender.send(Action::Tick).is_err() {
                    break;
                }
            }
        });

        // crossterm reads block, so input gets its own thread
        let event_sender = sender.clone();
        std::thread::spawn(move || loop {
            let action = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Action::Key(key),
                Ok(Event::Resize(..)) => Action::Resize,
                Ok(_) => continue,
                Err(_) => Action::Quit,
            };
            let stop = matches!(action, Action::Quit);
            if event_sender.send(action).is_err() || stop {
                break;
            }
        });

        Self { sender, receiver }
    }

    pub async fn next(&mut self) -> Option<Action> {
        self.receiver.recv().await
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Action> {
        self.sender.clone()
    }
}
