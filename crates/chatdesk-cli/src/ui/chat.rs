use chatdesk_sdk::{Bridge, DisplayBubble, Operation, Sender, Transport};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::app_state::{AppController, Focus};
use crate::tui::Action;

const LEGEND: &str =
    "Tab field | Enter send | F2 reset | F3 history | F4 radar | F5 pulse | F6 alerts | Esc quit";

pub struct ChatApp<T: Transport> {
    bridge: Bridge<T>,
    tx: UnboundedSender<Action>,
    endpoint: String,
    focus: Focus,
    message: String,
    in_flight: usize,
    should_quit: bool,
}

impl<T: Transport> ChatApp<T> {
    pub fn new(mut bridge: Bridge<T>, endpoint: impl Into<String>, tx: UnboundedSender<Action>) -> Self {
        bridge.greet();
        Self {
            bridge,
            tx,
            endpoint: endpoint.into(),
            focus: Focus::default(),
            message: String::new(),
            in_flight: 0,
            should_quit: false,
        }
    }

    /// Start `operation` and run its call on a separate task.
    fn dispatch(&mut self, operation: Operation) {
        let Some(pending) = self.bridge.begin(operation) else {
            return;
        };

        debug!(kind = %pending.kind(), user_id = %pending.user_id(), "dispatching");
        self.in_flight += 1;
        let transport = self.bridge.transport().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let completed = pending.execute(&transport).await;
            // the receiver is gone only once the UI has quit
            let _ = tx.send(Action::Completed(completed));
        });
    }

    fn submit_message(&mut self) {
        if self.message.trim().is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.message);
        self.dispatch(Operation::Chat(text));
    }

    fn focused_field(&mut self) -> &mut String {
        match self.focus {
            Focus::User => self.bridge.user_field_mut(),
            Focus::Message => &mut self.message,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.toggle(),
            KeyCode::Enter => self.submit_message(),
            KeyCode::F(2) => self.dispatch(Operation::reset()),
            KeyCode::F(3) => self.dispatch(Operation::History),
            KeyCode::F(4) => self.dispatch(Operation::Radar),
            KeyCode::F(5) => self.dispatch(Operation::Pulse),
            KeyCode::F(6) => self.dispatch(Operation::Alerts),
            KeyCode::Char(c) => self.focused_field().push(c),
            KeyCode::Backspace => {
                self.focused_field().pop();
            }
            _ => {}
        }
    }

    fn input_block(&self, title: &'static str, field: Focus) -> Block<'static> {
        let style = if self.focus == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Block::default().borders(Borders::ALL).title(title).border_style(style)
    }
}

impl<T: Transport> AppController for ChatApp<T> {
    fn update(&mut self, action: Action) {
        match action {
            Action::Key(key) => self.handle_key(key),
            Action::Completed(call) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.bridge.complete(call);
            }
            Action::Quit => self.should_quit = true,
            Action::Tick | Action::Resize => {}
        }
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(f.area());

        // Transcript
        let title = if self.in_flight == 0 {
            format!("Chatdesk @ {}", self.endpoint)
        } else {
            format!("Chatdesk @ {} ({} pending)", self.endpoint, self.in_flight)
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(chunks[0]);
        let transcript = Paragraph::new(transcript_lines(self.bridge.transcript().bubbles()))
            .wrap(Wrap { trim: false });
        // counted before the block is attached, which would add its borders
        let scroll = scroll_offset(transcript.line_count(inner.width), inner.height);
        let transcript = transcript.block(block).scroll((scroll, 0));
        f.render_widget(transcript, chunks[0]);

        // Inputs
        let inputs = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
            .split(chunks[1]);

        let user = Paragraph::new(self.bridge.user_field()).block(self.input_block("User", Focus::User));
        f.render_widget(user, inputs[0]);
        let message =
            Paragraph::new(self.message.as_str()).block(self.input_block("Message", Focus::Message));
        f.render_widget(message, inputs[1]);

        let (area, typed) = match self.focus {
            Focus::User => (inputs[0], self.bridge.user_field()),
            Focus::Message => (inputs[1], self.message.as_str()),
        };
        f.set_cursor_position(cursor_position(area, typed));

        // Legend
        let legend = Paragraph::new(Line::from(Span::styled(
            LEGEND,
            Style::default().add_modifier(Modifier::DIM),
        )));
        f.render_widget(legend, chunks[2]);
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// One styled line per text line, with a blank line between bubbles.
fn transcript_lines(bubbles: &[DisplayBubble]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, bubble) in bubbles.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        let style = match bubble.sender {
            Sender::Me => Style::default().fg(Color::Green),
            Sender::Bot => Style::default().fg(Color::Cyan),
        };
        for text in bubble.text.split('\n') {
            let line = Line::styled(text.to_string(), style);
            lines.push(match bubble.sender {
                Sender::Me => line.right_aligned(),
                Sender::Bot => line.left_aligned(),
            });
        }
    }
    lines
}

/// Rows to scroll so the last of `rows` wrapped rows sits at the bottom of the pane.
fn scroll_offset(rows: usize, height: u16) -> u16 {
    u16::try_from(rows.saturating_sub(usize::from(height))).unwrap_or(u16::MAX)
}

fn cursor_position(area: Rect, typed: &str) -> Position {
    let typed = u16::try_from(typed.chars().count()).unwrap_or(u16::MAX);
    let max_x = area.x + area.width.saturating_sub(2);
    Position::new((area.x + 1).saturating_add(typed).min(max_x), area.y + 1)
}
