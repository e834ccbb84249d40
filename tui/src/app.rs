//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - `WorkflowClient` for classification
//! - `DisplayState` for rendering
//!
//! The App:
//! 1. Turns the typed path into a submission on Enter
//! 2. Polls the embedded workflow every frame
//! 3. Receives `WorkflowMessage`s and updates `DisplayState`
//! 4. Renders based on `DisplayState`

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};

use classifier_core::{ClassificationBackend, NotifyLevel, WorkflowPhase};

use crate::display::DisplayState;
use crate::theme::{
    level_color, DIM_GRAY, ERROR_RED, INPUT_TEXT, PROCESSING_BLUE, STARGAZE_ACCENT,
};
use crate::widgets::{Breakdown, TextBlock};
use crate::workflow_client::WorkflowClient;

/// Input box height (lines, including borders)
const INPUT_HEIGHT: u16 = 3;

/// Notification area height
const NOTIFICATION_HEIGHT: u16 = 2;

/// Main application state
pub struct App<B: ClassificationBackend + 'static> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Workflow Integration ===
    /// Client for the embedded workflow
    client: WorkflowClient<B>,
    /// Display state derived from workflow messages
    display: DisplayState,

    // === Input State ===
    /// Path typed by the user
    input_buffer: String,

    // === Misc State ===
    /// Last frame time (for notification expiry)
    last_frame: Instant,
}

impl<B: ClassificationBackend + 'static> App<B> {
    /// Create a new App around a workflow client
    pub fn new(client: WorkflowClient<B>) -> Self {
        Self {
            running: true,
            client,
            display: DisplayState::new(),
            input_buffer: String::new(),
            last_frame: Instant::now(),
        }
    }

    /// Prefill the path input
    pub fn with_input(mut self, path: impl Into<String>) -> Self {
        self.input_buffer = path.into();
        self
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Current path input
    pub fn input(&self) -> &str {
        &self.input_buffer
    }

    /// The embedded workflow client
    pub fn client(&self) -> &WorkflowClient<B> {
        &self.client
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // Target ~10 FPS, plenty for a status screen
        let frame_duration = Duration::from_millis(100);

        // Async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        // Only handle Press events (not Release or Repeat)
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key).await;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!("Terminal event error: {}", e);
                        }
                        None => self.running = false,
                    }
                }

                _ = tokio::time::sleep(frame_duration) => {}
            }

            self.tick().await;
            terminal.draw(|frame| self.draw(frame))?;
        }

        Ok(())
    }

    /// Poll the workflow, apply its messages and age the notification
    pub async fn tick(&mut self) {
        let settled = self.client.poll().await;
        let messages = self.process_workflow_messages();
        if settled || messages > 0 {
            self.display.refresh(&self.client);
        }

        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.display.update(delta);
    }

    /// Apply all pending workflow messages; returns how many there were
    fn process_workflow_messages(&mut self) -> usize {
        let messages = self.client.recv_all();
        let count = messages.len();
        for msg in messages {
            self.display.apply_message(msg);
        }
        count
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Submit
            KeyCode::Enter => {
                self.submit().await;
            }

            // Typing
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }

            _ => {}
        }
    }

    /// Submit the typed path
    async fn submit(&mut self) {
        if self.client.is_submitting() {
            return;
        }

        let path = self.input_buffer.trim().to_string();
        match self.client.submit_path(&path).await {
            Ok(outcome) => {
                tracing::debug!(?outcome, path = %path, "Submitted");
            }
            // The workflow already reported a missing file
            Err(_) if path.is_empty() => {}
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Could not build request");
                self.display
                    .show_notification(NotifyLevel::Error, "Cannot classify image", e.to_string());
            }
        }

        self.process_workflow_messages();
        self.display.refresh(&self.client);
    }

    /// Render the whole screen
    pub fn draw(&self, frame: &mut Frame) {
        let [title, input, status, hint, notification, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(NOTIFICATION_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_title(frame, title);
        self.render_input(frame, input);
        self.render_status(frame, status);
        self.render_hint(frame, hint);
        self.render_notification(frame, notification);
        self.render_body(frame, body);
        Self::render_footer(frame, footer);
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                "Stargaze",
                Style::default()
                    .fg(STARGAZE_ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  astronomical object classifier  {}", self.client.endpoint()),
                Style::default().fg(DIM_GRAY),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let border = if self.client.is_submitting() {
            DIM_GRAY
        } else {
            STARGAZE_ACCENT
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Image path ");
        let text = Paragraph::new(format!("{}_", self.input_buffer))
            .style(Style::default().fg(INPUT_TEXT))
            .block(block);
        frame.render_widget(text, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let color = match self.display.phase {
            WorkflowPhase::Idle => DIM_GRAY,
            WorkflowPhase::Submitting => PROCESSING_BLUE,
            WorkflowPhase::Succeeded => level_color(NotifyLevel::Success),
            WorkflowPhase::Failed => ERROR_RED,
        };
        let line = Line::from(vec![
            Span::styled("Status: ", Style::default().fg(DIM_GRAY)),
            Span::styled(self.display.status_line(), Style::default().fg(color)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_hint(&self, frame: &mut Frame, area: Rect) {
        if let Some(hint) = self.display.processing_hint() {
            frame.render_widget(
                Paragraph::new(hint).style(Style::default().fg(PROCESSING_BLUE)),
                area,
            );
        }
    }

    fn render_notification(&self, frame: &mut Frame, area: Rect) {
        let Some(ref notification) = self.display.notification else {
            return;
        };
        let text = format!("{}: {}", notification.title, notification.message);
        frame.render_widget(
            TextBlock::new(&text).style(Style::default().fg(level_color(notification.level))),
            area,
        );
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref error) = self.display.error {
            let [label, message] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);
            frame.render_widget(
                Paragraph::new(error.kind.label()).style(
                    Style::default()
                        .fg(ERROR_RED)
                        .add_modifier(Modifier::BOLD),
                ),
                label,
            );
            frame.render_widget(
                TextBlock::new(&error.message).style(Style::default().fg(ERROR_RED)),
                message,
            );
            return;
        }

        if let Some(ref result) = self.display.result {
            let service_message = result.message.as_deref().unwrap_or_default();
            let message_height = TextBlock::new(service_message).height(area.width);
            let [count, image, message, _, rows] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(message_height),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .areas(area);

            frame.render_widget(
                Paragraph::new(format!("Detected objects: {}", result.object_count)).style(
                    Style::default()
                        .fg(INPUT_TEXT)
                        .add_modifier(Modifier::BOLD),
                ),
                count,
            );
            frame.render_widget(
                Paragraph::new(result.annotated_image_line())
                    .style(Style::default().fg(DIM_GRAY)),
                image,
            );
            frame.render_widget(
                TextBlock::new(service_message).style(Style::default().fg(DIM_GRAY)),
                message,
            );

            if result.entries.is_empty() {
                frame.render_widget(
                    Paragraph::new("No objects found.").style(Style::default().fg(DIM_GRAY)),
                    rows,
                );
            } else {
                frame.render_widget(Breakdown::new(&result.entries), rows);
            }
            return;
        }

        if self.display.phase == WorkflowPhase::Idle {
            frame.render_widget(
                TextBlock::new("Type the path of a .jpg or .png astronomy photo and press Enter.")
                    .style(Style::default().fg(DIM_GRAY)),
                area,
            );
        }
    }

    fn render_footer(frame: &mut Frame, area: Rect) {
        frame.render_widget(
            Paragraph::new("Enter: classify   Esc/Ctrl+C: quit")
                .style(Style::default().fg(DIM_GRAY)),
            area,
        );
    }
}
