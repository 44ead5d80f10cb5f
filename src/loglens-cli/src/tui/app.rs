//! Main TUI application: owns the event loop, terminal, fetch channel,
//! and render cycle.

use std::time::Duration;

use crossterm::event::KeyEvent;
use loglens_sdk::QueryClient;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::action::{Action, map_key_to_action};
use super::components::Component;
use super::components::query::QueryPanel;
use super::components::status_bar::StatusBar;
use super::event::{Event, EventHandler};
use super::fetch::{self, FetchOutcome};
use super::state::AppState;
use super::terminal::Tui;

const TICK_RATE: Duration = Duration::from_millis(100);

/// Top-level TUI application.
pub struct App {
    client: QueryClient,
    running: bool,
    state: AppState,
    panel: QueryPanel,
    status_bar: StatusBar,
    /// Sequence number of the most recently started fetch. Outcomes
    /// carrying an older number are dropped.
    fetch_seq: u64,
    outcome_tx: UnboundedSender<FetchOutcome>,
    outcome_rx: UnboundedReceiver<FetchOutcome>,
}

impl App {
    /// Create an `App` querying `stream` through `client`.
    pub fn new(client: QueryClient, profile: String, stream: String, duration_minutes: u32) -> Self {
        let state = AppState::new(profile, client.base_url().to_string(), stream.clone());
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            client,
            running: true,
            state,
            panel: QueryPanel::new(&stream, duration_minutes),
            status_bar: StatusBar::new(),
            fetch_seq: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Run the main event loop until quit.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut tui = Tui::new()?;
        tui.init()?;
        let result = self.event_loop(&mut tui).await;
        tui.exit()?;
        result
    }

    async fn event_loop(&mut self, tui: &mut Tui) -> anyhow::Result<()> {
        let mut events = EventHandler::new(TICK_RATE);
        // The panel starts with a run pending, so the first query goes
        // out before any keypress.
        self.start_pending_fetch();

        while self.running {
            tokio::select! {
                event = events.next() => match event? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Tick => self.state.on_tick(),
                    Event::Render | Event::Resize => {
                        tui.terminal.draw(|frame| self.render(frame))?;
                    }
                },
                Some(outcome) = self.outcome_rx.recv() => self.handle_outcome(outcome),
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match map_key_to_action(key) {
            Action::Quit => {
                self.running = false;
                return;
            }
            Action::RunQuery => self.panel.update(&Action::RunQuery, &mut self.state),
            Action::None => {
                self.panel.handle_key_event(key);
            }
        }
        self.start_pending_fetch();
    }

    /// Start a fetch if the panel asked for one. Each fetch gets the next
    /// sequence number; the panel keeps showing the previous result until
    /// the matching outcome arrives.
    fn start_pending_fetch(&mut self) {
        if !self.panel.take_pending_run() {
            return;
        }
        self.fetch_seq += 1;
        self.state.loading = true;
        tracing::debug!(seq = self.fetch_seq, "starting query fetch");
        fetch::spawn(
            self.client.clone(),
            self.panel.request(),
            self.fetch_seq,
            self.outcome_tx.clone(),
        );
    }

    fn handle_outcome(&mut self, outcome: FetchOutcome) {
        if outcome.seq != self.fetch_seq {
            tracing::debug!(
                seq = outcome.seq,
                latest = self.fetch_seq,
                "dropping stale fetch outcome"
            );
            return;
        }
        self.state.loading = false;
        match outcome.result {
            Ok(response) => self.panel.apply_response(&response, &mut self.state),
            Err(cause) => self.panel.apply_failure(&cause, &mut self.state),
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let [panel_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
        self.panel.render(frame, panel_area, &self.state);
        self.status_bar.render(frame, status_area, &self.state);
    }
}
