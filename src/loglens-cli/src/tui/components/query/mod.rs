//! Interactive query panel: SQL editor on top, time range bar below it,
//! result table underneath. The time range overlay, when open, takes over
//! the whole panel and all keys.

pub mod editor;
pub mod results;

use crossterm::event::{KeyCode, KeyEvent};
use loglens_sdk::{QueryRequest, QueryResponse};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use self::editor::QueryEditor;
use self::results::ResultsTable;
use crate::tui::action::Action;
use crate::tui::components::Component;
use crate::tui::components::time_range::{TimeRangeAction, TimeRangePicker};
use crate::tui::state::AppState;

/// Which widget receives plain keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Time,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    None,
    TimeRange,
}

pub struct QueryPanel {
    editor: QueryEditor,
    time_range: TimeRangePicker,
    results: ResultsTable,
    focus: Focus,
    overlay: Overlay,
    /// Set when a fetch should be started; drained by the app loop.
    pending_run: bool,
}

impl QueryPanel {
    pub fn new(stream: &str, duration_minutes: u32) -> Self {
        Self {
            editor: QueryEditor::new(stream),
            time_range: TimeRangePicker::new(duration_minutes),
            results: ResultsTable::new(),
            focus: Focus::Editor,
            overlay: Overlay::None,
            // The first query runs without a keypress.
            pending_run: true,
        }
    }

    #[allow(dead_code)] // Used by panel-focused unit tests
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[allow(dead_code)] // Used by panel-focused unit tests
    pub fn overlay_open(&self) -> bool {
        self.overlay == Overlay::TimeRange
    }

    #[allow(dead_code)] // Used by panel-focused unit tests
    pub fn results(&self) -> &ResultsTable {
        &self.results
    }

    pub fn take_pending_run(&mut self) -> bool {
        std::mem::take(&mut self.pending_run)
    }

    /// Snapshot the editor text and time bounds into a request.
    pub fn request(&self) -> QueryRequest {
        QueryRequest {
            query: self.editor.text(),
            start_time: self.time_range.start_utc(),
            end_time: self.time_range.end_utc(),
        }
    }

    pub fn apply_response(&mut self, response: &QueryResponse, state: &mut AppState) {
        self.results.load(response);
        state.set_info(format!("{} record(s)", response.records.len()));
    }

    /// A failed fetch leaves the previous rows on screen.
    pub fn apply_failure(&mut self, cause: &str, state: &mut AppState) {
        state.set_error(format!("failed to query: {cause}"));
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Editor => Focus::Time,
            Focus::Time => Focus::Table,
            Focus::Table => Focus::Editor,
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Focus::Editor => Focus::Table,
            Focus::Time => Focus::Editor,
            Focus::Table => Focus::Time,
        };
    }
}

impl Component for QueryPanel {
    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if self.overlay == Overlay::TimeRange {
            match self.time_range.handle_key(key) {
                TimeRangeAction::Confirmed | TimeRangeAction::Cancelled => {
                    self.overlay = Overlay::None;
                    self.focus = Focus::Time;
                }
                TimeRangeAction::None => {}
            }
            return true;
        }
        match key.code {
            KeyCode::Tab => {
                self.focus_next();
                return true;
            }
            KeyCode::BackTab => {
                self.focus_prev();
                return true;
            }
            _ => {}
        }
        match self.focus {
            Focus::Editor => {
                self.editor.handle_key(key);
                true
            }
            Focus::Time => {
                if key.code == KeyCode::Enter {
                    self.time_range.begin();
                    self.overlay = Overlay::TimeRange;
                    true
                } else {
                    false
                }
            }
            Focus::Table => self.results.handle_key(key),
        }
    }

    fn update(&mut self, action: &Action, _state: &mut AppState) {
        if matches!(action, Action::RunQuery) {
            self.pending_run = true;
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if self.overlay == Overlay::TimeRange {
            self.time_range.render_overlay(frame, area);
            return;
        }
        let [editor_area, time_area, table_area] = Layout::vertical([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .areas(area);
        self.editor
            .render(frame, editor_area, self.focus == Focus::Editor);
        self.time_range
            .render_bar(frame, time_area, self.focus == Focus::Time);
        let spinner = state.loading.then(|| state.spinner_char());
        self.results
            .render(frame, table_area, self.focus == Focus::Table, spinner);
    }
}
