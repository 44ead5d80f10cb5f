//! Time-range input: a compact bar in the base layout plus a modal
//! overlay with two fixed-format date-time fields and a preset list.
//!
//! The fields edit "YYYY-MM-DD HH:MM:SS" in the local timezone by digit
//! substitution: the cursor only visits digit positions, and a typed
//! digit is committed only if the resulting buffer still parses as a
//! real timestamp. Rejected edits change nothing, silently.

use chrono::{
    Duration, Local, LocalResult, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListState, Paragraph};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Byte offsets of the digits in "YYYY-MM-DD HH:MM:SS".
const DIGIT_POSITIONS: [usize; 14] = [0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18];

/// Relative presets: label and extent in minutes. Selecting one anchors
/// the range to the current instant.
const PRESETS: [(&str, i64); 8] = [
    ("10 minutes", 10),
    ("20 minutes", 20),
    ("30 minutes", 30),
    ("1 hour", 60),
    ("3 hours", 180),
    ("1 day", 1_440),
    ("3 days", 4_320),
    ("1 week", 10_080),
];

/// Local wall-clock now, truncated to whole seconds so it fits the
/// display format exactly.
fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Interpret a local wall-clock value as an RFC3339 UTC string. Times in
/// a DST gap are taken as UTC wall clock; ambiguous times use the
/// earlier offset.
fn to_utc_rfc3339(local: NaiveDateTime) -> String {
    let utc = match Local.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&local),
    };
    utc.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Fixed-format editor for one local timestamp. The buffer always holds
/// a value that parses; `value` and `text` never disagree.
#[derive(Debug, Clone)]
pub struct DateTimeField {
    text: String,
    value: NaiveDateTime,
    cursor: usize, // index into DIGIT_POSITIONS
}

impl DateTimeField {
    fn new(value: NaiveDateTime) -> Self {
        Self {
            text: value.format(DATETIME_FORMAT).to_string(),
            value,
            cursor: 0,
        }
    }

    pub fn value(&self) -> NaiveDateTime {
        self.value
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn set(&mut self, value: NaiveDateTime) {
        self.value = value;
        self.text = value.format(DATETIME_FORMAT).to_string();
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor + 1 < DIGIT_POSITIONS.len() {
            self.cursor += 1;
        }
    }

    /// Substitute `digit` at the cursor position. Returns whether the
    /// edit was committed; invalid results are dropped without a trace.
    pub fn type_digit(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() {
            return false;
        }
        let at = DIGIT_POSITIONS[self.cursor];
        let mut candidate = self.text.clone();
        let mut buf = [0u8; 4];
        candidate.replace_range(at..at + 1, digit.encode_utf8(&mut buf));
        match NaiveDateTime::parse_from_str(&candidate, DATETIME_FORMAT) {
            Ok(value) => {
                self.text = candidate;
                self.value = value;
                self.cursor_right();
                true
            }
            Err(_) => false,
        }
    }

    /// The field text with the cursor digit highlighted when focused.
    fn line(&self, focused: bool) -> Line<'_> {
        if !focused {
            return Line::from(self.text.as_str());
        }
        let at = DIGIT_POSITIONS[self.cursor];
        Line::from(vec![
            Span::raw(&self.text[..at]),
            Span::styled(
                &self.text[at..at + 1],
                Style::default().add_modifier(Modifier::REVERSED),
            ),
            Span::raw(&self.text[at + 1..]),
        ])
    }
}

/// Which overlay widget has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFocus {
    Start,
    List,
    End,
}

/// Outcome of a key handled by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRangeAction {
    /// Close the overlay; if the list was focused, the highlighted
    /// preset has been applied.
    Confirmed,
    /// Close the overlay without touching the preset list.
    Cancelled,
    None,
}

/// Start/end fields plus the preset list, with its own focus cycle.
pub struct TimeRangePicker {
    start: DateTimeField,
    end: DateTimeField,
    list_state: ListState,
    focus: TimeFocus,
}

impl TimeRangePicker {
    /// `end = now`, `start = end - duration` (10 minutes if zero).
    pub fn new(duration_minutes: u32) -> Self {
        let minutes = if duration_minutes == 0 {
            10
        } else {
            i64::from(duration_minutes)
        };
        let end = now_local();
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            start: DateTimeField::new(end - Duration::minutes(minutes)),
            end: DateTimeField::new(end),
            list_state,
            focus: TimeFocus::Start,
        }
    }

    #[allow(dead_code)] // Used by picker-focused unit tests
    pub fn start(&self) -> NaiveDateTime {
        self.start.value()
    }

    #[allow(dead_code)] // Used by picker-focused unit tests
    pub fn end(&self) -> NaiveDateTime {
        self.end.value()
    }

    pub fn start_utc(&self) -> String {
        to_utc_rfc3339(self.start.value())
    }

    pub fn end_utc(&self) -> String {
        to_utc_rfc3339(self.end.value())
    }

    #[allow(dead_code)] // Used by picker-focused unit tests
    pub fn focus(&self) -> TimeFocus {
        self.focus
    }

    /// Called when the overlay opens.
    pub fn begin(&mut self) {
        self.focus = TimeFocus::Start;
    }

    /// Re-anchor to now: `end = now`, `start = end - extent`. Any
    /// manually edited end time is discarded.
    fn apply_preset(&mut self, minutes: i64) {
        let end = now_local();
        self.end.set(end);
        self.start.set(end - Duration::minutes(minutes));
    }

    pub fn reset_end_to_now(&mut self) {
        self.end.set(now_local());
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            TimeFocus::Start => TimeFocus::List,
            TimeFocus::List => TimeFocus::End,
            TimeFocus::End => TimeFocus::Start,
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match self.focus {
            TimeFocus::Start => TimeFocus::End,
            TimeFocus::List => TimeFocus::Start,
            TimeFocus::End => TimeFocus::List,
        };
    }

    fn list_down(&mut self) {
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < PRESETS.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    fn list_up(&mut self) {
        let i = match self.list_state.selected() {
            Some(0) | None => PRESETS.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> TimeRangeAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('n') {
                self.reset_end_to_now();
            }
            return TimeRangeAction::None;
        }
        match key.code {
            KeyCode::Tab => {
                self.focus_next();
                TimeRangeAction::None
            }
            KeyCode::BackTab => {
                self.focus_prev();
                TimeRangeAction::None
            }
            KeyCode::Esc => TimeRangeAction::Cancelled,
            KeyCode::Enter => {
                if self.focus == TimeFocus::List
                    && let Some(i) = self.list_state.selected()
                {
                    self.apply_preset(PRESETS[i].1);
                }
                TimeRangeAction::Confirmed
            }
            code => {
                match self.focus {
                    TimeFocus::List => match code {
                        KeyCode::Up | KeyCode::Char('k') => self.list_up(),
                        KeyCode::Down | KeyCode::Char('j') => self.list_down(),
                        _ => {}
                    },
                    TimeFocus::Start => Self::field_key(&mut self.start, code),
                    TimeFocus::End => Self::field_key(&mut self.end, code),
                }
                TimeRangeAction::None
            }
        }
    }

    fn field_key(field: &mut DateTimeField, code: KeyCode) {
        match code {
            KeyCode::Left => field.cursor_left(),
            KeyCode::Right => field.cursor_right(),
            KeyCode::Char(c) => {
                field.type_digit(c);
            }
            _ => {}
        }
    }

    /// The collapsed one-line representation for the base layout.
    pub fn render_bar(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border = if focused { Color::Yellow } else { Color::DarkGray };
        let title = if focused {
            " Time Range (enter: edit) "
        } else {
            " Time Range "
        };
        let text = format!("{}  to  {}", self.start.text(), self.end.text());
        let paragraph = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(paragraph, area);
    }

    /// The modal editor, centered in `area`.
    pub fn render_overlay(&mut self, frame: &mut Frame, area: Rect) {
        let [modal] = Layout::vertical([Constraint::Length(18)])
            .flex(Flex::Center)
            .areas(area);
        let [modal] = Layout::horizontal([Constraint::Length(60)])
            .flex(Flex::Center)
            .areas(modal);
        frame.render_widget(Clear, modal);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Time Range ")
            .title_bottom(" enter: apply  tab: next  ctrl+n: end=now  esc: close ");
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(PRESETS.len() as u16 + 2),
            Constraint::Length(3),
        ])
        .split(inner);

        Self::render_field(
            frame,
            chunks[0],
            &self.start,
            " From ",
            self.focus == TimeFocus::Start,
        );

        let list_border = if self.focus == TimeFocus::List {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let list = List::new(PRESETS.map(|(label, _)| label))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Last ")
                    .border_style(Style::default().fg(list_border)),
            )
            .highlight_symbol("> ")
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);

        Self::render_field(
            frame,
            chunks[2],
            &self.end,
            " To ",
            self.focus == TimeFocus::End,
        );
    }

    fn render_field(frame: &mut Frame, area: Rect, field: &DateTimeField, title: &str, focused: bool) {
        let border = if focused { Color::Yellow } else { Color::DarkGray };
        let paragraph = Paragraph::new(field.line(focused)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(paragraph, area);
    }
}
