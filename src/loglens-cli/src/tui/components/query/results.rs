//! Result table: reserved-column pinning, width inference, vertical and
//! horizontal scrolling, and a substring row filter.
//!
//! Column layout is derived once per result set and never recomputed
//! while the user scrolls or filters. Cell text is pre-rendered at load
//! time so the filter and the width scan agree on what a cell "is".

use crossterm::event::{KeyCode, KeyEvent};
use loglens_sdk::QueryResponse;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use serde_json::{Map, Value};

/// Server-reserved fields with pinned table positions.
pub const TIMESTAMP_FIELD: &str = "p_timestamp";
pub const TAGS_FIELD: &str = "p_tags";
pub const METADATA_FIELD: &str = "p_metadata";

const TIMESTAMP_WIDTH: u16 = 26;
const MAX_WIDTH: usize = 100;
const MIN_WIDTH: usize = 2;
const WIDTH_SAMPLE: usize = 100;

/// Cell text for a field absent from a record. Distinct from an empty
/// string value and from an explicit null.
const MISSING_CELL: &str = "\u{2205}";

/// One column with its fixed display width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub width: u16,
}

/// Sub-state of the row filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Off,
    /// Keys are captured as filter text.
    Typing,
    /// Filter text is kept; keys navigate again.
    Applied,
}

pub struct ResultsTable {
    columns: Vec<Column>,
    /// Pre-rendered cell text, aligned with `columns`.
    rows: Vec<Vec<String>>,
    /// Indices into `rows` that pass the filter, in display order.
    visible: Vec<usize>,
    table_state: TableState,
    col_offset: usize,
    filter: String,
    filter_mode: FilterMode,
    /// Body height from the last render; used for paging.
    page_rows: u16,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            visible: Vec::new(),
            table_state: TableState::default(),
            col_offset: 0,
            filter: String::new(),
            filter_mode: FilterMode::Off,
            page_rows: 10,
        }
    }

    #[allow(dead_code)] // Used by table-focused unit tests
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[allow(dead_code)] // Used by table-focused unit tests
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    #[allow(dead_code)] // Used by table-focused unit tests
    pub fn visible_rows(&self) -> usize {
        self.visible.len()
    }

    #[allow(dead_code)] // Used by table-focused unit tests
    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    #[allow(dead_code)] // Used by table-focused unit tests
    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Replace the table with a new result set. Columns and widths are
    /// derived here, once; an active filter is re-applied to the new rows.
    pub fn load(&mut self, response: &QueryResponse) {
        let names = order_fields(&response.fields);
        self.columns = names
            .iter()
            .map(|name| Column {
                name: name.clone(),
                width: infer_width(name, &response.records),
            })
            .collect();
        self.rows = response
            .records
            .iter()
            .map(|record| names.iter().map(|name| cell_text(record.get(name))).collect())
            .collect();
        self.col_offset = 0;
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = if needle.is_empty() {
            (0..self.rows.len()).collect()
        } else {
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.iter().any(|cell| cell.to_lowercase().contains(&needle)))
                .map(|(i, _)| i)
                .collect()
        };
        let selection = if self.visible.is_empty() { None } else { Some(0) };
        self.table_state.select(selection);
    }

    pub fn scroll_up(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let previous = match self.table_state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(previous));
    }

    pub fn scroll_down(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(next));
    }

    pub fn page_up(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let step = usize::from(self.page_rows.max(1));
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(current.saturating_sub(step)));
    }

    pub fn page_down(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let step = usize::from(self.page_rows.max(1));
        let current = self.table_state.selected().unwrap_or(0);
        let last = self.visible.len() - 1;
        self.table_state.select(Some((current + step).min(last)));
    }

    pub fn jump_first(&mut self) {
        if !self.visible.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    pub fn jump_last(&mut self) {
        if !self.visible.is_empty() {
            self.table_state.select(Some(self.visible.len() - 1));
        }
    }

    pub fn scroll_left(&mut self) {
        self.col_offset = self.col_offset.saturating_sub(1);
    }

    pub fn scroll_right(&mut self) {
        if self.col_offset + 1 < self.columns.len() {
            self.col_offset += 1;
        }
    }

    /// Keys routed here while the table has focus. Returns `true` if the
    /// key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.filter_mode == FilterMode::Typing {
            match key.code {
                KeyCode::Enter => self.filter_mode = FilterMode::Applied,
                KeyCode::Esc => {
                    self.filter.clear();
                    self.filter_mode = FilterMode::Off;
                    self.apply_filter();
                }
                KeyCode::Backspace => {
                    self.filter.pop();
                    self.apply_filter();
                }
                KeyCode::Char(c) => {
                    self.filter.push(c);
                    self.apply_filter();
                }
                _ => {}
            }
            return true;
        }
        match key.code {
            KeyCode::Char('/') => {
                self.filter_mode = FilterMode::Typing;
                true
            }
            KeyCode::Esc if self.filter_mode == FilterMode::Applied => {
                self.filter.clear();
                self.filter_mode = FilterMode::Off;
                self.apply_filter();
                true
            }
            KeyCode::Up | KeyCode::Char('w') => {
                self.scroll_up();
                true
            }
            KeyCode::Down | KeyCode::Char('s') => {
                self.scroll_down();
                true
            }
            KeyCode::Left | KeyCode::Char('a') => {
                self.scroll_left();
                true
            }
            KeyCode::Right | KeyCode::Char('d') => {
                self.scroll_right();
                true
            }
            KeyCode::PageUp => {
                self.page_up();
                true
            }
            KeyCode::PageDown => {
                self.page_down();
                true
            }
            KeyCode::Home => {
                self.jump_first();
                true
            }
            KeyCode::End => {
                self.jump_last();
                true
            }
            _ => false,
        }
    }

    /// Columns that fit the inner width, starting at the scroll offset.
    /// Always at least one so wide columns still show truncated.
    fn visible_column_range(&self, width: u16) -> Vec<usize> {
        let mut cols = Vec::new();
        let mut used: u32 = 0;
        for ci in self.col_offset..self.columns.len() {
            let w = u32::from(self.columns[ci].width) + 1;
            if !cols.is_empty() && used + w > u32::from(width) {
                break;
            }
            cols.push(ci);
            used += w;
        }
        cols
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, spinner: Option<char>) {
        let border = if focused { Color::Cyan } else { Color::DarkGray };
        let mut title = format!(" Results [{}/{}] ", self.visible.len(), self.rows.len());
        if let Some(c) = spinner {
            title.push(c);
            title.push(' ');
        }
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border));
        if self.filter_mode != FilterMode::Off {
            let caret = if self.filter_mode == FilterMode::Typing {
                "\u{2588}"
            } else {
                ""
            };
            block = block.title_bottom(format!(" filter: {}{caret} ", self.filter));
        }

        self.page_rows = area.height.saturating_sub(3).max(1);

        if self.visible.is_empty() {
            let message = if self.rows.is_empty() {
                "No results"
            } else {
                "No rows match the filter"
            };
            frame.render_widget(Paragraph::new(message).centered().block(block), area);
            return;
        }

        let cols = self.visible_column_range(area.width.saturating_sub(2));
        let widths: Vec<Constraint> = cols
            .iter()
            .map(|&ci| Constraint::Length(self.columns[ci].width))
            .collect();
        let header = Row::new(
            cols.iter()
                .map(|&ci| Cell::from(self.columns[ci].name.clone())),
        )
        .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = self
            .visible
            .iter()
            .map(|&ri| Row::new(cols.iter().map(|&ci| Cell::from(self.rows[ri][ci].clone()))))
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

fn is_reserved(name: &str) -> bool {
    name == TIMESTAMP_FIELD || name == TAGS_FIELD || name == METADATA_FIELD
}

/// Pin the timestamp first and tags/metadata last; everything else keeps
/// server order in between.
fn order_fields(fields: &[String]) -> Vec<String> {
    let mut ordered = Vec::with_capacity(fields.len());
    if fields.iter().any(|f| f == TIMESTAMP_FIELD) {
        ordered.push(TIMESTAMP_FIELD.to_string());
    }
    ordered.extend(fields.iter().filter(|f| !is_reserved(f)).cloned());
    for trailing in [TAGS_FIELD, METADATA_FIELD] {
        if fields.iter().any(|f| f == trailing) {
            ordered.push(trailing.to_string());
        }
    }
    ordered
}

/// Width of one column: the widest cell over the first `WIDTH_SAMPLE`
/// records, floored by the column name length (and 2), capped at
/// `MAX_WIDTH`. The timestamp column is fixed.
fn infer_width(name: &str, records: &[Map<String, Value>]) -> u16 {
    if name == TIMESTAMP_FIELD {
        return TIMESTAMP_WIDTH;
    }
    let mut width = name.chars().count().max(MIN_WIDTH);
    for record in records.iter().take(WIDTH_SAMPLE) {
        if let Some(value) = record.get(name) {
            width = width.max(value_width(value));
        }
    }
    width.min(MAX_WIDTH) as u16
}

/// Integers count decimal digits of |n|; everything else counts the
/// rendered text.
fn value_width(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                digit_count(i.unsigned_abs())
            } else if let Some(u) = n.as_u64() {
                digit_count(u)
            } else {
                n.to_string().chars().count()
            }
        }
        other => cell_text(Some(other)).chars().count(),
    }
}

fn digit_count(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// Rendered text for one cell; `None` means the record lacks the field.
pub(crate) fn cell_text(value: Option<&Value>) -> String {
    match value {
        None => MISSING_CELL.to_string(),
        Some(Value::Null) => "NULL".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    use super::*;
    use crate::tui::test_helpers::{assert_buffer_contains, assert_buffer_not_contains};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn response(fields: &[&str], records: Vec<Value>) -> QueryResponse {
        QueryResponse {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            records: records
                .into_iter()
                .map(|v| v.as_object().expect("record must be an object").clone())
                .collect(),
        }
    }

    fn loaded_table() -> ResultsTable {
        let mut table = ResultsTable::new();
        table.load(&response(
            &["level", "message"],
            vec![
                json!({"level": "info", "message": "service started"}),
                json!({"level": "warn", "message": "queue lagging"}),
                json!({"level": "error", "message": "write failed"}),
            ],
        ));
        table
    }

    fn render(table: &mut ResultsTable) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|frame| table.render(frame, frame.area(), true, None))
            .unwrap();
        terminal
    }

    #[test]
    fn reserved_fields_are_pinned_first_and_last() {
        let mut table = ResultsTable::new();
        table.load(&response(
            &["level", "p_metadata", "p_timestamp", "message", "p_tags"],
            vec![],
        ));
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["p_timestamp", "level", "message", "p_tags", "p_metadata"]
        );
    }

    #[test]
    fn timestamp_and_trailing_order_with_sparse_schema() {
        let mut table = ResultsTable::new();
        table.load(&response(&["p_timestamp", "a", "p_tags"], vec![]));
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["p_timestamp", "a", "p_tags"]);
        assert_eq!(table.columns()[0].width, 26);
    }

    #[test]
    fn widths_follow_values_names_and_floors() {
        let mut table = ResultsTable::new();
        table.load(&response(
            &["a", "b"],
            vec![json!({"a": "hello", "b": 42})],
        ));
        assert_eq!(table.columns()[0].width, 5); // len("hello")
        assert_eq!(table.columns()[1].width, 2); // digit_count(42), floor 2
    }

    #[test]
    fn width_is_capped_and_floored() {
        let long = "x".repeat(150);
        let mut table = ResultsTable::new();
        table.load(&response(
            &["note", "i"],
            vec![json!({"note": long, "i": 7})],
        ));
        assert_eq!(table.columns()[0].width, 100);
        assert_eq!(table.columns()[1].width, 2);
    }

    #[test]
    fn integer_widths_count_digits() {
        assert_eq!(value_width(&json!(0)), 1);
        assert_eq!(value_width(&json!(7)), 1);
        assert_eq!(value_width(&json!(42)), 2);
        assert_eq!(value_width(&json!(-1234)), 4);
        assert_eq!(value_width(&json!(1_000_000)), 7);
    }

    #[test]
    fn width_scan_stops_after_the_sample() {
        let mut records: Vec<Value> = (0..WIDTH_SAMPLE).map(|_| json!({"v": "aa"})).collect();
        records.push(json!({"v": "a very long value beyond the sample"}));
        let mut table = ResultsTable::new();
        table.load(&response(&["v"], records));
        assert_eq!(table.columns()[0].width, 2);
    }

    #[test]
    fn loading_the_same_result_twice_gives_identical_columns() {
        let payload = response(
            &["p_timestamp", "level", "count"],
            vec![
                json!({"p_timestamp": "2026-08-25T10:00:00", "level": "info", "count": 12345}),
                json!({"level": "warn"}),
            ],
        );
        let mut table = ResultsTable::new();
        table.load(&payload);
        let first = table.columns().to_vec();
        table.load(&payload);
        assert_eq!(table.columns(), &first[..]);
    }

    #[test]
    fn widths_are_stable_across_scroll_and_filter() {
        let mut table = loaded_table();
        let before = table.columns().to_vec();
        table.handle_key(press(KeyCode::Down));
        table.handle_key(press(KeyCode::Char('/')));
        for c in "warn".chars() {
            table.handle_key(press(KeyCode::Char(c)));
        }
        assert_eq!(table.columns(), &before[..]);
    }

    #[test]
    fn missing_null_and_empty_cells_are_distinct() {
        assert_eq!(cell_text(None), "\u{2205}");
        assert_eq!(cell_text(Some(&json!(null))), "NULL");
        assert_eq!(cell_text(Some(&json!(""))), "");
        assert_eq!(cell_text(Some(&json!(true))), "true");
        assert_eq!(cell_text(Some(&json!({"k": 1}))), "{\"k\":1}");
    }

    #[test]
    fn missing_field_renders_the_placeholder() {
        let mut table = ResultsTable::new();
        table.load(&response(
            &["a", "b"],
            vec![json!({"a": "present"})],
        ));
        let terminal = render(&mut table);
        assert_buffer_contains(&terminal, "\u{2205}");
    }

    #[test]
    fn vertical_scroll_wraps() {
        let mut table = loaded_table();
        assert_eq!(table.selected(), Some(0));
        table.handle_key(press(KeyCode::Up));
        assert_eq!(table.selected(), Some(2));
        table.handle_key(press(KeyCode::Char('s')));
        assert_eq!(table.selected(), Some(0));
    }

    #[test]
    fn paging_and_jumps_clamp_to_the_result() {
        let records: Vec<Value> = (0..50).map(|i| json!({"n": i})).collect();
        let mut table = ResultsTable::new();
        table.load(&response(&["n"], records));
        render(&mut table); // fixes page_rows from the viewport

        table.handle_key(press(KeyCode::PageDown));
        let after_page = table.selected().unwrap();
        assert!(after_page > 0);
        table.handle_key(press(KeyCode::End));
        assert_eq!(table.selected(), Some(49));
        table.handle_key(press(KeyCode::PageDown));
        assert_eq!(table.selected(), Some(49));
        table.handle_key(press(KeyCode::Home));
        assert_eq!(table.selected(), Some(0));
        table.handle_key(press(KeyCode::PageUp));
        assert_eq!(table.selected(), Some(0));
    }

    #[test]
    fn horizontal_scroll_moves_the_first_visible_column() {
        let mut table = loaded_table();
        table.handle_key(press(KeyCode::Right));
        let terminal = render(&mut table);
        assert_buffer_not_contains(&terminal, "level");
        assert_buffer_contains(&terminal, "message");
        table.handle_key(press(KeyCode::Char('a')));
        let terminal = render(&mut table);
        assert_buffer_contains(&terminal, "level");
        // Clamped at the last column.
        table.handle_key(press(KeyCode::Right));
        table.handle_key(press(KeyCode::Right));
        table.handle_key(press(KeyCode::Right));
        let terminal = render(&mut table);
        assert_buffer_contains(&terminal, "message");
    }

    #[test]
    fn filter_narrows_case_insensitively_and_esc_restores() {
        let mut table = loaded_table();
        table.handle_key(press(KeyCode::Char('/')));
        assert_eq!(table.filter_mode(), FilterMode::Typing);
        for c in "WARN".chars() {
            table.handle_key(press(KeyCode::Char(c)));
        }
        assert_eq!(table.visible_rows(), 1);

        table.handle_key(press(KeyCode::Enter));
        assert_eq!(table.filter_mode(), FilterMode::Applied);
        // Navigation works again while the filter stays applied.
        table.handle_key(press(KeyCode::Down));
        assert_eq!(table.visible_rows(), 1);

        table.handle_key(press(KeyCode::Esc));
        assert_eq!(table.filter_mode(), FilterMode::Off);
        assert_eq!(table.visible_rows(), 3);
    }

    #[test]
    fn filter_backspace_rewidens() {
        let mut table = loaded_table();
        table.handle_key(press(KeyCode::Char('/')));
        for c in "warnx".chars() {
            table.handle_key(press(KeyCode::Char(c)));
        }
        assert_eq!(table.visible_rows(), 0);
        table.handle_key(press(KeyCode::Backspace));
        assert_eq!(table.visible_rows(), 1);
    }

    #[test]
    fn new_result_reapplies_the_filter() {
        let mut table = loaded_table();
        table.handle_key(press(KeyCode::Char('/')));
        for c in "warn".chars() {
            table.handle_key(press(KeyCode::Char(c)));
        }
        table.handle_key(press(KeyCode::Enter));

        table.load(&response(
            &["level"],
            vec![json!({"level": "warn"}), json!({"level": "warn"})],
        ));
        assert_eq!(table.total_rows(), 2);
        assert_eq!(table.visible_rows(), 2);
    }

    #[test]
    fn empty_result_renders_no_results() {
        let mut table = ResultsTable::new();
        table.load(&response(&[], vec![]));
        let terminal = render(&mut table);
        assert_buffer_contains(&terminal, "No results");
    }

    #[test]
    fn filtered_out_everything_says_so() {
        let mut table = loaded_table();
        table.handle_key(press(KeyCode::Char('/')));
        for c in "nothing here".chars() {
            table.handle_key(press(KeyCode::Char(c)));
        }
        let terminal = render(&mut table);
        assert_buffer_contains(&terminal, "No rows match the filter");
    }

    #[test]
    fn only_reserved_columns_is_tolerated() {
        let mut table = ResultsTable::new();
        table.load(&response(
            &["p_timestamp"],
            vec![json!({"p_timestamp": "2026-08-25T10:00:00"})],
        ));
        let terminal = render(&mut table);
        assert_buffer_contains(&terminal, "p_timestamp");
    }

    #[test]
    fn render_handles_nulls_and_tiny_areas() {
        let mut table = ResultsTable::new();
        table.load(&response(
            &["a"],
            vec![json!({"a": null}), json!({})],
        ));
        for (w, h) in [(1, 1), (12, 3), (120, 40)] {
            let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
            terminal
                .draw(|frame| table.render(frame, frame.area(), false, Some('x')))
                .unwrap();
        }
    }
}
