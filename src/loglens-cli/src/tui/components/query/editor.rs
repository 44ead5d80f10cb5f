//! Multi-line query editor backed by tui-textarea.
//!
//! The contract is deliberately thin: value in at construction, value
//! out via [`QueryEditor::text`], and keys routed in while focused. No
//! validation happens here; any text is sent to the server verbatim.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};
use tui_textarea::{CursorMove, TextArea};

pub struct QueryEditor {
    textarea: TextArea<'static>,
}

impl QueryEditor {
    pub fn new(stream: &str) -> Self {
        let mut textarea = TextArea::new(vec![format!("select * from {stream}")]);
        textarea.move_cursor(CursorMove::End);
        Self { textarea }
    }

    /// Current query text, newlines preserved.
    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.textarea.input(key);
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let border = if focused { Color::Yellow } else { Color::DarkGray };
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Query ")
                .border_style(Style::default().fg(border)),
        );
        let cursor = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(cursor);
        self.textarea.set_cursor_line_style(Style::default());
        frame.render_widget(&self.textarea, area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventKind, KeyEventState, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::tui::test_helpers::assert_buffer_contains;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn seeds_the_default_query_for_the_stream() {
        let editor = QueryEditor::new("app");
        assert_eq!(editor.text(), "select * from app");
    }

    #[test]
    fn typed_characters_extend_the_text() {
        let mut editor = QueryEditor::new("app");
        for c in " limit 5".chars() {
            editor.handle_key(press(KeyCode::Char(c)));
        }
        assert_eq!(editor.text(), "select * from app limit 5");
    }

    #[test]
    fn enter_inserts_a_newline() {
        let mut editor = QueryEditor::new("app");
        editor.handle_key(press(KeyCode::Enter));
        for c in "where level = 'warn'".chars() {
            editor.handle_key(press(KeyCode::Char(c)));
        }
        assert_eq!(editor.text(), "select * from app\nwhere level = 'warn'");
    }

    #[test]
    fn renders_with_a_titled_block() {
        let mut editor = QueryEditor::new("app");
        let mut terminal = Terminal::new(TestBackend::new(80, 5)).unwrap();
        terminal
            .draw(|frame| editor.render(frame, frame.area(), true))
            .unwrap();
        assert_buffer_contains(&terminal, "Query");
        assert_buffer_contains(&terminal, "select * from app");
    }
}
