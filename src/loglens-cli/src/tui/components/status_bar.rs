//! Bottom status bar: query target, last status message, key hints.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use super::Component;
use crate::tui::action::Action;
use crate::tui::state::AppState;

pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }
}

impl Component for StatusBar {
    fn handle_key_event(&mut self, _key: KeyEvent) -> bool {
        false
    }

    fn update(&mut self, _action: &Action, _state: &mut AppState) {}

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(area);

        let target = format!("{}@{} [{}]", state.profile, state.url, state.stream);
        let left = Paragraph::new(target).style(Style::default().fg(Color::Gray));
        frame.render_widget(left, chunks[0]);

        if let Some(status) = &state.status {
            let color = if status.error { Color::Red } else { Color::Green };
            let center = Paragraph::new(status.text.clone())
                .style(Style::default().fg(color))
                .centered();
            frame.render_widget(center, chunks[1]);
        }

        let right = Paragraph::new("ctrl+r: Run  tab: Focus  /: Filter  ctrl+c: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .right_aligned();
        frame.render_widget(right, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::tui::test_helpers::assert_buffer_contains;

    fn render_status_bar(state: &AppState) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(140, 1)).unwrap();
        let mut bar = StatusBar::new();
        terminal
            .draw(|frame| {
                bar.render(frame, frame.area(), state);
            })
            .unwrap();
        terminal
    }

    fn state() -> AppState {
        AppState::new(
            "local".to_string(),
            "http://localhost:8000".to_string(),
            "app".to_string(),
        )
    }

    #[test]
    fn shows_target_and_hints() {
        let terminal = render_status_bar(&state());
        assert_buffer_contains(&terminal, "local@http://localhost:8000 [app]");
        assert_buffer_contains(&terminal, "ctrl+r: Run");
        assert_buffer_contains(&terminal, "ctrl+c: Quit");
    }

    #[test]
    fn shows_error_message() {
        let mut state = state();
        state.set_error("failed to query: connection refused");
        let terminal = render_status_bar(&state);
        assert_buffer_contains(&terminal, "failed to query: connection refused");
    }

    #[test]
    fn shows_info_message() {
        let mut state = state();
        state.set_info("42 record(s)");
        let terminal = render_status_bar(&state);
        assert_buffer_contains(&terminal, "42 record(s)");
    }
}
