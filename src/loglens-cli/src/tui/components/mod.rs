//! Component trait and the widgets composing the query screen.

pub mod query;
pub mod status_bar;
pub mod time_range;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use super::action::Action;
use super::state::AppState;

/// Lifecycle trait for screen components.
///
/// The [`App`](super::app::App) delegates key handling, global actions,
/// and rendering through this trait.
pub trait Component {
    /// Handle a key routed to this component. Returns `true` if the key
    /// was consumed.
    fn handle_key_event(&mut self, key: KeyEvent) -> bool;

    /// React to a globally dispatched action.
    fn update(&mut self, action: &Action, state: &mut AppState);

    /// Draw into the given area. Takes `&mut self` because table and
    /// editor rendering carries widget state.
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState);
}
