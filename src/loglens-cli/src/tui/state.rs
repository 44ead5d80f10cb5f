//! Shared state for the query screen.

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// One-line message for the status bar.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub error: bool,
}

/// State shared across the screen's components.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Profile the screen was opened with.
    pub profile: String,
    /// Server base URL, display only.
    pub url: String,
    /// Stream being queried.
    pub stream: String,
    /// Latest status-bar message.
    pub status: Option<StatusLine>,
    /// Whether a fetch is outstanding.
    pub loading: bool,
    /// Frame counter advanced on every tick, drives the spinner.
    tick: usize,
}

impl AppState {
    pub fn new(profile: String, url: String, stream: String) -> Self {
        Self {
            profile,
            url,
            stream,
            status: None,
            loading: false,
            tick: 0,
        }
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: true,
        });
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            text: text.into(),
            error: false,
        });
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Current spinner frame; advances with the tick counter.
    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            "local".to_string(),
            "http://localhost:8000".to_string(),
            "app".to_string(),
        )
    }

    #[test]
    fn errors_replace_info_messages() {
        let mut state = state();
        state.set_info("42 record(s)");
        assert_eq!(state.status.as_ref().map(|s| s.error), Some(false));

        state.set_error("failed to query");
        let status = state.status.unwrap();
        assert!(status.error);
        assert_eq!(status.text, "failed to query");
    }

    #[test]
    fn spinner_advances_with_ticks() {
        let mut state = state();
        let first = state.spinner_char();
        state.on_tick();
        assert_ne!(state.spinner_char(), first);
    }
}
