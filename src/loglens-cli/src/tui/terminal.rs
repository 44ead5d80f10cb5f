//! Terminal setup and teardown.
//!
//! Wraps [`ratatui::Terminal`] with a crossterm backend and handles raw
//! mode, the alternate screen, and panic-safe restoration.

use std::io::{self, Stdout, stdout};

use crossterm::ExecutableCommand;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// Terminal wrapper that manages raw mode and the alternate screen.
pub struct Tui {
    /// The underlying ratatui terminal.
    pub terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Create a terminal with a crossterm backend writing to stdout.
    pub fn new() -> anyhow::Result<Self> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Enter raw mode and the alternate screen, and install a panic hook
    /// that restores the terminal before printing the panic info.
    pub fn init(&mut self) -> anyhow::Result<()> {
        // The hook is installed before raw mode so it always restores.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
            let _ = io::stdout().execute(crossterm::cursor::Show);
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Leave the alternate screen, disable raw mode, show the cursor.
    pub fn exit(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        io::stdout().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
