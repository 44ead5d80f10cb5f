//! Async event source for the query screen.
//!
//! Multiplexes crossterm input, a tick timer, and a render timer into a
//! single [`Event`] stream with `tokio::select!`.

use std::time::Duration;

use crossterm::event::{EventStream, KeyEvent};
use futures::StreamExt;

/// Events produced by the [`EventHandler`].
#[derive(Debug, Clone)]
pub enum Event {
    /// A key press from the user.
    Key(KeyEvent),
    /// The terminal changed size.
    Resize,
    /// Periodic tick for animation and housekeeping.
    Tick,
    /// Periodic render signal (~30 fps).
    Render,
}

/// Merges crossterm, tick, and render streams.
pub struct EventHandler {
    crossterm_stream: EventStream,
    tick_interval: tokio::time::Interval,
    render_interval: tokio::time::Interval,
}

impl EventHandler {
    /// Create an event handler with the given tick rate. The render rate
    /// is fixed at ~30 fps (33 ms).
    pub fn new(tick_rate: Duration) -> Self {
        let render_rate = Duration::from_millis(33);
        Self {
            crossterm_stream: EventStream::new(),
            tick_interval: tokio::time::interval(tick_rate),
            render_interval: tokio::time::interval(render_rate),
        }
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> anyhow::Result<Event> {
        loop {
            tokio::select! {
                maybe_event = self.crossterm_stream.next() => {
                    match maybe_event {
                        Some(Ok(crossterm::event::Event::Key(key))) => {
                            // Press only; Release/Repeat would double keys on Windows.
                            if key.kind == crossterm::event::KeyEventKind::Press {
                                return Ok(Event::Key(key));
                            }
                        }
                        Some(Ok(crossterm::event::Event::Resize(_, _))) => {
                            return Ok(Event::Resize);
                        }
                        Some(Err(e)) => return Err(e.into()),
                        _ => {}
                    }
                }
                _ = self.tick_interval.tick() => {
                    return Ok(Event::Tick);
                }
                _ = self.render_interval.tick() => {
                    return Ok(Event::Render);
                }
            }
        }
    }
}
