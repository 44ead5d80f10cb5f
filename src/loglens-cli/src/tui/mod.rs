//! Terminal user interface: the interactive query screen.

pub mod action;
pub mod app;
pub mod components;
pub mod event;
pub mod fetch;
pub mod state;
pub mod terminal;

#[cfg(test)]
pub mod test_helpers;
