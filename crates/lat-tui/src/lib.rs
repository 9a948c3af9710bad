//! lat TUI — ratatui application shell.
//!
//! Three panes over one in-memory record set: the context tree on the left,
//! the extracted-details table and the per-context statistics on the right,
//! and the URL filter with its depth slider along the bottom.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use lat_core::{config::Config, Projection, RawRecord};

/// Start the TUI over already-loaded `records`, opening with the depth and
/// filters of `initial`.
pub fn run(records: Vec<RawRecord>, config: Config, initial: Projection) -> anyhow::Result<()> {
    let theme = theme::Theme::load_default();
    tracing::info!(records = records.len(), "starting tui");
    App::new(records, config, theme).with_projection(initial).run()
}
