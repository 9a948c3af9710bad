//! Ratatui widgets for the lat TUI.

pub mod command_bar;
pub mod context_tree;
pub mod filter_bar;
pub mod help;
pub mod record_table;
pub mod stats_table;
pub mod status_bar;
