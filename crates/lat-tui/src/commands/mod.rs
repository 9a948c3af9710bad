// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use crate::{app::AppState, theme::Theme};

/// A parsed, validated command ready to be executed by the app shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    // Display help
    Help,
    // Change theme
    Theme(String),
    // Set the context depth directly
    Depth(usize),
    // Restrict to one application context; an empty string clears it
    Context(String),
    // Replace the URL filter; an empty string clears it
    Filter(String),
    // Restrict to one exact URL
    Url(String),
    // Drop every filter and the tree selection
    Clear,
    // Write both CSV files, optionally to a directory other than the configured one
    Export(Option<PathBuf>),
    // Toggle display of timestamps
    Timestamps,
}

impl Command {
    /// Parse a raw command string (the text after the `:` prefix).
    ///
    /// Returns `Ok(cmd)` on success, `Err(message)` on failure. An empty
    /// string returns `Err("")` as a sentinel meaning "close without acting".
    pub fn parse(input: &str) -> Result<Command, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err(String::new());
        }

        let (word, rest) = input
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((input, ""));

        match word {
            "q" | "quit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            "ts" | "timestamps" => Ok(Command::Timestamps),
            "clear" => Ok(Command::Clear),
            "theme" => {
                if rest.is_empty() {
                    Err("usage: theme <default|gruvbox>".to_string())
                } else {
                    Ok(Command::Theme(rest.to_string()))
                }
            }
            "depth" => rest
                .parse::<usize>()
                .map(Command::Depth)
                .map_err(|_| "usage: depth <n>".to_string()),
            "ctx" | "context" => Ok(Command::Context(rest.to_string())),
            "filter" => Ok(Command::Filter(rest.to_string())),
            "url" => {
                if rest.is_empty() {
                    Err("usage: url <exact url>".to_string())
                } else {
                    Ok(Command::Url(rest.to_string()))
                }
            }
            "export" | "w" => Ok(Command::Export(
                Some(rest).filter(|r| !r.is_empty()).map(PathBuf::from),
            )),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Execute a parsed [`Command`] against the application state.
pub fn execute_command(s: &mut AppState, cmd: Command) {
    match cmd {
        Command::Quit => s.quit = true,
        Command::Help => s.show_help = !s.show_help,
        Command::Theme(name) => s.theme = Theme::by_name(&name),
        Command::Timestamps => {
            s.records.show_timestamps = !s.records.show_timestamps;
        }
        Command::Depth(n) => {
            if n > s.filter.max_depth {
                s.status = format!("depth is limited to {}", s.filter.max_depth);
            }
            if s.filter.set_depth(n) {
                s.refresh();
            }
        }
        Command::Context(ctx) => {
            s.context = Some(ctx).filter(|c| !c.is_empty());
            s.refresh();
        }
        Command::Filter(text) => {
            s.filter.set_filter(text);
            s.refresh();
        }
        Command::Url(url) => {
            s.exact_url = Some(url);
            s.refresh();
        }
        Command::Clear => {
            s.context = None;
            s.filter.set_filter("");
            s.exact_url = None;
            s.tree.selected = None;
            s.refresh();
        }
        Command::Export(dir) => {
            let dir = dir.unwrap_or_else(|| s.config.export.directory.clone());
            s.export_to(&dir);
        }
    }
}
