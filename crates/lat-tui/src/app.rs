//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent, Keymap},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        context_tree::{ContextTree, ContextTreeState, TreeAction, TreeSelection},
        filter_bar::{FilterBar, FilterBarState, FilterChange},
        help::HelpPopup,
        record_table::{RecordTable, RecordTableState},
        stats_table::{StatsTable, StatsTableState},
        status_bar::StatusBar,
    },
};
use anyhow::Context;
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lat_core::{config::Config, diagnose, export_csv, Aggregation, Projection, RawRecord};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Records,
    Stats,
    Filter,
    /// Vim-style `:` command line is active.
    Command,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    /// Every loaded record; projections are recomputed from this.
    pub raw: Vec<RawRecord>,
    pub tree: ContextTreeState,
    pub records: RecordTableState,
    pub stats: StatsTableState,
    pub filter: FilterBarState,
    /// Application context chosen in the tree or the statistics pane.
    pub context: Option<String>,
    pub exact_url: Option<String>,
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub theme: Theme,
    pub config: Config,
    pub keymap: Keymap,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    /// One-line message shown in the status bar (export results, warnings).
    pub status: String,
    pub quit: bool,
}

impl AppState {
    pub fn new(raw: Vec<RawRecord>, config: Config, theme: Theme) -> Self {
        let status = diagnose(&raw).map(|w| w.to_string()).unwrap_or_default();
        let mut records = RecordTableState::new(Vec::new());
        records.show_timestamps = config.ui.show_timestamps;

        let mut state = Self {
            tree: ContextTreeState::from_records(&raw),
            records,
            stats: StatsTableState::default(),
            filter: FilterBarState::new(config.analysis.default_depth, config.analysis.max_depth),
            context: None,
            exact_url: None,
            focus: Focus::Tree,
            prev_focus: Focus::Tree,
            theme,
            keymap: Keymap::from_config(&config.keybindings),
            config,
            show_help: false,
            command_bar: CommandBarState::default(),
            status,
            quit: false,
            raw,
        };
        state.refresh();
        state
    }

    /// Replace the depth and every filter, then refresh. The depth is
    /// clamped to the configured maximum.
    pub fn apply_projection(&mut self, projection: Projection) {
        self.filter.set_depth(projection.depth);
        self.filter.set_filter(projection.url_contains.unwrap_or_default());
        self.context = projection.context;
        self.exact_url = projection.exact_url;
        self.refresh();
    }

    /// Recompute the record table and statistics from the current depth and
    /// filters.
    pub fn refresh(&mut self) {
        let projection = Projection {
            depth: self.filter.depth,
            context: self.context.clone(),
            url_contains: self.filter.url_contains().map(str::to_string),
            exact_url: self.exact_url.clone(),
        };
        let rows = projection.project(&self.raw);
        let stats = Aggregation::from_records(&rows)
            .finish()
            .into_values()
            .collect();
        tracing::debug!(rows = rows.len(), "refresh");
        self.records.set_records(rows);
        self.stats.set_rows(stats);
    }

    /// Write the current records and statistics under `dir`, reporting the
    /// outcome in the status bar.
    pub fn export_to(&mut self, dir: &Path) {
        match self.write_exports(dir) {
            Ok((records_path, stats_path)) => {
                tracing::info!(?records_path, ?stats_path, "exported");
                self.status = format!(
                    "exported {} records to {} and {} contexts to {}",
                    self.records.records.len(),
                    records_path.display(),
                    self.stats.rows.len(),
                    stats_path.display()
                );
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "export failed");
                self.status = format!("export failed: {e:#}");
            }
        }
    }

    fn write_exports(&self, dir: &Path) -> anyhow::Result<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;

        let records_path = dir.join(&self.config.export.records_file);
        std::fs::write(&records_path, export_csv(&self.records.records)?)
            .with_context(|| format!("writing {}", records_path.display()))?;

        let stats_path = dir.join(&self.config.export.stats_file);
        std::fs::write(&stats_path, export_csv(&self.stats.rows)?)
            .with_context(|| format!("writing {}", stats_path.display()))?;

        Ok((records_path, stats_path))
    }

    fn apply_tree_action(&mut self, action: TreeAction) {
        match action {
            TreeAction::Select(TreeSelection::Context(ctx)) => {
                self.context = Some(ctx);
                self.exact_url = None;
            }
            TreeAction::Select(TreeSelection::Url(url)) => {
                self.exact_url = Some(url);
            }
            TreeAction::Clear => {
                self.context = None;
                self.exact_url = None;
            }
        }
        self.refresh();
    }

    pub fn handle(&mut self, event: AppEvent) {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            match event {
                AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit => {
                    tracing::debug!("help popup closed");
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        // Command mode intercepts all events.
        if self.focus == Focus::Command {
            match event {
                AppEvent::Escape => {
                    tracing::debug!("command bar cancelled");
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                }
                AppEvent::Enter => match Command::parse(&self.command_bar.input.clone()) {
                    Ok(cmd) => {
                        tracing::debug!(command = ?cmd, "executing command");
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                        execute_command(self, cmd);
                    }
                    Err(msg) if msg.is_empty() => {
                        self.command_bar.clear();
                        self.focus = self.prev_focus;
                    }
                    Err(msg) => {
                        // Show the error; bar stays open
                        self.command_bar.error = Some(msg);
                    }
                },
                AppEvent::Quit => self.quit = true,
                other => self.command_bar.handle(&other),
            }
            return;
        }

        match event {
            AppEvent::Char('?') if self.focus != Focus::Filter => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }

            AppEvent::Char(':') if self.focus != Focus::Filter => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
            }

            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
            }

            AppEvent::Escape => {
                if self.focus == Focus::Filter {
                    tracing::debug!("focus: Filter -> Tree");
                    self.focus = Focus::Tree;
                }
            }

            // Tab-cycle focus: Tree → Records → Stats → Filter → Tree
            AppEvent::FocusNext => {
                let next = match self.focus {
                    Focus::Tree => Focus::Records,
                    Focus::Records => Focus::Stats,
                    Focus::Stats => Focus::Filter,
                    Focus::Filter | Focus::Command => Focus::Tree,
                };
                tracing::debug!(from = ?self.focus, to = ?next, "focus cycle");
                self.focus = next;
            }

            AppEvent::FilterFocus => {
                tracing::debug!("focus -> Filter");
                self.focus = Focus::Filter;
            }

            // Depth works regardless of focus
            AppEvent::DepthUp | AppEvent::DepthDown => {
                if self.filter.handle(&event).is_some() {
                    self.refresh();
                }
            }

            AppEvent::Export => {
                let dir = self.config.export.directory.clone();
                self.export_to(&dir);
            }

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => {}

            other => self.dispatch_to_focused(other),
        }
    }

    /// Route an event to the widget that owns the current focus.
    fn dispatch_to_focused(&mut self, event: AppEvent) {
        match self.focus {
            Focus::Tree => {
                if let Some(action) = self.tree.handle(&event) {
                    self.apply_tree_action(action);
                }
            }
            Focus::Records => self.records.handle(&event),
            Focus::Stats => {
                if event == AppEvent::Enter {
                    if let Some(ctx) = self.stats.selected_context().map(str::to_string) {
                        self.context = Some(ctx);
                        self.exact_url = None;
                        self.refresh();
                    }
                } else {
                    self.stats.handle(&event);
                }
            }
            Focus::Filter => {
                if self.filter.handle(&event) == Some(FilterChange::Filter) {
                    self.refresh();
                }
            }
            Focus::Command => {} // handled before dispatch, should not reach here
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(records: Vec<RawRecord>, config: Config, theme: Theme) -> Self {
        App {
            state: AppState::new(records, config, theme),
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.state.apply_projection(projection);
        self
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                match ct_event::read()? {
                    Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                        let raw = Event::Key(key);
                        // Use insert-mode mapping when a text widget is focused
                        let app_event = if is_insert_mode(self.state.focus) {
                            event::to_app_event_insert(raw)
                        } else {
                            event::to_app_event(raw, &self.state.keymap)
                        };
                        if let Some(ev) = app_event {
                            tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                            self.state.handle(ev);
                        }
                    }
                    other => {
                        if let Some(ev) = event::to_app_event(other, &self.state.keymap) {
                            self.state.handle(ev);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::Filter | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line status bar | body | 3-line filter bar
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .split(area);

    let ui = &state.config.ui;
    let horiz = Layout::default()
        .direction(LayoutDir::Horizontal)
        .constraints([
            Constraint::Percentage(ui.context_pane_width_pct),
            Constraint::Fill(1),
        ])
        .split(vert[1]);

    // Right column: records on top, statistics underneath
    let right = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(ui.stats_pane_height_pct),
        ])
        .split(horiz[1]);

    frame.render_widget(
        StatusBar {
            total: state.raw.len(),
            shown: state.records.records.len(),
            depth: state.filter.depth,
            context: state.context.as_deref(),
            url_contains: state.filter.url_contains(),
            exact_url: state.exact_url.as_deref(),
            message: &state.status,
            theme: &state.theme,
        },
        vert[0],
    );
    frame.render_widget(
        ContextTree::new(&state.tree, state.focus == Focus::Tree, &state.theme),
        horiz[0],
    );
    frame.render_widget(
        RecordTable::new(&state.records, state.focus == Focus::Records, &state.theme),
        right[0],
    );
    frame.render_widget(
        StatsTable::new(&state.stats, state.focus == Focus::Stats, &state.theme),
        right[1],
    );
    frame.render_widget(
        FilterBar::new(&state.filter, state.focus == Focus::Filter, &state.theme),
        vert[2],
    );

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.config.keybindings, &state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect {
            y: area.bottom().saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    if state.focus == Focus::Filter {
        let fb = FilterBar::new(&state.filter, true, &state.theme);
        frame.set_cursor_position(fb.cursor_position(vert[2]));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
