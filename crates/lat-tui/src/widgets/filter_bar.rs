//! Filter bar widget — URL filter input + context-depth slider at the bottom
//! of the screen.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor.
//! - `Enter` applies the typed text as the URL filter.
//! - `[` / `]` adjust the depth (`0..=max_depth`); they work from any pane.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// Widest slider drawn; deeper ranges are scaled down.
const SLIDER_CELLS: usize = 20;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// What changed as a result of a filter-bar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    /// The typed filter text was applied.
    Filter,
    /// The depth moved.
    Depth,
}

#[derive(Debug)]
pub struct FilterBarState {
    /// Text being edited.
    pub input: String,
    /// Byte offset of the cursor within `input`.
    pub cursor: usize,
    /// Filter currently in effect (last applied `input`).
    pub applied: String,
    pub depth: usize,
    pub max_depth: usize,
}

impl FilterBarState {
    pub fn new(depth: usize, max_depth: usize) -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            applied: String::new(),
            depth: depth.min(max_depth),
            max_depth,
        }
    }

    /// The applied filter, or `None` when it is empty.
    pub fn url_contains(&self) -> Option<&str> {
        Some(self.applied.as_str()).filter(|s| !s.is_empty())
    }

    /// Replace both the edited and applied filter text.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.cursor = self.input.len();
        self.applied = self.input.clone();
    }

    /// Set the depth, clamped to `max_depth`. Returns true if it changed.
    pub fn set_depth(&mut self, depth: usize) -> bool {
        let depth = depth.min(self.max_depth);
        let changed = depth != self.depth;
        self.depth = depth;
        changed
    }

    /// True when the typed text differs from the applied filter.
    pub fn is_dirty(&self) -> bool {
        self.input != self.applied
    }

    pub fn handle(&mut self, event: &AppEvent) -> Option<FilterChange> {
        match event {
            AppEvent::Char(c) => {
                self.input.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                tracing::debug!(input = %self.input, cursor = self.cursor, "filter: char inserted");
                None
            }
            AppEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_boundary(&self.input, self.cursor);
                    self.input.remove(prev);
                    self.cursor = prev;
                    tracing::debug!(input = %self.input, cursor = self.cursor, "filter: backspace");
                }
                None
            }
            AppEvent::Nav(Direction::Left) => {
                self.cursor = prev_boundary(&self.input, self.cursor);
                None
            }
            AppEvent::Nav(Direction::Right) => {
                if self.cursor < self.input.len() {
                    self.cursor = self.input[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(self.input.len());
                }
                None
            }
            AppEvent::Enter => {
                self.applied = self.input.clone();
                tracing::debug!(filter = %self.applied, "filter: applied");
                Some(FilterChange::Filter)
            }
            AppEvent::DepthUp => {
                let changed = self.set_depth(self.depth.saturating_add(1));
                tracing::debug!(depth = self.depth, "filter: depth up");
                changed.then_some(FilterChange::Depth)
            }
            AppEvent::DepthDown => {
                let changed = self.set_depth(self.depth.saturating_sub(1));
                tracing::debug!(depth = self.depth, "filter: depth down");
                changed.then_some(FilterChange::Depth)
            }
            _ => None,
        }
    }
}

fn prev_boundary(s: &str, cursor: usize) -> usize {
    s[..cursor]
        .char_indices()
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct FilterBar<'a> {
    state: &'a FilterBarState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> FilterBar<'a> {
    pub fn new(state: &'a FilterBarState, focused: bool, theme: &'a Theme) -> Self {
        Self { state, focused, theme }
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let col = self.state.input[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(1));
        (x, area.y + 1)
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let title = if self.state.is_dirty() {
            "URL filter (enter to apply)"
        } else {
            "URL filter"
        };
        let block = Block::bordered().title(title).border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(LayoutDir::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(SLIDER_CELLS as u16 + 12)])
            .split(inner);

        let input_line = if self.state.input.is_empty() && !self.focused {
            Line::from(Span::styled(
                "press / to filter URLs",
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(self.state.input.as_str())
        };
        Paragraph::new(input_line).render(chunks[0], buf);

        Paragraph::new(Line::from(depth_slider(self.state.depth, self.state.max_depth)))
            .render(chunks[1], buf);
    }
}

/// `depth:[===-----]3`, scaled to at most [`SLIDER_CELLS`] cells.
fn depth_slider(depth: usize, max_depth: usize) -> String {
    let cells = max_depth.clamp(1, SLIDER_CELLS);
    let filled = if max_depth == 0 { 0 } else { depth * cells / max_depth };
    format!(
        "depth:[{}{}]{}",
        "=".repeat(filled),
        "-".repeat(cells - filled),
        depth
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(state: &mut FilterBarState, text: &str) {
        text.chars().for_each(|c| {
            state.handle(&AppEvent::Char(c));
        });
    }

    #[test]
    fn enter_applies_typed_text() {
        let mut state = FilterBarState::new(1, 20);
        type_text(&mut state, "erp");
        assert!(state.is_dirty());
        assert_eq!(state.url_contains(), None);

        assert_eq!(state.handle(&AppEvent::Enter), Some(FilterChange::Filter));
        assert_eq!(state.url_contains(), Some("erp"));
        assert!(!state.is_dirty());
    }

    #[test]
    fn backspace_handles_multibyte() {
        let mut state = FilterBarState::new(1, 20);
        type_text(&mut state, "aé");
        state.handle(&AppEvent::Backspace);
        assert_eq!(state.input, "a");
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn depth_is_bounded() {
        let mut state = FilterBarState::new(0, 2);
        assert_eq!(state.handle(&AppEvent::DepthDown), None);
        assert_eq!(state.handle(&AppEvent::DepthUp), Some(FilterChange::Depth));
        assert_eq!(state.handle(&AppEvent::DepthUp), Some(FilterChange::Depth));
        assert_eq!(state.handle(&AppEvent::DepthUp), None);
        assert_eq!(state.depth, 2);
    }

    #[test]
    fn slider_scales() {
        assert_eq!(depth_slider(0, 4), "depth:[----]0");
        assert_eq!(depth_slider(2, 4), "depth:[==--]2");
        assert_eq!(depth_slider(20, 40), "depth:[==========----------]20");
        assert_eq!(depth_slider(0, 0), "depth:[-]0");
    }
}
