//! Record table widget — the scrollable "extracted details" pane.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Move cursor up one row (scrolls view if needed) |
//! | `↓` / `j` | Move cursor down one row |
//! | `PageUp` / `Ctrl+u` | Move up one page |
//! | `PageDown` / `Ctrl+d` | Move down one page |
//! | `g` / `G` | Jump to first / last row |
//!
//! `offset` is the index of the first visible row and `cursor` the absolute
//! index of the highlighted row. The cursor is always kept within the
//! visible window; moving it past an edge scrolls.

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use lat_core::NormalizedRecord;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{
        Block, Cell as TableCell, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Table, Widget,
    },
};

const PAGE_STEP: usize = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

pub struct RecordTableState {
    pub records: Vec<NormalizedRecord>,
    pub offset: usize,
    pub cursor: usize,
    pub show_timestamps: bool,
    /// Cached from the last render so `handle()` can page by the real height.
    last_height: Cell<usize>,
}

impl RecordTableState {
    pub fn new(records: Vec<NormalizedRecord>) -> Self {
        Self {
            records,
            offset: 0,
            cursor: 0,
            show_timestamps: true,
            last_height: Cell::new(20),
        }
    }

    /// Replace the rows, keeping the cursor in range.
    pub fn set_records(&mut self, records: Vec<NormalizedRecord>) {
        self.records = records;
        let last = self.records.len().saturating_sub(1);
        self.cursor = self.cursor.min(last);
        self.offset = self.offset.min(self.cursor);
    }

    fn height(&self) -> usize {
        self.last_height.get().max(1)
    }

    fn move_cursor_to(&mut self, cursor: usize) {
        let last = self.records.len().saturating_sub(1);
        self.cursor = cursor.min(last);
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.height() {
            self.offset = self.cursor + 1 - self.height();
        }
    }

    pub fn handle(&mut self, event: &AppEvent) {
        if self.records.is_empty() {
            return;
        }
        let target = match event {
            AppEvent::Nav(Direction::Up) => self.cursor.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => self.cursor + 1,
            AppEvent::ScrollUp => self.cursor.saturating_sub(PAGE_STEP),
            AppEvent::ScrollDown => self.cursor + PAGE_STEP,
            AppEvent::ScrollToTop => 0,
            AppEvent::ScrollToBottom => self.records.len() - 1,
            _ => return,
        };
        self.move_cursor_to(target);
        tracing::debug!(cursor = self.cursor, offset = self.offset, "records: cursor moved");
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct RecordTable<'a> {
    state: &'a RecordTableState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> RecordTable<'a> {
    pub fn new(state: &'a RecordTableState, focused: bool, theme: &'a Theme) -> Self {
        Self { state, focused, theme }
    }
}

impl Widget for RecordTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let title = format!("Extracted details ({})", self.state.records.len());
        let block = Block::bordered().title(title).border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        // One row is taken by the header.
        let height = (inner.height as usize).saturating_sub(1);
        self.state.last_height.set(height);

        let total = self.state.records.len();
        let start = self.state.offset.min(total);
        let end = (start + height).min(total);

        let mut header = vec!["url", "Application Context", "Time Taken (ms)"];
        let mut widths = vec![
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Length(15),
        ];
        if self.state.show_timestamps {
            header.insert(0, "@timestamp");
            widths.insert(0, Constraint::Length(24));
        }

        let rows: Vec<Row> = self.state.records[start..end]
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let mut cells = vec![
                    TableCell::from(record.url.clone()),
                    TableCell::from(Span::styled(
                        record.context.clone(),
                        self.theme.context_style(&record.context),
                    )),
                    TableCell::from(Span::styled(
                        record
                            .latency_ms
                            .map(|ms| format!("{ms:>15}"))
                            .unwrap_or_else(|| format!("{:>15}", "—")),
                        self.theme.latency_style(record.latency_ms),
                    )),
                ];
                if self.state.show_timestamps {
                    cells.insert(0, TableCell::from(record.timestamp.clone()));
                }
                let row = Row::new(cells);
                if self.focused && start + i == self.state.cursor {
                    row.style(self.theme.table_cursor)
                } else {
                    row
                }
            })
            .collect();

        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect {
            x: inner.right().saturating_sub(1),
            width: 1,
            ..inner
        };

        Widget::render(
            Table::new(rows, widths).header(Row::new(header).style(self.theme.table_header)),
            text_area,
            buf,
        );

        if total > 0 {
            let mut sb_state = ScrollbarState::new(total)
                .position(start)
                .viewport_content_length(height);
            StatefulWidget::render(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(None)
                    .end_symbol(None),
                sb_area,
                buf,
                &mut sb_state,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(n: usize) -> RecordTableState {
        let records = (0..n)
            .map(|i| NormalizedRecord {
                timestamp: format!("t{i}"),
                url: "/a".into(),
                context: "/a".into(),
                latency_ms: Some(i as u64),
            })
            .collect();
        let state = RecordTableState::new(records);
        state.last_height.set(5);
        state
    }

    #[test]
    fn cursor_scrolls_window() {
        let mut s = state(20);
        for _ in 0..7 {
            s.handle(&AppEvent::Nav(Direction::Down));
        }
        assert_eq!(s.cursor, 7);
        assert_eq!(s.offset, 3);

        s.handle(&AppEvent::ScrollToTop);
        assert_eq!((s.cursor, s.offset), (0, 0));

        s.handle(&AppEvent::ScrollToBottom);
        assert_eq!((s.cursor, s.offset), (19, 15));
    }

    #[test]
    fn shrinking_rows_clamps_cursor() {
        let mut s = state(20);
        s.handle(&AppEvent::ScrollToBottom);
        s.set_records(Vec::new());
        assert_eq!((s.cursor, s.offset), (0, 0));
    }

    #[test]
    fn empty_table_ignores_navigation() {
        let mut s = state(0);
        s.handle(&AppEvent::Nav(Direction::Down));
        assert_eq!(s.cursor, 0);
    }
}
