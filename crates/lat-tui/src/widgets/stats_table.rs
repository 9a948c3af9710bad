//! Statistics table widget — per-context latency summary.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use lat_core::ContextStats;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Cell, Row, Table, TableState, StatefulWidget, Widget},
};

#[derive(Debug, Default)]
pub struct StatsTableState {
    /// Rows sorted by context name.
    pub rows: Vec<ContextStats>,
    pub cursor: usize,
}

impl StatsTableState {
    pub fn set_rows(&mut self, rows: Vec<ContextStats>) {
        self.rows = rows;
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    pub fn handle(&mut self, event: &AppEvent) {
        let last = self.rows.len().saturating_sub(1);
        self.cursor = match event {
            AppEvent::Nav(Direction::Up) | AppEvent::ScrollUp => self.cursor.saturating_sub(1),
            AppEvent::Nav(Direction::Down) | AppEvent::ScrollDown => (self.cursor + 1).min(last),
            AppEvent::ScrollToTop => 0,
            AppEvent::ScrollToBottom => last,
            _ => return,
        };
    }

    /// Context of the row under the cursor.
    pub fn selected_context(&self) -> Option<&str> {
        self.rows.get(self.cursor).map(|s| s.context.as_str())
    }
}

pub struct StatsTable<'a> {
    state: &'a StatsTableState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> StatsTable<'a> {
    pub fn new(state: &'a StatsTableState, focused: bool, theme: &'a Theme) -> Self {
        Self { state, focused, theme }
    }
}

impl Widget for StatsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let block = Block::bordered()
            .title("Performance statistics")
            .border_style(border_style);

        let header = Row::new(["Application Context", "Count", "Min", "Max", "Mean", "Median"])
            .style(self.theme.table_header);
        let rows: Vec<Row> = self
            .state
            .rows
            .iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(Span::styled(s.context.clone(), self.theme.context_style(&s.context))),
                    Cell::from(s.count.to_string()),
                    Cell::from(Span::styled(s.min.to_string(), self.theme.latency_style(Some(s.min)))),
                    Cell::from(Span::styled(s.max.to_string(), self.theme.latency_style(Some(s.max)))),
                    Cell::from(format!("{:.1}", s.mean)),
                    Cell::from(format!("{:.1}", s.median)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(self.theme.table_cursor);

        let mut table_state = TableState::default();
        if self.focused && !self.state.rows.is_empty() {
            table_state.select(Some(self.state.cursor));
        }
        StatefulWidget::render(table, area, buf, &mut table_state);
    }
}
