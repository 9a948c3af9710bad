//! Status bar widget — the one-line summary strip at the top of the screen.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Everything the status strip shows, borrowed from the app state.
pub struct StatusBar<'a> {
    pub total: usize,
    pub shown: usize,
    pub depth: usize,
    pub context: Option<&'a str>,
    pub url_contains: Option<&'a str>,
    pub exact_url: Option<&'a str>,
    pub message: &'a str,
    pub theme: &'a Theme,
}

impl StatusBar<'_> {
    fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} records processed", self.total),
            format!("{} shown", self.shown),
            format!("depth {}", self.depth),
        ];
        if let Some(c) = self.context {
            parts.push(format!("context {c}"));
        }
        if let Some(f) = self.url_contains {
            parts.push(format!("filter \"{f}\""));
        }
        if let Some(u) = self.exact_url {
            parts.push(format!("url {u}"));
        }
        parts.join(" │ ")
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.summary()),
            self.theme.table_header,
        )];
        if !self.message.is_empty() {
            spans.push(Span::raw(format!(" {} ", self.message)));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        // Keybinding hints at the right edge
        let hint = " q:quit  ?:help  ::cmd ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_active_filters() {
        let theme = Theme::load_default();
        let bar = StatusBar {
            total: 10,
            shown: 4,
            depth: 2,
            context: None,
            url_contains: Some("erp"),
            exact_url: None,
            message: "",
            theme: &theme,
        };
        assert_eq!(
            bar.summary(),
            "10 records processed │ 4 shown │ depth 2 │ filter \"erp\""
        );
    }
}
