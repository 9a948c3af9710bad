//! Help popup — centred floating overlay listing all keybindings.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use lat_core::config::KeybindingsConfig;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

pub struct HelpPopup<'a> {
    keys: &'a KeybindingsConfig,
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(keys: &'a KeybindingsConfig, theme: &'a Theme) -> Self {
        Self { keys, theme }
    }

    fn bindings(&self) -> Vec<(String, &'static str)> {
        let k = self.keys;
        vec![
            ("q  /  Ctrl+c".into(), "Quit"),
            (k.toggle_focus.clone(), "Cycle focus: contexts → records → stats → filter"),
            (k.filter_focus.clone(), "Focus URL filter (Enter applies)"),
            ("Escape".into(), "Leave filter / command bar"),
            ("↑ k  /  ↓ j".into(), "Move cursor"),
            ("← h  /  → l".into(), "Collapse / expand context"),
            ("Enter".into(), "Expand context / select URL"),
            ("Space".into(), "Select or clear the focused tree node"),
            ("PageUp  /  Ctrl+u".into(), "Page up"),
            ("PageDown / Ctrl+d".into(), "Page down"),
            ("g  /  G".into(), "Jump to first / last row"),
            (format!("{}  /  {}", k.depth_up, k.depth_down), "Increase / decrease context depth"),
            (k.export.clone(), "Export records and statistics to CSV"),
            (":".into(), "Command line: q, depth, ctx, filter, url, clear, export, theme, ts"),
            ("?".into(), "Toggle this help popup"),
        ]
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(80, 19, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" lat — keybindings (? to close) ")
            .border_style(self.theme.border_focused.add_modifier(Modifier::BOLD));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines: Vec<Line> = self
            .bindings()
            .into_iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {:<22}", key),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(desc),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
