//! Semantic application events — crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Keybindings
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `q`, `Ctrl+c`           | `Quit`                     |
//! | `Tab`                   | `FocusNext`                |
//! | `/`                     | `FilterFocus`              |
//! | `PageUp`, `Ctrl+u`      | `ScrollUp`                 |
//! | `PageDown`, `Ctrl+d`    | `ScrollDown`               |
//! | `g`                     | `ScrollToTop`              |
//! | `G`                     | `ScrollToBottom`           |
//! | `]`                     | `DepthUp`                  |
//! | `[`                     | `DepthDown`                |
//! | `e`                     | `Export`                   |
//! | `↑` / `k`               | `Nav(Up)`                  |
//! | `↓` / `j`               | `Nav(Down)`                |
//! | `←` / `h`               | `Nav(Left)`                |
//! | `→` / `l`               | `Nav(Right)`               |
//! | printable char          | `Char(c)`                  |
//! | `Backspace`             | `Backspace`                |
//! | `Enter`                 | `Enter`                    |
//! | terminal resize         | `Resize(w, h)`             |
//!
//! ## Insert mode
//!
//! When a text-input widget (filter bar, command bar) is focused, the event
//! loop calls [`to_app_event_insert`] instead. Every printable character is
//! then forwarded as `Char`; only `Ctrl+c`, `Escape`, `Enter`, `Tab`,
//! `Backspace` and the arrow keys keep their special bindings.
//!
//! The focus, filter, depth and export keys can be rebound through the
//! `[keybindings]` config section; see [`Keymap`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use lat_core::config::KeybindingsConfig;

/// The rebindable subset of normal-mode keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    pub toggle_focus: KeyCode,
    pub filter_focus: KeyCode,
    pub depth_up: KeyCode,
    pub depth_down: KeyCode,
    pub export: KeyCode,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeybindingsConfig::default())
    }
}

impl Keymap {
    /// Resolve configured key names. Unparseable names fall back to the
    /// built-in key for that action.
    pub fn from_config(cfg: &KeybindingsConfig) -> Self {
        let resolve = |name: &str, fallback: KeyCode| {
            parse_key(name).unwrap_or_else(|| {
                tracing::warn!(key = name, "unrecognised key binding; using default");
                fallback
            })
        };
        Self {
            toggle_focus: resolve(&cfg.toggle_focus, KeyCode::Tab),
            filter_focus: resolve(&cfg.filter_focus, KeyCode::Char('/')),
            depth_up: resolve(&cfg.depth_up, KeyCode::Char(']')),
            depth_down: resolve(&cfg.depth_down, KeyCode::Char('[')),
            export: resolve(&cfg.export, KeyCode::Char('e')),
        }
    }

    fn lookup(&self, code: KeyCode) -> Option<AppEvent> {
        match code {
            c if c == self.toggle_focus => Some(AppEvent::FocusNext),
            c if c == self.filter_focus => Some(AppEvent::FilterFocus),
            c if c == self.depth_up => Some(AppEvent::DepthUp),
            c if c == self.depth_down => Some(AppEvent::DepthDown),
            c if c == self.export => Some(AppEvent::Export),
            _ => None,
        }
    }
}

/// `"Tab"`, `"F5"` or a single character.
fn parse_key(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => return Some(KeyCode::Char(c)),
        (None, _) => return None,
        _ => {}
    }
    match name.to_ascii_lowercase().as_str() {
        "tab" => Some(KeyCode::Tab),
        "space" => Some(KeyCode::Char(' ')),
        f if f.starts_with('f') => f[1..].parse().ok().map(KeyCode::F),
        _ => None,
    }
}

/// Cardinal direction for list navigation and text-cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Move keyboard focus to the next pane (Tab-cycle).
    FocusNext,
    /// Transfer focus to the filter bar.
    FilterFocus,
    ScrollUp,
    ScrollDown,
    ScrollToTop,
    ScrollToBottom,
    /// Increase the context depth by one.
    DepthUp,
    /// Decrease the context depth by one.
    DepthDown,
    /// Write the current records and statistics to the export directory.
    Export,
    Nav(Direction),
    /// A printable character forwarded to the active text input or list.
    Char(char),
    Backspace,
    /// Confirm the active input or act on the focused list item.
    Enter,
    Resize(u16, u16),
    /// Dismiss the active modal (filter focus, help popup, command bar).
    Escape,
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] (normal / navigation mode).
///
/// Returns `None` for events with no meaning to the application (mouse
/// events, unbound keys).
pub fn to_app_event(event: Event, keymap: &Keymap) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key, keymap),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] for text-input mode.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent, keymap: &Keymap) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT {
        if let Some(ev) = keymap.lookup(key.code) {
            return Some(ev);
        }
    }

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        PageUp => Some(AppEvent::ScrollUp),
        PageDown => Some(AppEvent::ScrollDown),
        Char('u') if key.modifiers == Mod::CONTROL => Some(AppEvent::ScrollUp),
        Char('d') if key.modifiers == Mod::CONTROL => Some(AppEvent::ScrollDown),
        Home => Some(AppEvent::ScrollToTop),
        End => Some(AppEvent::ScrollToBottom),
        Char('g') if key.modifiers == Mod::NONE => Some(AppEvent::ScrollToTop),
        // Uppercase: SHIFT may or may not be set depending on the terminal
        Char('G') => Some(AppEvent::ScrollToBottom),

        Up | Char('k') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Up)),
        Down | Char('j') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Down)),
        Left | Char('h') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Left)),
        Right | Char('l') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Right)),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Up => Some(AppEvent::Nav(Direction::Up)),
        Down => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn press(code: KeyCode) -> Event {
        key(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> Event {
        key(code, KeyModifiers::CONTROL)
    }

    fn to_app_event(event: Event) -> Option<AppEvent> {
        super::to_app_event(event, &Keymap::default())
    }

    #[test]
    fn quit_keys() {
        assert_eq!(to_app_event(press(KeyCode::Char('q'))), Some(AppEvent::Quit));
        assert_eq!(to_app_event(ctrl(KeyCode::Char('c'))), Some(AppEvent::Quit));
    }

    #[test]
    fn depth_keys() {
        assert_eq!(to_app_event(press(KeyCode::Char(']'))), Some(AppEvent::DepthUp));
        assert_eq!(to_app_event(press(KeyCode::Char('['))), Some(AppEvent::DepthDown));
    }

    #[test]
    fn export_key() {
        assert_eq!(to_app_event(press(KeyCode::Char('e'))), Some(AppEvent::Export));
    }

    #[test]
    fn jump_keys() {
        assert_eq!(to_app_event(press(KeyCode::Char('g'))), Some(AppEvent::ScrollToTop));
        assert_eq!(
            to_app_event(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(AppEvent::ScrollToBottom)
        );
        assert_eq!(to_app_event(press(KeyCode::End)), Some(AppEvent::ScrollToBottom));
    }

    #[test]
    fn nav_hjkl_and_arrows() {
        assert_eq!(to_app_event(press(KeyCode::Char('k'))), Some(AppEvent::Nav(Direction::Up)));
        assert_eq!(to_app_event(press(KeyCode::Down)), Some(AppEvent::Nav(Direction::Down)));
        assert_eq!(to_app_event(press(KeyCode::Char('h'))), Some(AppEvent::Nav(Direction::Left)));
        assert_eq!(to_app_event(press(KeyCode::Right)), Some(AppEvent::Nav(Direction::Right)));
    }

    #[test]
    fn space_is_a_char() {
        assert_eq!(to_app_event(press(KeyCode::Char(' '))), Some(AppEvent::Char(' ')));
    }

    #[test]
    fn rebound_keys_take_effect() {
        let cfg = KeybindingsConfig {
            export: "x".into(),
            depth_up: "+".into(),
            ..KeybindingsConfig::default()
        };
        let keymap = Keymap::from_config(&cfg);
        assert_eq!(
            super::to_app_event(press(KeyCode::Char('x')), &keymap),
            Some(AppEvent::Export)
        );
        assert_eq!(
            super::to_app_event(press(KeyCode::Char('+')), &keymap),
            Some(AppEvent::DepthUp)
        );
        // The old export key is now an ordinary character.
        assert_eq!(
            super::to_app_event(press(KeyCode::Char('e')), &keymap),
            Some(AppEvent::Char('e'))
        );
    }

    #[test]
    fn key_names_parse() {
        assert_eq!(parse_key("Tab"), Some(KeyCode::Tab));
        assert_eq!(parse_key("F5"), Some(KeyCode::F(5)));
        assert_eq!(parse_key("e"), Some(KeyCode::Char('e')));
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("hyper"), None);
    }

    #[test]
    fn unbound_key_returns_none() {
        assert_eq!(to_app_event(press(KeyCode::F(5))), None);
    }

    #[test]
    fn insert_mode_shortcut_letters_are_chars() {
        for ch in ['h', 'j', 'k', 'l', 'q', 'e', 'g', 'G', '[', ']', '/'] {
            assert_eq!(
                to_app_event_insert(press(KeyCode::Char(ch))),
                Some(AppEvent::Char(ch)),
                "insert mode: '{ch}' should produce Char"
            );
        }
    }

    #[test]
    fn insert_mode_ctrl_c_still_quits() {
        assert_eq!(to_app_event_insert(ctrl(KeyCode::Char('c'))), Some(AppEvent::Quit));
    }
}
