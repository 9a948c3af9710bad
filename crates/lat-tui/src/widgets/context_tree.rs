//! Context tree widget — root contexts and their URLs in the left pane.
//!
//! # Navigation
//! - `↑`/`k` and `↓`/`j` move the cursor up and down the visible list.
//! - `→`/`l` expands the focused context; `←`/`h` collapses it (from a URL
//!   row, collapses the parent and moves the cursor onto it).
//! - `Enter` on a context toggles expansion; on a URL it selects that URL.
//! - `Space` selects the focused node, or clears the selection if the node is
//!   already selected.
//!
//! Selecting a context filters records by "URL contains context"; selecting
//! a URL filters by exact URL.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use lat_core::{root_contexts, urls_for_context, RawRecord};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};

// ---------------------------------------------------------------------------
// Tree node
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Context,
    Url,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub value: String,
    pub kind: NodeKind,
    pub expanded: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn context(value: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            value: value.into(),
            kind: NodeKind::Context,
            expanded: false,
            children: urls.into_iter().map(TreeNode::url).collect(),
        }
    }

    pub fn url(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: NodeKind::Url,
            expanded: false,
            children: Vec::new(),
        }
    }

    fn selection(&self) -> TreeSelection {
        match self.kind {
            NodeKind::Context => TreeSelection::Context(self.value.clone()),
            NodeKind::Url => TreeSelection::Url(self.value.clone()),
        }
    }
}

/// The filter a tree node stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeSelection {
    Context(String),
    Url(String),
}

/// What the tree asks the app shell to do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    Select(TreeSelection),
    Clear,
}

// ---------------------------------------------------------------------------
// Tree state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ContextTreeState {
    pub nodes: Vec<TreeNode>,
    /// Index into the currently-visible (flattened) list.
    pub cursor: usize,
    pub selected: Option<TreeSelection>,
}

impl ContextTreeState {
    /// Build the tree from the root contexts of `records`.
    pub fn from_records(records: &[RawRecord]) -> Self {
        let nodes = root_contexts(records)
            .into_iter()
            .map(|ctx| {
                let urls = urls_for_context(records, &ctx);
                TreeNode::context(ctx, urls)
            })
            .collect();
        Self {
            nodes,
            ..Self::default()
        }
    }

    /// Flatten the tree into `(depth, &node)` pairs, respecting expanded state.
    pub fn visible(&self) -> Vec<(usize, &TreeNode)> {
        let mut out = Vec::new();
        for node in &self.nodes {
            out.push((0, node));
            if node.expanded {
                out.extend(node.children.iter().map(|c| (1, c)));
            }
        }
        out
    }

    /// `(root index, child index)` of the node under the cursor.
    fn cursor_path(&self) -> Option<(usize, Option<usize>)> {
        let mut row = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if row == self.cursor {
                return Some((i, None));
            }
            row += 1;
            if node.expanded {
                if self.cursor < row + node.children.len() {
                    return Some((i, Some(self.cursor - row)));
                }
                row += node.children.len();
            }
        }
        None
    }

    /// Visible row index of root `index`.
    fn row_of_root(&self, index: usize) -> usize {
        self.nodes[..index]
            .iter()
            .map(|n| 1 + if n.expanded { n.children.len() } else { 0 })
            .sum()
    }

    fn node_at(&self, path: (usize, Option<usize>)) -> &TreeNode {
        match path {
            (root, None) => &self.nodes[root],
            (root, Some(child)) => &self.nodes[root].children[child],
        }
    }

    fn select(&mut self, path: (usize, Option<usize>)) -> TreeAction {
        let selection = self.node_at(path).selection();
        if self.selected.as_ref() == Some(&selection) {
            tracing::debug!(?selection, "tree: selection cleared");
            self.selected = None;
            TreeAction::Clear
        } else {
            tracing::debug!(?selection, "tree: selected");
            self.selected = Some(selection.clone());
            TreeAction::Select(selection)
        }
    }

    /// Handle an [`AppEvent`], mutating state as appropriate.
    pub fn handle(&mut self, event: &AppEvent) -> Option<TreeAction> {
        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            AppEvent::Nav(Direction::Down) => {
                let max = self.visible().len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(max);
                None
            }
            AppEvent::Nav(Direction::Right) => {
                if let Some((root, None)) = self.cursor_path() {
                    tracing::debug!(context = %self.nodes[root].value, "tree: expand");
                    self.nodes[root].expanded = true;
                }
                None
            }
            AppEvent::Nav(Direction::Left) => {
                if let Some((root, _)) = self.cursor_path() {
                    tracing::debug!(context = %self.nodes[root].value, "tree: collapse");
                    self.nodes[root].expanded = false;
                    self.cursor = self.row_of_root(root);
                }
                None
            }
            AppEvent::Enter => match self.cursor_path()? {
                (root, None) => {
                    let node = &mut self.nodes[root];
                    node.expanded = !node.expanded;
                    tracing::debug!(context = %node.value, expanded = node.expanded, "tree: toggle");
                    None
                }
                path => Some(self.select(path)),
            },
            AppEvent::Char(' ') => {
                let path = self.cursor_path()?;
                Some(self.select(path))
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct ContextTree<'a> {
    state: &'a ContextTreeState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ContextTree<'a> {
    pub fn new(state: &'a ContextTreeState, focused: bool, theme: &'a Theme) -> Self {
        Self { state, focused, theme }
    }
}

impl Widget for ContextTree<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };
        let block = Block::bordered()
            .title("Application contexts")
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = self
            .state
            .visible()
            .into_iter()
            .map(|(depth, node)| {
                let indent = "  ".repeat(depth);
                let expand = match (node.kind, node.expanded) {
                    (NodeKind::Url, _) => "  ",
                    (NodeKind::Context, true) => "▼ ",
                    (NodeKind::Context, false) => "▶ ",
                };
                let is_selected = self.state.selected.as_ref() == Some(&node.selection());
                let label_style = if is_selected {
                    self.theme.table_selected
                } else if node.kind == NodeKind::Context {
                    self.theme.context_style(&node.value)
                } else {
                    Default::default()
                };
                let marker = if is_selected { " ✓" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{indent}{expand}")),
                    Span::styled(node.value.clone(), label_style),
                    Span::raw(marker),
                ]))
            })
            .collect();

        let list = List::new(items).highlight_style(self.theme.table_cursor);
        let selected = self.focused.then_some(self.state.cursor);
        let mut list_state = ListState::default().with_selected(selected);
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
