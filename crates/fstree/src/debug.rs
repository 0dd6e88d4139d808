//! Text rendering of a flattened view for logs and test failures.
//!
//! ```ignore
//! let text = FlatViewDebug::new().format(&view, &store, Some(&selection));
//! tracing::debug!(target: targets::TREE, "\n{text}");
//! ```
//!
//! Produces output such as:
//!
//! ```text
//! docs/ (expanded) [selected]
//! ├── docs/a.md
//! └── docs/b.md <focus>
//! src/
//! ```

use crate::model::{FlatView, NodeId, SelectionController, TreeStore};

/// Branch characters used for nested rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Plain indentation.
    Compact,
}

/// Options for [`FlatViewDebug`].
#[derive(Debug, Clone)]
pub struct ViewFormatOptions {
    pub style: TreeStyle,
    /// Append a trailing `/` to rows that have children.
    pub mark_containers: bool,
    /// Show expand, selection and focus markers.
    pub show_state: bool,
    pub indent_size: usize,
}

impl Default for ViewFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            mark_containers: true,
            show_state: true,
            indent_size: 2,
        }
    }
}

impl ViewFormatOptions {
    /// Ids and indentation only.
    pub fn minimal() -> Self {
        Self {
            mark_containers: false,
            show_state: false,
            ..Default::default()
        }
    }
}

/// Renders a [`FlatView`] as an indented tree, one row per line.
#[derive(Debug, Clone, Default)]
pub struct FlatViewDebug {
    options: ViewFormatOptions,
}

impl FlatViewDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ViewFormatOptions) -> Self {
        Self { options }
    }

    /// Format every row of `view`.
    pub fn format<T>(
        &self,
        view: &FlatView<T>,
        store: &TreeStore<T>,
        selection: Option<&SelectionController<T>>,
    ) -> String {
        if view.is_empty() {
            return "(empty)\n".to_string();
        }

        let rows = view.rows();
        let focused = selection.and_then(|s| s.focused_index());
        let mut output = String::new();

        for (index, row) in rows.iter().enumerate() {
            output.push_str(&self.build_prefix(row.depth, is_last_sibling(view, index)));

            if row.is_up_one_level() {
                output.push_str("..");
            } else {
                output.push_str(&row.id);
            }

            let node = NodeId::Id(row.id.clone());
            if self.options.mark_containers && !row.is_up_one_level() && store.has_children(&node) {
                output.push('/');
            }

            if self.options.show_state {
                if store.is_expanded(&node) {
                    output.push_str(" (expanded)");
                }
                if selection.is_some_and(|s| s.is_selected(&row.id)) {
                    output.push_str(" [selected]");
                }
                if focused == Some(index) {
                    output.push_str(" <focus>");
                }
            }

            output.push('\n');
        }

        output
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

/// No later row at the same depth before the view climbs above it.
fn is_last_sibling<T>(view: &FlatView<T>, index: usize) -> bool {
    let rows = view.rows();
    let depth = rows[index].depth;
    rows[index + 1..]
        .iter()
        .map(|row| row.depth)
        .find(|&d| d <= depth)
        .is_none_or(|d| d < depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyboardModifiers;
    use crate::model::EntryInterface;

    struct Node {
        id: &'static str,
        parent: Option<&'static str>,
    }

    fn store() -> TreeStore<Node> {
        let store = TreeStore::new(EntryInterface::new(
            |n: &Node| n.id.to_string(),
            |n: &Node| n.parent.map(str::to_string),
        ));
        store.add_entries([
            Node { id: "docs", parent: None },
            Node { id: "docs/a.md", parent: Some("docs") },
            Node { id: "docs/b.md", parent: Some("docs") },
            Node { id: "src", parent: None },
            Node { id: "src/lib.rs", parent: Some("src") },
        ]);
        store.update_expanded(&NodeId::from("docs"), true);
        store
    }

    #[test]
    fn test_format_with_state() {
        let store = store();
        let view = store.flatten(None, |a, b| a.id.cmp(b.id));
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(0));
        selection.set_focus(&view, 2);

        let text = FlatViewDebug::new().format(&view, &store, Some(&selection));
        assert_eq!(
            text,
            "docs/ (expanded) [selected]\n\
             \u{251c}\u{2500}\u{2500} docs/a.md\n\
             \u{2514}\u{2500}\u{2500} docs/b.md <focus>\n\
             src/\n"
        );
    }

    #[test]
    fn test_format_minimal_ascii() {
        let store = store();
        let view = store.flatten(None, |a, b| a.id.cmp(b.id));
        let debug = FlatViewDebug::with_options(ViewFormatOptions {
            style: TreeStyle::Ascii,
            ..ViewFormatOptions::minimal()
        });

        assert_eq!(
            debug.format(&view, &store, None),
            "docs\n+-- docs/a.md\n`-- docs/b.md\nsrc\n"
        );
    }

    #[test]
    fn test_format_empty() {
        let store = TreeStore::new(EntryInterface::new(
            |n: &Node| n.id.to_string(),
            |_: &Node| None,
        ));
        let view = store.flatten(None, |_, _| std::cmp::Ordering::Equal);
        assert_eq!(FlatViewDebug::new().format(&view, &store, None), "(empty)\n");
    }
}
