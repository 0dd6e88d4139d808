//! The tree controller a presentation layer drives.
//!
//! [`FsTree`] owns everything a file-browser style listing needs besides the
//! data itself: the columns, the active sort, the current directory, the
//! selection and the keyboard navigator. It keeps a cached [`FlatView`] and
//! rebuilds it lazily whenever the store revision, the sort or the current
//! directory changed, reconciling the selection against every rebuild.
//!
//! ```ignore
//! let store = Arc::new(TreeStore::new(interface));
//! store.add_entries(files);
//!
//! let mut tree = FsTree::with_default_columns(store.clone(), TreeOptions::default());
//! tree.on_row_click(KeyboardModifiers::NONE, 0);
//! tree.on_key(&KeyPressEvent::new(Key::ArrowDown, KeyboardModifiers::NONE));
//!
//! for row in tree.contents() {
//!     println!("{}{}", "  ".repeat(row.depth), row.id);
//! }
//! ```

use std::sync::Arc;

use fstree_core::Signal;
use fstree_core::logging::targets;

use crate::debug::FlatViewDebug;
use crate::event::{KeyPressEvent, KeyboardModifiers};
use crate::model::{
    Column, DepthEntry, FlatView, KeyboardNavigator, ListingEntry, Navigation, NodeId,
    SelectionController, SortOrder, TreeStore,
};
use crate::options::TreeOptions;

/// A sortable, navigable listing over a shared [`TreeStore`].
///
/// # Signals
///
/// - `activated`: a row was double-clicked or Enter was pressed on it
/// - `cwd_changed`: the current directory changed (`None` is the root)
pub struct FsTree<T> {
    store: Arc<TreeStore<T>>,
    selection: SelectionController<T>,
    navigator: KeyboardNavigator,
    columns: Vec<Column<T>>,
    sort_column: usize,
    sort_order: SortOrder,
    cwd: Option<String>,
    options: TreeOptions,

    view: FlatView<T>,
    /// Store revision `view` was built from.
    view_revision: u64,
    /// Sort or directory changed since `view` was built.
    stale: bool,

    /// Emitted when a row is activated. Args: the activated row
    pub activated: Signal<DepthEntry<T>>,

    /// Emitted when the current directory changes. Args: new directory id
    pub cwd_changed: Signal<Option<String>>,
}

impl<T: 'static> FsTree<T> {
    /// Create a tree over `store` with the given columns.
    ///
    /// The initial sort comes from `options`; an out of range column falls
    /// back to the first one.
    pub fn new(store: Arc<TreeStore<T>>, columns: Vec<Column<T>>, options: TreeOptions) -> Self {
        let sort_column = if options.sort_column < columns.len() {
            options.sort_column
        } else {
            0
        };
        let sort_order = options.sort_order;
        Self {
            store,
            selection: SelectionController::new(),
            navigator: KeyboardNavigator::new(),
            columns,
            sort_column,
            sort_order,
            cwd: None,
            options,
            view: FlatView::new(),
            view_revision: 0,
            stale: true,
            activated: Signal::new(),
            cwd_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Read models
    // =========================================================================

    pub fn store(&self) -> &Arc<TreeStore<T>> {
        &self.store
    }

    pub fn selection(&self) -> &SelectionController<T> {
        &self.selection
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Index of the column the listing is sorted by.
    pub fn sort_column(&self) -> usize {
        self.sort_column
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// The order shown in a column's header: the active order for the sort
    /// column, [`SortOrder::Undefined`] for every other column.
    pub fn column_sort_order(&self, column: usize) -> SortOrder {
        if column == self.sort_column {
            self.sort_order
        } else {
            SortOrder::Undefined
        }
    }

    /// The directory being listed, `None` for the root.
    pub fn cwd(&self) -> Option<&str> {
        self.cwd.as_deref()
    }

    /// The visible rows, rebuilt first if anything changed.
    pub fn contents(&mut self) -> &FlatView<T> {
        self.refresh();
        &self.view
    }

    /// Text for the cell of `column` in `row`.
    pub fn cell_text(&self, row: &DepthEntry<T>, column: usize) -> Option<String> {
        self.columns
            .get(column)
            .map(|c| c.cell_text(&row.entry, &self.store))
    }

    /// The current view as an indented tree with selection markers.
    pub fn debug_string(&mut self) -> String {
        self.refresh();
        FlatViewDebug::new().format(&self.view, &self.store, Some(&self.selection))
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    /// List the children of `cwd` instead of the root. `None` or an empty id
    /// selects the root.
    pub fn set_cwd(&mut self, cwd: Option<&str>) {
        let cwd = cwd.filter(|id| !id.is_empty()).map(str::to_string);
        if cwd == self.cwd {
            return;
        }
        tracing::debug!(target: targets::TREE, cwd = ?cwd, "current directory changed");
        self.cwd = cwd;
        self.stale = true;
        self.cwd_changed.emit(self.cwd.clone());
    }

    /// Sort by `column` in `order`. Unknown columns are ignored.
    pub fn on_sort(&mut self, column: usize, order: SortOrder) {
        if column >= self.columns.len() {
            tracing::warn!(target: targets::TREE, column, "sort requested for unknown column");
            return;
        }
        if column == self.sort_column && order == self.sort_order {
            return;
        }
        self.sort_column = column;
        self.sort_order = order;
        self.stale = true;
    }

    /// A header click: toggle the order of the sort column, or sort a new
    /// column ascending.
    pub fn on_header_click(&mut self, column: usize) {
        let order = self.column_sort_order(column).toggled();
        self.on_sort(column, order);
    }

    /// A click on empty space.
    pub fn on_click(&mut self, modifiers: KeyboardModifiers) {
        self.refresh();
        self.selection.handle_select(modifiers, &self.view, None);
    }

    /// A click on row `index`.
    ///
    /// With `expand_on_row_click` set, an unmodified click on a container
    /// also toggles its expand state.
    pub fn on_row_click(&mut self, modifiers: KeyboardModifiers, index: usize) {
        self.refresh();
        self.selection.handle_select(modifiers, &self.view, Some(index));

        if !self.options.expand_on_row_click || modifiers.any() {
            return;
        }
        if let Some(row) = self.view.get(index)
            && !row.is_up_one_level()
        {
            let node = NodeId::Id(row.id.clone());
            if self.store.has_children(&node) {
                self.store.toggle_expanded(&node);
            }
        }
    }

    /// A double click on row `index`.
    ///
    /// With `change_directory_on_double_click` set, containers become the
    /// current directory and the "up one level" row moves to the parent
    /// directory. Every other row is activated.
    pub fn on_row_double_click(&mut self, index: usize) {
        self.refresh();
        let Some(row) = self.view.get(index).cloned() else {
            return;
        };

        if self.options.change_directory_on_double_click {
            if row.is_up_one_level() {
                let parent = self
                    .cwd
                    .as_deref()
                    .and_then(|cwd| self.store.get(cwd))
                    .and_then(|entry| self.store.interface().parent(&entry));
                self.set_cwd(parent.as_deref());
                return;
            }
            if self.store.has_children(&NodeId::Id(row.id.clone())) {
                self.set_cwd(Some(&row.id));
                return;
            }
        }

        self.activate(row);
    }

    /// The expand toggle of the row with `id` was clicked.
    pub fn on_toggle_expand(&mut self, id: &str) {
        let node = NodeId::from(id);
        self.update_expanded(&node, !self.store.is_expanded(&node));
    }

    pub fn update_expanded(&mut self, node: &NodeId, expand: bool) {
        self.store.update_expanded(node, expand);
    }

    /// A key press. Enter on the focused row emits `activated`.
    pub fn on_key(&mut self, event: &KeyPressEvent) -> Navigation<T> {
        self.refresh();
        let navigation = self
            .navigator
            .handle_key(event, &self.view, &self.store, &mut self.selection);
        if let Navigation::Activate(focused) = &navigation {
            self.activate(focused.entry.clone());
        }
        navigation
    }

    fn activate(&self, row: DepthEntry<T>) {
        tracing::debug!(target: targets::TREE, id = %row.id, "row activated");
        self.activated.emit(row);
    }

    // =========================================================================
    // View maintenance
    // =========================================================================

    fn refresh(&mut self) {
        let revision = self.store.revision();
        if !self.stale && revision == self.view_revision {
            return;
        }

        let mut view = match self.columns.get(self.sort_column) {
            Some(column) => {
                self.store
                    .flatten_sorted(self.cwd.as_deref(), column.comparator(), self.sort_order)
            }
            None => self
                .store
                .flatten(self.cwd.as_deref(), |_, _| std::cmp::Ordering::Equal),
        };

        if self.options.show_up_one_level
            && let Some(cwd) = self.cwd.as_deref()
            && let Some(entry) = self.store.get(cwd)
        {
            match self.store.get_up_one_level_entry(&entry) {
                Ok(row) => {
                    view.prepend(row);
                }
                Err(err) => tracing::warn!(target: targets::TREE, error = %err, "no up one level row"),
            }
        }

        tracing::trace!(target: targets::TREE, revision, rows = view.len(), "view rebuilt");
        self.view = view;
        self.view_revision = revision;
        self.stale = false;
        let store = &self.store;
        let view = &self.view;
        self.selection
            .on_content_updated_with(view, |id| view.contains(id) || store.contains(id));
    }
}

impl<T: ListingEntry + 'static> FsTree<T> {
    /// Create a tree with the name, size and date columns.
    pub fn with_default_columns(store: Arc<TreeStore<T>>, options: TreeOptions) -> Self {
        Self::new(store, Column::defaults(), options)
    }
}
