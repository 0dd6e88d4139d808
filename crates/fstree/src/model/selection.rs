//! Explorer-style selection over a flattened view.
//!
//! [`SelectionController`] keeps three independent pieces of state:
//!
//! - the **selected set** (id to entity), unordered;
//! - the **anchor** (`last_selected`), the row range selection extends from;
//! - the **focus**, the keyboard cursor.
//!
//! An entity can be focused without being selected and the other way round.
//! Anchor and focus carry a row index that is only valid for the view it was
//! taken from; call [`SelectionController::on_content_updated`] after every
//! re-flatten to re-derive them.
//!
//! # Example
//!
//! ```ignore
//! let mut selection = SelectionController::new();
//! selection.handle_select(KeyboardModifiers::NONE, &view, Some(2));
//! selection.handle_select(KeyboardModifiers::SHIFT, &view, Some(5));
//! assert_eq!(selection.selected_count(), 4);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use fstree_core::Signal;
use fstree_core::logging::{PerfSpan, span_names, targets};

use super::flatten::{DepthEntry, FlatView, IndexedEntry};
use crate::event::{Gesture, KeyboardModifiers};

/// Selection, anchor and focus state for one tree.
///
/// # Signals
///
/// - `selection_changed`: emitted once per gesture that changed the selected set
/// - `focus_changed`: emitted when the focused row moves, with its new index
pub struct SelectionController<T> {
    /// Selected entities by id.
    selected: HashMap<String, Arc<T>>,

    /// Anchor for range selection.
    last_selected: Option<IndexedEntry<T>>,

    /// Keyboard cursor.
    focused: Option<IndexedEntry<T>>,

    /// Emitted when the selected set changes.
    pub selection_changed: Signal<()>,

    /// Emitted when the focus moves. Args: new focus index
    pub focus_changed: Signal<Option<usize>>,
}

impl<T> Default for SelectionController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SelectionController<T> {
    pub fn new() -> Self {
        Self {
            selected: HashMap::new(),
            last_selected: None,
            focused: None,
            selection_changed: Signal::new(),
            focus_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Read models
    // =========================================================================

    pub fn selected(&self) -> &HashMap<String, Arc<T>> {
        &self.selected
    }

    /// Selected ids, sorted.
    pub fn selected_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.selected.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains_key(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// The range anchor.
    pub fn last_selected(&self) -> Option<&IndexedEntry<T>> {
        self.last_selected.as_ref()
    }

    pub fn focused(&self) -> Option<&IndexedEntry<T>> {
        self.focused.as_ref()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused.as_ref().map(|focused| focused.index)
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Apply a click gesture to the selected set only; anchor and focus stay.
    ///
    /// `target` is a row index into `view`; `None` means empty space. Out of
    /// range targets and shift+command are ignored.
    pub fn update_selection(
        &mut self,
        modifiers: KeyboardModifiers,
        view: &FlatView<T>,
        target: Option<usize>,
    ) {
        if self.apply_gesture(modifiers.gesture(), view, target) {
            self.selection_changed.emit(());
        }
    }

    /// Apply a click gesture and move anchor and focus to the target.
    ///
    /// A plain click on empty space clears the selection, the anchor and the
    /// focus. Command or shift clicks on empty space change nothing.
    pub fn handle_select(
        &mut self,
        modifiers: KeyboardModifiers,
        view: &FlatView<T>,
        target: Option<usize>,
    ) {
        let gesture = modifiers.gesture();
        match target {
            None => {
                if gesture == Gesture::Plain {
                    self.clear();
                }
            }
            Some(index) => {
                if gesture == Gesture::Conflicting {
                    return;
                }
                let Some(indexed) = view.indexed(index) else {
                    return;
                };
                let changed = self.apply_gesture(gesture, view, target);
                self.last_selected = Some(indexed.clone());
                self.set_focused_entry(Some(indexed));
                if changed {
                    self.selection_changed.emit(());
                }
            }
        }
    }

    /// Toggle the focused row's membership and make it the anchor. Focus does
    /// not move. No-op when nothing is focused.
    pub fn toggle_focused(&mut self, view: &FlatView<T>) {
        let Some(index) = self.focused_index() else {
            return;
        };
        let Some(indexed) = view.indexed(index) else {
            return;
        };
        let changed = self.apply_gesture(Gesture::Toggle, view, Some(index));
        self.last_selected = Some(indexed);
        if changed {
            self.selection_changed.emit(());
        }
    }

    /// Make row `index` the range anchor without touching the selected set.
    pub fn set_anchor(&mut self, view: &FlatView<T>, index: usize) {
        if let Some(indexed) = view.indexed(index) {
            self.last_selected = Some(indexed);
        }
    }

    /// Move the focus to row `index` without touching the selected set.
    pub fn set_focus(&mut self, view: &FlatView<T>, index: usize) {
        if let Some(indexed) = view.indexed(index) {
            self.set_focused_entry(Some(indexed));
        }
    }

    /// Clear the selected set, the anchor and the focus.
    pub fn clear(&mut self) {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        self.last_selected = None;
        self.set_focused_entry(None);
        if changed {
            tracing::debug!(target: targets::SELECTION, "selection cleared");
            self.selection_changed.emit(());
        }
    }

    /// Change the selected set for `gesture`. Returns whether it changed.
    fn apply_gesture(&mut self, gesture: Gesture, view: &FlatView<T>, target: Option<usize>) -> bool {
        let target = match target {
            None => None,
            Some(index) => match view.get(index) {
                Some(row) => Some((index, row)),
                None => return false,
            },
        };

        match (gesture, target) {
            (Gesture::Conflicting, _) => false,
            (Gesture::Plain, None) => self.replace_selected(std::iter::empty()),
            (Gesture::Toggle | Gesture::Range, None) => false,
            (Gesture::Plain, Some((_, row))) => self.replace_selected(std::iter::once(row)),
            (Gesture::Toggle, Some((_, row))) => {
                if self.selected.remove(&row.id).is_none() {
                    self.selected.insert(row.id.clone(), row.entry.clone());
                }
                true
            }
            (Gesture::Range, Some((index, row))) => match self.last_selected.as_ref().map(|a| a.index) {
                None => self.replace_selected(std::iter::once(row)),
                Some(anchor_index) => {
                    let anchor_index = anchor_index.min(view.len() - 1);
                    let (low, high) = if anchor_index <= index {
                        (anchor_index, index)
                    } else {
                        (index, anchor_index)
                    };
                    tracing::trace!(target: targets::SELECTION, low, high, "range select");
                    self.replace_selected(view.rows()[low..=high].iter())
                }
            },
        }
    }

    fn replace_selected<'a, I>(&mut self, rows: I) -> bool
    where
        I: Iterator<Item = &'a DepthEntry<T>>,
        T: 'a,
    {
        let next: HashMap<String, Arc<T>> = rows
            .map(|row| (row.id.clone(), row.entry.clone()))
            .collect();
        let changed = next.len() != self.selected.len()
            || next.keys().any(|id| !self.selected.contains_key(id));
        self.selected = next;
        changed
    }

    fn set_focused_entry(&mut self, focused: Option<IndexedEntry<T>>) {
        let old = self.focused.as_ref().map(|f| (f.index, f.id().to_owned()));
        let new = focused.as_ref().map(|f| (f.index, f.id().to_owned()));
        self.focused = focused;
        if old != new {
            self.focus_changed.emit(self.focused_index());
        }
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Re-derive anchor and focus against a freshly flattened view.
    ///
    /// Anchor and focus are handled independently: a row that is still visible
    /// keeps its identity and adopts its new index; a vanished row is replaced
    /// by whatever now sits at its old index (clamped to the last row), so the
    /// cursor stays visually put. The selected set is left alone, so rows that
    /// are only hidden by a collapse or a directory change stay selected.
    pub fn on_content_updated(&mut self, view: &FlatView<T>) {
        self.on_content_updated_with(view, |_| true);
    }

    /// Like [`on_content_updated`](Self::on_content_updated), and also drops
    /// selected ids for which `exists` returns false.
    ///
    /// If the anchor entity itself was removed and that empties the selection,
    /// the row that replaced the anchor becomes selected.
    pub fn on_content_updated_with<F>(&mut self, view: &FlatView<T>, exists: F)
    where
        F: Fn(&str) -> bool,
    {
        let removed_any = self.selected.keys().any(|id| !exists(id.as_str()));
        if self.last_selected.is_none() && self.focused.is_none() && !removed_any {
            return;
        }
        let _span = PerfSpan::new(span_names::RECONCILE);

        let anchor_removed = self
            .last_selected
            .as_ref()
            .is_some_and(|anchor| !view.contains(anchor.id()) && !exists(anchor.id()));
        self.last_selected = self
            .last_selected
            .take()
            .and_then(|anchor| Self::reconcile(anchor, view));

        let focused = self.focused.take();
        let reconciled = focused.clone().and_then(|focus| Self::reconcile(focus, view));
        self.focused = focused;
        self.set_focused_entry(reconciled);

        for (id, entry) in self.selected.iter_mut() {
            if let Some(row) = view.position(id).and_then(|index| view.get(index)) {
                *entry = row.entry.clone();
            }
        }
        if !removed_any {
            return;
        }

        self.selected.retain(|id, _| exists(id.as_str()));
        if self.selected.is_empty()
            && anchor_removed
            && let Some(anchor) = &self.last_selected
        {
            self.selected.insert(anchor.id().to_owned(), anchor.entry.entry.clone());
        }
        tracing::debug!(
            target: targets::SELECTION,
            selected = self.selected.len(),
            "removed entries dropped from selection"
        );
        self.selection_changed.emit(());
    }

    fn reconcile(previous: IndexedEntry<T>, view: &FlatView<T>) -> Option<IndexedEntry<T>> {
        if let Some(found) = view.indexed_by_id(previous.id()) {
            return Some(found);
        }
        if view.is_empty() {
            return None;
        }
        view.indexed(previous.index.min(view.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn view_of(ids: &[&str]) -> FlatView<String> {
        let mut view = FlatView::new();
        for id in ids {
            view.push(DepthEntry::new(*id, 0, Arc::new(id.to_string())));
        }
        view
    }

    fn letters() -> FlatView<String> {
        view_of(&["a", "b", "c", "d", "e", "f"])
    }

    #[test]
    fn test_plain_click_selects_only_target() {
        let view = letters();
        let mut selection = SelectionController::new();

        selection.handle_select(KeyboardModifiers::NONE, &view, Some(1));
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(3));

        assert_eq!(selection.selected_ids(), vec!["d"]);
        assert_eq!(selection.last_selected().map(|a| a.index), Some(3));
        assert_eq!(selection.focused_index(), Some(3));
    }

    #[test]
    fn test_plain_click_on_empty_space_clears_everything() {
        let view = letters();
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(1));

        selection.handle_select(KeyboardModifiers::NONE, &view, None);
        assert!(!selection.has_selection());
        assert!(selection.last_selected().is_none());
        assert!(selection.focused().is_none());
    }

    #[test]
    fn test_modified_click_on_empty_space_is_noop() {
        let view = letters();
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(1));

        selection.handle_select(KeyboardModifiers::CTRL, &view, None);
        selection.handle_select(KeyboardModifiers::SHIFT, &view, None);
        assert_eq!(selection.selected_ids(), vec!["b"]);
        assert_eq!(selection.focused_index(), Some(1));
    }

    #[test]
    fn test_ctrl_click_toggles() {
        let view = letters();
        let mut selection = SelectionController::new();

        selection.handle_select(KeyboardModifiers::NONE, &view, Some(0));
        selection.handle_select(KeyboardModifiers::CTRL, &view, Some(2));
        selection.handle_select(KeyboardModifiers::META, &view, Some(4));
        assert_eq!(selection.selected_ids(), vec!["a", "c", "e"]);

        selection.handle_select(KeyboardModifiers::CTRL, &view, Some(2));
        assert_eq!(selection.selected_ids(), vec!["a", "e"]);
        assert_eq!(selection.focused_index(), Some(2));
        assert_eq!(selection.last_selected().map(|a| a.index), Some(2));
    }

    #[test]
    fn test_shift_click_selects_range_and_replaces() {
        let view = letters();
        let mut selection = SelectionController::new();

        selection.handle_select(KeyboardModifiers::NONE, &view, Some(0));
        selection.handle_select(KeyboardModifiers::CTRL, &view, Some(5));
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(3));
        selection.update_selection(KeyboardModifiers::SHIFT, &view, Some(1));

        assert_eq!(selection.selected_ids(), vec!["b", "c", "d"]);
        // update_selection leaves the anchor alone.
        assert_eq!(selection.last_selected().map(|a| a.index), Some(3));
    }

    #[test]
    fn test_shift_click_without_anchor_is_plain() {
        let view = letters();
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::SHIFT, &view, Some(4));
        assert_eq!(selection.selected_ids(), vec!["e"]);
    }

    #[test]
    fn test_range_symmetry() {
        let view = letters();
        for (i, j) in [(1, 4), (0, 5), (2, 2)] {
            let mut forward = SelectionController::new();
            forward.handle_select(KeyboardModifiers::NONE, &view, Some(i));
            forward.handle_select(KeyboardModifiers::SHIFT, &view, Some(j));

            let mut backward = SelectionController::new();
            backward.handle_select(KeyboardModifiers::NONE, &view, Some(j));
            backward.handle_select(KeyboardModifiers::SHIFT, &view, Some(i));

            assert_eq!(forward.selected_ids(), backward.selected_ids());
            assert_eq!(forward.selected_count(), i.abs_diff(j) + 1);
        }
    }

    #[test]
    fn test_shift_ctrl_is_noop() {
        let view = letters();
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(1));

        selection.handle_select(KeyboardModifiers::CTRL_SHIFT, &view, Some(4));
        selection.handle_select(KeyboardModifiers::CTRL_SHIFT, &view, None);
        assert_eq!(selection.selected_ids(), vec!["b"]);
        assert_eq!(selection.focused_index(), Some(1));
    }

    #[test]
    fn test_out_of_range_target_is_noop() {
        let view = letters();
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(1));
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(42));
        assert_eq!(selection.selected_ids(), vec!["b"]);
    }

    #[test]
    fn test_selection_signal_once_per_change() {
        let view = letters();
        let mut selection = SelectionController::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        selection.selection_changed.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        selection.handle_select(KeyboardModifiers::NONE, &view, Some(1));
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(1));
        selection.handle_select(KeyboardModifiers::SHIFT, &view, Some(3));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_focus_signal() {
        let view = letters();
        let mut selection = SelectionController::new();
        let moves = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let moves_clone = moves.clone();
        selection.focus_changed.connect(move |index| {
            moves_clone.lock().push(*index);
        });

        selection.handle_select(KeyboardModifiers::NONE, &view, Some(1));
        selection.set_focus(&view, 2);
        selection.set_focus(&view, 2);
        selection.clear();
        assert_eq!(*moves.lock(), vec![Some(1), Some(2), None]);
    }

    #[test]
    fn test_toggle_focused_moves_anchor_not_focus() {
        let view = letters();
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(0));
        selection.set_focus(&view, 3);

        selection.toggle_focused(&view);
        assert_eq!(selection.selected_ids(), vec!["a", "d"]);
        assert_eq!(selection.last_selected().map(|a| a.index), Some(3));
        assert_eq!(selection.focused_index(), Some(3));
    }

    #[test]
    fn test_reconcile_noop_when_empty() {
        let mut selection = SelectionController::<String>::new();
        selection.on_content_updated(&letters());
        assert!(selection.focused().is_none());
        assert!(selection.last_selected().is_none());
    }

    #[test]
    fn test_reconcile_follows_identity() {
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &letters(), Some(2));

        let shifted = view_of(&["x", "y", "a", "b", "c"]);
        selection.on_content_updated(&shifted);
        assert_eq!(selection.focused_index(), Some(4));
        assert_eq!(selection.last_selected().map(|a| a.index), Some(4));
        assert_eq!(selection.selected_ids(), vec!["c"]);
    }

    #[test]
    fn test_reconcile_first_row_removed() {
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &letters(), Some(0));

        let view = view_of(&["b", "c", "d", "e", "f"]);
        selection.on_content_updated_with(&view, |id| view.contains(id));
        assert_eq!(selection.focused().map(|f| f.id()), Some("b"));
        assert_eq!(selection.focused_index(), Some(0));
        assert_eq!(selection.last_selected().map(|a| a.index), Some(0));
        assert_eq!(selection.selected_ids(), vec!["b"]);
    }

    #[test]
    fn test_reconcile_last_row_removed() {
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &letters(), Some(5));

        let view = view_of(&["a", "b", "c", "d", "e"]);
        selection.on_content_updated_with(&view, |id| view.contains(id));
        assert_eq!(selection.focused_index(), Some(4));
        assert_eq!(selection.last_selected().map(|a| a.id()), Some("e"));
        assert_eq!(selection.selected_ids(), vec!["e"]);
    }

    #[test]
    fn test_reconcile_independent_pointers() {
        let mut selection = SelectionController::new();
        let view = letters();
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(1));
        selection.set_focus(&view, 4);

        // Anchor row vanishes, focus row survives and moves up.
        selection.on_content_updated(&view_of(&["a", "c", "d", "e", "f"]));
        assert_eq!(selection.last_selected().map(|a| a.id()), Some("c"));
        assert_eq!(selection.focused().map(|f| f.id()), Some("e"));
        assert_eq!(selection.focused_index(), Some(3));
    }

    #[test]
    fn test_reconcile_hidden_rows_stay_selected() {
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &letters(), Some(3));
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = changes.clone();
        selection.selection_changed.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        selection.on_content_updated(&view_of(&["a", "b"]));
        assert_eq!(selection.selected_ids(), vec!["d"]);
        assert_eq!(selection.last_selected().map(|a| a.id()), Some("b"));
        assert_eq!(changes.load(Ordering::SeqCst), 0);

        selection.on_content_updated(&FlatView::new());
        assert!(selection.focused().is_none());
        assert!(selection.last_selected().is_none());
        assert_eq!(selection.selected_ids(), vec!["d"]);
    }

    #[test]
    fn test_reconcile_without_pointers_keeps_selection() {
        let view = letters();
        let mut selection = SelectionController::new();
        selection.update_selection(KeyboardModifiers::NONE, &view, Some(2));
        assert!(selection.last_selected().is_none());

        selection.on_content_updated(&view_of(&["a"]));
        assert_eq!(selection.selected_ids(), vec!["c"]);
        assert!(selection.focused().is_none());
    }

    #[test]
    fn test_reconcile_drops_removed_ids() {
        let mut selection = SelectionController::new();
        selection.handle_select(KeyboardModifiers::NONE, &letters(), Some(3));

        selection.on_content_updated_with(&FlatView::new(), |_| false);
        assert!(selection.focused().is_none());
        assert!(selection.last_selected().is_none());
        assert!(!selection.has_selection());
    }

    #[test]
    fn test_reconcile_keeps_unaffected_multi_selection() {
        let mut selection = SelectionController::new();
        let view = letters();
        selection.handle_select(KeyboardModifiers::NONE, &view, Some(1));
        selection.handle_select(KeyboardModifiers::CTRL, &view, Some(3));
        selection.handle_select(KeyboardModifiers::CTRL, &view, Some(5));

        let view = view_of(&["a", "b", "c", "e", "f"]);
        selection.on_content_updated_with(&view, |id| view.contains(id));
        assert_eq!(selection.selected_ids(), vec!["b", "f"]);
        assert_eq!(selection.focused().map(|f| f.id()), Some("f"));
    }
}
