//! Keyboard navigation over the flattened view.
//!
//! | Key | Modifiers | Effect |
//! |---|---|---|
//! | Up / Down | none | move focus, select only that row, anchor follows |
//! | Up / Down | shift | move focus, range select from the anchor |
//! | Up / Down | command | move focus only |
//! | Right | none | expand the focused row |
//! | Left | none | collapse the focused row, or jump to its parent row |
//! | Left | command | collapse everything, clear selection and focus |
//! | Space | command | toggle the focused row, anchor follows |
//! | Enter | any | activate the focused row |
//!
//! Shift and command together are ignored for every key.

use fstree_core::logging::{span_names, targets};

use super::flatten::{FlatView, IndexedEntry};
use super::node_id::NodeId;
use super::selection::SelectionController;
use super::store::TreeStore;
use crate::event::{Gesture, Key, KeyPressEvent, KeyboardModifiers};

/// Outcome of a key press.
#[derive(Debug)]
pub enum Navigation<T> {
    /// Nothing changed.
    Ignored,
    /// Selection, focus or expand state may have changed.
    Handled,
    /// Enter was pressed on the focused row.
    Activate(IndexedEntry<T>),
}

impl<T> Navigation<T> {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// Interprets key presses against a view, a store and a selection.
///
/// The navigator is stateless: the focused row in the
/// [`SelectionController`] is the only cursor. Expand state changes go to
/// the store; the caller re-flattens and reconciles afterwards as for any
/// other store update.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardNavigator;

impl KeyboardNavigator {
    pub fn new() -> Self {
        Self
    }

    /// Handle a key press.
    pub fn handle_key<T>(
        &self,
        event: &KeyPressEvent,
        view: &FlatView<T>,
        store: &TreeStore<T>,
        selection: &mut SelectionController<T>,
    ) -> Navigation<T> {
        let _span = tracing::trace_span!(target: targets::KEYBOARD, span_names::KEY_PRESS, key = ?event.key).entered();
        let modifiers = event.modifiers;
        let gesture = modifiers.gesture();
        if gesture == Gesture::Conflicting || view.is_empty() {
            return Navigation::Ignored;
        }

        let current = selection.focused_index().filter(|&index| index < view.len());
        let last = view.len() - 1;

        let handled = match event.key {
            Key::ArrowUp => {
                let next = current.map_or(0, |index| index.saturating_sub(1));
                Self::move_to_row(next, modifiers, view, selection)
            }
            Key::ArrowDown => {
                let next = current.map_or(0, |index| (index + 1).min(last));
                Self::move_to_row(next, modifiers, view, selection)
            }
            Key::ArrowRight => match current {
                Some(index) if gesture == Gesture::Plain => Self::expand(index, view, store),
                _ => false,
            },
            Key::ArrowLeft => match gesture {
                Gesture::Toggle => {
                    store.collapse_all();
                    selection.clear();
                    true
                }
                Gesture::Plain => match current {
                    Some(index) => Self::collapse_or_ascend(index, view, store, selection),
                    None => false,
                },
                _ => false,
            },
            Key::Space => {
                if gesture == Gesture::Toggle && current.is_some() {
                    selection.toggle_focused(view);
                    true
                } else {
                    false
                }
            }
            Key::Enter => {
                if let Some(focused) = current.and_then(|index| view.indexed(index)) {
                    tracing::debug!(target: targets::KEYBOARD, id = focused.id(), "activate");
                    return Navigation::Activate(focused);
                }
                false
            }
            Key::Other => false,
        };

        if handled {
            tracing::trace!(target: targets::KEYBOARD, key = ?event.key, "key handled");
            Navigation::Handled
        } else {
            Navigation::Ignored
        }
    }

    /// Move the cursor to `index`, updating selection per the modifiers.
    fn move_to_row<T>(
        index: usize,
        modifiers: KeyboardModifiers,
        view: &FlatView<T>,
        selection: &mut SelectionController<T>,
    ) -> bool {
        match modifiers.gesture() {
            Gesture::Plain => {
                selection.update_selection(modifiers, view, Some(index));
                selection.set_anchor(view, index);
            }
            Gesture::Range => {
                selection.update_selection(modifiers, view, Some(index));
                if selection.last_selected().is_none() {
                    selection.set_anchor(view, index);
                }
            }
            Gesture::Toggle => {}
            Gesture::Conflicting => return false,
        }
        selection.set_focus(view, index);
        true
    }

    fn expand<T>(index: usize, view: &FlatView<T>, store: &TreeStore<T>) -> bool {
        let Some(row) = view.get(index).filter(|row| !row.is_up_one_level()) else {
            return false;
        };
        let node = NodeId::Id(row.id.clone());
        if store.is_expanded(&node) || !store.has_children(&node) {
            return false;
        }
        store.update_expanded(&node, true);
        true
    }

    fn collapse_or_ascend<T>(
        index: usize,
        view: &FlatView<T>,
        store: &TreeStore<T>,
        selection: &mut SelectionController<T>,
    ) -> bool {
        let Some(row) = view.get(index).filter(|row| !row.is_up_one_level()) else {
            return false;
        };
        let node = NodeId::Id(row.id.clone());
        if store.is_expanded(&node) {
            store.update_expanded(&node, false);
            return true;
        }

        let Some(parent_id) = store.interface().parent(&row.entry) else {
            return false;
        };
        // Parents always precede their children in the flattened order.
        let Some(parent_index) = (0..index).rev().find(|&i| {
            view.get(i)
                .is_some_and(|candidate| !candidate.is_up_one_level() && candidate.id == parent_id)
        }) else {
            return false;
        };
        Self::move_to_row(parent_index, KeyboardModifiers::NONE, view, selection)
    }
}
