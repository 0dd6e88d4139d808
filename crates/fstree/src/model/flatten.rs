//! The flattened, display-ordered view of the visible part of the tree.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Distinguishes real rows from the synthetic "up one level" row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RowKind {
    #[default]
    Entry,
    /// Produced by the `up_one_level` accessor; navigates to the parent
    /// directory when activated.
    UpOneLevel,
}

/// One visible row: an entity together with its indentation depth.
///
/// `depth` counts the ancestors strictly between the flatten origin and the
/// entity, so direct children of the origin are at depth 0.
pub struct DepthEntry<T> {
    pub id: String,
    pub depth: usize,
    pub entry: Arc<T>,
    pub kind: RowKind,
}

impl<T> DepthEntry<T> {
    pub fn new(id: impl Into<String>, depth: usize, entry: Arc<T>) -> Self {
        Self {
            id: id.into(),
            depth,
            entry,
            kind: RowKind::Entry,
        }
    }

    /// Wrap an entity as the synthetic "up one level" row.
    pub fn up_one_level(id: impl Into<String>, entry: Arc<T>) -> Self {
        Self {
            id: id.into(),
            depth: 0,
            entry,
            kind: RowKind::UpOneLevel,
        }
    }

    /// Returns `true` if this row was produced by the `up_one_level` accessor.
    pub fn is_up_one_level(&self) -> bool {
        self.kind == RowKind::UpOneLevel
    }
}

impl<T> Clone for DepthEntry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            depth: self.depth,
            entry: self.entry.clone(),
            kind: self.kind,
        }
    }
}

impl<T> fmt::Debug for DepthEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepthEntry")
            .field("id", &self.id)
            .field("depth", &self.depth)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A row together with its position in a [`FlatView`].
///
/// Selection keeps these for the anchor and the focus; the index is only
/// meaningful for the view it was taken from and is re-derived whenever the
/// view changes.
pub struct IndexedEntry<T> {
    pub index: usize,
    pub entry: DepthEntry<T>,
}

impl<T> IndexedEntry<T> {
    pub fn id(&self) -> &str {
        &self.entry.id
    }
}

impl<T> Clone for IndexedEntry<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            entry: self.entry.clone(),
        }
    }
}

impl<T> fmt::Debug for IndexedEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedEntry")
            .field("index", &self.index)
            .field("id", &self.entry.id)
            .finish()
    }
}

/// Ordered rows plus an id to row index map.
///
/// Both forms are built in the same pass and never drift apart, so a
/// lookup by id always agrees with the row order.
pub struct FlatView<T> {
    rows: Vec<DepthEntry<T>>,
    positions: HashMap<String, usize>,
}

impl<T> FlatView<T> {
    /// An empty view.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Append a row. Returns `false` and leaves the view untouched if the id
    /// is already present.
    pub fn push(&mut self, row: DepthEntry<T>) -> bool {
        if self.positions.contains_key(&row.id) {
            return false;
        }
        self.positions.insert(row.id.clone(), self.rows.len());
        self.rows.push(row);
        true
    }

    /// Insert a row at the top, shifting every other row down by one.
    ///
    /// Returns `false` if the id is already present.
    pub fn prepend(&mut self, row: DepthEntry<T>) -> bool {
        if self.positions.contains_key(&row.id) {
            return false;
        }
        for index in self.positions.values_mut() {
            *index += 1;
        }
        self.positions.insert(row.id.clone(), 0);
        self.rows.insert(0, row);
        true
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DepthEntry<T>> {
        self.rows.get(index)
    }

    /// Row index of `id`, if visible.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// The row at `index` paired with its index.
    pub fn indexed(&self, index: usize) -> Option<IndexedEntry<T>> {
        self.rows.get(index).map(|entry| IndexedEntry {
            index,
            entry: entry.clone(),
        })
    }

    /// The row with `id` paired with its index.
    pub fn indexed_by_id(&self, id: &str) -> Option<IndexedEntry<T>> {
        self.position(id).and_then(|index| self.indexed(index))
    }

    pub fn rows(&self) -> &[DepthEntry<T>] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DepthEntry<T>> {
        self.rows.iter()
    }

    /// Row ids in display order.
    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.id.as_str()).collect()
    }
}

impl<T> Default for FlatView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FlatView<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            positions: self.positions.clone(),
        }
    }
}

impl<T> fmt::Debug for FlatView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a FlatView<T> {
    type Item = &'a DepthEntry<T>;
    type IntoIter = std::slice::Iter<'a, DepthEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> DepthEntry<()> {
        DepthEntry::new(id, 0, Arc::new(()))
    }

    #[test]
    fn test_push_keeps_positions_in_sync() {
        let mut view = FlatView::new();
        assert!(view.push(row("a")));
        assert!(view.push(row("b")));
        assert!(!view.push(row("a")));

        assert_eq!(view.len(), 2);
        assert_eq!(view.position("b"), Some(1));
        assert_eq!(view.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_prepend_shifts_positions() {
        let mut view = FlatView::new();
        view.push(row("a"));
        view.push(row("b"));
        assert!(view.prepend(DepthEntry::up_one_level("..", Arc::new(()))));

        assert_eq!(view.ids(), vec!["..", "a", "b"]);
        assert_eq!(view.position("a"), Some(1));
        assert_eq!(view.position("b"), Some(2));
        assert!(view.get(0).is_some_and(DepthEntry::is_up_one_level));
    }

    #[test]
    fn test_indexed_by_id() {
        let mut view = FlatView::new();
        view.push(row("a"));
        view.push(row("b"));

        let indexed = view.indexed_by_id("b");
        assert_eq!(indexed.as_ref().map(|e| e.index), Some(1));
        assert!(view.indexed_by_id("c").is_none());
        assert!(view.indexed(5).is_none());
    }
}
