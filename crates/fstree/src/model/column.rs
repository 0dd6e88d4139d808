//! Column definitions: a header label, a comparator and a cell renderer.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::interface::ListingEntry;
use super::sort::{DateModifiedSort, NameSort, SizeSort, SortOrder, StoreComparator};
use super::store::TreeStore;
use crate::format::{format_size, format_timestamp};

/// Renders the text of one cell.
pub type CellRenderer<T> = Arc<dyn Fn(&T, &TreeStore<T>) -> String + Send + Sync>;

/// A sortable column of the listing.
pub struct Column<T> {
    label: String,
    comparator: Arc<dyn StoreComparator<T>>,
    cell: CellRenderer<T>,
}

impl<T> Column<T> {
    pub fn new<C, R>(label: impl Into<String>, comparator: C, cell: R) -> Self
    where
        C: StoreComparator<T> + 'static,
        R: Fn(&T, &TreeStore<T>) -> String + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            comparator: Arc::new(comparator),
            cell: Arc::new(cell),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn comparator(&self) -> &dyn StoreComparator<T> {
        self.comparator.as_ref()
    }

    pub fn cell_text(&self, entry: &T, store: &TreeStore<T>) -> String {
        (self.cell)(entry, store)
    }

    pub fn compare(&self, a: &T, b: &T, order: SortOrder, store: &TreeStore<T>) -> Ordering {
        self.comparator.compare(a, b, order, store)
    }
}

impl<T: ListingEntry + 'static> Column<T> {
    /// The "Name" column.
    pub fn name() -> Self {
        Self::new("Name", NameSort, |entry: &T, _: &TreeStore<T>| entry.name().to_string())
    }

    /// The "Size" column. Containers show an empty cell.
    pub fn size() -> Self {
        Self::new("Size", SizeSort, |entry: &T, store: &TreeStore<T>| {
            if store.entry_has_children(entry) {
                String::new()
            } else {
                format_size(entry.size())
            }
        })
    }

    /// The "Date Modified" column, shown in local time.
    pub fn date_modified() -> Self {
        Self::new("Date Modified", DateModifiedSort, |entry: &T, _: &TreeStore<T>| {
            format_timestamp(entry.last_modified())
        })
    }

    /// Name, size and date columns in display order.
    pub fn defaults() -> Vec<Self> {
        vec![Self::name(), Self::size(), Self::date_modified()]
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            comparator: self.comparator.clone(),
            cell: self.cell.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column").field("label", &self.label).finish_non_exhaustive()
    }
}
