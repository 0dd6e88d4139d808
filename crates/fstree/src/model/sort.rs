//! Column comparators.
//!
//! A comparator orders two sibling entities for a given [`SortOrder`]. It
//! receives the store so it can ask whether an entity is a container.

use std::cmp::Ordering;
use std::sync::OnceLock;

use fstree_core::logging::targets;
use icu::collator::options::{CollatorOptions, Strength};
use icu::collator::preferences::CollationNumericOrdering;
use icu::collator::{Collator, CollatorBorrowed, CollatorPreferences};
use serde::{Deserialize, Serialize};

use super::interface::ListingEntry;
use super::store::TreeStore;

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
    /// No direction chosen yet. Sorts like [`SortOrder::Ascending`].
    Undefined,
}

impl SortOrder {
    pub fn is_descending(self) -> bool {
        self == Self::Descending
    }

    /// The order a header click switches to.
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending | Self::Undefined => Self::Ascending,
        }
    }

    /// Put `(a, b)` in the order the comparison should see them.
    fn arrange<'a, T>(self, a: &'a T, b: &'a T) -> (&'a T, &'a T) {
        if self.is_descending() { (b, a) } else { (a, b) }
    }
}

/// Orders two sibling entities.
pub trait StoreComparator<T>: Send + Sync {
    fn compare(&self, a: &T, b: &T, order: SortOrder, store: &TreeStore<T>) -> Ordering;
}

impl<T, F> StoreComparator<T> for F
where
    F: Fn(&T, &T, SortOrder, &TreeStore<T>) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &T, b: &T, order: SortOrder, store: &TreeStore<T>) -> Ordering {
        self(a, b, order, store)
    }
}

/// Locale-aware natural name order with containers first.
///
/// Containers sort before leaves in both directions; only the name
/// comparison follows the order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameSort;

impl<T: ListingEntry> StoreComparator<T> for NameSort {
    fn compare(&self, a: &T, b: &T, order: SortOrder, store: &TreeStore<T>) -> Ordering {
        let a_container = store.entry_has_children(a);
        let b_container = store.entry_has_children(b);
        match (a_container, b_container) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => {
                let (first, second) = order.arrange(a, b);
                natural_cmp(first.name(), second.name())
            }
        }
    }
}

/// Byte size order. Containers count as size 0; ties fall back to [`NameSort`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeSort;

impl<T: ListingEntry> StoreComparator<T> for SizeSort {
    fn compare(&self, a: &T, b: &T, order: SortOrder, store: &TreeStore<T>) -> Ordering {
        let size_of = |entry: &T| {
            if store.entry_has_children(entry) {
                0
            } else {
                entry.size()
            }
        };
        let (first, second) = order.arrange(a, b);
        size_of(first)
            .cmp(&size_of(second))
            .then_with(|| NameSort.compare(a, b, order, store))
    }
}

/// Modification time order; ties fall back to [`NameSort`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DateModifiedSort;

impl<T: ListingEntry> StoreComparator<T> for DateModifiedSort {
    fn compare(&self, a: &T, b: &T, order: SortOrder, store: &TreeStore<T>) -> Ordering {
        let (first, second) = order.arrange(a, b);
        first
            .last_modified()
            .cmp(&second.last_modified())
            .then_with(|| NameSort.compare(a, b, order, store))
    }
}

/// Locale-aware name comparison that ignores case and accents and compares
/// digit runs by value, so `file2` sorts before `file10` and `éclair` before
/// `zebra`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    match name_collator() {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

static NAME_COLLATOR: OnceLock<Option<CollatorBorrowed<'static>>> = OnceLock::new();

/// Root-locale collator at primary strength with numeric ordering.
fn name_collator() -> Option<&'static CollatorBorrowed<'static>> {
    NAME_COLLATOR
        .get_or_init(|| {
            let mut prefs = CollatorPreferences::default();
            prefs.numeric_ordering = Some(CollationNumericOrdering::True);
            let mut options = CollatorOptions::default();
            options.strength = Some(Strength::Primary);
            Collator::try_new(prefs, options)
                .inspect_err(|err| {
                    tracing::warn!(target: targets::STORE, %err, "name collator unavailable");
                })
                .ok()
        })
        .as_ref()
}
