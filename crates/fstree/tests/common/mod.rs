//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fstree::model::{EntryInterface, ListingEntry, TreeStore};

/// Route `tracing` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: String,
    pub parent: Option<String>,
    pub is_dir: bool,
    pub size: u64,
    pub last_modified: i64,
}

impl ListingEntry for Entry {
    fn name(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn last_modified(&self) -> i64 {
        self.last_modified
    }
}

/// A directory. Its parent is derived from the path.
pub fn dir(path: &str) -> Entry {
    Entry {
        id: path.to_string(),
        parent: path.rsplit_once('/').map(|(parent, _)| parent.to_string()),
        is_dir: true,
        size: 0,
        last_modified: 0,
    }
}

pub fn file(path: &str, size: u64) -> Entry {
    Entry {
        is_dir: false,
        size,
        ..dir(path)
    }
}

/// A store whose `has_children` comes from the index alone.
pub fn indexed_store() -> TreeStore<Entry> {
    TreeStore::new(EntryInterface::new(
        |e: &Entry| e.id.clone(),
        |e: &Entry| e.parent.clone(),
    ))
}

/// A store that reports directories as containers even before their
/// children are loaded.
pub fn directory_store() -> TreeStore<Entry> {
    TreeStore::new(
        EntryInterface::new(|e: &Entry| e.id.clone(), |e: &Entry| e.parent.clone())
            .with_has_children(|e: &Entry| e.is_dir),
    )
}

/// Counts emissions of the store's `updated` signal.
pub fn count_updates(store: &TreeStore<Entry>) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    store.updated.connect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    count
}

pub fn ids<T>(view: &fstree::model::FlatView<T>) -> Vec<String> {
    view.ids().into_iter().map(str::to_string).collect()
}
