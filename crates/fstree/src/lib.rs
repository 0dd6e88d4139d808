//! fstree - a headless engine for hierarchical, file-browser style listings.
//!
//! The crate holds the state behind a tree listing and leaves drawing to the
//! caller: entities are indexed by parent in a [`TreeStore`], the visible
//! part of the tree is flattened into sorted rows, and explorer-style mouse
//! and keyboard selection is applied on top.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fstree::model::{EntryInterface, ListingEntry, TreeStore};
//! use fstree::{FsTree, Key, KeyPressEvent, KeyboardModifiers, TreeOptions};
//!
//! #[derive(Clone)]
//! struct File {
//!     path: String,
//!     parent: Option<String>,
//!     is_dir: bool,
//! }
//!
//! impl ListingEntry for File {
//!     fn name(&self) -> &str {
//!         self.path.rsplit('/').next().unwrap_or(&self.path)
//!     }
//! }
//!
//! let file = |path: &str, parent: Option<&str>, is_dir| File {
//!     path: path.into(),
//!     parent: parent.map(Into::into),
//!     is_dir,
//! };
//!
//! let store = Arc::new(TreeStore::new(
//!     EntryInterface::new(|f: &File| f.path.clone(), |f: &File| f.parent.clone())
//!         .with_has_children(|f: &File| f.is_dir),
//! ));
//! store.add_entries([
//!     file("src", None, true),
//!     file("src/main.rs", Some("src"), false),
//!     file("Cargo.toml", None, false),
//! ]);
//!
//! let mut tree = FsTree::with_default_columns(store, TreeOptions::default());
//! assert_eq!(tree.contents().ids(), vec!["src", "Cargo.toml"]);
//!
//! tree.on_key(&KeyPressEvent::new(Key::ArrowDown, KeyboardModifiers::NONE));
//! tree.on_key(&KeyPressEvent::new(Key::ArrowRight, KeyboardModifiers::NONE));
//! assert_eq!(tree.contents().ids(), vec!["src", "src/main.rs", "Cargo.toml"]);
//! assert_eq!(tree.selection().selected_ids(), vec!["src"]);
//! ```

pub mod debug;
mod error;
mod event;
pub mod format;
pub mod model;
mod options;
mod tree;

pub use error::{Error, Result};
pub use event::{Gesture, Key, KeyPressEvent, KeyboardModifiers};
pub use model::{NodeId, SortOrder, TreeStore};
pub use options::TreeOptions;
pub use tree::FsTree;

pub use fstree_core::{ConnectionGuard, ConnectionId, Signal};
