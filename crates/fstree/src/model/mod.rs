//! Tree listing model.
//!
//! The model keeps caller entities in a parent-indexed store and turns the
//! visible part of the hierarchy into a flat, sorted list of rows that a
//! view can render one line at a time.
//!
//! # Core Types
//!
//! - `EntryInterface`: accessors that read ids and parents out of entities
//! - `TreeStore`: the index plus expand state; flattens to a `FlatView`
//! - `StoreComparator`: orders siblings (`NameSort`, `SizeSort`, `DateModifiedSort`)
//! - `Column`: a label, a comparator and a cell renderer
//! - `SelectionController`: selected set, range anchor and keyboard focus
//! - `KeyboardNavigator`: maps key presses onto selection and expand state
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐  flatten   ┌─────────────┐  reconcile  ┌─────────────────────┐
//! │  TreeStore  │───────────>│  FlatView   │────────────>│ SelectionController │
//! │  (entities) │            │   (rows)    │             │ (selected, focus)   │
//! └─────────────┘            └─────────────┘             └─────────────────────┘
//!        ^                          │                              ^
//!        │ expand / collapse        │                              │
//!        │                   ┌──────┴───────────┐                  │
//!        └───────────────────│ KeyboardNavigator│──────────────────┘
//!                            └──────────────────┘
//! ```
//!
//! The store emits `updated` after every change. Whoever owns the view
//! re-flattens and calls `SelectionController::on_content_updated` so anchor
//! and focus follow their rows to the new indices.

mod column;
mod flatten;
mod interface;
mod keyboard;
mod node_id;
mod selection;
mod sort;
mod store;

pub use column::{CellRenderer, Column};
pub use flatten::{DepthEntry, FlatView, IndexedEntry, RowKind};
pub use interface::{
    EntryInterface, HasChildrenAccessor, IdAccessor, ListingEntry, ParentAccessor,
    UpOneLevelAccessor,
};
pub use keyboard::{KeyboardNavigator, Navigation};
pub use node_id::NodeId;
pub use selection::SelectionController;
pub use sort::{DateModifiedSort, NameSort, SizeSort, SortOrder, StoreComparator, natural_cmp};
pub use store::TreeStore;
