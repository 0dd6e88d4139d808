//! The entity store: parent/child index, expand state and flattening.
//!
//! `TreeStore` owns every known entity, indexed by id and grouped into one
//! bucket per parent. Which nodes are expanded lives beside the index, and
//! [`TreeStore::flatten`] turns "index + expand state + comparator" into the
//! ordered rows a view displays.

use parking_lot::RwLock;
use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fstree_core::Signal;
use fstree_core::logging::{PerfSpan, span_names, targets};

use super::flatten::{DepthEntry, FlatView};
use super::interface::EntryInterface;
use super::node_id::NodeId;
use super::sort::{SortOrder, StoreComparator};
use crate::error::{Error, Result};

/// Internal storage, guarded by the store's lock.
struct StoreState<T> {
    /// Every known entity by id.
    entries: HashMap<String, Arc<T>>,
    /// The bucket each indexed id currently lives in.
    parents: HashMap<String, NodeId>,
    /// Parent bucket to children, ordered by child id.
    children: HashMap<NodeId, BTreeMap<String, Arc<T>>>,
    /// Expanded real ids. The root is implicitly expanded.
    expanded: HashSet<String>,
}

impl<T> StoreState<T> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            parents: HashMap::new(),
            children: HashMap::new(),
            expanded: HashSet::new(),
        }
    }

    fn insert(&mut self, id: String, parent: NodeId, entry: Arc<T>) {
        if let Some(previous) = self.parents.get(&id)
            && *previous != parent
        {
            let previous = previous.clone();
            self.detach(&id, &previous);
        }
        self.children
            .entry(parent.clone())
            .or_default()
            .insert(id.clone(), entry.clone());
        self.parents.insert(id.clone(), parent);
        self.entries.insert(id, entry);
    }

    /// Remove `id` from `parent`'s bucket, pruning the bucket (and the
    /// parent's expand flag) once it is empty.
    fn detach(&mut self, id: &str, parent: &NodeId) {
        let Some(bucket) = self.children.get_mut(parent) else {
            return;
        };
        bucket.remove(id);
        if bucket.is_empty() {
            self.children.remove(parent);
            if let NodeId::Id(parent_id) = parent {
                self.expanded.remove(parent_id);
            }
        }
    }

    fn remove(&mut self, id: &str) -> Option<Arc<T>> {
        let entry = self.entries.remove(id)?;
        self.expanded.remove(id);
        if let Some(parent) = self.parents.remove(id) {
            self.detach(id, &parent);
        }
        Some(entry)
    }

    fn bucket_non_empty(&self, node: &NodeId) -> bool {
        self.children.get(node).is_some_and(|bucket| !bucket.is_empty())
    }

    /// Collapse every expanded descendant of `node`. Returns how many flags
    /// were cleared.
    fn collapse_descendants(&mut self, node: &NodeId) -> usize {
        let mut cleared = 0;
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut pending = vec![node.clone()];

        while let Some(current) = pending.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let Some(bucket) = self.children.get(&current) else {
                continue;
            };
            for child_id in bucket.keys() {
                if self.expanded.remove(child_id) {
                    cleared += 1;
                }
                pending.push(NodeId::Id(child_id.clone()));
            }
        }
        cleared
    }
}

/// Entity store with a parent/child index and expand state.
///
/// All methods take `&self`; the store is meant to be shared as
/// `Arc<TreeStore<T>>` between a controller, comparators and listeners.
/// The internal lock is never held while [`updated`](Self::updated)
/// listeners or comparators run, so both may call back into the store.
///
/// Every mutating call that changes something emits `updated` exactly once.
///
/// # Example
///
/// ```
/// use fstree::model::{EntryInterface, NodeId, TreeStore};
///
/// #[derive(Debug)]
/// struct Node {
///     id: &'static str,
///     parent: Option<&'static str>,
/// }
///
/// let store = TreeStore::new(EntryInterface::new(
///     |n: &Node| n.id.to_string(),
///     |n: &Node| n.parent.map(str::to_string),
/// ));
///
/// store.add_entries([
///     Node { id: "docs", parent: None },
///     Node { id: "docs/readme.md", parent: Some("docs") },
/// ]);
///
/// assert_eq!(store.flatten(None, |_, _| std::cmp::Ordering::Equal).len(), 1);
///
/// store.update_expanded(&NodeId::from("docs"), true);
/// assert_eq!(store.flatten(None, |_, _| std::cmp::Ordering::Equal).len(), 2);
/// ```
pub struct TreeStore<T> {
    interface: EntryInterface<T>,
    state: RwLock<StoreState<T>>,
    revision: AtomicU64,

    /// Emitted once after each mutation batch that changed the store.
    pub updated: Signal<()>,
}

impl<T> TreeStore<T> {
    /// Creates an empty store that reads entities through `interface`.
    pub fn new(interface: EntryInterface<T>) -> Self {
        Self {
            interface,
            state: RwLock::new(StoreState::new()),
            revision: AtomicU64::new(0),
            updated: Signal::new(),
        }
    }

    /// The accessor interface the store was built with.
    pub fn interface(&self) -> &EntryInterface<T> {
        &self.interface
    }

    /// Monotonic counter bumped with every `updated` notification.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    fn notify(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
        self.updated.emit(());
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Index a single entity and notify.
    pub fn add_entry(&self, entry: T) {
        self.add_entries(std::iter::once(entry));
    }

    /// Index a batch of entities with a single notification.
    ///
    /// An id that is already present is replaced; if its parent changed it
    /// moves to the new bucket.
    pub fn add_entries<I>(&self, entries: I)
    where
        I: IntoIterator<Item = T>,
    {
        let prepared: Vec<(String, NodeId, Arc<T>)> = entries
            .into_iter()
            .map(|entry| {
                let id = self.interface.id(&entry);
                let parent = NodeId::from_parent(self.interface.parent(&entry));
                (id, parent, Arc::new(entry))
            })
            .collect();
        if prepared.is_empty() {
            return;
        }

        let count = prepared.len();
        {
            let mut state = self.state.write();
            for (id, parent, entry) in prepared {
                state.insert(id, parent, entry);
            }
        }
        tracing::debug!(target: targets::STORE, count, "added entries");
        self.notify();
    }

    /// Remove an entity (looked up by its id).
    ///
    /// Returns the stored entity if it was present. Descendants stay indexed;
    /// remove them explicitly if they should go too.
    pub fn remove_entry(&self, entry: &T) -> Option<Arc<T>> {
        let id = self.interface.id(entry);
        self.remove_id(&id)
    }

    /// Remove the entity with `id`. Unknown ids are a no-op without
    /// notification.
    pub fn remove_id(&self, id: &str) -> Option<Arc<T>> {
        let removed = self.state.write().remove(id);
        if removed.is_some() {
            tracing::debug!(target: targets::STORE, id, "removed entry");
            self.notify();
        }
        removed
    }

    /// Drop every entity and all expand state.
    pub fn clear(&self) {
        let had_entries = {
            let mut state = self.state.write();
            let had_entries = !state.entries.is_empty() || !state.expanded.is_empty();
            *state = StoreState::new();
            had_entries
        };
        if had_entries {
            tracing::debug!(target: targets::STORE, "cleared store");
            self.notify();
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.state.read().entries.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.read().entries.contains_key(id)
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// The id the accessor interface reports for `entry`.
    pub fn id_of(&self, entry: &T) -> String {
        self.interface.id(entry)
    }

    /// The bucket `entry` belongs to.
    pub fn parent_of(&self, entry: &T) -> NodeId {
        NodeId::from_parent(self.interface.parent(entry))
    }

    /// Direct children of `node` in id order (unsorted by any column).
    pub fn children_of(&self, node: &NodeId) -> Vec<Arc<T>> {
        self.state
            .read()
            .children
            .get(node)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `node` has (or claims to have) children.
    ///
    /// The root always does. Otherwise the `has_children` accessor decides
    /// when installed and the entity is known; failing that, a non-empty
    /// bucket does.
    pub fn has_children(&self, node: &NodeId) -> bool {
        let NodeId::Id(id) = node else {
            return true;
        };
        if self.interface.has_has_children()
            && let Some(entry) = self.get(id)
            && let Some(answer) = self.interface.has_children(&entry)
        {
            return answer;
        }
        self.state.read().bucket_non_empty(node)
    }

    /// [`has_children`](Self::has_children) for an entity value.
    pub fn entry_has_children(&self, entry: &T) -> bool {
        if let Some(answer) = self.interface.has_children(entry) {
            return answer;
        }
        let node = NodeId::Id(self.interface.id(entry));
        self.state.read().bucket_non_empty(&node)
    }

    // =========================================================================
    // Expand state
    // =========================================================================

    pub fn is_expanded(&self, node: &NodeId) -> bool {
        match node {
            NodeId::Root => true,
            NodeId::Id(id) => self.state.read().expanded.contains(id),
        }
    }

    /// Ids currently expanded, sorted.
    pub fn expanded_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.read().expanded.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Expand or collapse `node`.
    ///
    /// Expanding only takes effect when the node has children. Collapsing also
    /// collapses every expanded descendant; ancestors are never touched.
    /// Collapsing the root keeps the root itself expanded and collapses
    /// everything below it. Notifies at most once, and only if a flag changed.
    pub fn update_expanded(&self, node: &NodeId, expand: bool) {
        let can_expand = expand && self.has_children(node);

        let changed = {
            let mut state = self.state.write();
            match (node, expand) {
                (NodeId::Root, true) => 0,
                (NodeId::Root, false) => state.collapse_descendants(node),
                (NodeId::Id(id), true) => usize::from(can_expand && state.expanded.insert(id.clone())),
                (NodeId::Id(id), false) => {
                    let target = usize::from(state.expanded.remove(id));
                    target + state.collapse_descendants(node)
                }
            }
        };

        if changed > 0 {
            tracing::debug!(target: targets::STORE, %node, expand, changed, "expand state changed");
            self.notify();
        }
    }

    /// Flip the expand flag of `node`.
    pub fn toggle_expanded(&self, node: &NodeId) {
        self.update_expanded(node, !self.is_expanded(node));
    }

    /// Collapse every node with a single notification.
    pub fn collapse_all(&self) {
        let changed = {
            let mut state = self.state.write();
            let changed = state.expanded.len();
            state.expanded.clear();
            changed
        };
        if changed > 0 {
            tracing::debug!(target: targets::STORE, changed, "collapsed all");
            self.notify();
        }
    }

    // =========================================================================
    // Flattening
    // =========================================================================

    /// Direct children of `node`, stably sorted with `cmp`.
    ///
    /// The lock is released before sorting so the comparator can query the
    /// store.
    fn sorted_children<F>(&self, node: &NodeId, cmp: &mut F) -> Vec<(String, Arc<T>)>
    where
        F: FnMut(&T, &T) -> CmpOrdering,
    {
        let mut children: Vec<(String, Arc<T>)> = match self.state.read().children.get(node) {
            Some(bucket) => bucket
                .iter()
                .map(|(id, entry)| (id.clone(), entry.clone()))
                .collect(),
            None => return Vec::new(),
        };
        children.sort_by(|(_, a), (_, b)| cmp(a, b));
        children
    }

    /// Flatten the visible subtree under `ancestor` (`None` for the root).
    ///
    /// The ancestor's direct children are always listed at depth 0, whether
    /// or not the ancestor itself is expanded. Below that, only expanded
    /// nodes contribute children. Each bucket is stably sorted with `cmp`
    /// before it is visited, giving a depth-first pre-order.
    pub fn flatten<F>(&self, ancestor: Option<&str>, mut cmp: F) -> FlatView<T>
    where
        F: FnMut(&T, &T) -> CmpOrdering,
    {
        let _span = PerfSpan::new(span_names::FLATTEN);
        let origin = NodeId::from(ancestor);
        let mut view = FlatView::new();
        let mut stack = vec![(0usize, self.sorted_children(&origin, &mut cmp).into_iter())];

        while let Some((depth, children)) = stack.last_mut() {
            let depth = *depth;
            let Some((id, entry)) = children.next() else {
                stack.pop();
                continue;
            };

            // A parent cycle among expanded nodes would otherwise revisit ids
            // forever.
            if !view.push(DepthEntry::new(id.clone(), depth, entry)) {
                tracing::warn!(target: targets::STORE, id, "entry reached twice while flattening");
                continue;
            }

            let node = NodeId::Id(id);
            if self.is_expanded(&node) {
                let grandchildren = self.sorted_children(&node, &mut cmp);
                if !grandchildren.is_empty() {
                    stack.push((depth + 1, grandchildren.into_iter()));
                }
            }
        }

        tracing::trace!(target: targets::STORE, ancestor = %origin, rows = view.len(), "flattened");
        view
    }

    /// Flatten using a column comparator and sort order.
    pub fn flatten_sorted(
        &self,
        ancestor: Option<&str>,
        comparator: &dyn StoreComparator<T>,
        order: SortOrder,
    ) -> FlatView<T> {
        self.flatten(ancestor, |a, b| comparator.compare(a, b, order, self))
    }

    // =========================================================================
    // Up one level
    // =========================================================================

    /// Build the synthetic "up one level" row for `entry`.
    ///
    /// Fails with [`Error::UnsupportedOperation`] when the interface has no
    /// `up_one_level` accessor.
    pub fn get_up_one_level_entry(&self, entry: &T) -> Result<DepthEntry<T>> {
        let synthetic = self
            .interface
            .up_one_level(entry)
            .ok_or_else(|| Error::unsupported("get_up_one_level_entry", "up_one_level"))?;
        let id = self.interface.id(&synthetic);
        Ok(DepthEntry::up_one_level(id, Arc::new(synthetic)))
    }

    /// Whether `row` was produced by [`get_up_one_level_entry`](Self::get_up_one_level_entry).
    pub fn is_up_one_level_entry(&self, row: &DepthEntry<T>) -> bool {
        row.is_up_one_level()
    }
}
