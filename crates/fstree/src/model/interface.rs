//! Accessors the store uses to read caller entities.

use std::fmt;
use std::sync::Arc;

/// Extracts an entity's id.
pub type IdAccessor<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
/// Extracts an entity's parent id (`None` for top-level entities).
pub type ParentAccessor<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;
/// Overrides the "has children" test for an entity.
pub type HasChildrenAccessor<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
/// Produces the synthetic "up one level" entity for a directory.
pub type UpOneLevelAccessor<T> = Arc<dyn Fn(&T) -> T + Send + Sync>;

/// Fields the standard columns display and sort by.
///
/// Only needed for [`NameSort`](super::NameSort), [`SizeSort`](super::SizeSort),
/// [`DateModifiedSort`](super::DateModifiedSort) and the matching
/// [`Column`](super::Column) constructors. Custom columns can use closures
/// over any entity type instead.
pub trait ListingEntry {
    /// Display name.
    fn name(&self) -> &str;

    /// Size in bytes. Ignored for containers.
    fn size(&self) -> u64 {
        0
    }

    /// Last modification time in milliseconds since the Unix epoch.
    fn last_modified(&self) -> i64 {
        0
    }
}

/// How the store reads an opaque entity `T`.
///
/// `id` and `parent` are required. `has_children` lets callers report
/// containers whose children are not loaded yet (a lazily listed directory);
/// without it an entity has children exactly when some indexed entity names it
/// as parent. `up_one_level` enables
/// [`TreeStore::get_up_one_level_entry`](super::TreeStore::get_up_one_level_entry).
///
/// # Example
///
/// ```
/// use fstree::model::EntryInterface;
///
/// struct File {
///     path: String,
///     parent: Option<String>,
///     is_dir: bool,
/// }
///
/// let interface = EntryInterface::new(
///     |f: &File| f.path.clone(),
///     |f: &File| f.parent.clone(),
/// )
/// .with_has_children(|f: &File| f.is_dir);
///
/// assert!(interface.has_has_children());
/// assert!(!interface.has_up_one_level());
/// ```
pub struct EntryInterface<T> {
    id: IdAccessor<T>,
    parent: ParentAccessor<T>,
    has_children: Option<HasChildrenAccessor<T>>,
    up_one_level: Option<UpOneLevelAccessor<T>>,
}

impl<T> EntryInterface<T> {
    /// Create an interface from the two required accessors.
    pub fn new<I, P>(id: I, parent: P) -> Self
    where
        I: Fn(&T) -> String + Send + Sync + 'static,
        P: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            id: Arc::new(id),
            parent: Arc::new(parent),
            has_children: None,
            up_one_level: None,
        }
    }

    /// Install the optional "has children" override.
    pub fn with_has_children<F>(mut self, has_children: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.has_children = Some(Arc::new(has_children));
        self
    }

    /// Install the optional "up one level" factory.
    pub fn with_up_one_level<F>(mut self, up_one_level: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        self.up_one_level = Some(Arc::new(up_one_level));
        self
    }

    pub fn id(&self, entry: &T) -> String {
        (self.id)(entry)
    }

    pub fn parent(&self, entry: &T) -> Option<String> {
        (self.parent)(entry)
    }

    /// The override's answer, or `None` when no override is installed.
    pub fn has_children(&self, entry: &T) -> Option<bool> {
        self.has_children.as_ref().map(|f| f(entry))
    }

    /// The factory's result, or `None` when no factory is installed.
    pub fn up_one_level(&self, entry: &T) -> Option<T> {
        self.up_one_level.as_ref().map(|f| f(entry))
    }

    pub fn has_has_children(&self) -> bool {
        self.has_children.is_some()
    }

    pub fn has_up_one_level(&self) -> bool {
        self.up_one_level.is_some()
    }
}

impl<T> Clone for EntryInterface<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            parent: self.parent.clone(),
            has_children: self.has_children.clone(),
            up_one_level: self.up_one_level.clone(),
        }
    }
}

impl<T> fmt::Debug for EntryInterface<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryInterface")
            .field("has_children", &self.has_children.is_some())
            .field("up_one_level", &self.up_one_level.is_some())
            .finish_non_exhaustive()
    }
}
