//! Bucket keys for the parent/child index.

use std::fmt;

/// Identifies a node in the parent/child index.
///
/// `Root` is the synthetic parent of every top-level entity. It is a separate
/// variant rather than a reserved string, so no real id can collide with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    /// The virtual root above all top-level entities.
    Root,
    /// A real entity id.
    Id(String),
}

impl NodeId {
    /// Map an optional parent id (as returned by the parent accessor) to a
    /// bucket key.
    pub fn from_parent(parent: Option<String>) -> Self {
        parent.map_or(Self::Root, Self::Id)
    }

    /// Returns `true` for the virtual root.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// The real id, or `None` for the root.
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Self::Root => None,
            Self::Id(id) => Some(id),
        }
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<Option<&str>> for NodeId {
    fn from(id: Option<&str>) -> Self {
        id.map_or(Self::Root, Self::from)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("<root>"),
            Self::Id(id) => f.write_str(id),
        }
    }
}
