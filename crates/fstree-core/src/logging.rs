//! Tracing conventions for fstree.
//!
//! fstree uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("fstree=debug")
//!         .init();
//! }
//! ```
//!
//! Mutations are logged at `debug`, traversals and signal emission at
//! `trace`.

/// Span names used throughout fstree for tracing.
pub mod span_names {
    /// Flattening a subtree into rows.
    pub const FLATTEN: &str = "fstree::flatten";
    /// Re-deriving selection indices after a content change.
    pub const RECONCILE: &str = "fstree::reconcile";
    /// Interpreting a key press.
    pub const KEY_PRESS: &str = "fstree::key_press";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "fstree_core::signal";
    /// Entity store target.
    pub const STORE: &str = "fstree::store";
    /// Selection controller target.
    pub const SELECTION: &str = "fstree::selection";
    /// Keyboard navigation target.
    pub const KEYBOARD: &str = "fstree::keyboard";
    /// Tree controller target.
    pub const TREE: &str = "fstree::tree";
    /// Performance spans.
    pub const PERF: &str = "fstree::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new(span_names::FLATTEN);
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::STORE,
            targets::SELECTION,
            targets::KEYBOARD,
            targets::TREE,
            targets::PERF,
        ] {
            assert!(target.starts_with("fstree::"));
        }
        assert!(targets::SIGNAL.starts_with("fstree_core::"));
    }
}
