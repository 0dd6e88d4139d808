//! Behaviour switches for [`FsTree`](crate::FsTree).
//!
//! Options can be built in code or read from TOML:
//!
//! ```
//! use fstree::TreeOptions;
//!
//! let options = TreeOptions::from_toml_str(r#"
//! expand_on_row_click = false
//! show_up_one_level = true
//! "#)?;
//!
//! assert!(!options.expand_on_row_click);
//! assert!(options.show_up_one_level);
//! assert!(!options.change_directory_on_double_click);
//! # Ok::<(), fstree::Error>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::SortOrder;

/// Behaviour switches for a tree. Missing TOML keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Clicking a container row also toggles its expand state.
    pub expand_on_row_click: bool,

    /// Double-clicking a container row makes it the current directory.
    pub change_directory_on_double_click: bool,

    /// List an "up one level" row above the contents of a non-root
    /// current directory. Needs the `up_one_level` accessor.
    pub show_up_one_level: bool,

    /// Index of the column the listing is first sorted by.
    pub sort_column: usize,

    /// Initial sort direction.
    pub sort_order: SortOrder,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            expand_on_row_click: true,
            change_directory_on_double_click: false,
            show_up_one_level: false,
            sort_column: 0,
            sort_order: SortOrder::Ascending,
        }
    }
}

impl TreeOptions {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::options_io(path, e))?;
        let options = Self::from_toml_str(&source)?;
        tracing::debug!(target: "fstree::tree", path = %path.display(), ?options, "loaded tree options");
        Ok(options)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn with_expand_on_row_click(mut self, enabled: bool) -> Self {
        self.expand_on_row_click = enabled;
        self
    }

    pub fn with_change_directory_on_double_click(mut self, enabled: bool) -> Self {
        self.change_directory_on_double_click = enabled;
        self
    }

    pub fn with_show_up_one_level(mut self, enabled: bool) -> Self {
        self.show_up_one_level = enabled;
        self
    }

    pub fn with_sort(mut self, column: usize, order: SortOrder) -> Self {
        self.sort_column = column;
        self.sort_order = order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = TreeOptions::default();
        assert!(options.expand_on_row_click);
        assert!(!options.change_directory_on_double_click);
        assert!(!options.show_up_one_level);
        assert_eq!(options.sort_column, 0);
        assert_eq!(options.sort_order, SortOrder::Ascending);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(TreeOptions::from_toml_str("").unwrap(), TreeOptions::default());
    }

    #[test]
    fn test_sort_order_from_toml() {
        let options = TreeOptions::from_toml_str("sort_column = 2\nsort_order = \"descending\"").unwrap();
        assert_eq!(options.sort_column, 2);
        assert_eq!(options.sort_order, SortOrder::Descending);
    }

    #[test]
    fn test_invalid_toml() {
        let err = TreeOptions::from_toml_str("expand_on_row_click = \"yes\"").unwrap_err();
        assert!(matches!(err, Error::OptionsParse(_)));
    }

    #[test]
    fn test_toml_string_roundtrip() {
        let options = TreeOptions::default()
            .with_show_up_one_level(true)
            .with_sort(1, SortOrder::Descending);
        let text = options.to_toml_string().unwrap();
        assert_eq!(TreeOptions::from_toml_str(&text).unwrap(), options);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "change_directory_on_double_click = true").unwrap();

        let options = TreeOptions::load(file.path()).unwrap();
        assert!(options.change_directory_on_double_click);
        assert!(options.expand_on_row_click);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = TreeOptions::load(&path).unwrap_err();
        match err {
            Error::OptionsIo { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
