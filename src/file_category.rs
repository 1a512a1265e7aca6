/// File categorization by extension.
///
/// This module maps file names to category folder names (e.g. "Documents", "Images")
/// through an [`ExtensionMap`]. The built-in table can be overridden by a JSON mapping
/// file; overrides win on key collision.
///
/// # Examples
///
/// ```
/// use foldertidy::file_category::{Category, Classifier, ExtensionMap};
///
/// let classifier = Classifier::new(ExtensionMap::default());
/// assert_eq!(classifier.classify("report.PDF"), Category::Mapped("Documents".to_string()));
/// assert_eq!(classifier.classify("notes"), Category::Unclassified);
/// ```
use crate::config::ConfigError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Folder name used for files whose extension has no mapping.
pub const UNCLASSIFIED: &str = "Unclassified";

const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    ("ai", "Design"),
    ("psd", "Design"),
    ("fig", "Design"),
    ("pdf", "Documents"),
    ("docx", "Documents"),
    ("doc", "Documents"),
    ("csv", "Documents"),
    ("xlsx", "Documents"),
    ("xls", "Documents"),
    ("txt", "Documents"),
    ("pptx", "Documents"),
    ("ppt", "Documents"),
    ("rar", "Compress"),
    ("7zip", "Compress"),
    ("zip", "Compress"),
    ("exe", "Executable"),
    ("png", "Images"),
    ("jpg", "Images"),
    ("jpeg", "Images"),
    ("svg", "Images"),
    ("ttf", "Fonts"),
];

/// The category a file is sorted into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// A category named by the extension map.
    Mapped(String),
    /// No mapping exists for the file's extension.
    Unclassified,
}

impl Category {
    /// Returns the directory name for this category.
    ///
    /// ```
    /// use foldertidy::file_category::Category;
    ///
    /// assert_eq!(Category::Mapped("Images".to_string()).dir_name(), "Images");
    /// assert_eq!(Category::Unclassified.dir_name(), "Unclassified");
    /// ```
    pub fn dir_name(&self) -> &str {
        match self {
            Category::Mapped(name) => name,
            Category::Unclassified => UNCLASSIFIED,
        }
    }

    pub fn is_unclassified(&self) -> bool {
        matches!(self, Category::Unclassified)
    }
}

/// Lower-cased extension (no leading dot) to category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMap {
    entries: HashMap<String, String>,
}

impl ExtensionMap {
    /// Creates an empty map with no mappings at all.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Creates a map holding the built-in defaults.
    pub fn new() -> Self {
        let mut map = Self::empty();
        for (ext, category) in DEFAULT_MAPPINGS {
            map.insert(ext, category);
        }
        map
    }

    /// Adds or replaces a single mapping. The key is lower-cased and a leading `.` dropped.
    pub fn insert(&mut self, ext: &str, category: &str) {
        let key = ext.trim_start_matches('.').to_lowercase();
        self.entries.insert(key, category.to_string());
    }

    /// Merges `overrides` over the current entries; overriding entries win.
    pub fn merge<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (ext, category) in overrides {
            self.insert(ext.as_ref(), category.as_ref());
        }
    }

    /// Builds the default map and merges the JSON object at `path` over it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file is missing,
    /// `ConfigError::IoError` if it cannot be read and `ConfigError::ConfigInvalid`
    /// if it is not a JSON object of strings.
    pub fn load_overrides(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let overrides: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ConfigInvalid(format!("{}: {}", path.display(), e)))?;

        let mut map = Self::new();
        map.merge(overrides);
        Ok(map)
    }

    /// Looks up the category for an extension, case-insensitively.
    pub fn get(&self, ext: &str) -> Option<&str> {
        self.entries.get(&ext.to_lowercase()).map(String::as_str)
    }
}

impl Default for ExtensionMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the lower-cased text after the last `.` of a file name.
///
/// Names without a dot, with a trailing dot, or dot-files like `.bashrc` have no extension.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Maps file names to categories using an immutable [`ExtensionMap`].
#[derive(Debug, Clone)]
pub struct Classifier {
    map: ExtensionMap,
}

impl Classifier {
    pub fn new(map: ExtensionMap) -> Self {
        Self { map }
    }

    /// Determines the category for a file name.
    ///
    /// ```
    /// use foldertidy::file_category::{Category, Classifier, ExtensionMap};
    ///
    /// let classifier = Classifier::new(ExtensionMap::default());
    /// assert_eq!(classifier.classify("setup.exe"), Category::Mapped("Executable".to_string()));
    /// assert_eq!(classifier.classify("data.xyz"), Category::Unclassified);
    /// ```
    pub fn classify(&self, file_name: &str) -> Category {
        extension_of(file_name)
            .and_then(|ext| self.map.get(&ext))
            .map(|category| Category::Mapped(category.to_string()))
            .unwrap_or(Category::Unclassified)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ExtensionMap::default())
    }
}
