//! Duplicate-content detection over the organized tree.

use crate::hasher::{ContentHash, hash_file};
use crate::walker::Walker;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// A file whose content equals that of a file seen earlier in the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    pub duplicate: PathBuf,
    /// First file seen with this content.
    pub original: PathBuf,
}

impl DuplicatePair {
    pub fn contains(&self, path: &std::path::Path) -> bool {
        self.duplicate == path || self.original == path
    }
}

impl fmt::Display for DuplicatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Duplicate: '{}' and '{}'",
            self.duplicate.display(),
            self.original.display()
        )
    }
}

/// Pairs files sharing a content hash.
pub struct DuplicateDetector {
    walker: Walker,
}

impl DuplicateDetector {
    pub fn new(walker: Walker) -> Self {
        Self { walker }
    }

    /// Hashes every file of the tree and reports each later file against the first one
    /// seen with the same hash.
    ///
    /// Hashing runs on the rayon pool. The hash map is filled afterwards in walk order, so
    /// "first seen" is stable. Files that cannot be read are logged and left out.
    pub fn scan(&self) -> Vec<DuplicatePair> {
        let paths: Vec<PathBuf> = self.walker.files().map(|record| record.path).collect();

        let hashed: Vec<(PathBuf, io::Result<ContentHash>)> = paths
            .into_par_iter()
            .map(|path| {
                let hash = hash_file(&path);
                (path, hash)
            })
            .collect();

        let mut first_seen: HashMap<ContentHash, PathBuf> = HashMap::new();
        let mut pairs = Vec::new();

        for (path, hash) in hashed {
            let hash = match hash {
                Ok(hash) => hash,
                Err(e) => {
                    tracing::warn!("Could not hash '{}': {}", path.display(), e);
                    continue;
                }
            };

            match first_seen.get(&hash) {
                Some(original) => pairs.push(DuplicatePair {
                    duplicate: path,
                    original: original.clone(),
                }),
                None => {
                    first_seen.insert(hash, path);
                }
            }
        }

        tracing::debug!("Duplicate scan found {} pair(s)", pairs.len());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompiledFilters;
    use std::fs;
    use tempfile::TempDir;

    fn scan(root: &std::path::Path) -> Vec<DuplicatePair> {
        DuplicateDetector::new(Walker::new(root, CompiledFilters::default())).scan()
    }

    #[test]
    fn test_identical_files_form_one_pair() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("a.txt"), "same").unwrap();
        fs::write(root.join("b.txt"), "same").unwrap();

        let pairs = scan(root);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].original, root.join("a.txt"));
        assert_eq!(pairs[0].duplicate, root.join("b.txt"));
    }

    #[test]
    fn test_different_files_form_no_pair() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("a.txt"), "one").unwrap();
        fs::write(root.join("b.txt"), "two").unwrap();

        assert!(scan(root).is_empty());
    }

    #[test]
    fn test_three_copies_pair_against_first_seen() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("Documents")).unwrap();
        fs::write(root.join("Documents").join("a.pdf"), "x").unwrap();
        fs::write(root.join("copy1.pdf"), "x").unwrap();
        fs::write(root.join("copy2.pdf"), "x").unwrap();

        let pairs = scan(root);
        let original = root.join("Documents").join("a.pdf");
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.original == original));
    }

    #[test]
    fn test_skipped_backups_are_not_duplicates() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("a.pdf"), "x").unwrap();
        fs::write(root.join("a.pdf.bak"), "x").unwrap();

        assert_eq!(scan(root).len(), 1);

        let walker =
            Walker::new(root, CompiledFilters::default()).skip_path(root.join("a.pdf.bak"));
        assert!(DuplicateDetector::new(walker).scan().is_empty());
    }

    #[test]
    fn test_display_format() {
        let pair = DuplicatePair {
            duplicate: PathBuf::from("/t/b.txt"),
            original: PathBuf::from("/t/a.txt"),
        };
        assert_eq!(pair.to_string(), "Duplicate: '/t/b.txt' and '/t/a.txt'");
        assert!(pair.contains(std::path::Path::new("/t/a.txt")));
    }
}
