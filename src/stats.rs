//! Per-category move counts for one run.

use crate::file_category::Category;
use std::collections::BTreeMap;

/// Counts files moved (or intended, in a dry run) per category.
///
/// Counters only ever go up. Iteration is in category-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    counts: BTreeMap<String, usize>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one file for `category`.
    pub fn record(&mut self, category: &Category) {
        *self.counts.entry(category.dir_name().to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// One `<category>: <count> files` line per category.
    pub fn report_lines(&self) -> Vec<String> {
        self.iter()
            .map(|(category, count)| format!("{}: {} files", category, count))
            .collect()
    }
}
