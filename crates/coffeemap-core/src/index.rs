// crates/coffeemap-core/src/index.rs

//! # Reference Index
//!
//! Lookup structure over the region names of one boundary dataset, keyed by
//! [`normalize`](crate::text::normalize)d form. Built once, read-only after.

use crate::text::normalize;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Normalized key -> reference names, plus the raw name list.
///
/// Several reference names may share a key. All of them are kept in the
/// order they were encountered, and lookups return the first one. This is a
/// known source of ambiguity when two regions normalize identically; see
/// [`ReferenceIndex::collisions`].
#[derive(Clone, Debug)]
pub struct ReferenceIndex {
    names: Vec<String>,
    exact: HashSet<String>,
    /// Distinct keys in insertion order.
    keys: Vec<String>,
    /// Key -> positions in `names`, in encounter order.
    by_key: HashMap<String, Vec<usize>>,
}

impl ReferenceIndex {
    /// Build the index from reference names in dataset order.
    ///
    /// Names whose key is empty are still available to exact matching but
    /// never reachable through a key.
    ///
    /// ```rust
    /// use coffeemap_core::index::ReferenceIndex;
    ///
    /// let index = ReferenceIndex::build(["Bolivia", "Côte d'Ivoire"]);
    /// assert_eq!(index.first_for_key("cote d ivoire"), Some("Côte d'Ivoire"));
    /// assert!(index.contains_exact("Bolivia"));
    /// ```
    pub fn build<I, S>(reference_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        let mut exact = HashSet::new();
        let mut keys = Vec::new();
        let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();

        for name in reference_names {
            let name = name.as_ref();

            let pos = names.len();
            names.push(name.to_owned());
            exact.insert(name.to_owned());

            let key = normalize(name);
            if key.is_empty() {
                continue;
            }
            match by_key.get_mut(&key) {
                Some(slots) => slots.push(pos),
                None => {
                    keys.push(key.clone());
                    by_key.insert(key, vec![pos]);
                }
            }
        }

        let index = Self {
            names,
            exact,
            keys,
            by_key,
        };
        for (key, entries) in index.collisions() {
            warn!(
                key,
                kept = entries[0],
                shadowed = ?&entries[1..],
                "reference names share a normalized key; the first one wins"
            );
        }
        index
    }

    /// Reference names in dataset order, including duplicates.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Byte-for-byte membership in the reference name list.
    pub fn contains_exact(&self, raw: &str) -> bool {
        self.exact.contains(raw)
    }

    /// First reference name stored under `key`.
    pub fn first_for_key(&self, key: &str) -> Option<&str> {
        self.by_key
            .get(key)
            .and_then(|slots| slots.first())
            .map(|&pos| self.names[pos].as_str())
    }

    /// All reference names stored under `key`, in encounter order.
    pub fn entries_for_key(&self, key: &str) -> Vec<&str> {
        self.by_key
            .get(key)
            .map(|slots| slots.iter().map(|&pos| self.names[pos].as_str()).collect())
            .unwrap_or_default()
    }

    /// Distinct keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Keys shared by more than one reference name, with every name under it.
    pub fn collisions(&self) -> Vec<(&str, Vec<&str>)> {
        self.keys
            .iter()
            .filter(|key| self.by_key.get(*key).is_some_and(|slots| slots.len() > 1))
            .map(|key| (key.as_str(), self.entries_for_key(key)))
            .collect()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
