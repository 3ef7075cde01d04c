// crates/coffeemap-core/src/cache.rs

//! Read-through caches for loaded files and resolved name sets.
//!
//! Entries live for as long as the cache value does; nothing is evicted or
//! invalidated, and nothing is shared between processes.

use crate::error::Result;
use crate::index::ReferenceIndex;
use crate::matcher::{resolve, Cutoff, MatchResult};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

fn lock<K, V>(map: &Mutex<HashMap<K, V>>) -> MutexGuard<'_, HashMap<K, V>> {
    // A poisoned map still holds fully inserted entries only.
    map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Path -> parsed content, loaded on first request.
#[derive(Debug)]
pub struct LoadCache<T> {
    entries: Mutex<HashMap<PathBuf, Arc<T>>>,
}

impl<T> Default for LoadCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> LoadCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `path`, or run `loader` and keep its
    /// result. Failed loads are not cached, so the next call retries.
    pub fn get_or_load<F>(&self, path: &Path, loader: F) -> Result<Arc<T>>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        if let Some(hit) = lock(&self.entries).get(path) {
            debug!(path = %path.display(), "load cache hit");
            return Ok(Arc::clone(hit));
        }

        // The lock is not held while loading; a racing loader for the same
        // path just loses the insert below.
        let loaded = Arc::new(loader(path)?);
        let mut entries = lock(&self.entries);
        let kept = Arc::clone(
            entries
                .entry(path.to_path_buf())
                .or_insert_with(|| Arc::clone(&loaded)),
        );
        info!(path = %path.display(), cached = entries.len(), "load cache filled");
        Ok(kept)
    }

    pub fn contains(&self, path: &Path) -> bool {
        lock(&self.entries).contains_key(path)
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

/// Identity of one `resolve` call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResolveKey {
    names: BTreeSet<String>,
    /// Reference names in index order; order decides fuzzy ties.
    reference: Vec<String>,
    cutoff_bits: u64,
}

/// Memo for [`resolve`], keyed by (distinct names, reference names, cutoff).
///
/// Repeated refreshes of an unchanged view hit the memo instead of
/// re-scoring every name.
#[derive(Debug, Default)]
pub struct ResolveCache {
    entries: Mutex<HashMap<ResolveKey, Arc<MatchResult>>>,
}

impl ResolveCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve<'a, I>(&self, source_names: I, index: &ReferenceIndex, cutoff: Cutoff) -> Arc<MatchResult>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: BTreeSet<String> = source_names.into_iter().map(str::to_owned).collect();
        let key = ResolveKey {
            names,
            reference: index.names().to_vec(),
            cutoff_bits: cutoff.value().to_bits(),
        };

        if let Some(hit) = lock(&self.entries).get(&key) {
            debug!(names = key.names.len(), "resolve cache hit");
            return Arc::clone(hit);
        }

        let result = Arc::new(resolve(key.names.iter().map(String::as_str), index, cutoff));
        lock(&self.entries).insert(key, Arc::clone(&result));
        result
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}
