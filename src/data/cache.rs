//! Table Cache - memoized reference table loading
//!
//! Each source path is parsed at most once; later calls return the shared
//! table. An entry is only reloaded after `invalidate` or `clear`, so a
//! source that failed to load stays empty until the caller asks again.

use super::table::{load_reference_data, KeyedTable};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory cache of parsed reference tables indexed by source path
#[derive(Default)]
pub struct TableCache {
    tables: RwLock<FxHashMap<PathBuf, Arc<KeyedTable>>>,
    loads: AtomicUsize,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the table for a source, parsing it on first use
    pub fn get_or_load(&self, path: impl AsRef<Path>) -> Arc<KeyedTable> {
        let path = path.as_ref();

        if let Some(table) = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
        {
            return Arc::clone(table);
        }

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished loading while we waited for the lock
        if let Some(table) = tables.get(path) {
            return Arc::clone(table);
        }

        let table = Arc::new(load_reference_data(path));
        self.loads.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Cached {} reference rows from {}", table.len(), path.display());

        tables.insert(path.to_path_buf(), Arc::clone(&table));
        table
    }

    /// Drop one source so the next `get_or_load` re-parses it
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path.as_ref())
            .is_some()
    }

    pub fn clear(&self) {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of parses performed so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Number of cached sources
    pub fn len(&self) -> usize {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
