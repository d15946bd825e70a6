// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atomic publication of rebuilt indexes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::GridIndex;

/// Holder for the current index that lets readers keep a consistent snapshot.
///
/// Rebuilds happen off to the side; [`SharedIndex::replace`] swaps the new
/// index in with a single pointer store. Readers call
/// [`SharedIndex::snapshot`] and keep using the returned `Arc` for the whole
/// frame, so they never observe a partially built index.
#[derive(Debug)]
pub struct SharedIndex<K> {
    current: RwLock<Arc<GridIndex<K>>>,
    generation: AtomicU64,
}

impl<K> SharedIndex<K> {
    /// Publishes `index` as generation 0.
    pub fn new(index: GridIndex<K>) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
            generation: AtomicU64::new(0),
        }
    }

    /// The current index.
    pub fn snapshot(&self) -> Arc<GridIndex<K>> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Publishes a new index and returns its generation.
    ///
    /// Snapshots taken earlier stay valid and keep pointing at the old index.
    pub fn replace(&self, index: GridIndex<K>) -> u64 {
        let next = Arc::new(index);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation, "published rebuilt index");
        generation
    }

    /// Number of replacements since construction.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
