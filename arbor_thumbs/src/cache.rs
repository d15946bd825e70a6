// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Byte-bounded LRU cache.

use std::fmt;

use lru::LruCache;

use crate::{CacheConfig, Thumbnail};

/// Why an entry left the cache (or never entered it).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EvictionReason {
    /// Evicted as least recently used to make room.
    Capacity,
    /// Replaced by a new value under the same key.
    Replaced,
    /// Rejected on insert because it alone exceeds the budget.
    Oversize,
    /// Removed explicitly or by [`ThumbnailCache::clear`].
    Removed,
}

/// Observer for entries leaving the cache.
///
/// Called with every entry the cache lets go of, so backing resources
/// (textures, GPU uploads) can be released deterministically.
pub trait EvictionHook: Send {
    /// An entry left the cache.
    fn on_evict(&mut self, key: &str, thumbnail: &Thumbnail, reason: EvictionReason);
}

impl<F> EvictionHook for F
where
    F: FnMut(&str, &Thumbnail, EvictionReason) + Send,
{
    fn on_evict(&mut self, key: &str, thumbnail: &Thumbnail, reason: EvictionReason) {
        self(key, thumbnail, reason);
    }
}

/// Cache counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Entries stored.
    pub insertions: u64,
    /// Entries evicted for capacity.
    pub evictions: u64,
    /// Entries rejected as larger than the budget.
    pub rejections: u64,
    /// Bytes currently resident.
    pub resident_bytes: usize,
    /// Entries currently resident.
    pub entries: usize,
}

/// Least-recently-used cache of thumbnails bounded by total byte size.
///
/// Every entry costs [`Thumbnail::byte_size`] bytes. Inserting evicts
/// least-recently-used entries until the new one fits, so the resident total
/// never exceeds the budget. Lookups through [`ThumbnailCache::get`] count as
/// use; [`ThumbnailCache::peek`] and [`ThumbnailCache::contains`] do not.
pub struct ThumbnailCache {
    entries: LruCache<String, Thumbnail>,
    budget: usize,
    resident: usize,
    stats: CacheStats,
    hook: Option<Box<dyn EvictionHook>>,
}

impl ThumbnailCache {
    /// Creates an empty cache with the given byte budget.
    pub fn new(budget: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            budget,
            resident: 0,
            stats: CacheStats::default(),
            hook: None,
        }
    }

    /// Creates an empty cache sized by `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.budget())
    }

    /// Installs an eviction hook.
    #[must_use]
    pub fn with_hook(mut self, hook: impl EvictionHook + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Byte budget.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Bytes currently resident.
    pub fn resident_bytes(&self) -> usize {
        self.resident
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counter snapshot.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            resident_bytes: self.resident,
            entries: self.entries.len(),
            ..self.stats
        }
    }

    /// Looks up `key` and marks it most recently used.
    ///
    /// Returns a new handle to the shared pixels.
    pub fn get(&mut self, key: &str) -> Option<Thumbnail> {
        match self.entries.get(key) {
            Some(thumb) => {
                self.stats.hits += 1;
                Some(thumb.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Looks up `key` without touching recency or counters.
    pub fn peek(&self, key: &str) -> Option<&Thumbnail> {
        self.entries.peek(key)
    }

    /// Whether `key` is resident. Does not touch recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Stores `thumbnail` under `key` as the most recently used entry.
    ///
    /// Returns `false` if the thumbnail alone exceeds the budget; it is then
    /// handed to the hook and not stored, and any existing entry is kept.
    pub fn insert(&mut self, key: impl Into<String>, thumbnail: Thumbnail) -> bool {
        let key = key.into();
        let cost = thumbnail.byte_size();
        if cost > self.budget {
            self.stats.rejections += 1;
            tracing::debug!(key = %key, cost, budget = self.budget, "thumbnail exceeds cache budget");
            self.notify(&key, &thumbnail, EvictionReason::Oversize);
            return false;
        }

        if let Some(old) = self.entries.pop(key.as_str()) {
            self.resident -= old.byte_size();
            self.notify(&key, &old, EvictionReason::Replaced);
        }
        self.make_room(cost);

        self.resident += cost;
        self.stats.insertions += 1;
        self.entries.put(key, thumbnail);
        true
    }

    /// Removes `key`, returning its thumbnail.
    pub fn remove(&mut self, key: &str) -> Option<Thumbnail> {
        let thumb = self.entries.pop(key)?;
        self.resident -= thumb.byte_size();
        self.notify(key, &thumb, EvictionReason::Removed);
        Some(thumb)
    }

    /// Changes the budget, evicting as needed to fit under it.
    pub fn set_budget(&mut self, budget: usize) {
        self.budget = budget;
        self.make_room(0);
    }

    /// Removes every entry, least recently used first.
    ///
    /// This is the teardown path: the hook sees every entry, and the cache's
    /// pixel handles are dropped.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        while let Some((key, thumb)) = self.entries.pop_lru() {
            self.resident -= thumb.byte_size();
            self.notify(&key, &thumb, EvictionReason::Removed);
        }
        debug_assert_eq!(self.resident, 0, "resident bytes must drain with the entries");
        self.resident = 0;
        if count > 0 {
            tracing::debug!(count, "cleared thumbnail cache");
        }
    }

    /// Evicts least-recently-used entries until `extra` more bytes fit.
    fn make_room(&mut self, extra: usize) {
        while self.resident + extra > self.budget {
            let Some((key, thumb)) = self.entries.pop_lru() else {
                break;
            };
            self.resident -= thumb.byte_size();
            self.stats.evictions += 1;
            tracing::trace!(key = %key, bytes = thumb.byte_size(), "evicted thumbnail");
            self.notify(&key, &thumb, EvictionReason::Capacity);
        }
    }

    fn notify(&mut self, key: &str, thumb: &Thumbnail, reason: EvictionReason) {
        if let Some(hook) = self.hook.as_mut() {
            hook.on_evict(key, thumb, reason);
        }
    }
}

impl Drop for ThumbnailCache {
    fn drop(&mut self) {
        if self.hook.is_some() {
            self.clear();
        }
    }
}

impl fmt::Debug for ThumbnailCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThumbnailCache")
            .field("entries", &self.entries.len())
            .field("budget", &self.budget)
            .field("resident", &self.resident)
            .field("stats", &self.stats)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{EvictionReason, ThumbnailCache};
    use crate::Thumbnail;

    fn thumb(bytes: usize) -> Thumbnail {
        Thumbnail::from_rgba8(1, (bytes / 4) as u32, vec![0_u8; bytes]).unwrap()
    }

    type Log = Arc<Mutex<Vec<(String, EvictionReason)>>>;

    fn logging_cache(budget: usize) -> (ThumbnailCache, Log) {
        let log: Log = Arc::default();
        let sink = Arc::clone(&log);
        let cache = ThumbnailCache::new(budget).with_hook(
            move |key: &str, _: &Thumbnail, reason: EvictionReason| {
                sink.lock().unwrap().push((key.to_owned(), reason));
            },
        );
        (cache, log)
    }

    #[test]
    fn five_300k_entries_under_1mb_evict_least_recent() {
        let (mut cache, log) = logging_cache(1_000_000);
        cache.insert("a", thumb(300_000));
        cache.insert("b", thumb(300_000));
        cache.insert("c", thumb(300_000));
        assert!(cache.get("a").is_some());

        cache.insert("d", thumb(300_000));
        assert!(cache.resident_bytes() <= 1_000_000);
        assert!(!cache.contains("b"), "b was least recently used");

        cache.insert("e", thumb(300_000));
        assert!(cache.resident_bytes() <= 1_000_000);
        assert_eq!(cache.resident_bytes(), 900_000);
        assert_eq!(cache.keys().collect::<Vec<_>>(), ["e", "d", "a"]);
        assert_eq!(
            *log.lock().unwrap(),
            [
                ("b".to_owned(), EvictionReason::Capacity),
                ("c".to_owned(), EvictionReason::Capacity)
            ]
        );
        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn peek_does_not_refresh_recency() {
        let mut cache = ThumbnailCache::new(8);
        cache.insert("a", thumb(4));
        cache.insert("b", thumb(4));
        assert!(cache.peek("a").is_some());
        cache.insert("c", thumb(4));
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
    }

    #[test]
    fn oversize_entries_are_rejected_and_reported() {
        let (mut cache, log) = logging_cache(100);
        cache.insert("small", thumb(40));
        assert!(!cache.insert("huge", thumb(200)));
        assert!(cache.contains("small"));
        assert_eq!(cache.resident_bytes(), 40);
        assert_eq!(
            *log.lock().unwrap(),
            [("huge".to_owned(), EvictionReason::Oversize)]
        );
        assert_eq!(cache.stats().rejections, 1);
    }

    #[test]
    fn replacing_a_key_reaccounts_bytes() {
        let (mut cache, log) = logging_cache(100);
        cache.insert("a", thumb(40));
        cache.insert("a", thumb(80));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.resident_bytes(), 80);
        assert_eq!(log.lock().unwrap()[0].1, EvictionReason::Replaced);
    }

    #[test]
    fn clear_releases_every_handle() {
        let (mut cache, log) = logging_cache(1000);
        let held = thumb(100);
        cache.insert("a", held.clone());
        cache.insert("b", thumb(100));
        assert_eq!(held.handle_count(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.resident_bytes(), 0);
        assert_eq!(held.handle_count(), 1);
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn dropping_the_cache_reports_remaining_entries() {
        let (mut cache, log) = logging_cache(1000);
        cache.insert("a", thumb(100));
        drop(cache);
        assert_eq!(
            *log.lock().unwrap(),
            [("a".to_owned(), EvictionReason::Removed)]
        );
    }

    #[test]
    fn shrinking_budget_evicts() {
        let mut cache = ThumbnailCache::new(300);
        for key in ["a", "b", "c"] {
            cache.insert(key, thumb(100));
        }
        cache.set_budget(150);
        assert_eq!(cache.keys().collect::<Vec<_>>(), ["c"]);
        assert_eq!(cache.resident_bytes(), 100);
    }

    #[test]
    fn hit_and_miss_counters() {
        let mut cache = ThumbnailCache::new(100);
        cache.insert("a", thumb(4));
        assert!(cache.get("a").is_some());
        assert!(cache.get("z").is_none());
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.insertions), (1, 1, 1));
        assert_eq!(stats.entries, 1);
    }
}
