// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Background thumbnail loading.
//!
//! The render path never decodes. It hands the set of sources it would like
//! to show to a [`ThumbnailLoader`], which waits for the request stream to go
//! quiet, then decodes on its own thread and writes results into the shared
//! cache. Later frames pick them up with a plain cache lookup.
//!
//! # Coalescing rules
//!
//! - A request replaces any request still waiting out its quiet period.
//! - A request that arrives while a batch is decoding cancels the rest of the
//!   batch; the new request then waits out its own quiet period.
//! - Sources already resident are skipped.
//! - Sources that failed to decode are remembered and skipped; see
//!   [`ThumbnailLoader::has_failed`].
//! - Entries finished for a superseded request stay in the cache.

use std::io;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use lru::LruCache;

use crate::{CacheConfig, Thumbnail, ThumbnailCache, ThumbnailError, decode_thumbnail};

/// Number of failed sources remembered.
const FAILURE_MEMORY: usize = 256;

type Failures = Arc<Mutex<LruCache<String, ()>>>;

/// Cache shared between the render path and the loader thread.
pub type SharedThumbnails = Arc<Mutex<ThumbnailCache>>;

/// Creates an empty shared cache sized by `config`.
pub fn shared_cache(config: &CacheConfig) -> SharedThumbnails {
    Arc::new(Mutex::new(ThumbnailCache::from_config(config)))
}

/// Looks up `source`, marking it used. Recovers from a poisoned lock.
pub fn lookup(cache: &SharedThumbnails, source: &str) -> Option<Thumbnail> {
    lock(cache).get(source)
}

/// Messages sent to the loader thread.
#[derive(Debug)]
enum LoadMsg {
    Request(Request),
    Shutdown,
}

/// Sources to load, numbered in the order they were requested.
#[derive(Debug, Default)]
struct Request {
    seq: u64,
    sources: Vec<String>,
}

/// Outcome of decoding one batch.
enum BatchEnd {
    Done,
    Superseded(Request),
    Shutdown,
}

/// Debounced background decoder feeding a [`SharedThumbnails`] cache.
///
/// Dropping the loader stops the thread and waits for it to exit.
pub struct ThumbnailLoader {
    sender: mpsc::Sender<LoadMsg>,
    handle: Option<JoinHandle<()>>,
    cache: SharedThumbnails,
    target: u32,
    completed: Arc<AtomicU64>,
    sent: AtomicU64,
    served: Arc<AtomicU64>,
    failures: Failures,
}

impl ThumbnailLoader {
    /// Starts a loader that decodes sources as file paths.
    pub fn spawn(cache: SharedThumbnails, config: CacheConfig) -> io::Result<Self> {
        let max_bytes = config.max_decode_bytes;
        Self::with_decoder(cache, config, move |source: &str, target: u32| {
            decode_thumbnail(source, target, max_bytes)
        })
    }

    /// Starts a loader with a custom decoder.
    ///
    /// The decoder receives the source identifier and the target edge length.
    pub fn with_decoder<D>(
        cache: SharedThumbnails,
        config: CacheConfig,
        decoder: D,
    ) -> io::Result<Self>
    where
        D: Fn(&str, u32) -> Result<Thumbnail, ThumbnailError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<LoadMsg>();
        let completed = Arc::new(AtomicU64::new(0));
        let served = Arc::new(AtomicU64::new(0));
        let capacity = NonZeroUsize::new(FAILURE_MEMORY).unwrap_or(NonZeroUsize::MIN);
        let failures: Failures = Arc::new(Mutex::new(LruCache::new(capacity)));
        let worker = Worker {
            rx,
            cache: Arc::clone(&cache),
            decoder,
            target: config.target(),
            debounce: config.debounce,
            completed: Arc::clone(&completed),
            served: Arc::clone(&served),
            failures: Arc::clone(&failures),
        };

        let handle = thread::Builder::new()
            .name("arbor-thumbs".into())
            .spawn(move || worker.run())?;
        tracing::debug!(
            target_size = config.target(),
            debounce = ?config.debounce,
            "thumbnail loader started"
        );

        Ok(Self {
            sender: tx,
            handle: Some(handle),
            cache,
            target: config.target(),
            completed,
            sent: AtomicU64::new(0),
            served,
            failures,
        })
    }

    /// Replaces the pending request with `sources`.
    ///
    /// Returns `false` if the loader thread has exited.
    pub fn request<I, S>(&self, sources: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = Request {
            seq: self.sent.fetch_add(1, Ordering::AcqRel) + 1,
            sources: sources.into_iter().map(Into::into).collect(),
        };
        self.sender.send(LoadMsg::Request(request)).is_ok()
    }

    /// The cache this loader fills.
    pub fn cache(&self) -> &SharedThumbnails {
        &self.cache
    }

    /// Edge length of the thumbnails this loader produces.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Whether the latest request has been worked through completely.
    ///
    /// Sources still missing from the cache afterwards were either evicted
    /// since or failed to decode.
    pub fn is_idle(&self) -> bool {
        self.served.load(Ordering::Acquire) == self.sent.load(Ordering::Acquire)
    }

    /// Whether `source` failed to decode recently. Such sources are skipped
    /// by later requests until [`ThumbnailLoader::forget_failures`].
    pub fn has_failed(&self, source: &str) -> bool {
        lock(&self.failures).contains(source)
    }

    /// Lets previously failed sources be tried again, for example after the
    /// files behind them changed.
    pub fn forget_failures(&self) {
        lock(&self.failures).clear();
    }

    /// Number of thumbnails decoded and stored so far.
    ///
    /// Changes whenever new entries become available, so callers can use it
    /// to decide when to redraw.
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Stops the loader thread and waits for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.sender.send(LoadMsg::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ThumbnailLoader {
    fn drop(&mut self) {
        self.stop();
    }
}

impl core::fmt::Debug for ThumbnailLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ThumbnailLoader")
            .field("running", &self.handle.is_some())
            .field("completed", &self.completed())
            .finish_non_exhaustive()
    }
}

struct Worker<D> {
    rx: mpsc::Receiver<LoadMsg>,
    cache: SharedThumbnails,
    decoder: D,
    target: u32,
    debounce: Duration,
    completed: Arc<AtomicU64>,
    served: Arc<AtomicU64>,
    failures: Failures,
}

impl<D> Worker<D>
where
    D: Fn(&str, u32) -> Result<Thumbnail, ThumbnailError>,
{
    fn run(self) {
        let mut pending: Option<Request> = None;
        loop {
            let msg = if pending.is_some() {
                match self.rx.recv_timeout(self.debounce) {
                    Ok(msg) => msg,
                    Err(RecvTimeoutError::Timeout) => {
                        let batch = pending.take().unwrap_or_default();
                        match self.load_batch(batch) {
                            BatchEnd::Done => continue,
                            BatchEnd::Superseded(next) => {
                                pending = Some(next);
                                continue;
                            }
                            BatchEnd::Shutdown => break,
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                match self.rx.recv() {
                    Ok(msg) => msg,
                    Err(_) => break,
                }
            };

            match msg {
                LoadMsg::Request(request) => pending = Some(request),
                LoadMsg::Shutdown => break,
            }
        }
        tracing::debug!("thumbnail loader stopped");
    }

    fn load_batch(&self, batch: Request) -> BatchEnd {
        let mut loaded = 0_usize;
        let mut failed = 0_usize;
        for source in &batch.sources {
            match self.rx.try_recv() {
                Ok(LoadMsg::Request(next)) => {
                    tracing::trace!(loaded, failed, "thumbnail batch superseded");
                    return BatchEnd::Superseded(next);
                }
                Ok(LoadMsg::Shutdown) | Err(TryRecvError::Disconnected) => {
                    return BatchEnd::Shutdown;
                }
                Err(TryRecvError::Empty) => {}
            }

            if self.lock().contains(source) || lock(&self.failures).contains(source) {
                continue;
            }
            // Decode without holding the lock.
            match (self.decoder)(source, self.target) {
                Ok(thumb) => {
                    if self.lock().insert(source.as_str(), thumb) {
                        loaded += 1;
                        self.completed.fetch_add(1, Ordering::AcqRel);
                    }
                }
                Err(err) => {
                    failed += 1;
                    lock(&self.failures).put(source.clone(), ());
                    tracing::debug!(source = %source, error = %err, "thumbnail unavailable");
                }
            }
        }
        tracing::trace!(requested = batch.sources.len(), loaded, failed, "thumbnail batch done");
        self.served.store(batch.seq, Ordering::Release);
        BatchEnd::Done
    }

    fn lock(&self) -> MutexGuard<'_, ThumbnailCache> {
        lock(&self.cache)
    }
}

/// Locks `mutex`, recovering from poisoning.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
