// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

/// Absolute upper bound on the cache budget: 10 MiB.
pub const DEFAULT_CEILING_BYTES: usize = 10 * 1024 * 1024;

/// Default share of available memory the cache may use, as a divisor (1/8).
pub const DEFAULT_MEMORY_DIVISOR: usize = 8;

/// Default thumbnail edge length in pixels.
pub const DEFAULT_TARGET_SIZE: u32 = 64;

/// Default cap on the raster a single decode may allocate: 64 MiB.
pub const DEFAULT_MAX_DECODE_BYTES: u64 = 64 * 1024 * 1024;

/// Default quiet period before a load request is acted on.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Sizing and timing for the thumbnail cache and its loader.
///
/// The byte budget is `min(available_memory / memory_divisor, ceiling_bytes)`.
/// Available memory is supplied by the embedder; when it is unknown the
/// ceiling alone applies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Absolute budget ceiling in bytes.
    pub ceiling_bytes: usize,
    /// Divisor applied to available memory.
    pub memory_divisor: usize,
    /// Memory the embedder reports as available to the process, if known.
    pub available_memory: Option<usize>,
    /// Edge length of the square thumbnails, in pixels.
    pub target_size: u32,
    /// Quiet period the loader waits for before decoding.
    pub debounce: Duration,
    /// Largest raster, in bytes, one decode may allocate.
    pub max_decode_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ceiling_bytes: DEFAULT_CEILING_BYTES,
            memory_divisor: DEFAULT_MEMORY_DIVISOR,
            available_memory: None,
            target_size: DEFAULT_TARGET_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            max_decode_bytes: DEFAULT_MAX_DECODE_BYTES,
        }
    }
}

impl CacheConfig {
    /// Sets the budget ceiling.
    #[must_use]
    pub fn with_ceiling_bytes(mut self, ceiling_bytes: usize) -> Self {
        self.ceiling_bytes = ceiling_bytes;
        self
    }

    /// Sets the divisor applied to available memory. Zero is treated as one.
    #[must_use]
    pub fn with_memory_divisor(mut self, memory_divisor: usize) -> Self {
        self.memory_divisor = memory_divisor;
        self
    }

    /// Reports how much memory is available to the process.
    #[must_use]
    pub fn with_available_memory(mut self, bytes: usize) -> Self {
        self.available_memory = Some(bytes);
        self
    }

    /// Sets the thumbnail edge length. Zero is treated as one.
    #[must_use]
    pub fn with_target_size(mut self, target_size: u32) -> Self {
        self.target_size = target_size;
        self
    }

    /// Sets the loader's quiet period.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Sets the per-decode allocation cap.
    #[must_use]
    pub fn with_max_decode_bytes(mut self, max_decode_bytes: u64) -> Self {
        self.max_decode_bytes = max_decode_bytes;
        self
    }

    /// Effective byte budget.
    #[must_use]
    pub fn budget(&self) -> usize {
        match self.available_memory {
            Some(available) => (available / self.memory_divisor.max(1)).min(self.ceiling_bytes),
            None => self.ceiling_bytes,
        }
    }

    /// Effective thumbnail edge length.
    #[must_use]
    pub fn target(&self) -> u32 {
        self.target_size.max(1)
    }
}
