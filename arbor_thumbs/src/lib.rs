// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Thumbs: memory-bounded avatar thumbnails.
//!
//! Decoding photos on the render path, or keeping every decoded photo alive,
//! does not scale to large trees. This crate provides:
//! - [`Thumbnail`]: a decoded RGBA8 raster with shared, reference-counted pixels.
//! - [`ThumbnailCache`]: a strict LRU cache bounded by total resident bytes,
//!   with an [`EvictionHook`] for releasing backing resources.
//! - [`decode_thumbnail`]: power-of-two subsampling followed by an exact
//!   resize to a small square presentation size. JPEGs are subsampled while
//!   decoding, and every decode is capped by [`CacheConfig::max_decode_bytes`].
//! - [`ThumbnailLoader`]: a background thread that decodes debounced request
//!   sets into a [`SharedThumbnails`] cache.
//!
//! The budget is `min(available memory / 8, 10 MiB)` by default; see
//! [`CacheConfig`].
//!
//! # Example
//!
//! ```rust
//! use arbor_thumbs::{ThumbnailCache, Thumbnail};
//!
//! let mut cache = ThumbnailCache::new(64 * 64 * 4 * 2);
//! let avatar = || Thumbnail::from_rgba8(64, 64, vec![0_u8; 64 * 64 * 4]).unwrap();
//!
//! cache.insert("ada.png", avatar());
//! cache.insert("byron.png", avatar());
//! cache.get("ada.png");
//! cache.insert("clara.png", avatar());
//!
//! // "byron.png" was least recently used.
//! assert!(!cache.contains("byron.png"));
//! assert!(cache.resident_bytes() <= cache.budget());
//! ```
//!
//! Decode failures are never fatal: the loader logs them at `debug` and the
//! source simply stays absent from the cache.

mod cache;
mod config;
mod decode;
mod error;
mod loader;

pub use cache::{CacheStats, EvictionHook, EvictionReason, ThumbnailCache};
pub use config::{
    CacheConfig, DEFAULT_CEILING_BYTES, DEFAULT_DEBOUNCE, DEFAULT_MAX_DECODE_BYTES,
    DEFAULT_MEMORY_DIVISOR, DEFAULT_TARGET_SIZE,
};
pub use decode::{
    Thumbnail, decode_thumbnail, decode_thumbnail_from_memory, downsample, sample_factor,
};
pub use error::ThumbnailError;
pub use loader::{SharedThumbnails, ThumbnailLoader, lookup, shared_cache};
