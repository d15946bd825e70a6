// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Why a thumbnail could not be produced.
///
/// None of these are fatal to rendering: callers fall back to a placeholder.
#[derive(Debug)]
pub enum ThumbnailError {
    /// The source does not exist.
    Missing(PathBuf),
    /// The source exists but could not be read.
    Io(io::Error),
    /// The source could not be decoded as an image.
    Decode(image::ImageError),
    /// The decoded image has no pixels.
    Empty,
    /// Decoding would allocate more than the configured limit.
    TooLarge {
        /// Width of the raster that would have been decoded.
        width: u32,
        /// Height of the raster that would have been decoded.
        height: u32,
    },
}

impl fmt::Display for ThumbnailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "image source not found: {}", path.display()),
            Self::Io(err) => write!(f, "failed to read image source: {err}"),
            Self::Decode(err) => write!(f, "failed to decode image: {err}"),
            Self::Empty => f.write_str("image has no pixels"),
            Self::TooLarge { width, height } => {
                write!(f, "image too large to decode: {width}x{height}")
            }
        }
    }
}

impl core::error::Error for ThumbnailError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Missing(_) | Self::Empty | Self::TooLarge { .. } => None,
        }
    }
}

impl From<io::Error> for ThumbnailError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for ThumbnailError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err)
    }
}
