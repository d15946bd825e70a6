// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoding and downsampling of avatar images.

use std::io::{self, Cursor};
use std::path::Path;
use std::sync::Arc;
use std::{fmt, fs};

use image::error::{DecodingError, ImageFormatHint};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, Limits, RgbaImage};
use jpeg_decoder::PixelFormat;

use crate::ThumbnailError;

/// A decoded RGBA8 raster.
///
/// Pixels are shared: cloning a thumbnail clones a handle, and the memory is
/// released when the last handle (usually the cache's) is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Thumbnail {
    /// Wraps row-major RGBA8 pixels.
    ///
    /// Returns `None` if `pixels` is not exactly `width × height × 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, pixels: impl Into<Arc<[u8]>>) -> Option<Self> {
        let pixels = pixels.into();
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA8 pixels.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Resident byte cost, `width × height × 4`.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Number of live handles to the pixel buffer.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.pixels)
    }
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Largest power-of-two subsampling factor that keeps both dimensions at or
/// above `target`.
///
/// Images already at or below the target in either dimension get `1`.
pub fn sample_factor(width: u32, height: u32, target: u32) -> u32 {
    let target = target.max(1);
    let mut factor = 1_u32;
    while let Some(next) = factor.checked_mul(2) {
        if width / next < target || height / next < target {
            break;
        }
        factor = next;
    }
    factor
}

/// Largest subsampling a JPEG decoder can apply in the DCT domain.
const MAX_JPEG_FACTOR: u32 = 8;

/// Decodes the image at `path` into a `target × target` thumbnail.
///
/// No decode allocates a raster larger than `max_bytes`; larger sources fail
/// with [`ThumbnailError::TooLarge`].
pub fn decode_thumbnail(
    path: impl AsRef<Path>,
    target: u32,
    max_bytes: u64,
) -> Result<Thumbnail, ThumbnailError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ThumbnailError::Missing(path.to_path_buf()),
        _ => ThumbnailError::Io(err),
    })?;
    decode_thumbnail_from_memory(&bytes, target, max_bytes)
}

/// Decodes an in-memory encoded image into a `target × target` thumbnail.
///
/// JPEGs are subsampled while decoding, by the [`sample_factor`] capped at 8,
/// so the full-resolution raster is never built. Other formats are decoded at
/// full size and then subsampled; their full raster must fit in `max_bytes`.
pub fn decode_thumbnail_from_memory(
    bytes: &[u8],
    target: u32,
    max_bytes: u64,
) -> Result<Thumbnail, ThumbnailError> {
    let target = target.max(1);
    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format() == Some(ImageFormat::Jpeg) {
        return decode_jpeg(bytes, target, max_bytes);
    }

    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    check_raster(width, height, max_bytes)?;
    let mut limits = Limits::default();
    limits.max_alloc = Some(max_bytes);
    reader.limits(limits);
    downsample(reader.decode()?, target)
}

fn decode_jpeg(bytes: &[u8], target: u32, max_bytes: u64) -> Result<Thumbnail, ThumbnailError> {
    let mut decoder = jpeg_decoder::Decoder::new(Cursor::new(bytes));
    decoder.read_info().map_err(jpeg_error)?;
    let info = decoder.info().ok_or(ThumbnailError::Empty)?;
    let (width, height) = (u32::from(info.width), u32::from(info.height));
    if width == 0 || height == 0 {
        return Err(ThumbnailError::Empty);
    }

    let factor = sample_factor(width, height, target).min(MAX_JPEG_FACTOR);
    let (w, h) = (width.div_ceil(factor), height.div_ceil(factor));
    check_raster(w, h, max_bytes)?;
    let (w, h) = decoder
        .scale(
            u16::try_from(w).unwrap_or(u16::MAX),
            u16::try_from(h).unwrap_or(u16::MAX),
        )
        .map_err(jpeg_error)?;
    let pixels = decoder.decode().map_err(jpeg_error)?;

    let rgba = to_rgba(u32::from(w), u32::from(h), info.pixel_format, &pixels)
        .ok_or(ThumbnailError::Empty)?;
    tracing::trace!(width, height, factor, "jpeg decoded at reduced size");
    downsample(DynamicImage::ImageRgba8(rgba), target)
}

/// Fails if a `width × height` RGBA8 raster would exceed `max_bytes`.
fn check_raster(width: u32, height: u32, max_bytes: u64) -> Result<(), ThumbnailError> {
    if u64::from(width) * u64::from(height) * 4 > max_bytes {
        return Err(ThumbnailError::TooLarge { width, height });
    }
    Ok(())
}

fn to_rgba(width: u32, height: u32, format: PixelFormat, pixels: &[u8]) -> Option<RgbaImage> {
    let rgba: Vec<u8> = match format {
        PixelFormat::L8 => pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        // Big-endian samples; keep the high byte.
        PixelFormat::L16 => pixels
            .chunks_exact(2)
            .flat_map(|l| [l[0], l[0], l[0], 255])
            .collect(),
        PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        // Adobe CMYK is stored inverted.
        PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|p| {
                let k = u16::from(p[3]);
                let channel = |c: u8| u8::try_from(u16::from(c) * k / 255).unwrap_or(u8::MAX);
                [channel(p[0]), channel(p[1]), channel(p[2]), 255]
            })
            .collect(),
    };
    RgbaImage::from_raw(width, height, rgba)
}

fn jpeg_error(err: jpeg_decoder::Error) -> ThumbnailError {
    ThumbnailError::Decode(ImageError::Decoding(DecodingError::new(
        ImageFormatHint::Exact(ImageFormat::Jpeg),
        err,
    )))
}

/// Subsamples by [`sample_factor`], then resizes exactly to `target × target`.
pub fn downsample(image: DynamicImage, target: u32) -> Result<Thumbnail, ThumbnailError> {
    let target = target.max(1);
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ThumbnailError::Empty);
    }

    let factor = sample_factor(width, height, target);
    let image = if factor > 1 {
        image.resize_exact(width / factor, height / factor, FilterType::Nearest)
    } else {
        image
    };
    let rgba = image
        .resize_exact(target, target, FilterType::Triangle)
        .to_rgba8();
    let (w, h) = rgba.dimensions();
    Thumbnail::from_rgba8(w, h, rgba.into_raw()).ok_or(ThumbnailError::Empty)
}
