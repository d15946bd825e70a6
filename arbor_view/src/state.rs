// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size, Vec2};

/// Smallest scale any viewport will use, regardless of configured limits.
///
/// Keeps every `1 / scale` finite.
pub const MIN_SCALE: f64 = 1e-3;

/// Inclusive range of permitted scale values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScaleLimits {
    min: f64,
    max: f64,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self { min: 0.2, max: 3.0 }
    }
}

impl ScaleLimits {
    /// Creates limits from two bounds.
    ///
    /// The bounds are normalized so that `min <= max`, and both are raised to
    /// at least [`MIN_SCALE`].
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Self {
            min: min.max(MIN_SCALE),
            max: max.max(MIN_SCALE),
        }
    }

    /// Lower bound.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamps a scale into the range.
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.min;
        }
        scale.clamp(self.min, self.max)
    }
}

/// Pan/zoom state of the tree canvas.
///
/// `scale` maps tree units to pixels; `offset` is a pixel translation applied
/// after scaling. The value is plain data: the embedding UI owns it and hands
/// a copy to each frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewportState {
    /// Uniform zoom factor.
    pub scale: f64,
    /// Pan offset in screen pixels.
    pub offset: Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewportState {
    /// Creates a state with the given scale and offset.
    #[must_use]
    pub const fn new(scale: f64, offset: Vec2) -> Self {
        Self { scale, offset }
    }

    /// Scale guarded against zero, negative, and NaN values.
    #[must_use]
    pub fn effective_scale(&self) -> f64 {
        if self.scale.is_nan() {
            return MIN_SCALE;
        }
        self.scale.max(MIN_SCALE)
    }

    /// Pans by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.offset += delta;
        }
    }

    /// Multiplies the scale by `factor`, clamped into `limits`.
    ///
    /// Returns the factor that was actually applied (`1.0` when the scale is
    /// already at a limit or the factor is not a positive finite number).
    pub fn zoom(&mut self, factor: f64, limits: ScaleLimits) -> f64 {
        if !(factor.is_finite() && factor > 0.0) {
            return 1.0;
        }
        let old = self.effective_scale();
        let new = limits.clamp(old * factor);
        self.scale = new;
        new / old
    }

    /// Zooms about a screen-space anchor so the tree point under it stays put.
    ///
    /// Returns the factor that was actually applied.
    pub fn zoom_about(
        &mut self,
        anchor: Point,
        factor: f64,
        limits: ScaleLimits,
        canvas: Size,
    ) -> f64 {
        let center = canvas.to_vec2() * 0.5;
        // Anchor relative to the scaled origin, in pixels.
        let rel = anchor.to_vec2() - center - self.offset;
        let applied = self.zoom(factor, limits);
        self.offset = anchor.to_vec2() - center - rel * applied;
        applied
    }

    /// Clamps the current scale into `limits`.
    pub fn clamp_scale(&mut self, limits: ScaleLimits) {
        self.scale = limits.clamp(self.scale);
    }
}
