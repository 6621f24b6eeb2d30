//! Pointer-driven parallax offsets for decorative layers.

use serde::{Deserialize, Serialize};

/// Offset applied to a decorative layer, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParallaxOffset {
    pub dx: f64,
    pub dy: f64,
}

impl ParallaxOffset {
    /// Scale for a layer that moves slower (or faster) than the pointer.
    pub fn scaled(self, factor: f64) -> ParallaxOffset {
        ParallaxOffset {
            dx: self.dx * factor,
            dy: self.dy * factor,
        }
    }
}

/// Tracks the latest pointer sample and the offset derived from it.
#[derive(Debug, Clone)]
pub struct ParallaxTracker {
    intensity: f64,
    viewport_width: f64,
    viewport_height: f64,
    offset: ParallaxOffset,
}

impl ParallaxTracker {
    pub fn new(intensity: f64) -> Self {
        Self {
            intensity: intensity.abs(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            offset: ParallaxOffset::default(),
        }
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Change intensity. The current offset is reset until the next move.
    pub fn set_intensity(&mut self, intensity: f64) {
        self.intensity = intensity.abs();
        self.offset = ParallaxOffset::default();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Record a pointer sample and return the new offset.
    ///
    /// Each axis stays within `[-intensity / 2, intensity / 2]`; pointer
    /// positions outside the viewport are pinned to its edge and an empty
    /// viewport yields no offset.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> ParallaxOffset {
        self.offset = ParallaxOffset {
            dx: axis_offset(x, self.viewport_width, self.intensity),
            dy: axis_offset(y, self.viewport_height, self.intensity),
        };
        self.offset
    }

    pub fn offset(&self) -> ParallaxOffset {
        self.offset
    }
}

fn axis_offset(position: f64, extent: f64, intensity: f64) -> f64 {
    if extent.is_nan() || extent <= 0.0 || !position.is_finite() {
        return 0.0;
    }
    let ratio = (position / extent).clamp(0.0, 1.0);
    (ratio - 0.5) * intensity
}
