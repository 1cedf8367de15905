//! Per-channel white balance

use super::Filter;
use crate::color::Rgb;
use crate::math8::scale8;

/// Multiplicative scaling of each channel (255 = unchanged)
#[derive(Debug, Clone, Copy)]
pub struct ColorCorrection {
    factors: Rgb,
}

impl ColorCorrection {
    pub const fn new(factors: Rgb) -> Self {
        Self { factors }
    }

    pub const fn is_active(self) -> bool {
        self.factors.r != 255 || self.factors.g != 255 || self.factors.b != 255
    }
}

impl Filter for ColorCorrection {
    fn apply(&mut self, frame: &mut [Rgb]) {
        if !self.is_active() {
            return;
        }

        for pixel in frame.iter_mut() {
            pixel.r = scale8(pixel.r, self.factors.r);
            pixel.g = scale8(pixel.g, self.factors.g);
            pixel.b = scale8(pixel.b, self.factors.b);
        }
    }
}
