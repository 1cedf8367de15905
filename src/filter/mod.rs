//! Post-processing applied to a frame on its way to the strand

use embassy_time::Instant;

use crate::color::Rgb;

mod brightness;
mod color_correction;
mod dither;

pub use brightness::{BRIGHTNESS_DEADBAND, BrightnessFilter};
pub use color_correction::ColorCorrection;
pub use dither::dither;

pub trait Filter {
    /// Apply the filter to a frame
    fn apply(&mut self, frame: &mut [Rgb]);

    fn tick(&mut self, _now: Instant) {}
}
