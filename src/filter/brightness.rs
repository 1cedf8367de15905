//! Global brightness with smoothed changes
//!
//! Dial noise below [`BRIGHTNESS_DEADBAND`] is ignored and larger moves
//! fade in over the configured duration.

use embassy_time::{Duration, Instant};

use super::Filter;
use crate::{color::Rgb, logging::debug, math8::scale8, transition::ValueTransition};

/// Smallest brightness change that is applied
pub const BRIGHTNESS_DEADBAND: u8 = 10;

/// Levels at or above this pass through unscaled
const PASS_THROUGH: u8 = 242;

#[derive(Debug, Clone)]
pub struct BrightnessFilter {
    brightness: ValueTransition<u8>,
    /// Last requested level
    requested: u8,
    transition: Duration,
}

impl BrightnessFilter {
    pub const fn new(brightness: u8, transition: Duration) -> Self {
        Self {
            brightness: ValueTransition::new_u8(brightness),
            requested: brightness,
            transition,
        }
    }

    pub const fn current(&self) -> u8 {
        self.brightness.current()
    }

    /// Request a brightness level
    ///
    /// Returns whether the request moved far enough to be applied.
    pub fn set(&mut self, brightness: u8, now: Instant) -> bool {
        if brightness.abs_diff(self.requested) < BRIGHTNESS_DEADBAND {
            return false;
        }
        debug!("brightness {} -> {}", self.requested, brightness);
        self.requested = brightness;
        self.brightness.set(brightness, self.transition, now);
        true
    }

    pub const fn is_transitioning(&self) -> bool {
        self.brightness.is_transitioning()
    }
}

impl Filter for BrightnessFilter {
    fn apply(&mut self, frame: &mut [Rgb]) {
        let current = self.brightness.current();

        if current >= PASS_THROUGH {
            return;
        }

        if current == 0 {
            frame.fill(Rgb { r: 0, g: 0, b: 0 });
            return;
        }

        for pixel in frame.iter_mut() {
            pixel.r = scale8(pixel.r, current);
            pixel.g = scale8(pixel.g, current);
            pixel.b = scale8(pixel.b, current);
        }
    }

    fn tick(&mut self, now: Instant) {
        self.brightness.tick(now);
    }
}
