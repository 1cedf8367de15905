//! External control inputs polled once per frame

use crate::mode::{SPEED_MAX, SPEED_MIN};

/// One poll of the physical controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlReading {
    /// Output brightness (0-255)
    pub brightness: u8,
    /// Global speed multiplier, clamped to `[SPEED_MIN, SPEED_MAX]`
    pub speed: f32,
    /// Mode-advance button is held down
    pub advance_pressed: bool,
    /// Power switch is on
    pub power: bool,
}

impl Default for ControlReading {
    fn default() -> Self {
        Self {
            brightness: 255,
            speed: 1.0,
            advance_pressed: false,
            power: true,
        }
    }
}

impl ControlReading {
    /// Speed with out-of-range and NaN readings pulled into range
    pub fn clamped_speed(&self) -> f32 {
        if self.speed.is_nan() {
            return 1.0;
        }
        self.speed.clamp(SPEED_MIN, SPEED_MAX)
    }
}

/// Source of control readings
///
/// Implement this over potentiometers and buttons, or use
/// [`FixedControls`] on builds without any.
pub trait Controls {
    fn read(&mut self) -> ControlReading;
}

/// Controls that never change
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedControls {
    reading: ControlReading,
}

impl FixedControls {
    pub const fn new(brightness: u8, speed: f32) -> Self {
        Self {
            reading: ControlReading {
                brightness,
                speed,
                advance_pressed: false,
                power: true,
            },
        }
    }
}

impl Controls for FixedControls {
    fn read(&mut self) -> ControlReading {
        self.reading
    }
}
