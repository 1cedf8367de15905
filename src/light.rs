//! Per-pixel transition state

use embassy_time::{Duration, Instant};

use crate::{
    color::{BLACK, Rgb},
    transition::{TransitionCurve, ValueTransition},
};

/// Shortest transition a light accepts
pub const MIN_TRANSITION: Duration = Duration::from_millis(1);

/// A single pixel
///
/// Idle while no transition is active; the displayed color is then
/// static. While transitioning the color is recomputed on every tick
/// from the original and target colors.
#[derive(Debug, Clone)]
pub struct Light {
    color: ValueTransition<Rgb>,
    /// Scratch value owned by the running mode
    pub mode_state: u8,
}

impl Default for Light {
    fn default() -> Self {
        Self::new(BLACK)
    }
}

impl Light {
    pub const fn new(color: Rgb) -> Self {
        Self {
            color: ValueTransition::new_rgb(color),
            mode_state: 0,
        }
    }

    /// Currently displayed color
    pub const fn color(&self) -> Rgb {
        self.color.current()
    }

    /// Color the active transition started from
    pub const fn original_color(&self) -> Rgb {
        self.color.source()
    }

    /// Color the active transition ends at
    pub const fn target_color(&self) -> Option<Rgb> {
        self.color.target()
    }

    pub const fn transition_start(&self) -> Instant {
        self.color.start_time()
    }

    pub const fn transition_duration(&self) -> Duration {
        self.color.duration()
    }

    pub const fn transition_curve(&self) -> TransitionCurve {
        self.color.curve()
    }

    pub const fn is_transitioning(&self) -> bool {
        self.color.is_transitioning()
    }

    /// Display a color right away
    ///
    /// Retires any transition in progress.
    pub fn set_color(&mut self, color: Rgb) {
        self.color.snap(color);
    }

    /// Start a linear transition from the displayed color
    pub fn transition_to(&mut self, target: Rgb, duration: Duration, now: Instant) {
        self.transition_to_with_curve(target, duration, TransitionCurve::Linear, now);
    }

    /// Start an eased transition from the displayed color
    ///
    /// The previous transition, if any, is dropped. Durations shorter
    /// than [`MIN_TRANSITION`] are raised to it.
    pub fn transition_to_with_curve(
        &mut self,
        target: Rgb,
        duration: Duration,
        curve: TransitionCurve,
        now: Instant,
    ) {
        let duration = duration.max(MIN_TRANSITION);
        self.color.set_with_curve(target, duration, curve, now);
    }

    /// Advance the active transition to `now`
    pub fn tick(&mut self, now: Instant) {
        self.color.tick(now);
    }
}
