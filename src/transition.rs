use embassy_time::{Duration, Instant};

use crate::color::{Rgb, lerp_colors};
use crate::math8::{blend8, ease_in_out_quad, ease_in8, ease_out8, progress8};

/// Blends two values of type `T` using a progress value (0-255)
pub type ValueBlender<T> = fn(T, T, u8) -> T;

/// Easing applied to transition progress
///
/// Every curve is monotonic and maps 0 to 0 and 255 to 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionCurve {
    #[default]
    Linear,
    /// Starts slow (`p²`)
    EaseIn,
    /// Ends slow (`1 - (1 - p)²`)
    EaseOut,
    /// Slow at both ends, flat slope at 0 and 255
    EaseInOut,
}

impl TransitionCurve {
    /// Map raw progress through the curve
    pub const fn apply(self, progress: u8) -> u8 {
        match self {
            Self::Linear => progress,
            Self::EaseIn => ease_in8(progress),
            Self::EaseOut => ease_out8(progress),
            Self::EaseInOut => ease_in_out_quad(progress),
        }
    }
}

/// Transition for values of type `T`
#[derive(Debug, Clone)]
pub struct ValueTransition<T: Copy> {
    /// Blender function
    blend: ValueBlender<T>,
    /// Current interpolated value
    current: T,
    /// Value at the start of transition
    source: T,
    /// Target value (None if no transition in progress)
    target: Option<T>,
    /// Easing of the active transition
    curve: TransitionCurve,
    /// Total transition duration
    duration: Duration,
    /// Time at which the transition started
    start_time: Instant,
}

impl<T: Copy> ValueTransition<T> {
    /// Create a new value transition
    pub const fn new(initial: T, blend: ValueBlender<T>) -> Self {
        Self {
            blend,
            current: initial,
            source: initial,
            target: None,
            curve: TransitionCurve::Linear,
            duration: Duration::from_millis(0),
            start_time: Instant::from_millis(0),
        }
    }

    /// Get current value
    pub const fn current(&self) -> T {
        self.current
    }

    /// Value the active transition started from
    pub const fn source(&self) -> T {
        self.source
    }

    /// Value the active transition is heading to
    pub const fn target(&self) -> Option<T> {
        self.target
    }

    /// Duration of the active (or last) transition
    /// Easing of the active transition
    pub const fn curve(&self) -> TransitionCurve {
        self.curve
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    pub const fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Check if a transition is in progress
    pub const fn is_transitioning(&self) -> bool {
        self.target.is_some()
    }

    /// Set value for linear transition
    pub fn set(&mut self, value: T, duration: Duration, start_time: Instant) {
        self.set_with_curve(value, duration, TransitionCurve::Linear, start_time);
    }

    /// Set value for transition with easing
    ///
    /// A zero duration applies the value immediately. Any transition
    /// already in progress is discarded and the new one starts from the
    /// current value.
    pub fn set_with_curve(
        &mut self,
        value: T,
        duration: Duration,
        curve: TransitionCurve,
        start_time: Instant,
    ) {
        self.start_time = start_time;
        self.curve = curve;
        if duration.as_millis() == 0 {
            self.snap(value);
            self.duration = Duration::from_millis(0);
        } else {
            self.source = self.current;
            self.target = Some(value);
            self.duration = duration;
        }
    }

    /// Jump to a value, retiring any active transition
    pub fn snap(&mut self, value: T) {
        self.current = value;
        self.source = value;
        self.target = None;
    }

    /// Update transition state
    ///
    /// Once the elapsed time reaches the duration the value lands exactly
    /// on the target and the transition is retired.
    pub fn tick(&mut self, now: Instant) {
        let Some(target) = self.target else {
            return;
        };

        let elapsed = now.saturating_duration_since(self.start_time);
        if elapsed >= self.duration {
            self.snap(target);
            return;
        }

        let progress = self.curve.apply(progress8(elapsed, self.duration));
        self.current = (self.blend)(self.source, target, progress);
    }
}

impl ValueTransition<u8> {
    /// Create a new u8 transition
    pub const fn new_u8(initial: u8) -> Self {
        Self::new(initial, blend8)
    }
}

impl ValueTransition<Rgb> {
    /// Create a new rgb transition
    pub const fn new_rgb(initial: Rgb) -> Self {
        Self::new(initial, lerp_colors)
    }
}
