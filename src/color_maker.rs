//! Ambient colors that drift on their own
//!
//! Each slot fades from its current color toward a random target and
//! draws a fresh target once it gets there.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use rand::RngCore;

use crate::{
    color::{BLACK, NAMED_RAINBOW, Rgb, lerp_colors},
    logging::warn,
    math8::progress8,
};

/// Most ambient colors a mode can ask for
pub const MAX_AMBIENT_COLORS: usize = 32;

/// Fade used when a mode does not pick one
pub const DEFAULT_AMBIENT_FADE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy)]
struct AmbientSlot {
    current: Rgb,
    target: Rgb,
    start: Instant,
    cache: Option<Rgb>,
}

impl AmbientSlot {
    fn color(&mut self, now: Instant, duration: Duration) -> Rgb {
        if let Some(color) = self.cache {
            return color;
        }
        let elapsed = now.saturating_duration_since(self.start);
        let color = lerp_colors(self.current, self.target, progress8(elapsed, duration));
        self.cache = Some(color);
        color
    }
}

/// Bank of slowly drifting colors
#[derive(Debug, Clone)]
pub struct ColorMaker {
    slots: Vec<AmbientSlot, MAX_AMBIENT_COLORS>,
    duration: Duration,
}

impl Default for ColorMaker {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorMaker {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            duration: DEFAULT_AMBIENT_FADE,
        }
    }

    /// Number of prepared slots
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Replace the bank with `count` freshly seeded slots
    ///
    /// Counts above [`MAX_AMBIENT_COLORS`] are clamped.
    pub fn prepare<R: RngCore>(
        &mut self,
        count: usize,
        duration: Duration,
        rng: &mut R,
        now: Instant,
    ) {
        self.slots.clear();
        self.duration = duration.max(Duration::from_millis(1));

        if count > MAX_AMBIENT_COLORS {
            warn!(
                "ambient color count {} clamped to {}",
                count, MAX_AMBIENT_COLORS
            );
        }
        for _ in 0..count.min(MAX_AMBIENT_COLORS) {
            let slot = AmbientSlot {
                current: NAMED_RAINBOW.random_color(rng),
                target: NAMED_RAINBOW.random_color(rng),
                start: now,
                cache: None,
            };
            // Capacity is checked by the loop bound
            let _ = self.slots.push(slot);
        }
    }

    /// Interpolated color of a slot
    ///
    /// Computed once per tick and cached. Reading a slot that was never
    /// prepared logs a warning and yields black.
    pub fn get_color(&mut self, index: usize, now: Instant) -> Rgb {
        let duration = self.duration;
        match self.slots.get_mut(index) {
            Some(slot) => slot.color(now, duration),
            None => {
                warn!(
                    "ambient color {} requested, only {} prepared",
                    index,
                    self.slots.len()
                );
                BLACK
            }
        }
    }

    /// Recycle finished slots and drop cached colors
    pub fn tick<R: RngCore>(&mut self, rng: &mut R, now: Instant) {
        for slot in &mut self.slots {
            if now.saturating_duration_since(slot.start) >= self.duration {
                slot.current = slot.target;
                slot.target = NAMED_RAINBOW.random_color(rng);
                slot.start = now;
            }
            slot.cache = None;
        }
    }
}
