//! Waves running in opposite directions and mixing where they meet
//!
//! Half the wave leaders ride the follow leader forward, the other half
//! mirror it backward. Each leader carries its own ambient color and
//! lights the pixels within half a wavelength of it; overlapping waves
//! blend. The first frames crossfade from whatever the strand showed
//! before the mode started.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use rand::RngCore;

use super::{Mode, ModeContext};
use crate::{
    color::{BLACK, Rgb, lerp_colors},
    logging::warn,
    math8::{avg3, ease_in_out_quad, progress8},
    random,
};

/// Most wave leaders a strand gets
pub const MAX_INTERFERING_WAVES: usize = 16;

const PIXELS_PER_WAVE: usize = 20;
const HALF_WAVE: f32 = 9.0;
const ENTRY_FADE: Duration = Duration::from_millis(3000);

/// Below this average level a pixel counts as dark
const DARK_LEVEL: u8 = 7;
/// Above this average level a pixel gets no extra blend weight
const LIT_LEVEL: u8 = 25;
const BASE_WEIGHT: u16 = 0x7F;

/// Wave leaders for a strand of `pixel_count` pixels
pub(crate) fn wave_count(pixel_count: usize) -> usize {
    (pixel_count / PIXELS_PER_WAVE).clamp(1, MAX_INTERFERING_WAVES)
}

/// Distance between two positions on a ring of `n` pixels
fn ring_distance(a: f32, b: f32, n: f32) -> f32 {
    let d = libm::fmodf(libm::fabsf(a - b), n);
    d.min(n - d)
}

/// Extra weight for pixels that are nearly off, so waves bloom in
#[allow(clippy::cast_possible_truncation)]
fn additional_weight(level: u8) -> u16 {
    if level < DARK_LEVEL {
        BASE_WEIGHT
    } else if level > LIT_LEVEL {
        0
    } else {
        BASE_WEIGHT * u16::from(LIT_LEVEL - level) / u16::from(LIT_LEVEL - DARK_LEVEL)
    }
}

#[derive(Debug, Clone)]
pub struct InterferingWavesMode<const N: usize> {
    /// Per-wave position jitter in pixels
    variation: Vec<f32, MAX_INTERFERING_WAVES>,
    /// Strand colors when the mode started
    entry: Vec<Rgb, N>,
    scratch: Vec<Rgb, N>,
    entered: Instant,
}

impl<const N: usize> InterferingWavesMode<N> {
    pub fn enter<R: RngCore>(ctx: &mut ModeContext<'_, R>) -> Self {
        let n = ctx.pixel_count().min(N);
        let waves = wave_count(n);
        if n / PIXELS_PER_WAVE > MAX_INTERFERING_WAVES {
            warn!(
                "interfering waves clamped to {} for {} pixels",
                MAX_INTERFERING_WAVES, n
            );
        }

        let mut variation = Vec::new();
        for _ in 0..waves {
            #[allow(clippy::cast_precision_loss)]
            let jitter = (random::between(ctx.rng, 0, 80) - 40) as f32 / 10.0;
            // Bounded by wave_count
            let _ = variation.push(jitter);
        }

        let mut entry = Vec::new();
        for light in ctx.lights.iter().take(n) {
            let _ = entry.push(light.color());
        }
        let mut scratch = Vec::new();
        let _ = scratch.resize(n, BLACK);

        Self {
            variation,
            entry,
            scratch,
            entered: ctx.now,
        }
    }

    pub fn wave_count(&self) -> usize {
        self.variation.len()
    }

    #[allow(clippy::cast_precision_loss)]
    fn leaders(&self, follow: f32, n: usize) -> Vec<f32, MAX_INTERFERING_WAVES> {
        let waves = self.variation.len();
        let n_f = n as f32;
        let chunk = n_f / waves as f32;
        let forward = waves.div_ceil(2);

        let mut leaders = Vec::new();
        for (c, jitter) in self.variation.iter().enumerate() {
            let position = if c < forward {
                follow + 2.0 * c as f32 * chunk + jitter
            } else {
                let j = (c - forward) as f32;
                n_f - (follow + 2.0 * j * chunk + chunk) + jitter
            };
            let _ = leaders.push(libm::fmodf(libm::fmodf(position, n_f) + n_f, n_f));
        }
        leaders
    }
}

impl<const N: usize> Mode for InterferingWavesMode<N> {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        let n = self.scratch.len().min(ctx.pixel_count());
        if n == 0 {
            return;
        }

        let leaders = self.leaders(ctx.follow_leader, n);
        let mut colors: Vec<Rgb, MAX_INTERFERING_WAVES> = Vec::new();
        for c in 0..leaders.len() {
            let _ = colors.push(ctx.colors.get_color(c, ctx.now));
        }

        for (i, pixel) in self.scratch.iter_mut().enumerate() {
            let mut mixed = BLACK;
            for (leader, color) in leaders.iter().zip(colors.iter()) {
                let distance = ring_distance(i as f32, *leader, n as f32);
                if distance >= HALF_WAVE {
                    continue;
                }
                let level = avg3(mixed.r, mixed.g, mixed.b);
                let weight = f32::from(BASE_WEIGHT + additional_weight(level));
                let fade = ((1.0 - distance / HALF_WAVE) * weight).min(255.0) as u8;
                mixed = lerp_colors(mixed, *color, ease_in_out_quad(fade));
            }
            *pixel = mixed;
        }

        let since_entry = ctx.now.saturating_duration_since(self.entered);
        let entering = since_entry < ENTRY_FADE;
        let progress = progress8(since_entry, ENTRY_FADE);
        for (i, light) in ctx.lights.iter_mut().take(n).enumerate() {
            let target = self.scratch[i];
            if entering {
                light.set_color(lerp_colors(self.entry[i], target, progress));
            } else {
                light.set_color(target);
            }
        }
    }
}
