//! Color pings that spread and fade
//!
//! Pings drop a palette color on three neighboring pixels. On a slower
//! cadence every idle pixel takes the box blur of its neighborhood,
//! dimmed a little, so blobs spread out and die away.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use rand::RngCore;

use super::{Mode, ModeContext};
use crate::{
    color::{BLACK, NAMED_RAINBOW, Rgb, channel_sum},
    math8::scale8,
    random,
    transition::TransitionCurve,
};

const PING_BUDGET_MS: u64 = 30_000;
const PING_FADE: Duration = Duration::from_millis(250);
const BLUR_INTERVAL: Duration = Duration::from_millis(50);
const BLUR_FADE: Duration = Duration::from_millis(200);
/// Neighbors on each side included in the blur
const BLUR_RADIUS: usize = 1;
/// Sources dimmer than this do not feed the blur
const BLUR_MIN_SUM: u16 = 20;
/// Roughly 0.92
const DECAY: u8 = 235;

#[derive(Debug, Clone)]
pub struct AccumulatorMode<const N: usize> {
    scratch: Vec<Rgb, N>,
    ping_interval: Duration,
    next_ping: Instant,
    next_blur: Instant,
}

impl<const N: usize> AccumulatorMode<N> {
    pub fn enter<R: RngCore>(ctx: &mut ModeContext<'_, R>) -> Self {
        let n = ctx.pixel_count().min(N);
        let mut scratch = Vec::new();
        // n never exceeds the capacity
        let _ = scratch.resize(n, BLACK);
        let pixels = u64::try_from(n.max(1)).unwrap_or(u64::MAX);
        Self {
            scratch,
            ping_interval: Duration::from_millis((PING_BUDGET_MS / pixels).max(1)),
            next_ping: ctx.now,
            next_blur: ctx.now + BLUR_INTERVAL,
        }
    }

    pub const fn ping_interval(&self) -> Duration {
        self.ping_interval
    }

    fn ping<R: RngCore>(ctx: &mut ModeContext<'_, R>) {
        let n = ctx.pixel_count();
        let center = random::index(ctx.rng, n);
        let color = NAMED_RAINBOW.random_color(ctx.rng);
        for offset in 0..=2 * BLUR_RADIUS {
            let index = (center + n + offset - BLUR_RADIUS) % n;
            ctx.lights[index].transition_to_with_curve(
                color,
                PING_FADE,
                TransitionCurve::EaseInOut,
                ctx.now,
            );
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn blur<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        let n = self.scratch.len().min(ctx.pixel_count());
        for i in 0..n {
            let (mut r, mut g, mut b, mut count) = (0u16, 0u16, 0u16, 0u16);
            for offset in 0..=2 * BLUR_RADIUS {
                let source = ctx.lights[(i + n + offset - BLUR_RADIUS) % n].color();
                if channel_sum(source) < BLUR_MIN_SUM {
                    continue;
                }
                r += u16::from(source.r);
                g += u16::from(source.g);
                b += u16::from(source.b);
                count += 1;
            }
            self.scratch[i] = if count == 0 {
                BLACK
            } else {
                Rgb {
                    r: scale8((r / count) as u8, DECAY),
                    g: scale8((g / count) as u8, DECAY),
                    b: scale8((b / count) as u8, DECAY),
                }
            };
        }

        for (light, color) in ctx.lights.iter_mut().zip(self.scratch.iter()) {
            if !light.is_transitioning() {
                light.transition_to(*color, BLUR_FADE, ctx.now);
            }
        }
    }
}

impl<const N: usize> Mode for AccumulatorMode<N> {
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        if ctx.pixel_count() == 0 {
            return;
        }
        if ctx.now >= self.next_ping {
            Self::ping(ctx);
            self.next_ping = ctx.now + self.ping_interval;
        }
        if ctx.now >= self.next_blur {
            self.blur(ctx);
            self.next_blur = ctx.now + BLUR_INTERVAL;
        }
    }
}
