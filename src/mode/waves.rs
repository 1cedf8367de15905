//! Evenly spaced waves riding the follow leader
//!
//! The leading edge of every wave fades in to the ambient color and the
//! pixel half a wavelength behind fades out, so each wave is a lit band
//! followed by a dark one.

use embassy_time::Duration;
use rand::RngCore;

use super::{FOLLOW_SPEED, Mode, ModeContext};
use crate::{color::BLACK, random, transition::TransitionCurve};

const SHORT_WAVELENGTH: usize = 20;
const LONG_WAVELENGTH: usize = 50;

#[derive(Debug, Clone)]
pub struct WavesMode {
    wavelength: usize,
    last_leader: Option<usize>,
}

impl WavesMode {
    /// Waves with a randomly picked wavelength
    pub fn new<R: RngCore>(ctx: &mut ModeContext<'_, R>) -> Self {
        let wavelength = if random::below(ctx.rng, 3) == 0 {
            LONG_WAVELENGTH
        } else {
            SHORT_WAVELENGTH
        };
        Self {
            wavelength,
            last_leader: None,
        }
    }

    /// A single wave spanning the whole strand
    pub fn one_big(pixel_count: usize) -> Self {
        Self {
            wavelength: pixel_count.max(1),
            last_leader: None,
        }
    }

    pub const fn wavelength(&self) -> usize {
        self.wavelength
    }

    /// Distance between wave leaders on a strand of `n` pixels
    ///
    /// A wave never spans more than the strand, so short strands still
    /// get a dark trailing band.
    pub fn spacing(&self, n: usize) -> usize {
        self.wavelength.min(n).max(1)
    }

    /// Fade-in time for waves `spacing` apart; the fade-out is three
    /// quarters of it
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn fade_in(spacing: usize) -> Duration {
        let half = (spacing / 2) as f32;
        Duration::from_millis((1000.0 * half / FOLLOW_SPEED) as u64)
    }
}

impl Mode for WavesMode {
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        let n = ctx.pixel_count();
        if n == 0 {
            return;
        }
        let leader = ctx.leader_index();
        if self.last_leader == Some(leader) {
            return;
        }
        self.last_leader = Some(leader);

        let spacing = self.spacing(n);
        let fade_in = Self::fade_in(spacing);
        let fade_out = fade_in * 3 / 4;
        let color = ctx.colors.get_color(0, ctx.now);
        let trail = (spacing / 2).max(1) % n;

        for i in 0..n / spacing {
            let on = (leader + i * spacing) % n;
            let off = (on + n - trail) % n;
            ctx.lights[on].transition_to_with_curve(
                color,
                fade_in,
                TransitionCurve::EaseIn,
                ctx.now,
            );
            if off != on {
                ctx.lights[off].transition_to_with_curve(
                    BLACK,
                    fade_out,
                    TransitionCurve::EaseOut,
                    ctx.now,
                );
            }
        }
    }
}
