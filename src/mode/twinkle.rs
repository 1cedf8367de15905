//! Repeating segment whose positions change color two at a time

use embassy_time::Duration;
use rand::RngCore;

use super::{Mode, ModeContext};
use crate::{
    color::{BLACK, ROYGBIV, Rgb, TWINKLE, will_produce_white},
    light::Light,
    random,
};

/// Length of the repeating segment
pub const SEGMENT_LENGTH: usize = 5;

const FADE: Duration = Duration::from_millis(1000);
const CHANGES_PER_ROUND: usize = 2;
const MAX_ATTEMPTS: usize = 16;

#[derive(Debug, Clone)]
pub struct TwinkleMode {
    last_changed: Option<usize>,
}

impl TwinkleMode {
    pub fn enter<R: RngCore>(ctx: &mut ModeContext<'_, R>) -> Self {
        for light in ctx.lights.iter_mut() {
            light.transition_to(ROYGBIV.random_color(ctx.rng), FADE, ctx.now);
        }
        Self { last_changed: None }
    }

    /// Color a segment position is showing or heading to
    fn settled_color(light: &Light) -> Rgb {
        light.target_color().unwrap_or_else(|| light.color())
    }

    fn acceptable(lights: &[Light], segment: usize, span: usize, color: Rgb) -> bool {
        let current = Self::settled_color(&lights[segment]);
        if color == current || will_produce_white(current, color) {
            return false;
        }
        // Never let the whole segment go dark at once
        color != BLACK
            || (0..span)
                .filter(|&i| i != segment)
                .any(|i| Self::settled_color(&lights[i]) != BLACK)
    }
}

impl Mode for TwinkleMode {
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        if ctx.any_transitioning() {
            return;
        }
        let n = ctx.pixel_count();
        let span = SEGMENT_LENGTH.min(n);
        if span == 0 {
            return;
        }

        let mut changed_this_round: Option<usize> = None;
        for _ in 0..CHANGES_PER_ROUND {
            let segment = (0..MAX_ATTEMPTS)
                .map(|_| random::index(ctx.rng, span))
                .find(|s| Some(*s) != self.last_changed && Some(*s) != changed_this_round);
            let Some(segment) = segment else {
                continue;
            };

            let color = (0..MAX_ATTEMPTS)
                .map(|_| TWINKLE.random_color(ctx.rng))
                .find(|c| Self::acceptable(ctx.lights, segment, span, *c));
            let Some(color) = color else {
                continue;
            };

            for light in ctx.lights.iter_mut().skip(segment).step_by(SEGMENT_LENGTH) {
                light.transition_to(color, FADE, ctx.now);
            }
            changed_this_round = Some(segment);
            self.last_changed = Some(segment);
        }
    }
}
