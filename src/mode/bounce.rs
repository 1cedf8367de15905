//! A single lit pixel bouncing between the strand ends

use embassy_time::{Duration, Instant};
use rand::RngCore;

use super::{Mode, ModeContext};
use crate::color::{BLACK, RGB_RAINBOW};

const STEP: Duration = Duration::from_millis(30);
const TRAIL_FADE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone)]
pub struct BounceMode {
    position: usize,
    forward: bool,
    next_step: Instant,
}

impl BounceMode {
    pub fn enter<R: RngCore>(ctx: &mut ModeContext<'_, R>) -> Self {
        Self {
            position: ctx.leader_index(),
            forward: !ctx.reversed,
            next_step: ctx.now,
        }
    }

    pub const fn position(&self) -> usize {
        self.position
    }

    fn step(&mut self, last: usize) {
        if last == 0 {
            return;
        }
        if self.forward {
            self.position = (self.position + 1).min(last);
        } else {
            self.position = self.position.saturating_sub(1);
        }
        if self.position == last || self.position == 0 {
            self.forward = self.position == 0;
        }
    }
}

impl Mode for BounceMode {
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        let n = ctx.pixel_count();
        if n == 0 || ctx.now < self.next_step {
            return;
        }
        self.next_step = ctx.now + STEP;

        ctx.lights[self.position].transition_to(BLACK, TRAIL_FADE, ctx.now);
        self.step(n - 1);
        ctx.lights[self.position].set_color(RGB_RAINBOW.random_color(ctx.rng));
    }
}
