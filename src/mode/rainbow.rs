//! Spectrum bands riding the follow leader

use embassy_time::Duration;
use rand::RngCore;

use super::{Mode, ModeContext};
use crate::{color::ROYGBIV, random, transition::TransitionCurve};

const WAVELENGTH: usize = 7;
const FADE: Duration = Duration::from_millis(562);

#[derive(Debug, Clone)]
pub struct RainbowMode {
    color_index: usize,
    last_leader: Option<usize>,
}

impl RainbowMode {
    pub fn new<R: RngCore>(ctx: &mut ModeContext<'_, R>) -> Self {
        Self {
            color_index: random::index(ctx.rng, ROYGBIV.len()),
            last_leader: None,
        }
    }

    /// Palette location of the band at the leader
    pub const fn color_index(&self) -> usize {
        self.color_index
    }
}

impl Mode for RainbowMode {
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        if ctx.pixel_count() == 0 {
            return;
        }
        let leader = ctx.leader_index();
        match self.last_leader.replace(leader) {
            Some(last) if last == leader => return,
            Some(last) => {
                // Shift the spectrum every time the leader laps the strand
                let lapped = if ctx.reversed { leader > last } else { leader < last };
                if lapped {
                    self.color_index = (self.color_index + 1) % ROYGBIV.len();
                }
            }
            None => {}
        }
        self.paint(ctx, leader);
    }
}

impl RainbowMode {
    #[allow(clippy::cast_precision_loss)]
    fn paint<R: RngCore>(&self, ctx: &mut ModeContext<'_, R>, leader: usize) {
        let n = ctx.pixel_count();
        for i in 0..(n / WAVELENGTH).max(1) {
            let index = (leader + i * WAVELENGTH) % n;
            let color = ROYGBIV.get_color((self.color_index + i) as f32);
            ctx.lights[index].transition_to_with_curve(
                color,
                FADE,
                TransitionCurve::EaseInOut,
                ctx.now,
            );
        }
    }
}
