//! Every idle pixel fading to a random palette color

use embassy_time::Duration;
use rand::RngCore;

use super::{Mode, ModeContext};
use crate::color::NAMED_RAINBOW;

const FADE: Duration = Duration::from_millis(1000);

/// Every idle pixel drifts to a fresh palette color
#[derive(Debug, Clone)]
pub struct BoomResponderMode;

impl Mode for BoomResponderMode {
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        for light in ctx.lights.iter_mut() {
            if !light.is_transitioning() {
                light.transition_to(NAMED_RAINBOW.random_color(ctx.rng), FADE, ctx.now);
            }
        }
    }
}
