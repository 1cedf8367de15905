//! Fireflies blinking against a night sky

use core::f32::consts::PI;

use embassy_time::Duration;
use rand::RngCore;

use super::{Mode, ModeContext};
use crate::{
    color::{BLACK, NIGHT, Rgb, make_color},
    random,
    transition::TransitionCurve,
};

/// Flash color of a bug
pub const BUG_COLOR: Rgb = make_color(0xD0, 0xFF, 0x00);

const STATE_RESTING: u8 = 0;
const STATE_LIT: u8 = 1;
const STATE_DARK: u8 = 2;

const IGNITE: Duration = Duration::from_millis(350);
const GO_DARK: Duration = Duration::from_millis(450);
const TO_NIGHT: Duration = Duration::from_millis(450);
/// Fade into the night sky when the mode starts
pub const ENTER_FADE: Duration = Duration::from_millis(1200);
/// Fade into the night sky when the mode ends
pub const EXIT_FADE: Duration = Duration::from_millis(1000);

/// Period of the dusk/dawn density swing
const DENSITY_PERIOD_MS: f32 = 60_000.0;
const DENSITY_BASE: f32 = 1400.0;
const DENSITY_SWING: f32 = 1000.0;

/// Per-pixel lifecycle: resting, ignite, go dark, settle back to night
#[derive(Debug, Clone)]
pub struct LightningBugsMode;

impl LightningBugsMode {
    pub fn enter<R: RngCore>(ctx: &mut ModeContext<'_, R>) -> Self {
        for light in ctx.lights.iter_mut() {
            light.transition_to(NIGHT, ENTER_FADE, ctx.now);
        }
        Self
    }

    /// One-in-N odds that a resting bug lights up this frame
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn ignition_odds(elapsed: Duration) -> u32 {
        let phase = 2.0 * PI * (elapsed.as_millis() as f32) / DENSITY_PERIOD_MS;
        (DENSITY_BASE + DENSITY_SWING * libm::sinf(phase)).max(1.0) as u32
    }
}

impl Mode for LightningBugsMode {
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        let odds = Self::ignition_odds(ctx.mode_elapsed);
        for light in ctx.lights.iter_mut() {
            if light.is_transitioning() {
                continue;
            }
            match light.mode_state {
                STATE_LIT => {
                    // Through black first, otherwise yellow to blue passes white
                    light.transition_to_with_curve(
                        BLACK,
                        GO_DARK,
                        TransitionCurve::EaseInOut,
                        ctx.now,
                    );
                    light.mode_state = STATE_DARK;
                }
                STATE_DARK => {
                    light.transition_to(NIGHT, TO_NIGHT, ctx.now);
                    light.mode_state = STATE_RESTING;
                }
                _ => {
                    if random::below(ctx.rng, odds) == 0 {
                        light.transition_to(BUG_COLOR, IGNITE, ctx.now);
                        light.mode_state = STATE_LIT;
                    }
                }
            }
        }
    }
}
