//! Independent per-pixel flicker between a few anchor colors

use embassy_time::Duration;
use rand::RngCore;

use super::{Mode, ModeContext};
use crate::{
    color::{BLACK, Rgb, interpolate, make_color},
    random,
};

pub const FIRE_ANCHORS: [Rgb; 3] = [
    make_color(0xFF, 0x3C, 0x00),
    make_color(0xFF, 0x80, 0x00),
    make_color(0xDD, 0x60, 0x02),
];
pub const BLUE_FIRE_ANCHORS: [Rgb; 3] = [
    make_color(0x30, 0x10, 0xFF),
    make_color(0x00, 0xB0, 0xFF),
    make_color(0x01, 0xC0, 0xC0),
];
pub const GREEN_FIRE_ANCHORS: [Rgb; 3] = [
    make_color(0x10, 0xFF, 0x00),
    make_color(0xA0, 0xFF, 0x00),
    make_color(0x0B, 0x66, 0x13),
];
pub const PINK_FIRE_ANCHORS: [Rgb; 3] = [
    make_color(0xFF, 0x00, 0xFF),
    make_color(0xBF, 0x00, 0xFF),
    make_color(0xF8, 0x18, 0x94),
];

const EMBER_FADE: Duration = Duration::from_millis(500);
const FLICKER_FADE: Duration = Duration::from_millis(240);
const SNAP_HOLD: Duration = Duration::from_millis(100);

/// Longest transition fire ever starts
pub const FIRE_MAX_FADE: Duration = EMBER_FADE;

#[derive(Debug, Clone)]
pub struct FireMode {
    anchors: [Rgb; 3],
}

impl FireMode {
    pub const fn new(anchors: [Rgb; 3]) -> Self {
        Self { anchors }
    }

    pub const fn anchors(&self) -> &[Rgb; 3] {
        &self.anchors
    }
}

impl Mode for FireMode {
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        for light in ctx.lights.iter_mut() {
            if light.is_transitioning() {
                continue;
            }
            let choice = random::below(ctx.rng, 100);
            let anchor = self.anchors[random::index(ctx.rng, self.anchors.len())];
            if choice < 10 {
                light.transition_to(BLACK, EMBER_FADE, ctx.now);
            } else if choice < 95 {
                let t = random::byte(ctx.rng);
                let intensity = random::byte(ctx.rng);
                let mixed = interpolate(light.color(), anchor, t, intensity);
                light.transition_to(mixed, FLICKER_FADE, ctx.now);
            } else {
                // Snap, then hold the anchor briefly so the pixel stays busy
                light.set_color(anchor);
                light.transition_to(anchor, SNAP_HOLD, ctx.now);
            }
        }
    }
}
