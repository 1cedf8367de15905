//! Interleaved pixel groups changing color together

use embassy_time::Duration;
use heapless::Vec;
use rand::RngCore;

use super::{Mode, ModeContext};
use crate::{
    color::{NAMED_RAINBOW, Rgb, will_produce_white},
    light::Light,
    logging::debug,
    random,
};

/// Number of interleaved groups
pub const PARITY_GROUPS: usize = 2;

const FADE: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Default)]
pub struct ParityMode;

impl ParityMode {
    pub const fn new() -> Self {
        Self
    }

    /// Random palette color for a group
    ///
    /// The color must differ from the colors already taken and must not
    /// wash out to white against any idle pixel of the group. Candidates
    /// are scanned from a random offset so every palette entry is tried
    /// once.
    fn pick<R: RngCore>(
        rng: &mut R,
        lights: &[Light],
        group: usize,
        taken: &[Rgb],
    ) -> Option<Rgb> {
        let offset = random::index(rng, NAMED_RAINBOW.len());
        (0..NAMED_RAINBOW.len())
            .map(|i| NAMED_RAINBOW.entry(offset + i))
            .find(|candidate| {
                !taken.contains(candidate)
                    && lights
                        .iter()
                        .skip(group)
                        .step_by(PARITY_GROUPS)
                        .filter(|light| !light.is_transitioning())
                        .all(|light| !will_produce_white(light.color(), *candidate))
            })
    }
}

impl Mode for ParityMode {
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        match ctx.lights.first() {
            Some(light) if !light.is_transitioning() => {}
            _ => return,
        }

        let mut taken: Vec<Rgb, PARITY_GROUPS> = Vec::new();
        for group in 0..PARITY_GROUPS {
            let Some(color) = Self::pick(ctx.rng, ctx.lights, group, &taken) else {
                debug!("parity group {} has no safe color this round", group);
                continue;
            };
            // One push per group, capacity matches
            let _ = taken.push(color);
            for light in ctx.lights.iter_mut().skip(group).step_by(PARITY_GROUPS) {
                if !light.is_transitioning() {
                    light.transition_to(color, FADE, ctx.now);
                }
            }
        }
    }
}
