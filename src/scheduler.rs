//! Random mode selection

use heapless::Vec;
use rand::RngCore;

use crate::{
    mode::{MODE_COUNT, ModeId},
    random,
};

/// Modes left out of rotation when no speed dial is fitted
pub const DEFAULT_EXCLUDED: &[ModeId] = &[ModeId::LightningBugs];

/// Which modes random selection may pick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeFilter {
    /// Modes whose speed band contains the current global speed
    SpeedBands,
    /// Every mode except the listed ones
    Excluding(&'static [ModeId]),
}

impl Default for ModeFilter {
    fn default() -> Self {
        Self::Excluding(DEFAULT_EXCLUDED)
    }
}

impl ModeFilter {
    pub fn allows(&self, mode: ModeId, speed: f32) -> bool {
        match self {
            Self::SpeedBands => mode.speed_range().contains(speed),
            Self::Excluding(excluded) => !excluded.contains(&mode),
        }
    }
}

/// Modes `filter` allows at `speed`, in enumeration order
pub fn candidates(filter: &ModeFilter, speed: f32) -> Vec<ModeId, MODE_COUNT> {
    ModeId::ALL
        .into_iter()
        .filter(|mode| filter.allows(*mode, speed))
        .collect()
}

/// Pick a mode uniformly among the allowed ones
///
/// Falls back to every mode when the filter leaves nothing, so rotation
/// always has somewhere to go.
pub fn select_mode<R: RngCore>(filter: &ModeFilter, speed: f32, rng: &mut R) -> ModeId {
    let allowed = candidates(filter, speed);
    if allowed.is_empty() {
        return ModeId::ALL[random::index(rng, MODE_COUNT)];
    }
    allowed[random::index(rng, allowed.len())]
}
