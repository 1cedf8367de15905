//! Mode library with compile-time known variants
//!
//! Every mode's scratch state lives in one `ModeSlot` variant, rebuilt
//! from scratch on every mode switch. Nothing is heap allocated.

mod accumulator;
mod bounce;
mod fire;
mod interfering_waves;
mod lightning_bugs;
mod parity;
mod rainbow;
mod responder;
mod twinkle;
mod waves;

pub use accumulator::AccumulatorMode;
pub use bounce::BounceMode;
pub use fire::{
    BLUE_FIRE_ANCHORS, FIRE_ANCHORS, FIRE_MAX_FADE, FireMode, GREEN_FIRE_ANCHORS, PINK_FIRE_ANCHORS,
};
pub use interfering_waves::{InterferingWavesMode, MAX_INTERFERING_WAVES};
pub use lightning_bugs::{BUG_COLOR, EXIT_FADE as LIGHTNING_BUGS_EXIT_FADE, LightningBugsMode};
pub use parity::{PARITY_GROUPS, ParityMode};
pub use rainbow::RainbowMode;
pub use responder::BoomResponderMode;
pub use twinkle::{SEGMENT_LENGTH, TwinkleMode};
pub use waves::WavesMode;

use embassy_time::{Duration, Instant};
use rand::RngCore;

use crate::{color_maker::ColorMaker, light::Light};

const MODE_NAME_WAVES: &str = "waves";
const MODE_NAME_ONE_BIG_WAVE: &str = "one_big_wave";
const MODE_NAME_FIRE: &str = "fire";
const MODE_NAME_BLUE_FIRE: &str = "blue_fire";
const MODE_NAME_GREEN_FIRE: &str = "green_fire";
const MODE_NAME_PINK_FIRE: &str = "pink_fire";
const MODE_NAME_LIGHTNING_BUGS: &str = "lightning_bugs";
const MODE_NAME_PARITY: &str = "parity";
const MODE_NAME_INTERFERING_WAVES: &str = "interfering_waves";
const MODE_NAME_RAINBOW: &str = "rainbow";
const MODE_NAME_ACCUMULATOR: &str = "accumulator";
const MODE_NAME_TWINKLE: &str = "twinkle";
const MODE_NAME_BOOM_RESPONDER: &str = "boom_responder";
const MODE_NAME_BOUNCE: &str = "bounce";

const MODE_ID_WAVES: u8 = 0;
const MODE_ID_ONE_BIG_WAVE: u8 = 1;
const MODE_ID_FIRE: u8 = 2;
const MODE_ID_BLUE_FIRE: u8 = 3;
const MODE_ID_GREEN_FIRE: u8 = 4;
const MODE_ID_PINK_FIRE: u8 = 5;
const MODE_ID_LIGHTNING_BUGS: u8 = 6;
const MODE_ID_PARITY: u8 = 7;
const MODE_ID_INTERFERING_WAVES: u8 = 8;
const MODE_ID_RAINBOW: u8 = 9;
const MODE_ID_ACCUMULATOR: u8 = 10;
const MODE_ID_TWINKLE: u8 = 11;
const MODE_ID_BOOM_RESPONDER: u8 = 12;
const MODE_ID_BOUNCE: u8 = 13;

/// Number of modes
pub const MODE_COUNT: usize = 14;

/// Follow leader speed in pixels per second of scene time
pub const FOLLOW_SPEED: f32 = 8.0;

/// Slowest global speed a control can request
pub const SPEED_MIN: f32 = 0.4;
/// Fastest global speed a control can request
pub const SPEED_MAX: f32 = 3.0;

/// Inclusive band of global speeds a mode looks right at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRange {
    pub low: f32,
    pub high: f32,
}

impl SpeedRange {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, speed: f32) -> bool {
        speed >= self.low && speed <= self.high
    }
}

const SPEED_RANGE_STANDARD: SpeedRange = SpeedRange::new(0.5, SPEED_MAX);
const SPEED_RANGE_FIRE: SpeedRange = SpeedRange::new(0.7, 1.3);
const SPEED_RANGE_BUGS: SpeedRange = SpeedRange::new(SPEED_MIN, 0.6);

/// Known mode ids, in enumeration order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModeId {
    Waves = MODE_ID_WAVES,
    OneBigWave = MODE_ID_ONE_BIG_WAVE,
    Fire = MODE_ID_FIRE,
    BlueFire = MODE_ID_BLUE_FIRE,
    GreenFire = MODE_ID_GREEN_FIRE,
    PinkFire = MODE_ID_PINK_FIRE,
    LightningBugs = MODE_ID_LIGHTNING_BUGS,
    Parity = MODE_ID_PARITY,
    InterferingWaves = MODE_ID_INTERFERING_WAVES,
    Rainbow = MODE_ID_RAINBOW,
    Accumulator = MODE_ID_ACCUMULATOR,
    Twinkle = MODE_ID_TWINKLE,
    BoomResponder = MODE_ID_BOOM_RESPONDER,
    Bounce = MODE_ID_BOUNCE,
}

impl ModeId {
    /// All modes in enumeration order
    pub const ALL: [ModeId; MODE_COUNT] = [
        Self::Waves,
        Self::OneBigWave,
        Self::Fire,
        Self::BlueFire,
        Self::GreenFire,
        Self::PinkFire,
        Self::LightningBugs,
        Self::Parity,
        Self::InterferingWaves,
        Self::Rainbow,
        Self::Accumulator,
        Self::Twinkle,
        Self::BoomResponder,
        Self::Bounce,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// The following mode, wrapping after the last one
    pub fn next(self) -> Self {
        Self::ALL[(usize::from(self.as_raw()) + 1) % MODE_COUNT]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waves => MODE_NAME_WAVES,
            Self::OneBigWave => MODE_NAME_ONE_BIG_WAVE,
            Self::Fire => MODE_NAME_FIRE,
            Self::BlueFire => MODE_NAME_BLUE_FIRE,
            Self::GreenFire => MODE_NAME_GREEN_FIRE,
            Self::PinkFire => MODE_NAME_PINK_FIRE,
            Self::LightningBugs => MODE_NAME_LIGHTNING_BUGS,
            Self::Parity => MODE_NAME_PARITY,
            Self::InterferingWaves => MODE_NAME_INTERFERING_WAVES,
            Self::Rainbow => MODE_NAME_RAINBOW,
            Self::Accumulator => MODE_NAME_ACCUMULATOR,
            Self::Twinkle => MODE_NAME_TWINKLE,
            Self::BoomResponder => MODE_NAME_BOOM_RESPONDER,
            Self::Bounce => MODE_NAME_BOUNCE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    /// Band of global speeds this mode is allowed to run at
    pub const fn speed_range(self) -> SpeedRange {
        match self {
            Self::Fire | Self::BlueFire | Self::GreenFire | Self::PinkFire => SPEED_RANGE_FIRE,
            Self::LightningBugs => SPEED_RANGE_BUGS,
            _ => SPEED_RANGE_STANDARD,
        }
    }

    /// Ambient colors the mode draws from, as (count, fade)
    pub fn ambient_colors(self, pixel_count: usize) -> (usize, Duration) {
        match self {
            Self::Waves | Self::OneBigWave => (1, Duration::from_millis(6000)),
            Self::InterferingWaves => (
                interfering_waves::wave_count(pixel_count),
                Duration::from_millis(5000),
            ),
            _ => (0, crate::color_maker::DEFAULT_AMBIENT_FADE),
        }
    }
}

/// Everything a mode may touch during one frame
pub struct ModeContext<'a, R: RngCore> {
    /// One light per pixel
    pub lights: &'a mut [Light],
    /// Ambient colors prepared for this mode
    pub colors: &'a mut ColorMaker,
    pub rng: &'a mut R,
    /// Scene clock
    pub now: Instant,
    /// Scene clock time since the mode started
    pub mode_elapsed: Duration,
    /// Sweep position in pixels, always within `[0, pixel_count)`
    pub follow_leader: f32,
    /// Sweep runs toward lower indexes
    pub reversed: bool,
}

impl<R: RngCore> ModeContext<'_, R> {
    pub fn pixel_count(&self) -> usize {
        self.lights.len()
    }

    /// Follow leader snapped to a pixel index
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn leader_index(&self) -> usize {
        let n = self.lights.len();
        if n == 0 {
            return 0;
        }
        (self.follow_leader as usize).min(n - 1)
    }

    pub fn any_transitioning(&self) -> bool {
        self.lights.iter().any(Light::is_transitioning)
    }
}

/// Per-frame behavior of a mode
pub trait Mode {
    /// Run one frame of the pattern
    fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>);
}

/// Mode slot - enum holding the active mode and its scratch state
#[derive(Debug, Clone, Default)]
pub enum ModeSlot<const N: usize> {
    /// Sentinel before the first mode is entered; renders nothing
    #[default]
    Off,
    Waves(WavesMode),
    Fire(FireMode),
    LightningBugs(LightningBugsMode),
    Parity(ParityMode),
    InterferingWaves(InterferingWavesMode<N>),
    Rainbow(RainbowMode),
    Accumulator(AccumulatorMode<N>),
    Twinkle(TwinkleMode),
    BoomResponder(BoomResponderMode),
    Bounce(BounceMode),
}

impl<const N: usize> ModeSlot<N> {
    /// Build fresh scratch state for `id` and run its entry effects
    pub fn enter<R: RngCore>(id: ModeId, ctx: &mut ModeContext<'_, R>) -> Self {
        match id {
            ModeId::Waves => Self::Waves(WavesMode::new(ctx)),
            ModeId::OneBigWave => Self::Waves(WavesMode::one_big(ctx.pixel_count())),
            ModeId::Fire => Self::Fire(FireMode::new(FIRE_ANCHORS)),
            ModeId::BlueFire => Self::Fire(FireMode::new(BLUE_FIRE_ANCHORS)),
            ModeId::GreenFire => Self::Fire(FireMode::new(GREEN_FIRE_ANCHORS)),
            ModeId::PinkFire => Self::Fire(FireMode::new(PINK_FIRE_ANCHORS)),
            ModeId::LightningBugs => Self::LightningBugs(LightningBugsMode::enter(ctx)),
            ModeId::Parity => Self::Parity(ParityMode::new()),
            ModeId::InterferingWaves => {
                Self::InterferingWaves(InterferingWavesMode::enter(ctx))
            }
            ModeId::Rainbow => Self::Rainbow(RainbowMode::new(ctx)),
            ModeId::Accumulator => Self::Accumulator(AccumulatorMode::enter(ctx)),
            ModeId::Twinkle => Self::Twinkle(TwinkleMode::enter(ctx)),
            ModeId::BoomResponder => Self::BoomResponder(BoomResponderMode),
            ModeId::Bounce => Self::Bounce(BounceMode::enter(ctx)),
        }
    }

    /// Run one frame of the active mode
    pub fn tick<R: RngCore>(&mut self, ctx: &mut ModeContext<'_, R>) {
        match self {
            Self::Off => {}
            Self::Waves(mode) => mode.tick(ctx),
            Self::Fire(mode) => mode.tick(ctx),
            Self::LightningBugs(mode) => mode.tick(ctx),
            Self::Parity(mode) => mode.tick(ctx),
            Self::InterferingWaves(mode) => mode.tick(ctx),
            Self::Rainbow(mode) => mode.tick(ctx),
            Self::Accumulator(mode) => mode.tick(ctx),
            Self::Twinkle(mode) => mode.tick(ctx),
            Self::BoomResponder(mode) => mode.tick(ctx),
            Self::Bounce(mode) => mode.tick(ctx),
        }
    }

    /// Pixel-sized scratch buffers currently held by the slot
    pub fn scratch_buffers(&self) -> usize {
        match self {
            Self::InterferingWaves(_) => 2,
            Self::Accumulator(_) => 1,
            _ => 0,
        }
    }
}
