//! Scene: the light array, the active mode and the mode scheduler
//!
//! A driving loop calls [`Scene::tick`] once per frame. Each tick
//! advances the scene clock, steps every light transition, moves the
//! follow leader, refreshes ambient colors, runs the active mode,
//! renders the strand, and then gives the scheduler a chance to rotate
//! modes or react to the controls.
//!
//! The scene clock runs at the global speed: a tick that took 10 ms of
//! real time at speed 2.0 moves the scene clock 20 ms. Lights, ambient
//! colors and mode cadences all run on the scene clock. Mode rotation
//! runs on real time.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use rand::RngCore;

use crate::{
    OutputDriver,
    color::{BLACK, NIGHT, Rgb},
    color_maker::ColorMaker,
    controls::{ControlReading, Controls},
    error::{SceneError, SceneResult},
    light::Light,
    logging::{debug, info},
    mode::{FOLLOW_SPEED, LIGHTNING_BUGS_EXIT_FADE, ModeContext, ModeId, ModeSlot},
    random,
    scheduler::{ModeFilter, select_mode},
    strand::{Strand, StrandConfig},
    transition::TransitionCurve,
};

/// Time a mode runs before rotation picks another
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(80);

/// Smallest speed change the scene reacts to
pub const SPEED_CHANGE_THRESHOLD: f32 = 0.06;

/// Fade to black when the power switch goes off
pub const POWER_FADE: Duration = Duration::from_millis(1000);

/// Shortest frame the scene accounts for
const MIN_FRAME: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// Number of pixels on the strand
    pub pixel_count: usize,
    /// Run only this mode; timed and speed-forced switches are disabled
    pub test_mode: Option<ModeId>,
    pub rotation_interval: Duration,
    /// Modes rotation may pick
    pub mode_filter: ModeFilter,
    pub strand: StrandConfig,
}

impl SceneConfig {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            pixel_count,
            test_mode: None,
            rotation_interval: ROTATION_INTERVAL,
            mode_filter: ModeFilter::default(),
            strand: StrandConfig::default(),
        }
    }
}

/// Top-level animation state
///
/// `N` is the largest strand the scene can drive; the actual pixel
/// count comes from [`SceneConfig`].
pub struct Scene<O: OutputDriver, C: Controls, R: RngCore, const N: usize> {
    lights: Vec<Light, N>,
    mode: Option<ModeId>,
    slot: ModeSlot<N>,
    colors: ColorMaker,
    strand: Strand<N>,
    output: O,
    controls: C,
    rng: R,

    test_mode: Option<ModeId>,
    rotation_interval: Duration,
    mode_filter: ModeFilter,

    /// Scene clock, runs at the global speed
    clock: Instant,
    /// Real time of the previous tick
    last_tick: Instant,
    /// Real time the active mode started
    mode_started: Instant,
    /// Scene clock time the active mode started
    mode_started_clock: Instant,

    follow_leader: f32,
    reversed: bool,
    speed: f32,
    advance_held: bool,
    powered: bool,
}

impl<O, C, R, const N: usize> Scene<O, C, R, N>
where
    O: OutputDriver,
    C: Controls,
    R: RngCore,
{
    /// Build a scene with every pixel off and no mode entered yet
    ///
    /// The first [`tick`](Self::tick) enters the pinned test mode, or a
    /// random one.
    pub fn new(
        config: &SceneConfig,
        output: O,
        mut controls: C,
        rng: R,
        now: Instant,
    ) -> SceneResult<Self> {
        if config.pixel_count == 0 {
            return Err(SceneError::EmptyStrand);
        }
        if config.pixel_count > N {
            return Err(SceneError::CapacityExceeded {
                requested: config.pixel_count,
                capacity: N,
            });
        }

        let mut lights = Vec::new();
        lights
            .resize(config.pixel_count, Light::default())
            .map_err(|()| SceneError::CapacityExceeded {
                requested: config.pixel_count,
                capacity: N,
            })?;

        let reading = controls.read();
        Ok(Self {
            lights,
            mode: None,
            slot: ModeSlot::Off,
            colors: ColorMaker::new(),
            strand: Strand::new(&config.strand),
            output,
            controls,
            rng,
            test_mode: config.test_mode,
            rotation_interval: config.rotation_interval,
            mode_filter: config.mode_filter,
            clock: now,
            last_tick: now,
            mode_started: now,
            mode_started_clock: now,
            follow_leader: 0.0,
            reversed: false,
            speed: reading.clamped_speed(),
            // Buttons can read as pressed on the first poll
            advance_held: true,
            powered: true,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.lights.len()
    }

    /// Active mode, `None` before the first one is entered
    pub const fn mode(&self) -> Option<ModeId> {
        self.mode
    }

    pub const fn slot(&self) -> &ModeSlot<N> {
        &self.slot
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn colors(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.lights.iter().map(Light::color)
    }

    pub const fn speed(&self) -> f32 {
        self.speed
    }

    pub const fn follow_leader(&self) -> f32 {
        self.follow_leader
    }

    pub const fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub const fn is_powered(&self) -> bool {
        self.powered
    }

    /// Current scene clock
    pub const fn clock(&self) -> Instant {
        self.clock
    }

    pub const fn test_mode(&self) -> Option<ModeId> {
        self.test_mode
    }

    /// Ambient colors prepared for the active mode
    pub fn ambient_color_count(&self) -> usize {
        self.colors.count()
    }

    /// Pixel-sized scratch buffers held by the active mode
    pub fn scratch_buffers(&self) -> usize {
        self.slot.scratch_buffers()
    }

    /// Last frame written to the output
    pub fn frame(&self) -> &[Rgb] {
        self.strand.frame(self.lights.len())
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    /// Pin a single mode, or return to rotation with `None`
    pub fn pin_mode(&mut self, mode: Option<ModeId>) {
        self.test_mode = mode;
        if let Some(mode) = mode {
            self.set_mode(mode);
        }
    }

    /// Pick a mode the way timed rotation does, without switching
    pub fn random_mode(&mut self) -> ModeId {
        select_mode(&self.mode_filter, self.speed, &mut self.rng)
    }

    /// Advance to the next mode in enumeration order
    pub fn next_mode(&mut self) {
        let next = self.mode.map_or(ModeId::ALL[0], ModeId::next);
        self.set_mode(next);
    }

    /// Switch modes
    ///
    /// Drops the previous mode's scratch state, clears every light's mode
    /// state, reseeds the sweep and builds the new mode. Does nothing if
    /// `mode` is already active.
    pub fn set_mode(&mut self, mode: ModeId) {
        if self.mode == Some(mode) {
            return;
        }
        let now = self.clock;

        if self.mode == Some(ModeId::LightningBugs) {
            // Put every bug out
            for light in &mut self.lights {
                light.transition_to(NIGHT, LIGHTNING_BUGS_EXIT_FADE, now);
            }
        }

        self.slot = ModeSlot::Off;
        for light in &mut self.lights {
            light.mode_state = 0;
        }

        self.reversed = random::below(&mut self.rng, 2) == 0;
        #[allow(clippy::cast_precision_loss)]
        {
            self.follow_leader = random::index(&mut self.rng, self.lights.len()) as f32;
        }

        let mut ctx = ModeContext {
            lights: self.lights.as_mut_slice(),
            colors: &mut self.colors,
            rng: &mut self.rng,
            now,
            mode_elapsed: Duration::from_millis(0),
            follow_leader: self.follow_leader,
            reversed: self.reversed,
        };
        self.slot = ModeSlot::enter(mode, &mut ctx);

        let (count, fade) = mode.ambient_colors(self.lights.len());
        self.colors.prepare(count, fade, &mut self.rng, now);

        info!(
            "mode {} -> {}",
            self.mode.map_or("none", ModeId::as_str),
            mode.as_str()
        );
        self.mode = Some(mode);
        self.mode_started = self.last_tick;
        self.mode_started_clock = now;
    }

    /// Run one frame
    pub fn tick(&mut self, now: Instant) {
        if self.mode.is_none() {
            let first = match self.test_mode {
                Some(mode) => mode,
                None => self.random_mode(),
            };
            self.set_mode(first);
        }

        let reading = self.controls.read();
        let elapsed = now.saturating_duration_since(self.last_tick).max(MIN_FRAME);
        self.last_tick = now;

        if !reading.power || !self.powered {
            if self.power_tick(&reading, elapsed, now) {
                return;
            }
        }

        let step = self.scaled(elapsed);
        self.clock += step;

        for light in &mut self.lights {
            light.tick(self.clock);
        }
        self.advance_follow_leader(step);
        self.colors.tick(&mut self.rng, self.clock);

        let mut ctx = ModeContext {
            lights: self.lights.as_mut_slice(),
            colors: &mut self.colors,
            rng: &mut self.rng,
            now: self.clock,
            mode_elapsed: self.clock.saturating_duration_since(self.mode_started_clock),
            follow_leader: self.follow_leader,
            reversed: self.reversed,
        };
        self.slot.tick(&mut ctx);

        self.strand.set_brightness(reading.brightness, now);
        self.strand.render(&self.lights, now, &mut self.output);

        self.schedule(&reading, now);
        self.poll_advance(&reading);
    }

    /// Handle the power switch
    ///
    /// Returns `true` while the strand is off and the frame is done.
    fn power_tick(&mut self, reading: &ControlReading, elapsed: Duration, now: Instant) -> bool {
        if reading.power {
            info!("power on, resuming {}", self.mode.map_or("none", ModeId::as_str));
            self.powered = true;
            self.mode_started = now;
            return false;
        }

        self.clock += elapsed;
        if self.powered {
            info!("power off");
            self.powered = false;
            for light in &mut self.lights {
                light.transition_to_with_curve(
                    BLACK,
                    POWER_FADE,
                    TransitionCurve::EaseInOut,
                    self.clock,
                );
            }
        }

        for light in &mut self.lights {
            light.tick(self.clock);
        }
        if self.lights.iter().any(Light::is_transitioning) {
            self.strand.render(&self.lights, now, &mut self.output);
        } else {
            self.strand.render_black(self.lights.len(), now, &mut self.output);
        }
        true
    }

    /// Real elapsed time stretched by the global speed
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn scaled(&self, elapsed: Duration) -> Duration {
        let millis = (elapsed.as_millis() as f32 * self.speed) as u64;
        Duration::from_millis(millis).max(MIN_FRAME)
    }

    #[allow(clippy::cast_precision_loss)]
    fn advance_follow_leader(&mut self, step: Duration) {
        let n = self.lights.len() as f32;
        let direction = if self.reversed { -1.0 } else { 1.0 };
        let moved = direction * FOLLOW_SPEED * step.as_millis() as f32 / 1000.0;
        self.follow_leader =
            libm::fmodf(libm::fmodf(self.follow_leader + moved, n) + n, n);
    }

    /// Timed rotation, or reaction to a speed change
    fn schedule(&mut self, reading: &ControlReading, now: Instant) {
        let pinned = self.test_mode.is_some();
        let mode_age = now.saturating_duration_since(self.mode_started);

        if !pinned && mode_age > self.rotation_interval {
            let next = self.random_mode();
            if self.mode == Some(next) {
                debug!("rotation kept {}", next.as_str());
                self.mode_started = now;
            } else {
                self.set_mode(next);
            }
            return;
        }

        let speed = reading.clamped_speed();
        if libm::fabsf(speed - self.speed) <= SPEED_CHANGE_THRESHOLD {
            return;
        }
        debug!("speed {} -> {}", self.speed, speed);
        self.speed = speed;

        let Some(mode) = self.mode else {
            return;
        };
        if !pinned && !mode.speed_range().contains(speed) {
            let next = select_mode(&ModeFilter::SpeedBands, speed, &mut self.rng);
            info!("{} is out of band at speed {}", mode.as_str(), speed);
            self.set_mode(next);
        }
    }

    /// Advance on the press edge of the mode button
    fn poll_advance(&mut self, reading: &ControlReading) {
        if reading.advance_pressed {
            if !self.advance_held {
                self.advance_held = true;
                self.next_mode();
            }
        } else {
            self.advance_held = false;
        }
    }
}
