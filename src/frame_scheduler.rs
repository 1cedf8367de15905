//! Frame pacing around a [`Scene`].
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};
use rand::RngCore;

use crate::{OutputDriver, controls::Controls, scene::Scene};

/// Default target frame rate (60 FPS).
pub const DEFAULT_FPS: u32 = 60;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Fixed-rate driver for a scene.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(scene);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     Timer::after(result.sleep_duration).await;
/// }
/// ```
pub struct FrameScheduler<O: OutputDriver, C: Controls, R: RngCore, const N: usize> {
    scene: Scene<O, C, R, N>,
    next_frame: Option<Instant>,
    frame_duration: Duration,
}

impl<O, C, R, const N: usize> FrameScheduler<O, C, R, N>
where
    O: OutputDriver,
    C: Controls,
    R: RngCore,
{
    /// Create a new frame scheduler running at [`DEFAULT_FPS`].
    pub fn new(scene: Scene<O, C, R, N>) -> Self {
        Self::with_frame_duration(scene, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(scene: Scene<O, C, R, N>, frame_duration: Duration) -> Self {
        Self {
            scene,
            next_frame: None,
            frame_duration: frame_duration.max(Duration::from_millis(1)),
        }
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Run one frame and return when the next one is due.
    ///
    /// If the caller has fallen more than two frames behind, the schedule
    /// restarts from `now` instead of bursting to catch up.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_drift = self.frame_duration * 2;
        let deadline = match self.next_frame {
            Some(deadline) if now <= deadline + max_drift => deadline,
            _ => now,
        };

        self.scene.tick(now);

        let next_deadline = deadline + self.frame_duration;
        self.next_frame = Some(next_deadline);

        FrameResult {
            next_deadline,
            sleep_duration: next_deadline.saturating_duration_since(now),
        }
    }

    pub const fn scene(&self) -> &Scene<O, C, R, N> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene<O, C, R, N> {
        &mut self.scene
    }

    pub fn into_scene(self) -> Scene<O, C, R, N> {
        self.scene
    }
}
