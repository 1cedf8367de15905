#![no_std]

pub mod color;
pub mod color_maker;
pub mod controls;
pub mod error;
pub mod filter;
pub mod frame_scheduler;
pub mod light;
pub mod logging;
pub mod math8;
pub mod mode;
pub mod random;
pub mod scene;
pub mod scheduler;
pub mod strand;
pub mod transition;

pub use color::{Palette, Rgb};
pub use color_maker::ColorMaker;
pub use controls::{ControlReading, Controls, FixedControls};
pub use error::{SceneError, SceneResult};
pub use frame_scheduler::FrameScheduler;
pub use light::Light;
pub use mode::{ModeId, ModeSlot, SpeedRange};
pub use scene::{Scene, SceneConfig};
pub use scheduler::{ModeFilter, select_mode};
pub use strand::{SmartLedsOutput, StrandConfig, StrandLayout};
pub use transition::{TransitionCurve, ValueTransition};

pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The scene is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
