//! Turns light colors into the frame written to hardware

use embassy_time::{Duration, Instant};
use smart_leds::SmartLedsWrite;

use crate::{
    OutputDriver,
    color::{BLACK, Rgb, reverse_second_half},
    filter::{BrightnessFilter, ColorCorrection, Filter, dither},
    light::Light,
    logging::warn,
};

/// Physical arrangement of the strand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrandLayout {
    /// Pixel `i` is light `i`
    #[default]
    Linear,
    /// The second half of the frame is written in reverse, for strands
    /// folded in the middle
    Mirrored,
}

#[derive(Debug, Clone)]
pub struct StrandConfig {
    /// Per-channel correction factors (255 = unchanged)
    pub color_correction: Rgb,
    pub layout: StrandLayout,
    /// Fade used for brightness changes
    pub brightness_transition: Duration,
    /// Brightness before the first control reading
    pub initial_brightness: u8,
}

impl Default for StrandConfig {
    fn default() -> Self {
        Self {
            color_correction: Rgb {
                r: 255,
                g: 255,
                b: 255,
            },
            layout: StrandLayout::Linear,
            brightness_transition: Duration::from_millis(200),
            initial_brightness: 255,
        }
    }
}

/// Frame assembly: dithering, brightness, correction, layout
#[derive(Debug, Clone)]
pub struct Strand<const N: usize> {
    frame: [Rgb; N],
    brightness: BrightnessFilter,
    color_correction: ColorCorrection,
    layout: StrandLayout,
}

impl<const N: usize> Strand<N> {
    pub fn new(config: &StrandConfig) -> Self {
        Self {
            frame: [BLACK; N],
            brightness: BrightnessFilter::new(
                config.initial_brightness,
                config.brightness_transition,
            ),
            color_correction: ColorCorrection::new(config.color_correction),
            layout: config.layout,
        }
    }

    pub fn set_brightness(&mut self, brightness: u8, now: Instant) -> bool {
        self.brightness.set(brightness, now)
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness.current()
    }

    /// Last frame handed to the output
    pub fn frame(&self, len: usize) -> &[Rgb] {
        &self.frame[..len.min(N)]
    }

    /// Build the frame for `lights` and write it out
    pub fn render<O: OutputDriver>(&mut self, lights: &[Light], now: Instant, output: &mut O) {
        let len = lights.len().min(N);
        for (pixel, light) in self.frame.iter_mut().zip(lights) {
            *pixel = dither(light);
        }
        self.show(len, now, output);
    }

    /// Write an all-black frame
    pub fn render_black<O: OutputDriver>(&mut self, len: usize, now: Instant, output: &mut O) {
        let len = len.min(N);
        self.frame[..len].fill(BLACK);
        self.show(len, now, output);
    }

    fn show<O: OutputDriver>(&mut self, len: usize, now: Instant, output: &mut O) {
        self.brightness.tick(now);
        let frame = &mut self.frame[..len];
        self.brightness.apply(frame);
        self.color_correction.apply(frame);
        if self.layout == StrandLayout::Mirrored {
            reverse_second_half(frame);
        }
        output.write(frame);
    }
}

/// Output driver over any `smart-leds` writer
///
/// Write errors are logged and dropped; the next frame simply tries
/// again.
pub struct SmartLedsOutput<W> {
    writer: W,
}

impl<W> SmartLedsOutput<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: core::fmt::Debug,
{
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsOutput<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: core::fmt::Debug,
{
    fn write(&mut self, colors: &[Rgb]) {
        if let Err(err) = self.writer.write(colors.iter().copied()) {
            warn!("strand write failed: {:?}", err);
        }
    }
}
