//! RGB color primitives and fixed palettes

mod palette;
mod utils;

use smart_leds::RGB8;

pub use palette::{NAMED_RAINBOW, Palette, RGB_RAINBOW, ROYGBIV, TWINKLE};
pub use utils::{channel_sum, lit_channels, reverse_second_half};

pub type Rgb = RGB8;

pub const BLACK: Rgb = make_color(0x00, 0x00, 0x00);
pub const RED: Rgb = make_color(0xFF, 0x00, 0x00);
pub const ORANGE: Rgb = make_color(0xFF, 0x60, 0x00);
pub const YELLOW: Rgb = make_color(0xFF, 0xFF, 0x00);
pub const GREEN: Rgb = make_color(0x00, 0xFF, 0x00);
pub const CYAN: Rgb = make_color(0x00, 0xFF, 0xFF);
pub const BLUE: Rgb = make_color(0x00, 0x00, 0xFF);
pub const INDIGO: Rgb = make_color(0x4B, 0x00, 0x82);
pub const VIOLET: Rgb = make_color(0x8E, 0x25, 0xFB);
pub const MAGENTA: Rgb = make_color(0xFF, 0x00, 0xFF);
pub const WHITE: Rgb = make_color(0xFF, 0xFF, 0xFF);
/// Dim blue used as the resting color between lightning bug flashes
pub const NIGHT: Rgb = make_color(0x00, 0x00, 0x10);

/// Average channel level above which a blend reads as white
const WHITE_THRESHOLD: u16 = 50;

/// Build a color from its channels
#[inline]
pub const fn make_color(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

/// Interpolate between two colors, then scale by intensity
///
/// `t` and `intensity` are fractions of 255. For each channel the
/// difference is taken first, scaled by `t`, added to `c1`, and the
/// sum is scaled by `intensity`. Division truncates toward zero.
#[inline]
pub const fn interpolate(c1: Rgb, c2: Rgb, t: u8, intensity: u8) -> Rgb {
    Rgb {
        r: interpolate_channel(c1.r, c2.r, t, intensity),
        g: interpolate_channel(c1.g, c2.g, t, intensity),
        b: interpolate_channel(c1.b, c2.b, t, intensity),
    }
}

#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn interpolate_channel(a: u8, b: u8, t: u8, intensity: u8) -> u8 {
    let a = a as i32;
    let delta = b as i32 - a;
    let mixed = a + delta * t as i32 / 255;
    let scaled = mixed * intensity as i32 / 255;
    if scaled < 0 {
        0
    } else if scaled > 255 {
        255
    } else {
        scaled as u8
    }
}

/// Blend two colors at full intensity
///
/// Matches the `ValueBlender` signature used by transitions.
#[inline]
pub const fn lerp_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    interpolate(a, b, amount_of_b, 0xFF)
}

/// Whether the midpoint of two colors is bright on every channel
pub const fn will_produce_white(c1: Rgb, c2: Rgb) -> bool {
    half_sum(c1.r, c2.r) > WHITE_THRESHOLD
        && half_sum(c1.g, c2.g) > WHITE_THRESHOLD
        && half_sum(c1.b, c2.b) > WHITE_THRESHOLD
}

#[inline]
#[allow(clippy::cast_lossless)]
const fn half_sum(a: u8, b: u8) -> u16 {
    (a as u16 + b as u16) / 2
}
