use crate::color::Rgb;

/// Reverse the second half of the array in place
///
/// For odd lengths the middle element belongs to the second half.
pub fn reverse_second_half(leds: &mut [Rgb]) {
    let center = leds.len() / 2;
    leds[center..].reverse();
}

/// Sum of all three channels
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn channel_sum(color: Rgb) -> u16 {
    color.r as u16 + color.g as u16 + color.b as u16
}

/// Number of channels that are not fully off
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn lit_channels(color: Rgb) -> u8 {
    (color.r != 0) as u8 + (color.g != 0) as u8 + (color.b != 0) as u8
}
