use crate::{
    color::{BLACK, Rgb, channel_sum, lit_channels},
    light::Light,
};

/// Near-black limit while a fade is running
const FADING_SUM: u16 = 10;
/// Near-black limit for a settled pixel
const SETTLED_SUM: u16 = 5;

/// Output color of a light with stray single-channel glints removed
///
/// Fades toward or away from black pass through colors where only one
/// or two channels still carry a few counts, which show up as flashes
/// of a hue that neither endpoint has. Such pixels are blanked.
pub fn dither(light: &Light) -> Rgb {
    let color = light.color();
    let sum = channel_sum(color);

    match light.target_color() {
        Some(target) => {
            if sum >= FADING_SUM {
                return color;
            }
            let lit = lit_channels(color);
            let stray = (lit == 1 || lit == 2)
                && lit != lit_channels(target)
                && lit != lit_channels(light.original_color());
            if stray { BLACK } else { color }
        }
        None if sum < SETTLED_SUM => BLACK,
        None => color,
    }
}
