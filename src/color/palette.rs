use rand::{Rng, RngCore};

use super::{
    BLACK, BLUE, CYAN, GREEN, INDIGO, MAGENTA, ORANGE, RED, Rgb, VIOLET, YELLOW, lerp_colors,
};

/// Primary and secondary colors
pub const RGB_RAINBOW: Palette = Palette::new(&[RED, YELLOW, GREEN, CYAN, BLUE, MAGENTA]);

/// Every named hue, in spectral order
pub const NAMED_RAINBOW: Palette =
    Palette::new(&[RED, ORANGE, YELLOW, GREEN, CYAN, BLUE, INDIGO, VIOLET, MAGENTA]);

/// Seven-color spectrum
pub const ROYGBIV: Palette = Palette::new(&[RED, ORANGE, YELLOW, GREEN, BLUE, INDIGO, VIOLET]);

/// Twinkle colors; black appears twice so dark pixels are common
pub const TWINKLE: Palette = Palette::new(&[
    RED, ORANGE, YELLOW, GREEN, CYAN, BLUE, MAGENTA, VIOLET, BLACK, BLACK,
]);

/// Fixed, ordered set of reference colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: &'static [Rgb],
}

impl Palette {
    pub const fn new(colors: &'static [Rgb]) -> Self {
        Self { colors }
    }

    pub const fn len(&self) -> usize {
        self.colors.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub const fn colors(&self) -> &'static [Rgb] {
        self.colors
    }

    /// Raw entry at `index`, wrapping around the palette
    pub fn entry(&self, index: usize) -> Rgb {
        if self.colors.is_empty() {
            return BLACK;
        }
        self.colors[index % self.colors.len()]
    }

    /// Uniformly random entry
    pub fn random_color<R: RngCore>(&self, rng: &mut R) -> Rgb {
        if self.colors.is_empty() {
            return BLACK;
        }
        self.colors[rng.gen_range(0..self.colors.len())]
    }

    /// Positional lookup
    ///
    /// `location` wraps modulo the palette length, negative values
    /// included. Fractional locations blend the two bracketing entries,
    /// with the last entry blending back into the first.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn get_color(&self, location: f32) -> Rgb {
        let len = self.colors.len();
        if len == 0 {
            return BLACK;
        }
        if !location.is_finite() {
            return self.colors[0];
        }

        let len_f = len as f32;
        let wrapped = libm::fmodf(libm::fmodf(location, len_f) + len_f, len_f);
        let base = libm::floorf(wrapped);
        let index = (base as usize).min(len - 1);
        let fraction = wrapped - base;

        let amount = (fraction * 255.0) as u8;
        if amount == 0 {
            return self.colors[index];
        }
        lerp_colors(self.colors[index], self.colors[(index + 1) % len], amount)
    }
}
