mod gradient;

use smart_leds::hsv::Hsv as HSV;
use smart_leds::{RGBW, White};

pub use gradient::{GradientConfig, GradientMode, fill_gradient};
pub use smart_leds::hsv::hsv2rgb;

use crate::math8::{rescale8, scale8};

pub type Rgbw = RGBW<u8>;
pub type Hsv = HSV;

/// All channels off
pub const BLACK: Rgbw = rgbw(0, 0, 0, 0);

/// Build an RGBW color from its four channels
#[inline]
pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Rgbw {
    Rgbw {
        r,
        g,
        b,
        a: White(w),
    }
}

/// White channel of a color
#[inline]
pub const fn white_of(color: Rgbw) -> u8 {
    color.a.0
}

/// Scale all four channels by a factor (0-255 = 0.0-1.0)
#[inline]
pub const fn scale_rgbw(color: Rgbw, scale: u8) -> Rgbw {
    rgbw(
        scale8(color.r, scale),
        scale8(color.g, scale),
        scale8(color.b, scale),
        scale8(white_of(color), scale),
    )
}

/// Solid color from pure color, white and brightness
///
/// Each of R/G/B is rescaled from 0-255 onto 0-`brightness`.
/// White is independent and passed through unscaled.
#[inline]
pub const fn rgbw_change(red: u8, green: u8, blue: u8, white: u8, brightness: u8) -> Rgbw {
    rgbw(
        rescale8(red, brightness),
        rescale8(green, brightness),
        rescale8(blue, brightness),
        white,
    )
}

/// Convert a hue/saturation/value triple to RGBW with the white channel off
pub fn hsv2rgbw(hsv: Hsv) -> Rgbw {
    let rgb = hsv2rgb(hsv);
    rgbw(rgb.r, rgb.g, rgb.b, 0)
}
