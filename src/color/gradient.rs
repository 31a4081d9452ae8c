//! Positional brightness gradients
//!
//! A gradient keeps the solid color at full strength around an anchor and
//! fades it out with distance from that anchor. The extent (0-100 %) is the
//! share of the distance range the fade is spread over: 0 gives a solid fill,
//! 100 fades across the whole range down to black at the farthest pixel.

use crate::color::{Rgbw, scale_rgbw};
use crate::math8::ease_in_quad;

const MAX_EXTENT: u8 = 100;

/// Gradient shape, addressed by a single letter on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientMode {
    /// `N`: brightest at the first pixel
    Near,
    /// `F`: brightest at the last pixel
    Far,
    /// `C`: brightest at the center, fading toward both ends
    Center,
    /// `E`: brightest at both ends, fading toward the center
    Edges,
}

impl GradientMode {
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'N' => Self::Near,
            'F' => Self::Far,
            'C' => Self::Center,
            'E' => Self::Edges,
            _ => return None,
        })
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Near => 'N',
            Self::Far => 'F',
            Self::Center => 'C',
            Self::Edges => 'E',
        }
    }

    /// Distance of pixel `i` from the anchor and the largest possible distance
    ///
    /// Computed in half-pixel units so odd and even strips stay symmetric.
    fn distance(self, i: usize, len: usize) -> (usize, usize) {
        let last = len.saturating_sub(1);
        let span = 2 * last;
        let doubled = 2 * i;
        // Distance from the strip midpoint, in half pixels
        let from_mid = doubled.abs_diff(last);
        match self {
            Self::Near => (doubled, span),
            Self::Far => (span - doubled, span),
            Self::Center => (from_mid, last),
            Self::Edges => (last - from_mid, last),
        }
    }
}

/// Gradient parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientConfig {
    pub mode: GradientMode,
    /// Fade spread, 0-100 %
    pub extent: u8,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            mode: GradientMode::Near,
            extent: 50,
        }
    }
}

impl GradientConfig {
    /// Build a config, rejecting an extent above 100 %
    pub const fn new(mode: GradientMode, extent: u8) -> Option<Self> {
        if extent > MAX_EXTENT {
            return None;
        }
        Some(Self { mode, extent })
    }

    /// Strength (0-255) of the color at a normalized distance (0-255)
    #[allow(clippy::cast_possible_truncation)]
    fn strength(self, distance: u8) -> u8 {
        let extent = u32::from(self.extent.min(MAX_EXTENT));
        let plateau = 255 * (u32::from(MAX_EXTENT) - extent) / u32::from(MAX_EXTENT);
        let distance = u32::from(distance);
        if distance <= plateau {
            return 255;
        }
        let fade = (distance - plateau) * 255 / (255 - plateau);
        255 - ease_in_quad(fade.min(255) as u8)
    }
}

/// Fill `leds` with `color` shaped by the gradient
#[allow(clippy::cast_possible_truncation)]
pub fn fill_gradient(leds: &mut [Rgbw], color: Rgbw, config: GradientConfig) {
    let len = leds.len();
    for (i, led) in leds.iter_mut().enumerate() {
        let (distance, max_distance) = config.mode.distance(i, len);
        let normalized = if max_distance == 0 {
            0
        } else {
            (distance * 255 / max_distance) as u8
        };
        *led = scale_rgbw(color, config.strength(normalized));
    }
}
