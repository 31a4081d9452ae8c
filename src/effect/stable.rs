//! Solid color parameters shared by the color-driven effects

use crate::color::{Rgbw, rgbw_change};

/// Pure color, white level and brightness as last commanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorParams {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub white: u8,
    pub brightness: u8,
}

impl Default for ColorParams {
    fn default() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            white: 0,
            brightness: 255,
        }
    }
}

impl ColorParams {
    /// Solid color for the Stable effect
    ///
    /// R/G/B are mapped onto the 0-brightness range, white is not scaled.
    pub const fn stable_color(&self) -> Rgbw {
        rgbw_change(self.red, self.green, self.blue, self.white, self.brightness)
    }
}
