//! Pixel storage
//!
//! [`PixelBuffer`] holds what the active effect wants displayed, independent
//! of power and per-pixel enablement. [`EnableMask`] decides which pixels may
//! show color at all.

use crate::color::{BLACK, Rgbw, rgbw};

/// Hex digits encoding one RGBW pixel
const DIGITS_PER_PIXEL: usize = 8;

/// Error returned for a malformed hex payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// Payload carries no digits
    Empty,
    /// Character at `position` is not a hex digit
    InvalidDigit { position: usize },
}

/// Fixed-length RGBW pixel array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBuffer<const N: usize> {
    leds: [Rgbw; N],
}

impl<const N: usize> Default for PixelBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PixelBuffer<N> {
    pub const fn new() -> Self {
        Self { leds: [BLACK; N] }
    }

    pub fn fill(&mut self, color: Rgbw) {
        self.leds.fill(color);
    }

    pub fn copy_from(&mut self, other: &Self) {
        self.leds = other.leds;
    }

    pub const fn as_slice(&self) -> &[Rgbw] {
        &self.leds
    }

    pub fn as_mut_slice(&mut self) -> &mut [Rgbw] {
        &mut self.leds
    }

    pub fn get(&self, index: usize) -> Option<Rgbw> {
        self.leds.get(index).copied()
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Overwrite pixels from a hex stream of `RRGGBBWW` groups
    ///
    /// Every eight digits make one pixel, two digits per channel in R, G, B,
    /// W order. A short final group is read as a number, so `"FF00"` is
    /// `0x0000FF00`. Pixels past the end of the stream keep their color and
    /// groups past the strip end are ignored. Nothing is written if any
    /// character is not a hex digit.
    pub fn write_hex(&mut self, payload: &str) -> Result<(), PayloadError> {
        let digits = validate_hex(payload)?;
        for (led, group) in self.leds.iter_mut().zip(digits.chunks(DIGITS_PER_PIXEL)) {
            let value = group
                .iter()
                .fold(0u32, |acc, digit| (acc << 4) | u32::from(nibble(*digit)));
            let [r, g, b, w] = value.to_be_bytes();
            *led = rgbw(r, g, b, w);
        }
        Ok(())
    }
}

/// Per-pixel enable bits, all enabled by default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableMask<const N: usize> {
    enabled: [bool; N],
}

impl<const N: usize> Default for EnableMask<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EnableMask<N> {
    pub const fn new() -> Self {
        Self { enabled: [true; N] }
    }

    /// Out-of-range indices are never enabled
    pub fn is_enabled(&self, index: usize) -> bool {
        self.enabled.get(index).copied().unwrap_or(false)
    }

    pub fn set(&mut self, index: usize, enabled: bool) {
        if let Some(bit) = self.enabled.get_mut(index) {
            *bit = enabled;
        }
    }

    pub fn enable_all(&mut self) {
        self.enabled.fill(true);
    }

    pub fn count_enabled(&self) -> usize {
        self.enabled.iter().filter(|bit| **bit).count()
    }

    /// Overwrite enable bits from a hex bitmask
    ///
    /// Each digit carries four pixels, most significant bit first, so `"E"`
    /// enables pixels 0-2 and disables pixel 3. Pixels past the end of a
    /// short mask keep their previous state.
    pub fn write_hex(&mut self, payload: &str) -> Result<(), PayloadError> {
        let digits = validate_hex(payload)?;
        for (group, digit) in digits.iter().enumerate() {
            let bits = nibble(*digit);
            for offset in 0..4 {
                let enabled = bits & (0b1000 >> offset) != 0;
                self.set(group * 4 + offset, enabled);
            }
        }
        Ok(())
    }
}

fn validate_hex(payload: &str) -> Result<&[u8], PayloadError> {
    let digits = payload.trim().as_bytes();
    if digits.is_empty() {
        return Err(PayloadError::Empty);
    }
    if let Some(position) = digits.iter().position(|d| !d.is_ascii_hexdigit()) {
        return Err(PayloadError::InvalidDigit { position });
    }
    Ok(digits)
}

/// Value of a validated ASCII hex digit
const fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}
