//! Outbound state summaries
//!
//! The transport layer re-publishes both summaries after every state-affecting
//! command.

use core::fmt::Write;

use heapless::String;

use crate::color::GradientConfig;
use crate::effect::EffectId;

/// Capacity of an encoded state summary
pub const STATE_REPORT_CAPACITY: usize = 48;

/// Capacity of an encoded attributes summary
pub const ATTRIBUTES_REPORT_CAPACITY: usize = 32;

/// Light state as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSnapshot {
    pub power: bool,
    /// Crossfade duration in seconds
    pub transition: u16,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub white: u8,
    pub brightness: u8,
    pub effect: EffectId,
}

impl LightSnapshot {
    /// `power,transition,red,green,blue,white,brightness,effect`
    pub fn encode_state(&self) -> String<STATE_REPORT_CAPACITY> {
        let mut out = String::new();
        // Longest possible summary fits the capacity
        let _ = write!(
            out,
            "{},{},{},{},{},{},{},{}",
            if self.power { "ON" } else { "OFF" },
            self.transition,
            self.red,
            self.green,
            self.blue,
            self.white,
            self.brightness,
            self.effect.as_str(),
        );
        out
    }
}

/// Device attributes as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributesSnapshot {
    pub pixel_count: usize,
    pub gradient: GradientConfig,
}

impl AttributesSnapshot {
    /// `pixelCount,gradientMode,gradientExtent`
    pub fn encode(&self) -> String<ATTRIBUTES_REPORT_CAPACITY> {
        let mut out = String::new();
        let _ = write!(
            out,
            "{},{},{}",
            self.pixel_count,
            self.gradient.mode.as_char(),
            self.gradient.extent,
        );
        out
    }
}
