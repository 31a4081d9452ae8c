//! Color loop effect
//!
//! Fills the strip with a single hue that rotates around the color wheel.
//! Repainted every frame from the time elapsed since activation.

use embassy_time::{Duration, Instant};

use crate::color::{Hsv, Rgbw, hsv2rgbw};

/// One full hue rotation every 10 s
pub const DEFAULT_COLOR_LOOP_CYCLE: Duration = Duration::from_millis(10_000);

/// Continuously rotating hue
#[derive(Debug, Clone)]
pub struct ColorLoopEffect {
    /// Duration of one full hue rotation
    cycle: Duration,
    started: Instant,
    running: bool,
}

impl Default for ColorLoopEffect {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_LOOP_CYCLE)
    }
}

impl ColorLoopEffect {
    pub const fn new(cycle: Duration) -> Self {
        Self {
            cycle,
            started: Instant::from_millis(0),
            running: false,
        }
    }

    /// Restart the rotation from hue 0
    pub fn start(&mut self, now: Instant) {
        self.started = now;
        self.running = true;
    }

    /// Freeze the strip at the last painted hue
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Hue (0-255) at `now`
    #[allow(clippy::cast_possible_truncation)]
    pub fn hue(&self, now: Instant) -> u8 {
        let cycle_ms = self.cycle.as_millis().max(1);
        let elapsed_ms = now
            .checked_duration_since(self.started)
            .map_or(0, |elapsed| elapsed.as_millis());
        ((elapsed_ms % cycle_ms) * 256 / cycle_ms) as u8
    }

    /// Paint the current hue at the given brightness
    pub fn render(&mut self, now: Instant, brightness: u8, leds: &mut [Rgbw]) {
        if !self.running {
            return;
        }
        let color = hsv2rgbw(Hsv {
            hue: self.hue(now),
            sat: 255,
            val: brightness,
        });
        leds.fill(color);
    }
}
