//! Sunrise wake-up animation
//!
//! A sun disk grows from the middle of the strip over a dim red "aurora",
//! fading from a warm orange toward white. Three independently paced timers
//! drive it:
//!
//! - phase: master progress 0-256, one step every `wake_delay`
//! - fade: soft edge step 0-256, much faster, restarted whenever the disk
//!   grows so the edge pixels fade in smoothly
//! - white: ambient white 0-256, slow during the first half, faster after
//!
//! All three stop re-arming once the phase reaches 256.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{
    bounds::{DiskBounds, pixel_index},
    color::{Rgbw, rgbw},
    math8::{clamp8, map_range},
    timer::{Fired, TimerHandle, TimerTask, Timers, cancel_slot, claim_slot},
};

/// Terminal value of every sunrise counter
pub const SUNRISE_STEPS: u16 = 256;

/// Dim red painted outside the sun disk
pub const AURORA: Rgbw = rgbw(1, 0, 0, 0);

const DEFAULT_SUN_SIZE_PERCENT: u8 = 25;

/// Phase period in ms per unit of sunrise duration
const WAKE_DELAY_PER_UNIT: u64 = 4;

/// White ramp period multipliers before and after the half-way phase
const WHITE_SLOW_FACTOR: u64 = 10;
const WHITE_FAST_FACTOR: u64 = 2;
const WHITE_FAST_PHASE: u16 = 128;

/// Sunrise parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunriseConfig {
    /// Final sun disk width as a percentage of the strip length
    pub sun_size_percent: u8,
    /// Default duration, `None` uses the strip length
    pub duration: Option<u16>,
}

impl Default for SunriseConfig {
    fn default() -> Self {
        Self {
            sun_size_percent: DEFAULT_SUN_SIZE_PERCENT,
            duration: None,
        }
    }
}

/// Sunrise animation state and its timers
#[derive(Debug, Clone)]
pub struct SunriseAnimator {
    sun_size_percent: u8,
    strip_len: usize,
    wake_delay: u64,

    phase: u16,
    fade_step: u16,
    white_level: u16,
    previous_width: i32,
    dirty: bool,

    phase_timer: Option<TimerHandle>,
    fade_timer: Option<TimerHandle>,
    white_timer: Option<TimerHandle>,
}

impl SunriseAnimator {
    pub const fn new(sun_size_percent: u8) -> Self {
        Self {
            sun_size_percent,
            strip_len: 0,
            wake_delay: 0,
            phase: SUNRISE_STEPS,
            fade_step: SUNRISE_STEPS,
            white_level: SUNRISE_STEPS,
            previous_width: 0,
            dirty: false,
            phase_timer: None,
            fade_timer: None,
            white_timer: None,
        }
    }

    /// Start a fresh sunrise run
    ///
    /// Timers of any previous run are cancelled before new ones are armed.
    pub fn start(&mut self, duration: u16, strip_len: usize, timers: &mut Timers, now: Instant) {
        self.stop(timers);

        self.strip_len = strip_len;
        self.wake_delay = u64::from(duration) * WAKE_DELAY_PER_UNIT;
        self.phase = 0;
        self.fade_step = 0;
        self.white_level = 0;
        self.previous_width = 0;

        #[cfg(feature = "esp32-log")]
        println!(
            "[Sunrise.start] duration {}, phase period {}ms",
            duration, self.wake_delay
        );

        self.increase_phase(timers, now);
        self.increase_white_level(timers, now);
        self.increase_fade_step(timers, now);
    }

    /// Cancel every timer owned by this animator
    pub fn stop(&mut self, timers: &mut Timers) {
        cancel_slot(timers, &mut self.phase_timer);
        cancel_slot(timers, &mut self.fade_timer);
        cancel_slot(timers, &mut self.white_timer);
    }

    /// Handle a fired sunrise timer
    ///
    /// Timers this animator no longer owns are ignored.
    pub fn on_timer(&mut self, fired: &Fired<TimerTask>, timers: &mut Timers, now: Instant) {
        match fired.task {
            TimerTask::SunPhase if claim_slot(&mut self.phase_timer, fired) => {
                self.increase_phase(timers, now);
            }
            TimerTask::SunFade if claim_slot(&mut self.fade_timer, fired) => {
                self.increase_fade_step(timers, now);
            }
            TimerTask::WhiteLevel if claim_slot(&mut self.white_timer, fired) => {
                self.increase_white_level(timers, now);
            }
            _ => {}
        }
    }

    fn increase_phase(&mut self, timers: &mut Timers, now: Instant) {
        if self.phase >= SUNRISE_STEPS {
            return;
        }
        self.phase += 1;
        self.dirty = true;

        #[cfg(feature = "esp32-log")]
        if self.phase % 32 == 0 {
            println!("[Sunrise.phase] {}", self.phase);
        }

        if self.phase < SUNRISE_STEPS {
            let delay = Duration::from_millis(self.wake_delay);
            self.phase_timer = timers.schedule(TimerTask::SunPhase, delay, now).ok();
        }
    }

    /// Edge fade keeps ticking while the sun rises, even once saturated
    fn increase_fade_step(&mut self, timers: &mut Timers, now: Instant) {
        if self.fade_step < SUNRISE_STEPS {
            self.fade_step += 1;
            self.dirty = true;
        }
        if self.phase < SUNRISE_STEPS {
            let len = self.strip_len.max(1) as u64;
            let delay = Duration::from_millis(self.wake_delay / len / 2);
            self.fade_timer = timers.schedule(TimerTask::SunFade, delay, now).ok();
        }
    }

    fn increase_white_level(&mut self, timers: &mut Timers, now: Instant) {
        if self.white_level < SUNRISE_STEPS {
            self.white_level += 1;
            self.dirty = true;
        }
        let factor = if self.phase < WHITE_FAST_PHASE {
            WHITE_SLOW_FACTOR
        } else if self.phase < SUNRISE_STEPS {
            WHITE_FAST_FACTOR
        } else {
            return;
        };
        let delay = Duration::from_millis(self.wake_delay * factor);
        self.white_timer = timers.schedule(TimerTask::WhiteLevel, delay, now).ok();
    }

    /// Current sun disk geometry on a strip of `len` pixels
    pub fn disk(&self, len: usize) -> DiskBounds {
        let len = i32::try_from(len).unwrap_or(i32::MAX);
        let sun = len.saturating_mul(i32::from(self.sun_size_percent)) / 100;
        let width = map_range(i32::from(self.phase), 0, i32::from(SUNRISE_STEPS), 0, sun);
        DiskBounds::centered(len, width)
    }

    /// Repaint `leds` if any counter moved since the last draw
    pub fn draw_if_dirty(&mut self, leds: &mut [Rgbw]) {
        if self.dirty {
            self.draw(leds);
        }
    }

    /// Paint the current sunrise frame
    pub fn draw(&mut self, leds: &mut [Rgbw]) {
        self.dirty = false;
        let len = i32::try_from(leds.len()).unwrap_or(i32::MAX);
        let disk = self.disk(leds.len());

        // Growing disk restarts the edge fade
        if disk.width != self.previous_width {
            self.fade_step = 0;
        }
        self.previous_width = disk.width;

        let steps = i32::from(SUNRISE_STEPS);
        let phase = i32::from(self.phase);
        let max_red = map_range(phase, 0, steps, 255, -20).max(0);
        let max_green = map_range(phase, 0, steps, 64, 0);
        let white = i32::from(self.white_level);

        leds.fill(AURORA);

        if !disk.fits(len) {
            return;
        }

        if phase > 0 && disk.edges_fit(len) {
            let fade = i32::from(self.fade_step);
            let edge = rgbw(
                clamp8(map_range(fade, 0, steps, 1, max_red)),
                clamp8(map_range(fade, 0, steps, 0, max_green)),
                0,
                clamp8(map_range(fade, 0, steps, 0, white)),
            );
            for position in [disk.left_edge(), disk.right_edge()] {
                if let Some(index) = pixel_index(position, leds.len()) {
                    leds[index] = edge;
                }
            }
        }

        let sun = rgbw(clamp8(max_red), clamp8(max_green), 0, clamp8(white));
        for position in disk.start..disk.end() {
            if let Some(index) = pixel_index(position, leds.len()) {
                leds[index] = sun;
            }
        }
    }

    pub const fn phase(&self) -> u16 {
        self.phase
    }

    pub const fn fade_step(&self) -> u16 {
        self.fade_step
    }

    pub const fn white_level(&self) -> u16 {
        self.white_level
    }

    /// Whether the phase counter reached its terminal value
    pub const fn is_finished(&self) -> bool {
        self.phase >= SUNRISE_STEPS
    }

    /// Handles of the phase, fade and white timers currently armed
    pub const fn timers(&self) -> [Option<TimerHandle>; 3] {
        [self.phase_timer, self.fade_timer, self.white_timer]
    }
}
