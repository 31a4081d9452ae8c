//! Effect state machine
//!
//! Owns the pixel buffer, the custom buffer, the enable mask and every effect
//! parameter for the lifetime of the device. Switching effects always cancels
//! the timers of the outgoing effect before the incoming one arms its own.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{GradientConfig, fill_gradient};
use crate::effect::{
    ColorLoopEffect, ColorParams, EffectId, EffectSlot, SunriseAnimator, SunriseConfig,
};
use crate::pixels::{EnableMask, PayloadError, PixelBuffer};
use crate::timer::{Fired, TimerTask, Timers};

/// Effect state machine for a strip of `N` pixels
#[derive(Debug, Clone)]
pub struct EffectEngine<const N: usize> {
    params: ColorParams,
    gradient: GradientConfig,
    sunrise: SunriseConfig,
    sunrise_duration: u16,
    color_loop_cycle: Duration,

    slot: EffectSlot,
    stopped: bool,

    pixels: PixelBuffer<N>,
    custom: PixelBuffer<N>,
    mask: EnableMask<N>,
}

impl<const N: usize> EffectEngine<N> {
    /// Create a stopped engine; nothing is painted until [`activate`](Self::activate)
    pub fn new(
        params: ColorParams,
        gradient: GradientConfig,
        sunrise: SunriseConfig,
        color_loop_cycle: Duration,
        effect: EffectId,
    ) -> Self {
        let default_duration = u16::try_from(N).unwrap_or(u16::MAX);
        let mut engine = Self {
            params,
            gradient,
            sunrise,
            sunrise_duration: sunrise.duration.unwrap_or(default_duration),
            color_loop_cycle,
            slot: EffectSlot::Stable,
            stopped: true,
            pixels: PixelBuffer::new(),
            custom: PixelBuffer::new(),
            mask: EnableMask::new(),
        };
        engine.slot = engine.make_slot(effect);
        engine.repaint();
        engine
    }

    fn make_slot(&self, effect: EffectId) -> EffectSlot {
        match effect {
            EffectId::Stable => EffectSlot::Stable,
            EffectId::Gradient => EffectSlot::Gradient,
            EffectId::Custom => EffectSlot::Custom,
            EffectId::Sunrise => {
                EffectSlot::Sunrise(SunriseAnimator::new(self.sunrise.sun_size_percent))
            }
            EffectId::ColorLoop => {
                EffectSlot::ColorLoop(ColorLoopEffect::new(self.color_loop_cycle))
            }
        }
    }

    /// Switch to another effect
    ///
    /// A stopped engine only paints the new effect's one-shot content and
    /// arms nothing until it is activated again.
    pub fn set_effect(&mut self, effect: EffectId, timers: &mut Timers, now: Instant) {
        let was_stopped = self.stopped;
        self.stop(timers);
        self.slot = self.make_slot(effect);

        #[cfg(feature = "esp32-log")]
        println!("[EffectEngine.set_effect] switched to {}", effect.as_str());

        if was_stopped {
            self.repaint();
        } else {
            self.activate(timers, now);
        }
    }

    /// Start a sunrise with an explicit duration, kept as the new default
    pub fn start_sunrise(&mut self, duration: u16, timers: &mut Timers, now: Instant) {
        self.sunrise_duration = duration;
        self.set_effect(EffectId::Sunrise, timers, now);
    }

    /// Paint the current effect and arm its animation
    pub fn activate(&mut self, timers: &mut Timers, now: Instant) {
        self.stopped = false;
        self.repaint();
        let leds = self.pixels.as_mut_slice();
        match &mut self.slot {
            EffectSlot::Sunrise(animator) => {
                animator.start(self.sunrise_duration, N, timers, now);
                animator.draw(leds);
            }
            EffectSlot::ColorLoop(effect) => {
                effect.start(now);
                effect.render(now, self.params.brightness, leds);
            }
            EffectSlot::Stable | EffectSlot::Gradient | EffectSlot::Custom => {}
        }
    }

    /// Activate again after [`stop`](Self::stop), no-op while running
    pub fn resume(&mut self, timers: &mut Timers, now: Instant) {
        if self.stopped {
            self.activate(timers, now);
        }
    }

    /// Cancel every owned timer and freeze the pixel buffer
    pub fn stop(&mut self, timers: &mut Timers) {
        match &mut self.slot {
            EffectSlot::Sunrise(animator) => animator.stop(timers),
            EffectSlot::ColorLoop(effect) => effect.stop(),
            EffectSlot::Stable | EffectSlot::Gradient | EffectSlot::Custom => {}
        }
        self.stopped = true;
    }

    /// One-shot recompute for effects painted from their parameters
    fn repaint(&mut self) {
        match self.slot {
            EffectSlot::Stable => self.pixels.fill(self.params.stable_color()),
            EffectSlot::Gradient => fill_gradient(
                self.pixels.as_mut_slice(),
                self.params.stable_color(),
                self.gradient,
            ),
            EffectSlot::Custom => self.pixels.copy_from(&self.custom),
            EffectSlot::Sunrise(_) | EffectSlot::ColorLoop(_) => {}
        }
    }

    /// Apply a color-related change
    ///
    /// Effects that don't paint from the commanded color give way to Stable.
    fn color_changed(&mut self, timers: &mut Timers, now: Instant) {
        if self.slot.id().owns_color() {
            self.repaint();
        } else {
            self.set_effect(EffectId::Stable, timers, now);
        }
    }

    pub fn set_red(&mut self, red: u8, timers: &mut Timers, now: Instant) {
        self.params.red = red;
        self.color_changed(timers, now);
    }

    pub fn set_green(&mut self, green: u8, timers: &mut Timers, now: Instant) {
        self.params.green = green;
        self.color_changed(timers, now);
    }

    pub fn set_blue(&mut self, blue: u8, timers: &mut Timers, now: Instant) {
        self.params.blue = blue;
        self.color_changed(timers, now);
    }

    /// Set all three color channels, each recomputing on its own
    pub fn set_color(&mut self, red: u8, green: u8, blue: u8, timers: &mut Timers, now: Instant) {
        self.set_red(red, timers, now);
        self.set_green(green, timers, now);
        self.set_blue(blue, timers, now);
    }

    pub fn set_white(&mut self, white: u8, timers: &mut Timers, now: Instant) {
        self.params.white = white;
        self.color_changed(timers, now);
    }

    pub fn set_brightness(&mut self, brightness: u8, timers: &mut Timers, now: Instant) {
        self.params.brightness = brightness;
        self.color_changed(timers, now);
    }

    /// Update gradient parameters, repainting if the gradient is shown
    pub fn set_gradient(&mut self, gradient: GradientConfig) {
        self.gradient = gradient;
        if matches!(self.slot, EffectSlot::Gradient) {
            self.repaint();
        }
    }

    /// Rewrite the custom buffer from a hex stream
    pub fn set_custom_pixels(&mut self, payload: &str) -> Result<(), PayloadError> {
        self.custom.write_hex(payload)?;
        if matches!(self.slot, EffectSlot::Custom) {
            self.repaint();
        }
        Ok(())
    }

    /// Rewrite the enable mask from a hex bitmask
    pub fn set_enabled_mask(&mut self, payload: &str) -> Result<(), PayloadError> {
        self.mask.write_hex(payload)
    }

    /// Dispatch a fired animation timer
    pub fn on_timer(&mut self, fired: &Fired<TimerTask>, timers: &mut Timers, now: Instant) {
        if let EffectSlot::Sunrise(animator) = &mut self.slot {
            animator.on_timer(fired, timers, now);
        }
    }

    /// Per-frame repaint for animated effects
    pub fn tick(&mut self, now: Instant) {
        let leds = self.pixels.as_mut_slice();
        match &mut self.slot {
            EffectSlot::Sunrise(animator) => animator.draw_if_dirty(leds),
            EffectSlot::ColorLoop(effect) => effect.render(now, self.params.brightness, leds),
            EffectSlot::Stable | EffectSlot::Gradient | EffectSlot::Custom => {}
        }
    }

    pub const fn pixels(&self) -> &PixelBuffer<N> {
        &self.pixels
    }

    pub const fn custom(&self) -> &PixelBuffer<N> {
        &self.custom
    }

    pub const fn mask(&self) -> &EnableMask<N> {
        &self.mask
    }

    pub const fn effect(&self) -> &EffectSlot {
        &self.slot
    }

    pub const fn effect_id(&self) -> EffectId {
        self.slot.id()
    }

    pub const fn params(&self) -> &ColorParams {
        &self.params
    }

    pub const fn gradient(&self) -> GradientConfig {
        self.gradient
    }

    pub const fn sunrise_duration(&self) -> u16 {
        self.sunrise_duration
    }

    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }
}
