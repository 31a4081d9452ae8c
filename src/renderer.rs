use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{BLACK, GradientConfig, GradientMode, Rgbw, scale_rgbw};
use crate::effect::{ColorParams, DEFAULT_COLOR_LOOP_CYCLE, EffectId, SunriseConfig};
use crate::engine::EffectEngine;
use crate::intent_processor::{IntentReceiver, LightChangeIntent, LightStateIntent};
use crate::operation::{Operation, OperationQueue};
use crate::pixels::{EnableMask, PixelBuffer};
use crate::report::{AttributesSnapshot, LightSnapshot};
use crate::timer::{TimerTask, Timers};
use crate::transition::{Fade, TransitionController, TransitionStep};

const DEFAULT_TRANSITION_SECS: u16 = 1;

/// Configuration for the light engine
#[derive(Debug, Clone)]
pub struct LightEngineConfig {
    pub power: bool,
    pub effect: EffectId,
    pub color: ColorParams,
    /// Crossfade duration in seconds
    pub transition: u16,
    pub gradient: GradientConfig,
    pub sunrise: SunriseConfig,
    /// Duration of one full color loop rotation
    pub color_loop_cycle: Duration,
}

impl Default for LightEngineConfig {
    fn default() -> Self {
        Self {
            power: true,
            effect: EffectId::Stable,
            color: ColorParams::default(),
            transition: DEFAULT_TRANSITION_SECS,
            gradient: GradientConfig::default(),
            sunrise: SunriseConfig::default(),
            color_loop_cycle: DEFAULT_COLOR_LOOP_CYCLE,
        }
    }
}

/// How the composer treats enabled pixels this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputGate {
    /// Strip is off, everything black
    Off,
    /// Strip is on, pixel buffer shown as is
    On,
    /// Crossfade running, pixel buffer scaled by the level (0-255)
    Blend(u8),
}

/// Merge pixel buffer, enable mask and power gate into the output frame
///
/// A disabled pixel is black regardless of the gate.
pub fn compose<const N: usize>(
    frame: &mut [Rgbw; N],
    pixels: &PixelBuffer<N>,
    mask: &EnableMask<N>,
    gate: OutputGate,
) {
    for (i, (out, pixel)) in frame.iter_mut().zip(pixels.as_slice()).enumerate() {
        *out = if !mask.is_enabled(i) {
            BLACK
        } else {
            match gate {
                OutputGate::Blend(level) => scale_rgbw(*pixel, level),
                OutputGate::On => *pixel,
                OutputGate::Off => BLACK,
            }
        };
    }
}

/// Light engine context - owns every piece of mutable device state
pub struct Renderer<'a, const N: usize, const INTENT_CHANNEL_SIZE: usize> {
    // External dependencies
    intents: IntentReceiver<'a, INTENT_CHANNEL_SIZE>,

    // Internal state
    power: bool,
    transition_duration: u16,
    changed: bool,
    frame: [Rgbw; N],

    // Internal dependencies
    timers: Timers,
    engine: EffectEngine<N>,
    transition: TransitionController,
}

impl<'a, const N: usize, const INTENT_CHANNEL_SIZE: usize> Renderer<'a, N, INTENT_CHANNEL_SIZE> {
    /// Create a new renderer and activate the configured effect if powered on
    pub fn new(
        intents: IntentReceiver<'a, INTENT_CHANNEL_SIZE>,
        config: &LightEngineConfig,
        now: Instant,
    ) -> Self {
        let mut renderer = Self {
            intents,
            power: config.power,
            transition_duration: config.transition,
            changed: false,
            frame: [BLACK; N],
            timers: Timers::new(),
            engine: EffectEngine::new(
                config.color,
                config.gradient,
                config.sunrise,
                config.color_loop_cycle,
                config.effect,
            ),
            transition: TransitionController::new(),
        };
        if renderer.power {
            renderer.engine.activate(&mut renderer.timers, now);
        }
        renderer
    }

    /// Process one frame
    ///
    /// Applies pending intents, runs due timers, repaints animated effects
    /// and composes the frame to push to the strip.
    pub fn render(&mut self, now: Instant) -> &[Rgbw] {
        self.process_intents(now);
        self.run_timers(now);
        self.engine.tick(now);

        let gate = self.gate();
        compose(&mut self.frame, self.engine.pixels(), self.engine.mask(), gate);

        &self.frame
    }

    /// Drain the intent channel (non-blocking)
    fn process_intents(&mut self, now: Instant) {
        while let Ok(intent) = self.intents.try_receive() {
            self.apply(intent, now);
        }
    }

    /// Apply an intent synchronously
    ///
    /// Malformed intents are dropped and leave the state untouched.
    pub fn apply(&mut self, intent: LightChangeIntent, now: Instant) {
        match intent {
            LightChangeIntent::State(state) => self.apply_state(&state, now),
            LightChangeIntent::Gradient { mode, extent } => {
                let Some(gradient) =
                    GradientMode::from_char(mode).and_then(|mode| GradientConfig::new(mode, extent))
                else {
                    #[cfg(feature = "esp32-log")]
                    println!("[Renderer.apply] invalid gradient {:?} {}", mode, extent);
                    return;
                };
                self.engine.set_gradient(gradient);
            }
            LightChangeIntent::CustomPixels(payload) => {
                if let Err(_error) = self.engine.set_custom_pixels(&payload) {
                    #[cfg(feature = "esp32-log")]
                    println!("[Renderer.apply] custom pixels dropped: {:?}", _error);
                    return;
                }
            }
            LightChangeIntent::EnabledMask(payload) => {
                if let Err(_error) = self.engine.set_enabled_mask(&payload) {
                    #[cfg(feature = "esp32-log")]
                    println!("[Renderer.apply] enable mask dropped: {:?}", _error);
                    return;
                }
            }
            LightChangeIntent::WakeAlarm(duration) => {
                let edge = self.set_power(true, now);
                self.engine.start_sunrise(duration, &mut self.timers, now);
                if edge {
                    self.start_transition(Fade::In, now);
                }
            }
        }
        self.changed = true;
    }

    /// Apply a state intent field by field, then start the crossfade
    fn apply_state(&mut self, intent: &LightStateIntent, now: Instant) {
        let mut queue = OperationQueue::from_intent(intent);
        let mut power_edge = false;

        while let Some(operation) = queue.pop() {
            match operation {
                Operation::SetPower(on) => power_edge |= self.set_power(on, now),
                Operation::SetTransition(duration) => self.transition_duration = duration,
                Operation::SetRed(red) => self.engine.set_red(red, &mut self.timers, now),
                Operation::SetGreen(green) => {
                    self.engine.set_green(green, &mut self.timers, now);
                }
                Operation::SetBlue(blue) => self.engine.set_blue(blue, &mut self.timers, now),
                Operation::SetWhite(white) => {
                    self.engine.set_white(white, &mut self.timers, now);
                }
                Operation::SetBrightness(brightness) => {
                    self.engine.set_brightness(brightness, &mut self.timers, now);
                }
                Operation::SetEffect(effect) => {
                    self.engine.set_effect(effect, &mut self.timers, now);
                }
            }
        }

        if power_edge {
            let direction = if self.power { Fade::In } else { Fade::Out };
            self.start_transition(direction, now);
        } else if self.power && intent.transition.is_some() && intent.has_parameters() {
            self.start_transition(Fade::In, now);
        }
    }

    /// Update the power flag, returns whether it flipped
    ///
    /// Switching on re-activates a stopped effect right away; switching off
    /// leaves the effect running until the fade-out completes.
    fn set_power(&mut self, on: bool, now: Instant) -> bool {
        if on == self.power {
            return false;
        }
        self.power = on;
        if on {
            self.engine.resume(&mut self.timers, now);
        }
        true
    }

    fn start_transition(&mut self, direction: Fade, now: Instant) {
        let step = self
            .transition
            .start(direction, self.transition_duration, &mut self.timers, now);
        self.on_transition_step(step);
    }

    fn on_transition_step(&mut self, step: TransitionStep) {
        if step == TransitionStep::Finished(Fade::Out) {
            // Faded to black, freeze the animation engine
            self.engine.stop(&mut self.timers);
        }
    }

    /// Fire every due timer and dispatch it to its owner
    fn run_timers(&mut self, now: Instant) {
        self.timers.advance(now);
        while let Some(fired) = self.timers.pop_fired() {
            match fired.task {
                TimerTask::TransitionStep => {
                    let step = self.transition.on_step(&fired, &mut self.timers, now);
                    self.on_transition_step(step);
                }
                TimerTask::SunPhase | TimerTask::SunFade | TimerTask::WhiteLevel => {
                    self.engine.on_timer(&fired, &mut self.timers, now);
                }
            }
        }
    }

    fn gate(&self) -> OutputGate {
        if self.transition.is_active() {
            OutputGate::Blend(self.transition.level())
        } else if self.power {
            OutputGate::On
        } else {
            OutputGate::Off
        }
    }

    /// Returns whether an intent was applied since the last call
    pub fn take_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }

    pub fn snapshot(&self) -> LightSnapshot {
        let params = self.engine.params();
        LightSnapshot {
            power: self.power,
            transition: self.transition_duration,
            red: params.red,
            green: params.green,
            blue: params.blue,
            white: params.white,
            brightness: params.brightness,
            effect: self.engine.effect_id(),
        }
    }

    pub fn attributes(&self) -> AttributesSnapshot {
        AttributesSnapshot {
            pixel_count: N,
            gradient: self.engine.gradient(),
        }
    }

    /// Last composed frame
    pub const fn frame(&self) -> &[Rgbw; N] {
        &self.frame
    }

    pub const fn engine(&self) -> &EffectEngine<N> {
        &self.engine
    }

    pub const fn timers(&self) -> &Timers {
        &self.timers
    }

    pub const fn transition(&self) -> &TransitionController {
        &self.transition
    }

    pub const fn is_on(&self) -> bool {
        self.power
    }

    pub const fn transition_duration(&self) -> u16 {
        self.transition_duration
    }
}
