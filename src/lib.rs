#![no_std]

pub mod bounds;
pub mod color;
pub mod effect;
pub mod engine;
pub mod frame_scheduler;
pub mod intent_processor;
pub mod math8;
pub mod operation;
pub mod pixels;
pub mod renderer;
pub mod report;
pub mod timer;
pub mod transition;

pub use color::{GradientConfig, GradientMode, Rgbw, rgbw};
pub use effect::{ColorParams, EffectId, EffectSlot, SunriseAnimator, SunriseConfig};
pub use engine::EffectEngine;
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use intent_processor::{
    HexPayload, IntentChannel, IntentReceiver, IntentSender, LightChangeIntent, LightStateIntent,
};
pub use pixels::{EnableMask, PayloadError, PixelBuffer};
pub use renderer::{LightEngineConfig, OutputGate, Renderer, compose};
pub use report::{AttributesSnapshot, LightSnapshot};
pub use timer::{TimerHandle, TimerScheduler, TimerTask, Timers};
pub use transition::{Fade, TransitionController};

pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to push finished frames to the strip hardware.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgbw]);
}
