//! Power crossfade
//!
//! A 0-255 step counter walks down to zero on its own re-arming timer. While
//! it is nonzero the render composer scales every pixel by the fade level:
//! `counter / 255` when fading out, its complement when fading in.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::timer::{Fired, TimerHandle, TimerTask, Timers, cancel_slot, claim_slot};

const FULL: u8 = 255;

/// Durations at or below this many seconds use double steps
const SHORT_DURATION_SECS: u16 = 1;

/// Direction of a crossfade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    /// From black up to the pixel buffer
    In,
    /// From the pixel buffer down to black
    Out,
}

/// Result of one transition step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStep {
    /// Counter still running, next step armed
    Running,
    /// Counter reached zero
    Finished(Fade),
    /// Fired timer no longer belongs to the controller
    Stale,
}

/// Power crossfade state
#[derive(Debug, Clone)]
pub struct TransitionController {
    counter: u8,
    direction: Fade,
    step: u8,
    duration: u16,
    timer: Option<TimerHandle>,
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionController {
    pub const fn new() -> Self {
        Self {
            counter: 0,
            direction: Fade::In,
            step: 1,
            duration: 0,
            timer: None,
        }
    }

    /// Start fading in `direction` over `duration` seconds
    ///
    /// Reversing a running fade continues from the current level instead of
    /// jumping back to the start. Reversing a fade that has not stepped yet
    /// leaves nothing to fade and returns `Finished` right away.
    pub fn start(
        &mut self,
        direction: Fade,
        duration: u16,
        timers: &mut Timers,
        now: Instant,
    ) -> TransitionStep {
        cancel_slot(timers, &mut self.timer);

        self.counter = if self.is_active() && direction != self.direction {
            FULL - self.counter
        } else {
            FULL
        };
        self.direction = direction;
        self.duration = duration;
        self.step = if duration <= SHORT_DURATION_SECS { 2 } else { 1 };

        #[cfg(feature = "esp32-log")]
        println!(
            "[Transition.start] {:?} over {}s, step {}",
            direction, duration, self.step
        );

        if self.counter == 0 {
            return TransitionStep::Finished(direction);
        }
        self.arm(timers, now);
        TransitionStep::Running
    }

    /// Delay between two steps
    pub fn step_interval(&self) -> Duration {
        let step = u64::from(self.step);
        Duration::from_millis(u64::from(self.duration) * 1000 / step / u64::from(FULL))
    }

    fn arm(&mut self, timers: &mut Timers, now: Instant) {
        let interval = self.step_interval();
        self.timer = timers
            .schedule(TimerTask::TransitionStep, interval, now)
            .ok();
    }

    /// Advance the counter for a fired step timer
    pub fn on_step(
        &mut self,
        fired: &Fired<TimerTask>,
        timers: &mut Timers,
        now: Instant,
    ) -> TransitionStep {
        if !claim_slot(&mut self.timer, fired) {
            return TransitionStep::Stale;
        }
        self.counter = self.counter.saturating_sub(self.step);
        if self.counter > 0 {
            self.arm(timers, now);
            return TransitionStep::Running;
        }

        #[cfg(feature = "esp32-log")]
        println!("[Transition.on_step] {:?} finished", self.direction);

        TransitionStep::Finished(self.direction)
    }

    /// Whether the composer should blend
    pub const fn is_active(&self) -> bool {
        self.counter > 0
    }

    /// Scale factor applied to the pixel buffer (0-255)
    pub const fn level(&self) -> u8 {
        match self.direction {
            Fade::Out => self.counter,
            Fade::In => FULL - self.counter,
        }
    }

    pub const fn counter(&self) -> u8 {
        self.counter
    }

    pub const fn direction(&self) -> Fade {
        self.direction
    }

    pub const fn step_size(&self) -> u8 {
        self.step
    }
}
