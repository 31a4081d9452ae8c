//! Frame pacing for the render loop.
//!
//! Runs one render tick, pushes the frame to the output driver and tells the
//! caller how long to wait before the next one. Sleeping is left to the
//! caller so this works with any executor or a bare busy loop.

use embassy_time::{Duration, Instant};

use crate::{OutputDriver, Renderer};

/// Default target frame rate (90 FPS).
pub const DEFAULT_FPS: u32 = 90;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Frames the loop may lag before it stops trying to catch up.
const MAX_LAG_FRAMES: u64 = 2;

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Main loop driver pairing a renderer with its output driver
///
/// ```ignore
/// let mut frames = FrameScheduler::new(renderer, strip);
/// loop {
///     let result = frames.tick(Instant::now());
///     Timer::after(result.sleep_duration).await;
/// }
/// ```
pub struct FrameScheduler<'a, O: OutputDriver, const N: usize, const INTENT_CHANNEL_SIZE: usize> {
    output: O,
    renderer: Renderer<'a, N, INTENT_CHANNEL_SIZE>,
    next_frame: Option<Instant>,
    frame_duration: Duration,
}

impl<'a, O: OutputDriver, const N: usize, const INTENT_CHANNEL_SIZE: usize>
    FrameScheduler<'a, O, N, INTENT_CHANNEL_SIZE>
{
    /// Create a frame scheduler running at `DEFAULT_FPS`.
    pub fn new(renderer: Renderer<'a, N, INTENT_CHANNEL_SIZE>, output: O) -> Self {
        Self::with_frame_duration(renderer, output, DEFAULT_FRAME_DURATION)
    }

    /// Create a frame scheduler with a custom frame duration.
    pub fn with_frame_duration(
        renderer: Renderer<'a, N, INTENT_CHANNEL_SIZE>,
        output: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output,
            renderer,
            next_frame: None,
            frame_duration,
        }
    }

    /// Render and push one frame, returning when the next one is due.
    ///
    /// After a stall longer than two frames the schedule restarts from `now`
    /// rather than rendering a burst of catch-up frames.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_lag = self.frame_duration.as_millis() * MAX_LAG_FRAMES;
        let deadline = match self.next_frame {
            Some(deadline) if now.as_millis() <= deadline.as_millis() + max_lag => deadline,
            _ => now,
        };

        let frame = self.renderer.render(now);
        self.output.write(frame);

        let next_deadline = deadline + self.frame_duration;
        self.next_frame = Some(next_deadline);

        FrameResult {
            next_deadline,
            sleep_duration: next_deadline
                .checked_duration_since(now)
                .unwrap_or(Duration::from_millis(0)),
        }
    }

    pub fn renderer(&self) -> &Renderer<'a, N, INTENT_CHANNEL_SIZE> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<'a, N, INTENT_CHANNEL_SIZE> {
        &mut self.renderer
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
