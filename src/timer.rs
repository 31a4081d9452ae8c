//! Cooperative one-shot timer scheduler
//!
//! Timers never preempt anything. The render loop opens a tick with
//! [`TimerScheduler::advance`] and then drains fired timers one at a time with
//! [`TimerScheduler::pop_fired`]. A task that wants to repeat simply schedules
//! itself again from its handler, and stops repeating by not doing so.
//!
//! Timers armed while a tick is being drained only become eligible on the next
//! `advance`, so a zero-delay re-arm can never spin inside a single tick.

use embassy_time::{Duration, Instant};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Maximum number of concurrently pending timers.
///
/// Sunrise owns three re-arming timers and the transition controller one.
pub const MAX_PENDING_TIMERS: usize = 4;

/// Every re-arming task known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Sunrise master phase counter
    SunPhase,
    /// Sunrise disk edge fade step
    SunFade,
    /// Sunrise ambient white ramp
    WhiteLevel,
    /// Power crossfade step
    TransitionStep,
}

/// Scheduler type used by the engine
pub type Timers = TimerScheduler<TimerTask, MAX_PENDING_TIMERS>;

/// Opaque handle of a scheduled timer
///
/// Cancelling a handle that already fired or was already cancelled is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u32);

/// Error returned when every timer slot is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleError<T>(pub T);

/// A timer taken out of the scheduler because its deadline passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired<T> {
    pub handle: TimerHandle,
    pub task: T,
}

#[derive(Debug, Clone, Copy)]
struct Pending<T> {
    handle: TimerHandle,
    deadline: Instant,
    task: T,
    /// Armed during the current tick, not eligible until the next `advance`
    fresh: bool,
}

/// Single-threaded cooperative timer scheduler
#[derive(Debug)]
pub struct TimerScheduler<T: Copy, const N: usize> {
    pending: Vec<Pending<T>, N>,
    now: Instant,
    next_id: u32,
}

impl<T: Copy, const N: usize> Default for TimerScheduler<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> TimerScheduler<T, N> {
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
            now: Instant::from_millis(0),
            next_id: 0,
        }
    }

    /// Register a one-shot task to fire no earlier than `now + delay`
    ///
    /// A zero delay fires on the next `advance`.
    pub fn schedule(
        &mut self,
        task: T,
        delay: Duration,
        now: Instant,
    ) -> Result<TimerHandle, ScheduleError<T>> {
        let handle = TimerHandle(self.next_id);
        let entry = Pending {
            handle,
            deadline: now + delay,
            task,
            fresh: true,
        };
        if self.pending.push(entry).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[Timers.schedule] no free slot, task dropped");
            return Err(ScheduleError(task));
        }
        self.next_id = self.next_id.wrapping_add(1);
        Ok(handle)
    }

    /// Remove a pending timer
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|entry| entry.handle != handle);
    }

    /// Open a new tick at `now`
    ///
    /// Every timer pending at this point whose deadline is not after `now`
    /// becomes eligible for [`pop_fired`](Self::pop_fired).
    pub fn advance(&mut self, now: Instant) {
        self.now = now;
        for entry in &mut self.pending {
            entry.fresh = false;
        }
    }

    /// Take the earliest eligible timer out of the scheduler
    pub fn pop_fired(&mut self) -> Option<Fired<T>> {
        let now = self.now;
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.fresh && entry.deadline <= now)
            .min_by_key(|(_, entry)| entry.deadline)
            .map(|(index, _)| index)?;
        let entry = self.pending.remove(index);
        Some(Fired {
            handle: entry.handle,
            task: entry.task,
        })
    }

    /// Check whether a handle still refers to a pending timer
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|entry| entry.handle == handle)
    }

    /// Count pending timers running the given task
    pub fn count_task(&self, task: T) -> usize
    where
        T: PartialEq,
    {
        self.pending.iter().filter(|entry| entry.task == task).count()
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Cancel the timer held in `slot`, if any, leaving the slot empty
pub fn cancel_slot<T: Copy, const N: usize>(
    timers: &mut TimerScheduler<T, N>,
    slot: &mut Option<TimerHandle>,
) {
    if let Some(handle) = slot.take() {
        timers.cancel(handle);
    }
}

/// Consume a fired handle if it belongs to `slot`
///
/// Returns `false` for a timer the slot no longer owns.
pub fn claim_slot<T>(slot: &mut Option<TimerHandle>, fired: &Fired<T>) -> bool {
    if *slot == Some(fired.handle) {
        *slot = None;
        true
    } else {
        false
    }
}
