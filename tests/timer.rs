mod tests {
    use embassy_time::{Duration, Instant};
    use rgbw_strip_engine::timer::{ScheduleError, TimerScheduler, claim_slot};

    type TestTimers = TimerScheduler<u8, 2>;

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut timers = TestTimers::new();
        let now = Instant::from_millis(0);
        let handle = timers.schedule(7, Duration::from_millis(0), now).unwrap();

        assert!(timers.pop_fired().is_none());

        timers.advance(now);
        let fired = timers.pop_fired().unwrap();
        assert_eq!(fired.handle, handle);
        assert_eq!(fired.task, 7);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_deadline_not_reached() {
        let mut timers = TestTimers::new();
        timers
            .schedule(1, Duration::from_millis(10), Instant::from_millis(0))
            .unwrap();

        timers.advance(Instant::from_millis(9));
        assert!(timers.pop_fired().is_none());

        timers.advance(Instant::from_millis(10));
        assert_eq!(timers.pop_fired().map(|fired| fired.task), Some(1));
    }

    #[test]
    fn test_earliest_deadline_fires_first() {
        let mut timers = TestTimers::new();
        let start = Instant::from_millis(0);
        timers.schedule(1, Duration::from_millis(10), start).unwrap();
        timers.schedule(2, Duration::from_millis(5), start).unwrap();

        timers.advance(Instant::from_millis(20));
        assert_eq!(timers.pop_fired().map(|fired| fired.task), Some(2));
        assert_eq!(timers.pop_fired().map(|fired| fired.task), Some(1));
        assert!(timers.pop_fired().is_none());
    }

    #[test]
    fn test_rearm_waits_for_next_advance() {
        let mut timers = TestTimers::new();
        let now = Instant::from_millis(0);
        timers.schedule(1, Duration::from_millis(0), now).unwrap();

        timers.advance(now);
        assert!(timers.pop_fired().is_some());

        // Re-armed from the handler with zero delay
        timers.schedule(1, Duration::from_millis(0), now).unwrap();
        assert!(timers.pop_fired().is_none());

        timers.advance(now);
        assert!(timers.pop_fired().is_some());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timers = TestTimers::new();
        let now = Instant::from_millis(0);
        let handle = timers.schedule(1, Duration::from_millis(5), now).unwrap();
        let other = timers.schedule(2, Duration::from_millis(5), now).unwrap();

        timers.cancel(handle);
        timers.cancel(handle);
        assert!(!timers.is_pending(handle));
        assert!(timers.is_pending(other));
        assert_eq!(timers.len(), 1);

        timers.advance(Instant::from_millis(5));
        assert_eq!(timers.pop_fired().map(|fired| fired.task), Some(2));
        // Cancelling a fired handle does nothing
        timers.cancel(other);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_capacity_exhausted() {
        let mut timers = TestTimers::new();
        let now = Instant::from_millis(0);
        timers.schedule(1, Duration::from_millis(1), now).unwrap();
        timers.schedule(2, Duration::from_millis(1), now).unwrap();

        assert_eq!(
            timers.schedule(3, Duration::from_millis(1), now),
            Err(ScheduleError(3))
        );
        assert_eq!(timers.len(), 2);
    }

    #[test]
    fn test_claim_slot_rejects_stale_timer() {
        let mut timers = TestTimers::new();
        let now = Instant::from_millis(0);
        let stale = timers.schedule(1, Duration::from_millis(0), now).unwrap();
        let current = timers.schedule(1, Duration::from_millis(0), now).unwrap();
        let mut slot = Some(current);

        timers.advance(now);
        let first = timers.pop_fired().unwrap();
        assert_eq!(first.handle, stale);
        assert!(!claim_slot(&mut slot, &first));
        assert_eq!(slot, Some(current));

        let second = timers.pop_fired().unwrap();
        assert!(claim_slot(&mut slot, &second));
        assert_eq!(slot, None);
    }
}
