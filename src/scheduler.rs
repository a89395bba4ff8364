//! Fixed-timestep frame scheduler
//!
//! Decouples the simulation rate from the host's frame rate with the usual
//! accumulator pattern: each frame banks the elapsed time and drains it in
//! whole timesteps. Two wrinkles keep it well-behaved:
//! - On start the accumulator is primed with one timestep, so the first
//!   frame always runs one update.
//! - A frame that arrives three or more timesteps late (tab hidden, debug
//!   pause) resets the bank to exactly one timestep instead of replaying
//!   the gap.
//!
//! Frames come from an injected [`FrameSource`] so the loop works the same
//! whether the host is an event loop or a plain thread with a sleep.

/// Token for a requested frame, used to cancel it on stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub u64);

/// Host facility that delivers frame callbacks.
///
/// `request` schedules one future call to [`Scheduler::on_frame`] and
/// returns a token; `cancel` revokes a not-yet-delivered request.
pub trait FrameSource {
    fn request(&mut self) -> FrameHandle;
    fn cancel(&mut self, handle: FrameHandle);
}

/// Per-frame work driven by the scheduler.
///
/// `update` runs once per drained timestep, `render` once per frame that
/// drained at least one step, `after_tick` once per frame no matter what.
pub trait TickHooks {
    type Error;

    fn update(&mut self) -> Result<(), Self::Error>;
    fn render(&mut self) -> Result<(), Self::Error>;
    fn after_tick(&mut self) -> Result<(), Self::Error>;
}

/// Fixed-timestep loop state.
pub struct Scheduler<F: FrameSource> {
    frames: F,
    timestep: f64,
    accumulator: f64,
    prev_time: f64,
    running: bool,
    pending: Option<FrameHandle>,
}

impl<F: FrameSource> Scheduler<F> {
    /// `timestep` is the simulation step in seconds and must be positive.
    pub fn new(frames: F, timestep: f64) -> Self {
        assert!(timestep > 0.0);
        Self {
            frames,
            timestep,
            accumulator: 0.0,
            prev_time: 0.0,
            running: false,
            pending: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start the loop. `now` is the current clock reading; elapsed time is
    /// measured from here. Must not be called while already running.
    pub fn start(&mut self, now: f64) {
        debug_assert!(!self.running, "scheduler started twice");
        self.running = true;
        self.prev_time = now;
        // Prime one step so the first frame always updates
        self.accumulator = self.timestep;
        self.pending = Some(self.frames.request());
    }

    /// Stop the loop and cancel any pending frame. Idempotent.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.frames.cancel(handle);
        }
        log::debug!("scheduler stopped");
    }

    /// Handle one delivered frame at clock reading `now`.
    ///
    /// The next frame is requested up front, before any hook runs, so a
    /// slow update cannot starve the loop. A hook error stops the loop and
    /// propagates.
    pub fn on_frame<H: TickHooks>(&mut self, now: f64, hooks: &mut H) -> Result<(), H::Error> {
        if !self.running {
            return Ok(());
        }
        self.pending = Some(self.frames.request());

        self.accumulator += now - self.prev_time;
        self.prev_time = now;

        // Late frame: drop the backlog, run a single catch-up step
        if self.accumulator >= 3.0 * self.timestep {
            self.accumulator = self.timestep;
        }

        let mut updated = false;
        while self.accumulator >= self.timestep {
            if let Err(err) = hooks.update() {
                self.stop();
                return Err(err);
            }
            self.accumulator -= self.timestep;
            updated = true;
        }

        if updated {
            if let Err(err) = hooks.render() {
                self.stop();
                return Err(err);
            }
        }

        if let Err(err) = hooks.after_tick() {
            self.stop();
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frame source that just counts requests and cancels.
    #[derive(Default)]
    struct CountingFrames {
        next: u64,
        requested: u64,
        cancelled: Vec<u64>,
    }

    impl FrameSource for CountingFrames {
        fn request(&mut self) -> FrameHandle {
            self.next += 1;
            self.requested += 1;
            FrameHandle(self.next)
        }

        fn cancel(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle.0);
        }
    }

    struct Counter {
        updates: u32,
        renders: u32,
        after_ticks: u32,
        fail_update_at: Option<u32>,
    }

    impl Counter {
        fn new() -> Self {
            Self {
                updates: 0,
                renders: 0,
                after_ticks: 0,
                fail_update_at: None,
            }
        }
    }

    impl TickHooks for Counter {
        type Error = String;

        fn update(&mut self) -> Result<(), String> {
            self.updates += 1;
            if self.fail_update_at == Some(self.updates) {
                return Err("boom".to_string());
            }
            Ok(())
        }

        fn render(&mut self) -> Result<(), String> {
            self.renders += 1;
            Ok(())
        }

        fn after_tick(&mut self) -> Result<(), String> {
            self.after_ticks += 1;
            Ok(())
        }
    }

    const STEP: f64 = 0.1;

    #[test]
    fn test_first_frame_runs_exactly_one_update() {
        let mut sched = Scheduler::new(CountingFrames::default(), STEP);
        let mut hooks = Counter::new();

        sched.start(0.0);
        // Zero elapsed time; the primed accumulator still yields one step
        sched.on_frame(0.0, &mut hooks).unwrap();

        assert_eq!(hooks.updates, 1);
        assert_eq!(hooks.renders, 1);
        assert_eq!(hooks.after_ticks, 1);
    }

    #[test]
    fn test_short_frame_skips_update_but_runs_after_tick() {
        let mut sched = Scheduler::new(CountingFrames::default(), STEP);
        let mut hooks = Counter::new();

        sched.start(0.0);
        sched.on_frame(0.0, &mut hooks).unwrap();
        // Half a timestep elapsed: no update, no render
        sched.on_frame(0.05, &mut hooks).unwrap();

        assert_eq!(hooks.updates, 1);
        assert_eq!(hooks.renders, 1);
        assert_eq!(hooks.after_ticks, 2);
    }

    #[test]
    fn test_drains_whole_steps() {
        let mut sched = Scheduler::new(CountingFrames::default(), STEP);
        let mut hooks = Counter::new();

        sched.start(0.0);
        sched.on_frame(0.0, &mut hooks).unwrap();
        // 0.25s elapsed plus 0 banked: two whole steps, 0.05 left over
        sched.on_frame(0.25, &mut hooks).unwrap();

        assert_eq!(hooks.updates, 3);
        assert_eq!(hooks.renders, 2);
    }

    #[test]
    fn test_late_frame_collapses_to_single_step() {
        let mut sched = Scheduler::new(CountingFrames::default(), STEP);
        let mut hooks = Counter::new();

        sched.start(0.0);
        sched.on_frame(0.0, &mut hooks).unwrap();
        // Ten timesteps late: runs one catch-up step, not ten
        sched.on_frame(1.0, &mut hooks).unwrap();

        assert_eq!(hooks.updates, 2);
    }

    #[test]
    fn test_stop_cancels_pending_and_is_idempotent() {
        let mut sched = Scheduler::new(CountingFrames::default(), STEP);
        let mut hooks = Counter::new();

        sched.start(0.0);
        sched.stop();
        sched.stop();

        assert!(!sched.is_running());
        assert_eq!(sched.frames.cancelled, vec![1]);

        // Frames delivered after stop are ignored
        sched.on_frame(5.0, &mut hooks).unwrap();
        assert_eq!(hooks.updates, 0);
        assert_eq!(hooks.after_ticks, 0);
    }

    #[test]
    fn test_hook_error_stops_the_loop() {
        let mut sched = Scheduler::new(CountingFrames::default(), STEP);
        let mut hooks = Counter::new();
        hooks.fail_update_at = Some(1);

        sched.start(0.0);
        let err = sched.on_frame(0.0, &mut hooks);

        assert_eq!(err, Err("boom".to_string()));
        assert!(!sched.is_running());
        // The frame requested at the top of on_frame was cancelled by stop
        assert!(!sched.frames.cancelled.is_empty());
    }

    #[test]
    fn test_each_frame_requests_the_next() {
        let mut sched = Scheduler::new(CountingFrames::default(), STEP);
        let mut hooks = Counter::new();

        sched.start(0.0);
        sched.on_frame(0.0, &mut hooks).unwrap();
        sched.on_frame(0.1, &mut hooks).unwrap();

        // One from start, one per frame
        assert_eq!(sched.frames.requested, 3);
    }
}
