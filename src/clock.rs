//! Autoplay Clock
//!
//! A Stopped/Running state machine that advances the time cursor by a fixed
//! step of 1 unit per tick at a configurable real-time cadence. The interval
//! controls only the tick rate, never the step size.
//!
//! The controller never owns a thread or timer itself: scheduling goes through
//! the [`TickScheduler`] seam, so the presentation shell plugs in its event
//! loop's single-shot timer and tests drive ticks by hand. At most one timer
//! handle is outstanding per controller; `start()` replaces and `stop()`
//! cancels it synchronously, and a handle that was cancelled or superseded is
//! rejected when it fires late.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Floor for the tick interval. Anything non-finite or smaller is clamped
/// here so the scheduler never sees a zero or negative delay.
pub const MIN_INTERVAL_SECS: f64 = 0.001;

/// Ceiling for the tick interval. Finite but absurd values clamp here, well
/// inside what a `Duration` can hold.
pub const MAX_INTERVAL_SECS: f64 = 3600.0;

/// Opaque handle for one scheduled tick, allocated by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// The shell's single-shot timer facility.
///
/// `schedule` arms a one-shot callback after `delay` and returns its handle;
/// `cancel` revokes a handle that has not fired yet. Cancelling an unknown or
/// already-fired handle must be a no-op.
pub trait TickScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId;
    fn cancel(&mut self, timer: TimerId);
}

/// Serializable snapshot of the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockState {
    pub running: bool,
    pub interval_secs: f64,
}

/// Advance the time cursor by one tick step: +1 clamped to 100, then wrap
/// to 0 on the tick after the end is reached.
pub fn advance(t: f64) -> f64 {
    if t < 100.0 {
        (t + 1.0).min(100.0)
    } else {
        0.0
    }
}

/// The autoplay state machine.
#[derive(Debug)]
pub struct ClockController {
    running: bool,
    interval: Duration,
    pending: Option<TimerId>,
}

impl ClockController {
    pub fn new() -> Self {
        Self {
            running: false,
            interval: Duration::from_secs(1),
            pending: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Handle of the tick currently scheduled, if any.
    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    pub fn snapshot(&self) -> ClockState {
        ClockState {
            running: self.running,
            interval_secs: self.interval.as_secs_f64(),
        }
    }

    /// Set the tick cadence. Non-finite or non-positive values clamp to
    /// [`MIN_INTERVAL_SECS`], oversized ones to [`MAX_INTERVAL_SECS`]; no
    /// input fails. Takes effect from the next scheduling point; an
    /// already-pending tick keeps its original delay.
    pub fn set_interval_secs(&mut self, secs: f64) {
        let secs = if secs.is_finite() {
            secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS)
        } else {
            MIN_INTERVAL_SECS
        };
        self.interval = Duration::from_secs_f64(secs);
    }

    /// Stopped -> Running. Schedules the first tick after one interval.
    ///
    /// Returns the value the time cursor must be reset to (`Some(0.0)` when
    /// starting from the end of the axis), or `None` when the cursor stays
    /// put. No-op when already running.
    pub fn start(
        &mut self,
        current_time: f64,
        scheduler: &mut dyn TickScheduler,
    ) -> Option<f64> {
        if self.running {
            return None;
        }
        if let Some(old) = self.pending.take() {
            scheduler.cancel(old);
        }
        self.running = true;
        let reset = (current_time >= 100.0).then_some(0.0);
        self.pending = Some(scheduler.schedule(self.interval));
        reset
    }

    /// Running -> Stopped. Cancels the pending tick. Idempotent.
    pub fn stop(&mut self, scheduler: &mut dyn TickScheduler) {
        self.running = false;
        if let Some(timer) = self.pending.take() {
            scheduler.cancel(timer);
        }
    }

    /// A scheduled tick fired. Returns the new time cursor value and arms the
    /// next tick, or `None` when the firing is stale (stopped, or the handle
    /// was superseded) and must be ignored.
    pub fn tick(
        &mut self,
        timer: TimerId,
        current_time: f64,
        scheduler: &mut dyn TickScheduler,
    ) -> Option<f64> {
        if !self.running || self.pending != Some(timer) {
            return None;
        }
        self.pending = Some(scheduler.schedule(self.interval));
        Some(advance(current_time))
    }
}

impl Default for ClockController {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Manual Scheduler
// =============================================================================

/// A [`TickScheduler`] driven by hand: nothing fires until the caller asks
/// for the pending handle and feeds it back to the controller. Used by the
/// demos and tests; a real shell wraps its event-loop timer instead.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<(TimerId, Duration)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the oldest armed timer, if any.
    pub fn pending(&self) -> Option<TimerId> {
        self.pending.first().map(|(id, _)| *id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_delay(&self) -> Option<Duration> {
        self.pending.first().map(|(_, delay)| *delay)
    }

    /// Pop the oldest armed timer, as if its delay elapsed.
    pub fn fire(&mut self) -> Option<TimerId> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0).0)
        }
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push((id, delay));
        id
    }

    fn cancel(&mut self, timer: TimerId) {
        self.pending.retain(|(id, _)| *id != timer);
    }
}
