//! Simulator
//!
//! The single owner of the visualizer state: envelope breakpoints, time
//! cursor, viewport and the autoplay clock. All mutation flows through
//! [`Simulator::apply`] as typed events; every accepted event yields a fresh
//! [`RenderFrame`] for the presentation shell to draw, so state and picture
//! can never drift apart.
//!
//! Time writes carry an [`Origin`]. A user write while the clock runs stops
//! the clock before the write lands (scrubbing always wins over autoplay); a
//! clock write never does. No reentrancy flag: the rule is a pure function of
//! the event.

use crate::clock::{ClockController, ClockState, TickScheduler, TimerId};
use crate::envelope::{AmplitudeSample, EnvelopeParams};
use crate::geometry::Viewport;
use crate::render::{Primitive, RenderPlanner};
use serde::{Deserialize, Serialize};

/// Who is writing the time cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    User,
    Clock,
}

/// One state mutation. Breakpoints and the cursor clamp to [0, 100] on entry
/// and non-finite values for them are dropped as invalid input; the interval
/// instead clamps to the clock's floor/ceiling, so any value is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SimEvent {
    SetAttack { value: f64 },
    SetDecay { value: f64 },
    SetTime { value: f64, origin: Origin },
    SetInterval { secs: f64 },
    TogglePlay,
    Resize { width: f64, height: f64 },
    TimerFired { timer: TimerId },
}

/// Numeric field a text edit targets, for the spinbox/entry path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlField {
    Attack,
    Decay,
    Time,
    Interval,
}

/// Rejected inbound input. Recovered silently by the simulator: the event is
/// dropped, previous state is retained, no frame is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    InvalidNumeric(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::InvalidNumeric(text) => {
                write!(f, "not a numeric value: {:?}", text)
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Parse one numeric field edit. Accepts anything `f64` parses, except
/// non-finite values.
pub fn parse_field(text: &str) -> Result<f64, InputError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::InvalidNumeric(text.to_string()))
}

/// Everything the shell needs to redraw after one state change. The numeric
/// readouts are preformatted to two decimals, matching the on-screen fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub norm_attack: String,
    pub norm_decay: String,
    pub amplitude: String,
    pub primitives: Vec<Primitive>,
}

/// The visualizer core. Single-threaded; the shell serializes events into
/// [`Simulator::apply`] one at a time.
#[derive(Debug)]
pub struct Simulator {
    params: EnvelopeParams,
    time: f64,
    viewport: Viewport,
    clock: ClockController,
    planner: RenderPlanner,
}

impl Simulator {
    pub fn new() -> Self {
        Self {
            params: EnvelopeParams::default(),
            time: 0.0,
            viewport: Viewport::default(),
            clock: ClockController::new(),
            planner: RenderPlanner::new(),
        }
    }

    pub fn with_planner(planner: RenderPlanner) -> Self {
        Self {
            planner,
            ..Self::new()
        }
    }

    pub fn params(&self) -> &EnvelopeParams {
        &self.params
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_running()
    }

    pub fn clock_state(&self) -> ClockState {
        self.clock.snapshot()
    }

    /// Current amplitude sample, recomputed on demand.
    pub fn sample(&self) -> AmplitudeSample {
        self.params.sample(self.time)
    }

    /// Apply one event. Returns the frame to draw, or `None` when the event
    /// was rejected (non-finite value, stale timer) and nothing changed.
    pub fn apply(
        &mut self,
        event: SimEvent,
        scheduler: &mut dyn TickScheduler,
    ) -> Option<RenderFrame> {
        match event {
            SimEvent::SetAttack { value } => {
                self.params.attack = sanitize(value)?;
            }
            SimEvent::SetDecay { value } => {
                self.params.decay = sanitize(value)?;
            }
            SimEvent::SetTime { value, origin } => {
                let value = sanitize(value)?;
                // Checked before the write lands, keyed on the event origin.
                if origin == Origin::User && self.clock.is_running() {
                    self.clock.stop(scheduler);
                }
                self.time = value;
            }
            SimEvent::SetInterval { secs } => {
                // Clamps rather than rejects: the clock floors/ceilings any
                // value, so an interval edit never fails.
                self.clock.set_interval_secs(secs);
            }
            SimEvent::TogglePlay => {
                if self.clock.is_running() {
                    self.clock.stop(scheduler);
                } else if let Some(reset) = self.clock.start(self.time, scheduler) {
                    self.time = reset;
                }
            }
            SimEvent::Resize { width, height } => {
                if !(width.is_finite() && height.is_finite()) {
                    return None;
                }
                self.viewport.width = width;
                self.viewport.height = height;
            }
            SimEvent::TimerFired { timer } => {
                self.time = self.clock.tick(timer, self.time, scheduler)?;
            }
        }
        Some(self.frame())
    }

    /// Text-edit path for the numeric fields. Malformed input is swallowed:
    /// previous state retained, no frame.
    pub fn apply_text(
        &mut self,
        field: ControlField,
        text: &str,
        scheduler: &mut dyn TickScheduler,
    ) -> Option<RenderFrame> {
        let value = parse_field(text).ok()?;
        let event = match field {
            ControlField::Attack => SimEvent::SetAttack { value },
            ControlField::Decay => SimEvent::SetDecay { value },
            ControlField::Time => SimEvent::SetTime {
                value,
                origin: Origin::User,
            },
            ControlField::Interval => SimEvent::SetInterval { secs: value },
        };
        self.apply(event, scheduler)
    }

    /// Build the outbound frame from the current state.
    pub fn frame(&self) -> RenderFrame {
        let sample = self.sample();
        RenderFrame {
            norm_attack: format!("{:.2}", sample.norm_attack),
            norm_decay: format!("{:.2}", sample.norm_decay),
            amplitude: format!("{:.2}", sample.amplitude),
            primitives: self.planner.plan(&self.params, self.time, self.viewport),
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp an inbound breakpoint/cursor value to the [0, 100] axis; reject
/// non-finite input.
fn sanitize(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualScheduler;
    use approx::assert_relative_eq;

    fn user_time(value: f64) -> SimEvent {
        SimEvent::SetTime {
            value,
            origin: Origin::User,
        }
    }

    #[test]
    fn default_control_values() {
        let sim = Simulator::new();
        assert_relative_eq!(sim.params().attack, 20.0);
        assert_relative_eq!(sim.params().decay, 100.0);
        assert_relative_eq!(sim.time(), 0.0);
        assert_relative_eq!(sim.clock_state().interval_secs, 1.0);
        assert!(!sim.is_playing());
    }

    #[test]
    fn every_accepted_event_yields_a_frame() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();

        let frame = sim.apply(user_time(60.0), &mut sched).unwrap();
        assert_eq!(frame.norm_attack, "0.00");
        assert_eq!(frame.norm_decay, "0.50");
        assert_eq!(frame.amplitude, "0.50");
        assert!(!frame.primitives.is_empty());

        let frame = sim.apply(user_time(20.0), &mut sched).unwrap();
        assert_eq!(frame.norm_attack, "1.00");
        assert_eq!(frame.amplitude, "1.00");
    }

    #[test]
    fn breakpoints_clamp_to_the_axis() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();
        sim.apply(SimEvent::SetAttack { value: 250.0 }, &mut sched).unwrap();
        sim.apply(SimEvent::SetDecay { value: -3.0 }, &mut sched).unwrap();
        assert_relative_eq!(sim.params().attack, 100.0);
        assert_relative_eq!(sim.params().decay, 0.0);
        // Derived ordering still holds for rendering and sampling.
        assert_relative_eq!(sim.params().effective_decay(), 100.0);
    }

    #[test]
    fn non_finite_events_are_dropped_without_a_frame() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();
        assert!(sim
            .apply(SimEvent::SetAttack { value: f64::NAN }, &mut sched)
            .is_none());
        assert!(sim.apply(user_time(f64::INFINITY), &mut sched).is_none());
        assert_relative_eq!(sim.params().attack, 20.0);
        assert_relative_eq!(sim.time(), 0.0);
    }

    #[test]
    fn toggle_play_starts_and_stops_the_clock() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();

        sim.apply(SimEvent::TogglePlay, &mut sched).unwrap();
        assert!(sim.is_playing());
        assert_eq!(sched.pending_count(), 1);

        sim.apply(SimEvent::TogglePlay, &mut sched).unwrap();
        assert!(!sim.is_playing());
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn starting_from_the_end_restarts_at_zero() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();
        sim.apply(user_time(100.0), &mut sched).unwrap();

        let frame = sim.apply(SimEvent::TogglePlay, &mut sched).unwrap();
        assert_relative_eq!(sim.time(), 0.0);
        assert_eq!(frame.amplitude, "0.00");
        assert!(sim.is_playing());
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn ticks_advance_the_cursor_and_rearm() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();
        sim.apply(SimEvent::TogglePlay, &mut sched).unwrap();

        for expected in 1..=3 {
            let timer = sched.fire().unwrap();
            let frame = sim
                .apply(SimEvent::TimerFired { timer }, &mut sched)
                .unwrap();
            assert_relative_eq!(sim.time(), expected as f64);
            assert!(sim.is_playing());
            assert_eq!(sched.pending_count(), 1);
            assert!(!frame.primitives.is_empty());
        }
    }

    #[test]
    fn user_scrub_stops_the_clock_but_clock_writes_do_not() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();
        sim.apply(SimEvent::TogglePlay, &mut sched).unwrap();

        // A clock-origin write leaves autoplay alone.
        sim.apply(
            SimEvent::SetTime {
                value: 10.0,
                origin: Origin::Clock,
            },
            &mut sched,
        )
        .unwrap();
        assert!(sim.is_playing());
        assert_eq!(sched.pending_count(), 1);

        // A user scrub cancels the pending tick before the write lands.
        sim.apply(user_time(55.0), &mut sched).unwrap();
        assert!(!sim.is_playing());
        assert_eq!(sched.pending_count(), 0);
        assert_relative_eq!(sim.time(), 55.0);
    }

    #[test]
    fn stale_timer_after_scrub_is_ignored() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();
        sim.apply(SimEvent::TogglePlay, &mut sched).unwrap();
        let timer = sched.fire().unwrap();

        sim.apply(user_time(55.0), &mut sched).unwrap();
        assert!(sim
            .apply(SimEvent::TimerFired { timer }, &mut sched)
            .is_none());
        assert_relative_eq!(sim.time(), 55.0);
    }

    #[test]
    fn text_edits_parse_or_are_swallowed() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();

        let frame = sim
            .apply_text(ControlField::Attack, " 35.5 ", &mut sched)
            .unwrap();
        assert_relative_eq!(sim.params().attack, 35.5);
        assert!(!frame.primitives.is_empty());

        for bad in ["", "abc", "12..5", "NaN", "inf"] {
            assert!(sim.apply_text(ControlField::Attack, bad, &mut sched).is_none());
            assert_relative_eq!(sim.params().attack, 35.5);
        }
    }

    #[test]
    fn text_time_edit_counts_as_a_user_scrub() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();
        sim.apply(SimEvent::TogglePlay, &mut sched).unwrap();

        sim.apply_text(ControlField::Time, "40", &mut sched).unwrap();
        assert!(!sim.is_playing());
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn interval_edits_reach_the_clock() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();
        sim.apply(SimEvent::SetInterval { secs: 0.2 }, &mut sched)
            .unwrap();
        assert_relative_eq!(sim.clock_state().interval_secs, 0.2);
    }

    #[test]
    fn interval_edits_clamp_instead_of_failing() {
        use crate::clock::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};

        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();

        // Non-finite intervals clamp to the floor and still emit a frame.
        let frame = sim.apply(SimEvent::SetInterval { secs: f64::NAN }, &mut sched);
        assert!(frame.is_some());
        assert_relative_eq!(sim.clock_state().interval_secs, MIN_INTERVAL_SECS);

        // A huge finite value, including via the text path, clamps to the
        // ceiling instead of overflowing the clock's Duration.
        sim.apply_text(ControlField::Interval, "1e300", &mut sched)
            .unwrap();
        assert_relative_eq!(sim.clock_state().interval_secs, MAX_INTERVAL_SECS);
    }

    #[test]
    fn resize_updates_the_viewport_geometry() {
        let mut sim = Simulator::new();
        let mut sched = ManualScheduler::new();
        let frame = sim
            .apply(
                SimEvent::Resize {
                    width: 800.0,
                    height: 400.0,
                },
                &mut sched,
            )
            .unwrap();
        assert_relative_eq!(sim.viewport().width, 800.0);

        // The x-axis now ends at the new right margin.
        let Primitive::Line { to, .. } = &frame.primitives[0] else {
            panic!("first primitive is the x-axis");
        };
        assert_relative_eq!(to.x, 780.0);
    }

    #[test]
    fn parse_field_accepts_floats_and_rejects_garbage() {
        assert_relative_eq!(parse_field("1.5").unwrap(), 1.5);
        assert_relative_eq!(parse_field("-3").unwrap(), -3.0);
        let err = parse_field("two").unwrap_err();
        assert_eq!(err, InputError::InvalidNumeric("two".to_string()));
        assert!(err.to_string().contains("two"));
    }

    #[test]
    fn frames_round_trip_through_json() {
        let sim = Simulator::new();
        let frame = sim.frame();
        let json = serde_json::to_string(&frame).unwrap();
        let back: RenderFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, back);
    }
}
