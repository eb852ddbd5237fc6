//! # Envoscope: Interactive Envelope Visualizer Core
//!
//! `envoscope` is the logic core of an interactive visualizer for a
//! two-segment (attack/decay) amplitude envelope on a normalized [0, 100]
//! time axis. It computes instantaneous amplitude and segment progress for a
//! movable time cursor, and plans the drawing of the curve, grid, markers and
//! readouts as backend-agnostic primitives. Windows, widgets and actual
//! drawing belong to a presentation shell that sits outside this crate.
//!
//! ## Architecture
//!
//! The crate is organized leaf-first:
//!
//! - **Envelope Model** ([`envelope`]) - pure, stateless amplitude math
//! - **Autoplay Clock** ([`clock`]) - Stopped/Running state machine with a
//!   cancellable single-shot timer seam
//! - **Coordinate Mapping** ([`geometry`]) - semantic space to pixel space
//! - **Render Planning** ([`render`]) - ordered drawing-primitive lists
//! - **Simulator** ([`simulator`]) - the event reducer owning all state
//!
//! Data flow: shell input becomes a [`SimEvent`], the [`Simulator`] applies
//! it, and every accepted event comes back as a [`RenderFrame`] holding the
//! formatted readouts plus the primitives to draw. Autoplay ticks enter
//! through the same path, tagged with their origin so user scrubbing always
//! wins over the clock.
//!
//! ## Quick Start
//!
//! ```rust
//! use envoscope::prelude::*;
//!
//! let mut sim = Simulator::new();
//! let mut sched = ManualScheduler::new();
//!
//! // Scrub into the decay segment (defaults: attack=20, decay=100)
//! let frame = sim
//!     .apply(
//!         SimEvent::SetTime {
//!             value: 60.0,
//!             origin: Origin::User,
//!         },
//!         &mut sched,
//!     )
//!     .unwrap();
//! assert_eq!(frame.amplitude, "0.50");
//!
//! // Start autoplay and drive one tick by hand
//! sim.apply(SimEvent::TogglePlay, &mut sched).unwrap();
//! let timer = sched.fire().unwrap();
//! let frame = sim
//!     .apply(SimEvent::TimerFired { timer }, &mut sched)
//!     .unwrap();
//! assert_eq!(frame.amplitude, "0.49");
//! ```

pub mod clock;
pub mod envelope;
pub mod geometry;
pub mod render;
pub mod simulator;

/// Prelude module for convenient imports
pub mod prelude {
    // Envelope model
    pub use crate::envelope::{compute_sample, AmplitudeSample, EnvelopeParams};

    // Autoplay clock
    pub use crate::clock::{
        advance, ClockController, ClockState, ManualScheduler, TickScheduler, TimerId,
        MAX_INTERVAL_SECS, MIN_INTERVAL_SECS,
    };

    // Coordinate mapping
    pub use crate::geometry::{CoordinateMapper, Point, Viewport};

    // Render planning
    pub use crate::render::{Anchor, PlotStyle, Primitive, RenderPlanner};

    // Simulator
    pub use crate::simulator::{
        parse_field, ControlField, InputError, Origin, RenderFrame, SimEvent, Simulator,
    };
}

// Re-export key types at crate root for convenience
pub use prelude::*;
