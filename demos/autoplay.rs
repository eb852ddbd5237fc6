//! Demo: Autoplay Clock
//!
//! Starts the clock and drives its ticks by hand through a
//! [`ManualScheduler`], printing an ASCII amplitude meter as the cursor
//! sweeps the axis, clamps at 100 and wraps back to 0. Finishes with a user
//! scrub, which stops the clock.
//!
//! Run with: cargo run --example autoplay

use envoscope::prelude::*;

fn meter(amplitude: f64) -> String {
    let filled = (amplitude * 40.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), " ".repeat(40 - filled))
}

fn main() {
    let mut sim = Simulator::new();
    let mut sched = ManualScheduler::new();

    println!("=== Autoplay Demo ===\n");

    sim.apply(SimEvent::SetInterval { secs: 0.05 }, &mut sched)
        .unwrap();
    sim.apply(SimEvent::TogglePlay, &mut sched).unwrap();
    println!(
        "clock running, interval {:?}, one pending tick\n",
        sim.clock_state().interval_secs
    );

    // 105 ticks: up the attack, down the decay, clamp at 100, wrap to 0.
    for step in 1..=105 {
        let timer = sched.fire().expect("clock keeps one tick armed");
        let frame = sim
            .apply(SimEvent::TimerFired { timer }, &mut sched)
            .expect("armed tick is never stale");

        if step % 5 == 0 || sim.time() == 100.0 || sim.time() == 0.0 {
            println!(
                "t={:>5.1}  a={}  {}",
                sim.time(),
                frame.amplitude,
                meter(sim.sample().amplitude)
            );
        }
    }

    // Manual scrub: the user wins, the clock stops, the pending tick dies.
    sim.apply(
        SimEvent::SetTime {
            value: 50.0,
            origin: Origin::User,
        },
        &mut sched,
    )
    .unwrap();
    println!(
        "\nscrubbed to t=50.0 -> clock running: {}, pending ticks: {}",
        sim.is_playing(),
        sched.pending_count()
    );
}
