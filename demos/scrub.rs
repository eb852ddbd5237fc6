//! Demo: Scrubbing the Time Cursor
//!
//! Walks the time cursor across the axis by hand and prints the readouts a
//! presentation shell would display, plus a summary of the planned
//! primitives.
//!
//! Run with: cargo run --example scrub

use envoscope::prelude::*;

fn main() {
    let mut sim = Simulator::new();
    let mut sched = ManualScheduler::new();

    println!("=== Envelope Scrub Demo ===");
    println!(
        "attack={}, decay={}\n",
        sim.params().attack,
        sim.params().decay
    );

    println!("{:>6} | {:>6} | {:>6} | {:>6}", "t", "att", "dec", "ampl");
    println!("-------+--------+--------+-------");

    for t in [0.0, 10.0, 20.0, 35.0, 60.0, 85.0, 100.0] {
        let frame = sim
            .apply(
                SimEvent::SetTime {
                    value: t,
                    origin: Origin::User,
                },
                &mut sched,
            )
            .expect("finite scrub values are always accepted");
        println!(
            "{:>6.1} | {:>6} | {:>6} | {:>6}",
            t, frame.norm_attack, frame.norm_decay, frame.amplitude
        );
    }

    // Malformed spinbox input is swallowed: no frame, state unchanged.
    assert!(sim.apply_text(ControlField::Attack, "oops", &mut sched).is_none());
    println!("\n(text edit \"oops\" ignored, attack still {})", sim.params().attack);

    // What the shell would draw for the final state.
    let frame = sim.frame();
    let mut lines = 0;
    let mut circles = 0;
    let mut texts = 0;
    let mut polylines = 0;
    for p in &frame.primitives {
        match p {
            Primitive::Line { .. } => lines += 1,
            Primitive::Circle { .. } => circles += 1,
            Primitive::Text { .. } => texts += 1,
            Primitive::Polyline { .. } => polylines += 1,
        }
    }
    println!("\nPrimitive plan: {} total", frame.primitives.len());
    println!("  lines:     {}", lines);
    println!("  polylines: {}", polylines);
    println!("  circles:   {}", circles);
    println!("  texts:     {}", texts);

    println!("\nFirst primitive as JSON:");
    println!(
        "{}",
        serde_json::to_string_pretty(&frame.primitives[0]).unwrap()
    );
}
