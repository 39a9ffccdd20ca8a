//! # Flatten Walk
//!
//! A headless walkthrough: one actor strolls a figure-eight across the
//! meadow while the field records, packs and evaluates every frame. Prints
//! a once-per-second summary of how much cover is bent and how the trail
//! fills and fades.
//!
//! Run with: `cargo run --example flatten_walk`

use trample::prelude::*;
use trample::TrailConfig;

fn main() {
    let mut field = TrampleField::new(SurfaceConfig::new(12.0, 96).with_seed(42))
        .with_trails(
            TrailConfig::new()
                .with_influence_radius(1.2)
                .with_hold_time(2.0)
                .with_fade_time(3.0)
                .with_strength(0.8),
        );

    println!(
        "meadow: {} anchors over ±{} units",
        field.surface().len(),
        field.surface().extent()
    );

    let mut clock = FrameClock::fixed(1.0 / 60.0);
    let seconds = 12;

    for frame_idx in 0..seconds * 60 {
        let now = clock.tick();

        // Figure-eight path; the walker hops for a moment mid-run, which
        // leaves a gap in the trail.
        let t = now * 0.7;
        let walker = Vec2::new(6.0 * t.sin(), 3.0 * (2.0 * t).sin());
        let grounded = !(4.0..4.5).contains(&now);

        field.step(FrameInput {
            now,
            primary: Some(walker),
            grounded,
            secondary: &[],
        });

        if frame_idx % 60 == 59 {
            let frame = field.frame();
            let live_slots = (0..frame.trail_slots().len())
                .filter(|&i| frame.trail_slots().is_live(i))
                .count();

            let outputs = field.evaluate_all();
            let bent = outputs
                .iter()
                .filter(|o| o.displacement.length() > 1e-3)
                .count();
            let max_bend = outputs
                .iter()
                .map(|o| o.displacement.length())
                .fold(0.0f32, f32::max);

            println!(
                "t={:>4.1}s  walker=({:+.1}, {:+.1})  grounded={}  slots={:>2}/{}  bent={:>4} anchors  max |d|={:.3}",
                now,
                walker.x,
                walker.y,
                grounded,
                live_slots,
                frame.trail_slots().len(),
                bent,
                max_bend,
            );
        }
    }

    // Let the trail fade out with the walker gone.
    for _ in 0..seconds * 60 {
        let now = clock.tick();
        field.step(FrameInput {
            now,
            primary: None,
            grounded: false,
            secondary: &[],
        });
    }
    let bent_after = field
        .evaluate_all()
        .iter()
        .filter(|o| o.displacement.length() > 1e-3)
        .count();
    println!(
        "t={:>4.1}s  trail faded: {} anchors still bent",
        clock.now(),
        bent_after
    );
}
