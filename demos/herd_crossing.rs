//! # Herd Crossing
//!
//! Secondary actors only: a loose herd drifts across the meadow while
//! members join and leave. Shows the movement gate (grazing members leave
//! no footprints), stable-identity tracking across a changing roster, and
//! the instantaneous presence channel on top of the trail.
//!
//! Run with: `cargo run --example herd_crossing`

use trample::prelude::*;
use trample::{ActorId, TrailConfig};

struct Member {
    id: ActorId,
    pos: Vec2,
    speed: f32,
}

fn main() {
    let mut field = TrampleField::new(SurfaceConfig::new(15.0, 64).with_seed(9))
        .with_trails(
            TrailConfig::new()
                .with_move_threshold_sq(0.25)
                .with_sample_interval_secondary(0.2)
                .with_influence_radius(1.0)
                .with_strength(0.6),
        )
        .with_presence(PresenceConfig::new().with_radius(1.4).with_strength(0.4));

    // Half the herd walks, half grazes in place.
    let mut herd: Vec<Member> = (0..8u64)
        .map(|i| Member {
            id: ActorId(i),
            pos: Vec2::new(-14.0, i as f32 * 2.0 - 7.0),
            speed: if i % 2 == 0 { 2.0 } else { 0.0 },
        })
        .collect();

    let mut clock = FrameClock::fixed(1.0 / 30.0);
    for frame_idx in 0..30 * 14 {
        let now = clock.tick();
        let dt = clock.delta();

        for member in &mut herd {
            member.pos.x += member.speed * dt;
        }
        // Members that wander off the far edge leave the roster; their
        // tracking state is dropped, their old footprints keep fading.
        herd.retain(|m| m.pos.x < 14.0);

        let positions: Vec<(ActorId, Vec2)> = herd.iter().map(|m| (m.id, m.pos)).collect();
        field.step(FrameInput {
            now,
            primary: None,
            grounded: false,
            secondary: &positions,
        });

        if frame_idx % 60 == 59 {
            let frame = field.frame();
            let trail_slots = (0..frame.trail_slots().len())
                .filter(|&i| frame.trail_slots().is_live(i))
                .count();
            let bent = field
                .evaluate_all()
                .iter()
                .filter(|o| o.displacement.length() > 1e-3)
                .count();
            println!(
                "t={:>4.1}s  herd={}  tracked={}  trail slots={:>2}  bent={:>4} anchors",
                now,
                herd.len(),
                field.recorder().tracked_actors(),
                trail_slots,
                bent,
            );
        }
    }
}
