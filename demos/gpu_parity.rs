//! # GPU Parity
//!
//! Runs the same published frame through the CPU fold and the generated
//! compute shader and reports the largest difference. Falls back cleanly
//! when no GPU adapter is available.
//!
//! Run with: `cargo run --example gpu_parity`

use trample::prelude::*;
use trample::{ActorId, GpuError, TrailConfig};

fn main() {
    let mut field = TrampleField::new(SurfaceConfig::new(10.0, 48).with_seed(5))
        .with_trails(
            TrailConfig::new()
                .with_sample_interval_primary(0.0)
                .with_influence_radius(1.5),
        )
        .with_presence(PresenceConfig::new());

    // A short spiral walk plus one secondary actor.
    let crate_id = ActorId(1);
    for i in 0..48 {
        let t = i as f32 * 0.2;
        field.step(FrameInput {
            now: t,
            primary: Some(Vec2::new(t.cos() * t * 0.4, t.sin() * t * 0.4)),
            grounded: true,
            secondary: &[(crate_id, Vec2::new(-3.0 + t * 0.3, 4.0))],
        });
    }

    let evaluator = match GpuEvaluator::new() {
        Ok(evaluator) => evaluator,
        Err(GpuError::NoAdapter) => {
            println!("No GPU adapter available; skipping parity check.");
            return;
        }
        Err(e) => {
            eprintln!("GPU setup failed: {e}");
            return;
        }
    };

    let frame = field.frame();
    let points = field.surface().points();

    let cpu = field.evaluate_all();
    let gpu = match evaluator.evaluate(&frame, points) {
        Ok(gpu) => gpu,
        Err(e) => {
            eprintln!("GPU evaluation failed: {e}");
            return;
        }
    };

    let mut max_diff = 0.0f32;
    for (cpu_out, gpu_d) in cpu.iter().zip(&gpu) {
        max_diff = max_diff.max((cpu_out.displacement - *gpu_d).length());
    }

    println!(
        "{} points, {} trail slots: max CPU/GPU difference {:.2e}",
        points.len(),
        frame.trail_slots().len(),
        max_diff,
    );
    if max_diff < 1e-4 {
        println!("parity OK");
    } else {
        println!("parity DRIFTED - check shader/CPU fold for divergence");
    }
}
