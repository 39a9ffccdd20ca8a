//! End-to-end properties of the deformation field, driven through the
//! public API the way a host application would.

use trample::prelude::*;
use trample::{ActorId, TrailConfig};

fn test_field(trail: TrailConfig) -> TrampleField {
    TrampleField::new(SurfaceConfig::new(10.0, 8).with_seed(11)).with_trails(trail)
}

fn walk_config() -> TrailConfig {
    TrailConfig::new()
        .with_sample_interval_primary(0.0)
        .with_influence_radius(1.0)
        .with_hold_time(2.0)
        .with_fade_time(3.0)
        .with_strength(0.8)
}

#[test]
fn untouched_field_is_everywhere_zero() {
    let mut field = test_field(walk_config());
    field.step(FrameInput {
        now: 0.0,
        primary: None,
        grounded: false,
        secondary: &[],
    });
    // Every slot is a sentinel; every anchor must see exactly zero.
    for out in field.evaluate_all() {
        assert_eq!(out.displacement, Vec2::ZERO);
    }
}

#[test]
fn primary_history_owns_the_first_slots() {
    let mut field = test_field(
        walk_config()
            .with_trail_slots(16)
            .with_primary_capacity(8)
            .with_secondary_capacity(8)
            .with_move_threshold_sq(0.01)
            .with_sample_interval_secondary(0.0),
    );

    let crate_id = ActorId(1);
    let mut crate_pos = Vec2::new(5.0, 5.0);
    for i in 0..4 {
        let now = i as f32 * 0.1;
        field.step(FrameInput {
            now,
            primary: Some(Vec2::new(i as f32 * 0.5, 0.0)),
            grounded: true,
            secondary: &[(crate_id, crate_pos)],
        });
        crate_pos += Vec2::new(1.0, 0.0);
    }
    let frame = field.frame();

    // First four slots: the primary walk, chronological; the secondary
    // crate's footprints only after them.
    let slots = frame.trail_slots();
    for i in 0..4 {
        assert_eq!(slots.position(i), Vec2::new(i as f32 * 0.5, 0.0));
    }
    for i in 4..slots.len() {
        if slots.is_live(i) {
            assert!(slots.position(i).y == 5.0, "secondary entries come after");
        }
    }
}

#[test]
fn trails_never_exceed_their_capacity() {
    let mut field = test_field(
        walk_config()
            .with_primary_capacity(6)
            .with_secondary_capacity(3)
            .with_move_threshold_sq(0.0)
            .with_sample_interval_secondary(0.0),
    );

    let id = ActorId(9);
    for i in 0..100 {
        let now = i as f32 * 0.05;
        let pos = Vec2::new(i as f32 * 0.3, 0.0);
        field.step(FrameInput {
            now,
            primary: Some(pos),
            grounded: true,
            secondary: &[(id, pos + Vec2::new(0.0, 3.0))],
        });
    }

    let recorder = field.recorder();
    assert!(recorder.primary_trail().len() <= 6);
    assert!(recorder.secondary_trail().len() <= 3);
    let window = recorder.config().total_window();
    let now = 99.0 * 0.05;
    for f in recorder
        .primary_trail()
        .iter()
        .chain(recorder.secondary_trail().iter())
    {
        assert!(f.age(now) < window);
    }
}

#[test]
fn displacement_magnitude_never_exceeds_strength() {
    let strength = 0.8;
    let mut field = test_field(walk_config().with_strength(strength));

    // Stomp all over a small neighborhood to maximize overlap.
    for i in 0..40 {
        let angle = i as f32 * 0.7;
        field.step(FrameInput {
            now: i as f32 * 0.05,
            primary: Some(Vec2::new(angle.cos() * 0.4, angle.sin() * 0.4)),
            grounded: true,
            secondary: &[],
        });
    }

    for out in field.evaluate_all() {
        assert!(
            out.displacement.length() <= strength + 1e-5,
            "max-selection must cap displacement at one footprint's strength"
        );
    }
}

#[test]
fn footprint_influence_decays_monotonically() {
    let mut field = test_field(walk_config());
    field.step(FrameInput {
        now: 0.0,
        primary: Some(Vec2::ZERO),
        grounded: true,
        secondary: &[],
    });

    let probe = Vec2::new(0.4, 0.0);
    let mut last = f32::INFINITY;
    // Sample the same probe as the footprint ages across hold and fade.
    for i in 0..12 {
        let now = i as f32 * 0.5;
        let frame = field.step(FrameInput {
            now,
            primary: None,
            grounded: false,
            secondary: &[],
        });
        let magnitude = frame.displacement_at(probe).length();
        assert!(
            magnitude <= last + 1e-6,
            "influence grew from {last} to {magnitude} at t={now}"
        );
        last = magnitude;
    }
    // Past hold + fade the footprint is gone entirely.
    assert_eq!(last, 0.0);
}

#[test]
fn fresh_footprint_bends_cover_outward() {
    // Footprint at the origin at t=0; probe at (0.5, 0) shortly after,
    // radius 1: the cover there leans away from the footprint, along the
    // line between them.
    let mut field = test_field(walk_config());
    field.step(FrameInput {
        now: 0.0,
        primary: Some(Vec2::ZERO),
        grounded: true,
        secondary: &[],
    });
    let frame = field.step(FrameInput {
        now: 0.05,
        primary: None,
        grounded: false,
        secondary: &[],
    });

    let d = frame.displacement_at(Vec2::new(0.5, 0.0));
    assert!(d.length() > 0.0, "inside radius and inside hold: nonzero");
    assert!(d.x > 0.0, "displaced along the footprint-to-point line");
    assert!(d.y.abs() < 1e-6);
}

#[test]
fn footprint_expires_after_hold_plus_fade() {
    let cfg = walk_config();
    let mut field = test_field(cfg);
    field.step(FrameInput {
        now: 0.0,
        primary: Some(Vec2::ZERO),
        grounded: true,
        secondary: &[],
    });
    let frame = field.step(FrameInput {
        now: cfg.hold_time + cfg.fade_time + 1.0,
        primary: None,
        grounded: false,
        secondary: &[],
    });
    assert_eq!(frame.displacement_at(Vec2::new(0.5, 0.0)), Vec2::ZERO);
}

#[test]
fn overfilling_the_primary_trail_evicts_only_the_oldest() {
    let capacity = 8;
    let mut field = test_field(
        walk_config()
            .with_primary_capacity(capacity)
            .with_hold_time(100.0)
            .with_fade_time(100.0),
    );

    // capacity + 5 footprints at distinct x positions.
    for i in 0..capacity + 5 {
        field.step(FrameInput {
            now: i as f32 * 0.1,
            primary: Some(Vec2::new(i as f32, 0.0)),
            grounded: true,
            secondary: &[],
        });
    }

    let trail = field.recorder().primary_trail();
    assert_eq!(trail.len(), capacity);
    let xs: Vec<f32> = trail.iter().map(|f| f.pos.x).collect();
    let expected: Vec<f32> = (5..capacity + 5).map(|i| i as f32).collect();
    assert_eq!(xs, expected, "exactly the 5 oldest are gone");
}

#[test]
fn strongest_footprint_wins_over_nearby_sum() {
    // One footprint close to the probe, one farther away, both inside
    // their hold window. The result must equal the close footprint's
    // lone contribution — not the sum of both.
    let cfg = walk_config().with_influence_radius(2.0);
    let probe = Vec2::new(0.1, 0.0);

    let mut both = test_field(cfg);
    both.step(FrameInput {
        now: 0.0,
        primary: Some(Vec2::new(-0.2, 0.0)),
        grounded: true,
        secondary: &[],
    });
    let frame_both = both.step(FrameInput {
        now: 0.1,
        primary: Some(Vec2::new(0.9, 0.0)),
        grounded: true,
        secondary: &[],
    });

    let mut near_only = test_field(cfg);
    let frame_near = near_only.step(FrameInput {
        now: 0.0,
        primary: Some(Vec2::new(-0.2, 0.0)),
        grounded: true,
        secondary: &[],
    });

    let d_both = frame_both.displacement_at(probe);
    // Ages differ slightly between the two runs but both footprints sit
    // deep inside the hold window, where temporal weight is exactly 1.
    let d_near = frame_near.displacement_at(probe);
    assert!(
        (d_both - d_near).length() < 1e-5,
        "expected the near footprint alone, got {d_both:?} vs {d_near:?}"
    );
}

#[test]
fn airborne_frames_leave_no_marks() {
    let mut field = test_field(walk_config());
    for i in 0..10 {
        field.step(FrameInput {
            now: i as f32 * 0.1,
            primary: Some(Vec2::new(i as f32, 0.0)),
            grounded: false,
            secondary: &[],
        });
    }
    assert!(field.recorder().primary_trail().is_empty());
}

#[test]
fn patch_mask_is_independent_of_trails() {
    let mut field = test_field(walk_config());
    let before: Vec<(bool, f32)> = field
        .evaluate_all()
        .iter()
        .map(|o| (o.hidden, o.height_scale))
        .collect();

    for i in 0..20 {
        field.step(FrameInput {
            now: i as f32 * 0.1,
            primary: Some(Vec2::new(i as f32 * 0.4 - 4.0, 0.0)),
            grounded: true,
            secondary: &[],
        });
    }

    let after: Vec<(bool, f32)> = field
        .evaluate_all()
        .iter()
        .map(|o| (o.hidden, o.height_scale))
        .collect();
    assert_eq!(before, after, "trampling must not change the patch mask");
}

#[test]
fn generated_shader_is_valid_wgsl() {
    let shader = trample::gpu::wgsl::displacement_shader();
    let module = naga::front::wgsl::parse_str(&shader).expect("shader parses");
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .expect("shader validates");
}
