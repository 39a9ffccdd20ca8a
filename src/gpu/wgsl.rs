//! WGSL generation for the accelerated evaluation path.
//!
//! The generated compute shader mirrors [`crate::field`] slot for slot:
//! the same falloffs, the same max-selection fold, the same sentinel
//! handling. Hosts that already render the surface on the GPU can instead
//! splice [`FALLOFF_WGSL`] and [`PATCH_WGSL`] into their own vertex
//! shaders and displace geometry in place; the buffer layout they need is
//! exactly what [`crate::packer`] exposes as raw `f32` arrays.

/// Threads per workgroup of the generated compute shader.
pub const WORKGROUP_SIZE: u32 = 256;

/// WGSL falloff functions shared by the compute shader and host shaders.
///
/// `spatial_falloff` is 1.0 at the footprint and exactly 0.0 at or beyond
/// the radius; `temporal_falloff` holds 1.0 through the hold window and
/// decays to 0.0 over the fade window. Sentinel slots (infinite position
/// and age) evaluate to zero weight in both.
pub const FALLOFF_WGSL: &str = r#"
const DISTANCE_EPS: f32 = 1e-4;

fn spatial_falloff(dist: f32, radius: f32) -> f32 {
    return 1.0 - smoothstep(0.0, radius, dist);
}

fn temporal_falloff(age: f32, hold: f32, fade: f32) -> f32 {
    return 1.0 - smoothstep(hold, hold + fade, age);
}
"#;

/// WGSL patch-mask and tipness helpers for host vertex shaders.
///
/// Mirrors [`crate::surface::PatchMask::patchiness`] and
/// [`crate::surface::tipness`].
pub const PATCH_WGSL: &str = r#"
fn patchiness(pos: vec2<f32>, frequency: vec2<f32>) -> f32 {
    return 0.5 + 0.25 * (sin(pos.x * frequency.x) + sin(pos.y * frequency.y));
}

fn tipness(height_fraction: f32) -> f32 {
    let h = clamp(height_fraction, 0.0, 1.0);
    return h * h;
}
"#;

/// Generate the full displacement compute shader.
///
/// Bindings, all in group 0:
///
/// | binding | buffer | contents |
/// |---------|--------|----------|
/// | 0 | storage, read | trail slot positions, interleaved x,z |
/// | 1 | storage, read | trail slot ages |
/// | 2 | storage, read | presence slot positions, interleaved x,z |
/// | 3 | storage, read | surface point positions, interleaved x,z |
/// | 4 | storage, read_write | output displacements, interleaved x,z |
/// | 5 | uniform | `FieldParams` (matches `FieldParamsGpu` on the CPU side) |
pub fn displacement_shader() -> String {
    format!(
        r#"struct FieldParams {{
    trail_slots: u32,
    presence_slots: u32,
    point_count: u32,
    _pad0: u32,
    influence_radius: f32,
    hold_time: f32,
    fade_time: f32,
    strength: f32,
    presence_radius: f32,
    presence_strength: f32,
    _pad1: f32,
    _pad2: f32,
}};

@group(0) @binding(0)
var<storage, read> trail_positions: array<vec2<f32>>;

@group(0) @binding(1)
var<storage, read> trail_ages: array<f32>;

@group(0) @binding(2)
var<storage, read> presence_positions: array<vec2<f32>>;

@group(0) @binding(3)
var<storage, read> points: array<vec2<f32>>;

@group(0) @binding(4)
var<storage, read_write> displacements: array<vec2<f32>>;

@group(0) @binding(5)
var<uniform> params: FieldParams;
{falloff}
@compute @workgroup_size({workgroup_size})
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {{
    let index = global_id.x;
    if index >= params.point_count {{
        return;
    }}

    let pos = points[index];

    // Trail channel: keep the single strongest contribution, never a sum.
    var best = vec2<f32>(0.0, 0.0);
    var best_mag_sq = 0.0;
    for (var i = 0u; i < params.trail_slots; i++) {{
        let delta = pos - trail_positions[i];
        let dist = length(delta) + DISTANCE_EPS;
        let weight = spatial_falloff(dist, params.influence_radius)
            * temporal_falloff(trail_ages[i], params.hold_time, params.fade_time);
        if weight <= 0.0 {{
            continue;
        }}
        let contribution = delta / dist * weight;
        let mag_sq = dot(contribution, contribution);
        if mag_sq > best_mag_sq {{
            best_mag_sq = mag_sq;
            best = contribution;
        }}
    }}
    var displacement = best * params.strength;

    // Presence channel: instantaneous, no temporal term.
    var best_presence = vec2<f32>(0.0, 0.0);
    var best_presence_mag_sq = 0.0;
    for (var i = 0u; i < params.presence_slots; i++) {{
        let delta = pos - presence_positions[i];
        let dist = length(delta) + DISTANCE_EPS;
        let weight = spatial_falloff(dist, params.presence_radius);
        if weight <= 0.0 {{
            continue;
        }}
        let contribution = delta / dist * weight;
        let mag_sq = dot(contribution, contribution);
        if mag_sq > best_presence_mag_sq {{
            best_presence_mag_sq = mag_sq;
            best_presence = contribution;
        }}
    }}
    displacement += best_presence * params.presence_strength;

    displacements[index] = displacement;
}}
"#,
        falloff = FALLOFF_WGSL,
        workgroup_size = WORKGROUP_SIZE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_displacement_shader_structure() {
        let shader = displacement_shader();
        assert!(shader.contains("struct FieldParams"));
        assert!(shader.contains("fn spatial_falloff"));
        assert!(shader.contains("fn temporal_falloff"));
        assert!(shader.contains("@compute @workgroup_size(256)"));
        for binding in 0..6 {
            assert!(shader.contains(&format!("@binding({})", binding)));
        }
    }

    #[test]
    fn test_displacement_shader_validates() {
        validate_wgsl(&displacement_shader()).expect("Displacement shader should be valid");
    }

    #[test]
    fn test_falloff_wgsl_validates_in_harness() {
        let shader = format!(
            r#"{FALLOFF_WGSL}
@group(0) @binding(0) var<storage, read_write> out: array<f32>;

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {{
    out[global_id.x] = spatial_falloff(0.5, 1.0) * temporal_falloff(2.5, 2.0, 3.0);
}}
"#
        );
        validate_wgsl(&shader).expect("Falloff WGSL should be valid");
    }

    #[test]
    fn test_patch_wgsl_validates_in_harness() {
        let shader = format!(
            r#"{PATCH_WGSL}
@group(0) @binding(0) var<storage, read_write> out: array<f32>;

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {{
    let p = patchiness(vec2<f32>(1.0, 2.0), vec2<f32>(0.31, 0.23));
    out[global_id.x] = p * tipness(0.7);
}}
"#
        );
        validate_wgsl(&shader).expect("Patch WGSL should be valid");
    }
}
