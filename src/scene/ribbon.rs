//! Ribbon strips
//!
//! Each ribbon owns a dual centerline path (scattered samples and a conical
//! spiral) generated once, plus a triangle index buffer built once from the
//! segment count. Every tick the two-sided strip is rebuilt from scratch:
//! blended centers, forward-difference tangents, a cross-product side frame
//! with a twist that relaxes as the tree assembles, and fresh shading
//! normals.

use std::f32::consts::TAU;
use rand::Rng;
use crate::config::{ConeConfig, RibbonConfig};
use crate::formation::{scatter_point, smoothstep};
use crate::math::Vec3;
use super::FormationPoint;

/// position(3) + normal(3) + uv(2)
pub const RIBBON_FLOATS: usize = 8;

/// Sinusoidal wobble of the scattered centerline, fading with assembly
const SCATTER_WAVE_AMPLITUDE: f32 = 0.5;

/// Twist accumulated along the strip while scattered. Tuned constant; the
/// visual contract is defined on this value, not derived from it.
const TWIST_PER_POINT: f32 = 0.35;

pub struct Ribbon {
    /// N+1 centerline samples; indices 0 and N are the endpoints used for
    /// boundary tangent handling
    path: Vec<FormationPoint>,
    width: f32,
    phase: f32,
    indices: Vec<u32>,
    vertices: Vec<f32>,
}

impl Ribbon {
    pub fn new<R: Rng>(config: &RibbonConfig, cone: &ConeConfig, rng: &mut R) -> Self {
        debug_assert!(config.segments >= 1, "ribbon needs at least one segment");

        let n = config.segments;
        let mut path = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let s = i as f32 / n as f32;
            let y_frac = lerp(config.bottom, config.top, s);
            let radius = config.radius * (1.0 - y_frac);
            let angle = config.phase + config.turns * TAU * s;
            path.push(FormationPoint {
                scatter: scatter_point(rng, config.scatter_radius),
                tree: Vec3::new(
                    radius * angle.cos(),
                    y_frac * cone.height - cone.y_offset,
                    radius * angle.sin(),
                ),
            });
        }

        Self::from_path(path, config.width, config.phase)
    }

    fn from_path(path: Vec<FormationPoint>, width: f32, phase: f32) -> Self {
        let n = path.len() - 1;

        // Two triangles per segment, strip winding; built once, reused forever
        let mut indices = Vec::with_capacity(n * 6);
        for i in 0..n as u32 {
            let a = i * 2;
            indices.extend_from_slice(&[a, a + 1, a + 2]);
            indices.extend_from_slice(&[a + 1, a + 3, a + 2]);
        }

        Self {
            path,
            width,
            phase,
            indices,
            vertices: vec![0.0; (n + 1) * 2 * RIBBON_FLOATS],
        }
    }

    /// Blended-and-noised center at path index `i`. The sinusoidal wobble is
    /// seeded by (time, index, phase) and scales with (1 - t) so the line
    /// settles onto the spiral exactly as t reaches 1.
    fn blended_center(&self, i: usize, t: f32, time: f32) -> Vec3 {
        let point = &self.path[i];
        let fi = i as f32;
        let wave = Vec3::new(
            (time * 1.3 + fi * 0.45 + self.phase).sin(),
            (time * 1.7 + fi * 0.31 + self.phase * 2.0).cos(),
            (time * 1.1 + fi * 0.52 + self.phase).sin(),
        )
        .scale(SCATTER_WAVE_AMPLITUDE * (1.0 - t));

        (point.scatter + wave).lerp(&point.tree, t)
    }

    /// Rebuild the strip vertices for this tick
    pub fn update(&mut self, progress: f32, time: f32) {
        let t = smoothstep(progress);
        let n = self.segment_count();
        let half_width = self.width * 0.5;

        for i in 0..=n {
            let center = self.blended_center(i, t, time);

            // Forward difference on the already-blended, already-noised
            // centers; the final index has no next sample and falls back to
            // the fixed up vector.
            let tangent = if i == n {
                Vec3::UP
            } else {
                (self.blended_center(i + 1, t, time) - center).normalize_or(Vec3::UP)
            };

            let side = tangent.cross(&Vec3::UP).normalize_or(Vec3::RIGHT);
            let twist = (1.0 - t) * (i as f32 * TWIST_PER_POINT + self.phase);
            let side = side.rotate_around(&tangent, twist);
            let normal = tangent.cross(&side).normalize_or(Vec3::UP);

            let v = i as f32 / n as f32;
            let left = center - side.scale(half_width);
            let right = center + side.scale(half_width);
            self.write_vertex(i * 2, left, normal, 0.0, v);
            self.write_vertex(i * 2 + 1, right, normal, 1.0, v);
        }
    }

    fn write_vertex(&mut self, slot: usize, position: Vec3, normal: Vec3, u: f32, v: f32) {
        let out = &mut self.vertices[slot * RIBBON_FLOATS..(slot + 1) * RIBBON_FLOATS];
        out[0] = position.x;
        out[1] = position.y;
        out[2] = position.z;
        out[3] = normal.x;
        out[4] = normal.y;
        out[5] = normal.z;
        out[6] = u;
        out[7] = v;
    }

    pub fn segment_count(&self) -> usize {
        self.path.len() - 1
    }

    pub fn vertex_count(&self) -> usize {
        self.path.len() * 2
    }

    /// Interleaved vertex buffer for GPU upload
    pub fn vertex_data(&self) -> &[f32] {
        &self.vertices
    }

    /// Static triangle indices (6 per segment)
    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn build(segments: usize) -> Ribbon {
        let mut rng = SmallRng::seed_from_u64(5);
        let config = RibbonConfig { segments, ..Default::default() };
        Ribbon::new(&config, &ConeConfig::default(), &mut rng)
    }

    #[test]
    fn test_buffer_sizes_fixed() {
        let mut ribbon = build(40);
        assert_eq!(ribbon.index_data().len(), 6 * 40);
        for (progress, time) in [(0.0, 0.0), (0.5, 3.3), (1.0, 100.0)] {
            ribbon.update(progress, time);
            assert_eq!(ribbon.vertex_count(), 2 * 41);
            assert_eq!(ribbon.vertex_data().len(), 2 * 41 * RIBBON_FLOATS);
        }
    }

    #[test]
    fn test_single_segment_ribbon() {
        let mut ribbon = build(1);
        ribbon.update(0.5, 1.0);
        assert_eq!(ribbon.vertex_count(), 4);
        assert_eq!(ribbon.index_data().len(), 6);
    }

    #[test]
    fn test_indices_in_range() {
        let ribbon = build(25);
        let max = ribbon.vertex_count() as u32;
        assert!(ribbon.index_data().iter().all(|&i| i < max));
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut ribbon = build(60);
        ribbon.update(0.42, 7.7);
        let first: Vec<f32> = ribbon.vertex_data().to_vec();
        ribbon.update(0.42, 7.7);
        assert_eq!(ribbon.vertex_data(), &first[..]);
    }

    #[test]
    fn test_assembled_strip_sits_on_spiral() {
        let mut ribbon = build(80);
        ribbon.update(1.0, 55.0);
        // At t = 1 the noise term is zero, so each vertex pair straddles its
        // tree centerline sample exactly.
        for i in 0..=ribbon.segment_count() {
            let data = ribbon.vertex_data();
            let left = Vec3::new(
                data[i * 2 * RIBBON_FLOATS],
                data[i * 2 * RIBBON_FLOATS + 1],
                data[i * 2 * RIBBON_FLOATS + 2],
            );
            let right = Vec3::new(
                data[(i * 2 + 1) * RIBBON_FLOATS],
                data[(i * 2 + 1) * RIBBON_FLOATS + 1],
                data[(i * 2 + 1) * RIBBON_FLOATS + 2],
            );
            let mid = left.lerp(&right, 0.5);
            assert!(mid.distance(&ribbon.path[i].tree) < 1e-4);
        }
    }

    #[test]
    fn test_strip_width_constant() {
        let mut ribbon = build(50);
        for (progress, time) in [(0.0, 1.0), (0.6, 2.0), (1.0, 3.0)] {
            ribbon.update(progress, time);
            let data = ribbon.vertex_data();
            for i in 0..=ribbon.segment_count() {
                let left = Vec3::new(
                    data[i * 2 * RIBBON_FLOATS],
                    data[i * 2 * RIBBON_FLOATS + 1],
                    data[i * 2 * RIBBON_FLOATS + 2],
                );
                let right = Vec3::new(
                    data[(i * 2 + 1) * RIBBON_FLOATS],
                    data[(i * 2 + 1) * RIBBON_FLOATS + 1],
                    data[(i * 2 + 1) * RIBBON_FLOATS + 2],
                );
                assert!((left.distance(&right) - ribbon.width).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_degenerate_path_produces_finite_vertices() {
        // Coincident consecutive samples give a zero forward difference;
        // the frame must fall back to fixed axes instead of emitting NaN.
        let p = FormationPoint {
            scatter: Vec3::new(1.0, 2.0, 3.0),
            tree: Vec3::new(1.0, 2.0, 3.0),
        };
        let mut ribbon = Ribbon::from_path(vec![p; 4], 0.4, 0.0);
        ribbon.update(1.0, 0.0);
        assert!(ribbon.vertex_data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_vertical_tangent_frame_is_finite() {
        // A straight vertical run makes tangent parallel to UP, so the
        // side cross product degenerates and must use the RIGHT fallback.
        let path: Vec<FormationPoint> = (0..5)
            .map(|i| {
                let p = Vec3::new(0.0, i as f32, 0.0);
                FormationPoint { scatter: p, tree: p }
            })
            .collect();
        let mut ribbon = Ribbon::from_path(path, 0.4, 0.0);
        ribbon.update(1.0, 0.0);
        assert!(ribbon.vertex_data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_tree_path_inside_cone_span() {
        let cone = ConeConfig::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let config = RibbonConfig::default();
        let ribbon = Ribbon::new(&config, &cone, &mut rng);
        for point in &ribbon.path {
            assert!(point.tree.y >= config.bottom * cone.height - cone.y_offset - 1e-4);
            assert!(point.tree.y <= config.top * cone.height - cone.y_offset + 1e-4);
            assert!(point.scatter.length() <= config.scatter_radius + 1e-4);
        }
    }
}
