//! Particle field
//!
//! Thousands of points blending between their scattered and tree positions,
//! displaced by a smooth 3-D noise field whose amplitude fades as the tree
//! assembles. Holds nothing mutable per point beyond the two static
//! position buffers; every tick is a pure recompute from (progress, time).

use noise::{NoiseFn, Perlin};
use rand::Rng;
use crate::config::{ConeConfig, ParticleConfig};
use crate::formation::{scatter_point, spiral_point};
use crate::math::Vec3;
use super::FormationPoint;

/// position(3) + size(1) + alpha(1) + color(3)
pub const PARTICLE_FLOATS: usize = 8;

// Channel offsets keep the three displacement axes decorrelated
const NOISE_OFFSET_Y: f64 = 31.7;
const NOISE_OFFSET_Z: f64 = 17.3;

pub struct ParticleField {
    points: Vec<FormationPoint>,
    /// Per-point random scalar in [0,1) for color variation only
    color_mix: Vec<f32>,
    noise: Perlin,
    config: ParticleConfig,
    buffer: Vec<f32>,
}

impl ParticleField {
    pub fn new<R: Rng>(
        config: &ParticleConfig,
        cone: &ConeConfig,
        scatter_radius: f32,
        rng: &mut R,
    ) -> Self {
        let count = config.count;
        let mut points = Vec::with_capacity(count);
        let mut color_mix = Vec::with_capacity(count);

        for index in 0..count {
            points.push(FormationPoint {
                scatter: scatter_point(rng, scatter_radius),
                tree: spiral_point(
                    rng,
                    cone.height,
                    cone.base_radius,
                    cone.y_offset,
                    index,
                    count,
                ),
            });
            color_mix.push(rng.random::<f32>());
        }

        Self {
            points,
            color_mix,
            noise: Perlin::new(rng.random::<u32>()),
            config: config.clone(),
            buffer: vec![0.0; count * PARTICLE_FLOATS],
        }
    }

    /// Recompute the interleaved vertex buffer for this tick.
    /// Layout per point: position(3) + size(1) + alpha(1) + color(3).
    pub fn update(&mut self, progress: f32, time: f32) {
        let cfg = &self.config;
        let amplitude = lerp(cfg.float_amplitude, cfg.settle_amplitude, progress);
        let size = lerp(cfg.size_scattered, cfg.size_tree, progress);
        let alpha = lerp(cfg.alpha_scattered, cfg.alpha_tree, progress);
        let drift = (time * cfg.drift_speed) as f64;
        let freq = cfg.noise_frequency as f64;

        for (i, point) in self.points.iter().enumerate() {
            let base = point.scatter.lerp(&point.tree, progress);

            let nx = base.x as f64 * freq;
            let ny = base.y as f64 * freq;
            let nz = base.z as f64 * freq;
            let dx = self.noise.get([nx + drift, ny, nz]) as f32;
            let dy = self.noise.get([nx, ny + drift, nz + NOISE_OFFSET_Y]) as f32;
            let dz = self.noise.get([nx + NOISE_OFFSET_Z, ny, nz + drift]) as f32;

            let position = base + Vec3::new(dx, dy, dz).scale(amplitude);

            let mut color = cfg.color_a.lerp(&cfg.color_b, self.color_mix[i]);
            if dx > cfg.accent_threshold {
                color = cfg.accent_color;
            }

            let out = &mut self.buffer[i * PARTICLE_FLOATS..(i + 1) * PARTICLE_FLOATS];
            out[0] = position.x;
            out[1] = position.y;
            out[2] = position.z;
            out[3] = size;
            out[4] = alpha;
            out[5] = color.x;
            out[6] = color.y;
            out[7] = color.z;
        }
    }

    /// Interleaved buffer for GPU upload
    pub fn data(&self) -> &[f32] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[cfg(test)]
    fn point(&self, i: usize) -> &FormationPoint {
        &self.points[i]
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

    fn build(count: usize) -> ParticleField {
        let mut rng = SmallRng::seed_from_u64(11);
        let config = ParticleConfig { count, ..Default::default() };
        ParticleField::new(&config, &ConeConfig::default(), 8.0, &mut rng)
    }

    #[test]
    fn test_buffer_layout() {
        let mut field = build(100);
        field.update(0.5, 1.0);
        assert_eq!(field.data().len(), 100 * PARTICLE_FLOATS);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut field = build(200);
        field.update(0.37, 4.2);
        let first: Vec<f32> = field.data().to_vec();
        field.update(0.37, 4.2);
        assert_eq!(field.data(), &first[..], "identical inputs must give bit-identical output");
    }

    #[test]
    fn test_assembled_positions_near_tree() {
        let mut field = build(150);
        field.update(1.0, 9.0);
        let settle = field.config.settle_amplitude;
        for i in 0..field.len() {
            let out = &field.data()[i * PARTICLE_FLOATS..];
            let pos = Vec3::new(out[0], out[1], out[2]);
            let dist = pos.distance(&field.point(i).tree);
            // Displacement per axis is bounded by the settle amplitude
            assert!(dist <= settle * 2.0, "point {} off by {}", i, dist);
        }
    }

    #[test]
    fn test_scattered_positions_near_scatter() {
        let mut field = build(150);
        field.update(0.0, 2.5);
        let bound = field.config.float_amplitude * 2.0;
        for i in 0..field.len() {
            let out = &field.data()[i * PARTICLE_FLOATS..];
            let pos = Vec3::new(out[0], out[1], out[2]);
            let dist = pos.distance(&field.point(i).scatter);
            assert!(dist <= bound, "point {} off by {}", i, dist);
        }
    }

    #[test]
    fn test_size_and_alpha_interpolate() {
        let mut field = build(10);
        let cfg = field.config.clone();

        field.update(0.0, 0.0);
        assert!((field.data()[3] - cfg.size_scattered).abs() < 1e-5);
        assert!((field.data()[4] - cfg.alpha_scattered).abs() < 1e-5);

        field.update(1.0, 0.0);
        assert!((field.data()[3] - cfg.size_tree).abs() < 1e-5);
        assert!((field.data()[4] - cfg.alpha_tree).abs() < 1e-5);
    }

    #[test]
    fn test_all_values_finite() {
        let mut field = build(300);
        for step in 0..20 {
            let progress = step as f32 / 19.0;
            field.update(progress, step as f32 * 0.7);
            assert!(field.data().iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_deterministic_construction() {
        let a = build(50);
        let b = build(50);
        for i in 0..50 {
            assert_eq!(a.point(i).scatter, b.point(i).scatter);
            assert_eq!(a.point(i).tree, b.point(i).tree);
        }
    }
}
