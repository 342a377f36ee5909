//! Instanced ornaments
//!
//! Hundreds of rigid baubles sharing one geometry and material,
//! distinguished only by their transforms. Each instance owns dual target
//! positions plus fixed rotation/float seeds generated once; the per-tick
//! update writes one column-major 4x4 matrix per instance into a shared
//! buffer.

use std::f32::consts::TAU;
use rand::Rng;
use crate::config::{ConeConfig, OrnamentConfig};
use crate::formation::{scatter_point, smoothstep, spiral_point};
use crate::math::{Mat4, Vec3};
use super::FormationPoint;

/// One column-major 4x4 matrix per instance
pub const INSTANCE_FLOATS: usize = 16;

/// Per-instance animation seeds, created once at setup and never mutated
#[derive(Debug, Clone)]
struct OrnamentInstance {
    point: FormationPoint,
    rotation_seed: Vec3,
    scale: f32,
    float_speed: f32,
    float_phase: f32,
}

pub struct OrnamentSet {
    instances: Vec<OrnamentInstance>,
    float_amplitude: f32,
    spin_speed: f32,
    transforms: Vec<f32>,
}

impl OrnamentSet {
    pub fn new<R: Rng>(
        config: &OrnamentConfig,
        cone: &ConeConfig,
        scatter_radius: f32,
        rng: &mut R,
    ) -> Self {
        let count = config.count;
        let mut instances = Vec::with_capacity(count);

        for index in 0..count {
            instances.push(OrnamentInstance {
                point: FormationPoint {
                    scatter: scatter_point(rng, scatter_radius),
                    tree: spiral_point(
                        rng,
                        cone.height,
                        cone.base_radius,
                        cone.y_offset,
                        index,
                        count,
                    ),
                },
                rotation_seed: Vec3::new(
                    rng.random::<f32>() * TAU,
                    rng.random::<f32>() * TAU,
                    rng.random::<f32>() * TAU,
                ),
                scale: lerp(config.scale_min, config.scale_max, rng.random::<f32>()),
                float_speed: lerp(
                    config.float_speed_min,
                    config.float_speed_max,
                    rng.random::<f32>(),
                ),
                float_phase: rng.random::<f32>() * TAU,
            });
        }

        Self {
            instances,
            float_amplitude: config.float_amplitude,
            spin_speed: config.spin_speed,
            transforms: vec![0.0; count * INSTANCE_FLOATS],
        }
    }

    /// Rewrite the shared instance-transform buffer for this tick
    pub fn update(&mut self, progress: f32, time: f32) {
        let e = smoothstep(progress);
        let drift = 1.0 - e;

        for (k, instance) in self.instances.iter().enumerate() {
            let float_y = (time * instance.float_speed + instance.float_phase).sin()
                * drift
                * self.float_amplitude;
            let position = instance.point.scatter.lerp(&instance.point.tree, e)
                + Vec3::UP.scale(float_y);

            let spin = time * self.spin_speed * drift;
            let rotation = instance.rotation_seed + Vec3::new(0.0, spin, 0.0);

            let matrix = Mat4::compose(position, rotation, instance.scale);
            self.transforms[k * INSTANCE_FLOATS..(k + 1) * INSTANCE_FLOATS]
                .copy_from_slice(matrix.as_slice());
        }
    }

    /// Shared transform buffer for GPU upload
    pub fn transform_data(&self) -> &[f32] {
        &self.transforms
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    #[cfg(test)]
    fn instance(&self, k: usize) -> &OrnamentInstance {
        &self.instances[k]
    }
}

/// Shared bauble geometry: a low-poly lat/long sphere.
/// Layout per vertex: position(3) + normal(3).
pub fn bauble_geometry(rings: usize, sectors: usize) -> (Vec<f32>, Vec<u32>) {
    let mut vertices = Vec::with_capacity((rings + 1) * (sectors + 1) * 6);
    let mut indices = Vec::with_capacity(rings * sectors * 6);

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let polar = v * std::f32::consts::PI;
        for sector in 0..=sectors {
            let u = sector as f32 / sectors as f32;
            let azimuth = u * TAU;
            let normal = Vec3::new(
                polar.sin() * azimuth.cos(),
                polar.cos(),
                polar.sin() * azimuth.sin(),
            );
            vertices.extend_from_slice(&normal.to_array());
            vertices.extend_from_slice(&normal.to_array());
        }
    }

    let stride = (sectors + 1) as u32;
    for ring in 0..rings as u32 {
        for sector in 0..sectors as u32 {
            let a = ring * stride + sector;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1]);
            indices.extend_from_slice(&[a + 1, b, b + 1]);
        }
    }

    (vertices, indices)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
