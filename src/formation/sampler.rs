//! Target-configuration samplers
//!
//! Every element owns two precomputed positions, one per formation. The
//! scatter sampler fills a sphere uniformly by volume; the spiral sampler
//! places indexed points on a tapered cone with golden-angle spacing.

use std::f32::consts::TAU;
use rand::Rng;
use crate::math::Vec3;

/// pi * (3 - sqrt(5)), maximally even angular spacing for any point count
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Random point uniformly distributed by volume inside a sphere.
///
/// Direction comes from spherical coordinates (phi = acos(2v - 1) avoids
/// pole clustering); the cube-root radial draw compensates for the r^2
/// volume growth so density is uniform rather than biased toward the center.
pub fn scatter_point<R: Rng>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = rng.random::<f32>() * TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
    let r = radius * rng.random::<f32>().cbrt();

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

/// Indexed point on a rising spiral inside a tapered cone.
///
/// Height is linear in index (index order matters for visual evenness), the
/// cone radius tapers to zero at the apex, and the sqrt radial draw gives
/// filled-disc density at each height instead of a hollow shell. The whole
/// cone is shifted down by `y_offset` so it is centered on the scene origin.
pub fn spiral_point<R: Rng>(
    rng: &mut R,
    height: f32,
    base_radius: f32,
    y_offset: f32,
    index: usize,
    total: usize,
) -> Vec3 {
    debug_assert!(total > 0, "spiral sampler requires a positive point count");
    debug_assert!(index < total, "spiral index out of range");

    let frac = index as f32 / total as f32;
    let y = frac * height;
    let radius_at_height = base_radius * (1.0 - frac);
    let r = radius_at_height * rng.random::<f32>().sqrt();
    let angle = index as f32 * GOLDEN_ANGLE;

    Vec3::new(r * angle.cos(), y - y_offset, r * angle.sin())
}
