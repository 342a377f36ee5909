//! Topper: the single hero element crowning the cone apex.
//!
//! Unlike the other elements it owns no vertex data; it renders through the
//! shared ornament geometry with a transform computed fresh each tick.

use rand::Rng;
use crate::config::{ConeConfig, TopperConfig};
use crate::formation::{ease, scatter_point, Easing};
use crate::math::{Mat4, Vec3};

pub struct Topper {
    scatter: Vec3,
    anchor: Vec3,
    config: TopperConfig,
}

impl Topper {
    pub fn new<R: Rng>(config: &TopperConfig, cone: &ConeConfig, rng: &mut R) -> Self {
        Self {
            scatter: scatter_point(rng, config.scatter_radius),
            anchor: Vec3::new(0.0, cone.height - cone.y_offset + config.lift, 0.0),
            config: config.clone(),
        }
    }

    /// Model transform for this tick, a pure function of progress and time
    pub fn transform(&self, progress: f32, time: f32) -> Mat4 {
        let e = ease(progress, Easing::CubicInOut);
        let cfg = &self.config;

        let position = self.scatter.lerp(&self.anchor, e);

        let spin_speed = lerp(cfg.spin_fast, cfg.spin_slow, e);
        let spin = time * spin_speed;
        let wobble = (time * cfg.wobble_frequency).sin() * cfg.wobble_amplitude * (1.0 - e);

        let scale = lerp(cfg.scale_scattered, cfg.scale_tree, e)
            * (1.0 + cfg.pulse_amplitude * (time * cfg.pulse_frequency).sin());

        Mat4::compose(position, Vec3::new(0.0, spin, wobble), scale)
    }

    pub fn color(&self) -> Vec3 {
        self.config.color
    }

    #[cfg(test)]
    fn anchor(&self) -> Vec3 {
        self.anchor
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

    fn build() -> Topper {
        let mut rng = SmallRng::seed_from_u64(11);
        Topper::new(&TopperConfig::default(), &ConeConfig::default(), &mut rng)
    }

    fn translation(m: &Mat4) -> Vec3 {
        let d = m.as_slice();
        Vec3::new(d[12], d[13], d[14])
    }

    #[test]
    fn test_anchor_sits_above_apex() {
        let cone = ConeConfig::default();
        let topper = build();
        let expected_y = cone.height - cone.y_offset + TopperConfig::default().lift;
        assert!((topper.anchor().y - expected_y).abs() < 1e-5);
        assert!(topper.anchor().x.abs() < 1e-5);
        assert!(topper.anchor().z.abs() < 1e-5);
    }

    #[test]
    fn test_assembled_topper_lands_on_anchor() {
        let topper = build();
        let m = topper.transform(1.0, 42.0);
        assert!(translation(&m).distance(&topper.anchor()) < 1e-4);
    }

    #[test]
    fn test_scattered_topper_starts_at_scatter_point() {
        let topper = build();
        let m = topper.transform(0.0, 0.0);
        assert!(translation(&m).distance(&topper.scatter) < 1e-4);
    }

    #[test]
    fn test_transform_is_deterministic() {
        let topper = build();
        let a = topper.transform(0.37, 9.1);
        let b = topper.transform(0.37, 9.1);
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_pulse_varies_scale_over_time() {
        let topper = build();
        let axis_len = |m: &Mat4| {
            let d = m.as_slice();
            (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
        };
        let cfg = TopperConfig::default();
        // Quarter period apart so the sine terms differ
        let t0 = 0.0;
        let t1 = std::f32::consts::FRAC_PI_2 / cfg.pulse_frequency;
        let a = axis_len(&topper.transform(1.0, t0));
        let b = axis_len(&topper.transform(1.0, t1));
        assert!((a - b).abs() > 1e-4, "pulse should modulate scale");
    }

    #[test]
    fn test_wobble_vanishes_when_assembled() {
        let topper = build();
        let cfg = TopperConfig::default();
        // Pick a time where the wobble sine peaks and the pulse sine is zero
        let time = std::f32::consts::FRAC_PI_2 / cfg.wobble_frequency;
        let m = topper.transform(1.0, time);
        let expected = Mat4::compose(
            topper.anchor(),
            Vec3::new(
                0.0,
                time * cfg.spin_slow,
                0.0,
            ),
            cfg.scale_tree * (1.0 + cfg.pulse_amplitude * (time * cfg.pulse_frequency).sin()),
        );
        for (a, b) in m.as_slice().iter().zip(expected.as_slice()) {
            assert!((a - b).abs() < 1e-4);
        }
    }
}
