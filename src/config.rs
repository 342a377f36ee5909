//! Scene configuration
//!
//! Everything geometric about the composition is decided here, once, at
//! construction time. Changing any of it means regenerating the affected
//! element's dual-position data; nothing in this module is consulted again
//! mid-animation.

use serde::Deserialize;
use thiserror::Error;
use crate::math::Vec3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be at least 1")]
    EmptyCount { name: &'static str },
    #[error("{name} range is inverted: max {max} is below min {min}")]
    InvertedRange { name: &'static str, min: f32, max: f32 },
    #[error("ribbon {index}: {name} must be at least 1")]
    RibbonSegments { index: usize, name: &'static str },
    #[error("ribbon {index}: {name} must be positive, got {value}")]
    RibbonNonPositive { index: usize, name: &'static str, value: f32 },
    #[error("ribbon {index}: height span [{bottom}, {top}] is invalid")]
    RibbonSpan { index: usize, bottom: f32, top: f32 },
}

/// Tapered cone the tree formation fills
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ConeConfig {
    pub height: f32,
    pub base_radius: f32,
    /// Downward shift so the cone is vertically centered on the origin
    pub y_offset: f32,
}

impl Default for ConeConfig {
    fn default() -> Self {
        Self {
            height: 9.0,
            base_radius: 3.2,
            y_offset: 4.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub size_scattered: f32,
    pub size_tree: f32,
    pub alpha_scattered: f32,
    pub alpha_tree: f32,
    /// Noise displacement amplitude while fully scattered
    pub float_amplitude: f32,
    /// Residual "breathing" amplitude once assembled
    pub settle_amplitude: f32,
    pub noise_frequency: f32,
    pub drift_speed: f32,
    pub color_a: Vec3,
    pub color_b: Vec3,
    pub accent_color: Vec3,
    /// Noise value above which a point is promoted to the accent color
    pub accent_threshold: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 3000,
            size_scattered: 26.0,
            size_tree: 14.0,
            alpha_scattered: 0.35,
            alpha_tree: 0.85,
            float_amplitude: 0.6,
            settle_amplitude: 0.02,
            noise_frequency: 0.35,
            drift_speed: 0.4,
            color_a: Vec3::new(0.10, 0.55, 0.30), // deep green
            color_b: Vec3::new(0.85, 0.25, 0.20), // warm red
            accent_color: Vec3::new(1.0, 0.85, 0.45), // gold
            accent_threshold: 0.55,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RibbonConfig {
    pub width: f32,
    pub segments: usize,
    /// Full turns around the cone between bottom and top
    pub turns: f32,
    /// Winding radius at the bottom of the span; tapers with the cone
    pub radius: f32,
    /// Span along the cone height, as fractions in [0, 1]
    pub bottom: f32,
    pub top: f32,
    /// Angular phase so multiple ribbons interleave
    pub phase: f32,
    /// Sphere radius for the scattered centerline samples
    pub scatter_radius: f32,
}

impl Default for RibbonConfig {
    fn default() -> Self {
        Self {
            width: 0.45,
            segments: 160,
            turns: 5.0,
            radius: 3.4,
            bottom: 0.04,
            top: 0.96,
            phase: 0.0,
            scatter_radius: 7.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrnamentConfig {
    pub count: usize,
    pub scale_min: f32,
    pub scale_max: f32,
    pub float_amplitude: f32,
    pub float_speed_min: f32,
    pub float_speed_max: f32,
    /// Spin rate while scattered; decays to zero once assembled
    pub spin_speed: f32,
    pub color: Vec3,
}

impl Default for OrnamentConfig {
    fn default() -> Self {
        Self {
            count: 240,
            scale_min: 0.10,
            scale_max: 0.22,
            float_amplitude: 0.35,
            float_speed_min: 0.6,
            float_speed_max: 1.8,
            spin_speed: 1.2,
            color: Vec3::new(0.9, 0.3, 0.25),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TopperConfig {
    /// Extra lift above the cone apex for the anchor point
    pub lift: f32,
    pub scatter_radius: f32,
    pub scale_scattered: f32,
    pub scale_tree: f32,
    pub spin_fast: f32,
    pub spin_slow: f32,
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
    pub pulse_amplitude: f32,
    pub pulse_frequency: f32,
    pub color: Vec3,
}

impl Default for TopperConfig {
    fn default() -> Self {
        Self {
            lift: 0.45,
            scatter_radius: 6.0,
            scale_scattered: 0.35,
            scale_tree: 0.55,
            spin_fast: 2.4,
            spin_slow: 0.4,
            wobble_amplitude: 0.3,
            wobble_frequency: 3.1,
            pulse_amplitude: 0.06,
            pulse_frequency: 2.0,
            color: Vec3::new(1.0, 0.88, 0.5),
        }
    }
}

/// Complete scene description, YAML-deserializable with full defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: u64,
    pub cone: ConeConfig,
    /// Sphere radius for scattered particles and ornaments
    pub scatter_radius: f32,
    pub particles: ParticleConfig,
    pub ribbons: Vec<RibbonConfig>,
    pub ornaments: OrnamentConfig,
    pub topper: TopperConfig,
    pub ribbon_color: Vec3,
}

impl Default for SceneConfig {
    /// Three interleaved ribbons on the default cone
    fn default() -> Self {
        let base = RibbonConfig::default();
        let third = std::f32::consts::TAU / 3.0;
        Self {
            seed: 7,
            cone: ConeConfig::default(),
            scatter_radius: 8.0,
            particles: ParticleConfig::default(),
            ribbons: vec![
                RibbonConfig { phase: 0.0, ..base },
                RibbonConfig { phase: third, ..base },
                RibbonConfig { phase: third * 2.0, ..base },
            ],
            ornaments: OrnamentConfig::default(),
            topper: TopperConfig::default(),
            ribbon_color: Vec3::new(0.92, 0.78, 0.35),
        }
    }
}

impl SceneConfig {

    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject invalid geometry up front; nothing here is checked again
    /// once the animation is running.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::NonPositive { name, value })
            }
        }

        positive("cone.height", self.cone.height)?;
        positive("cone.base_radius", self.cone.base_radius)?;
        positive("scatter_radius", self.scatter_radius)?;

        if self.particles.count == 0 {
            return Err(ConfigError::EmptyCount { name: "particles.count" });
        }
        positive("particles.float_amplitude", self.particles.float_amplitude)?;

        if self.ornaments.count == 0 {
            return Err(ConfigError::EmptyCount { name: "ornaments.count" });
        }
        fn ordered(name: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
            if max >= min {
                Ok(())
            } else {
                Err(ConfigError::InvertedRange { name, min, max })
            }
        }

        positive("ornaments.scale_min", self.ornaments.scale_min)?;
        positive("ornaments.scale_max", self.ornaments.scale_max)?;
        positive("ornaments.float_speed_min", self.ornaments.float_speed_min)?;
        positive("ornaments.float_speed_max", self.ornaments.float_speed_max)?;
        ordered("ornaments.scale", self.ornaments.scale_min, self.ornaments.scale_max)?;
        ordered(
            "ornaments.float_speed",
            self.ornaments.float_speed_min,
            self.ornaments.float_speed_max,
        )?;

        positive("topper.scatter_radius", self.topper.scatter_radius)?;
        positive("topper.scale_scattered", self.topper.scale_scattered)?;
        positive("topper.scale_tree", self.topper.scale_tree)?;

        for (index, ribbon) in self.ribbons.iter().enumerate() {
            if ribbon.segments == 0 {
                return Err(ConfigError::RibbonSegments { index, name: "segments" });
            }
            for (name, value) in [
                ("width", ribbon.width),
                ("radius", ribbon.radius),
                ("scatter_radius", ribbon.scatter_radius),
            ] {
                if value <= 0.0 {
                    return Err(ConfigError::RibbonNonPositive { index, name, value });
                }
            }
            let (bottom, top) = (ribbon.bottom, ribbon.top);
            if !(0.0..=1.0).contains(&bottom) || !(0.0..=1.0).contains(&top) || bottom >= top {
                return Err(ConfigError::RibbonSpan { index, bottom, top });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ribbons.len(), 3);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
seed: 99
cone:
  height: 12.0
particles:
  count: 500
"#;
        let config = SceneConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.cone.height, 12.0);
        assert_eq!(config.particles.count, 500);
        // Untouched sections keep their defaults
        assert_eq!(config.cone.base_radius, ConeConfig::default().base_radius);
    }

    #[test]
    fn test_parse_ribbon_list() {
        let yaml = r#"
scatter_radius: 5.0
ribbons:
  - segments: 80
    turns: 4.0
    phase: 0.0
  - segments: 80
    turns: 4.0
    phase: 2.1
"#;
        let config = SceneConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.ribbons.len(), 2);
        assert_eq!(config.ribbons[0].segments, 80);
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        let result = SceneConfig::from_yaml("cone: [not, a, map]");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_particle_count_rejected() {
        let yaml = "particles:\n  count: 0\n";
        let result = SceneConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::EmptyCount { .. })));
    }

    #[test]
    fn test_zero_ribbon_segments_rejected() {
        let yaml = "ribbons:\n  - segments: 0\n";
        let result = SceneConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::RibbonSegments { .. })));
    }

    #[test]
    fn test_negative_radius_rejected() {
        let yaml = "cone:\n  base_radius: -1.5\n";
        let result = SceneConfig::from_yaml(yaml);
        match result {
            Err(ConfigError::NonPositive { name, value }) => {
                assert_eq!(name, "cone.base_radius");
                assert_eq!(value, -1.5);
            }
            other => panic!("expected NonPositive, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_float_speed_max_rejected() {
        let yaml = "ornaments:\n  float_speed_max: -2.0\n";
        let result = SceneConfig::from_yaml(yaml);
        match result {
            Err(ConfigError::NonPositive { name, value }) => {
                assert_eq!(name, "ornaments.float_speed_max");
                assert_eq!(value, -2.0);
            }
            other => panic!("expected NonPositive, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_float_speed_range_rejected() {
        let yaml = "ornaments:\n  float_speed_min: 1.8\n  float_speed_max: 0.6\n";
        let result = SceneConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::InvertedRange { .. })));
    }

    #[test]
    fn test_inverted_scale_range_rejected() {
        let yaml = "ornaments:\n  scale_min: 0.3\n  scale_max: 0.1\n";
        let result = SceneConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::InvertedRange { .. })));
    }

    #[test]
    fn test_inverted_ribbon_span_rejected() {
        let yaml = "ribbons:\n  - bottom: 0.9\n    top: 0.1\n";
        let result = SceneConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::RibbonSpan { .. })));
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = SceneConfig::from_yaml("scatter_radius: 0.0\n").unwrap_err();
        assert!(err.to_string().contains("scatter_radius"));
    }
}
