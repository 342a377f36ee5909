//! Easing functions applied on top of the shared formation progress

/// Easing function types
#[derive(Debug, Clone, Copy, Default)]
pub enum Easing {
    /// Raw progress, no remap
    Linear,
    /// Hermite smoothstep (default for most elements)
    #[default]
    Smoothstep,
    /// Cubic ease-in-out (used by the topper)
    CubicInOut,
}

/// Apply easing function to a value t in range [0, 1]
pub fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::Smoothstep => smoothstep(t),
        Easing::CubicInOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        }
    }
}

/// t^2 (3 - 2t), the shared blend curve for ribbons and ornaments
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
