//! Dual-formation machinery: samplers, progress controller, easing

pub mod easing;
pub mod progress;
pub mod sampler;

pub use easing::{Easing, ease, smoothstep};
pub use progress::{AnimationClock, Formation, FormationProgress};
pub use sampler::{GOLDEN_ANGLE, scatter_point, spiral_point};
