//! Animated scene elements: particle field, ribbon strips, instanced
//! ornaments, and the tree topper. Each element precomputes its dual target
//! positions once and is afterwards a pure function of (progress, time).

pub mod ornaments;
pub mod particles;
pub mod ribbon;
pub mod topper;

pub use ornaments::OrnamentSet;
pub use particles::ParticleField;
pub use ribbon::Ribbon;
pub use topper::Topper;

use crate::math::Vec3;

/// One element's two target positions. Immutable once generated; both are
/// finite and lie inside their formation's bounding volume.
#[derive(Debug, Clone, Copy)]
pub struct FormationPoint {
    pub scatter: Vec3,
    pub tree: Vec3,
}
