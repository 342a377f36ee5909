//! Formation progress controller
//!
//! Owns the single scalar every element reads each tick. The controller runs
//! first in the frame; everything downstream treats `current()` and the
//! clock as read-only snapshots for that tick.

/// The two target configurations of the composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Formation {
    /// Volumetric random cloud (progress target 0)
    #[default]
    Scattered,
    /// Conical golden-angle spiral (progress target 1)
    TreeShape,
}

impl Formation {
    pub fn target(self) -> f32 {
        match self {
            Formation::Scattered => 0.0,
            Formation::TreeShape => 1.0,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Formation::Scattered => Formation::TreeShape,
            Formation::TreeShape => Formation::Scattered,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "scattered" => Some(Formation::Scattered),
            "tree" => Some(Formation::TreeShape),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Formation::Scattered => "scattered",
            Formation::TreeShape => "tree",
        }
    }
}

/// Shared damping rate so the whole composition morphs in lock-step
pub const DAMPING_RATE: f32 = 2.0;

/// Below this distance the progress snaps to the target exactly,
/// avoiding asymptotic creep
pub const SNAP_EPSILON: f32 = 0.001;

/// Damped scalar progress in [0, 1] toward the current formation's target
#[derive(Debug, Clone, Copy)]
pub struct FormationProgress {
    current: f32,
    formation: Formation,
}

impl FormationProgress {
    /// Start already settled in the given formation
    pub fn new(formation: Formation) -> Self {
        Self {
            current: formation.target(),
            formation,
        }
    }

    /// Retarget the controller. Always legal mid-transition; future movement
    /// simply reverses direction with no discrete jump.
    pub fn set_formation(&mut self, formation: Formation) {
        self.formation = formation;
    }

    pub fn toggle(&mut self) {
        self.formation = self.formation.toggled();
    }

    pub fn formation(&self) -> Formation {
        self.formation
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.formation.target()
    }

    /// Advance one tick. The step factor is capped at 1 so a pathological
    /// dt (stalled tab) lands on the target instead of overshooting it.
    pub fn advance(&mut self, dt: f32) {
        let diff = self.formation.target() - self.current;
        if diff.abs() > SNAP_EPSILON {
            self.current += diff * (DAMPING_RATE * dt).min(1.0);
            self.current = self.current.clamp(0.0, 1.0);
        } else {
            self.current = self.formation.target();
        }
    }
}

/// Monotone elapsed time, advanced once per frame by the entry point and
/// read-only everywhere else
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationClock {
    elapsed: f32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_starts_settled() {
        let p = FormationProgress::new(Formation::Scattered);
        assert_eq!(p.current(), 0.0);
        assert!(p.is_settled());

        let p = FormationProgress::new(Formation::TreeShape);
        assert_eq!(p.current(), 1.0);
    }

    #[test]
    fn test_monotone_rise_until_snap() {
        let mut p = FormationProgress::new(Formation::Scattered);
        p.set_formation(Formation::TreeShape);

        let mut prev = p.current();
        for _ in 0..2000 {
            p.advance(DT);
            let cur = p.current();
            assert!(cur >= prev, "progress must never move backwards");
            assert!(cur <= 1.0, "progress must never overshoot");
            prev = cur;
        }
        assert_eq!(p.current(), 1.0, "progress must snap to exactly 1");
        assert!(p.is_settled());
    }

    #[test]
    fn test_strictly_increasing_before_snap() {
        let mut p = FormationProgress::new(Formation::Scattered);
        p.set_formation(Formation::TreeShape);

        let before = p.current();
        p.advance(DT);
        assert!(p.current() > before);
    }

    #[test]
    fn test_reversal_is_continuous() {
        let mut p = FormationProgress::new(Formation::Scattered);
        p.set_formation(Formation::TreeShape);
        for _ in 0..30 {
            p.advance(DT);
        }
        let mid = p.current();
        assert!(mid > 0.0 && mid < 1.0);

        // Reversing target changes direction, not value
        p.set_formation(Formation::Scattered);
        assert_eq!(p.current(), mid);

        p.advance(DT);
        assert!(p.current() < mid);
        assert!((mid - p.current()) < 0.1, "no discontinuous jump");
    }

    #[test]
    fn test_huge_dt_does_not_overshoot() {
        let mut p = FormationProgress::new(Formation::Scattered);
        p.set_formation(Formation::TreeShape);
        p.advance(10.0);
        assert!(p.current() <= 1.0);
        p.advance(10.0);
        assert_eq!(p.current(), 1.0);
    }

    #[test]
    fn test_toggle() {
        let mut p = FormationProgress::new(Formation::Scattered);
        p.toggle();
        assert_eq!(p.formation(), Formation::TreeShape);
        p.toggle();
        assert_eq!(p.formation(), Formation::Scattered);
    }

    #[test]
    fn test_formation_names() {
        assert_eq!(Formation::from_name("tree"), Some(Formation::TreeShape));
        assert_eq!(Formation::from_name("scattered"), Some(Formation::Scattered));
        assert_eq!(Formation::from_name("nonsense"), None);
        assert_eq!(Formation::TreeShape.name(), "tree");
    }

    #[test]
    fn test_clock_monotone() {
        let mut clock = AnimationClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert!((clock.elapsed() - 0.75).abs() < 0.0001);

        // Negative dt is ignored rather than rewinding time
        clock.advance(-1.0);
        assert!((clock.elapsed() - 0.75).abs() < 0.0001);
    }
}
