use crate::pose::{Skeleton, TrackingState};

use super::leg::LegSide;

/// Where a joint sits in depth relative to a reference joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthPlacement {
    /// Within the band of the reference
    Aligned,
    /// Closer to the sensor than the reference
    Behind,
    /// Further from the sensor than the reference
    Ahead,
}

impl DepthPlacement {
    /// `Aligned` while `|z - reference_z| < band`, strictly
    pub fn classify(z: f32, reference_z: f32, band: f32) -> Self {
        if (z - reference_z).abs() < band {
            Self::Aligned
        } else if z < reference_z {
            Self::Behind
        } else {
            Self::Ahead
        }
    }
}

/// Requires the checked ankle to stay in the plane of the standing ankle.
///
/// Passes when `checked.z - other.z < max_offset`. Fails when either ankle
/// is untracked or has a non-finite depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnkleDepthGate {
    side: LegSide,
    max_offset: f32,
}

impl AnkleDepthGate {
    pub const DEFAULT_MAX_OFFSET: f32 = 0.05;

    pub fn new(side: LegSide, max_offset: f32) -> Self {
        Self { side, max_offset }
    }

    pub fn passes(&self, skeleton: &Skeleton) -> bool {
        let checked = skeleton.get(self.side.ankle());
        let other = skeleton.get(self.side.opposite().ankle());

        let readable = |z: f32, state: TrackingState| state != TrackingState::NotTracked && z.is_finite();
        if !readable(checked.position.z, checked.tracking_state)
            || !readable(other.position.z, other.tracking_state)
        {
            return false;
        }

        checked.position.z - other.position.z < self.max_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{JointType, Position};

    fn make_ankles(left_z: f32, right_z: f32) -> Skeleton {
        Skeleton::new()
            .with_joint(JointType::AnkleLeft, Position::new(0.8, 0.0, left_z), TrackingState::Tracked)
            .with_joint(JointType::AnkleRight, Position::new(0.0, 0.0, right_z), TrackingState::Tracked)
    }

    #[test]
    fn test_classify() {
        assert_eq!(DepthPlacement::classify(2.0, 2.1, 0.2), DepthPlacement::Aligned);
        assert_eq!(DepthPlacement::classify(2.2, 2.1, 0.2), DepthPlacement::Aligned);
        assert_eq!(DepthPlacement::classify(1.7, 2.1, 0.2), DepthPlacement::Behind);
        assert_eq!(DepthPlacement::classify(2.5, 2.1, 0.2), DepthPlacement::Ahead);
    }

    #[test]
    fn test_classify_band_boundary() {
        assert_eq!(DepthPlacement::classify(2.5, 2.0, 0.5), DepthPlacement::Ahead);
        assert_eq!(DepthPlacement::classify(1.5, 2.0, 0.5), DepthPlacement::Behind);
        assert_eq!(DepthPlacement::classify(2.25, 2.0, 0.5), DepthPlacement::Aligned);
        assert_eq!(DepthPlacement::classify(1.75, 2.0, 0.5), DepthPlacement::Aligned);
    }

    #[test]
    fn test_gate_passes_in_plane() {
        let gate = AnkleDepthGate::new(LegSide::Left, AnkleDepthGate::DEFAULT_MAX_OFFSET);
        assert!(gate.passes(&make_ankles(2.0, 2.0)));
        assert!(gate.passes(&make_ankles(2.04, 2.0)));
        // Only a forward offset of the checked ankle is rejected
        assert!(gate.passes(&make_ankles(1.5, 2.0)));
    }

    #[test]
    fn test_gate_rejects_forward_ankle() {
        let gate = AnkleDepthGate::new(LegSide::Left, AnkleDepthGate::DEFAULT_MAX_OFFSET);
        assert!(!gate.passes(&make_ankles(2.1, 2.0)));

        let right = AnkleDepthGate::new(LegSide::Right, AnkleDepthGate::DEFAULT_MAX_OFFSET);
        assert!(right.passes(&make_ankles(2.1, 2.0)));
    }

    #[test]
    fn test_gate_fails_without_other_ankle() {
        let skeleton = Skeleton::new()
            .with_joint(JointType::AnkleLeft, Position::new(0.8, 0.0, 2.0), TrackingState::Tracked);
        let gate = AnkleDepthGate::new(LegSide::Left, AnkleDepthGate::DEFAULT_MAX_OFFSET);
        assert!(!gate.passes(&skeleton));
    }
}
