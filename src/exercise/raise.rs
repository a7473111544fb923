use anyhow::Result;

use crate::config::ExerciseConfig;
use crate::pose::{Joint, JointType, Skeleton, TrackingState};

use super::depth::{AnkleDepthGate, DepthPlacement};
use super::leg::{AngleReading, LegAngleCheck, LegSide, Unevaluable};

/// Outcome of checking one skeleton
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegVerdict {
    pub angle: Result<AngleReading, Unevaluable>,
    /// None when the depth gate is disabled
    pub depth_aligned: Option<bool>,
}

impl LegVerdict {
    /// The leg is drawn as valid only when every enabled condition holds
    pub fn is_valid(&self) -> bool {
        let angle_ok = matches!(self.angle, Ok(AngleReading { satisfied: true, .. }));
        angle_ok && self.depth_aligned.unwrap_or(true)
    }

    pub fn is_evaluable(&self) -> bool {
        self.angle.is_ok()
    }
}

/// Raised-leg exercise: angle check, ankle depth gate and optional depth
/// placement of the leg joints
#[derive(Debug, Clone, PartialEq)]
pub struct LegRaise {
    side: LegSide,
    angle: LegAngleCheck,
    depth_gate: Option<AnkleDepthGate>,
    /// Band for per-joint depth placement, None to leave joints uncoloured
    joint_depth_band: Option<f32>,
}

impl LegRaise {
    /// The coloured leg is always the one the angle check measures
    pub fn new(angle: LegAngleCheck) -> Self {
        Self {
            side: angle.side(),
            angle,
            depth_gate: None,
            joint_depth_band: None,
        }
    }

    pub fn from_config(config: &ExerciseConfig) -> Result<Self> {
        let mut raise = Self::new(LegAngleCheck::from_config(config)?);
        if config.depth_gate {
            raise.depth_gate = Some(AnkleDepthGate::new(config.side, config.max_ankle_depth_offset));
        }
        if config.colour_leg_joints_by_depth {
            raise.joint_depth_band = Some(config.depth_band);
        }
        Ok(raise)
    }

    pub fn with_depth_gate(mut self, max_offset: f32) -> Self {
        self.depth_gate = Some(AnkleDepthGate::new(self.side, max_offset));
        self
    }

    pub fn with_joint_depth_band(mut self, band: f32) -> Self {
        self.joint_depth_band = Some(band);
        self
    }

    pub fn side(&self) -> LegSide {
        self.side
    }

    pub fn angle_check(&self) -> &LegAngleCheck {
        &self.angle
    }

    pub fn assess(&self, skeleton: &Skeleton) -> LegVerdict {
        LegVerdict {
            angle: self.angle.measure(skeleton),
            depth_aligned: self.depth_gate.map(|g| g.passes(skeleton)),
        }
    }

    /// True for the three bones of the checked leg
    pub fn is_leg_segment(&self, from: JointType, to: JointType) -> bool {
        self.side.segments().contains(&(from, to))
    }

    /// Depth placement of a checked-leg joint against the same joint of the
    /// other leg, if joint colouring is enabled
    pub fn joint_placement(&self, skeleton: &Skeleton, joint: JointType) -> Option<DepthPlacement> {
        let band = self.joint_depth_band?;
        let reference = match joint {
            j if j == self.side.knee() => self.side.opposite().knee(),
            j if j == self.side.ankle() => self.side.opposite().ankle(),
            j if j == self.side.foot() => self.side.opposite().foot(),
            _ => return None,
        };
        let j = skeleton.get(joint);
        let r = skeleton.get(reference);
        let readable = |j: &Joint| j.tracking_state != TrackingState::NotTracked && j.position.z.is_finite();
        if !readable(j) || !readable(r) {
            return None;
        }
        Some(DepthPlacement::classify(j.position.z, r.position.z, band))
    }
}
