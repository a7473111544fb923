//! Leg angle check.
//!
//! Measures the segment from a pivot joint (hip centre by default) to the
//! ankle of one leg and compares its angle to vertical against a target.
//! Only the horizontal (x) and vertical (y) displacements are used, so the
//! result is invariant to uniform scaling and to depth.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ExerciseConfig;
use crate::pose::{JointType, Position, Skeleton, TrackingState};

/// Which leg is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSide {
    #[default]
    Left,
    Right,
}

impl LegSide {
    pub fn hip(self) -> JointType {
        match self {
            Self::Left => JointType::HipLeft,
            Self::Right => JointType::HipRight,
        }
    }

    pub fn knee(self) -> JointType {
        match self {
            Self::Left => JointType::KneeLeft,
            Self::Right => JointType::KneeRight,
        }
    }

    pub fn ankle(self) -> JointType {
        match self {
            Self::Left => JointType::AnkleLeft,
            Self::Right => JointType::AnkleRight,
        }
    }

    pub fn foot(self) -> JointType {
        match self {
            Self::Left => JointType::FootLeft,
            Self::Right => JointType::FootRight,
        }
    }

    /// Leg a joint belongs to, None for torso and arm joints
    pub fn of_joint(joint: JointType) -> Option<Self> {
        [Self::Left, Self::Right]
            .into_iter()
            .find(|side| [side.hip(), side.knee(), side.ankle(), side.foot()].contains(&joint))
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Hip→knee, knee→ankle, ankle→foot
    pub fn segments(self) -> [(JointType, JointType); 3] {
        [
            (self.hip(), self.knee()),
            (self.knee(), self.ankle()),
            (self.ankle(), self.foot()),
        ]
    }
}

/// Why a skeleton could not be checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unevaluable {
    SkeletonNotTracked,
    JointNotTracked(JointType),
    InvalidPosition(JointType),
    /// Pivot and end share the same x/y, the segment has no direction
    CoincidentJoints,
}

impl fmt::Display for Unevaluable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkeletonNotTracked => write!(f, "skeleton is not fully tracked"),
            Self::JointNotTracked(joint) => write!(f, "joint {} is not tracked", joint),
            Self::InvalidPosition(joint) => write!(f, "joint {} has a non-finite position", joint),
            Self::CoincidentJoints => write!(f, "pivot and end joints coincide"),
        }
    }
}

impl std::error::Error for Unevaluable {}

/// Target angle in degrees from vertical, with the allowed error
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTarget {
    angle_deg: f64,
    tolerance_deg: f64,
}

impl AngleTarget {
    /// Default tolerance as a fraction of the target angle
    pub const DEFAULT_TOLERANCE_RATIO: f64 = 0.05;

    pub fn new(angle_deg: f64, tolerance_deg: f64) -> Result<Self> {
        if !angle_deg.is_finite() || !(0.0..=90.0).contains(&angle_deg) {
            bail!("target angle must be within 0..=90 degrees, got {}", angle_deg);
        }
        if !tolerance_deg.is_finite() || tolerance_deg < 0.0 {
            bail!("tolerance must be a non-negative number of degrees, got {}", tolerance_deg);
        }
        Ok(Self {
            angle_deg,
            tolerance_deg,
        })
    }

    /// Target with a tolerance of 5% of the angle
    pub fn with_default_tolerance(angle_deg: f64) -> Result<Self> {
        Self::new(angle_deg, angle_deg * Self::DEFAULT_TOLERANCE_RATIO)
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn tolerance_deg(&self) -> f64 {
        self.tolerance_deg
    }

    /// Strict bound: a deviation equal to the tolerance does not match,
    /// so a zero tolerance never matches.
    pub fn matches(&self, angle_deg: f64) -> bool {
        within(self.angle_deg, angle_deg, self.tolerance_deg)
    }
}

fn within(target: f64, angle: f64, tolerance: f64) -> bool {
    (target - angle).abs() < tolerance
}

/// Angle in degrees between the pivot→end segment and vertical, in [0, 90].
///
/// A horizontal segment (no vertical displacement) measures 90°.
/// Returns None when the joints coincide in x/y.
pub fn segment_angle(pivot: Position, end: Position) -> Option<f64> {
    let dx = (pivot.x as f64 - end.x as f64).abs();
    let dy = (pivot.y as f64 - end.y as f64).abs();

    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    if dy == 0.0 {
        return Some(90.0);
    }

    Some((dx / dy).atan().to_degrees().rem_euclid(360.0))
}

/// Result of one successful measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleReading {
    pub angle_deg: f64,
    /// Absolute difference from the target
    pub deviation_deg: f64,
    pub satisfied: bool,
}

/// Configurable leg angle evaluator
#[derive(Debug, Clone, PartialEq)]
pub struct LegAngleCheck {
    target: AngleTarget,
    /// Leg of the end joint
    side: LegSide,
    pivot: JointType,
    end: JointType,
    /// Joints below this state are refused
    min_tracking: TrackingState,
}

impl LegAngleCheck {
    /// Hip centre to the ankle of `side`, inferred joints accepted
    pub fn new(target: AngleTarget, side: LegSide) -> Self {
        Self {
            target,
            side,
            pivot: JointType::HipCenter,
            end: side.ankle(),
            min_tracking: TrackingState::Inferred,
        }
    }

    pub fn from_config(config: &ExerciseConfig) -> Result<Self> {
        let target = AngleTarget::new(config.target_angle, config.tolerance())?;
        Ok(Self::new(target, config.side)
            .with_joints(config.pivot, config.side.ankle())
            .with_min_tracking(config.min_tracking))
    }

    /// Measure `pivot`→`end` instead. The checked side follows `end` when it
    /// is a leg joint.
    pub fn with_joints(mut self, pivot: JointType, end: JointType) -> Self {
        self.pivot = pivot;
        self.end = end;
        if let Some(side) = LegSide::of_joint(end) {
            self.side = side;
        }
        self
    }

    pub fn with_min_tracking(mut self, min_tracking: TrackingState) -> Self {
        self.min_tracking = min_tracking;
        self
    }

    pub fn side(&self) -> LegSide {
        self.side
    }

    pub fn target(&self) -> &AngleTarget {
        &self.target
    }

    pub fn joints(&self) -> (JointType, JointType) {
        (self.pivot, self.end)
    }

    /// Measure the segment angle and compare it to the target
    pub fn measure(&self, skeleton: &Skeleton) -> Result<AngleReading, Unevaluable> {
        if !skeleton.is_tracked() {
            return Err(Unevaluable::SkeletonNotTracked);
        }
        let pivot = self.usable_position(skeleton, self.pivot)?;
        let end = self.usable_position(skeleton, self.end)?;

        let angle_deg = segment_angle(pivot, end).ok_or(Unevaluable::CoincidentJoints)?;
        Ok(AngleReading {
            angle_deg,
            deviation_deg: (self.target.angle_deg - angle_deg).abs(),
            satisfied: self.target.matches(angle_deg),
        })
    }

    pub fn check(&self, skeleton: &Skeleton) -> Result<bool, Unevaluable> {
        self.measure(skeleton).map(|r| r.satisfied)
    }

    /// Boolean contract for renderers: anything that cannot be evaluated
    /// is reported as not satisfied.
    pub fn is_satisfied(&self, skeleton: &Skeleton) -> bool {
        self.check(skeleton).unwrap_or(false)
    }

    fn usable_position(&self, skeleton: &Skeleton, joint: JointType) -> Result<Position, Unevaluable> {
        let j = skeleton.get(joint);
        if j.tracking_state == TrackingState::NotTracked || !j.is_at_least(self.min_tracking) {
            return Err(Unevaluable::JointNotTracked(joint));
        }
        if !j.position.is_finite() {
            return Err(Unevaluable::InvalidPosition(joint));
        }
        Ok(j.position)
    }
}

/// Check the hip-centre→left-ankle segment against `target_deg ± tolerance_deg`.
///
/// Returns false when the skeleton cannot be evaluated and for a negative
/// tolerance.
pub fn evaluate(skeleton: &Skeleton, target_deg: f64, tolerance_deg: f64) -> bool {
    let check = LegAngleCheck {
        target: AngleTarget {
            angle_deg: target_deg,
            tolerance_deg,
        },
        side: LegSide::Left,
        pivot: JointType::HipCenter,
        end: JointType::AnkleLeft,
        min_tracking: TrackingState::Inferred,
    };
    check
        .measure(skeleton)
        .map(|r| within(target_deg, r.angle_deg, tolerance_deg))
        .unwrap_or(false)
}
