//! Colour policy for the stick figure.
//!
//! Turns a skeleton frame and the leg check into a list of primitives in
//! sensor space. Projection and drawing are left to the caller.

use crate::exercise::{DepthPlacement, LegRaise, LegVerdict};
use crate::pose::{FrameEdge, JointType, Position, Skeleton, SkeletonTrackingState, TrackingState};

use super::skeleton::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoneStyle {
    /// Both joints tracked, position valid
    Valid,
    /// Both joints tracked, checked leg out of position
    Invalid,
    /// One joint inferred
    Inferred,
}

impl BoneStyle {
    pub fn color(self) -> u32 {
        match self {
            Self::Valid => VALID_BONE_COLOR,
            Self::Invalid => INVALID_BONE_COLOR,
            Self::Inferred => INFERRED_BONE_COLOR,
        }
    }

    pub fn thickness(self) -> f32 {
        match self {
            Self::Valid | Self::Invalid => TRACKED_BONE_THICKNESS,
            Self::Inferred => INFERRED_BONE_THICKNESS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointStyle {
    Tracked,
    Inferred,
    Placement(DepthPlacement),
}

impl JointStyle {
    pub fn color(self) -> u32 {
        match self {
            Self::Tracked => TRACKED_JOINT_COLOR,
            Self::Inferred => INFERRED_JOINT_COLOR,
            Self::Placement(DepthPlacement::Aligned) => ALIGNED_JOINT_COLOR,
            Self::Placement(DepthPlacement::Behind) => BEHIND_JOINT_COLOR,
            Self::Placement(DepthPlacement::Ahead) => AHEAD_JOINT_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    ClipEdge(FrameEdge),
    CenterPoint(Position),
    Bone {
        from: JointType,
        to: JointType,
        start: Position,
        end: Position,
        style: BoneStyle,
    },
    Joint {
        joint: JointType,
        position: Position,
        style: JointStyle,
    },
}

impl Primitive {
    pub fn color(&self) -> u32 {
        match self {
            Self::ClipEdge(_) => CLIP_EDGE_COLOR,
            Self::CenterPoint(_) => CENTER_POINT_COLOR,
            Self::Bone { style, .. } => style.color(),
            Self::Joint { style, .. } => style.color(),
        }
    }

    /// Line width for bones and clip bars, radius for points
    pub fn thickness(&self) -> f32 {
        match self {
            Self::ClipEdge(_) => CLIP_BOUNDS_THICKNESS,
            Self::CenterPoint(_) => BODY_CENTER_THICKNESS,
            Self::Bone { style, .. } => style.thickness(),
            Self::Joint { .. } => JOINT_THICKNESS,
        }
    }
}

/// Draw list for one frame, in drawing order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the primitives of one skeleton.
    ///
    /// `verdict` is the leg check for this skeleton; it is only consulted
    /// for fully tracked skeletons.
    pub fn add_skeleton(&mut self, skeleton: &Skeleton, raise: &LegRaise, verdict: Option<&LegVerdict>) {
        for edge in skeleton.clipped_edges.iter() {
            self.primitives.push(Primitive::ClipEdge(edge));
        }

        match skeleton.tracking_state {
            SkeletonTrackingState::Tracked => {
                let leg_valid = verdict.map(|v| v.is_valid()).unwrap_or(false);
                self.add_bones(skeleton, raise, leg_valid);
                self.add_joints(skeleton, raise);
            }
            SkeletonTrackingState::PositionOnly => {
                self.primitives.push(Primitive::CenterPoint(skeleton.position));
            }
            SkeletonTrackingState::NotTracked => {}
        }
    }

    fn add_bones(&mut self, skeleton: &Skeleton, raise: &LegRaise, leg_valid: bool) {
        for &(from, to) in BONES.iter() {
            let valid = leg_valid || !raise.is_leg_segment(from, to);
            if let Some(style) = bone_style(skeleton, from, to, valid) {
                self.primitives.push(Primitive::Bone {
                    from,
                    to,
                    start: skeleton.get(from).position,
                    end: skeleton.get(to).position,
                    style,
                });
            }
        }
    }

    fn add_joints(&mut self, skeleton: &Skeleton, raise: &LegRaise) {
        for joint in skeleton.iter() {
            let style = match joint.tracking_state {
                TrackingState::NotTracked => continue,
                TrackingState::Inferred => JointStyle::Inferred,
                TrackingState::Tracked => raise
                    .joint_placement(skeleton, joint.joint_type)
                    .map(JointStyle::Placement)
                    .unwrap_or(JointStyle::Tracked),
            };
            self.primitives.push(Primitive::Joint {
                joint: joint.joint_type,
                position: joint.position,
                style,
            });
        }
    }

    pub fn bones(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Bone { .. }))
    }

    /// Style of the bone between `from` and `to`, if it was drawn
    pub fn bone_style(&self, from: JointType, to: JointType) -> Option<BoneStyle> {
        self.primitives.iter().find_map(|p| match p {
            Primitive::Bone { from: f, to: t, style, .. } if *f == from && *t == to => Some(*style),
            _ => None,
        })
    }
}

/// Bone policy: nothing when either joint is lost or both are only
/// inferred, thin grey unless both are tracked, otherwise green or red.
pub fn bone_style(skeleton: &Skeleton, from: JointType, to: JointType, valid: bool) -> Option<BoneStyle> {
    let a = skeleton.get(from).tracking_state;
    let b = skeleton.get(to).tracking_state;

    if a == TrackingState::NotTracked || b == TrackingState::NotTracked {
        return None;
    }
    if a == TrackingState::Inferred && b == TrackingState::Inferred {
        return None;
    }
    if a == TrackingState::Tracked && b == TrackingState::Tracked {
        return Some(if valid { BoneStyle::Valid } else { BoneStyle::Invalid });
    }
    Some(BoneStyle::Inferred)
}
