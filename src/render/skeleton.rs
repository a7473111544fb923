use crate::pose::JointType;

/// Bones of the stick figure (start joint, end joint)
pub const BONES: [(JointType, JointType); 19] = [
    // Torso
    (JointType::Head, JointType::ShoulderCenter),
    (JointType::ShoulderCenter, JointType::ShoulderLeft),
    (JointType::ShoulderCenter, JointType::ShoulderRight),
    (JointType::ShoulderCenter, JointType::Spine),
    (JointType::Spine, JointType::HipCenter),
    (JointType::HipCenter, JointType::HipLeft),
    (JointType::HipCenter, JointType::HipRight),
    // Left arm
    (JointType::ShoulderLeft, JointType::ElbowLeft),
    (JointType::ElbowLeft, JointType::WristLeft),
    (JointType::WristLeft, JointType::HandLeft),
    // Right arm
    (JointType::ShoulderRight, JointType::ElbowRight),
    (JointType::ElbowRight, JointType::WristRight),
    (JointType::WristRight, JointType::HandRight),
    // Left leg
    (JointType::HipLeft, JointType::KneeLeft),
    (JointType::KneeLeft, JointType::AnkleLeft),
    (JointType::AnkleLeft, JointType::FootLeft),
    // Right leg
    (JointType::HipRight, JointType::KneeRight),
    (JointType::KneeRight, JointType::AnkleRight),
    (JointType::AnkleRight, JointType::FootRight),
];

/// Bone between two tracked joints in a valid position
pub const VALID_BONE_COLOR: u32 = 0x008000;
/// Bone of the checked leg when the pose is not satisfied
pub const INVALID_BONE_COLOR: u32 = 0xFF0000;
/// Bone with at least one inferred joint
pub const INFERRED_BONE_COLOR: u32 = 0x808080;

pub const TRACKED_BONE_THICKNESS: f32 = 6.0;
pub const INFERRED_BONE_THICKNESS: f32 = 1.0;

pub const TRACKED_JOINT_COLOR: u32 = 0x44C044;
pub const INFERRED_JOINT_COLOR: u32 = 0xFF0000;
pub const ALIGNED_JOINT_COLOR: u32 = 0x008000;
pub const BEHIND_JOINT_COLOR: u32 = 0xFFFF00;
pub const AHEAD_JOINT_COLOR: u32 = 0x5DC1B9;
pub const JOINT_THICKNESS: f32 = 3.0;

/// Body centre of a position-only skeleton
pub const CENTER_POINT_COLOR: u32 = 0x0000FF;
pub const BODY_CENTER_THICKNESS: f32 = 10.0;

pub const CLIP_EDGE_COLOR: u32 = 0xFF0000;
pub const CLIP_BOUNDS_THICKNESS: f32 = 10.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_joint_is_connected() {
        for joint in JointType::ALL {
            assert!(
                BONES.iter().any(|(a, b)| *a == joint || *b == joint),
                "{} has no bone",
                joint
            );
        }
    }

    #[test]
    fn test_no_duplicate_bones() {
        for (i, bone) in BONES.iter().enumerate() {
            assert!(!BONES[i + 1..].contains(bone));
        }
    }
}
