pub mod scene;
pub mod skeleton;

pub use scene::{bone_style, BoneStyle, JointStyle, Primitive, Scene};
pub use skeleton::BONES;
