pub mod joint;
pub mod skeleton;

pub use joint::{Joint, JointType, Position, TrackingState};
pub use skeleton::{ClippedEdges, FrameEdge, Skeleton, SkeletonFrame, SkeletonTrackingState};
