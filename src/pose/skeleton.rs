use serde::{Deserialize, Serialize};

use super::joint::{Joint, JointType, Position, TrackingState};

/// Overall tracking state of one detected person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkeletonTrackingState {
    #[default]
    NotTracked,
    /// Only the body centre is known
    PositionOnly,
    Tracked,
}

/// Edge of the sensor's field of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameEdge {
    Right,
    Left,
    Top,
    Bottom,
}

impl FrameEdge {
    pub const ALL: [FrameEdge; 4] = [Self::Bottom, Self::Top, Self::Left, Self::Right];

    fn bit(self) -> u8 {
        match self {
            Self::Right => 1,
            Self::Left => 1 << 1,
            Self::Top => 1 << 2,
            Self::Bottom => 1 << 3,
        }
    }
}

/// Set of view edges the skeleton is cut off by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClippedEdges(u8);

impl ClippedEdges {
    pub fn none() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, edge: FrameEdge) {
        self.0 |= edge.bit();
    }

    pub fn contains(&self, edge: FrameEdge) -> bool {
        self.0 & edge.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Set edges in drawing order (bottom, top, left, right)
    pub fn iter(&self) -> impl Iterator<Item = FrameEdge> + '_ {
        FrameEdge::ALL.into_iter().filter(|e| self.contains(*e))
    }
}

impl FromIterator<FrameEdge> for ClippedEdges {
    fn from_iter<I: IntoIterator<Item = FrameEdge>>(iter: I) -> Self {
        let mut edges = Self::none();
        for edge in iter {
            edges.insert(edge);
        }
        edges
    }
}

/// All joints of one person in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub joints: [Joint; JointType::COUNT],
    pub tracking_state: SkeletonTrackingState,
    /// Body centre
    pub position: Position,
    pub clipped_edges: ClippedEdges,
}

impl Skeleton {
    /// Tracked skeleton with every joint untracked
    pub fn new() -> Self {
        Self {
            joints: JointType::ALL.map(Joint::not_tracked),
            tracking_state: SkeletonTrackingState::Tracked,
            position: Position::default(),
            clipped_edges: ClippedEdges::none(),
        }
    }

    pub fn get(&self, joint: JointType) -> &Joint {
        &self.joints[joint as usize]
    }

    pub fn set(&mut self, joint: JointType, position: Position, tracking_state: TrackingState) {
        self.joints[joint as usize] = Joint::new(joint, position, tracking_state);
    }

    /// Builder-style `set`
    pub fn with_joint(mut self, joint: JointType, position: Position, tracking_state: TrackingState) -> Self {
        self.set(joint, position, tracking_state);
        self
    }

    pub fn with_tracking_state(mut self, state: SkeletonTrackingState) -> Self {
        self.tracking_state = state;
        self
    }

    pub fn is_tracked(&self) -> bool {
        self.tracking_state == SkeletonTrackingState::Tracked
    }

    /// Joints in sensor order
    pub fn iter(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}

/// One sensor frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SkeletonFrame {
    pub frame_number: u64,
    pub timestamp_ms: u64,
    pub skeletons: Vec<Skeleton>,
}
