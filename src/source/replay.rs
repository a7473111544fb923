//! JSON Lines replay of recorded skeleton frames.
//!
//! One frame per line:
//!
//! ```json
//! {"frame_number":1,"timestamp_ms":33,"skeletons":[{"tracking_state":"tracked",
//!  "joints":{"HipCenter":{"position":{"x":0.0,"y":1.0,"z":2.0},"tracking_state":"tracked"}}}]}
//! ```
//!
//! Joints missing from a skeleton are not tracked. Blank lines are skipped.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::pose::{
    ClippedEdges, FrameEdge, JointType, Position, Skeleton, SkeletonFrame, SkeletonTrackingState,
    TrackingState,
};

use super::SkeletonSource;

#[derive(Debug, Deserialize)]
struct FrameRecord {
    #[serde(default)]
    frame_number: Option<u64>,
    #[serde(default)]
    timestamp_ms: u64,
    #[serde(default)]
    skeletons: Vec<SkeletonRecord>,
}

#[derive(Debug, Deserialize)]
struct SkeletonRecord {
    #[serde(default)]
    tracking_state: SkeletonTrackingState,
    #[serde(default)]
    position: Position,
    #[serde(default)]
    clipped_edges: Vec<FrameEdge>,
    #[serde(default)]
    joints: BTreeMap<JointType, JointRecord>,
}

#[derive(Debug, Deserialize)]
struct JointRecord {
    position: Position,
    #[serde(default = "default_joint_state")]
    tracking_state: TrackingState,
}

fn default_joint_state() -> TrackingState {
    TrackingState::Tracked
}

impl SkeletonRecord {
    fn into_skeleton(self) -> Skeleton {
        let mut skeleton = Skeleton::new().with_tracking_state(self.tracking_state);
        skeleton.position = self.position;
        skeleton.clipped_edges = self.clipped_edges.into_iter().collect::<ClippedEdges>();
        for (joint, j) in self.joints {
            skeleton.set(joint, j.position, j.tracking_state);
        }
        skeleton
    }
}

/// Parse a single replay line. `fallback_number` is used when the line has
/// no frame number.
pub fn parse_frame(line: &str, fallback_number: u64) -> Result<SkeletonFrame> {
    let record: FrameRecord = serde_json::from_str(line)?;
    Ok(SkeletonFrame {
        frame_number: record.frame_number.unwrap_or(fallback_number),
        timestamp_ms: record.timestamp_ms,
        skeletons: record.skeletons.into_iter().map(SkeletonRecord::into_skeleton).collect(),
    })
}

/// Where replay lines come from
enum Origin {
    File(PathBuf),
    Reader(Option<Box<dyn BufRead>>),
}

/// Skeleton source that replays a recording line by line
pub struct ReplaySource {
    origin: Origin,
    lines: Option<Lines<Box<dyn BufRead>>>,
    line_number: usize,
    frames_read: u64,
}

impl ReplaySource {
    /// Replay from a file, opened on `start`
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::with_origin(Origin::File(path.as_ref().to_path_buf()))
    }

    /// Replay from any buffered reader; it can only be started once
    pub fn from_reader<R: BufRead + 'static>(reader: R) -> Self {
        Self::with_origin(Origin::Reader(Some(Box::new(reader))))
    }

    fn with_origin(origin: Origin) -> Self {
        Self {
            origin,
            lines: None,
            line_number: 0,
            frames_read: 0,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }
}

impl SkeletonSource for ReplaySource {
    fn start(&mut self) -> Result<()> {
        if self.lines.is_some() {
            bail!("replay already started");
        }
        let reader: Box<dyn BufRead> = match &mut self.origin {
            Origin::File(path) => {
                let file = File::open(&*path)
                    .with_context(|| format!("Failed to open replay {}", path.display()))?;
                Box::new(BufReader::new(file))
            }
            Origin::Reader(reader) => match reader.take() {
                Some(r) => r,
                None => bail!("replay reader was already consumed"),
            },
        };
        self.lines = Some(reader.lines());
        self.line_number = 0;
        self.frames_read = 0;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Option<SkeletonFrame>> {
        let lines = match self.lines.as_mut() {
            Some(lines) => lines,
            None => bail!("replay is not running"),
        };

        for line in lines.by_ref() {
            self.line_number += 1;
            let line = line.with_context(|| format!("Failed to read line {}", self.line_number))?;
            if line.trim().is_empty() {
                continue;
            }
            let frame = parse_frame(&line, self.frames_read + 1)
                .with_context(|| format!("Invalid frame on line {}", self.line_number))?;
            self.frames_read += 1;
            return Ok(Some(frame));
        }
        Ok(None)
    }

    fn stop(&mut self) {
        self.lines = None;
    }

    fn is_running(&self) -> bool {
        self.lines.is_some()
    }
}
