use anyhow::Result;

use crate::exercise::{LegRaise, LegVerdict};
use crate::pose::SkeletonFrame;
use crate::render::Scene;
use crate::source::SkeletonSource;

/// Leg check for one skeleton of a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkeletonVerdict {
    /// Index of the skeleton within the frame
    pub index: usize,
    pub verdict: LegVerdict,
}

/// Everything produced for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_number: u64,
    pub timestamp_ms: u64,
    pub verdicts: Vec<SkeletonVerdict>,
    pub scene: Scene,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub evaluated: u64,
    pub satisfied: u64,
    pub violated: u64,
    pub unevaluable: u64,
}

impl RunSummary {
    fn record(&mut self, report: &FrameReport) {
        self.frames += 1;
        for v in &report.verdicts {
            self.evaluated += 1;
            if !v.verdict.is_evaluable() {
                self.unevaluable += 1;
            } else if v.verdict.is_valid() {
                self.satisfied += 1;
            } else {
                self.violated += 1;
            }
        }
    }
}

/// Evaluate one frame: every tracked skeleton is checked once
pub fn process_frame(frame: &SkeletonFrame, raise: &LegRaise) -> FrameReport {
    let mut verdicts = Vec::new();
    let mut scene = Scene::new();

    for (index, skeleton) in frame.skeletons.iter().enumerate() {
        let verdict = skeleton.is_tracked().then(|| raise.assess(skeleton));
        scene.add_skeleton(skeleton, raise, verdict.as_ref());
        if let Some(verdict) = verdict {
            verdicts.push(SkeletonVerdict { index, verdict });
        }
    }

    FrameReport {
        frame_number: frame.frame_number,
        timestamp_ms: frame.timestamp_ms,
        verdicts,
        scene,
    }
}

/// Drives a skeleton source frame by frame on the calling thread
pub struct Session<S: SkeletonSource> {
    source: S,
    raise: LegRaise,
}

impl<S: SkeletonSource> Session<S> {
    pub fn new(source: S, raise: LegRaise) -> Self {
        Self { source, raise }
    }

    pub fn raise(&self) -> &LegRaise {
        &self.raise
    }

    /// Start the source, hand each frame's report to `on_frame` until the
    /// source is exhausted, then stop it. The source is stopped on error too.
    pub fn run<F>(&mut self, mut on_frame: F) -> Result<RunSummary>
    where
        F: FnMut(&FrameReport) -> Result<()>,
    {
        self.source.start()?;
        let result = self.pump(&mut on_frame);
        self.source.stop();
        result
    }

    fn pump<F>(&mut self, on_frame: &mut F) -> Result<RunSummary>
    where
        F: FnMut(&FrameReport) -> Result<()>,
    {
        let mut summary = RunSummary::default();
        while let Some(frame) = self.source.next_frame()? {
            let report = process_frame(&frame, &self.raise);
            summary.record(&report);
            on_frame(&report)?;
        }
        Ok(summary)
    }

    /// Give the source back
    pub fn into_source(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::{AngleTarget, LegAngleCheck, LegSide};
    use crate::pose::{JointType, Position, Skeleton, SkeletonTrackingState, TrackingState};
    use std::collections::VecDeque;

    /// In-memory source that records its lifecycle
    struct QueueSource {
        frames: VecDeque<SkeletonFrame>,
        running: bool,
        starts: u32,
        stops: u32,
    }

    impl QueueSource {
        fn new(frames: Vec<SkeletonFrame>) -> Self {
            Self {
                frames: frames.into(),
                running: false,
                starts: 0,
                stops: 0,
            }
        }
    }

    impl SkeletonSource for QueueSource {
        fn start(&mut self) -> Result<()> {
            self.running = true;
            self.starts += 1;
            Ok(())
        }

        fn next_frame(&mut self) -> Result<Option<SkeletonFrame>> {
            anyhow::ensure!(self.running, "not running");
            Ok(self.frames.pop_front())
        }

        fn stop(&mut self) {
            self.running = false;
            self.stops += 1;
        }

        fn is_running(&self) -> bool {
            self.running
        }
    }

    fn make_raise() -> LegRaise {
        let check = LegAngleCheck::new(AngleTarget::new(40.0, 2.0).unwrap(), LegSide::Left);
        LegRaise::new(check)
    }

    fn leg_at(ankle_x: f32) -> Skeleton {
        Skeleton::new()
            .with_joint(JointType::HipCenter, Position::new(0.0, 1.0, 2.0), TrackingState::Tracked)
            .with_joint(JointType::AnkleLeft, Position::new(ankle_x, 0.0, 2.0), TrackingState::Tracked)
    }

    fn frame(number: u64, skeletons: Vec<Skeleton>) -> SkeletonFrame {
        SkeletonFrame {
            frame_number: number,
            timestamp_ms: number * 33,
            skeletons,
        }
    }

    #[test]
    fn test_process_frame_skips_untracked_skeletons() {
        let untracked = Skeleton::new().with_tracking_state(SkeletonTrackingState::NotTracked);
        let report = process_frame(&frame(1, vec![untracked, leg_at(0.84)]), &make_raise());
        assert_eq!(report.verdicts.len(), 1);
        assert_eq!(report.verdicts[0].index, 1);
        assert!(report.verdicts[0].verdict.is_valid());
    }

    #[test]
    fn test_run_summary() {
        let frames = vec![
            frame(1, vec![leg_at(0.84)]),
            frame(2, vec![leg_at(0.2)]),
            frame(3, vec![Skeleton::new()]),
            frame(4, vec![]),
        ];
        let mut session = Session::new(QueueSource::new(frames), make_raise());
        let mut seen = Vec::new();
        let summary = session
            .run(|report| {
                seen.push(report.frame_number);
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(
            summary,
            RunSummary {
                frames: 4,
                evaluated: 3,
                satisfied: 1,
                violated: 1,
                unevaluable: 1,
            }
        );

        let source = session.into_source();
        assert!(!source.is_running());
        assert_eq!((source.starts, source.stops), (1, 1));
    }

    #[test]
    fn test_demo_recording() {
        use crate::source::ReplaySource;

        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/frames.jsonl");
        let raise = make_raise().with_depth_gate(0.05);
        let mut session = Session::new(ReplaySource::open(path), raise);
        let summary = session.run(|_| Ok(())).unwrap();

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.evaluated, 3);
        assert_eq!(summary.satisfied, 1);
        assert_eq!(summary.violated, 2);
        assert_eq!(summary.unevaluable, 0);
    }

    #[test]
    fn test_source_stopped_when_callback_fails() {
        let frames = vec![frame(1, vec![leg_at(0.84)]), frame(2, vec![leg_at(0.84)])];
        let mut session = Session::new(QueueSource::new(frames), make_raise());
        let result = session.run(|_| anyhow::bail!("renderer gone"));
        assert!(result.is_err());

        let source = session.into_source();
        assert!(!source.is_running());
        assert_eq!(source.stops, 1);
        assert_eq!(source.frames.len(), 1);
    }
}
