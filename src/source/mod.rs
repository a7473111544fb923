pub mod replay;

pub use replay::{parse_frame, ReplaySource};

use anyhow::Result;

use crate::pose::SkeletonFrame;

/// Owned producer of skeleton frames with an explicit lifecycle.
///
/// `next_frame` is only valid between `start` and `stop`. `Ok(None)` means
/// the source is exhausted.
pub trait SkeletonSource {
    fn start(&mut self) -> Result<()>;
    fn next_frame(&mut self) -> Result<Option<SkeletonFrame>>;
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}
