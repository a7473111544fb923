pub mod depth;
pub mod leg;
pub mod raise;

pub use depth::{AnkleDepthGate, DepthPlacement};
pub use leg::{evaluate, segment_angle, AngleReading, AngleTarget, LegAngleCheck, LegSide, Unevaluable};
pub use raise::{LegRaise, LegVerdict};
