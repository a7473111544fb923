use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::exercise::{AngleTarget, AnkleDepthGate, LegSide};
use crate::pose::{JointType, TrackingState};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub exercise: ExerciseConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExerciseConfig {
    /// Target leg angle from vertical (degrees, 0-90)
    #[serde(default = "default_target_angle")]
    pub target_angle: f64,
    /// Allowed error (degrees). Defaults to 5% of the target angle.
    #[serde(default)]
    pub tolerance: Option<f64>,
    /// Leg to check
    #[serde(default)]
    pub side: LegSide,
    /// Upper joint of the measured segment; the lower one is the ankle of `side`
    #[serde(default = "default_pivot")]
    pub pivot: JointType,
    /// Weakest joint tracking state the check accepts
    #[serde(default = "default_min_tracking")]
    pub min_tracking: TrackingState,
    /// Require the checked ankle to stay level in depth with the other one
    #[serde(default = "default_true")]
    pub depth_gate: bool,
    /// Max forward offset of the checked ankle (metres)
    #[serde(default = "default_max_ankle_depth_offset")]
    pub max_ankle_depth_offset: f32,
    /// Colour knee/ankle/foot of the checked leg by depth placement
    #[serde(default)]
    pub colour_leg_joints_by_depth: bool,
    /// Depth band for joint placement (metres)
    #[serde(default = "default_depth_band")]
    pub depth_band: f32,
}

fn default_target_angle() -> f64 { 40.0 }
fn default_pivot() -> JointType { JointType::HipCenter }
fn default_min_tracking() -> TrackingState { TrackingState::Inferred }
fn default_true() -> bool { true }
fn default_max_ankle_depth_offset() -> f32 { AnkleDepthGate::DEFAULT_MAX_OFFSET }
fn default_depth_band() -> f32 { 0.2 }

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            target_angle: default_target_angle(),
            tolerance: None,
            side: LegSide::default(),
            pivot: default_pivot(),
            min_tracking: default_min_tracking(),
            depth_gate: default_true(),
            max_ankle_depth_offset: default_max_ankle_depth_offset(),
            colour_leg_joints_by_depth: false,
            depth_band: default_depth_band(),
        }
    }
}

impl ExerciseConfig {
    pub fn tolerance(&self) -> f64 {
        self.tolerance
            .unwrap_or(self.target_angle * AngleTarget::DEFAULT_TOLERANCE_RATIO)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayConfig {
    /// JSON Lines file with one skeleton frame per line
    #[serde(default = "default_replay_path")]
    pub path: String,
}

fn default_replay_path() -> String { "frames.jsonl".to_string() }

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            path: default_replay_path(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Falls back to defaults when the file is missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Config error ({}), using defaults: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ex = &self.exercise;
        AngleTarget::new(ex.target_angle, ex.tolerance())?;
        if ex.tolerance() == 0.0 {
            bail!(
                "tolerance is 0 (target_angle = {}), no angle can ever match; set a positive tolerance",
                ex.target_angle
            );
        }
        if ex.pivot == ex.side.ankle() {
            bail!("pivot joint {} is the measured ankle itself", ex.pivot);
        }
        if !ex.max_ankle_depth_offset.is_finite() {
            bail!("max_ankle_depth_offset must be finite");
        }
        if !ex.depth_band.is_finite() || ex.depth_band <= 0.0 {
            bail!("depth_band must be positive, got {}", ex.depth_band);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.exercise.target_angle, 40.0);
        assert!((config.exercise.tolerance() - 2.0).abs() < 1e-9);
        assert_eq!(config.exercise.side, LegSide::Left);
        assert_eq!(config.exercise.pivot, JointType::HipCenter);
        assert_eq!(config.exercise.min_tracking, TrackingState::Inferred);
        assert!(config.exercise.depth_gate);
        assert_eq!(config.replay.path, "frames.jsonl");
    }

    #[test]
    fn test_parse_exercise_section() {
        let config = Config::parse(
            r#"
            [exercise]
            target_angle = 30.0
            tolerance = 1.5
            side = "right"
            pivot = "HipRight"
            min_tracking = "tracked"
            depth_gate = false

            [replay]
            path = "session.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(config.exercise.target_angle, 30.0);
        assert_eq!(config.exercise.tolerance(), 1.5);
        assert_eq!(config.exercise.side, LegSide::Right);
        assert_eq!(config.exercise.pivot, JointType::HipRight);
        assert_eq!(config.exercise.min_tracking, TrackingState::Tracked);
        assert!(!config.exercise.depth_gate);
        assert_eq!(config.replay.path, "session.jsonl");
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let err = Config::parse("[exercise]\ntolerance = -1.0\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_zero_effective_tolerance() {
        // 5% of a 0° target is 0°
        assert!(Config::parse("[exercise]\ntarget_angle = 0.0\n").is_err());
        assert!(Config::parse("[exercise]\ntolerance = 0.0\n").is_err());
        let config = Config::parse("[exercise]\ntarget_angle = 0.0\ntolerance = 3.0\n").unwrap();
        assert_eq!(config.exercise.tolerance(), 3.0);
    }

    #[test]
    fn test_rejects_target_outside_leg_range() {
        assert!(Config::parse("[exercise]\ntarget_angle = 120.0\n").is_err());
    }

    #[test]
    fn test_rejects_pivot_equal_to_ankle() {
        assert!(Config::parse("[exercise]\npivot = \"AnkleLeft\"\n").is_err());
    }

    #[test]
    fn test_rejects_unknown_joint() {
        assert!(Config::parse("[exercise]\npivot = \"Tail\"\n").is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("does/not/exist.toml");
        assert_eq!(config.exercise.target_angle, 40.0);
    }
}
