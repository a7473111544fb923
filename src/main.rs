use anyhow::Result;
use std::io::Write;

use leg_raise::config::Config;
use leg_raise::exercise::LegRaise;
use leg_raise::session::{FrameReport, Session};
use leg_raise::source::ReplaySource;

const CONFIG_PATH: &str = "config.toml";

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

type LogFile = std::io::BufWriter<std::fs::File>;

fn open_log_file() -> Result<LogFile> {
    std::fs::create_dir_all("logs")?;
    let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = format!("logs/leg_raise_{}.log", ts);
    let file = std::fs::File::create(&path)?;
    eprintln!("Log: {}", path);
    Ok(std::io::BufWriter::new(file))
}

macro_rules! log {
    ($logfile:expr, $($arg:tt)*) => {{
        let msg = format!($($arg)*);
        eprintln!("{}", msg);
        let _ = writeln!($logfile, "{}", msg);
        let _ = $logfile.flush();
    }};
}

fn replay_path_arg() -> Option<String> {
    // Usage: leg_raise [replay.jsonl]
    std::env::args().nth(1)
}

fn describe(report: &FrameReport) -> String {
    if report.verdicts.is_empty() {
        return format!("frame {:>6}: no tracked skeleton", report.frame_number);
    }
    let parts: Vec<String> = report
        .verdicts
        .iter()
        .map(|v| {
            let state = match (&v.verdict.angle, v.verdict.depth_aligned) {
                (Err(reason), _) => format!("unknown ({})", reason),
                (Ok(reading), depth) => format!(
                    "{} angle={:.1} dev={:.1}{}",
                    if v.verdict.is_valid() { "OK " } else { "BAD" },
                    reading.angle_deg,
                    reading.deviation_deg,
                    match depth {
                        Some(false) => " [ankle out of plane]",
                        _ => "",
                    }
                ),
            };
            format!("#{} {}", v.index, state)
        })
        .collect();
    format!("frame {:>6}: {}", report.frame_number, parts.join(", "))
}

fn main() -> Result<()> {
    let mut config = Config::load_or_default(CONFIG_PATH);
    if let Some(path) = replay_path_arg() {
        config.replay.path = path;
    }
    config.validate()?;

    let mut logfile = open_log_file()?;
    log!(logfile, "Leg Raise Check ({})", env!("GIT_VERSION"));
    log!(logfile, "Replay: {}", config.replay.path);
    log!(
        logfile,
        "Target: {:.1} deg +/- {:.2}, side={:?}, pivot={}",
        config.exercise.target_angle,
        config.exercise.tolerance(),
        config.exercise.side,
        config.exercise.pivot
    );
    log!(
        logfile,
        "Depth gate: {}",
        if config.exercise.depth_gate {
            format!("ON (max offset {} m)", config.exercise.max_ankle_depth_offset)
        } else {
            "OFF".to_string()
        }
    );

    let raise = LegRaise::from_config(&config.exercise)?;
    let source = ReplaySource::open(&config.replay.path);
    let mut session = Session::new(source, raise);

    let summary = session.run(|report| {
        log!(logfile, "{}", describe(report));
        Ok(())
    })?;

    log!(
        logfile,
        "Done: {} frames, {} evaluations ({} ok, {} bad, {} unknown)",
        summary.frames,
        summary.evaluated,
        summary.satisfied,
        summary.violated,
        summary.unevaluable
    );

    Ok(())
}
