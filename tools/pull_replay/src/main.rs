use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use magpull::{
    default_config, DetectorConfig, DetectorTraceSample, GestureEvent, GestureKind,
    PullDetector, SensorChannel, SensorFrame, Vector3,
};
use serde::Serialize;

const TRACE_HEADER: &str = "sensor,ms,x,y,z";
const DECISION_HEADER: &str = "decision,ms,state,reason,instant,baseline,mask,hold_ms";

#[derive(Debug, Parser)]
#[command(name = "pull_replay")]
#[command(about = "Replay a recorded sensor trace through the pull detector")]
struct Cli {
    /// CSV trace with `field|accel,ms,x,y,z` rows.
    trace: PathBuf,
    /// Detector configuration in the `config/detector.toml` layout.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Newline separated gesture kinds the replay must produce.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Print gestures as JSON lines instead of CSV.
    #[arg(long)]
    json: bool,
    /// Also print the per-sample decision trace: numeric state and reject
    /// codes in CSV mode, full records with `--json`.
    #[arg(long = "decision-trace")]
    decision_trace: bool,
    /// Poll the detector this long after the last sample.
    #[arg(long = "tail-ms", default_value_t = 0)]
    tail_ms: u64,
}

#[derive(Serialize)]
struct GestureLine {
    kind: GestureKind,
    at_ms: u64,
}

fn main() {
    env_logger::init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => default_config(),
    };
    let frames = parse_trace(&cli.trace)?;
    info!("replaying {} samples from {}", frames.len(), cli.trace.display());

    let mut detector = PullDetector::new(config).context("detector configuration rejected")?;
    let mut events: Vec<GestureEvent> = Vec::new();
    if cli.decision_trace && !cli.json {
        println!("{DECISION_HEADER}");
    }
    for frame in &frames {
        let output = detector.tick(*frame);
        if cli.decision_trace && frame.channel == SensorChannel::MagneticField {
            if cli.json {
                println!("{}", serde_json::to_string(&output.trace)?);
            } else {
                println!("{}", decision_line(&output.trace));
            }
        }
        events.extend(output.gesture);
    }

    if let Some(last_ms) = frames.last().map(|f| f.now_ms) {
        if cli.tail_ms > 0 {
            let tail_ms = last_ms.saturating_add(cli.tail_ms);
            detector.poll(tail_ms);
            debug!(
                "polled at {tail_ms}ms, gesture in progress: {}",
                detector.is_gesture_in_progress(tail_ms)
            );
        }
    }

    if cli.json {
        for event in &events {
            let line = GestureLine {
                kind: event.kind,
                at_ms: event.at_ms,
            };
            println!("{}", serde_json::to_string(&line)?);
        }
    } else {
        println!("event,ms,kind");
        for event in &events {
            println!("event,{},{}", event.at_ms, event.kind.as_str());
        }
    }

    if let Some(expect_path) = &cli.expect {
        let expected = parse_expected_kinds(expect_path)?;
        let actual: Vec<GestureKind> = events.iter().map(|e| e.kind).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", join_kinds(&expected));
            eprintln!("actual kinds:   {}", join_kinds(&actual));
            bail!("gesture sequence mismatch");
        }
    }

    Ok(())
}

fn decision_line(trace: &DetectorTraceSample) -> String {
    format!(
        "decision,{},{},{},{:.1},{:.1},{:#04x},{}",
        trace.now_ms,
        trace.state_id.as_u8(),
        trace.reject_reason.as_u8(),
        trace.instant_delta,
        trace.baseline_delta,
        trace.pattern_mask,
        trace.long_hold_ms
    )
}

fn load_config(path: &Path) -> Result<DetectorConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: DetectorConfig =
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

fn parse_trace(path: &Path) -> Result<Vec<SensorFrame>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut frames = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == TRACE_HEADER {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let [sensor, ms, x, y, z] = parts.as_slice() else {
            bail!(
                "{}:{} invalid trace line, expected 5 columns",
                path.display(),
                line_no
            );
        };

        let now_ms: u64 = ms
            .parse()
            .with_context(|| format!("{}:{} invalid ms '{ms}'", path.display(), line_no))?;
        let sample = Vector3::new(
            parse_axis(x, path, line_no, "x")?,
            parse_axis(y, path, line_no, "y")?,
            parse_axis(z, path, line_no, "z")?,
        );

        let frame = match *sensor {
            "field" => SensorFrame::field(now_ms, sample),
            "accel" => SensorFrame::acceleration(now_ms, sample),
            other => bail!(
                "{}:{} unknown sensor '{other}', expected field or accel",
                path.display(),
                line_no
            ),
        };
        frames.push(frame);
    }

    Ok(frames)
}

fn parse_axis(raw: &str, path: &Path, line_no: usize, field: &str) -> Result<f32> {
    raw.parse::<f32>()
        .with_context(|| format!("{}:{} invalid {field} '{raw}'", path.display(), line_no))
}

fn parse_expected_kinds(path: &Path) -> Result<Vec<GestureKind>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut kinds = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let Some(kind) = normalize_kind(token) else {
            bail!(
                "{}:{} invalid expected gesture kind: {token}",
                path.display(),
                idx + 1
            );
        };
        kinds.push(kind);
    }

    Ok(kinds)
}

fn normalize_kind(kind: &str) -> Option<GestureKind> {
    match kind.to_ascii_lowercase().as_str() {
        "short_click" | "short" => Some(GestureKind::ShortClick),
        "long_click" | "long" => Some(GestureKind::LongClick),
        _ => None,
    }
}

fn join_kinds(kinds: &[GestureKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pull_replay_{}_{name}", process::id()));
        fs::write(&path, contents).expect("write temp file");
        path
    }

    #[test]
    fn parses_field_and_accel_rows() {
        let path = write_temp(
            "rows.csv",
            "# comment\nsensor,ms,x,y,z\nfield,10,-338,0,0\naccel, 12, 0, 0, 9.8\n",
        );
        let frames = parse_trace(&path).expect("valid trace");
        assert_eq!(
            frames,
            vec![
                SensorFrame::field(10, Vector3::new(-338.0, 0.0, 0.0)),
                SensorFrame::acceleration(12, Vector3::new(0.0, 0.0, 9.8)),
            ]
        );
    }

    #[test]
    fn rejects_unknown_sensor() {
        let path = write_temp("bad_sensor.csv", "gyro,10,0,0,0\n");
        let err = parse_trace(&path).unwrap_err();
        assert!(err.to_string().contains("unknown sensor 'gyro'"));
    }

    #[test]
    fn rejects_short_rows() {
        let path = write_temp("short.csv", "field,10,0\n");
        let err = parse_trace(&path).unwrap_err();
        assert!(err.to_string().contains("expected 5 columns"));
    }

    #[test]
    fn expected_kinds_accept_short_aliases() {
        let path = write_temp("kinds.txt", "# header\nshort_click\nLONG\n");
        let kinds = parse_expected_kinds(&path).expect("valid kinds");
        assert_eq!(kinds, vec![GestureKind::ShortClick, GestureKind::LongClick]);
    }

    #[test]
    fn bundled_trace_matches_its_expectation() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("traces");
        let frames = parse_trace(&root.join("short_then_long.csv")).expect("bundled trace");
        let expected =
            parse_expected_kinds(&root.join("short_then_long.expect")).expect("bundled kinds");

        let mut detector = PullDetector::default();
        let actual: Vec<GestureKind> = frames
            .iter()
            .filter_map(|frame| detector.tick(*frame).gesture)
            .map(|event| event.kind)
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn decision_line_uses_numeric_codes() {
        let mut detector = PullDetector::default();
        detector.on_field(0, Vector3::new(-338.0, 0.0, 0.0));
        let output = detector.on_field(10, Vector3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(decision_line(&output.trace), "decision,10,0,12,0.0,0.0,0x00,0");
    }

    #[test]
    fn repo_config_loads_and_validates() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/detector.toml");
        assert_eq!(load_config(&path).expect("repo config"), default_config());
    }
}
