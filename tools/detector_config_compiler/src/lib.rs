//! Build-time compiler for `config/detector.toml`.
//!
//! Parses the detector tunables, checks them and renders a Rust source file
//! holding a `DETECTOR_CONFIG` constant. The library `include!`s the output
//! so the defaults are fixed at build time while hosts can still override
//! them at runtime.

use std::{fmt::Write as _, fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

/// Mirrors the history capacity of the detector; the baseline can never need
/// more samples than the history is able to hold.
pub const HISTORY_CAPACITY: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigCompilerError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorFile {
    pub settle_ms: u64,
    pub baseline_min_samples: u32,
    pub thresholds: ThresholdsSection,
    pub pattern: PatternSection,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdsSection {
    pub click_threshold: f32,
    pub long_click_threshold: f32,
    pub cooldown_ms: u64,
    pub long_hold_ms: u64,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AxisSetting {
    X,
    Y,
    Z,
    HighestVariance,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DirectionSetting {
    Negative,
    Positive,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternSection {
    pub axis: AxisSetting,
    pub pull_direction: DirectionSetting,
    pub trend_step_ratio: f32,
    pub dominance_ratio: f32,
    pub axis_delta_ratio: f32,
    pub direction_margin: f32,
    pub quick_change_ratio: f32,
    pub baseline_ratio: f32,
    pub accel_jerk_min: f32,
}

impl PatternSection {
    fn tunables(&self) -> [f32; 7] {
        [
            self.trend_step_ratio,
            self.dominance_ratio,
            self.axis_delta_ratio,
            self.direction_margin,
            self.quick_change_ratio,
            self.baseline_ratio,
            self.accel_jerk_min,
        ]
    }
}

pub fn parse_detector_str(source: &str) -> Result<DetectorFile, ConfigCompilerError> {
    toml::from_str(source).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn parse_detector_file(path: &Path) -> Result<DetectorFile, ConfigCompilerError> {
    let source = fs::read_to_string(path)
        .map_err(|e| ConfigCompilerError::Io(format!("{}: {e}", path.display())))?;
    parse_detector_str(&source)
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

pub fn validate_config(config: &DetectorFile) -> Result<(), ConfigCompilerError> {
    let thresholds = &config.thresholds;

    if !positive(thresholds.click_threshold) || !positive(thresholds.long_click_threshold) {
        return Err(ConfigCompilerError::Validation(
            "thresholds.click_threshold and thresholds.long_click_threshold must be positive"
                .into(),
        ));
    }

    if thresholds.long_click_threshold < thresholds.click_threshold {
        return Err(ConfigCompilerError::Validation(
            "thresholds.long_click_threshold must be >= thresholds.click_threshold".into(),
        ));
    }

    if thresholds.long_hold_ms == 0 {
        return Err(ConfigCompilerError::Validation(
            "thresholds.long_hold_ms must be > 0".into(),
        ));
    }

    if config.settle_ms == 0 {
        return Err(ConfigCompilerError::Validation(
            "settle_ms must be > 0".into(),
        ));
    }

    if config.baseline_min_samples == 0 || config.baseline_min_samples > HISTORY_CAPACITY {
        return Err(ConfigCompilerError::Validation(format!(
            "baseline_min_samples must be within 1..={HISTORY_CAPACITY}"
        )));
    }

    if config
        .pattern
        .tunables()
        .iter()
        .any(|value| !value.is_finite() || *value < 0.0)
    {
        return Err(ConfigCompilerError::Validation(
            "all pattern tunables must be finite and non-negative".into(),
        ));
    }

    Ok(())
}

fn axis_expr(axis: AxisSetting) -> &'static str {
    match axis {
        AxisSetting::X => "AxisSelection::Fixed(Axis::X)",
        AxisSetting::Y => "AxisSelection::Fixed(Axis::Y)",
        AxisSetting::Z => "AxisSelection::Fixed(Axis::Z)",
        AxisSetting::HighestVariance => "AxisSelection::HighestVariance",
    }
}

fn direction_expr(direction: DirectionSetting) -> &'static str {
    match direction {
        DirectionSetting::Negative => "PullDirection::Negative",
        DirectionSetting::Positive => "PullDirection::Positive",
    }
}

// `{:?}` always keeps a decimal point or exponent, so the literal stays f32.
fn float_literal(value: f32) -> String {
    format!("{value:?}")
}

pub fn render_generated_config(config: &DetectorFile) -> String {
    let t = &config.thresholds;
    let p = &config.pattern;
    let mut out = String::new();

    out.push_str("// @generated by detector_config_compiler from config/detector.toml.\n");
    out.push_str("// Do not edit by hand.\n\n");
    out.push_str("pub const DETECTOR_CONFIG: DetectorConfig = DetectorConfig {\n");

    out.push_str("    thresholds: GestureThresholds {\n");
    let _ = writeln!(
        out,
        "        click_threshold: {},",
        float_literal(t.click_threshold)
    );
    let _ = writeln!(
        out,
        "        long_click_threshold: {},",
        float_literal(t.long_click_threshold)
    );
    let _ = writeln!(out, "        cooldown_ms: {},", t.cooldown_ms);
    let _ = writeln!(out, "        long_hold_ms: {},", t.long_hold_ms);
    out.push_str("    },\n");

    out.push_str("    pattern: PatternConfig {\n");
    let _ = writeln!(out, "        axis: {},", axis_expr(p.axis));
    let _ = writeln!(
        out,
        "        pull_direction: {},",
        direction_expr(p.pull_direction)
    );
    for (name, value) in [
        ("trend_step_ratio", p.trend_step_ratio),
        ("dominance_ratio", p.dominance_ratio),
        ("axis_delta_ratio", p.axis_delta_ratio),
        ("direction_margin", p.direction_margin),
        ("quick_change_ratio", p.quick_change_ratio),
        ("baseline_ratio", p.baseline_ratio),
        ("accel_jerk_min", p.accel_jerk_min),
    ] {
        let _ = writeln!(out, "        {name}: {},", float_literal(value));
    }
    out.push_str("    },\n");

    let _ = writeln!(out, "    settle_ms: {},", config.settle_ms);
    let _ = writeln!(
        out,
        "    baseline_min_samples: {},",
        config.baseline_min_samples
    );
    out.push_str("};\n");

    out
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let config = parse_detector_file(path)?;
    validate_config(&config)?;
    Ok(render_generated_config(&config))
}
