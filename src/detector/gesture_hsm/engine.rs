use statig::blocking::IntoStateMachineExt as _;

use super::super::{
    config::{default_config, PatternConfig},
    error::DetectorError,
};
use super::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineOutput {
    pub gesture: Option<GestureEvent>,
    pub trace: DetectorTraceSample,
}

/// Pull-gesture detector owned by the host.
///
/// The host feeds samples from a single delivery context; every method takes
/// `&mut self` and no locking happens inside. Timestamps come from the
/// host's monotonic clock in milliseconds.
pub struct PullDetector {
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl Default for PullDetector {
    fn default() -> Self {
        Self::from_validated(default_config())
    }
}

impl PullDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, DetectorError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: DetectorConfig) -> Self {
        Self {
            machine: GestureHsm::new(config).state_machine(),
        }
    }

    pub fn tick(&mut self, frame: SensorFrame) -> EngineOutput {
        let context = self.dispatch(DetectorEvent::Sample(frame));
        self.finish(context)
    }

    pub fn on_field(&mut self, now_ms: u64, sample: Vector3) -> EngineOutput {
        self.tick(SensorFrame::field(now_ms, sample))
    }

    pub fn on_acceleration(&mut self, now_ms: u64, sample: Vector3) -> EngineOutput {
        self.tick(SensorFrame::acceleration(now_ms, sample))
    }

    /// Lets the settle window expire without a new sample.
    pub fn poll(&mut self, now_ms: u64) -> EngineOutput {
        let context = self.dispatch(DetectorEvent::Poll { now_ms });
        self.finish(context)
    }

    /// Drops both histories and the baseline; the baseline is recomputed
    /// once enough new samples arrive. A running settle window is left to
    /// expire on its own.
    pub fn reset_baseline(&mut self) {
        let _ = self.dispatch(DetectorEvent::ResetBaseline);
    }

    /// Forces the baseline to the most recent field sample.
    pub fn calibrate_now(&mut self) -> Result<Vector3, DetectorError> {
        self.dispatch(DetectorEvent::Calibrate)
            .calibrated
            .ok_or(DetectorError::NoSampleYet)
    }

    pub fn set_thresholds(
        &mut self,
        click_threshold: f32,
        long_click_threshold: f32,
    ) -> Result<(), DetectorError> {
        let mut config = self.config();
        config.thresholds.click_threshold = click_threshold;
        config.thresholds.long_click_threshold = long_click_threshold;
        self.set_config(config)
    }

    pub fn set_cooldown(&mut self, cooldown_ms: u64) -> Result<(), DetectorError> {
        let mut config = self.config();
        config.thresholds.cooldown_ms = cooldown_ms;
        self.set_config(config)
    }

    pub fn set_long_hold(&mut self, long_hold_ms: u64) -> Result<(), DetectorError> {
        let mut config = self.config();
        config.thresholds.long_hold_ms = long_hold_ms;
        self.set_config(config)
    }

    pub fn set_pattern_config(&mut self, pattern: PatternConfig) -> Result<(), DetectorError> {
        let mut config = self.config();
        config.pattern = pattern;
        self.set_config(config)
    }

    /// Replaces the whole configuration. Applies from the next sample.
    pub fn set_config(&mut self, config: DetectorConfig) -> Result<(), DetectorError> {
        config.validate()?;
        debug!(
            "thresholds set: click={} long_click={} cooldown={}ms hold={}ms",
            config.thresholds.click_threshold,
            config.thresholds.long_click_threshold,
            config.thresholds.cooldown_ms,
            config.thresholds.long_hold_ms
        );
        let _ = self.dispatch(DetectorEvent::Configure(config));
        Ok(())
    }

    pub fn config(&self) -> DetectorConfig {
        self.machine.inner().config
    }

    pub fn baseline(&self) -> Option<Vector3> {
        self.machine.inner().baseline.current()
    }

    pub fn is_baseline_set(&self) -> bool {
        self.machine.inner().baseline.is_set()
    }

    pub fn is_initialized(&self) -> bool {
        self.machine.inner().last_field.is_some()
    }

    pub fn last_field(&self) -> Option<Vector3> {
        self.machine.inner().last_field
    }

    pub fn last_acceleration(&self) -> Option<Vector3> {
        self.machine.inner().last_acceleration
    }

    /// State as of the last handled event. Use `is_gesture_in_progress` to
    /// account for a settle window that has run out since.
    pub fn state_id(&self) -> DetectorStateId {
        self.machine.inner().state_id
    }

    pub fn is_gesture_in_progress(&self, now_ms: u64) -> bool {
        !self.machine.inner().settled(now_ms)
    }

    pub fn last_trace(&self) -> DetectorTraceSample {
        self.machine.inner().last_trace
    }

    fn dispatch(&mut self, event: DetectorEvent) -> DispatchContext {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context
    }

    fn finish(&self, context: DispatchContext) -> EngineOutput {
        EngineOutput {
            gesture: context.gesture,
            trace: self.machine.inner().last_trace,
        }
    }
}
