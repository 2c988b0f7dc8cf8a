use super::*;

impl LongPressTracker {
    pub(super) fn update(&mut self, above: bool, now_ms: u64) {
        if !above {
            self.cross_start_ms = None;
            self.fired = false;
            return;
        }
        if !self.fired && self.cross_start_ms.is_none() {
            self.cross_start_ms = Some(now_ms);
        }
    }

    pub(super) fn held_ms(&self, now_ms: u64) -> u64 {
        self.cross_start_ms
            .map_or(0, |start| now_ms.saturating_sub(start))
    }

    pub(super) fn ready(&self, now_ms: u64, hold_ms: u64) -> bool {
        self.cross_start_ms
            .is_some_and(|start| now_ms.saturating_sub(start) >= hold_ms)
    }

    pub(super) fn mark_fired(&mut self) {
        self.cross_start_ms = None;
        self.fired = true;
    }
}

impl GestureHsm {
    pub(super) fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            field_history: SampleHistory::new(),
            accel_history: SampleHistory::new(),
            baseline: BaselineEstimator::new(),
            last_field: None,
            last_acceleration: None,
            last_short_click_at_ms: None,
            settle_until_ms: None,
            long_press: LongPressTracker::default(),
            state_id: DetectorStateId::Idle,
            last_trace: DetectorTraceSample::default(),
        }
    }

    pub(super) fn in_cooldown(&self, now_ms: u64) -> bool {
        self.last_short_click_at_ms.is_some_and(|last| {
            now_ms.saturating_sub(last) <= self.config.thresholds.cooldown_ms
        })
    }

    pub(super) fn settled(&self, now_ms: u64) -> bool {
        self.settle_until_ms.map_or(true, |until| now_ms >= until)
    }

    pub(super) fn finish_settle(&mut self) {
        self.settle_until_ms = None;
        self.state_id = DetectorStateId::Idle;
    }

    pub(super) fn observe_acceleration(&mut self, sample: Vector3) {
        if !sample.is_finite() {
            trace!("dropping non-finite acceleration sample {sample:?}");
            return;
        }
        self.accel_history.push(sample);
        self.last_acceleration = Some(sample);
    }

    /// Updates history, baseline and long-press tracking for one field
    /// sample. `None` for the bootstrap sample, which has nothing to compare
    /// against, and for non-finite samples, which touch no state.
    pub(super) fn observe_field(&mut self, frame: SensorFrame) -> Option<FieldObservation> {
        let current = frame.sample;
        if !current.is_finite() {
            trace!("dropping non-finite field sample {current:?} at {}ms", frame.now_ms);
            self.last_trace = DetectorTraceSample {
                now_ms: frame.now_ms,
                state_id: self.state_id,
                reject_reason: RejectReason::NonFiniteSample,
                baseline_set: self.baseline.is_set(),
                ..DetectorTraceSample::default()
            };
            return None;
        }
        self.field_history.push(current);

        let previous = self.last_field.replace(current);
        if previous.is_none() {
            self.baseline.seed(current);
        }

        if let Some(baseline) = self
            .baseline
            .refresh(&self.field_history, self.config.baseline_min_samples)
        {
            debug!(
                "baseline locked at {baseline:?} after {} samples",
                self.field_history.len()
            );
        }

        let Some(last) = previous else {
            debug!("detector initialised at {}ms", frame.now_ms);
            self.last_trace = DetectorTraceSample {
                now_ms: frame.now_ms,
                state_id: self.state_id,
                reject_reason: RejectReason::Bootstrap,
                baseline_set: self.baseline.is_set(),
                ..DetectorTraceSample::default()
            };
            return None;
        };

        let deltas = compute_deltas(current, last, self.baseline.current());
        let class = classify_deltas(deltas, &self.config.thresholds);
        self.long_press.update(class.exceeds_long_click, frame.now_ms);

        Some(FieldObservation {
            now_ms: frame.now_ms,
            last,
            current,
            deltas,
            class,
        })
    }

    fn assess_short_click(
        &self,
        observation: &FieldObservation,
    ) -> (RejectReason, Option<PatternAssessment>) {
        if !observation.class.exceeds_click {
            return (RejectReason::BelowThreshold, None);
        }

        let Some(baseline) = self.baseline.current().filter(|_| self.baseline.is_set()) else {
            return (RejectReason::BaselineUnset, None);
        };

        if !observation.class.baseline_confirms {
            return (RejectReason::BaselineDeltaLow, None);
        }

        if self.in_cooldown(observation.now_ms) {
            return (RejectReason::CooldownActive, None);
        }

        let pattern = analyze_pattern(
            &self.field_history,
            &self.accel_history,
            observation.last,
            observation.current,
            baseline,
            self.config.thresholds.click_threshold,
            &self.config.pattern,
        );
        (pattern.reason, Some(pattern))
    }

    /// Runs the short-click path, then the long-click path. Only called
    /// while no gesture is in progress.
    pub(super) fn decide(
        &mut self,
        context: &mut DispatchContext,
        observation: FieldObservation,
    ) -> Option<GestureKind> {
        let (reason, pattern) = self.assess_short_click(&observation);
        let now_ms = observation.now_ms;

        let kind = if reason == RejectReason::None {
            self.last_short_click_at_ms = Some(now_ms);
            Some(GestureKind::ShortClick)
        } else if self
            .long_press
            .ready(now_ms, self.config.thresholds.long_hold_ms)
        {
            self.long_press.mark_fired();
            Some(GestureKind::LongClick)
        } else {
            if observation.class.exceeds_click {
                trace!("click candidate at {now_ms}ms rejected: {reason:?}");
            }
            None
        };

        if let Some(kind) = kind {
            self.emit(context, kind, observation);
        }

        let reason = if kind.is_some() {
            RejectReason::None
        } else {
            reason
        };
        self.record_field_trace(&observation, reason, pattern, kind);
        kind
    }

    fn emit(
        &mut self,
        context: &mut DispatchContext,
        kind: GestureKind,
        observation: FieldObservation,
    ) {
        let now_ms = observation.now_ms;
        self.settle_until_ms = Some(now_ms.saturating_add(self.config.settle_ms));
        self.state_id = DetectorStateId::GestureInProgress;
        context.gesture = Some(GestureEvent {
            kind,
            at_ms: now_ms,
        });
        debug!(
            "{} at {now_ms}ms (instant={:.1}, baseline={:.1})",
            kind.as_str(),
            observation.deltas.instant,
            observation.deltas.from_baseline.unwrap_or(0.0)
        );
    }

    pub(super) fn record_field_trace(
        &mut self,
        observation: &FieldObservation,
        reason: RejectReason,
        pattern: Option<PatternAssessment>,
        gesture: Option<GestureKind>,
    ) {
        let axis = match pattern {
            Some(assessment) => assessment.axis,
            None => select_axis(&self.field_history, self.config.pattern.axis),
        };
        self.last_trace = DetectorTraceSample {
            now_ms: observation.now_ms,
            state_id: self.state_id,
            reject_reason: reason,
            instant_delta: observation.deltas.instant,
            baseline_delta: observation.deltas.from_baseline.unwrap_or(0.0),
            baseline_set: self.baseline.is_set(),
            pattern_mask: pattern.map_or(0, |assessment| assessment.passed_mask),
            axis,
            cooldown_active: self.in_cooldown(observation.now_ms),
            long_hold_ms: self.long_press.held_ms(observation.now_ms),
            gesture,
        };
    }
}
