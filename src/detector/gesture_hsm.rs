use log::{debug, trace};
use statig::prelude::*;

use super::{
    baseline::BaselineEstimator,
    config::DetectorConfig,
    delta::{classify_deltas, compute_deltas, DeltaClass, FieldDeltas},
    history::SampleHistory,
    pattern::{analyze_pattern, select_axis, PatternAssessment},
    trace::DetectorTraceSample,
    types::{
        DetectorStateId, GestureEvent, GestureKind, RejectReason, SensorChannel, SensorFrame,
        Vector3,
    },
};

mod engine;
mod helpers;

pub use engine::{EngineOutput, PullDetector};

#[derive(Clone, Copy, Debug)]
enum DetectorEvent {
    Sample(SensorFrame),
    Poll { now_ms: u64 },
    ResetBaseline,
    Calibrate,
    Configure(DetectorConfig),
}

#[derive(Default)]
struct DispatchContext {
    gesture: Option<GestureEvent>,
    calibrated: Option<Vector3>,
}

#[derive(Clone, Copy, Debug)]
struct FieldObservation {
    now_ms: u64,
    last: Vector3,
    current: Vector3,
    deltas: FieldDeltas,
    class: DeltaClass,
}

/// Continuous crossing of the long-click threshold. `fired` latches after a
/// long click until the signal drops back, so one crossing yields one click.
#[derive(Clone, Copy, Debug, Default)]
struct LongPressTracker {
    cross_start_ms: Option<u64>,
    fired: bool,
}

struct GestureHsm {
    config: DetectorConfig,
    field_history: SampleHistory,
    accel_history: SampleHistory,
    baseline: BaselineEstimator,
    last_field: Option<Vector3>,
    last_acceleration: Option<Vector3>,
    last_short_click_at_ms: Option<u64>,
    settle_until_ms: Option<u64>,
    long_press: LongPressTracker,
    state_id: DetectorStateId,
    last_trace: DetectorTraceSample,
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    #[state(superstate = "active")]
    fn idle(&mut self, context: &mut DispatchContext, event: &DetectorEvent) -> Outcome<State> {
        match event {
            DetectorEvent::Sample(frame) => match frame.channel {
                SensorChannel::Acceleration => {
                    self.observe_acceleration(frame.sample);
                    Handled
                }
                SensorChannel::MagneticField => {
                    let Some(observation) = self.observe_field(*frame) else {
                        return Handled;
                    };
                    match self.decide(context, observation) {
                        Some(_) => Transition(State::gesture_in_progress()),
                        None => Handled,
                    }
                }
            },
            DetectorEvent::Poll { .. } => Handled,
            _ => Super,
        }
    }

    #[state(superstate = "active")]
    fn gesture_in_progress(
        &mut self,
        context: &mut DispatchContext,
        event: &DetectorEvent,
    ) -> Outcome<State> {
        match event {
            DetectorEvent::Sample(frame) => {
                let settled = self.settled(frame.now_ms);
                if settled {
                    self.finish_settle();
                }

                let emitted = match frame.channel {
                    SensorChannel::Acceleration => {
                        self.observe_acceleration(frame.sample);
                        false
                    }
                    SensorChannel::MagneticField => match self.observe_field(*frame) {
                        Some(observation) if settled => {
                            self.decide(context, observation).is_some()
                        }
                        Some(observation) => {
                            self.record_field_trace(
                                &observation,
                                RejectReason::GestureInProgress,
                                None,
                                None,
                            );
                            false
                        }
                        None => false,
                    },
                };

                if emitted {
                    Transition(State::gesture_in_progress())
                } else if settled {
                    Transition(State::idle())
                } else {
                    Handled
                }
            }
            DetectorEvent::Poll { now_ms } => {
                if self.settled(*now_ms) {
                    self.finish_settle();
                    Transition(State::idle())
                } else {
                    Handled
                }
            }
            _ => Super,
        }
    }

    #[superstate]
    fn active(&mut self, context: &mut DispatchContext, event: &DetectorEvent) -> Outcome<State> {
        match event {
            DetectorEvent::ResetBaseline => {
                self.field_history.clear();
                self.accel_history.clear();
                self.baseline.invalidate();
                debug!("baseline reset; recomputing from new samples");
                Handled
            }
            DetectorEvent::Calibrate => {
                if let Some(field) = self.last_field {
                    self.baseline.set(field);
                    context.calibrated = Some(field);
                    debug!("baseline calibrated to {field:?}");
                }
                Handled
            }
            DetectorEvent::Configure(config) => {
                self.config = *config;
                Handled
            }
            _ => Handled,
        }
    }
}
