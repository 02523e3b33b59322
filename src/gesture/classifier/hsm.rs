use statig::prelude::*;

use super::*;

mod release;

pub use release::flick_direction;

pub(super) struct GestureHsm {
    thresholds: Thresholds,
    validity: Box<dyn DragValidity>,
    tracker: PointerTracker,
    pressing: bool,
    pinch_baseline: f32,
    pending_click_ms: Option<u64>,
}

impl GestureHsm {
    pub(super) fn new(thresholds: Thresholds, validity: Box<dyn DragValidity>) -> Self {
        Self {
            thresholds,
            validity,
            tracker: PointerTracker::new(),
            pressing: false,
            pinch_baseline: 0.0,
            pending_click_ms: None,
        }
    }

    pub(super) fn pressing(&self) -> bool {
        self.pressing
    }

    pub(super) fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub(super) fn pinch_baseline(&self) -> f32 {
        self.pinch_baseline
    }

    pub(super) fn pending_click_ms(&self) -> Option<u64> {
        self.pending_click_ms
    }

    /// Up and drag only count for pointers that are down; an explicit drag end only for
    /// pointers whose drag is still open.
    pub(super) fn accepts(&self, event: &GestureHsmEvent) -> bool {
        match event {
            GestureHsmEvent::PointerDown(_) => true,
            GestureHsmEvent::Drag(sample) | GestureHsmEvent::PointerUp(sample) => {
                self.tracker.is_pressed(sample.id)
            }
            GestureHsmEvent::EndDrag(sample) => self.tracker.is_dragged(sample.id),
        }
    }

    fn single_drag_valid(&self) -> bool {
        let ctx = DragValidityContext {
            pressing: self.pressing,
            tracked_touches: self.tracker.touches().len(),
        };
        self.validity.is_valid_single_drag(&ctx)
    }

    fn begin_drag(&mut self, context: &mut DispatchContext, sample: &PointerSample) {
        self.tracker.on_drag_sample(*sample);
        log::debug!("drag begin id={} at {:?}", sample.id.0, sample.position);
        context.emit(GestureEvent::BeginDrag {
            pos: sample.position,
        });
    }

    fn continue_drag(&mut self, context: &mut DispatchContext, sample: &PointerSample) {
        // Corrective jumps keep the flick origin where it was.
        if sample.delta.length_squared() <= self.thresholds.flick_update_range_sq() {
            self.tracker.set_flick_origin(sample.position);
        }
        context.emit(GestureEvent::Drag {
            delta: sample.delta,
            pos: sample.position,
        });
    }

    fn end_drag(&mut self, context: &mut DispatchContext, sample: &PointerSample) {
        log::debug!("drag end id={}", sample.id.0);
        context.emit(GestureEvent::EndDrag {
            pos: sample.position,
        });
        self.tracker.on_end_drag(sample.id);
    }

    fn begin_pinch(&mut self, context: &mut DispatchContext) {
        let Some((touch1, touch2)) = self.tracker.touches().pinch_pair() else {
            return;
        };
        self.pinch_baseline = touch1.distance(touch2);
        log::debug!("pinch begin range={}", self.pinch_baseline);
        context.emit(GestureEvent::BeginPinch { touch1, touch2 });
    }

    fn update_pinch(&mut self, context: &mut DispatchContext) {
        let Some((touch1, touch2)) = self.tracker.touches().pinch_pair() else {
            return;
        };
        let range = touch1.distance(touch2);
        context.emit(GestureEvent::Pinch {
            touch1,
            touch2,
            range_delta: range - self.pinch_baseline,
        });
        self.pinch_baseline = range;
    }

    fn end_pinch(&mut self, context: &mut DispatchContext) {
        log::debug!("pinch end");
        context.emit(GestureEvent::EndPinch);
    }
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    /// Shared handling for every contact mode: presses.
    #[superstate]
    fn contact(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::PointerDown(sample) => {
                self.tracker.on_pointer_down(sample);
                self.pressing = true;
                context.emit(GestureEvent::BeginPress {
                    pos: sample.position,
                });
                context.emit(GestureEvent::Press { is_down: true });
                Handled
            }
            _ => Handled,
        }
    }

    #[state(superstate = "contact")]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Drag(sample) => {
                self.begin_drag(context, sample);
                Transition(State::dragging())
            }
            GestureHsmEvent::PointerUp(sample) => {
                self.release(context, sample);
                self.classify_release(context, sample);
                Handled
            }
            GestureHsmEvent::EndDrag(sample) => {
                self.end_drag(context, sample);
                Handled
            }
            GestureHsmEvent::PointerDown(_) => Super,
        }
    }

    #[state(superstate = "contact")]
    fn dragging(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Drag(sample) => {
                self.tracker.on_drag_sample(*sample);
                if self.tracker.touches().len() >= 2 {
                    log::debug!("second touch id={}, drag hands over to pinch", sample.id.0);
                    context.emit(GestureEvent::EndDrag {
                        pos: sample.position,
                    });
                    self.begin_pinch(context);
                    return Transition(State::pinching());
                }
                if self.single_drag_valid() {
                    self.continue_drag(context, sample);
                } else {
                    log::trace!("drag sample id={} rejected by platform", sample.id.0);
                }
                Handled
            }
            GestureHsmEvent::PointerUp(sample) => {
                self.release(context, sample);
                self.classify_release(context, sample);
                Handled
            }
            GestureHsmEvent::EndDrag(sample) => {
                self.end_drag(context, sample);
                Transition(State::idle())
            }
            GestureHsmEvent::PointerDown(_) => Super,
        }
    }

    #[state(superstate = "contact")]
    fn pinching(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Drag(sample) => {
                self.tracker.on_drag_sample(*sample);
                if self.tracker.touches().len() >= 2 {
                    self.update_pinch(context);
                    return Handled;
                }
                if !self.single_drag_valid() {
                    log::trace!("drag sample id={} rejected by platform", sample.id.0);
                    return Handled;
                }
                // The remaining finger carries on as a single drag.
                self.end_pinch(context);
                self.begin_drag(context, sample);
                self.continue_drag(context, sample);
                Transition(State::dragging())
            }
            GestureHsmEvent::PointerUp(sample) => {
                self.release(context, sample);
                if self.tracker.touches().len() < 2 {
                    self.end_pinch(context);
                    return Transition(State::idle());
                }
                self.classify_release(context, sample);
                Handled
            }
            GestureHsmEvent::EndDrag(sample) => {
                self.end_drag(context, sample);
                Handled
            }
            GestureHsmEvent::PointerDown(_) => Super,
        }
    }
}

impl GestureEngine {
    pub fn mode(&self) -> GestureMode {
        match self.machine.state() {
            State::Idle { .. } => GestureMode::Idle,
            State::Dragging { .. } => GestureMode::Dragging,
            State::Pinching { .. } => GestureMode::Pinching,
        }
    }
}
