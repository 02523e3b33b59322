use statig::blocking::IntoStateMachineExt as _;

mod hsm;

use hsm::GestureHsm;

pub use hsm::flick_direction;

use super::config::Thresholds;
use super::tracker::{ActiveTouchMap, PointerTracker};
use super::types::{FlickDirection, GestureEvent, GestureOutput, Point, PointerSample};
use super::validity::{DragValidity, DragValidityContext};

/// Which gesture, if any, currently owns the tracked touches. Pressing is tracked
/// separately because it spans all three.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureMode {
    Idle,
    Dragging,
    Pinching,
}

#[derive(Clone, Copy, Debug)]
enum GestureHsmEvent {
    PointerDown(PointerSample),
    Drag(PointerSample),
    PointerUp(PointerSample),
    EndDrag(PointerSample),
}

#[derive(Debug, Default)]
struct DispatchContext {
    output: GestureOutput,
}

impl DispatchContext {
    fn emit(&mut self, event: GestureEvent) {
        if self.output.events.push(event).is_err() {
            log::warn!("gesture output full, dropping {:?}", event.kind());
        }
    }

    fn finish(self) -> GestureOutput {
        self.output
    }
}

/// Gesture classification state machine.
///
/// Every call runs to completion and returns the notifications it produced, in order.
pub struct GestureEngine {
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(Thresholds::default(), super::validity::AlwaysValid)
    }
}

impl GestureEngine {
    pub fn new<V>(thresholds: Thresholds, validity: V) -> Self
    where
        V: DragValidity + 'static,
    {
        Self::with_boxed_validity(thresholds, Box::new(validity))
    }

    pub fn with_boxed_validity(thresholds: Thresholds, validity: Box<dyn DragValidity>) -> Self {
        Self {
            machine: GestureHsm::new(thresholds, validity).state_machine(),
        }
    }

    pub fn pointer_down(&mut self, sample: PointerSample) -> GestureOutput {
        self.handle(GestureHsmEvent::PointerDown(sample))
    }

    pub fn drag(&mut self, sample: PointerSample) -> GestureOutput {
        self.handle(GestureHsmEvent::Drag(sample))
    }

    pub fn pointer_up(&mut self, sample: PointerSample) -> GestureOutput {
        self.handle(GestureHsmEvent::PointerUp(sample))
    }

    /// Explicit end of a pointer's drag, delivered by the host after its pointer-up.
    pub fn end_drag(&mut self, sample: PointerSample) -> GestureOutput {
        self.handle(GestureHsmEvent::EndDrag(sample))
    }

    pub fn is_pressing(&self) -> bool {
        self.machine.inner().pressing()
    }

    pub fn is_dragging(&self) -> bool {
        self.mode() == GestureMode::Dragging
    }

    pub fn is_pinching(&self) -> bool {
        self.mode() == GestureMode::Pinching
    }

    pub fn touches(&self) -> &ActiveTouchMap {
        self.machine.inner().tracker().touches()
    }

    pub fn active_touch_count(&self) -> usize {
        self.touches().len()
    }

    pub fn flick_origin(&self) -> Point {
        self.machine.inner().tracker().flick_origin()
    }

    pub fn press_origin(&self) -> Point {
        self.machine.inner().tracker().begin_position()
    }

    pub fn pinch_baseline(&self) -> Option<f32> {
        self.is_pinching()
            .then(|| self.machine.inner().pinch_baseline())
    }

    /// Release time of the click waiting for its second half, if any.
    pub fn pending_click_ms(&self) -> Option<u64> {
        self.machine.inner().pending_click_ms()
    }

    fn handle(&mut self, event: GestureHsmEvent) -> GestureOutput {
        if !self.machine.inner().accepts(&event) {
            log::trace!("ignoring {:?} for unknown pointer", event);
            return GestureOutput::default();
        }
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context.finish()
    }
}

#[cfg(test)]
mod tests;
