use super::*;

impl GestureHsm {
    /// Ends the press. Always runs before any pinch, flick or double-click decision.
    pub(super) fn release(&mut self, context: &mut DispatchContext, sample: &PointerSample) {
        self.pressing = false;
        self.tracker.on_pointer_up(sample.id);
        context.emit(GestureEvent::EndPress {
            pos: sample.position,
        });
        context.emit(GestureEvent::Press { is_down: false });
    }

    /// Flick when the release is far enough from the flick origin, otherwise a
    /// double-click candidate.
    pub(super) fn classify_release(
        &mut self,
        context: &mut DispatchContext,
        sample: &PointerSample,
    ) {
        let delta = sample.position - self.tracker.flick_origin();
        if delta.length_squared() >= self.thresholds.flick_detect_distance_sq() {
            let direction = flick_direction(delta);
            log::debug!("flick {} delta={:?}", direction.label(), delta);
            context.emit(GestureEvent::Flick {
                pos: sample.position,
                delta,
                direction,
            });
            return;
        }

        let interval_ms = self.thresholds.double_click_interval_ms;
        match self.pending_click_ms {
            Some(first_ms) if sample.t_ms.saturating_sub(first_ms) <= interval_ms => {
                self.pending_click_ms = None;
                log::debug!("double click after {}ms", sample.t_ms.saturating_sub(first_ms));
                context.emit(GestureEvent::DoubleClick {
                    pos: sample.position,
                });
            }
            _ => {
                self.pending_click_ms = Some(sample.t_ms);
            }
        }
    }
}

/// Dominant axis of `delta`; an exact tie goes to the vertical axis. `y` grows upward.
pub fn flick_direction(delta: Point) -> FlickDirection {
    let dx = delta.x.abs();
    let dy = delta.y.abs();
    if dx > dy {
        if delta.x > 0.0 {
            FlickDirection::Right
        } else {
            FlickDirection::Left
        }
    } else if delta.y > 0.0 {
        FlickDirection::Up
    } else {
        FlickDirection::Down
    }
}
