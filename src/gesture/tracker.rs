use super::types::{Point, PointerId, PointerSample};

/// Most pointers tracked at once. Extra contacts beyond this are ignored.
pub const MAX_TRACKED_TOUCHES: usize = 10;

/// Pointers that have started dragging and not yet been released, in first-seen order.
///
/// The pinch pair is always the two oldest entries; a third finger is tracked but never
/// contributes to pinch geometry.
#[derive(Clone, Debug, Default)]
pub struct ActiveTouchMap {
    entries: heapless::Vec<PointerSample, MAX_TRACKED_TOUCHES>,
}

impl ActiveTouchMap {
    pub const fn new() -> Self {
        Self {
            entries: heapless::Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: PointerId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn get(&self, id: PointerId) -> Option<&PointerSample> {
        self.entries.iter().find(|sample| sample.id == id)
    }

    /// Replaces the sample for `sample.id`, keeping its slot, or appends a new entry.
    pub fn upsert(&mut self, sample: PointerSample) {
        if let Some(idx) = self.position_of(sample.id) {
            self.entries[idx] = sample;
            return;
        }
        if self.entries.push(sample).is_err() {
            log::warn!(
                "touch map full ({} entries), ignoring pointer {}",
                MAX_TRACKED_TOUCHES,
                sample.id.0
            );
        }
    }

    pub fn remove(&mut self, id: PointerId) -> Option<PointerSample> {
        let idx = self.position_of(id)?;
        Some(self.entries.remove(idx))
    }

    /// Positions of the two oldest tracked pointers.
    pub fn pinch_pair(&self) -> Option<(Point, Point)> {
        match self.entries.as_slice() {
            [first, second, ..] => Some((first.position, second.position)),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointerSample> {
        self.entries.iter()
    }

    fn position_of(&self, id: PointerId) -> Option<usize> {
        self.entries.iter().position(|sample| sample.id == id)
    }
}

/// Small fixed-capacity set of pointer ids.
#[derive(Clone, Debug, Default)]
struct PointerIdSet {
    ids: heapless::Vec<PointerId, MAX_TRACKED_TOUCHES>,
}

impl PointerIdSet {
    const fn new() -> Self {
        Self {
            ids: heapless::Vec::new(),
        }
    }

    fn contains(&self, id: PointerId) -> bool {
        self.ids.contains(&id)
    }

    fn insert(&mut self, id: PointerId) {
        if self.contains(id) {
            return;
        }
        if self.ids.push(id).is_err() {
            log::warn!("pointer set full, ignoring pointer {}", id.0);
        }
    }

    fn remove(&mut self, id: PointerId) -> bool {
        match self.ids.iter().position(|known| *known == id) {
            Some(idx) => {
                self.ids.swap_remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Press anchors recorded at pointer-down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PressAnchors {
    pub(crate) begin: Point,
    /// Origin for the release-time flick vector.
    pub(crate) flick_origin: Point,
}

/// Bookkeeping for pointers: press anchors plus the active-touch map.
///
/// Also remembers which pointers are currently down and which have started a drag that
/// has not been explicitly ended, so inputs for unknown pointers can be told apart.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    touches: ActiveTouchMap,
    anchors: PressAnchors,
    pressed: PointerIdSet,
    dragged: PointerIdSet,
}

impl PointerTracker {
    pub const fn new() -> Self {
        Self {
            touches: ActiveTouchMap::new(),
            anchors: PressAnchors {
                begin: Point::ZERO,
                flick_origin: Point::ZERO,
            },
            pressed: PointerIdSet::new(),
            dragged: PointerIdSet::new(),
        }
    }

    /// Records the anchors; the pointer joins the touch map only once it drags.
    pub fn on_pointer_down(&mut self, sample: &PointerSample) {
        self.anchors.begin = sample.position;
        self.anchors.flick_origin = sample.position;
        self.pressed.insert(sample.id);
    }

    pub fn on_drag_sample(&mut self, sample: PointerSample) {
        self.touches.upsert(sample);
        self.dragged.insert(sample.id);
    }

    /// Returns whether `id` was down.
    pub fn on_pointer_up(&mut self, id: PointerId) -> bool {
        self.touches.remove(id);
        self.pressed.remove(id)
    }

    /// Returns whether `id` had an open drag.
    pub fn on_end_drag(&mut self, id: PointerId) -> bool {
        self.touches.remove(id);
        self.dragged.remove(id)
    }

    pub fn is_pressed(&self, id: PointerId) -> bool {
        self.pressed.contains(id)
    }

    pub fn is_dragged(&self, id: PointerId) -> bool {
        self.dragged.contains(id)
    }

    pub fn touches(&self) -> &ActiveTouchMap {
        &self.touches
    }

    pub fn begin_position(&self) -> Point {
        self.anchors.begin
    }

    pub fn flick_origin(&self) -> Point {
        self.anchors.flick_origin
    }

    pub(crate) fn set_flick_origin(&mut self, position: Point) {
        self.anchors.flick_origin = position;
    }
}
