use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::types::{FlickDirection, GestureEvent, GestureKind, GestureOutput, Point};

type Callback = Rc<dyn Fn(&GestureEvent)>;

/// Handle returned by the `subscribe*` calls; pass it to [`GestureNotifier::unsubscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    /// `None` listens to every kind.
    kind: Option<GestureKind>,
    callback: Callback,
}

/// Multi-subscriber fan-out for gesture notifications.
///
/// Cloning yields another handle to the same registry, so listeners may keep a handle
/// and subscribe or unsubscribe from inside a callback. Such changes apply from the next
/// event on; the event being delivered still reaches the listeners registered when its
/// delivery started.
#[derive(Clone, Default)]
pub struct GestureNotifier {
    inner: Rc<Registry>,
}

#[derive(Default)]
struct Registry {
    listeners: RefCell<Vec<Listener>>,
    next_id: Cell<u64>,
}

impl GestureNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, kind: GestureKind, callback: F) -> ListenerId
    where
        F: Fn(&GestureEvent) + 'static,
    {
        self.register(Some(kind), Rc::new(callback))
    }

    pub fn subscribe_all<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&GestureEvent) + 'static,
    {
        self.register(None, Rc::new(callback))
    }

    /// Returns `false` when the id was not (or no longer) registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn clear(&self) {
        self.inner.listeners.borrow_mut().clear();
    }

    pub fn dispatch(&self, output: &GestureOutput) {
        for event in output {
            self.emit(event);
        }
    }

    pub fn emit(&self, event: &GestureEvent) {
        let kind = event.kind();
        let targets: Vec<Callback> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|listener| listener.kind.is_none_or(|k| k == kind))
            .map(|listener| Rc::clone(&listener.callback))
            .collect();
        log::trace!("{} -> {} listener(s)", kind.label(), targets.len());
        for callback in targets {
            callback(event);
        }
    }

    fn register(&self, kind: Option<GestureKind>, callback: Callback) -> ListenerId {
        let id = ListenerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push(Listener { id, kind, callback });
        id
    }
}

// Typed subscribers, one per notification.
impl GestureNotifier {
    pub fn on_press(&self, f: impl Fn(bool) + 'static) -> ListenerId {
        self.subscribe(GestureKind::Press, move |event| {
            if let GestureEvent::Press { is_down } = *event {
                f(is_down);
            }
        })
    }

    pub fn on_begin_press(&self, f: impl Fn(Point) + 'static) -> ListenerId {
        self.subscribe(GestureKind::BeginPress, move |event| {
            if let GestureEvent::BeginPress { pos } = *event {
                f(pos);
            }
        })
    }

    pub fn on_end_press(&self, f: impl Fn(Point) + 'static) -> ListenerId {
        self.subscribe(GestureKind::EndPress, move |event| {
            if let GestureEvent::EndPress { pos } = *event {
                f(pos);
            }
        })
    }

    /// `f(delta, pos)`.
    pub fn on_drag(&self, f: impl Fn(Point, Point) + 'static) -> ListenerId {
        self.subscribe(GestureKind::Drag, move |event| {
            if let GestureEvent::Drag { delta, pos } = *event {
                f(delta, pos);
            }
        })
    }

    pub fn on_begin_drag(&self, f: impl Fn(Point) + 'static) -> ListenerId {
        self.subscribe(GestureKind::BeginDrag, move |event| {
            if let GestureEvent::BeginDrag { pos } = *event {
                f(pos);
            }
        })
    }

    pub fn on_end_drag(&self, f: impl Fn(Point) + 'static) -> ListenerId {
        self.subscribe(GestureKind::EndDrag, move |event| {
            if let GestureEvent::EndDrag { pos } = *event {
                f(pos);
            }
        })
    }

    /// `f(touch1, touch2, range_delta)`.
    pub fn on_pinch(&self, f: impl Fn(Point, Point, f32) + 'static) -> ListenerId {
        self.subscribe(GestureKind::Pinch, move |event| {
            if let GestureEvent::Pinch {
                touch1,
                touch2,
                range_delta,
            } = *event
            {
                f(touch1, touch2, range_delta);
            }
        })
    }

    pub fn on_begin_pinch(&self, f: impl Fn(Point, Point) + 'static) -> ListenerId {
        self.subscribe(GestureKind::BeginPinch, move |event| {
            if let GestureEvent::BeginPinch { touch1, touch2 } = *event {
                f(touch1, touch2);
            }
        })
    }

    pub fn on_end_pinch(&self, f: impl Fn() + 'static) -> ListenerId {
        self.subscribe(GestureKind::EndPinch, move |_| f())
    }

    /// `f(pos, delta, direction)`.
    pub fn on_flick(&self, f: impl Fn(Point, Point, FlickDirection) + 'static) -> ListenerId {
        self.subscribe(GestureKind::Flick, move |event| {
            if let GestureEvent::Flick {
                pos,
                delta,
                direction,
            } = *event
            {
                f(pos, delta, direction);
            }
        })
    }

    pub fn on_double_click(&self, f: impl Fn(Point) + 'static) -> ListenerId {
        self.subscribe(GestureKind::DoubleClick, move |event| {
            if let GestureEvent::DoubleClick { pos } = *event {
                f(pos);
            }
        })
    }
}
