use core::ops::{Add, Neg, Sub};

/// Capacity of one [`GestureOutput`]. The longest transition (pinch collapsing back into a
/// drag) emits three events.
pub const GESTURE_OUTPUT_CAPACITY: usize = 4;

/// Screen-space position or displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).length_squared().sqrt()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Host-assigned pointer identifier (mouse button, touch finger id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub i32);

/// One raw pointer event as delivered by the host UI layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    pub position: Point,
    /// Displacement since the previous sample of the same pointer.
    pub delta: Point,
    /// Monotonic host clock.
    pub t_ms: u64,
}

impl PointerSample {
    pub const fn new(id: PointerId, position: Point, delta: Point, t_ms: u64) -> Self {
        Self {
            id,
            position,
            delta,
            t_ms,
        }
    }

    /// Sample without motion, used for down/up events.
    pub const fn at(id: PointerId, position: Point, t_ms: u64) -> Self {
        Self::new(id, position, Point::ZERO, t_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlickDirection {
    Up,
    Down,
    Left,
    Right,
}

impl FlickDirection {
    pub const fn label(self) -> &'static str {
        match self {
            FlickDirection::Up => "up",
            FlickDirection::Down => "down",
            FlickDirection::Left => "left",
            FlickDirection::Right => "right",
        }
    }
}

/// Notification emitted by the classifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    Press {
        is_down: bool,
    },
    BeginPress {
        pos: Point,
    },
    EndPress {
        pos: Point,
    },
    Drag {
        delta: Point,
        pos: Point,
    },
    BeginDrag {
        pos: Point,
    },
    EndDrag {
        pos: Point,
    },
    Pinch {
        touch1: Point,
        touch2: Point,
        range_delta: f32,
    },
    BeginPinch {
        touch1: Point,
        touch2: Point,
    },
    EndPinch,
    Flick {
        pos: Point,
        delta: Point,
        direction: FlickDirection,
    },
    DoubleClick {
        pos: Point,
    },
}

impl GestureEvent {
    pub const fn kind(&self) -> GestureKind {
        match self {
            GestureEvent::Press { .. } => GestureKind::Press,
            GestureEvent::BeginPress { .. } => GestureKind::BeginPress,
            GestureEvent::EndPress { .. } => GestureKind::EndPress,
            GestureEvent::Drag { .. } => GestureKind::Drag,
            GestureEvent::BeginDrag { .. } => GestureKind::BeginDrag,
            GestureEvent::EndDrag { .. } => GestureKind::EndDrag,
            GestureEvent::Pinch { .. } => GestureKind::Pinch,
            GestureEvent::BeginPinch { .. } => GestureKind::BeginPinch,
            GestureEvent::EndPinch => GestureKind::EndPinch,
            GestureEvent::Flick { .. } => GestureKind::Flick,
            GestureEvent::DoubleClick { .. } => GestureKind::DoubleClick,
        }
    }
}

/// Payload-free discriminant of [`GestureEvent`], used to key listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Press,
    BeginPress,
    EndPress,
    Drag,
    BeginDrag,
    EndDrag,
    Pinch,
    BeginPinch,
    EndPinch,
    Flick,
    DoubleClick,
}

impl GestureKind {
    pub const ALL: [GestureKind; 11] = [
        GestureKind::Press,
        GestureKind::BeginPress,
        GestureKind::EndPress,
        GestureKind::Drag,
        GestureKind::BeginDrag,
        GestureKind::EndDrag,
        GestureKind::Pinch,
        GestureKind::BeginPinch,
        GestureKind::EndPinch,
        GestureKind::Flick,
        GestureKind::DoubleClick,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            GestureKind::Press => "press",
            GestureKind::BeginPress => "begin_press",
            GestureKind::EndPress => "end_press",
            GestureKind::Drag => "drag",
            GestureKind::BeginDrag => "begin_drag",
            GestureKind::EndDrag => "end_drag",
            GestureKind::Pinch => "pinch",
            GestureKind::BeginPinch => "begin_pinch",
            GestureKind::EndPinch => "end_pinch",
            GestureKind::Flick => "flick",
            GestureKind::DoubleClick => "double_click",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label() == normalized)
    }
}

/// Events produced by one inbound pointer call, in emission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureOutput {
    pub events: heapless::Vec<GestureEvent, GESTURE_OUTPUT_CAPACITY>,
}

impl GestureOutput {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = GestureKind> + '_ {
        self.events.iter().map(GestureEvent::kind)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, GestureEvent> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a GestureOutput {
    type Item = &'a GestureEvent;
    type IntoIter = core::slice::Iter<'a, GestureEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
