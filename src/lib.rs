//! Gesture classification for pointer and touch input that falls through foreground UI.
//!
//! Raw pointer down/drag/up events go in; press, drag, pinch, flick and double-click
//! notifications come out, each cleanly bracketed by begin/end events.

pub mod gesture;
pub mod replay;

pub use gesture::classifier::{flick_direction, GestureEngine, GestureMode};
pub use gesture::config::{ConfigError, Thresholds};
pub use gesture::notify::{GestureNotifier, ListenerId};
pub use gesture::tracker::{ActiveTouchMap, PointerTracker};
pub use gesture::types::{
    FlickDirection, GestureEvent, GestureKind, GestureOutput, Point, PointerId, PointerSample,
};
pub use gesture::validity::{
    AlwaysValid, DragValidity, DragValidityContext, PressGatedValidity, TouchCountValidity,
};
pub use gesture::{FallThroughHandler, HostSurface};
