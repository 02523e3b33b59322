//! Text pointer traces, used by the replay tool and the sequence tests.
//!
//! One event per line:
//!
//! ```text
//! pointer,<ms>,<down|drag|up|end_drag>,<id>,<x>,<y>[,<dx>,<dy>[,<contacts>]]
//! ```
//!
//! Blank lines, `#` comments and the header line are skipped. `contacts` is the raw
//! platform contact count at that moment and defaults to the number of pointers down.

use core::fmt;
use std::cell::Cell;
use std::rc::Rc;

use crate::gesture::classifier::GestureEngine;
use crate::gesture::types::{GestureEvent, GestureKind, Point, PointerId, PointerSample};

pub const TRACE_HEADER: &str = "pointer,ms,kind,id,x,y,dx,dy,contacts";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceAction {
    Down,
    Drag,
    Up,
    EndDrag,
}

impl TraceAction {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "down" => Some(TraceAction::Down),
            "drag" | "move" => Some(TraceAction::Drag),
            "up" => Some(TraceAction::Up),
            "end_drag" => Some(TraceAction::EndDrag),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceLine {
    pub action: TraceAction,
    pub sample: PointerSample,
    pub contacts: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceError {
    pub line_no: usize,
    pub message: String,
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_no, self.message)
    }
}

impl std::error::Error for TraceError {}

pub fn parse_trace(source: &str) -> Result<Vec<TraceLine>, TraceError> {
    let mut out = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == TRACE_HEADER {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts[0] != "pointer" {
            continue;
        }
        if parts.len() < 6 {
            return Err(TraceError {
                line_no,
                message: "invalid trace line, expected at least 6 columns".into(),
            });
        }

        let t_ms = parse_field::<u64>(parts[1], line_no, "ms")?;
        let action = TraceAction::parse(parts[2]).ok_or_else(|| TraceError {
            line_no,
            message: format!("invalid pointer action '{}'", parts[2]),
        })?;
        let id = parse_field::<i32>(parts[3], line_no, "id")?;
        let x = parse_field::<f32>(parts[4], line_no, "x")?;
        let y = parse_field::<f32>(parts[5], line_no, "y")?;
        let delta = match (parts.get(6), parts.get(7)) {
            (Some(dx), Some(dy)) => Point::new(
                parse_field::<f32>(dx, line_no, "dx")?,
                parse_field::<f32>(dy, line_no, "dy")?,
            ),
            (Some(_), None) => {
                return Err(TraceError {
                    line_no,
                    message: "dx given without dy".into(),
                })
            }
            _ => Point::ZERO,
        };
        let contacts = match parts.get(8) {
            Some(raw) => Some(parse_field::<usize>(raw, line_no, "contacts")?),
            None => None,
        };

        out.push(TraceLine {
            action,
            sample: PointerSample::new(PointerId(id), Point::new(x, y), delta, t_ms),
            contacts,
        });
    }
    Ok(out)
}

fn parse_field<T>(raw: &str, line_no: usize, field: &str) -> Result<T, TraceError>
where
    T: core::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| TraceError {
        line_no,
        message: format!("invalid {field} '{}': {e}", raw.trim()),
    })
}

/// Raw contact count shared between a trace replay and a platform validity policy.
#[derive(Clone, Debug, Default)]
pub struct ContactCounter {
    count: Rc<Cell<usize>>,
}

impl ContactCounter {
    pub fn get(&self) -> usize {
        self.count.get()
    }

    pub fn set(&self, count: usize) {
        self.count.set(count);
    }

    /// Query closure for [`crate::TouchCountValidity`].
    pub fn query(&self) -> impl Fn() -> usize + 'static {
        let count = Rc::clone(&self.count);
        move || count.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplayedEvent {
    pub t_ms: u64,
    pub event: GestureEvent,
}

/// Feeds `lines` through `engine`, keeping `contacts` in step with the trace.
pub fn replay(
    engine: &mut GestureEngine,
    lines: &[TraceLine],
    contacts: &ContactCounter,
) -> Vec<ReplayedEvent> {
    let mut down = 0usize;
    let mut events = Vec::new();
    for line in lines {
        match line.action {
            TraceAction::Down => down += 1,
            TraceAction::Up => down = down.saturating_sub(1),
            TraceAction::Drag | TraceAction::EndDrag => {}
        }
        // Platform counts are read while the event is handled; a lifted finger is
        // still on the glass during its own up event.
        let live = match line.action {
            TraceAction::Up => down + 1,
            _ => down,
        };
        contacts.set(line.contacts.unwrap_or(live));

        let output = match line.action {
            TraceAction::Down => engine.pointer_down(line.sample),
            TraceAction::Drag => engine.drag(line.sample),
            TraceAction::Up => engine.pointer_up(line.sample),
            TraceAction::EndDrag => engine.end_drag(line.sample),
        };
        events.extend(output.iter().map(|event| ReplayedEvent {
            t_ms: line.sample.t_ms,
            event: *event,
        }));
    }
    events
}

/// Expected kind sequence, one label per line (`#` comments allowed).
pub fn parse_expected_kinds(source: &str) -> Result<Vec<GestureKind>, TraceError> {
    let mut kinds = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let kind = GestureKind::from_label(token).ok_or_else(|| TraceError {
            line_no: idx + 1,
            message: format!("invalid expected gesture kind: {token}"),
        })?;
        kinds.push(kind);
    }
    Ok(kinds)
}

/// CSV row for one replayed event: `gesture,ms,kind,x,y,dx,dy,detail`.
pub fn format_event(replayed: &ReplayedEvent) -> String {
    let (pos, delta, detail) = match replayed.event {
        GestureEvent::Press { is_down } => (Point::ZERO, Point::ZERO, is_down.to_string()),
        GestureEvent::BeginPress { pos }
        | GestureEvent::EndPress { pos }
        | GestureEvent::BeginDrag { pos }
        | GestureEvent::EndDrag { pos }
        | GestureEvent::DoubleClick { pos } => (pos, Point::ZERO, String::new()),
        GestureEvent::Drag { delta, pos } => (pos, delta, String::new()),
        GestureEvent::Pinch {
            touch1,
            touch2,
            range_delta,
        } => (touch1, touch2 - touch1, format!("{range_delta}")),
        GestureEvent::BeginPinch { touch1, touch2 } => (touch1, touch2 - touch1, String::new()),
        GestureEvent::EndPinch => (Point::ZERO, Point::ZERO, String::new()),
        GestureEvent::Flick {
            pos,
            delta,
            direction,
        } => (pos, delta, direction.label().to_string()),
    };
    format!(
        "gesture,{},{},{},{},{},{},{}",
        replayed.t_ms,
        replayed.event.kind().label(),
        pos.x,
        pos.y,
        delta.x,
        delta.y,
        detail
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::config::Thresholds;
    use crate::gesture::validity::TouchCountValidity;

    #[test]
    fn parses_optional_columns() {
        let lines = parse_trace(
            "# comment\npointer,ms,kind,id,x,y,dx,dy,contacts\n\
             pointer,0,down,1,10,20\n\
             pointer,8,drag,1,12,20,2,0\n\
             pointer,16,drag,1,14,20,2,0,2\n",
        )
        .expect("trace should parse");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].action, TraceAction::Down);
        assert_eq!(lines[1].sample.delta, Point::new(2.0, 0.0));
        assert_eq!(lines[1].contacts, None);
        assert_eq!(lines[2].contacts, Some(2));
    }

    #[test]
    fn reports_bad_lines_with_line_number() {
        let err = parse_trace("pointer,0,down,1,10\n").expect_err("short line");
        assert_eq!(err.line_no, 1);

        let err = parse_trace("\npointer,0,hover,1,10,10\n").expect_err("bad action");
        assert_eq!(err.line_no, 2);
        assert!(err.message.contains("hover"));

        let err = parse_trace("pointer,x,down,1,10,10\n").expect_err("bad ms");
        assert!(err.to_string().starts_with("line 1: invalid ms"));
    }

    #[test]
    fn expected_kinds_accept_labels() {
        let kinds = parse_expected_kinds("begin_press\n# note\nPRESS\ndouble_click\n")
            .expect("labels should parse");
        assert_eq!(
            kinds,
            vec![
                GestureKind::BeginPress,
                GestureKind::Press,
                GestureKind::DoubleClick
            ]
        );
        assert!(parse_expected_kinds("swipe\n").is_err());
    }

    #[test]
    fn replay_tracks_contacts_for_touch_policy() {
        let contacts = ContactCounter::default();
        let mut engine =
            GestureEngine::new(Thresholds::default(), TouchCountValidity::new(contacts.query()));
        let lines = parse_trace(
            "pointer,0,down,1,0,0\n\
             pointer,10,drag,1,2,0,2,0\n\
             pointer,20,drag,1,4,0,2,0\n\
             pointer,30,drag,1,6,0,2,0,3\n",
        )
        .expect("trace should parse");

        let events = replay(&mut engine, &lines, &contacts);
        let drags = events
            .iter()
            .filter(|e| e.event.kind() == GestureKind::Drag)
            .count();
        assert_eq!(drags, 1);
        assert_eq!(contacts.get(), 3);
    }

    #[test]
    fn formats_flick_row() {
        let row = format_event(&ReplayedEvent {
            t_ms: 120,
            event: GestureEvent::Flick {
                pos: Point::new(10.0, 50.0),
                delta: Point::new(0.0, 40.0),
                direction: crate::gesture::types::FlickDirection::Up,
            },
        });
        assert_eq!(row, "gesture,120,flick,10,50,0,40,up");
    }
}
