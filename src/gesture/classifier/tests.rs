use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::gesture::types::{GestureKind, PointerId};
use crate::gesture::validity::{AlwaysValid, PressGatedValidity, TouchCountValidity};

fn at(id: i32, x: f32, y: f32, t_ms: u64) -> PointerSample {
    PointerSample::at(PointerId(id), Point::new(x, y), t_ms)
}

fn moved(id: i32, x: f32, y: f32, dx: f32, dy: f32, t_ms: u64) -> PointerSample {
    PointerSample::new(PointerId(id), Point::new(x, y), Point::new(dx, dy), t_ms)
}

fn engine() -> GestureEngine {
    GestureEngine::new(Thresholds::default(), AlwaysValid)
}

fn drain_kinds(output: GestureOutput, out: &mut Vec<GestureKind>) {
    out.extend(output.kinds());
}

fn tap(engine: &mut GestureEngine, x: f32, y: f32, t_ms: u64) -> Vec<GestureKind> {
    let mut kinds = Vec::new();
    drain_kinds(engine.pointer_down(at(0, x, y, t_ms)), &mut kinds);
    drain_kinds(engine.pointer_up(at(0, x, y, t_ms + 40)), &mut kinds);
    kinds
}

#[test]
fn press_brackets_with_begin_and_end() {
    let mut engine = engine();
    let down = engine.pointer_down(at(0, 10.0, 10.0, 0));
    assert_eq!(
        down.events.as_slice(),
        &[
            GestureEvent::BeginPress {
                pos: Point::new(10.0, 10.0)
            },
            GestureEvent::Press { is_down: true },
        ]
    );
    assert!(engine.is_pressing());
    assert_eq!(engine.active_touch_count(), 0);

    let up = engine.pointer_up(at(0, 12.0, 10.0, 50));
    assert_eq!(
        up.kinds().collect::<Vec<_>>(),
        vec![GestureKind::EndPress, GestureKind::Press]
    );
    assert_eq!(
        up.events[1],
        GestureEvent::Press { is_down: false }
    );
    assert!(!engine.is_pressing());
}

#[test]
fn first_drag_sample_only_begins_drag() {
    let mut engine = engine();
    engine.pointer_down(at(0, 0.0, 0.0, 0));
    let begin = engine.drag(moved(0, 3.0, 0.0, 3.0, 0.0, 10));
    assert_eq!(
        begin.events.as_slice(),
        &[GestureEvent::BeginDrag {
            pos: Point::new(3.0, 0.0)
        }]
    );
    assert!(engine.is_dragging());
    assert_eq!(engine.active_touch_count(), 1);

    let drag = engine.drag(moved(0, 6.0, 0.0, 3.0, 0.0, 20));
    assert_eq!(
        drag.events.as_slice(),
        &[GestureEvent::Drag {
            delta: Point::new(3.0, 0.0),
            pos: Point::new(6.0, 0.0)
        }]
    );
}

#[test]
fn explicit_drag_end_clears_touch() {
    let mut engine = engine();
    engine.pointer_down(at(0, 0.0, 0.0, 0));
    engine.drag(moved(0, 3.0, 0.0, 3.0, 0.0, 10));
    engine.pointer_up(at(0, 3.0, 0.0, 20));
    assert!(engine.is_dragging());

    let end = engine.end_drag(at(0, 3.0, 0.0, 20));
    assert_eq!(
        end.events.as_slice(),
        &[GestureEvent::EndDrag {
            pos: Point::new(3.0, 0.0)
        }]
    );
    assert_eq!(engine.mode(), GestureMode::Idle);
    assert_eq!(engine.active_touch_count(), 0);
}

#[test]
fn flick_direction_tie_breaks_vertical() {
    assert_eq!(flick_direction(Point::new(10.0, 10.0)), FlickDirection::Up);
    assert_eq!(flick_direction(Point::new(11.0, 10.0)), FlickDirection::Right);
    assert_eq!(flick_direction(Point::new(-5.0, -30.0)), FlickDirection::Down);
    assert_eq!(flick_direction(Point::new(-30.0, 5.0)), FlickDirection::Left);
    assert_eq!(flick_direction(Point::new(-10.0, -10.0)), FlickDirection::Down);
}

#[test]
fn release_far_from_origin_is_flick() {
    let mut engine = engine();
    engine.pointer_down(at(0, 100.0, 100.0, 0));
    let up = engine.pointer_up(at(0, 100.0, 140.0, 60));
    assert_eq!(
        up.events.last(),
        Some(&GestureEvent::Flick {
            pos: Point::new(100.0, 140.0),
            delta: Point::new(0.0, 40.0),
            direction: FlickDirection::Up,
        })
    );
    assert_eq!(engine.pending_click_ms(), None);
}

#[test]
fn flick_threshold_is_inclusive() {
    let mut engine = engine();
    engine.pointer_down(at(0, 0.0, 0.0, 0));
    let up = engine.pointer_up(at(0, -20.0, 0.0, 10));
    assert_eq!(
        up.events.last(),
        Some(&GestureEvent::Flick {
            pos: Point::new(-20.0, 0.0),
            delta: Point::new(-20.0, 0.0),
            direction: FlickDirection::Left,
        })
    );

    let mut engine = GestureEngine::default();
    engine.pointer_down(at(0, 0.0, 0.0, 0));
    let up = engine.pointer_up(at(0, 19.9, 0.0, 10));
    assert!(!up.kinds().any(|kind| kind == GestureKind::Flick));
    assert_eq!(engine.pending_click_ms(), Some(10));
}

#[test]
fn flick_origin_follows_small_drag_steps_only() {
    let mut engine = engine();
    engine.pointer_down(at(0, 0.0, 0.0, 0));
    engine.drag(moved(0, 5.0, 0.0, 5.0, 0.0, 10));
    engine.drag(moved(0, 10.0, 0.0, 5.0, 0.0, 20));
    assert_eq!(engine.flick_origin(), Point::new(10.0, 0.0));

    // Exactly on the update range still moves the origin.
    engine.drag(moved(0, 20.0, 0.0, 10.0, 0.0, 30));
    assert_eq!(engine.flick_origin(), Point::new(20.0, 0.0));

    // A corrective jump is reported but does not move the origin.
    let jump = engine.drag(moved(0, 60.0, 0.0, 40.0, 0.0, 40));
    assert_eq!(jump.kinds().collect::<Vec<_>>(), vec![GestureKind::Drag]);
    assert_eq!(engine.flick_origin(), Point::new(20.0, 0.0));

    let up = engine.pointer_up(at(0, 60.0, 0.0, 50));
    assert!(matches!(
        up.events.last(),
        Some(GestureEvent::Flick {
            direction: FlickDirection::Right,
            delta,
            ..
        }) if *delta == Point::new(40.0, 0.0)
    ));
}

#[test]
fn slow_drag_release_is_not_flick() {
    let mut engine = engine();
    engine.pointer_down(at(0, 0.0, 0.0, 0));
    engine.drag(moved(0, 4.0, 0.0, 4.0, 0.0, 10));
    let mut x = 4.0;
    for step in 0..20 {
        x += 4.0;
        engine.drag(moved(0, x, 0.0, 4.0, 0.0, 20 + step * 10));
    }
    let up = engine.pointer_up(at(0, x, 0.0, 300));
    assert_eq!(
        up.kinds().collect::<Vec<_>>(),
        vec![GestureKind::EndPress, GestureKind::Press]
    );
}

#[test]
fn two_taps_inside_interval_double_click() {
    let mut engine = engine();
    assert_eq!(
        tap(&mut engine, 50.0, 50.0, 0),
        vec![GestureKind::BeginPress, GestureKind::Press, GestureKind::EndPress, GestureKind::Press]
    );
    assert_eq!(engine.pending_click_ms(), Some(40));

    let second = tap(&mut engine, 52.0, 50.0, 999);
    assert_eq!(second.last(), Some(&GestureKind::DoubleClick));
    assert_eq!(engine.pending_click_ms(), None);

    // The pair is consumed; a third tap starts a fresh window.
    let third = tap(&mut engine, 52.0, 50.0, 1_200);
    assert_ne!(third.last(), Some(&GestureKind::DoubleClick));
    assert_eq!(engine.pending_click_ms(), Some(1_240));
}

#[test]
fn interval_boundary_is_inclusive() {
    let mut engine = engine();
    tap(&mut engine, 0.0, 0.0, 0);
    let second = tap(&mut engine, 0.0, 0.0, 1_000);
    assert_eq!(second.last(), Some(&GestureKind::DoubleClick));
}

#[test]
fn late_second_tap_restarts_window() {
    let mut engine = engine();
    tap(&mut engine, 0.0, 0.0, 0);
    let late = tap(&mut engine, 0.0, 0.0, 1_001);
    assert_ne!(late.last(), Some(&GestureKind::DoubleClick));
    assert_eq!(engine.pending_click_ms(), Some(1_041));

    let third = tap(&mut engine, 0.0, 0.0, 1_500);
    assert_eq!(third.last(), Some(&GestureKind::DoubleClick));
}

#[test]
fn flick_leaves_pending_click_untouched() {
    let mut engine = engine();
    tap(&mut engine, 0.0, 0.0, 0);
    engine.pointer_down(at(0, 0.0, 0.0, 100));
    let flick = engine.pointer_up(at(0, 0.0, -50.0, 150));
    assert_eq!(flick.kinds().last(), Some(GestureKind::Flick));
    assert_eq!(engine.pending_click_ms(), Some(40));

    let second = tap(&mut engine, 0.0, 0.0, 500);
    assert_eq!(second.last(), Some(&GestureKind::DoubleClick));
}

fn start_pinch(engine: &mut GestureEngine) -> Vec<GestureKind> {
    let mut kinds = Vec::new();
    drain_kinds(engine.pointer_down(at(1, 0.0, 0.0, 0)), &mut kinds);
    drain_kinds(engine.drag(moved(1, 1.0, 0.0, 1.0, 0.0, 10)), &mut kinds);
    drain_kinds(engine.pointer_down(at(2, 101.0, 0.0, 20)), &mut kinds);
    drain_kinds(engine.drag(moved(2, 101.0, 0.0, 0.0, 0.0, 30)), &mut kinds);
    kinds
}

#[test]
fn second_finger_mid_drag_becomes_pinch() {
    let mut engine = engine();
    let kinds = start_pinch(&mut engine);
    assert_eq!(
        kinds,
        vec![
            GestureKind::BeginPress,
            GestureKind::Press,
            GestureKind::BeginDrag,
            GestureKind::BeginPress,
            GestureKind::Press,
            GestureKind::EndDrag,
            GestureKind::BeginPinch,
        ]
    );
    assert!(engine.is_pinching());
    assert!(!engine.is_dragging());
    assert_eq!(engine.pinch_baseline(), Some(100.0));
}

#[test]
fn pinch_reports_range_deltas() {
    let mut engine = engine();
    start_pinch(&mut engine);

    let wider = engine.drag(moved(2, 121.0, 0.0, 20.0, 0.0, 40));
    assert_eq!(
        wider.events.as_slice(),
        &[GestureEvent::Pinch {
            touch1: Point::new(1.0, 0.0),
            touch2: Point::new(121.0, 0.0),
            range_delta: 20.0,
        }]
    );

    let narrower = engine.drag(moved(1, 31.0, 0.0, 30.0, 0.0, 50));
    assert_eq!(
        narrower.events.as_slice(),
        &[GestureEvent::Pinch {
            touch1: Point::new(31.0, 0.0),
            touch2: Point::new(121.0, 0.0),
            range_delta: -30.0,
        }]
    );
    assert_eq!(engine.pinch_baseline(), Some(90.0));
}

#[test]
fn releasing_pinch_finger_suppresses_flick_and_click() {
    let mut engine = engine();
    start_pinch(&mut engine);
    tap(&mut engine, 500.0, 500.0, 35);

    let up = engine.pointer_up(at(2, 300.0, 300.0, 60));
    assert_eq!(
        up.kinds().collect::<Vec<_>>(),
        vec![GestureKind::EndPress, GestureKind::Press, GestureKind::EndPinch]
    );
    assert_eq!(engine.mode(), GestureMode::Idle);
    assert_eq!(engine.active_touch_count(), 1);
}

#[test]
fn third_finger_is_tracked_but_not_pinched() {
    let mut engine = engine();
    start_pinch(&mut engine);
    engine.pointer_down(at(3, 50.0, 50.0, 40));
    let third = engine.drag(moved(3, 50.0, 80.0, 0.0, 30.0, 50));
    assert_eq!(
        third.events.as_slice(),
        &[GestureEvent::Pinch {
            touch1: Point::new(1.0, 0.0),
            touch2: Point::new(101.0, 0.0),
            range_delta: 0.0,
        }]
    );
    assert_eq!(engine.active_touch_count(), 3);

    // Lifting one of three keeps the pinch alive and evaluates the release normally.
    let up = engine.pointer_up(at(3, 50.0, 80.0, 60));
    assert!(engine.is_pinching());
    assert!(!up.kinds().any(|kind| kind == GestureKind::EndPinch));
}

#[test]
fn remaining_finger_hands_pinch_back_to_drag() {
    let mut engine = engine();
    start_pinch(&mut engine);

    // Host reports the second finger's drag end before its pointer-up.
    let end = engine.end_drag(at(2, 101.0, 0.0, 40));
    assert_eq!(
        end.events.as_slice(),
        &[GestureEvent::EndDrag {
            pos: Point::new(101.0, 0.0)
        }]
    );
    assert!(engine.is_pinching());
    assert_eq!(engine.active_touch_count(), 1);

    let handoff = engine.drag(moved(1, 4.0, 0.0, 3.0, 0.0, 50));
    assert_eq!(
        handoff.events.as_slice(),
        &[
            GestureEvent::EndPinch,
            GestureEvent::BeginDrag {
                pos: Point::new(4.0, 0.0)
            },
            GestureEvent::Drag {
                delta: Point::new(3.0, 0.0),
                pos: Point::new(4.0, 0.0)
            },
        ]
    );
    assert!(engine.is_dragging());
    assert_eq!(engine.flick_origin(), Point::new(4.0, 0.0));
}

#[test]
fn drag_is_never_reported_with_two_touches() {
    let mut engine = engine();
    start_pinch(&mut engine);
    for step in 0..10u64 {
        let x = 101.0 + step as f32;
        let output = engine.drag(moved(2, x, 0.0, 1.0, 0.0, 40 + step));
        assert!(!output.kinds().any(|kind| kind == GestureKind::Drag));
        assert!(engine.active_touch_count() >= 2);
    }
}

#[test]
fn invalid_platform_drag_is_dropped() {
    let contacts = Rc::new(Cell::new(1usize));
    let query = Rc::clone(&contacts);
    let mut engine = GestureEngine::new(
        Thresholds::default(),
        TouchCountValidity::new(move || query.get()),
    );
    engine.pointer_down(at(0, 0.0, 0.0, 0));
    engine.drag(moved(0, 1.0, 0.0, 1.0, 0.0, 10));

    contacts.set(2);
    assert!(engine.drag(moved(0, 2.0, 0.0, 1.0, 0.0, 20)).is_empty());

    contacts.set(1);
    assert_eq!(
        engine
            .drag(moved(0, 3.0, 0.0, 1.0, 0.0, 30))
            .kinds()
            .collect::<Vec<_>>(),
        vec![GestureKind::Drag]
    );
}

#[test]
fn press_gated_drag_stops_after_release() {
    let mut engine = GestureEngine::new(Thresholds::default(), PressGatedValidity);
    engine.pointer_down(at(0, 0.0, 0.0, 0));
    engine.drag(moved(0, 1.0, 0.0, 1.0, 0.0, 10));
    assert!(!engine.drag(moved(0, 2.0, 0.0, 1.0, 0.0, 20)).is_empty());

    engine.pointer_up(at(0, 2.0, 0.0, 30));
    assert!(engine.drag(moved(0, 3.0, 0.0, 1.0, 0.0, 40)).is_empty());
}

#[test]
fn drag_end_after_pinch_release_is_reported_once() {
    let mut engine = engine();
    start_pinch(&mut engine);
    engine.pointer_up(at(2, 101.0, 0.0, 40));
    assert_eq!(engine.mode(), GestureMode::Idle);

    let end = engine.end_drag(at(2, 101.0, 0.0, 40));
    assert_eq!(
        end.kinds().collect::<Vec<_>>(),
        vec![GestureKind::EndDrag]
    );
    assert_eq!(engine.mode(), GestureMode::Idle);
    assert!(engine.end_drag(at(2, 101.0, 0.0, 45)).is_empty());
}

#[test]
fn stray_inputs_are_noops() {
    let mut engine = engine();
    assert!(engine.end_drag(at(9, 0.0, 0.0, 0)).is_empty());
    assert!(engine.pointer_up(at(9, 0.0, 0.0, 5)).is_empty());
    assert!(engine.pointer_up(at(9, 0.0, 0.0, 10)).is_empty());
    assert_eq!(engine.pending_click_ms(), None);

    assert!(engine.drag(moved(9, 4.0, 0.0, 4.0, 0.0, 15)).is_empty());
    assert_eq!(engine.mode(), GestureMode::Idle);
    assert_eq!(engine.active_touch_count(), 0);
}

#[test]
fn stray_up_does_not_end_another_press() {
    let mut engine = engine();
    engine.pointer_down(at(0, 0.0, 0.0, 0));
    engine.drag(moved(0, 2.0, 0.0, 2.0, 0.0, 10));

    assert!(engine.pointer_up(at(9, 50.0, 50.0, 20)).is_empty());
    assert!(engine.is_pressing());
    assert!(engine.is_dragging());
    assert_eq!(
        engine
            .drag(moved(0, 4.0, 0.0, 2.0, 0.0, 30))
            .kinds()
            .collect::<Vec<_>>(),
        vec![GestureKind::Drag]
    );
}

#[test]
fn independent_engines_do_not_share_click_clock() {
    let mut first = engine();
    let mut second = engine();
    tap(&mut first, 0.0, 0.0, 0);
    let other = tap(&mut second, 0.0, 0.0, 100);
    assert_ne!(other.last(), Some(&GestureKind::DoubleClick));
    assert_eq!(first.pending_click_ms(), Some(40));
}
