#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Transform
// =============================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::default();
    assert_eq!(t.scale, 1.0);
    assert_eq!(t.offset_x, 0.0);
    assert_eq!(t.offset_y, 0.0);
}

#[test]
fn transform_serializes_with_position_names() {
    let t = Transform { scale: 2.0, offset_x: 10.0, offset_y: -5.0 };
    let json = serde_json::to_value(t).unwrap();
    assert_eq!(json, serde_json::json!({ "scale": 2.0, "positionX": 10.0, "positionY": -5.0 }));
}

#[test]
fn transform_deserializes_stored_document() {
    let t: Transform = serde_json::from_str(r#"{"scale":1.5,"positionX":-20,"positionY":30}"#).unwrap();
    assert_eq!(t, Transform { scale: 1.5, offset_x: -20.0, offset_y: 30.0 });
}

#[test]
fn content_screen_roundtrip() {
    let t = Transform { scale: 2.5, offset_x: 13.0, offset_y: -7.0 };
    let p = pt(42.0, 17.0);
    let back = t.screen_to_content(t.content_to_screen(p));
    assert!(approx_eq(back.x, p.x));
    assert!(approx_eq(back.y, p.y));
}

// =============================================================
// clamp_scale
// =============================================================

#[test]
fn clamp_scale_bounds() {
    assert_eq!(clamp_scale(0.1), 0.5);
    assert_eq!(clamp_scale(10.0), 4.0);
    assert_eq!(clamp_scale(2.0), 2.0);
}

#[test]
fn clamp_scale_non_finite_is_one() {
    assert_eq!(clamp_scale(f64::NAN), 1.0);
    assert_eq!(clamp_scale(f64::INFINITY), 1.0);
}

// =============================================================
// set_transform / reset
// =============================================================

#[test]
fn set_transform_clamps_scale() {
    let mut vp = Viewport::persisted();
    assert!(vp.set_transform(9.0, 1.0, 2.0));
    assert_eq!(vp.transform().scale, 4.0);
    assert!(vp.set_transform(0.01, 1.0, 2.0));
    assert_eq!(vp.transform().scale, 0.5);
}

#[test]
fn set_transform_same_value_reports_no_change() {
    let mut vp = Viewport::persisted();
    assert!(!vp.set_transform(1.0, 0.0, 0.0));
}

#[test]
fn reset_returns_to_identity() {
    let mut vp = Viewport::persisted();
    vp.set_transform(3.0, 40.0, -60.0);
    assert!(vp.reset_transform());
    assert_eq!(vp.transform(), Transform::default());
}

#[test]
fn reset_respects_toggle() {
    let mut vp = Viewport::persisted();
    vp.set_transform(3.0, 40.0, -60.0);
    vp.set_toggles(GestureToggles::all(false));
    assert!(!vp.reset_transform());
    assert_eq!(vp.transform().scale, 3.0);
}

#[test]
fn restore_sanitizes_stored_values() {
    let mut vp = Viewport::persisted();
    vp.restore(Transform { scale: 99.0, offset_x: f64::NAN, offset_y: 5.0 });
    assert_eq!(vp.transform(), Transform { scale: 4.0, offset_x: 0.0, offset_y: 5.0 });
}

#[test]
fn persisted_flag() {
    assert!(Viewport::persisted().is_persisted());
    assert!(!Viewport::transient().is_persisted());
}

// =============================================================
// Gestures
// =============================================================

#[test]
fn pan_moves_offsets() {
    let mut vp = Viewport::transient();
    assert!(vp.pan_by(15.0, -4.0));
    assert_eq!(vp.transform().offset_x, 15.0);
    assert_eq!(vp.transform().offset_y, -4.0);
}

#[test]
fn pan_disabled_is_ignored() {
    let mut vp = Viewport::transient();
    vp.set_toggles(GestureToggles { pan: false, ..GestureToggles::default() });
    assert!(!vp.pan_by(15.0, -4.0));
    assert_eq!(vp.transform(), Transform::default());
}

#[test]
fn wheel_up_zooms_in_one_step() {
    let mut vp = Viewport::transient();
    assert!(vp.wheel(-120.0, pt(0.0, 0.0)));
    assert!(approx_eq(vp.transform().scale, 1.1));
}

#[test]
fn wheel_down_zooms_out_one_step() {
    let mut vp = Viewport::transient();
    assert!(vp.wheel(120.0, pt(0.0, 0.0)));
    assert!(approx_eq(vp.transform().scale, 0.9));
}

#[test]
fn wheel_keeps_anchor_fixed() {
    let mut vp = Viewport::transient();
    vp.set_transform(2.0, 30.0, 10.0);
    let anchor = pt(200.0, 150.0);
    let before = vp.transform().screen_to_content(anchor);
    vp.wheel(-1.0, anchor);
    let after = vp.transform().content_to_screen(before);
    assert!(approx_eq(after.x, anchor.x));
    assert!(approx_eq(after.y, anchor.y));
}

#[test]
fn wheel_stops_at_max_scale() {
    let mut vp = Viewport::transient();
    vp.set_transform(4.0, 0.0, 0.0);
    assert!(!vp.wheel(-1.0, pt(0.0, 0.0)));
    assert_eq!(vp.transform().scale, 4.0);
}

#[test]
fn wheel_zero_delta_is_ignored() {
    let mut vp = Viewport::transient();
    assert!(!vp.wheel(0.0, pt(0.0, 0.0)));
}

#[test]
fn wheel_disabled_is_ignored() {
    let mut vp = Viewport::transient();
    vp.set_toggles(GestureToggles { wheel: false, ..GestureToggles::default() });
    assert!(!vp.wheel(-1.0, pt(0.0, 0.0)));
}

#[test]
fn pinch_scales_by_ratio_and_clamps() {
    let mut vp = Viewport::transient();
    assert!(vp.pinch(2.0, pt(0.0, 0.0)));
    assert_eq!(vp.transform().scale, 2.0);
    vp.pinch(10.0, pt(0.0, 0.0));
    assert_eq!(vp.transform().scale, 4.0);
}

#[test]
fn pinch_rejects_bad_ratio() {
    let mut vp = Viewport::transient();
    assert!(!vp.pinch(0.0, pt(0.0, 0.0)));
    assert!(!vp.pinch(-1.0, pt(0.0, 0.0)));
    assert!(!vp.pinch(f64::NAN, pt(0.0, 0.0)));
}

#[test]
fn pinch_disabled_is_ignored() {
    let mut vp = Viewport::transient();
    vp.set_toggles(GestureToggles { pinch: false, ..GestureToggles::default() });
    assert!(!vp.pinch(2.0, pt(0.0, 0.0)));
}

#[test]
fn toggles_are_independent() {
    let mut vp = Viewport::transient();
    vp.set_toggles(GestureToggles { pan: false, wheel: true, pinch: false, double_activate: true });
    assert!(!vp.pan_by(1.0, 1.0));
    assert!(vp.wheel(-1.0, pt(0.0, 0.0)));
    assert!(!vp.pinch(2.0, pt(0.0, 0.0)));
}
