#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_default_is_origin() {
    assert_eq!(Point::default(), Point::new(0.0, 0.0));
}

// --- SurfaceRect layout ---

#[test]
fn zero_width_is_not_laid_out() {
    assert!(!SurfaceRect::new(0.0, 0.0, 0.0, 300.0).is_laid_out());
}

#[test]
fn zero_height_is_not_laid_out() {
    assert!(!SurfaceRect::new(0.0, 0.0, 300.0, 0.0).is_laid_out());
}

#[test]
fn positive_area_is_laid_out() {
    assert!(SurfaceRect::new(10.0, 10.0, 1.0, 1.0).is_laid_out());
}

// --- to_percent ---

#[test]
fn to_percent_top_left_is_zero() {
    let rect = SurfaceRect::new(20.0, 40.0, 400.0, 200.0);
    let p = rect.to_percent(Point::new(20.0, 40.0));
    assert_eq!(p, Some(Point::new(0.0, 0.0)));
}

#[test]
fn to_percent_bottom_right_is_hundred() {
    let rect = SurfaceRect::new(20.0, 40.0, 400.0, 200.0);
    let p = rect.to_percent(Point::new(420.0, 240.0));
    assert_eq!(p, Some(Point::new(100.0, 100.0)));
}

#[test]
fn to_percent_center() {
    let rect = SurfaceRect::new(0.0, 0.0, 800.0, 600.0);
    let p = rect.to_percent(Point::new(400.0, 300.0));
    assert_eq!(p, Some(Point::new(50.0, 50.0)));
}

#[test]
fn to_percent_outside_rect_exceeds_bounds() {
    let rect = SurfaceRect::new(0.0, 0.0, 100.0, 100.0);
    let p = rect.to_percent(Point::new(-50.0, 150.0));
    assert_eq!(p, Some(Point::new(-50.0, 150.0)));
}

#[test]
fn to_percent_skipped_on_degenerate_rect() {
    let rect = SurfaceRect::new(0.0, 0.0, 0.0, 0.0);
    assert!(rect.to_percent(Point::new(10.0, 10.0)).is_none());
}

// --- to_client ---

#[test]
fn percent_client_roundtrip() {
    let rect = SurfaceRect::new(13.0, 7.0, 640.0, 480.0);
    let client = Point::new(250.5, 111.25);
    let back = rect.to_percent(client).map(|p| rect.to_client(p));
    assert!(back.is_some_and(|b| point_approx_eq(b, client)));
}

#[test]
fn to_client_rescales_after_resize() {
    let small = SurfaceRect::new(0.0, 0.0, 200.0, 100.0);
    let large = SurfaceRect::new(0.0, 0.0, 400.0, 200.0);
    let pct = Point::new(25.0, 50.0);
    assert_eq!(small.to_client(pct), Point::new(50.0, 50.0));
    assert_eq!(large.to_client(pct), Point::new(100.0, 100.0));
}

// --- distance conversion ---

#[test]
fn px_to_percent_axes() {
    let rect = SurfaceRect::new(0.0, 0.0, 500.0, 250.0);
    assert_eq!(rect.px_to_percent_x(50.0), Some(10.0));
    assert_eq!(rect.px_to_percent_y(50.0), Some(20.0));
}

#[test]
fn px_to_percent_skipped_on_degenerate_rect() {
    let rect = SurfaceRect::new(0.0, 0.0, 0.0, 250.0);
    assert!(rect.px_to_percent_x(50.0).is_none());
    assert!(rect.px_to_percent_y(50.0).is_none());
}
