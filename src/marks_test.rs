#![allow(clippy::float_cmp)]

use super::*;

fn image() -> SurfaceRect {
    SurfaceRect::new(10.0, 20.0, 1000.0, 500.0)
}

#[test]
fn mark_size_clamps() {
    assert_eq!(MarkSize::new(0).get(), 12);
    assert_eq!(MarkSize::new(18).get(), 18);
    assert_eq!(MarkSize::new(99).get(), 24);
    assert_eq!(MarkSize::default().get(), 12);
}

#[test]
fn glyph_px_scales_by_unit() {
    assert_eq!(MarkSize::new(12).glyph_px(), 192.0);
    assert_eq!(MarkSize::new(24).glyph_px(), 384.0);
}

#[test]
fn at_click_offsets_by_half_glyph() {
    // Size 12 -> 192px glyph -> 96px half offset.
    let mark = PointMark::at_click(Point::new(510.0, 270.0), image(), MarkSize::new(12)).unwrap();
    assert_eq!(mark.x, (500.0 - 96.0) / 1000.0 * 100.0);
    assert_eq!(mark.y, (250.0 - 96.0) / 500.0 * 100.0);
    assert_eq!(mark.size, 12);
}

#[test]
fn at_click_records_size_in_effect() {
    let small = PointMark::at_click(Point::new(510.0, 270.0), image(), MarkSize::new(12)).unwrap();
    let large = PointMark::at_click(Point::new(510.0, 270.0), image(), MarkSize::new(24)).unwrap();
    assert_eq!(large.size, 24);
    assert!(large.x < small.x);
}

#[test]
fn at_click_skipped_on_degenerate_image() {
    assert!(PointMark::at_click(Point::new(1.0, 1.0), SurfaceRect::default(), MarkSize::default()).is_none());
}

#[test]
fn stored_size_is_clamped_on_read() {
    let mark: PointMark = serde_json::from_str(r#"{"x":1.5,"y":2.5,"size":40}"#).unwrap();
    assert_eq!(mark.size, 40);
    assert_eq!(mark.mark_size().get(), 24);
}
