use std::path::Path;

use chasebook::engine::{Action, TrackerCore};
use chasebook::geom::{Point, SurfaceRect};
use uuid::Uuid;

use super::*;

fn scratch_ctx(prefix: &str) -> CliContext {
    CliContext {
        data_dir: std::env::temp_dir().join(format!("chasebook-cli-{}", Uuid::new_v4())),
        config: TrackerConfig::with_prefix(prefix),
    }
}

fn cleanup(dir: &Path) {
    if dir.exists() {
        std::fs::remove_dir_all(dir).unwrap();
    }
}

/// Two boxes worth 100 and 40, the second marked; bags 3 and 7 bought at 5 each;
/// one insurance image with a single mark.
fn seed(ctx: &CliContext) {
    let mut tracker = ctx.open();
    let mut ids = Vec::new();
    for value in ["100", "40"] {
        let created = tracker.dispatch(TrackerCore::add_box);
        let Some(Action::BoxCreated(b)) = created.first() else {
            panic!("expected BoxCreated, got {created:?}");
        };
        ids.push(b.id);
        let id = b.id;
        tracker.dispatch(|c| c.set_box_value(&id, value.to_owned()));
    }
    let marked = ids[1];
    tracker.dispatch(|c| c.toggle_mark(&marked));
    tracker.dispatch(|c| c.toggle_number(3));
    tracker.dispatch(|c| c.toggle_number(7));
    tracker.dispatch(|c| c.set_bag_cost(5.0));
    tracker.dispatch(|c| c.set_insurance_image(2, "data:image/png;base64,AA==".into()));
    tracker.dispatch(|c| c.place_mark(Point::new(400.0, 300.0), SurfaceRect::new(0.0, 0.0, 800.0, 600.0)));
}

fn render(run: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
    let mut out = Vec::new();
    run(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// =============================================================
// summary
// =============================================================

#[test]
fn summary_on_empty_dir_shows_defaults() {
    let ctx = scratch_ctx("");
    let text = render(|out| run_summary(&ctx, false, out));
    assert!(text.contains("bags:             50\n"), "{text}");
    assert!(text.contains("remaining chases: 8\n"), "{text}");
    assert!(text.contains("hit ratio:        16.0%\n"), "{text}");
    assert!(text.contains("insurance images: 0/5\n"), "{text}");
    cleanup(&ctx.data_dir);
}

#[test]
fn summary_reads_seeded_state() {
    let ctx = scratch_ctx("");
    seed(&ctx);
    let text = render(|out| run_summary(&ctx, false, out));
    assert!(text.contains("selected:         2\n"), "{text}");
    assert!(text.contains("remaining bags:   48\n"), "{text}");
    assert!(text.contains("remaining chases: 1\n"), "{text}");
    assert!(text.contains("unmarked total:   100.00\n"), "{text}");
    assert!(text.contains("buyout profit:    -140.00\n"), "{text}");
    assert!(text.contains("boxes:            2\n"), "{text}");
    assert!(text.contains("insurance images: 1/5\n"), "{text}");
    assert!(text.contains("marks:            [0, 0, 1, 0, 0]\n"), "{text}");
    cleanup(&ctx.data_dir);
}

#[test]
fn summary_json_has_camel_case_fields() {
    let ctx = scratch_ctx("");
    seed(&ctx);
    let text = render(|out| run_summary(&ctx, true, out));
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["bagCount"], 50);
    assert_eq!(value["remainingChases"], 1);
    assert_eq!(value["unmarkedTotal"], 100.0);
    assert_eq!(value["cooked"], false);
    assert_eq!(value["marks"], json!([0, 0, 1, 0, 0]));
    cleanup(&ctx.data_dir);
}

#[test]
fn prefix_isolates_trackers_in_one_dir() {
    let seeded = scratch_ctx("a.");
    seed(&seeded);
    let other = CliContext { data_dir: seeded.data_dir.clone(), config: TrackerConfig::with_prefix("b.") };
    let text = render(|out| run_summary(&other, false, out));
    assert!(text.contains("boxes:            0\n"), "{text}");
    cleanup(&seeded.data_dir);
}

// =============================================================
// boxes / marks
// =============================================================

#[test]
fn boxes_lists_in_creation_order() {
    let ctx = scratch_ctx("");
    seed(&ctx);
    let text = render(|out| run_boxes(&ctx, out));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("value=\"100\"  marked=no  locked=no"), "{text}");
    assert!(lines[1].contains("value=\"40\"  marked=yes"), "{text}");
    assert!(lines[0].contains("pos=(50.0, 50.0)  size=100x100"), "{text}");
    cleanup(&ctx.data_dir);
}

#[test]
fn boxes_on_empty_dir() {
    let ctx = scratch_ctx("");
    assert_eq!(render(|out| run_boxes(&ctx, out)), "no boxes\n");
}

#[test]
fn marks_lists_every_slot() {
    let ctx = scratch_ctx("");
    seed(&ctx);
    let text = render(|out| run_marks(&ctx, out));
    assert!(text.starts_with("slot 0: empty, 0 marks\n"), "{text}");
    assert!(text.contains("slot 2: image, 1 marks\n  ("), "{text}");
    assert!(text.contains("size 12\n"), "{text}");
    assert_eq!(text.lines().filter(|l| l.starts_with("slot ")).count(), 5);
    cleanup(&ctx.data_dir);
}

// =============================================================
// reset
// =============================================================

#[test]
fn reset_requires_confirmation() {
    let ctx = scratch_ctx("");
    seed(&ctx);
    let mut out = Vec::new();
    let err = run_reset(&ctx, false, &mut out).unwrap_err();
    assert!(matches!(err, CliError::ResetNotConfirmed));
    assert_eq!(ctx.open().core().boxes().len(), 2);
    cleanup(&ctx.data_dir);
}

#[test]
fn reset_clears_snapshots() {
    let ctx = scratch_ctx("");
    seed(&ctx);
    assert_eq!(render(|out| run_reset(&ctx, true, out)), "reset\n");
    let tracker = ctx.open();
    assert!(tracker.core().boxes().is_empty());
    assert_eq!(tracker.core().ledger().bag_count(), 50);
    assert_eq!(tracker.core().gallery().populated_count(), 0);
    cleanup(&ctx.data_dir);
}

#[test]
fn reset_on_missing_dir_succeeds() {
    let ctx = scratch_ctx("");
    assert_eq!(render(|out| run_reset(&ctx, true, out)), "reset\n");
}
