//! Tracker engine: every state transition behind the three views.
//!
//! [`TrackerCore`] holds all state and logic and never touches storage.
//! Each operation returns the [`Action`]s the host should react to,
//! including [`Action::Persist`] for every snapshot that changed.
//! [`Tracker`] wraps the core with a [`Storage`] port and writes those
//! snapshots before handing the actions back, so a state change that must
//! survive a reload is durable as soon as the call returns.
//!
//! Pointer input for boxes runs through one set of handlers whatever the
//! gesture: `begin_box_drag` / `begin_box_resize` on handle press,
//! `pointer_move` and `pointer_up` from document-level listeners, and
//! `click_box` for the synthetic click. The click gate makes sure the click
//! that follows a drag release does not toggle the box mark.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, error, info, warn};

use crate::boxes::{BoxId, BoxPatch, BoxStore, ChaseBox};
use crate::config::{SnapshotKey, TrackerConfig};
use crate::gallery::{Direction, Gallery};
use crate::geom::{Point, SurfaceRect};
use crate::gesture::{ClickGate, Corner, GestureState};
use crate::ledger::Ledger;
use crate::marks::{MarkSize, PointMark};
use crate::persistence::{self, BagSnapshot, LoadedState, Storage};
use crate::timers::{BannerPulse, IdleControls, View};
use crate::viewport::{GestureToggles, Transform, Viewport};

/// Actions returned from engine operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    BoxCreated(ChaseBox),
    BoxUpdated { id: BoxId, fields: BoxPatch },
    BoxDeleted { id: BoxId },
    MarkPlaced { slot: usize, mark: PointMark },
    MarkRemoved { slot: usize },
    /// The snapshot under this key changed and must be written.
    Persist(SnapshotKey),
    /// Every snapshot key must be removed from storage.
    ClearStorage,
    RenderNeeded,
}

/// Which zoomable image surface a viewport call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Prize image with boxes. Transform is persisted.
    Prize,
    /// Insurance gallery image. Transform lives in memory only.
    Gallery,
}

/// Core tracker state. All logic lives here so it can be tested without a
/// browser or a storage backend.
#[derive(Debug, Clone)]
pub struct TrackerCore {
    ledger: Ledger,
    boxes: BoxStore,
    prize_image: Option<String>,
    prize_view: Viewport,
    gallery_view: Viewport,
    gesture: GestureState,
    click_gate: ClickGate,
    box_edit: bool,
    bag_edit: bool,
    gallery: Gallery,
    banner: BannerPulse,
    controls: IdleControls,
    view: View,
    reset_pending: bool,
    now_ms: f64,
}

impl Default for TrackerCore {
    fn default() -> Self {
        Self {
            ledger: Ledger::new(),
            boxes: BoxStore::new(),
            prize_image: None,
            prize_view: Viewport::persisted(),
            gallery_view: Viewport::transient(),
            gesture: GestureState::Idle,
            click_gate: ClickGate::default(),
            box_edit: false,
            bag_edit: false,
            gallery: Gallery::new(),
            banner: BannerPulse::default(),
            controls: IdleControls::default(),
            view: View::default(),
            reset_pending: false,
            now_ms: 0.0,
        }
    }
}

impl TrackerCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Hydrate from stored snapshots. Missing or corrupt snapshots leave
    /// their defaults in place. `remaining_chases` keeps its stored value
    /// until the next box edit.
    pub fn hydrate(&mut self, loaded: LoadedState) {
        match loaded.bags {
            Some(snapshot) => {
                let (ledger, boxes) = snapshot.into_parts();
                self.ledger = ledger;
                self.boxes.load_snapshot(boxes);
            }
            None => {
                self.ledger = Ledger::new();
                self.boxes.clear();
            }
        }
        self.prize_image = loaded.prize_image;
        self.prize_view.restore(loaded.prize_viewport.unwrap_or_default());
        self.gallery.hydrate(loaded.insurance_images.unwrap_or_default(), loaded.insurance_marks.unwrap_or_default());
        self.rearm_banner();
        info!(
            bag_count = self.ledger.bag_count(),
            boxes = self.boxes.len(),
            insurance_images = self.gallery.populated_count(),
            "tracker hydrated"
        );
    }

    /// Advance timers to the host clock.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        self.now_ms = now_ms;
        let banner = self.banner.tick(now_ms);
        let controls = self.controls.tick(now_ms);
        if banner || controls { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Queries ---

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Boxes in creation order.
    #[must_use]
    pub fn boxes(&self) -> &[ChaseBox] {
        self.boxes.as_slice()
    }

    #[must_use]
    pub fn box_by_id(&self, id: &BoxId) -> Option<&ChaseBox> {
        self.boxes.get(id)
    }

    #[must_use]
    pub fn prize_image(&self) -> Option<&str> {
        self.prize_image.as_deref()
    }

    #[must_use]
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    #[must_use]
    pub fn viewport(&self, surface: Surface) -> &Viewport {
        match surface {
            Surface::Prize => &self.prize_view,
            Surface::Gallery => &self.gallery_view,
        }
    }

    #[must_use]
    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    #[must_use]
    pub fn is_box_edit_mode(&self) -> bool {
        self.box_edit
    }

    #[must_use]
    pub fn is_bag_edit_mode(&self) -> bool {
        self.bag_edit
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Sum of values over unmarked boxes.
    #[must_use]
    pub fn unmarked_total(&self) -> f64 {
        self.boxes.unmarked_total()
    }

    #[must_use]
    pub fn buyout_profit(&self) -> f64 {
        self.ledger.buyout_profit(self.boxes.unmarked_total())
    }

    #[must_use]
    pub fn hit_ratio(&self) -> String {
        self.ledger.hit_ratio()
    }

    #[must_use]
    pub fn is_cooked(&self) -> bool {
        self.ledger.is_cooked()
    }

    /// Whether the buyout banner is drawn right now.
    #[must_use]
    pub fn is_banner_visible(&self) -> bool {
        self.banner.is_visible()
    }

    /// Whether the blinking banner is active at all.
    #[must_use]
    pub fn has_buyout_offer(&self) -> bool {
        self.banner.is_armed()
    }

    /// Whether transient controls are drawn right now. Edit modes pin them.
    #[must_use]
    pub fn are_controls_visible(&self) -> bool {
        self.controls.is_visible()
            || (self.view == View::Chases && self.box_edit)
            || (self.view == View::Insurance && self.gallery.is_edit_mode())
    }

    /// Earliest timer deadline, for the host to schedule its next `tick`.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        // A pending banner wants a tick right away to anchor its period.
        let banner = if self.banner.is_pending() { Some(self.now_ms) } else { self.banner.next_deadline() };
        match (banner, self.controls.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // --- Views / activity ---

    /// Switch the top-level view at host time `now_ms`.
    pub fn set_view(&mut self, view: View, now_ms: f64) -> Vec<Action> {
        self.now_ms = now_ms;
        self.view = view;
        self.controls.enter_view(view, now_ms);
        vec![Action::RenderNeeded]
    }

    /// Pointer or touch activity anywhere in the window, at host time `now_ms`.
    pub fn pointer_activity(&mut self, now_ms: f64) -> Vec<Action> {
        self.now_ms = now_ms;
        if self.controls.on_activity(now_ms) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Bag ledger ---

    pub fn change_bag_count(&mut self, delta: i32) -> Vec<Action> {
        let changed = self.ledger.change_bag_count(delta);
        self.ledger_changed(changed)
    }

    pub fn toggle_number(&mut self, n: u32) -> Vec<Action> {
        let changed = self.ledger.toggle_number(n);
        self.ledger_changed(changed)
    }

    pub fn set_bag_cost(&mut self, cost: f64) -> Vec<Action> {
        let changed = self.ledger.set_bag_cost(cost);
        self.ledger_changed(changed)
    }

    pub fn set_bag_edit_mode(&mut self, on: bool) -> Vec<Action> {
        if self.bag_edit == on {
            return Vec::new();
        }
        self.bag_edit = on;
        self.rearm_banner();
        vec![Action::RenderNeeded]
    }

    // --- Boxes ---

    /// Append a default box.
    pub fn add_box(&mut self) -> Vec<Action> {
        let created = self.boxes.add_box();
        debug!(id = %created.id, "box added");
        self.boxes_changed(Action::BoxCreated(created))
    }

    /// Remove the newest unlocked box. No-op when none exists.
    pub fn delete_last_box(&mut self) -> Vec<Action> {
        let Some(removed) = self.boxes.delete_last_unlocked() else {
            debug!(boxes = self.boxes.len(), "no unlocked box to delete");
            return Vec::new();
        };
        if self.gesture.target() == Some(removed.id) {
            self.gesture = GestureState::Idle;
        }
        debug!(id = %removed.id, "box deleted");
        self.boxes_changed(Action::BoxDeleted { id: removed.id })
    }

    /// Merge `patch` into box `id`. No-op for unknown ids or empty patches.
    pub fn update_box(&mut self, id: &BoxId, patch: BoxPatch) -> Vec<Action> {
        if patch.is_empty() || self.boxes.update(id, &patch).is_none() {
            return Vec::new();
        }
        self.boxes_changed(Action::BoxUpdated { id: *id, fields: patch })
    }

    /// Set the chase amount typed into a box.
    pub fn set_box_value(&mut self, id: &BoxId, value: String) -> Vec<Action> {
        self.update_box(id, BoxPatch { value: Some(value), ..BoxPatch::default() })
    }

    pub fn toggle_lock(&mut self, id: &BoxId) -> Vec<Action> {
        let Some(locked) = self.boxes.get(id).map(|b| b.is_locked) else {
            return Vec::new();
        };
        self.update_box(id, BoxPatch { is_locked: Some(!locked), ..BoxPatch::default() })
    }

    /// Flip the mark on box `id`. Refused in box edit mode and mid-gesture.
    pub fn toggle_mark(&mut self, id: &BoxId) -> Vec<Action> {
        if self.box_edit || self.gesture.is_active() {
            return Vec::new();
        }
        let Some(marked) = self.boxes.get(id).map(|b| b.is_marked) else {
            return Vec::new();
        };
        self.update_box(id, BoxPatch { is_marked: Some(!marked), ..BoxPatch::default() })
    }

    /// A click landed on box `id`. Swallowed if it is the click that follows
    /// a drag or resize release.
    pub fn click_box(&mut self, id: &BoxId) -> Vec<Action> {
        if self.click_gate.take() {
            debug!(id = %id, "click after gesture suppressed");
            return Vec::new();
        }
        self.toggle_mark(id)
    }

    /// Enter or leave box edit mode. Prize viewport gestures are off while
    /// editing so handle drags are not taken as pans.
    pub fn set_box_edit_mode(&mut self, on: bool) -> Vec<Action> {
        if self.box_edit == on {
            return Vec::new();
        }
        self.box_edit = on;
        self.prize_view.set_toggles(GestureToggles::all(!on));
        if !on {
            self.gesture = GestureState::Idle;
        }
        self.rearm_banner();
        vec![Action::RenderNeeded]
    }

    // --- Box gestures ---

    /// Start of any pointer-down cycle. Clears a click gate left armed by a
    /// gesture whose release did not produce a click.
    pub fn pointer_down(&mut self) {
        self.click_gate.clear();
    }

    /// Drag handle pressed on box `id`.
    pub fn begin_box_drag(&mut self, id: &BoxId) -> Vec<Action> {
        if !self.can_begin_gesture(id) {
            return Vec::new();
        }
        self.click_gate.clear();
        self.gesture = GestureState::Dragging { id: *id };
        debug!(id = %id, "drag started");
        vec![Action::RenderNeeded]
    }

    /// Corner handle pressed on box `id` with the pointer at `pointer` (client px).
    pub fn begin_box_resize(&mut self, id: &BoxId, corner: Corner, pointer: Point) -> Vec<Action> {
        if !self.can_begin_gesture(id) {
            return Vec::new();
        }
        let Some(target) = self.boxes.get(id) else {
            return Vec::new();
        };
        self.gesture = GestureState::resizing(target, corner, pointer);
        self.click_gate.clear();
        debug!(id = %id, ?corner, "resize started");
        vec![Action::RenderNeeded]
    }

    /// Pointer moved anywhere in the document. `rect` is the live bounding
    /// rectangle of the prize container.
    pub fn pointer_move(&mut self, pointer: Point, rect: SurfaceRect) -> Vec<Action> {
        let Some(id) = self.gesture.target() else {
            return Vec::new();
        };
        let Some(patch) = self.gesture.on_pointer_move(pointer, rect) else {
            warn!(width = rect.width, height = rect.height, "container not laid out; gesture move skipped");
            return Vec::new();
        };
        self.update_box(&id, patch)
    }

    /// Pointer released anywhere in the document. Ends any gesture and arms
    /// the click gate.
    pub fn pointer_up(&mut self) -> Vec<Action> {
        let Some(id) = self.gesture.target() else {
            return Vec::new();
        };
        self.gesture = GestureState::Idle;
        self.click_gate.arm();
        debug!(id = %id, "gesture ended");
        vec![Action::RenderNeeded]
    }

    fn can_begin_gesture(&self, id: &BoxId) -> bool {
        self.box_edit && !self.gesture.is_active() && self.boxes.contains(id)
    }

    // --- Viewports ---

    pub fn set_transform(&mut self, surface: Surface, scale: f64, offset_x: f64, offset_y: f64) -> Vec<Action> {
        let changed = self.viewport_mut(surface).set_transform(scale, offset_x, offset_y);
        viewport_changed(surface, changed)
    }

    /// Double click / double tap.
    pub fn reset_transform(&mut self, surface: Surface) -> Vec<Action> {
        let changed = self.viewport_mut(surface).reset_transform();
        viewport_changed(surface, changed)
    }

    pub fn pan(&mut self, surface: Surface, dx: f64, dy: f64) -> Vec<Action> {
        let changed = self.viewport_mut(surface).pan_by(dx, dy);
        viewport_changed(surface, changed)
    }

    pub fn wheel(&mut self, surface: Surface, delta_y: f64, anchor: Point) -> Vec<Action> {
        let changed = self.viewport_mut(surface).wheel(delta_y, anchor);
        viewport_changed(surface, changed)
    }

    pub fn pinch(&mut self, surface: Surface, ratio: f64, anchor: Point) -> Vec<Action> {
        let changed = self.viewport_mut(surface).pinch(ratio, anchor);
        viewport_changed(surface, changed)
    }

    fn viewport_mut(&mut self, surface: Surface) -> &mut Viewport {
        match surface {
            Surface::Prize => &mut self.prize_view,
            Surface::Gallery => &mut self.gallery_view,
        }
    }

    // --- Prize image ---

    /// Replace the prize image with a decoded data URL.
    pub fn set_prize_image(&mut self, data_url: String) -> Vec<Action> {
        self.prize_image = Some(data_url);
        vec![Action::Persist(SnapshotKey::PrizeImage), Action::RenderNeeded]
    }

    // --- Insurance gallery ---

    pub fn set_insurance_image(&mut self, slot: usize, data_url: String) -> Vec<Action> {
        if !self.gallery.set_image(slot, data_url) {
            warn!(slot, "insurance slot out of range");
            return Vec::new();
        }
        vec![Action::Persist(SnapshotKey::InsuranceImages), Action::RenderNeeded]
    }

    /// Clear an insurance slot. Its marks stay stored.
    pub fn remove_insurance_image(&mut self, slot: usize) -> Vec<Action> {
        if !self.gallery.remove_image(slot) {
            return Vec::new();
        }
        vec![Action::Persist(SnapshotKey::InsuranceImages), Action::RenderNeeded]
    }

    pub fn advance_gallery(&mut self, dir: Direction) -> Vec<Action> {
        if self.gallery.advance(dir) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// Click on the current insurance image. `image` is the live bounding
    /// rectangle of the image element.
    pub fn place_mark(&mut self, client: Point, image: SurfaceRect) -> Vec<Action> {
        if !image.is_laid_out() {
            warn!(width = image.width, height = image.height, "image not laid out; mark skipped");
            return Vec::new();
        }
        let Some(mark) = self.gallery.place_mark(client, image) else {
            return Vec::new();
        };
        let slot = self.gallery.current();
        debug!(slot, x = mark.x, y = mark.y, size = mark.size, "mark placed");
        vec![Action::MarkPlaced { slot, mark }, Action::Persist(SnapshotKey::InsuranceMarks), Action::RenderNeeded]
    }

    pub fn undo_last_mark(&mut self) -> Vec<Action> {
        if self.gallery.undo_last_mark().is_none() {
            return Vec::new();
        }
        let slot = self.gallery.current();
        vec![Action::MarkRemoved { slot }, Action::Persist(SnapshotKey::InsuranceMarks), Action::RenderNeeded]
    }

    pub fn set_mark_size(&mut self, n: u32) -> MarkSize {
        self.gallery.set_mark_size(n)
    }

    /// Enter or leave insurance edit mode. Returns the effective mode;
    /// leaving is refused while the gallery is empty.
    pub fn set_gallery_edit_mode(&mut self, on: bool) -> bool {
        self.gallery.set_edit_mode(on)
    }

    // --- Reset ---

    /// Open the reset confirmation.
    pub fn request_reset(&mut self) -> Vec<Action> {
        self.reset_pending = true;
        vec![Action::RenderNeeded]
    }

    pub fn cancel_reset(&mut self) -> Vec<Action> {
        self.reset_pending = false;
        vec![Action::RenderNeeded]
    }

    /// Wipe all tracked data and stored snapshots. Only acts after
    /// [`request_reset`](Self::request_reset).
    pub fn confirm_reset(&mut self) -> Vec<Action> {
        if !self.reset_pending {
            return Vec::new();
        }
        self.reset_pending = false;
        self.ledger = Ledger::new();
        self.boxes.clear();
        self.prize_image = None;
        self.prize_view.restore(Transform::default());
        self.gesture = GestureState::Idle;
        self.click_gate.clear();
        self.gallery.clear();
        self.rearm_banner();
        info!("tracker reset");
        vec![Action::ClearStorage, Action::RenderNeeded]
    }

    // --- Snapshots ---

    #[must_use]
    pub fn bag_snapshot(&self) -> BagSnapshot {
        BagSnapshot::capture(&self.ledger, self.boxes.as_slice())
    }

    // --- Internals ---

    fn ledger_changed(&mut self, changed: bool) -> Vec<Action> {
        if !changed {
            return Vec::new();
        }
        self.rearm_banner();
        vec![Action::Persist(SnapshotKey::Bags), Action::RenderNeeded]
    }

    fn boxes_changed(&mut self, action: Action) -> Vec<Action> {
        let unmarked = u32::try_from(self.boxes.unmarked_count()).unwrap_or(u32::MAX);
        self.ledger.set_remaining_chases(unmarked);
        self.rearm_banner();
        vec![action, Action::Persist(SnapshotKey::Bags), Action::RenderNeeded]
    }

    fn rearm_banner(&mut self) {
        let show = !self.bag_edit && !self.box_edit && self.buyout_profit() > 0.0;
        self.banner.rearm(show);
    }
}

fn viewport_changed(surface: Surface, changed: bool) -> Vec<Action> {
    match (changed, surface) {
        (false, _) => Vec::new(),
        (true, Surface::Prize) => vec![Action::Persist(SnapshotKey::PrizeViewport), Action::RenderNeeded],
        (true, Surface::Gallery) => vec![Action::RenderNeeded],
    }
}

/// The full tracker: a [`TrackerCore`] bound to a storage backend.
pub struct Tracker<S: Storage> {
    core: TrackerCore,
    store: S,
    config: TrackerConfig,
}

impl<S: Storage> Tracker<S> {
    /// Load every snapshot from `store` and hydrate a fresh core.
    pub fn open(store: S, config: TrackerConfig) -> Self {
        let loaded = LoadedState::load(&store, &config.keys);
        let mut core = TrackerCore::new();
        core.hydrate(loaded);
        Self { core, store, config }
    }

    #[must_use]
    pub fn core(&self) -> &TrackerCore {
        &self.core
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Run one core operation and write every snapshot it touched.
    ///
    /// Write failures are logged; the in-memory change stands either way.
    pub fn dispatch(&mut self, op: impl FnOnce(&mut TrackerCore) -> Vec<Action>) -> Vec<Action> {
        let actions = op(&mut self.core);
        self.flush(&actions);
        actions
    }

    fn flush(&mut self, actions: &[Action]) {
        let mut written: Vec<SnapshotKey> = Vec::new();
        for action in actions {
            match action {
                Action::Persist(key) if !written.contains(key) => {
                    written.push(*key);
                    if let Err(e) = self.write(*key) {
                        error!(key = ?key, code = e.error_code(), error = %e, "snapshot write failed");
                    }
                }
                Action::ClearStorage => {
                    if let Err(e) = persistence::clear_all(&mut self.store, &self.config.keys) {
                        error!(code = e.error_code(), error = %e, "clearing storage failed");
                    }
                }
                _ => {}
            }
        }
    }

    fn write(&mut self, key: SnapshotKey) -> Result<(), crate::error::StoreError> {
        let keys = &self.config.keys;
        let core = &self.core;
        match key {
            SnapshotKey::Bags => persistence::save_json(&mut self.store, keys, key, &core.bag_snapshot()),
            SnapshotKey::PrizeImage => match core.prize_image.as_deref() {
                Some(url) => persistence::save_raw(&mut self.store, keys, key, url),
                None => self.store.remove(keys.name(key)),
            },
            SnapshotKey::PrizeViewport => {
                persistence::save_json(&mut self.store, keys, key, &core.prize_view.transform())
            }
            SnapshotKey::InsuranceImages => persistence::save_json(&mut self.store, keys, key, core.gallery.images()),
            SnapshotKey::InsuranceMarks => {
                persistence::save_json(&mut self.store, keys, key, core.gallery.all_marks())
            }
        }
    }
}
