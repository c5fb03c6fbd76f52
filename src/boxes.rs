//! Box model: the value boxes laid over the prize image and their ordered store.
//!
//! A [`ChaseBox`] is an immutable value record. Edits go through
//! [`ChaseBox::merged`], which applies a sparse [`BoxPatch`] and returns a new
//! record; [`BoxStore`] swaps the new record in by id. Creation order is
//! preserved because it decides which box "delete last" removes.
//!
//! Position is stored in percent of the prize container so it survives zoom
//! and resize. Size is stored in raw pixels on purpose: boxes keep the same
//! on-screen footprint at every zoom level.

#[cfg(test)]
#[path = "boxes_test.rs"]
mod boxes_test;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::consts::{DEFAULT_BOX_HEIGHT, DEFAULT_BOX_WIDTH, DEFAULT_BOX_X, DEFAULT_BOX_Y};
use crate::geom::Point;

/// Unique identifier for a box.
pub type BoxId = Uuid;

/// Width and height of a box in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A value box as held in memory and in the bag snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaseBox {
    /// Stable identifier, assigned at creation.
    #[serde(deserialize_with = "deserialize_box_id")]
    pub id: BoxId,
    /// Left edge in percent of the container width.
    pub x: f64,
    /// Top edge in percent of the container height.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Chase amount as typed by the user; may be empty.
    #[serde(default)]
    pub value: String,
    /// The slot has been pulled.
    #[serde(default)]
    pub is_marked: bool,
    /// Protected from "delete last".
    #[serde(default)]
    pub is_locked: bool,
}

impl ChaseBox {
    /// A new box at the default position and size: unmarked, unlocked, no value.
    #[must_use]
    pub fn new(id: BoxId) -> Self {
        Self {
            id,
            x: DEFAULT_BOX_X,
            y: DEFAULT_BOX_Y,
            width: DEFAULT_BOX_WIDTH,
            height: DEFAULT_BOX_HEIGHT,
            value: String::new(),
            is_marked: false,
            is_locked: false,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Numeric value of the box, or `None` when empty or not a number.
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        let trimmed = self.value.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().into_iter().find(|v| v.is_finite())
    }

    /// Return a copy with every present field of `patch` applied.
    #[must_use]
    pub fn merged(&self, patch: &BoxPatch) -> Self {
        Self {
            id: self.id,
            x: patch.x.unwrap_or(self.x),
            y: patch.y.unwrap_or(self.y),
            width: patch.width.unwrap_or(self.width),
            height: patch.height.unwrap_or(self.height),
            value: patch.value.clone().unwrap_or_else(|| self.value.clone()),
            is_marked: patch.is_marked.unwrap_or(self.is_marked),
            is_locked: patch.is_locked.unwrap_or(self.is_locked),
        }
    }
}

/// Box ids as stored: a UUID string, or the millisecond timestamp used by
/// older snapshots (mapped into the UUID space unchanged).
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredId {
    Uuid(Uuid),
    Legacy(u64),
}

fn deserialize_box_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BoxId, D::Error> {
    Ok(match StoredId::deserialize(deserializer)? {
        StoredId::Uuid(id) => id,
        StoredId::Legacy(n) => Uuid::from_u128(u128::from(n)),
    })
}

/// Sparse update for a box. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_marked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

impl BoxPatch {
    /// Whether the patch carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Ordered collection of boxes, oldest first.
#[derive(Debug, Clone, Default)]
pub struct BoxStore {
    boxes: Vec<ChaseBox>,
}

impl BoxStore {
    #[must_use]
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Append a default box under an id no live box uses. Returns the new box.
    pub fn add_box(&mut self) -> ChaseBox {
        let created = ChaseBox::new(self.fresh_id());
        self.boxes.push(created.clone());
        created
    }

    /// Remove the newest box that is not locked.
    ///
    /// Returns the removed box, or `None` when every box is locked or the
    /// store is empty.
    pub fn delete_last_unlocked(&mut self) -> Option<ChaseBox> {
        let index = self.boxes.iter().rposition(|b| !b.is_locked)?;
        Some(self.boxes.remove(index))
    }

    /// Merge `patch` into the box with `id`. Returns the updated box, or `None` if absent.
    pub fn update(&mut self, id: &BoxId, patch: &BoxPatch) -> Option<&ChaseBox> {
        let slot = self.boxes.iter_mut().find(|b| b.id == *id)?;
        *slot = slot.merged(patch);
        Some(slot)
    }

    /// Flip the lock flag of `id`.
    pub fn toggle_lock(&mut self, id: &BoxId) -> Option<&ChaseBox> {
        let locked = self.get(id)?.is_locked;
        self.update(id, &BoxPatch { is_locked: Some(!locked), ..BoxPatch::default() })
    }

    /// Flip the mark flag of `id`.
    pub fn toggle_mark(&mut self, id: &BoxId) -> Option<&ChaseBox> {
        let marked = self.get(id)?.is_marked;
        self.update(id, &BoxPatch { is_marked: Some(!marked), ..BoxPatch::default() })
    }

    /// Sum of numeric values over unmarked boxes. Empty and non-numeric values count as nothing.
    #[must_use]
    pub fn unmarked_total(&self) -> f64 {
        self.boxes
            .iter()
            .filter(|b| !b.is_marked)
            .filter_map(ChaseBox::numeric_value)
            .sum()
    }

    /// Number of boxes not yet marked.
    #[must_use]
    pub fn unmarked_count(&self) -> usize {
        self.boxes.iter().filter(|b| !b.is_marked).count()
    }

    /// Number of locked boxes.
    #[must_use]
    pub fn locked_count(&self) -> usize {
        self.boxes.iter().filter(|b| b.is_locked).count()
    }

    #[must_use]
    pub fn get(&self, id: &BoxId) -> Option<&ChaseBox> {
        self.boxes.iter().find(|b| b.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &BoxId) -> bool {
        self.get(id).is_some()
    }

    /// All boxes in creation order.
    #[must_use]
    pub fn as_slice(&self) -> &[ChaseBox] {
        &self.boxes
    }

    /// Replace all boxes with a snapshot. A box whose id repeats an earlier
    /// one keeps its data and gets a fresh id.
    pub fn load_snapshot(&mut self, boxes: Vec<ChaseBox>) {
        self.boxes.clear();
        for mut b in boxes {
            if self.contains(&b.id) {
                let stored = b.id;
                b.id = self.fresh_id();
                warn!(%stored, reassigned = %b.id, "duplicate box id in snapshot");
            }
            self.boxes.push(b);
        }
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    fn fresh_id(&self) -> BoxId {
        let mut id = Uuid::new_v4();
        while self.contains(&id) {
            id = Uuid::new_v4();
        }
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
