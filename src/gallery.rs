//! Insurance gallery: five optional image slots, each with its own mark list.
//!
//! Slot indices are fixed. Removing an image leaves that slot's marks in
//! place; they become visible again if an image is uploaded to the slot.
//! Whenever at least one slot is populated, `current` points at a populated
//! slot.

#[cfg(test)]
#[path = "gallery_test.rs"]
mod gallery_test;

use crate::consts::GALLERY_SLOTS;
use crate::geom::{Point, SurfaceRect};
use crate::marks::{MarkSize, PointMark};

/// Image data URLs, one per slot.
pub type GalleryImages = [Option<String>; GALLERY_SLOTS];

/// Mark lists, one per slot.
pub type GalleryMarks = [Vec<PointMark>; GALLERY_SLOTS];

/// Navigation direction through the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    fn step(self) -> usize {
        match self {
            Self::Prev => GALLERY_SLOTS - 1,
            Self::Next => 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Gallery {
    images: GalleryImages,
    marks: GalleryMarks,
    current: usize,
    mark_size: MarkSize,
    edit_mode: bool,
}

impl Gallery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace images and marks with stored snapshots.
    ///
    /// The current slot moves to the first populated slot (slot 0 if none).
    pub fn hydrate(&mut self, images: GalleryImages, marks: GalleryMarks) {
        self.images = images;
        self.marks = marks;
        self.current = self.first_populated().unwrap_or(0);
    }

    // --- Queries ---

    #[must_use]
    pub fn images(&self) -> &GalleryImages {
        &self.images
    }

    #[must_use]
    pub fn all_marks(&self) -> &GalleryMarks {
        &self.marks
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_image(&self) -> Option<&str> {
        self.images[self.current].as_deref()
    }

    /// Marks on the current slot.
    #[must_use]
    pub fn current_marks(&self) -> &[PointMark] {
        &self.marks[self.current]
    }

    #[must_use]
    pub fn marks(&self, slot: usize) -> Option<&[PointMark]> {
        self.marks.get(slot).map(Vec::as_slice)
    }

    #[must_use]
    pub fn mark_size(&self) -> MarkSize {
        self.mark_size
    }

    #[must_use]
    pub fn populated_count(&self) -> usize {
        self.images.iter().filter(|img| img.is_some()).count()
    }

    #[must_use]
    pub fn has_images(&self) -> bool {
        self.populated_count() > 0
    }

    /// Whether prev/next navigation has anywhere to go.
    #[must_use]
    pub fn can_navigate(&self) -> bool {
        self.populated_count() > 1
    }

    /// Edit mode is forced on while no slot holds an image.
    #[must_use]
    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode || !self.has_images()
    }

    fn first_populated(&self) -> Option<usize> {
        self.images.iter().position(Option::is_some)
    }

    /// Next populated slot from `from` in `dir`, wrapping.
    ///
    /// Probes each slot once; returns `from` when none other is populated.
    #[must_use]
    pub fn next_valid(&self, from: usize, dir: Direction) -> usize {
        let mut index = from;
        for _ in 0..GALLERY_SLOTS {
            index = (index + dir.step()) % GALLERY_SLOTS;
            if self.images[index].is_some() {
                return index;
            }
        }
        from
    }

    // --- Mutations ---

    /// Move to the next populated slot in `dir`. Returns true if the slot changed.
    pub fn advance(&mut self, dir: Direction) -> bool {
        let next = self.next_valid(self.current, dir);
        let changed = next != self.current;
        self.current = next;
        changed
    }

    /// Store an image in `slot` and point `current` at the first populated slot.
    ///
    /// Returns false for an out-of-range slot.
    pub fn set_image(&mut self, slot: usize, data_url: String) -> bool {
        let Some(entry) = self.images.get_mut(slot) else {
            return false;
        };
        *entry = Some(data_url);
        if let Some(first) = self.first_populated() {
            self.current = first;
        }
        true
    }

    /// Clear the image in `slot`, keeping its marks.
    ///
    /// If `slot` was current, moves forward to the next populated slot.
    /// Returns false when the slot was already empty or out of range.
    pub fn remove_image(&mut self, slot: usize) -> bool {
        let Some(entry) = self.images.get_mut(slot) else {
            return false;
        };
        if entry.take().is_none() {
            return false;
        }
        if slot == self.current {
            self.current = self.next_valid(self.current, Direction::Next);
        }
        true
    }

    /// Place a mark on the current image for a click at `client`.
    ///
    /// Ignored in edit mode, on an empty slot, or while `image` has no area.
    pub fn place_mark(&mut self, client: Point, image: SurfaceRect) -> Option<PointMark> {
        if self.is_edit_mode() || self.current_image().is_none() {
            return None;
        }
        let mark = PointMark::at_click(client, image, self.mark_size)?;
        self.marks[self.current].push(mark);
        Some(mark)
    }

    /// Remove the newest mark on the current slot.
    pub fn undo_last_mark(&mut self) -> Option<PointMark> {
        self.marks[self.current].pop()
    }

    /// Set the glyph size for future marks; clamped.
    pub fn set_mark_size(&mut self, n: u32) -> MarkSize {
        self.mark_size = MarkSize::new(n);
        self.mark_size
    }

    /// Enter or leave edit mode. Leaving is refused while no slot is populated.
    ///
    /// Returns the effective edit mode afterwards.
    pub fn set_edit_mode(&mut self, on: bool) -> bool {
        if on || self.has_images() {
            self.edit_mode = on;
        }
        self.is_edit_mode()
    }

    pub fn toggle_edit_mode(&mut self) -> bool {
        self.set_edit_mode(!self.is_edit_mode())
    }

    /// Drop all images and marks and return to slot 0.
    pub fn clear(&mut self) {
        *self = Self { mark_size: self.mark_size, ..Self::default() };
    }
}
