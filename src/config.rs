//! Storage key configuration.
//!
//! Each snapshot lives under its own key so a corrupt document only resets
//! the concern it belongs to. The default names match documents written by
//! earlier releases of the tracker, so existing browser data keeps loading.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// One independently persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SnapshotKey {
    /// Bag ledger plus the box list.
    Bags,
    /// Prize image data URL, stored raw.
    PrizeImage,
    /// Prize image zoom/pan transform.
    PrizeViewport,
    /// Five nullable insurance image data URLs.
    InsuranceImages,
    /// Five insurance mark lists.
    InsuranceMarks,
}

impl SnapshotKey {
    /// Every key, in the order they are loaded.
    pub const ALL: [Self; 5] =
        [Self::Bags, Self::PrizeImage, Self::PrizeViewport, Self::InsuranceImages, Self::InsuranceMarks];
}

/// Key names used in the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub bags: String,
    pub prize_image: String,
    pub prize_viewport: String,
    pub insurance_images: String,
    pub insurance_marks: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            bags: "gachaBagState".into(),
            prize_image: "gachaBagImage".into(),
            prize_viewport: "gachaBagZoomState".into(),
            insurance_images: "insuranceImages".into(),
            insurance_marks: "insuranceMarks".into(),
        }
    }
}

impl StorageKeys {
    /// Default names, each prefixed with `prefix`. An empty prefix yields the defaults.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        let base = Self::default();
        if prefix.is_empty() {
            return base;
        }
        Self {
            bags: format!("{prefix}{}", base.bags),
            prize_image: format!("{prefix}{}", base.prize_image),
            prize_viewport: format!("{prefix}{}", base.prize_viewport),
            insurance_images: format!("{prefix}{}", base.insurance_images),
            insurance_marks: format!("{prefix}{}", base.insurance_marks),
        }
    }

    /// Store key for `key`.
    #[must_use]
    pub fn name(&self, key: SnapshotKey) -> &str {
        match key {
            SnapshotKey::Bags => &self.bags,
            SnapshotKey::PrizeImage => &self.prize_image,
            SnapshotKey::PrizeViewport => &self.prize_viewport,
            SnapshotKey::InsuranceImages => &self.insurance_images,
            SnapshotKey::InsuranceMarks => &self.insurance_marks,
        }
    }
}

/// Settings passed to [`crate::engine::Tracker::open`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerConfig {
    pub keys: StorageKeys,
}

impl TrackerConfig {
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self { keys: StorageKeys::with_prefix(prefix) }
    }
}
