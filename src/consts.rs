//! Shared numeric constants for the tracker crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed viewport scale.
pub const MIN_SCALE: f64 = 0.5;

/// Largest allowed viewport scale.
pub const MAX_SCALE: f64 = 4.0;

/// Scale change applied per wheel notch.
pub const WHEEL_STEP: f64 = 0.1;

// ── Boxes ───────────────────────────────────────────────────────

/// Left edge of a freshly added box, in percent of the container width.
pub const DEFAULT_BOX_X: f64 = 50.0;

/// Top edge of a freshly added box, in percent of the container height.
pub const DEFAULT_BOX_Y: f64 = 50.0;

/// Width of a freshly added box, in pixels.
pub const DEFAULT_BOX_WIDTH: f64 = 100.0;

/// Height of a freshly added box, in pixels.
pub const DEFAULT_BOX_HEIGHT: f64 = 100.0;

/// Lower bound on box width and height during resize, in pixels.
pub const MIN_BOX_SIZE: f64 = 50.0;

// ── Marks / gallery ─────────────────────────────────────────────

/// Number of insurance image slots.
pub const GALLERY_SLOTS: usize = 5;

/// Smallest mark glyph size.
pub const MIN_MARK_SIZE: u32 = 12;

/// Largest mark glyph size.
pub const MAX_MARK_SIZE: u32 = 24;

/// Pixels per glyph size unit (the glyph is sized in root-em units).
pub const MARK_UNIT_PX: f64 = 16.0;

// ── Bags ────────────────────────────────────────────────────────

/// Bag count on first run and after reset.
pub const DEFAULT_BAG_COUNT: u32 = 50;

/// Remaining chases shown on first run and after reset.
pub const DEFAULT_REMAINING_CHASES: u32 = 8;

/// Fewest bags a game can have.
pub const MIN_BAG_COUNT: u32 = 1;

/// Most bags a game can have.
pub const MAX_BAG_COUNT: u32 = 100;

// ── Timers ──────────────────────────────────────────────────────

/// Period of the buyout banner blink, in milliseconds.
pub const BANNER_PULSE_MS: f64 = 2000.0;

/// Inactivity before transient controls hide, in milliseconds.
pub const CONTROLS_IDLE_MS: f64 = 2000.0;

/// Period of the browser ticker that drives both timers, in milliseconds.
pub const TICK_INTERVAL_MS: u32 = 250;
