//! Overlay and annotation engine for the chase-bag tracker.
//!
//! This crate owns the interactive state behind the tracker's three views:
//! the bag grid bookkeeping, the movable value boxes drawn over the prize
//! image, and the point marks placed on the five-slot insurance gallery. All
//! geometry is kept in container-relative percentages so it survives zoom,
//! resize, and orientation changes. The host UI layer is responsible only for
//! rendering and for wiring DOM events into [`engine::Tracker`]; every state
//! change that must survive a reload is written through the
//! [`persistence::Storage`] port before the call returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level tracker and testable [`engine::TrackerCore`] |
//! | [`boxes`] | Value boxes and the ordered box store |
//! | [`gesture`] | Drag/resize state machine, corner math, click gate |
//! | [`viewport`] | Zoom/pan transform with per-gesture toggles |
//! | [`geom`] | Percent/pixel conversions against a live bounding rect |
//! | [`marks`] | Point marks and glyph sizing |
//! | [`gallery`] | Five-slot insurance gallery with per-slot marks |
//! | [`ledger`] | Bag count, selection, cost, hit ratio, buyout profit |
//! | [`timers`] | Banner pulse and idle-controls timers |
//! | [`persistence`] | Storage port, stores, snapshot documents |
//! | [`config`] | Storage key names |
//! | [`error`] | Storage error type |
//! | [`consts`] | Shared numeric limits and defaults |
//! | `web` | Browser glue (feature `web`) |

pub mod boxes;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod gallery;
pub mod geom;
pub mod gesture;
pub mod ledger;
pub mod marks;
pub mod persistence;
pub mod timers;
pub mod viewport;
#[cfg(feature = "web")]
pub mod web;
