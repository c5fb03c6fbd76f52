//! Browser glue: `localStorage`, layout queries, file decoding, clock.
//!
//! Everything here is a thin adapter between `web_sys` and the native types
//! the engine consumes. No tracker logic lives in this module.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use js_sys::Promise;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, File, FileReader};

use crate::config::TrackerConfig;
use crate::consts::TICK_INTERVAL_MS;
use crate::engine::{Action, Tracker};
use crate::error::StoreError;
use crate::geom::SurfaceRect;
use crate::persistence::Storage;

/// Tracker backed by the page's `localStorage`.
pub type WebTracker = Tracker<BrowserStorage>;

/// Install the panic hook and route `tracing` events to the browser console.
///
/// # Errors
///
/// Fails if a logger is already installed.
pub fn init_logging() -> Result<(), log::SetLoggerError> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug)
}

/// Open a tracker over `localStorage` and hydrate it.
///
/// # Errors
///
/// Fails when there is no window or storage is disabled for the page.
pub fn open_tracker(config: TrackerConfig) -> Result<WebTracker, StoreError> {
    Ok(Tracker::open(BrowserStorage::open()?, config))
}

/// Wall-clock milliseconds, the time base for banner and idle timers.
#[must_use]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Drive the tracker's timers from the wall clock.
///
/// `on_render` runs whenever a tick changes what is on screen. The ticker
/// stops when the returned [`Interval`] is dropped. A tick that lands while
/// the tracker is borrowed elsewhere is skipped; the next one catches up.
#[must_use]
pub fn start_ticker(tracker: Rc<RefCell<WebTracker>>, mut on_render: impl FnMut() + 'static) -> Interval {
    Interval::new(TICK_INTERVAL_MS, move || {
        let Ok(mut tracker) = tracker.try_borrow_mut() else {
            return;
        };
        let actions = tracker.dispatch(|core| core.tick(now_ms()));
        drop(tracker);
        if actions.contains(&Action::RenderNeeded) {
            on_render();
        }
    })
}

/// Client-space rectangle of a rendered element.
#[must_use]
pub fn surface_rect(element: &Element) -> SurfaceRect {
    let rect = element.get_bounding_client_rect();
    SurfaceRect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

/// Decode an uploaded file into a `data:` URL.
///
/// # Errors
///
/// Fails when the browser refuses to read the file or the result is not a string.
pub async fn read_file_as_data_url(file: File) -> Result<String, StoreError> {
    let reader = FileReader::new().map_err(browser_error)?;
    let done = Promise::new(&mut |resolve, reject| {
        reader.set_onload(Some(&resolve));
        reader.set_onerror(Some(&reject));
    });
    reader.read_as_data_url(&file).map_err(browser_error)?;
    JsFuture::from(done).await.map_err(browser_error)?;

    let result = reader.result().map_err(browser_error)?;
    result
        .as_string()
        .ok_or_else(|| StoreError::Browser(format!("file {} did not decode to a data URL", file.name())))
}

// =============================================================================
// STORAGE
// =============================================================================

/// [`Storage`] over `window.localStorage`.
#[derive(Debug, Clone)]
pub struct BrowserStorage {
    inner: web_sys::Storage,
}

impl BrowserStorage {
    /// Attach to the current window's `localStorage`.
    ///
    /// # Errors
    ///
    /// Fails when there is no window or the page may not use storage.
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let inner = window
            .local_storage()
            .map_err(browser_error)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { inner })
    }
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get_item(key).map_err(browser_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set_item(key, value).map_err(browser_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.inner.remove_item(key).map_err(browser_error)
    }
}

fn browser_error(value: JsValue) -> StoreError {
    StoreError::Browser(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}
