//! Host-clocked timers: the buyout banner blink and the idle-controls hide.
//!
//! Neither timer owns a thread or a callback. The host passes a millisecond
//! timestamp into `tick` (from `requestAnimationFrame`, an interval, or a test)
//! and reads the resulting visibility. Re-arming replaces the schedule, so
//! there is never more than one pending deadline per timer.

#[cfg(test)]
#[path = "timers_test.rs"]
mod timers_test;

use crate::consts::{BANNER_PULSE_MS, CONTROLS_IDLE_MS};

/// Top-level screen of the tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// Numbered bag grid.
    #[default]
    Bags,
    /// Prize image with value boxes.
    Chases,
    /// Insurance gallery with point marks.
    Insurance,
}

impl View {
    /// Whether transient controls auto-hide in this view.
    #[must_use]
    pub fn hides_idle_controls(self) -> bool {
        matches!(self, Self::Chases | Self::Insurance)
    }
}

/// Buyout banner that blinks while a profit is available.
///
/// The blink period is anchored on the first `tick` after a re-arm.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BannerPulse {
    visible: bool,
    pending: bool,
    next_flip_at: Option<f64>,
}

impl BannerPulse {
    /// Restart the schedule. When `show` is true the banner appears now and
    /// flips every period from the next tick; otherwise it is hidden with
    /// nothing pending.
    pub fn rearm(&mut self, show: bool) {
        self.visible = show;
        self.pending = show;
        self.next_flip_at = None;
    }

    /// Advance to `now_ms`. Returns true if visibility changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.pending {
            self.pending = false;
            self.next_flip_at = Some(now_ms + BANNER_PULSE_MS);
            return false;
        }
        let Some(due) = self.next_flip_at else {
            return false;
        };
        if now_ms < due {
            return false;
        }
        let elapsed = now_ms - due;
        let periods = (elapsed / BANNER_PULSE_MS).floor();
        let before = self.visible;
        // One flip at `due`, then one per further full period.
        if periods % 2.0 == 0.0 {
            self.visible = !self.visible;
        }
        self.next_flip_at = Some(due + (periods + 1.0) * BANNER_PULSE_MS);
        before != self.visible
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the blink schedule is running or waiting for its first tick.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending || self.next_flip_at.is_some()
    }

    /// Re-armed but not yet anchored to a clock reading.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// When the next flip is due, once anchored.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.next_flip_at
    }
}

/// Transient on-screen controls that hide after inactivity.
#[derive(Debug, Clone, PartialEq)]
pub struct IdleControls {
    scoped: bool,
    visible: bool,
    hide_at: Option<f64>,
}

impl Default for IdleControls {
    fn default() -> Self {
        Self { scoped: false, visible: true, hide_at: None }
    }
}

impl IdleControls {
    /// Re-scope the timer for `view`. Controls show, and start counting down
    /// if the view auto-hides them.
    pub fn enter_view(&mut self, view: View, now_ms: f64) {
        self.scoped = view.hides_idle_controls();
        self.visible = true;
        self.hide_at = self.scoped.then_some(now_ms + CONTROLS_IDLE_MS);
    }

    /// Pointer or touch activity: show controls and restart the countdown.
    /// Returns true if the controls were hidden.
    pub fn on_activity(&mut self, now_ms: f64) -> bool {
        if !self.scoped {
            return false;
        }
        let was_hidden = !self.visible;
        self.visible = true;
        self.hide_at = Some(now_ms + CONTROLS_IDLE_MS);
        was_hidden
    }

    /// Advance to `now_ms`. Returns true if the controls just hid.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.hide_at {
            Some(due) if now_ms >= due => {
                self.hide_at = None;
                let was_visible = self.visible;
                self.visible = false;
                was_visible
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.scoped || self.visible
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.hide_at
    }
}
