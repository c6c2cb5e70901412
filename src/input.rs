//! Front-Panel Input
//!
//! Turns raw encoder pulses, button levels and timer ticks into the discrete
//! events the front panel consumes. Everything here is hardware independent;
//! the `hal` layer samples the pins and feeds these types.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::config::{BUTTON_DEBOUNCE_MS, IDLE_TICKS_PER_SECOND, LONG_PRESS_MS, MAX_PRESS_MS};
use crate::types::{ButtonEvent, Rotation};

/// Counters shared between interrupt-level producers and the control loop
///
/// The encoder edge handler and the periodic tick only ever increment; the
/// control loop reads and decrements (rotation) or resets (idle time). Each
/// counter is a single saturating byte, so no lock is involved.
pub struct PulseCounters {
    left: AtomicU8,
    right: AtomicU8,
    ticks: AtomicU8,
    idle_seconds: AtomicU8,
}

impl PulseCounters {
    /// Create zeroed counters (usable in a `static`)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left: AtomicU8::new(0),
            right: AtomicU8::new(0),
            ticks: AtomicU8::new(0),
            idle_seconds: AtomicU8::new(0),
        }
    }

    /// Record one detent (producer side)
    pub fn record(&self, rotation: Rotation) {
        let counter = match rotation {
            Rotation::Left => &self.left,
            Rotation::Right => &self.right,
        };
        saturating_increment(counter);
    }

    /// Consume at most one buffered detent, left pulses first
    pub fn take_rotation(&self) -> Option<Rotation> {
        if saturating_decrement(&self.left) {
            Some(Rotation::Left)
        } else if saturating_decrement(&self.right) {
            Some(Rotation::Right)
        } else {
            None
        }
    }

    /// Drop every buffered detent
    pub fn clear_rotation(&self) {
        self.left.store(0, Ordering::Relaxed);
        self.right.store(0, Ordering::Relaxed);
    }

    /// Advance the idle clock by one tick (producer side)
    pub fn tick(&self) {
        let previous = self.ticks.fetch_add(1, Ordering::Relaxed);
        if previous.wrapping_add(1) >= IDLE_TICKS_PER_SECOND {
            self.ticks.store(0, Ordering::Relaxed);
            saturating_increment(&self.idle_seconds);
        }
    }

    /// Whole seconds since the idle clock was last restarted
    #[must_use]
    pub fn idle_seconds(&self) -> u8 {
        self.idle_seconds.load(Ordering::Relaxed)
    }

    /// Restart the idle clock
    pub fn restart_idle(&self) {
        self.ticks.store(0, Ordering::Relaxed);
        self.idle_seconds.store(0, Ordering::Relaxed);
    }
}

impl Default for PulseCounters {
    fn default() -> Self {
        Self::new()
    }
}

fn saturating_increment(counter: &AtomicU8) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1));
}

fn saturating_decrement(counter: &AtomicU8) -> bool {
    counter
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
        .is_ok()
}

/// Time-based debouncer for an active-low push button
///
/// The raw level has to stay unchanged for [`BUTTON_DEBOUNCE_MS`] before the
/// stable state follows it.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    stable: bool,
    last_raw: bool,
    changed_at_ms: u32,
}

impl Debouncer {
    /// Create a debouncer that starts released
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stable: false,
            last_raw: false,
            changed_at_ms: 0,
        }
    }

    /// Feed a raw sample (`pressed` already inverted from the pin level)
    ///
    /// Returns the new stable state when it changes.
    pub fn update(&mut self, pressed: bool, now_ms: u32) -> Option<bool> {
        if pressed != self.last_raw {
            self.last_raw = pressed;
            self.changed_at_ms = now_ms;
            return None;
        }

        if pressed != self.stable && now_ms.wrapping_sub(self.changed_at_ms) >= BUTTON_DEBOUNCE_MS {
            self.stable = pressed;
            return Some(pressed);
        }

        None
    }

    /// Feed a raw sample and report only the press edge
    pub fn pressed_edge(&mut self, pressed: bool, now_ms: u32) -> bool {
        self.update(pressed, now_ms) == Some(true)
    }

    /// Current debounced state
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.stable
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies encoder-button presses by how long they were held
///
/// Events are reported on release. A press held past [`MAX_PRESS_MS`] is
/// treated as stuck and produces nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct PressClassifier {
    debouncer: Debouncer,
    press_start_ms: Option<u32>,
}

impl PressClassifier {
    /// Create a classifier with the button released
    #[must_use]
    pub const fn new() -> Self {
        Self {
            debouncer: Debouncer::new(),
            press_start_ms: None,
        }
    }

    /// Feed a raw sample and return the event completed by it, if any
    pub fn update(&mut self, pressed: bool, now_ms: u32) -> ButtonEvent {
        match self.debouncer.update(pressed, now_ms) {
            Some(true) => {
                self.press_start_ms = Some(now_ms);
                ButtonEvent::Idle
            }
            Some(false) => match self.press_start_ms.take() {
                Some(start) => classify(now_ms.wrapping_sub(start)),
                None => ButtonEvent::Idle,
            },
            None => ButtonEvent::Idle,
        }
    }

    /// Check if the button is currently held
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.debouncer.is_pressed()
    }
}

/// Map a hold duration to a button event
#[must_use]
pub const fn classify(held_ms: u32) -> ButtonEvent {
    if held_ms < LONG_PRESS_MS {
        ButtonEvent::ShortPress
    } else if held_ms < MAX_PRESS_MS {
        ButtonEvent::LongPress
    } else {
        ButtonEvent::Idle
    }
}
