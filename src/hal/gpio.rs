//! GPIO Abstractions
//!
//! Status LED and the emergency stop button.

use embassy_stm32::gpio::{Input, Output};

use crate::platform::CancelCheck;
use crate::types::Activity;

/// Status LED driver
///
/// Solid while transmitting, blinking while paused, off when inactive.
pub struct StatusLed<'d> {
    pin: Output<'d>,
    lit: bool,
}

impl<'d> StatusLed<'d> {
    /// Create a new status LED (initially off)
    #[must_use]
    pub fn new(mut pin: Output<'d>) -> Self {
        pin.set_low();
        Self { pin, lit: false }
    }

    fn set(&mut self, lit: bool) {
        if lit {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
        self.lit = lit;
    }

    /// Update for the given activity; call at a steady blink rate
    pub fn show(&mut self, activity: Activity) {
        match activity {
            Activity::Inactive => self.set(false),
            Activity::Active => self.set(true),
            Activity::Paused => self.set(!self.lit),
        }
    }
}

/// Emergency stop button (active low with pull-up)
///
/// Read raw as the bring-up cancel source, and debounced by the main loop
/// to issue a stop.
pub struct StopButton<'d> {
    pin: Input<'d>,
    pressed: bool,
    last_raw: bool,
    debounce_count: u8,
}

impl<'d> StopButton<'d> {
    /// Required consecutive reads for debounce
    const DEBOUNCE_THRESHOLD: u8 = 3;

    /// Create the button
    #[must_use]
    pub fn new(pin: Input<'d>) -> Self {
        Self {
            pin,
            pressed: false,
            last_raw: false,
            debounce_count: 0,
        }
    }

    /// Sample the pin (call periodically)
    /// Returns true on a debounced press edge
    pub fn update(&mut self) -> bool {
        let current = self.pin.is_low();

        if current == self.last_raw {
            if self.debounce_count < Self::DEBOUNCE_THRESHOLD {
                self.debounce_count += 1;
            }
        } else {
            self.debounce_count = 0;
            self.last_raw = current;
        }

        if self.debounce_count >= Self::DEBOUNCE_THRESHOLD && current != self.pressed {
            self.pressed = current;
            return current;
        }
        false
    }
}

impl CancelCheck for StopButton<'_> {
    fn cancel_requested(&mut self) -> bool {
        self.pin.is_low()
    }
}
