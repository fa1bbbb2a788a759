//! Multi-Radio Jammer Firmware Library
//!
//! Control core for an STM32G474 board driving three nRF24L01+ transceivers
//! on one shared SPI bus as a continuous-carrier source across the 2.4 GHz
//! Bluetooth channels.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Jammer State Machine  │  Serial Command Protocol            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     CONTROL CORE                             │
//! │  Lifecycle  │  Power Ramp  │  Channel Hop  │  Recovery       │
//! │  Power Supervisor                                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  SPI  │  ADC  │  GPIO  │  nRF24L01+                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Hardware behind traits**: the control core only sees [`platform`]
//! - **Bounded everything**: every retry loop has a cap, every delay a length
//! - **Failures are state**: per-radio problems are recorded, never fatal
//! - **Single owner**: one [`radio::jammer::Jammer`] owns session and bus
//! - **No unsafe in application code**

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Logging macros must be declared before the modules that use them
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// SPI bus sharing, supply ADC, GPIO and time base for the STM32G474.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral Drivers
///
/// Register-level driver for the nRF24L01+.
#[cfg(feature = "embedded")]
pub mod drivers;

/// Hardware seams used by the control core
pub mod platform;

/// Radio Control Logic
///
/// Session state, lifecycle, ramp, hop, recovery and the jammer state machine.
pub mod radio;

/// Power Supervision
///
/// Supply voltage classification and the advisory check.
pub mod power;

/// Communication Protocols
///
/// Serial command parser and response formatter.
pub mod protocol;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::platform::{CancelCheck, Clock, ControlBus, Transceiver, VoltageSensor};
    pub use crate::radio::jammer::{Jammer, JammerCommand};

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
