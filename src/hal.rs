//! Hardware Abstraction Layer
//!
//! Board-level implementations of the [`crate::platform`] traits on the
//! STM32G474: shared SPI bus, supply ADC, GPIO, the serial command port and
//! the embassy time base.

pub mod adc;
pub mod gpio;
pub mod serial;
pub mod spi;
pub mod timer;
