//! Peripheral Drivers
//!
//! Drivers for the external RF chips on the board.

pub mod nrf24;
