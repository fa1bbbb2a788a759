//! Radio Control Logic
//!
//! State machines and business logic for the three-transceiver jammer.
//! Everything here is hardware-agnostic and driven through the traits in
//! [`crate::platform`].

pub mod handle;
pub mod hop;
pub mod jammer;
pub mod lifecycle;
pub mod ramp;
pub mod recovery;
pub mod session;
