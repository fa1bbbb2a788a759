//! SPI Bus Abstractions
//!
//! One blocking SPI peripheral shared by the three transceivers. Each radio
//! owns its chip-select line and talks through a [`RadioSpi`] device; the
//! jammer resets the bus through [`SpiControl`].

use core::cell::RefCell;

use embassy_stm32::gpio::Output;
use embassy_stm32::mode::Blocking;
use embassy_stm32::spi::{Config, Error as SpiBusError, Spi};
use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};

use crate::platform::ControlBus;

/// Shared bus state
pub struct SharedSpi<'d> {
    spi: Spi<'d, Blocking>,
    config: Config,
    online: bool,
}

impl<'d> SharedSpi<'d> {
    /// Wrap an initialized SPI peripheral
    #[must_use]
    pub fn new(spi: Spi<'d, Blocking>, config: Config) -> Self {
        Self {
            spi,
            config,
            online: true,
        }
    }
}

/// SPI device error
#[derive(Debug)]
pub enum SpiError {
    /// Peripheral reported an error
    Bus(SpiBusError),
    /// Bus is torn down
    Offline,
    /// Bus already borrowed (re-entrant access)
    Busy,
}

impl embedded_hal::spi::Error for SpiError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Bus(SpiBusError::Overrun) => ErrorKind::Overrun,
            Self::Bus(SpiBusError::ModeFault) => ErrorKind::ModeFault,
            _ => ErrorKind::Other,
        }
    }
}

impl defmt::Format for SpiError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Bus(_) => defmt::write!(f, "SPI bus error"),
            Self::Offline => defmt::write!(f, "SPI offline"),
            Self::Busy => defmt::write!(f, "SPI busy"),
        }
    }
}

/// One radio's view of the shared bus
pub struct RadioSpi<'a, 'd> {
    bus: &'a RefCell<SharedSpi<'d>>,
    csn: Output<'d>,
}

impl<'a, 'd> RadioSpi<'a, 'd> {
    /// Create a device; chip select is driven high (deselected)
    pub fn new(bus: &'a RefCell<SharedSpi<'d>>, mut csn: Output<'d>) -> Self {
        csn.set_high();
        Self { bus, csn }
    }

    /// Drive chip select to its inactive level
    pub fn release(&mut self) {
        self.csn.set_high();
    }
}

impl ErrorType for RadioSpi<'_, '_> {
    type Error = SpiError;
}

impl SpiDevice for RadioSpi<'_, '_> {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), SpiError> {
        let mut shared = self.bus.try_borrow_mut().map_err(|_| SpiError::Busy)?;
        if !shared.online {
            return Err(SpiError::Offline);
        }

        self.csn.set_low();
        let result = operations.iter_mut().try_for_each(|op| match op {
            Operation::Read(buf) => shared.spi.blocking_read(buf),
            Operation::Write(buf) => shared.spi.blocking_write(buf),
            Operation::Transfer(read, write) => shared.spi.blocking_transfer(read, write),
            Operation::TransferInPlace(buf) => shared.spi.blocking_transfer_in_place(buf),
            Operation::DelayNs(ns) => {
                embassy_time::block_for(embassy_time::Duration::from_micros(
                    u64::from(*ns).div_ceil(1000),
                ));
                Ok(())
            }
        });
        self.csn.set_high();

        result.map_err(SpiError::Bus)
    }
}

/// Bus reset and board-level lines used by the jammer
pub struct SpiControl<'a, 'd> {
    bus: &'a RefCell<SharedSpi<'d>>,
    shared_peripheral_en: Output<'d>,
}

impl<'a, 'd> SpiControl<'a, 'd> {
    /// Create the controller; the shared peripheral is switched off
    pub fn new(bus: &'a RefCell<SharedSpi<'d>>, mut shared_peripheral_en: Output<'d>) -> Self {
        shared_peripheral_en.set_low();
        Self {
            bus,
            shared_peripheral_en,
        }
    }
}

impl ControlBus for SpiControl<'_, '_> {
    fn teardown(&mut self) {
        if let Ok(mut shared) = self.bus.try_borrow_mut() {
            shared.online = false;
        }
    }

    fn reinitialize(&mut self) {
        if let Ok(mut shared) = self.bus.try_borrow_mut() {
            let config = shared.config;
            if shared.spi.set_config(&config).is_err() {
                defmt::warn!("SPI reconfiguration rejected");
            }
            shared.online = true;
        }
    }

    fn power_down_shared_peripheral(&mut self) {
        if self.shared_peripheral_en.is_set_high() {
            defmt::info!("powering down shared RF peripheral");
        }
        self.shared_peripheral_en.set_low();
    }
}
