//! `nRF24L01+` Transceiver Driver
//!
//! Minimal register-level driver covering what the jammer needs: bring-up,
//! connectivity probe, PA/channel/data-rate setup and the continuous-carrier
//! test mode.
//!
//! Every call is a handful of short SPI transactions; no call retries.

use embassy_stm32::gpio::Output;
use embassy_time::{block_for, Duration};
use embedded_hal::spi::SpiDevice;

use crate::hal::spi::{RadioSpi, SpiError};
use crate::platform::Transceiver;
use crate::types::{Channel, CrcLength, DataRate, PowerLevel};

/// `nRF24L01+` register addresses
mod reg {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;
}

/// SPI command opcodes
mod cmd {
    pub const R_REGISTER: u8 = 0x00;
    pub const W_REGISTER: u8 = 0x20;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
}

/// `CONFIG` bits
mod config_bits {
    pub const EN_CRC: u8 = 1 << 3;
    pub const CRCO: u8 = 1 << 2;
    pub const PWR_UP: u8 = 1 << 1;
    pub const PRIM_RX: u8 = 1 << 0;
}

/// `RF_SETUP` bits
mod rf_bits {
    pub const CONT_WAVE: u8 = 1 << 7;
    pub const RF_DR_LOW: u8 = 1 << 5;
    pub const PLL_LOCK: u8 = 1 << 4;
    pub const RF_DR_HIGH: u8 = 1 << 3;
    pub const RF_PWR_MASK: u8 = 0b0000_0110;
    pub const LNA_HCURR: u8 = 1 << 0;
}

/// Status register interrupt flags (write 1 to clear)
const STATUS_IRQ_MASK: u8 = 0x70;

/// Retransmit setting written by `begin` and read back to verify the link
const BEGIN_SETUP_RETR: u8 = (5 << 4) | 15;

/// Default channel after `begin`
const BEGIN_CHANNEL: u8 = 76;

/// Oscillator start-up after power-on reset
const POWER_ON_SETTLE: Duration = Duration::from_millis(5);

/// Standby-I to TX settling with the crystal running
const PWR_UP_SETTLE: Duration = Duration::from_micros(150);

/// Driver error
#[derive(Debug)]
pub enum Nrf24Error {
    /// SPI transaction failed
    Spi(SpiError),
    /// Register readback did not match after `begin`
    NotResponding,
}

impl From<SpiError> for Nrf24Error {
    fn from(e: SpiError) -> Self {
        Self::Spi(e)
    }
}

impl defmt::Format for Nrf24Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Spi(e) => defmt::write!(f, "{}", e),
            Self::NotResponding => defmt::write!(f, "not responding"),
        }
    }
}

/// Result alias for driver calls
pub type Nrf24Result<T> = Result<T, Nrf24Error>;

/// `nRF24L01+` on the shared SPI bus
pub struct Nrf24<'a, 'd> {
    spi: RadioSpi<'a, 'd>,
    ce: Output<'d>,
}

impl<'a, 'd> Nrf24<'a, 'd> {
    /// Create the driver; CE starts low
    pub fn new(spi: RadioSpi<'a, 'd>, mut ce: Output<'d>) -> Self {
        ce.set_low();
        Self { spi, ce }
    }

    fn read_reg(&mut self, reg: u8) -> Nrf24Result<u8> {
        let mut buf = [cmd::R_REGISTER | reg, 0];
        self.spi.transfer_in_place(&mut buf)?;
        Ok(buf[1])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Nrf24Result<()> {
        self.spi.write(&[cmd::W_REGISTER | reg, value])?;
        Ok(())
    }

    fn modify_reg(&mut self, reg: u8, clear: u8, set: u8) -> Nrf24Result<()> {
        let value = self.read_reg(reg)?;
        self.write_reg(reg, (value & !clear) | set)
    }

    fn command(&mut self, opcode: u8) -> Nrf24Result<()> {
        self.spi.write(&[opcode])?;
        Ok(())
    }

    fn power_up(&mut self) -> Nrf24Result<()> {
        let config = self.read_reg(reg::CONFIG)?;
        if config & config_bits::PWR_UP == 0 || config & config_bits::PRIM_RX != 0 {
            self.write_reg(
                reg::CONFIG,
                (config | config_bits::PWR_UP) & !config_bits::PRIM_RX,
            )?;
            block_for(PWR_UP_SETTLE);
        }
        Ok(())
    }
}

impl Transceiver for Nrf24<'_, '_> {
    type Error = Nrf24Error;

    fn begin(&mut self) -> Nrf24Result<()> {
        self.ce.set_low();
        self.spi.release();
        block_for(POWER_ON_SETTLE);

        self.write_reg(reg::SETUP_RETR, BEGIN_SETUP_RETR)?;
        self.set_data_rate(DataRate::Mbps1)?;
        self.write_reg(reg::FEATURE, 0)?;
        self.write_reg(reg::DYNPD, 0)?;
        self.write_reg(reg::EN_AA, 0x3F)?;
        self.write_reg(reg::EN_RXADDR, 0x03)?;
        self.write_reg(reg::RF_CH, BEGIN_CHANNEL)?;
        self.write_reg(reg::STATUS, STATUS_IRQ_MASK)?;
        self.command(cmd::FLUSH_RX)?;
        self.command(cmd::FLUSH_TX)?;
        self.write_reg(reg::CONFIG, config_bits::EN_CRC | config_bits::CRCO)?;
        self.power_up()?;

        if self.read_reg(reg::SETUP_RETR)? == BEGIN_SETUP_RETR {
            Ok(())
        } else {
            Err(Nrf24Error::NotResponding)
        }
    }

    fn is_connected(&mut self) -> bool {
        // SETUP_AW only ever holds 1..=3; a floating MISO reads 0x00 or 0xFF
        matches!(self.read_reg(reg::SETUP_AW), Ok(1..=3))
    }

    fn set_auto_ack(&mut self, enabled: bool) -> Nrf24Result<()> {
        self.write_reg(reg::EN_AA, if enabled { 0x3F } else { 0x00 })
    }

    fn set_retries(&mut self, delay: u8, count: u8) -> Nrf24Result<()> {
        self.write_reg(reg::SETUP_RETR, ((delay & 0x0F) << 4) | (count & 0x0F))
    }

    fn set_data_rate(&mut self, rate: DataRate) -> Nrf24Result<()> {
        let bits = match rate {
            DataRate::Kbps250 => rf_bits::RF_DR_LOW,
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => rf_bits::RF_DR_HIGH,
        };
        self.modify_reg(
            reg::RF_SETUP,
            rf_bits::RF_DR_LOW | rf_bits::RF_DR_HIGH,
            bits,
        )
    }

    fn set_crc_length(&mut self, crc: CrcLength) -> Nrf24Result<()> {
        let bits = match crc {
            CrcLength::Disabled => 0,
            CrcLength::Bits8 => config_bits::EN_CRC,
            CrcLength::Bits16 => config_bits::EN_CRC | config_bits::CRCO,
        };
        self.modify_reg(reg::CONFIG, config_bits::EN_CRC | config_bits::CRCO, bits)
    }

    fn set_power_level(&mut self, level: PowerLevel) -> Nrf24Result<()> {
        self.modify_reg(
            reg::RF_SETUP,
            rf_bits::RF_PWR_MASK,
            level.rf_pwr_bits() | rf_bits::LNA_HCURR,
        )
    }

    fn set_channel(&mut self, channel: Channel) -> Nrf24Result<()> {
        self.write_reg(reg::RF_CH, channel.number())
    }

    fn start_carrier(&mut self, level: PowerLevel, channel: Channel) -> Nrf24Result<()> {
        self.ce.set_low();
        self.power_up()?;
        self.modify_reg(
            reg::RF_SETUP,
            rf_bits::RF_PWR_MASK,
            rf_bits::CONT_WAVE | rf_bits::PLL_LOCK | level.rf_pwr_bits() | rf_bits::LNA_HCURR,
        )?;
        self.set_channel(channel)?;
        self.ce.set_high();
        Ok(())
    }

    fn stop_carrier(&mut self) -> Nrf24Result<()> {
        self.ce.set_low();
        self.modify_reg(reg::RF_SETUP, rf_bits::CONT_WAVE | rf_bits::PLL_LOCK, 0)
    }

    fn power_down(&mut self) -> Nrf24Result<()> {
        self.ce.set_low();
        self.modify_reg(reg::CONFIG, config_bits::PWR_UP, 0)
    }

    fn park_control_lines(&mut self) {
        self.ce.set_low();
        self.spi.release();
    }
}
