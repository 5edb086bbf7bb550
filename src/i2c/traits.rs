// Licensed under the Apache-2.0 license

//! # Register bus abstraction
//!
//! Device helpers talk to a [`RegisterBus`] instead of a concrete driver, so
//! they work over the bit-banged master as well as over any other transport
//! that can do single-byte register transfers.
//!
//! ```text
//! RegisterBus
//!     └── BitBangI2c (open-drain GPIO + DelayNs)
//! ```

use crate::common::Logger;
use crate::i2c::bitbang::BitBangI2c;
use crate::i2c::common::Error;
use crate::i2c::line::OpenDrainLine;
use embedded_hal::delay::DelayNs;

/// Register address width used by a device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegisterAddress {
    /// One address byte (RTCs, sensors).
    Byte(u8),
    /// Two address bytes sent high byte first (larger EEPROMs).
    Word(u16),
}

/// Single-byte register access on an addressed device.
///
/// `address` is the 7-bit device address pre-shifted into bits 7..1.
///
/// # Examples
///
/// ```rust,ignore
/// use bitbang_i2c::i2c::{RegisterAddress, RegisterBus};
///
/// fn bump<B: RegisterBus>(bus: &mut B) -> Result<u8, B::Error> {
///     let value = bus.read_register(0xD0, RegisterAddress::Byte(0x08))?;
///     bus.write_register(0xD0, RegisterAddress::Byte(0x08), value.wrapping_add(1))?;
///     Ok(value)
/// }
/// ```
pub trait RegisterBus {
    type Error: embedded_hal::i2c::Error;

    /// Write one byte to `register`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device does not acknowledge or the bus fails.
    fn write_register(&mut self, address: u8, register: RegisterAddress, data: u8) -> Result<(), Self::Error>;

    /// Read one byte from `register`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device does not acknowledge or the bus fails.
    fn read_register(&mut self, address: u8, register: RegisterAddress) -> Result<u8, Self::Error>;
}

impl<SCL, SDA, D, L, E> RegisterBus for BitBangI2c<SCL, SDA, D, L>
where
    SCL: OpenDrainLine<Error = E>,
    SDA: OpenDrainLine<Error = E>,
    D: DelayNs,
    L: Logger,
    E: core::fmt::Debug,
{
    type Error = Error<E>;

    fn write_register(&mut self, address: u8, register: RegisterAddress, data: u8) -> Result<(), Self::Error> {
        match register {
            RegisterAddress::Byte(register) => self.try_write(address, register, data),
            RegisterAddress::Word(register) => {
                let [high, low] = register.to_be_bytes();
                self.try_write_16bit_addr(address, high, low, data)
            }
        }
    }

    fn read_register(&mut self, address: u8, register: RegisterAddress) -> Result<u8, Self::Error> {
        match register {
            RegisterAddress::Byte(register) => self.try_read(address, register),
            RegisterAddress::Word(register) => {
                let [high, low] = register.to_be_bytes();
                self.try_read_16bit_addr(address, high, low)
            }
        }
    }
}
