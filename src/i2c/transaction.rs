// Licensed under the Apache-2.0 license

//! Register transactions built from framed bytes.
//!
//! Each call is one start..stop bracket:
//!
//! ```text
//! write: S [addr|W] A [reg..] A [data] A P
//! read:  S [addr|W] A [reg..] A Sr [addr|R] A [data] N P
//! ```
//!
//! The plain methods keep the classic firmware contract (`bool` for writes,
//! `0xFF` for a failed read) where every failure looks the same. The `try_`
//! methods report which step failed and whether contention was seen.

use crate::common::Logger;
use crate::i2c::bitbang::BitBangI2c;
use crate::i2c::common::{address_byte, Ack, Direction, Error};
use crate::i2c::line::OpenDrainLine;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::NoAcknowledgeSource;

/// Value returned by [`BitBangI2c::read`] when the read fails.
pub const READ_FAILED: u8 = 0xFF;

impl<SCL, SDA, D, L, E> BitBangI2c<SCL, SDA, D, L>
where
    SCL: OpenDrainLine<Error = E>,
    SDA: OpenDrainLine<Error = E>,
    D: DelayNs,
    L: Logger,
{
    /// Write `data` to an 8-bit addressed register. Returns `true` on success.
    pub fn write(&mut self, address: u8, register: u8, data: u8) -> bool {
        self.register_write(address, &[register], data).is_ok()
    }

    /// Read an 8-bit addressed register, or [`READ_FAILED`].
    pub fn read(&mut self, address: u8, register: u8) -> u8 {
        self.register_read(address, &[register])
            .unwrap_or(READ_FAILED)
    }

    /// Write `data` to a 16-bit addressed register. Returns `true` on success.
    pub fn write_16bit_addr(&mut self, address: u8, reg_high: u8, reg_low: u8, data: u8) -> bool {
        self.register_write(address, &[reg_high, reg_low], data)
            .is_ok()
    }

    /// Read a 16-bit addressed register, or [`READ_FAILED`].
    pub fn read_16bit_addr(&mut self, address: u8, reg_high: u8, reg_low: u8) -> u8 {
        self.register_read(address, &[reg_high, reg_low])
            .unwrap_or(READ_FAILED)
    }

    /// Like [`Self::write`], reporting why it failed.
    ///
    /// # Errors
    ///
    /// `NoAcknowledge(Address)` if the device did not answer its address,
    /// `NoAcknowledge(Data)` if it declined the register or data byte,
    /// `ArbitrationLoss` if contention was seen at any step, plus the pin and
    /// stretch-timeout errors of the bus primitives.
    pub fn try_write(&mut self, address: u8, register: u8, data: u8) -> Result<(), Error<E>> {
        let result = self.register_write(address, &[register], data);
        self.with_contention(result)
    }

    /// Like [`Self::read`], reporting why it failed.
    ///
    /// # Errors
    ///
    /// See [`Self::try_write`].
    pub fn try_read(&mut self, address: u8, register: u8) -> Result<u8, Error<E>> {
        let result = self.register_read(address, &[register]);
        self.with_contention(result)
    }

    /// Like [`Self::write_16bit_addr`], reporting why it failed.
    ///
    /// # Errors
    ///
    /// See [`Self::try_write`].
    pub fn try_write_16bit_addr(
        &mut self,
        address: u8,
        reg_high: u8,
        reg_low: u8,
        data: u8,
    ) -> Result<(), Error<E>> {
        let result = self.register_write(address, &[reg_high, reg_low], data);
        self.with_contention(result)
    }

    /// Like [`Self::read_16bit_addr`], reporting why it failed.
    ///
    /// # Errors
    ///
    /// See [`Self::try_write`].
    pub fn try_read_16bit_addr(
        &mut self,
        address: u8,
        reg_high: u8,
        reg_low: u8,
    ) -> Result<u8, Error<E>> {
        let result = self.register_read(address, &[reg_high, reg_low]);
        self.with_contention(result)
    }

    fn register_write(&mut self, address: u8, register: &[u8], data: u8) -> Result<(), Error<E>> {
        self.clear_contention();

        let ack = self.write_byte(true, false, address_byte(address, Direction::Write))?;
        self.expect_ack(ack, address, NoAcknowledgeSource::Address)?;

        for &byte in register {
            let ack = self.write_byte(false, false, byte)?;
            self.expect_ack(ack, address, NoAcknowledgeSource::Data)?;
        }

        let ack = self.write_byte(false, true, data)?;
        self.expect_ack(ack, address, NoAcknowledgeSource::Data)
    }

    fn register_read(&mut self, address: u8, register: &[u8]) -> Result<u8, Error<E>> {
        self.clear_contention();

        let ack = self.write_byte(true, false, address_byte(address, Direction::Write))?;
        self.expect_ack(ack, address, NoAcknowledgeSource::Address)?;

        for &byte in register {
            let ack = self.write_byte(false, false, byte)?;
            self.expect_ack(ack, address, NoAcknowledgeSource::Data)?;
        }

        // repeated start turns the bus around
        let ack = self.write_byte(true, false, address_byte(address, Direction::Read))?;
        self.expect_ack(ack, address, NoAcknowledgeSource::Address)?;

        self.read_byte(Ack::Nack, true)
    }

    /// Turn a NACK into an error, closing the bracket if configured to.
    fn expect_ack(&mut self, ack: Ack, address: u8, source: NoAcknowledgeSource) -> Result<(), Error<E>> {
        if ack.is_ack() {
            return Ok(());
        }

        self.logger.debug_fmt(format_args!(
            "device 0x{:02x}: {} not acknowledged",
            address,
            match source {
                NoAcknowledgeSource::Address => "address",
                _ => "data",
            }
        ));
        if self.config.stop_on_nack && self.is_started() {
            self.stop()?;
        }
        Err(Error::NoAcknowledge(source))
    }

    fn with_contention<T>(&mut self, result: Result<T, Error<E>>) -> Result<T, Error<E>> {
        if self.contention() {
            self.logger.error("transaction saw bus contention");
            return Err(Error::ArbitrationLoss);
        }
        result
    }
}
