// Licensed under the Apache-2.0 license

//! Byte framing: eight data bits MSB first followed by one acknowledgment bit.

use crate::common::Logger;
use crate::i2c::bitbang::BitBangI2c;
use crate::i2c::common::{Ack, Error};
use crate::i2c::line::OpenDrainLine;
use embedded_hal::delay::DelayNs;

impl<SCL, SDA, D, L, E> BitBangI2c<SCL, SDA, D, L>
where
    SCL: OpenDrainLine<Error = E>,
    SDA: OpenDrainLine<Error = E>,
    D: DelayNs,
    L: Logger,
{
    /// Send one byte and return the receiver's acknowledgment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pin` on GPIO failure and `Error::ClockStretchTimeout`
    /// if a bounded stretch wait expires. A NACK is not an error here.
    pub fn write_byte(&mut self, send_start: bool, send_stop: bool, byte: u8) -> Result<Ack, Error<E>> {
        if send_start {
            self.start()?;
        }

        let mut bits = byte;
        for _ in 0..8 {
            self.write_bit(bits & 0x80 != 0)?;
            bits <<= 1;
        }

        let ack = Ack::from_level(self.read_bit()?);

        if send_stop {
            self.stop()?;
        }
        Ok(ack)
    }

    /// Receive one byte and answer with `reply`.
    ///
    /// Send [`Ack::Nack`] after the last byte a master wants to read.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pin` on GPIO failure and `Error::ClockStretchTimeout`
    /// if a bounded stretch wait expires.
    pub fn read_byte(&mut self, reply: Ack, send_stop: bool) -> Result<u8, Error<E>> {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | u8::from(self.read_bit()?);
        }

        self.write_bit(reply.level())?;

        if send_stop {
            self.stop()?;
        }
        Ok(byte)
    }
}
