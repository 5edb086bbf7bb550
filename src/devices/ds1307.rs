// Licensed under the Apache-2.0 license

//! DS1307 real-time clock.
//!
//! Timekeeping registers hold packed BCD. Bit 7 of the seconds register is
//! the clock-halt flag; bit 6 of the hours register selects 12-hour mode.
//! Registers 0x08..=0x3F are 56 bytes of battery-backed RAM.

use crate::bcd::{bcd_to_decimal, decimal_to_bcd, is_valid_bcd};
use crate::devices::DeviceError;
use crate::i2c::{RegisterAddress, RegisterBus};

/// Bus address, pre-shifted.
pub const DS1307_ADDRESS: u8 = 0x68 << 1;

pub mod reg {
    pub const SECONDS: u8 = 0x00;
    pub const MINUTES: u8 = 0x01;
    pub const HOURS: u8 = 0x02;
    pub const CONTROL: u8 = 0x07;
    pub const RAM_START: u8 = 0x08;
    pub const RAM_END: u8 = 0x3F;
}

const CLOCK_HALT: u8 = 0x80;
const MODE_12H: u8 = 0x40;
const PM: u8 = 0x20;

pub const RAM_SIZE: usize = (reg::RAM_END - reg::RAM_START + 1) as usize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Time {
    pub hours: u8,   // 0..=23
    pub minutes: u8, // 0..=59
    pub seconds: u8, // 0..=59
}

pub struct Ds1307<B> {
    bus: B,
    address: u8,
}

impl<B: RegisterBus> Ds1307<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            address: DS1307_ADDRESS,
        }
    }

    pub fn release(self) -> B {
        self.bus
    }

    /// Read the current time, converting 12-hour mode to 24-hour.
    ///
    /// # Errors
    ///
    /// `Bus` on transfer failure, `InvalidBcd` if a register is corrupt.
    pub fn time(&mut self) -> Result<Time, DeviceError<B::Error>> {
        let seconds = self.read(reg::SECONDS)? & !CLOCK_HALT;
        let minutes = self.read(reg::MINUTES)?;
        let hours = self.read(reg::HOURS)?;

        let hours = if hours & MODE_12H != 0 {
            let hour12 = Self::decode(hours & 0x1F)?;
            match (hour12 % 12, hours & PM != 0) {
                (h, false) => h,
                (h, true) => h + 12,
            }
        } else {
            Self::decode(hours & 0x3F)?
        };

        Ok(Time {
            hours,
            minutes: Self::decode(minutes)?,
            seconds: Self::decode(seconds)?,
        })
    }

    /// Set the time in 24-hour mode. Also clears clock halt, starting the oscillator.
    ///
    /// # Errors
    ///
    /// `InvalidValue` for an out-of-range field, `Bus` on transfer failure.
    pub fn set_time(&mut self, time: Time) -> Result<(), DeviceError<B::Error>> {
        if time.hours > 23 || time.minutes > 59 || time.seconds > 59 {
            return Err(DeviceError::InvalidValue);
        }
        self.write(reg::HOURS, Self::encode(time.hours)?)?;
        self.write(reg::MINUTES, Self::encode(time.minutes)?)?;
        self.write(reg::SECONDS, Self::encode(time.seconds)?)
    }

    /// Whether the oscillator is running (clock-halt bit clear).
    ///
    /// # Errors
    ///
    /// `Bus` on transfer failure.
    pub fn is_running(&mut self) -> Result<bool, DeviceError<B::Error>> {
        Ok(self.read(reg::SECONDS)? & CLOCK_HALT == 0)
    }

    /// # Errors
    ///
    /// `OutOfBounds` if `offset >= RAM_SIZE`, `Bus` on transfer failure.
    pub fn write_ram(&mut self, offset: usize, data: u8) -> Result<(), DeviceError<B::Error>> {
        let register = Self::ram_register(offset)?;
        self.write(register, data)
    }

    /// # Errors
    ///
    /// `OutOfBounds` if `offset >= RAM_SIZE`, `Bus` on transfer failure.
    pub fn read_ram(&mut self, offset: usize) -> Result<u8, DeviceError<B::Error>> {
        let register = Self::ram_register(offset)?;
        self.read(register)
    }

    fn read(&mut self, register: u8) -> Result<u8, DeviceError<B::Error>> {
        Ok(self
            .bus
            .read_register(self.address, RegisterAddress::Byte(register))?)
    }

    fn write(&mut self, register: u8, data: u8) -> Result<(), DeviceError<B::Error>> {
        Ok(self
            .bus
            .write_register(self.address, RegisterAddress::Byte(register), data)?)
    }

    fn ram_register(offset: usize) -> Result<u8, DeviceError<B::Error>> {
        if offset >= RAM_SIZE {
            return Err(DeviceError::OutOfBounds);
        }
        u8::try_from(offset)
            .map(|offset| reg::RAM_START + offset)
            .map_err(|_| DeviceError::OutOfBounds)
    }

    fn decode(bcd: u8) -> Result<u8, DeviceError<B::Error>> {
        if !is_valid_bcd(bcd) {
            return Err(DeviceError::InvalidBcd);
        }
        Ok(bcd_to_decimal(bcd))
    }

    fn encode(value: u8) -> Result<u8, DeviceError<B::Error>> {
        decimal_to_bcd(value).ok_or(DeviceError::InvalidValue)
    }
}
