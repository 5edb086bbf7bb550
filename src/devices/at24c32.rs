// Licensed under the Apache-2.0 license

//! AT24C32 serial EEPROM (4 KiB, two-byte memory addressing).

use crate::devices::DeviceError;
use crate::i2c::{RegisterAddress, RegisterBus};

/// Bus address with A2..A0 tied low, pre-shifted.
pub const AT24C32_ADDRESS: u8 = 0xA0;

pub const CAPACITY: usize = 4096;

pub struct At24c32<B> {
    bus: B,
    address: u8,
}

impl<B: RegisterBus> At24c32<B> {
    pub fn new(bus: B) -> Self {
        Self::with_address(bus, AT24C32_ADDRESS)
    }

    /// Use a part whose address pins are strapped high. `address` is pre-shifted.
    pub fn with_address(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    pub fn release(self) -> B {
        self.bus
    }

    /// Write one byte.
    ///
    /// The part ignores the bus for its internal write cycle (up to 10 ms);
    /// callers issuing back-to-back writes must wait in between.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if `offset >= CAPACITY`, `Bus` on transfer failure.
    pub fn write_byte(&mut self, offset: u16, data: u8) -> Result<(), DeviceError<B::Error>> {
        let register = Self::check(offset)?;
        Ok(self.bus.write_register(self.address, register, data)?)
    }

    /// # Errors
    ///
    /// `OutOfBounds` if `offset >= CAPACITY`, `Bus` on transfer failure.
    pub fn read_byte(&mut self, offset: u16) -> Result<u8, DeviceError<B::Error>> {
        let register = Self::check(offset)?;
        Ok(self.bus.read_register(self.address, register)?)
    }

    /// Fill `buf` starting at `offset`, one register read per byte.
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the range runs past the end of the array (nothing
    /// is read), `Bus` on transfer failure.
    pub fn read(&mut self, offset: u16, buf: &mut [u8]) -> Result<(), DeviceError<B::Error>> {
        let end = usize::from(offset) + buf.len();
        if end > CAPACITY {
            return Err(DeviceError::OutOfBounds);
        }
        for (offset, byte) in (offset..).zip(buf.iter_mut()) {
            *byte = self.read_byte(offset)?;
        }
        Ok(())
    }

    fn check(offset: u16) -> Result<RegisterAddress, DeviceError<B::Error>> {
        if usize::from(offset) >= CAPACITY {
            return Err(DeviceError::OutOfBounds);
        }
        Ok(RegisterAddress::Word(offset))
    }
}
