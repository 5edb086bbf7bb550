// Licensed under the Apache-2.0 license

//! Helpers for peripherals commonly hung off a bit-banged bus.

pub mod at24c32;
pub mod ds1307;

pub use at24c32::At24c32;
pub use ds1307::{Ds1307, Time};

use core::fmt::Debug;

/// Device helper error, wrapping the bus error type `E`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceError<E: Debug> {
    /// The register transfer failed.
    Bus(E),
    /// The requested offset lies outside the device.
    OutOfBounds,
    /// A register held a value that is not packed BCD.
    InvalidBcd,
    /// A value cannot be represented by the device.
    InvalidValue,
}

impl<E: Debug> From<E> for DeviceError<E> {
    fn from(err: E) -> Self {
        DeviceError::Bus(err)
    }
}
