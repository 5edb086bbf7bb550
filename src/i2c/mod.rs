// Licensed under the Apache-2.0 license

//! Bit-banged I2C master.
//!
//! Drives a standard-mode (100 kHz) I2C bus from two open-drain GPIO lines
//! and a blocking delay provider, for parts without a usable I2C peripheral.
//! Layers, lowest first: [`line`] (open-drain lines), [`bitbang`] (start,
//! stop and bit transfer), [`framing`] (bytes with acknowledgment) and
//! [`transaction`] (register reads and writes).

pub mod bitbang;
pub mod common;
pub mod framing;
pub mod line;
pub mod traits;
pub mod transaction;

pub use bitbang::BitBangI2c;
pub use common::{
    address_byte, Ack, BusConfig, BusConfigBuilder, BusTiming, Direction, Error, StretchLimit,
};
pub use line::{Line, LineController, OpenDrainLine};
pub use traits::{RegisterAddress, RegisterBus};
pub use transaction::READ_FAILED;
