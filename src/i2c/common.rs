// Licensed under the Apache-2.0 license

//! Common types and constants for the bit-banged I2C master.
//!
//! This module provides shared definitions for error handling, bus timing,
//! configuration and protocol utilities used across the driver layers.

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use fugit::{MicrosDurationU32, MillisDurationU32};

/// Direction bit OR-ed into bit 0 of the address byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Write = 0x00,
    Read = 0x01,
}

/// Combine a pre-shifted device address (bits 7..1) with a direction bit.
#[must_use]
pub const fn address_byte(address: u8, direction: Direction) -> u8 {
    (address & 0xFE) | direction as u8
}

/// Acknowledgment bit clocked after every byte. Low on the wire is `Ack`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ack {
    Ack,
    Nack,
}

impl Ack {
    #[must_use]
    pub const fn from_level(high: bool) -> Self {
        if high {
            Ack::Nack
        } else {
            Ack::Ack
        }
    }

    /// Line level that encodes this acknowledgment.
    #[must_use]
    pub const fn level(self) -> bool {
        matches!(self, Ack::Nack)
    }

    #[must_use]
    pub const fn is_ack(self) -> bool {
        matches!(self, Ack::Ack)
    }
}

/// Driver error, generic over the pin error type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// A GPIO operation on SCL or SDA failed.
    Pin(E),
    /// The addressed device did not acknowledge a frame.
    NoAcknowledge(NoAcknowledgeSource),
    /// Another party drove a line against us during the transaction.
    ArbitrationLoss,
    /// SCL stayed low longer than the configured [`StretchLimit`].
    ClockStretchTimeout,
}

impl<E: core::fmt::Debug> embedded_hal::i2c::Error for Error<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Pin(_) => ErrorKind::Other,
            Error::NoAcknowledge(source) => ErrorKind::NoAcknowledge(*source),
            Error::ArbitrationLoss => ErrorKind::ArbitrationLoss,
            Error::ClockStretchTimeout => ErrorKind::Bus,
        }
    }
}

/// Bound on the clock-stretching spin wait.
///
/// `Unbounded` matches the blocking behaviour a standard-mode slave expects:
/// a device that never releases SCL hangs the caller. `Polls(n)` gives up
/// after `n` low samples and reports [`Error::ClockStretchTimeout`], which
/// loosens the timing guarantee in exchange for liveness.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StretchLimit {
    Unbounded,
    Polls(u32),
}

/// Fixed delays of the standard-mode (100 kHz) bit sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BusTiming {
    /// Idle settle time after `init`.
    pub settle: MicrosDurationU32,
    /// Data setup/hold around a clock edge.
    pub edge: MicrosDurationU32,
    /// Clock high/low half period.
    pub half_period: MicrosDurationU32,
    /// Hold time before a repeated start.
    pub restart_hold: MicrosDurationU32,
    /// Backoff after forcing a stop on arbitration loss.
    pub recovery_backoff: MillisDurationU32,
}

impl BusTiming {
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            settle: MicrosDurationU32::from_ticks(10),
            edge: MicrosDurationU32::from_ticks(1),
            half_period: MicrosDurationU32::from_ticks(4),
            restart_hold: MicrosDurationU32::from_ticks(5),
            recovery_backoff: MillisDurationU32::from_ticks(1),
        }
    }
}

impl Default for BusTiming {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BusConfig {
    pub timing: BusTiming,
    /// Issue a stop condition when a NACK ends a transaction early.
    pub stop_on_nack: bool,
    pub clock_stretch: StretchLimit,
    /// Maximum nesting of arbitration-loss recovery.
    pub recovery_limit: u8,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfigBuilder::new().build()
    }
}

pub struct BusConfigBuilder {
    timing: Option<BusTiming>,
    stop_on_nack: bool,
    clock_stretch: StretchLimit,
    recovery_limit: u8,
}

impl Default for BusConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BusConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            timing: None,
            stop_on_nack: true,
            clock_stretch: StretchLimit::Unbounded,
            recovery_limit: 1,
        }
    }
    #[must_use]
    pub fn timing(mut self, timing: BusTiming) -> Self {
        self.timing = Some(timing);
        self
    }
    #[must_use]
    pub fn stop_on_nack(mut self, enabled: bool) -> Self {
        self.stop_on_nack = enabled;
        self
    }
    #[must_use]
    pub fn clock_stretch(mut self, limit: StretchLimit) -> Self {
        self.clock_stretch = limit;
        self
    }
    #[must_use]
    pub fn recovery_limit(mut self, limit: u8) -> Self {
        self.recovery_limit = limit;
        self
    }
    #[must_use]
    pub fn build(self) -> BusConfig {
        BusConfig {
            timing: self.timing.unwrap_or_default(),
            stop_on_nack: self.stop_on_nack,
            clock_stretch: self.clock_stretch,
            recovery_limit: self.recovery_limit,
        }
    }
}
