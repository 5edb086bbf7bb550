// Licensed under the Apache-2.0 license

//! Open-drain line control for SCL and SDA.
//!
//! Lines are never driven high. Releasing a line lets the external pull-up
//! raise it, so any party on the bus can hold it low (wired-AND).

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Clock,
    Data,
}

/// A single open-drain bus line.
pub trait OpenDrainLine: ErrorType {
    /// Stop driving the line; the pull-up raises it unless someone holds it low.
    fn release(&mut self) -> Result<(), Self::Error>;
    fn drive_low(&mut self) -> Result<(), Self::Error>;
    /// Sample the resolved line level.
    fn is_high(&mut self) -> Result<bool, Self::Error>;
}

/// Any pin configured as open-drain output with input buffer enabled:
/// writing high releases it and reading returns the wire level.
impl<P: OutputPin + InputPin> OpenDrainLine for P {
    fn release(&mut self) -> Result<(), Self::Error> {
        self.set_high()
    }

    fn drive_low(&mut self) -> Result<(), Self::Error> {
        self.set_low()
    }

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        InputPin::is_high(self)
    }
}

pub struct LineController<SCL, SDA> {
    scl: SCL,
    sda: SDA,
}

impl<SCL, SDA, E> LineController<SCL, SDA>
where
    SCL: OpenDrainLine<Error = E>,
    SDA: OpenDrainLine<Error = E>,
{
    pub fn new(scl: SCL, sda: SDA) -> Self {
        Self { scl, sda }
    }

    pub fn release(&mut self, line: Line) -> Result<(), E> {
        match line {
            Line::Clock => self.scl.release(),
            Line::Data => self.sda.release(),
        }
    }

    pub fn drive_low(&mut self, line: Line) -> Result<(), E> {
        match line {
            Line::Clock => self.scl.drive_low(),
            Line::Data => self.sda.drive_low(),
        }
    }

    /// Release `line` and sample it.
    pub fn read(&mut self, line: Line) -> Result<bool, E> {
        self.release(line)?;
        match line {
            Line::Clock => self.scl.is_high(),
            Line::Data => self.sda.is_high(),
        }
    }

    /// Drive the line to `level`: low drives, high releases.
    pub fn set(&mut self, line: Line, level: bool) -> Result<(), E> {
        if level {
            self.release(line)
        } else {
            self.drive_low(line)
        }
    }

    pub fn free(self) -> (SCL, SDA) {
        (self.scl, self.sda)
    }
}
