// Licensed under the Apache-2.0 license

//! Bus primitives: start/stop sequencing and single-bit transfer.
//!
//! Every delay here is a blocking busy wait and the clock-stretch wait spins
//! on SCL without yielding. Bit timing depends on it, so these calls never
//! suspend the caller cooperatively.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{BusConfig, Error, StretchLimit};
use crate::i2c::line::{Line, LineController, OpenDrainLine};
use embedded_hal::delay::DelayNs;

/// Bit-banged I2C master over two open-drain GPIO lines.
///
/// One value owns both lines and the `started` session flag, so independent
/// buses are independent values. Operations take `&mut self`; holding the
/// borrow for a whole start..stop bracket is what keeps transactions from
/// interleaving.
pub struct BitBangI2c<SCL, SDA, D, L: Logger = NoOpLogger> {
    pub(crate) lines: LineController<SCL, SDA>,
    pub(crate) delay: D,
    pub(crate) config: BusConfig,
    pub(crate) logger: L,
    started: bool,
    contention: bool,
    recovery_depth: u8,
}

impl<SCL, SDA, D, E> BitBangI2c<SCL, SDA, D, NoOpLogger>
where
    SCL: OpenDrainLine<Error = E>,
    SDA: OpenDrainLine<Error = E>,
    D: DelayNs,
{
    pub fn new(scl: SCL, sda: SDA, delay: D, config: BusConfig) -> Self {
        Self::with_logger(scl, sda, delay, config, NoOpLogger)
    }
}

impl<SCL, SDA, D, L, E> BitBangI2c<SCL, SDA, D, L>
where
    SCL: OpenDrainLine<Error = E>,
    SDA: OpenDrainLine<Error = E>,
    D: DelayNs,
    L: Logger,
{
    pub fn with_logger(scl: SCL, sda: SDA, delay: D, config: BusConfig, logger: L) -> Self {
        Self {
            lines: LineController::new(scl, sda),
            delay,
            config,
            logger,
            started: false,
            contention: false,
            recovery_depth: 0,
        }
    }

    /// Give back the pins and the delay provider.
    pub fn release(self) -> (SCL, SDA, D) {
        let (scl, sda) = self.lines.free();
        (scl, sda, self.delay)
    }

    #[must_use]
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Whether a start condition has been issued without a matching stop.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Release both lines and let the idle bus settle.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pin` if either line cannot be released.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.lines.release(Line::Clock).map_err(Error::Pin)?;
        self.lines.release(Line::Data).map_err(Error::Pin)?;
        self.delay.delay_us(self.config.timing.settle.ticks());
        self.logger.debug("bus released");
        Ok(())
    }

    /// Issue a start condition, or a repeated start if one is already open.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pin` on GPIO failure and `Error::ClockStretchTimeout`
    /// if a bounded stretch wait expires during the repeated start.
    pub fn start(&mut self) -> Result<(), Error<E>> {
        let timing = self.config.timing;
        if self.started {
            self.release_line(Line::Data)?;
            self.delay.delay_us(timing.edge.ticks());
            self.release_line(Line::Clock)?;
            self.wait_clock_high()?;
            self.delay.delay_us(timing.restart_hold.ticks());
        }

        if !self.read_line(Line::Data)? {
            self.arbitration_lost()?;
        }

        // SDA falls while SCL is high
        self.drive_low(Line::Data)?;
        self.delay.delay_us(timing.edge.ticks());
        self.drive_low(Line::Clock)?;
        self.started = true;
        Ok(())
    }

    /// Issue a stop condition.
    ///
    /// SCL is left released afterwards; pulling it low again here breaks
    /// communication with real devices.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pin` on GPIO failure and `Error::ClockStretchTimeout`
    /// if a bounded stretch wait expires.
    pub fn stop(&mut self) -> Result<(), Error<E>> {
        let timing = self.config.timing;
        self.drive_low(Line::Data)?;
        self.delay.delay_us(timing.edge.ticks());
        self.release_line(Line::Clock)?;
        self.wait_clock_high()?;
        self.delay.delay_us(timing.half_period.ticks());
        // SDA rises while SCL is high
        self.release_line(Line::Data)?;
        self.delay.delay_us(timing.edge.ticks());

        if !self.read_line(Line::Data)? {
            self.arbitration_lost()?;
        }

        self.started = false;
        Ok(())
    }

    /// Best-effort bus reset after contention: force a stop, then back off.
    ///
    /// A stop that itself observes contention re-enters here; nesting deeper
    /// than `recovery_limit` gives up on that level instead of recursing.
    fn arbitration_lost(&mut self) -> Result<(), Error<E>> {
        self.contention = true;
        if self.recovery_depth >= self.config.recovery_limit {
            self.logger
                .error("arbitration lost during recovery, giving up on forced stop");
            return Ok(());
        }
        self.logger.error("arbitration lost, forcing stop");

        self.recovery_depth += 1;
        let stopped = self.stop();
        self.recovery_depth -= 1;
        stopped?;

        self.delay
            .delay_ms(self.config.timing.recovery_backoff.ticks());
        Ok(())
    }

    /// Clock one bit out on SDA.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pin` on GPIO failure and `Error::ClockStretchTimeout`
    /// if a bounded stretch wait expires.
    pub fn write_bit(&mut self, bit: bool) -> Result<(), Error<E>> {
        let timing = self.config.timing;
        self.lines.set(Line::Data, bit).map_err(Error::Pin)?;
        self.delay.delay_us(timing.edge.ticks());
        self.release_line(Line::Clock)?;
        self.delay.delay_us(timing.half_period.ticks());
        self.wait_clock_high()?;

        // a released SDA that reads low is held by someone else
        if bit && !self.read_line(Line::Data)? {
            self.arbitration_lost()?;
        }

        self.drive_low(Line::Clock)
    }

    /// Clock one bit in from SDA.
    ///
    /// # Errors
    ///
    /// Returns `Error::Pin` on GPIO failure and `Error::ClockStretchTimeout`
    /// if a bounded stretch wait expires.
    pub fn read_bit(&mut self) -> Result<bool, Error<E>> {
        let timing = self.config.timing;
        self.release_line(Line::Data)?;
        self.delay.delay_us(timing.half_period.ticks());
        self.release_line(Line::Clock)?;
        self.wait_clock_high()?;
        self.delay.delay_us(timing.half_period.ticks());
        let bit = self.read_line(Line::Data)?;
        self.drive_low(Line::Clock)?;
        Ok(bit)
    }

    /// Spin until the slave releases SCL (clock stretching).
    fn wait_clock_high(&mut self) -> Result<(), Error<E>> {
        let mut low_polls: u32 = 0;
        while !self.read_line(Line::Clock)? {
            if let StretchLimit::Polls(limit) = self.config.clock_stretch {
                low_polls = low_polls.saturating_add(1);
                if low_polls >= limit {
                    self.logger
                        .error_fmt(format_args!("SCL held low for {low_polls} polls"));
                    return Err(Error::ClockStretchTimeout);
                }
            }
        }
        Ok(())
    }

    /// Forget contention seen so far; called when a transaction begins.
    pub(crate) fn clear_contention(&mut self) {
        self.contention = false;
    }

    /// Contention observed since the last [`Self::clear_contention`].
    pub(crate) fn contention(&self) -> bool {
        self.contention
    }

    fn release_line(&mut self, line: Line) -> Result<(), Error<E>> {
        self.lines.release(line).map_err(Error::Pin)
    }

    fn drive_low(&mut self, line: Line) -> Result<(), Error<E>> {
        self.lines.drive_low(line).map_err(Error::Pin)
    }

    fn read_line(&mut self, line: Line) -> Result<bool, Error<E>> {
        self.lines.read(line).map_err(Error::Pin)
    }
}
