// Licensed under the Apache-2.0 license

//! Shared ambient pieces: the driver logging seam and an optional busy-wait delay.

use core::fmt::{self, Write as _};

/// Capacity of the scratch buffer used to render formatted log lines.
pub const LOG_LINE_CAPACITY: usize = 96;

/// Minimal logging sink used by the bus driver.
///
/// Drivers are generic over a `Logger` with [`NoOpLogger`] as the default, so
/// builds that never log pay nothing for it.
pub trait Logger {
    fn debug(&mut self, msg: &str);
    fn error(&mut self, msg: &str);

    /// Render `args` into a fixed-size buffer and log it at debug level.
    ///
    /// Lines longer than [`LOG_LINE_CAPACITY`] are truncated.
    fn debug_fmt(&mut self, args: fmt::Arguments<'_>) {
        let line = render(args);
        self.debug(line.as_str());
    }

    /// Render `args` into a fixed-size buffer and log it at error level.
    fn error_fmt(&mut self, args: fmt::Arguments<'_>) {
        let line = render(args);
        self.error(line.as_str());
    }
}

fn render(args: fmt::Arguments<'_>) -> heapless::String<LOG_LINE_CAPACITY> {
    let mut line = heapless::String::new();
    // A full buffer only truncates the message.
    let _ = line.write_fmt(args);
    line
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _msg: &str) {}
    fn error(&mut self, _msg: &str) {}
}

/// Logger writing tagged, CRLF-terminated lines to a serial console.
pub struct WriteLogger<W: embedded_io::Write> {
    sink: W,
}

impl<W: embedded_io::Write> WriteLogger<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn line(&mut self, tag: &[u8], msg: &str) {
        // Console failures must not disturb bus timing; drop the line instead.
        let _ = self
            .sink
            .write_all(tag)
            .and_then(|()| self.sink.write_all(msg.as_bytes()))
            .and_then(|()| self.sink.write_all(b"\r\n"));
    }
}

impl<W: embedded_io::Write> Logger for WriteLogger<W> {
    fn debug(&mut self, msg: &str) {
        self.line(b"[i2c] ", msg);
    }

    fn error(&mut self, msg: &str) {
        self.line(b"[i2c] error: ", msg);
    }
}

/// Busy-wait delay counting core clock cycles.
///
/// Never yields; suitable as the bus timing provider on Cortex-M parts.
#[cfg(feature = "cortex-m")]
#[derive(Clone, Copy, Debug)]
pub struct CycleDelay {
    cycles_per_us: u32,
}

#[cfg(feature = "cortex-m")]
impl CycleDelay {
    #[must_use]
    pub fn new(core_clock_hz: u32) -> Self {
        Self {
            cycles_per_us: (core_clock_hz / 1_000_000).max(1),
        }
    }
}

#[cfg(feature = "cortex-m")]
impl embedded_hal::delay::DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = u64::from(ns) * u64::from(self.cycles_per_us) / 1_000;
        cortex_m::asm::delay(u32::try_from(cycles).unwrap_or(u32::MAX).max(1));
    }
}
