//! Paced, write-only serial transport for ETE frames.
//!
//! The ETE controller never acknowledges commands, so the only flow control is
//! a fixed delay before every write. A transport opened without a port runs in
//! dry-run mode: frames are logged and nothing is written or delayed.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use ete_gimbal::ete::{
//!     encode, AddressTable, Channel, CommandSink, SerialSettings, SerialTransport,
//! };
//!
//! let mut transport = SerialTransport::open(
//!     &SerialSettings::new("/dev/ttyUSB1"),
//!     Duration::from_millis(100),
//! )?;
//! let frame = encode(&AddressTable::standard(), Channel::Run, None)?;
//! transport.send(&frame)?;
//! # Ok::<(), ete_gimbal::ete::EteError>(())
//! ```

use std::io::Write;
use std::time::Duration;

use tracing::{debug, info};

use super::config::SerialSettings;
use super::error::EteResult;
use super::frame::Frame;

/// Destination for encoded frames.
///
/// Abstracts the serial line so controllers can be exercised without hardware.
pub trait CommandSink {
    /// Deliver one frame. Blocks until the frame is written.
    fn send(&mut self, frame: &Frame) -> EteResult<()>;
}

/// Serial line (or dry-run sink) with per-command pacing.
///
/// The line is exclusively owned; callers needing shared access must
/// serialize commands themselves.
pub struct SerialTransport {
    line: Option<Box<dyn Write + Send>>,
    delay: Duration,
}

impl SerialTransport {
    /// Open the serial port described by `settings`.
    pub fn open(settings: &SerialSettings, delay: Duration) -> EteResult<Self> {
        let port = serialport::new(&settings.path, settings.baud_rate)
            .data_bits(settings.data_bits)
            .parity(settings.parity)
            .stop_bits(settings.stop_bits)
            .timeout(settings.read_timeout)
            .open()?;

        debug!(
            "Opened {} at {} baud ({:?}, {:?}, {:?})",
            settings.path,
            settings.baud_rate,
            settings.data_bits,
            settings.parity,
            settings.stop_bits
        );

        Ok(Self::from_writer(port, delay))
    }

    /// Transport that logs frames without sending them.
    ///
    /// `delay` is reported by [`delay`](Self::delay) but never slept.
    pub fn dry_run(delay: Duration) -> Self {
        Self { line: None, delay }
    }

    /// Transport writing to an arbitrary byte sink (a pipe, a socket, a buffer).
    pub fn from_writer(writer: impl Write + Send + 'static, delay: Duration) -> Self {
        Self {
            line: Some(Box::new(writer)),
            delay,
        }
    }

    /// True when no line is attached.
    pub fn is_dry_run(&self) -> bool {
        self.line.is_none()
    }

    /// Delay applied before each write.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl CommandSink for SerialTransport {
    fn send(&mut self, frame: &Frame) -> EteResult<()> {
        let Some(line) = self.line.as_mut() else {
            info!("Would send: {frame}");
            return Ok(());
        };

        info!("Sending: {frame}");
        std::thread::sleep(self.delay);
        line.write_all(frame.as_bytes())?;
        line.flush()?;
        Ok(())
    }
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn send(&mut self, frame: &Frame) -> EteResult<()> {
        (**self).send(frame)
    }
}
