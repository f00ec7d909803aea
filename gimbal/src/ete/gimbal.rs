//! Roll/yaw gimbal controller.
//!
//! Converts angles in degrees to motor steps and sequences the ETE commands
//! for each operation. Control is open loop: nothing is read back, and the
//! only pacing is the transport's per-command delay.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use ete_gimbal::ete::{GimbalController, SerialTransport};
//!
//! // Dry run: frames are logged, nothing is written
//! let mut gimbal = GimbalController::new(SerialTransport::dry_run(Duration::ZERO));
//! gimbal.position(90.0, 45.0)?;
//! gimbal.yaw_speed(2000)?;
//! # Ok::<(), ete_gimbal::ete::EteError>(())
//! ```

use tracing::debug;

use super::config::{GimbalConfig, DEFAULT_ROLL_STEPS, DEFAULT_YAW_STEPS};
use super::error::{EteError, EteResult};
use super::frame::encode;
use super::protocol::{AddressTable, Channel};
use super::transport::{CommandSink, SerialTransport};

/// Screens the gimbal's status display can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestScreen {
    Wait,
    Pass,
    Fail,
    Work,
}

impl TestScreen {
    pub fn channel(self) -> Channel {
        match self {
            TestScreen::Wait => Channel::TestWait,
            TestScreen::Pass => Channel::TestPass,
            TestScreen::Fail => Channel::TestFail,
            TestScreen::Work => Channel::TestWork,
        }
    }
}

/// Driver for an ETE roll/yaw gimbal.
///
/// Every operation is a synchronous, fire-and-forget command sequence. There
/// is no rollback: if a send fails partway through [`position`](Self::position)
/// the commands already written stay applied.
pub struct GimbalController<S: CommandSink = SerialTransport> {
    sink: S,
    table: AddressTable,
    yaw_steps: u32,
    roll_steps: u32,
}

impl GimbalController<SerialTransport> {
    /// Build a controller from a session configuration, opening the serial
    /// port unless the configuration selects dry-run mode.
    pub fn from_config(config: &GimbalConfig) -> EteResult<Self> {
        let delay = config.delay()?;
        let transport = match config.serial_settings() {
            Some(settings) => SerialTransport::open(&settings, delay)?,
            None => SerialTransport::dry_run(delay),
        };
        Ok(Self::with_steps(
            transport,
            config.yaw_steps,
            config.roll_steps,
        ))
    }
}

impl<S: CommandSink> GimbalController<S> {
    /// Controller with the default step resolution (28800 yaw, 9600 roll).
    pub fn new(sink: S) -> Self {
        Self::with_steps(sink, DEFAULT_YAW_STEPS, DEFAULT_ROLL_STEPS)
    }

    /// Controller with explicit steps per revolution for each axis.
    pub fn with_steps(sink: S, yaw_steps: u32, roll_steps: u32) -> Self {
        Self {
            sink,
            table: AddressTable::standard(),
            yaw_steps,
            roll_steps,
        }
    }

    /// Convert degrees to motor steps, rounding toward negative infinity.
    ///
    /// NaN and infinite angles are rejected rather than saturated by the cast.
    pub fn degrees_to_steps(degrees: f64, steps_per_revolution: u32) -> EteResult<i64> {
        let steps = (degrees * f64::from(steps_per_revolution) / 360.0).floor();
        if !steps.is_finite() {
            return Err(EteError::NonFiniteAngle(degrees));
        }
        Ok(steps as i64)
    }

    /// Move to the given roll and yaw angles.
    ///
    /// Sends `roll_pos`, `yaw_pos` and `run`, in that order. Both position
    /// frames are encoded before the first send, so an out-of-range or
    /// non-finite angle fails without touching the line.
    pub fn position(&mut self, roll_deg: f64, yaw_deg: f64) -> EteResult<()> {
        let yaw = Self::degrees_to_steps(yaw_deg, self.yaw_steps)?;
        let roll = Self::degrees_to_steps(roll_deg, self.roll_steps)?;
        debug!("Position roll={roll_deg}° ({roll} steps), yaw={yaw_deg}° ({yaw} steps)");

        let frames = [
            encode(&self.table, Channel::RollPos, Some(roll))?,
            encode(&self.table, Channel::YawPos, Some(yaw))?,
            encode(&self.table, Channel::Run, None)?,
        ];
        for frame in &frames {
            self.sink.send(frame)?;
        }
        Ok(())
    }

    /// Set roll speed (pulses per second).
    pub fn roll_speed(&mut self, speed: i64) -> EteResult<()> {
        self.command(Channel::RollSpeed, Some(speed))
    }

    /// Set yaw speed (pulses per second).
    pub fn yaw_speed(&mut self, speed: i64) -> EteResult<()> {
        self.command(Channel::YawSpeed, Some(speed))
    }

    /// Reset the jig.
    pub fn reset(&mut self) -> EteResult<()> {
        self.command(Channel::Reset, None)
    }

    /// Show a status screen on the jig display.
    pub fn show_screen(&mut self, screen: TestScreen) -> EteResult<()> {
        self.command(screen.channel(), None)
    }

    /// Encode and send a single command.
    pub fn command(&mut self, channel: Channel, value: Option<i64>) -> EteResult<()> {
        let frame = encode(&self.table, channel, value)?;
        self.sink.send(&frame)
    }

    pub fn yaw_steps(&self) -> u32 {
        self.yaw_steps
    }

    pub fn roll_steps(&self) -> u32 {
        self.roll_steps
    }

    /// The underlying command sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
