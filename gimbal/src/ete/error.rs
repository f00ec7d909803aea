//! Error types shared by the ETE encoder, transport and controller.

use thiserror::Error;

use super::protocol::Channel;

/// Errors that can occur while encoding or sending ETE commands.
///
/// Encoder faults (`UnknownChannel`, `MissingValue`, `ValueOutOfRange`,
/// `NonFiniteAngle`, `ChecksumDomain`) are always raised before any byte is
/// written to the line.
#[derive(Error, Debug)]
pub enum EteError {
    /// Channel name is not part of the ETE command set, or the address
    /// table in use has no entry for it.
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// A parameterized channel was encoded without a value.
    #[error("Channel {0} requires a value")]
    MissingValue(Channel),

    /// Payload does not fit the 16-bit data field.
    #[error("Value {value} out of range for channel {channel} (expected 0..=65535)")]
    ValueOutOfRange {
        /// Channel being encoded
        channel: Channel,
        /// Rejected payload
        value: i64,
    },

    /// Angle (or its step count) is NaN or infinite.
    #[error("Angle {0} is not a finite number")]
    NonFiniteAngle(f64),

    /// Checksum sum renders to fewer than two hex digits.
    #[error("Checksum sum {0:#X} has no two-digit suffix")]
    ChecksumDomain(u32),

    /// Token string does not describe a well-formed 15-byte frame.
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Write to the serial line failed.
    #[error("Transport fault: {0}")]
    Transport(#[from] std::io::Error),

    /// Serial port could not be opened or configured.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Configuration file could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for ETE operations.
pub type EteResult<T> = Result<T, EteError>;
