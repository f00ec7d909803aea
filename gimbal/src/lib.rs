//! Driver for ETE two-axis (roll/yaw) gimbals.
//!
//! The gimbal controller accepts 15-byte ASCII-hex frames over a 9600 baud
//! 7E2 serial line and never replies. This crate provides:
//!
//! - [`ete::encode`] - bit-exact frame encoder (word-swapped data, summed
//!   checksum, ASCII-hex suffix)
//! - [`ete::SerialTransport`] - paced serial writer with a dry-run mode
//! - [`ete::GimbalController`] - angle-to-step conversion and command sequencing
//!
//! The `ete_tool` binary wraps these for command-line use.

pub mod ete;
