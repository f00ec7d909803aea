//! ETE gimbal protocol
//!
//! Encoding, transport and control for the ASCII-hex framed serial protocol
//! spoken by ETE roll/yaw gimbal controllers.

pub mod checksum;
pub mod config;
pub mod error;
pub mod frame;
pub mod gimbal;
pub mod protocol;
pub mod transport;

pub use checksum::{checksum_suffix, verify_checksum};
pub use config::{GimbalConfig, SerialSettings, DEFAULT_DELAY, DEFAULT_PORT};
pub use error::{EteError, EteResult};
pub use frame::{encode, encode_named, Frame};
pub use gimbal::{GimbalController, TestScreen};
pub use protocol::{AddressTable, Channel, ChannelKind, FRAME_LEN};
pub use transport::{CommandSink, SerialTransport};
