//! ETE frame constants, channel set and address table.
//!
//! Every ETE frame is 15 raw bytes:
//!
//! ```text
//! START CMD ADDR[4] FIXED[2] DATA[4] END CK1 CK2
//!  02    31  ....    30 32    ....    03  ..  ..
//! ```
//!
//! Parameterized channels (positions and speeds) carry a 4-byte ASCII-hex
//! address and have their data and checksum computed at encode time. Fixed
//! channels (`run`, `reset` and the test screens) are sent as literal frames.

use std::collections::HashMap;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use super::error::{EteError, EteResult};

/// Start-of-frame control byte.
pub const START: u8 = 0x02;

/// End-of-frame control byte.
pub const END: u8 = 0x03;

/// Command-type byte (ASCII `'1'`).
pub const CMD: u8 = 0x31;

/// Filler bytes between address and data (ASCII `"02"`).
pub const FIXED: [u8; 2] = [0x30, 0x32];

/// Total frame length in bytes.
pub const FRAME_LEN: usize = 15;

/// Position of the `END` byte within a frame.
pub const END_INDEX: usize = 12;

/// Length of the checksummed span `CMD..=END`.
pub const CHECKSUM_INPUT_LEN: usize = 12;

/// Literal `run` frame.
pub const RUN_FRAME: [u8; FRAME_LEN] = [
    0x02, 0x31, 0x31, 0x30, 0x44, 0x34, 0x30, 0x32, 0x32, 0x32, 0x30, 0x30, 0x03, 0x33, 0x33,
];

/// Literal `reset` frame.
pub const RESET_FRAME: [u8; FRAME_LEN] = [
    0x02, 0x31, 0x31, 0x30, 0x44, 0x34, 0x30, 0x32, 0x34, 0x34, 0x30, 0x30, 0x03, 0x33, 0x37,
];

/// Literal `test_wait` screen frame.
pub const TEST_WAIT_FRAME: [u8; FRAME_LEN] = [
    0x02, 0x31, 0x31, 0x30, 0x37, 0x38, 0x30, 0x32, 0x30, 0x30, 0x30, 0x30, 0x03, 0x32, 0x36,
];

/// Literal `test_pass` screen frame.
pub const TEST_PASS_FRAME: [u8; FRAME_LEN] = [
    0x02, 0x31, 0x31, 0x30, 0x37, 0x38, 0x30, 0x32, 0x30, 0x31, 0x30, 0x30, 0x03, 0x32, 0x37,
];

/// Literal `test_fail` screen frame.
pub const TEST_FAIL_FRAME: [u8; FRAME_LEN] = [
    0x02, 0x31, 0x31, 0x30, 0x37, 0x38, 0x30, 0x32, 0x30, 0x32, 0x30, 0x30, 0x03, 0x32, 0x38,
];

/// Literal `test_work` screen frame.
pub const TEST_WORK_FRAME: [u8; FRAME_LEN] = [
    0x02, 0x31, 0x31, 0x30, 0x37, 0x38, 0x30, 0x32, 0x30, 0x33, 0x30, 0x30, 0x03, 0x32, 0x39,
];

/// Named command slot of the gimbal controller.
///
/// Names parse from and display as snake_case (`"yaw_pos"`, `"test_wait"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Channel {
    YawPos,
    YawSpeed,
    RollPos,
    RollSpeed,
    Run,
    Reset,
    TestWait,
    TestPass,
    TestFail,
    TestWork,
}

impl Channel {
    /// Look up a channel by its snake_case name.
    pub fn from_name(name: &str) -> EteResult<Self> {
        name.parse()
            .map_err(|_| EteError::UnknownChannel(name.to_string()))
    }

    /// Canonical snake_case name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// True for channels that carry a 16-bit payload.
    pub fn is_parameterized(self) -> bool {
        matches!(
            self,
            Channel::YawPos | Channel::YawSpeed | Channel::RollPos | Channel::RollSpeed
        )
    }
}

/// How a channel is turned into a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Complete precomputed frame, sent as-is.
    Fixed([u8; FRAME_LEN]),
    /// ASCII-hex address; data and checksum are computed per value.
    Parameterized([u8; 4]),
}

/// Immutable mapping from channel to its address or literal frame.
///
/// Built once (normally via [`AddressTable::standard`]) and passed by
/// reference to [`encode`](super::frame::encode).
#[derive(Debug, Clone)]
pub struct AddressTable {
    entries: HashMap<Channel, ChannelKind>,
}

impl AddressTable {
    /// The command set of the ETE roll/yaw gimbal.
    pub fn standard() -> Self {
        Self::from_entries(Channel::iter().map(|channel| (channel, standard_kind(channel))))
    }

    /// Build a table from explicit entries.
    ///
    /// Channels left out are rejected by the encoder with
    /// [`EteError::UnknownChannel`].
    pub fn from_entries(entries: impl IntoIterator<Item = (Channel, ChannelKind)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Look up how a channel is encoded.
    pub fn lookup(&self, channel: Channel) -> EteResult<&ChannelKind> {
        self.entries
            .get(&channel)
            .ok_or_else(|| EteError::UnknownChannel(channel.to_string()))
    }

    /// Number of channels in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AddressTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_kind(channel: Channel) -> ChannelKind {
    match channel {
        Channel::YawPos => ChannelKind::Parameterized(*b"10C8"),
        Channel::YawSpeed => ChannelKind::Parameterized(*b"10CC"),
        Channel::RollPos => ChannelKind::Parameterized(*b"10DC"),
        Channel::RollSpeed => ChannelKind::Parameterized(*b"10E0"),
        Channel::Run => ChannelKind::Fixed(RUN_FRAME),
        Channel::Reset => ChannelKind::Fixed(RESET_FRAME),
        Channel::TestWait => ChannelKind::Fixed(TEST_WAIT_FRAME),
        Channel::TestPass => ChannelKind::Fixed(TEST_PASS_FRAME),
        Channel::TestFail => ChannelKind::Fixed(TEST_FAIL_FRAME),
        Channel::TestWork => ChannelKind::Fixed(TEST_WORK_FRAME),
    }
}
