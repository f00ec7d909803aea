//! ETE frame type and encoder.
//!
//! A [`Frame`] is the 15 raw bytes sent for one command. Its textual form is a
//! line of space-separated two-digit hex tokens (`"02 31 31 ..."`), used for
//! logging and for writing test vectors.
//!
//! # Encoding a parameterized channel
//!
//! 1. Render the value as 4 zero-padded uppercase hex digits (`4095 -> "0FFF"`).
//! 2. Swap the high and low digit pairs (`"0FFF" -> "FF0F"`) to match the
//!    device's byte order.
//! 3. ASCII-hex encode the swapped digits into the 4 data bytes.
//! 4. Append the checksum suffix computed over `CMD..=END`.
//!
//! ```
//! use ete_gimbal::ete::{encode, AddressTable, Channel};
//!
//! let table = AddressTable::standard();
//! let frame = encode(&table, Channel::YawPos, Some(0))?;
//! assert_eq!(frame.to_string(), "02 31 31 30 43 38 30 32 30 30 30 30 03 33 32");
//! # Ok::<(), ete_gimbal::ete::EteError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use super::checksum::{ascii_hex_encode, checksum_suffix};
use super::error::{EteError, EteResult};
use super::protocol::{
    AddressTable, Channel, ChannelKind, CHECKSUM_INPUT_LEN, CMD, END, END_INDEX, FIXED,
    FRAME_LEN, START,
};

/// One complete ETE command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Wrap raw bytes, checking the `START`/`END` framing.
    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> EteResult<Self> {
        if bytes[0] != START {
            return Err(EteError::InvalidFrame(format!(
                "expected START {START:02X}, found {:02X}",
                bytes[0]
            )));
        }
        if bytes[END_INDEX] != END {
            return Err(EteError::InvalidFrame(format!(
                "expected END {END:02X} at byte {END_INDEX}, found {:02X}",
                bytes[END_INDEX]
            )));
        }
        if bytes.iter().filter(|&&b| b == END).count() != 1 {
            return Err(EteError::InvalidFrame(
                "END byte appears more than once".to_string(),
            ));
        }
        Ok(Self(bytes))
    }

    /// Raw bytes in wire order.
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// The checksummed span, `CMD` through `END`.
    pub fn checksum_input(&self) -> &[u8] {
        &self.0[1..=END_INDEX]
    }

    /// The trailing `CK1 CK2` bytes.
    pub fn checksum(&self) -> [u8; 2] {
        [self.0[END_INDEX + 1], self.0[END_INDEX + 2]]
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl FromStr for Frame {
    type Err = EteError;

    /// Parse the space-separated token form, e.g. `"02 31 31 30 ... 03 33 32"`.
    fn from_str(s: &str) -> EteResult<Self> {
        let mut bytes = [0u8; FRAME_LEN];
        let mut count = 0;

        for token in s.split_whitespace() {
            if count == FRAME_LEN {
                return Err(EteError::InvalidFrame(format!(
                    "more than {FRAME_LEN} tokens"
                )));
            }
            if token.len() != 2 {
                return Err(EteError::InvalidFrame(format!("bad token {token:?}")));
            }
            bytes[count] = u8::from_str_radix(token, 16)
                .map_err(|_| EteError::InvalidFrame(format!("bad token {token:?}")))?;
            count += 1;
        }

        if count != FRAME_LEN {
            return Err(EteError::InvalidFrame(format!(
                "expected {FRAME_LEN} tokens, found {count}"
            )));
        }
        Self::from_bytes(bytes)
    }
}

/// Encode a 16-bit payload as the 4 word-swapped ASCII-hex data bytes.
///
/// `0x1234` renders as `"1234"`, swaps to `"3412"` and is sent as
/// `33 34 31 32`.
pub fn encode_data(value: u16) -> [u8; 4] {
    let digits = format!("{value:04X}");
    let swapped = format!("{}{}", &digits[2..4], &digits[0..2]);
    let mut data = [0u8; 4];
    data.copy_from_slice(&ascii_hex_encode(&swapped));
    data
}

/// Encode one command for `channel`.
///
/// Fixed channels return their literal frame and ignore `value`. Parameterized
/// channels require a value in `0..=65535`; the value is checked before any
/// bytes are assembled.
pub fn encode(table: &AddressTable, channel: Channel, value: Option<i64>) -> EteResult<Frame> {
    let address = match table.lookup(channel)? {
        ChannelKind::Fixed(bytes) => return Ok(Frame(*bytes)),
        ChannelKind::Parameterized(address) => *address,
    };

    let value = value.ok_or(EteError::MissingValue(channel))?;
    let payload =
        u16::try_from(value).map_err(|_| EteError::ValueOutOfRange { channel, value })?;
    let data = encode_data(payload);

    let mut span = [0u8; CHECKSUM_INPUT_LEN];
    span[0] = CMD;
    span[1..5].copy_from_slice(&address);
    span[5..7].copy_from_slice(&FIXED);
    span[7..11].copy_from_slice(&data);
    span[11] = END;

    let suffix = checksum_suffix(&span)?;

    let mut bytes = [0u8; FRAME_LEN];
    bytes[0] = START;
    bytes[1..=END_INDEX].copy_from_slice(&span);
    bytes[END_INDEX + 1..].copy_from_slice(&suffix);
    Ok(Frame(bytes))
}

/// Encode a command addressed by channel name (`"yaw_pos"`, `"run"`, ...).
pub fn encode_named(table: &AddressTable, name: &str, value: Option<i64>) -> EteResult<Frame> {
    encode(table, Channel::from_name(name)?, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ete::checksum::verify_checksum;
    use strum::IntoEnumIterator;

    fn frame(tokens: &str) -> Frame {
        tokens.parse().unwrap()
    }

    #[test]
    fn test_encode_yaw_pos_zero() {
        let table = AddressTable::standard();
        let encoded = encode(&table, Channel::YawPos, Some(0)).unwrap();
        assert_eq!(
            encoded,
            frame("02 31 31 30 43 38 30 32 30 30 30 30 03 33 32")
        );
    }

    #[test]
    fn test_encode_position_vectors() {
        let table = AddressTable::standard();

        // 9600 = 0x2580 -> "8025"
        let roll = encode(&table, Channel::RollPos, Some(9600)).unwrap();
        assert_eq!(roll.to_string(), "02 31 31 30 44 43 30 32 38 30 32 35 03 34 44");

        // 26800 = 0x68B0 -> "B068"
        let yaw = encode(&table, Channel::YawPos, Some(26800)).unwrap();
        assert_eq!(yaw.to_string(), "02 31 31 30 43 38 30 32 42 30 36 38 03 35 32");
    }

    #[test]
    fn test_encode_data_word_swap() {
        assert_eq!(encode_data(0), [0x30, 0x30, 0x30, 0x30]);
        assert_eq!(&encode_data(4095), b"FF0F");
        assert_eq!(&encode_data(0x1234), b"3412");
        assert_eq!(&encode_data(u16::MAX), b"FFFF");
    }

    #[test]
    fn test_fixed_channels_ignore_value() {
        let table = AddressTable::standard();
        let run = frame("02 31 31 30 44 34 30 32 32 32 30 30 03 33 33");

        assert_eq!(encode(&table, Channel::Run, None).unwrap(), run);
        assert_eq!(encode(&table, Channel::Run, Some(1234)).unwrap(), run);
        assert_eq!(encode(&table, Channel::Run, Some(-5)).unwrap(), run);
    }

    #[test]
    fn test_fixed_channel_literals() {
        let table = AddressTable::standard();
        let cases = [
            (Channel::Run, "02 31 31 30 44 34 30 32 32 32 30 30 03 33 33"),
            (Channel::Reset, "02 31 31 30 44 34 30 32 34 34 30 30 03 33 37"),
            (Channel::TestWait, "02 31 31 30 37 38 30 32 30 30 30 30 03 32 36"),
            (Channel::TestPass, "02 31 31 30 37 38 30 32 30 31 30 30 03 32 37"),
            (Channel::TestFail, "02 31 31 30 37 38 30 32 30 32 30 30 03 32 38"),
            (Channel::TestWork, "02 31 31 30 37 38 30 32 30 33 30 30 03 32 39"),
        ];

        for (channel, expected) in cases {
            let encoded = encode(&table, channel, None).unwrap();
            assert_eq!(encoded.to_string(), expected, "channel {channel}");
        }
    }

    #[test]
    fn test_value_out_of_range() {
        let table = AddressTable::standard();

        let err = encode(&table, Channel::YawPos, Some(70000)).unwrap_err();
        assert!(matches!(
            err,
            EteError::ValueOutOfRange {
                channel: Channel::YawPos,
                value: 70000
            }
        ));

        let err = encode(&table, Channel::RollSpeed, Some(-1)).unwrap_err();
        assert!(matches!(err, EteError::ValueOutOfRange { value: -1, .. }));

        assert!(encode(&table, Channel::RollSpeed, Some(65535)).is_ok());
        assert!(encode(&table, Channel::RollSpeed, Some(65536)).is_err());
    }

    #[test]
    fn test_missing_value() {
        let table = AddressTable::standard();
        let err = encode(&table, Channel::YawSpeed, None).unwrap_err();
        assert!(matches!(err, EteError::MissingValue(Channel::YawSpeed)));
    }

    #[test]
    fn test_encode_named() {
        let table = AddressTable::standard();
        assert_eq!(
            encode_named(&table, "yaw_pos", Some(0)).unwrap(),
            encode(&table, Channel::YawPos, Some(0)).unwrap()
        );

        let err = encode_named(&table, "pitch_pos", Some(0)).unwrap_err();
        assert!(matches!(err, EteError::UnknownChannel(name) if name == "pitch_pos"));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let table = AddressTable::standard();
        for value in [0, 1, 255, 4095, 26800, 65535] {
            let a = encode(&table, Channel::RollPos, Some(value)).unwrap();
            let b = encode(&table, Channel::RollPos, Some(value)).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_frame_invariants_across_value_range() {
        let table = AddressTable::standard();
        let parameterized: Vec<Channel> = Channel::iter()
            .filter(|c| c.is_parameterized())
            .collect();

        for channel in parameterized {
            for value in (0..=65535i64).step_by(251).chain([65535]) {
                let encoded = encode(&table, channel, Some(value)).unwrap();
                let bytes = encoded.as_bytes();
                assert_eq!(bytes.len(), FRAME_LEN);
                assert_eq!(bytes[0], START);
                assert_eq!(bytes[END_INDEX], END);
                assert_eq!(bytes.iter().filter(|&&b| b == END).count(), 1);

                // Re-running the checksum pipeline reproduces the suffix
                let suffix = checksum_suffix(encoded.checksum_input()).unwrap();
                assert_eq!(suffix, encoded.checksum());
                assert!(verify_checksum(bytes));
            }
        }
    }

    #[test]
    fn test_frame_token_parsing_errors() {
        assert!("02 31".parse::<Frame>().is_err());
        assert!("zz 31 31 30 43 38 30 32 30 30 30 30 03 33 32"
            .parse::<Frame>()
            .is_err());
        assert!("02 31 31 30 43 38 30 32 30 30 30 30 03 33 32 00"
            .parse::<Frame>()
            .is_err());
        // START missing
        assert!("00 31 31 30 43 38 30 32 30 30 30 30 03 33 32"
            .parse::<Frame>()
            .is_err());
        // END in the wrong place
        assert!("02 31 31 30 43 38 30 32 30 30 30 03 30 33 32"
            .parse::<Frame>()
            .is_err());
    }

    #[test]
    fn test_frame_display_matches_token_form() {
        let tokens = "02 31 31 30 43 38 30 32 30 30 30 30 03 33 32";
        assert_eq!(frame(tokens).to_string(), tokens);
    }
}
