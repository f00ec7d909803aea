//! Checksum computation for ETE frames
//!
//! The checksum covers the 12 bytes from `CMD` through `END`. Their values are
//! summed as plain unsigned integers, the sum is rendered as uppercase hex with
//! no fixed width, each hex digit is ASCII-encoded, and the last two encoded
//! bytes become the frame's `CK1 CK2`.
//!
//! Worked example for `yaw_pos = 0`:
//!
//! ```text
//! 31 31 30 43 38 30 32 30 30 30 30 03  -> sum 562 = 0x232
//! "232" -> 32 33 32 -> suffix 33 32
//! ```
//!
//! For any valid 12-byte span the sum lies between 0x10 and 0xBF4, so the
//! suffix is the ASCII form of the two least-significant hex digits.

use super::error::{EteError, EteResult};
use super::protocol::{CHECKSUM_INPUT_LEN, END_INDEX, FRAME_LEN};

/// ASCII-hex encode a string of hex digits: one byte per character, equal to
/// that character's ASCII code.
pub fn ascii_hex_encode(digits: &str) -> Vec<u8> {
    digits.bytes().collect()
}

/// Plain unsigned sum of the checksummed span.
pub fn checksum_sum(input: &[u8]) -> u32 {
    input.iter().map(|&b| u32::from(b)).sum()
}

/// Compute the two checksum bytes for a `CMD..=END` span.
///
/// Returns [`EteError::ChecksumDomain`] if the sum renders to a single hex
/// digit, which cannot happen for a well-formed 12-byte span.
pub fn checksum_suffix(input: &[u8]) -> EteResult<[u8; 2]> {
    debug_assert_eq!(
        input.len(),
        CHECKSUM_INPUT_LEN,
        "Checksum input must span CMD through END"
    );

    let sum = checksum_sum(input);
    let encoded = ascii_hex_encode(&format!("{sum:X}"));
    match encoded.as_slice() {
        [.., ck1, ck2] => Ok([*ck1, *ck2]),
        _ => Err(EteError::ChecksumDomain(sum)),
    }
}

/// Verify that a complete frame carries the checksum of its `CMD..=END` span.
pub fn verify_checksum(frame: &[u8]) -> bool {
    if frame.len() != FRAME_LEN {
        return false;
    }

    match checksum_suffix(&frame[1..=END_INDEX]) {
        Ok(suffix) => frame[END_INDEX + 1..] == suffix,
        Err(_) => false,
    }
}
