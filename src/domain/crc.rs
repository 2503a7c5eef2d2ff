//! CRC-16/CCITT-FALSE, the integrity trailer of every BR Code.

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// Bitwise CRC-16/CCITT-FALSE: init `0xFFFF`, poly `0x1021`, MSB first,
/// no reflection, no final xor.
pub fn crc16(bytes: impl IntoIterator<Item = u8>) -> u16 {
    bytes.into_iter().fold(INITIAL, |mut crc, byte| {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
        crc
    })
}

/// Checksum of a payload as the four uppercase hex digits appended after `6304`.
///
/// Each character contributes its code point truncated to one byte.
pub fn checksum(payload: &str) -> String {
    format!("{:04X}", crc16(payload.chars().map(|c| c as u32 as u8)))
}
