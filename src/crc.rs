//! CRC-8/CCITT (polynomial `0x07`, MSB first, no reflection, no final XOR).

use crate::consts::{CRC8_CCITT_POLY, SERIAL_CRC_INITIAL_VALUE};

/// Folds one byte into a running CRC-8/CCITT value.
///
/// Always shifts once per bit of `data`, whichever direction of the link is
/// being checked.
pub fn crc8_ccitt_update(crc: u8, data: u8) -> u8 {
    let mut d = crc ^ data;
    for _ in 0..u8::BITS {
        d = if d & 0x80 != 0 {
            (d << 1) ^ CRC8_CCITT_POLY
        } else {
            d << 1
        };
    }
    d
}

/// Computes the CRC of a whole byte slice, seeded with
/// [`SERIAL_CRC_INITIAL_VALUE`].
pub fn crc8_ccitt(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(SERIAL_CRC_INITIAL_VALUE, |crc, &b| crc8_ccitt_update(crc, b))
}
