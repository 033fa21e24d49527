//! Frame encoding and payload packing for the gimbal link.
//!
//! Outbound frames carry a 3-axis [`Command`]; inbound frames carry an
//! [`Attitude`] readback. Both payloads are three `f32` values packed back to
//! back in native byte order, so the same packing rule serves both directions.
//!
//! ## Functions
//!
//! - [`encode_command`]: Builds a complete 14-byte outbound frame
//! - [`encode_command_with`]: Same, with a caller-chosen start byte
//! - [`pack_floats`]: Packs three floats into a payload
//! - [`unpack_floats`]: Recovers three floats from a payload
//! - [`decode_attitude`]: Reads a validated inbound payload as roll, pitch, yaw
//!
//! ## Limitations
//!
//! - No endianness conversion is performed. The gimbal firmware and the host
//!   must share a byte order.
//! - NaN and infinities are not rejected; their raw bit patterns go on the wire.

use crate::consts::{
    SERIAL_CRC_LEN, SERIAL_FLOAT_LEN, SERIAL_IN_PAYLOAD_LEN, SERIAL_OUT_MSG_LEN,
    SERIAL_OUT_PAYLOAD_LEN, SERIAL_OUT_START_BYTE, SERIAL_START_LEN,
};
use crate::crc::crc8_ccitt;

/// A 3-axis command destined for the gimbal controller.
///
/// The meaning of each axis (angle, rate, ...) is up to the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Command {
    /// First axis, packed at frame offset 1.
    pub x: f32,
    /// Second axis, packed at frame offset 5.
    pub y: f32,
    /// Third axis, packed at frame offset 9.
    pub z: f32,
}

impl Command {
    /// Creates a command from its three axes.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Attitude reported back by the gimbal controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Attitude {
    /// Roll, payload offset 0.
    pub roll: f32,
    /// Pitch, payload offset 4.
    pub pitch: f32,
    /// Yaw, payload offset 8.
    pub yaw: f32,
}

/// Packs three floats back to back in native byte order.
pub fn pack_floats(values: [f32; 3]) -> [u8; SERIAL_OUT_PAYLOAD_LEN] {
    let mut out = [0u8; SERIAL_OUT_PAYLOAD_LEN];
    for (chunk, value) in out.chunks_exact_mut(SERIAL_FLOAT_LEN).zip(values) {
        chunk.copy_from_slice(&value.to_ne_bytes());
    }
    out
}

/// Recovers three floats from a payload packed by [`pack_floats`].
///
/// The conversion is bit-exact: NaN payloads and signed zeros survive.
pub fn unpack_floats(payload: &[u8; SERIAL_IN_PAYLOAD_LEN]) -> [f32; 3] {
    let mut values = [0f32; 3];
    for (value, chunk) in values.iter_mut().zip(payload.chunks_exact(SERIAL_FLOAT_LEN)) {
        let mut raw = [0u8; SERIAL_FLOAT_LEN];
        raw.copy_from_slice(chunk);
        *value = f32::from_ne_bytes(raw);
    }
    values
}

/// Encodes a command into a complete outbound frame using the default start
/// byte ([`SERIAL_OUT_START_BYTE`]).
///
/// # Returns
/// `[start][x][y][z][crc]`, always [`SERIAL_OUT_MSG_LEN`] bytes long.
pub fn encode_command(x: f32, y: f32, z: f32) -> [u8; SERIAL_OUT_MSG_LEN] {
    encode_command_with(SERIAL_OUT_START_BYTE, &Command::new(x, y, z))
}

/// Encodes a command into a complete outbound frame opened by `start_byte`.
///
/// The CRC covers every byte before it, seeded with the protocol's initial
/// value, and lands in the last slot.
pub fn encode_command_with(start_byte: u8, command: &Command) -> [u8; SERIAL_OUT_MSG_LEN] {
    let mut buf = [0u8; SERIAL_OUT_MSG_LEN];
    buf[0] = start_byte;
    buf[SERIAL_START_LEN..SERIAL_START_LEN + SERIAL_OUT_PAYLOAD_LEN]
        .copy_from_slice(&pack_floats([command.x, command.y, command.z]));

    let body_len = SERIAL_OUT_MSG_LEN - SERIAL_CRC_LEN;
    buf[body_len] = crc8_ccitt(&buf[..body_len]);
    buf
}

/// Reads a CRC-validated inbound payload as roll, pitch and yaw.
pub fn decode_attitude(payload: &[u8; SERIAL_IN_PAYLOAD_LEN]) -> Attitude {
    let [roll, pitch, yaw] = unpack_floats(payload);
    Attitude { roll, pitch, yaw }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn payload_of(frame: &[u8; SERIAL_OUT_MSG_LEN]) -> [u8; SERIAL_IN_PAYLOAD_LEN] {
        let mut payload = [0u8; SERIAL_IN_PAYLOAD_LEN];
        payload.copy_from_slice(&frame[SERIAL_START_LEN..SERIAL_OUT_MSG_LEN - SERIAL_CRC_LEN]);
        payload
    }

    #[test]
    fn test_frame_layout() {
        let frame = encode_command(1.0, -2.5, 0.0);
        assert_eq!(frame.len(), 14);
        assert_eq!(frame[0], SERIAL_OUT_START_BYTE);
        assert_eq!(&frame[1..5], &1.0f32.to_ne_bytes());
        assert_eq!(&frame[5..9], &(-2.5f32).to_ne_bytes());
        assert_eq!(&frame[9..13], &0.0f32.to_ne_bytes());
        assert_eq!(frame[13], crc8_ccitt(&frame[..13]));
    }

    #[test]
    fn test_zero_command_frame() {
        let frame = encode_command(0.0, 0.0, 0.0);
        assert_eq!(frame, [0xA5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xC5]);
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn test_known_frame_little_endian() {
        let frame = encode_command(1.0, -2.5, 0.5);
        assert_eq!(
            frame,
            [
                0xA5, 0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x20, 0xC0, 0x00, 0x00, 0x00, 0x3F, 0xB1
            ]
        );
    }

    #[test]
    fn test_custom_start_byte() {
        let frame = encode_command_with(0x7E, &Command::new(3.0, 2.0, 1.0));
        assert_eq!(frame[0], 0x7E);
        assert_eq!(frame[13], crc8_ccitt(&frame[..13]));
        assert_ne!(frame, encode_command(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_non_finite_inputs_keep_fixed_length() {
        for value in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, f32::MAX, f32::MIN] {
            let frame = encode_command(value, value, value);
            assert_eq!(frame.len(), SERIAL_OUT_MSG_LEN);
            let [x, _, _] = unpack_floats(&payload_of(&frame));
            assert_eq!(x.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn test_decode_attitude_field_order() {
        let attitude = decode_attitude(&pack_floats([0.1, 0.2, 0.3]));
        assert_eq!(
            attitude,
            Attitude {
                roll: 0.1,
                pitch: 0.2,
                yaw: 0.3
            }
        );
    }

    #[quickcheck]
    fn encoded_payload_roundtrip(x: f32, y: f32, z: f32) -> TestResult {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return TestResult::discard();
        }
        let [rx, ry, rz] = unpack_floats(&payload_of(&encode_command(x, y, z)));
        TestResult::from_bool(
            rx.to_bits() == x.to_bits()
                && ry.to_bits() == y.to_bits()
                && rz.to_bits() == z.to_bits(),
        )
    }
}
