//! Constants used across the gimbal serial protocol.
//!
//! This module defines the frame markers, field lengths, and CRC parameters
//! shared by the encoder and the decoder.
//!
//! ## Frame layout
//!
//! | Direction | Layout                                     | Length |
//! |-----------|--------------------------------------------|--------|
//! | Outbound  | `[start][x: f32][y: f32][z: f32][crc]`     | 14     |
//! | Inbound   | `[start][roll: f32][pitch: f32][yaw: f32][crc]` | 14 |
//!
//! Floats are packed in native byte order. Both ends of the link must agree on
//! byte order out of band.
//!
//! The CRC byte covers the start byte and the payload, never itself.

/// Marker byte that opens every outbound (command) frame.
pub const SERIAL_OUT_START_BYTE: u8 = 0xA5;

/// Marker byte that opens every inbound (attitude) frame.
///
/// May differ from [`SERIAL_OUT_START_BYTE`] on some firmware.
pub const SERIAL_IN_START_BYTE: u8 = 0xA5;

/// Length (in bytes) of the start marker.
pub const SERIAL_START_LEN: usize = 1;

/// Length (in bytes) of the trailing checksum.
pub const SERIAL_CRC_LEN: usize = 1;

/// Size of one packed `f32` on the wire.
pub const SERIAL_FLOAT_LEN: usize = size_of::<f32>();

/// Outbound payload: three command axes.
pub const SERIAL_OUT_PAYLOAD_LEN: usize = 3 * SERIAL_FLOAT_LEN;

/// Inbound payload: roll, pitch and yaw.
pub const SERIAL_IN_PAYLOAD_LEN: usize = 3 * SERIAL_FLOAT_LEN;

/// Total length of an outbound frame, start byte through CRC.
pub const SERIAL_OUT_MSG_LEN: usize = SERIAL_START_LEN + SERIAL_OUT_PAYLOAD_LEN + SERIAL_CRC_LEN;

/// Total length of an inbound frame, start byte through CRC.
pub const SERIAL_IN_MSG_LEN: usize = SERIAL_START_LEN + SERIAL_IN_PAYLOAD_LEN + SERIAL_CRC_LEN;

/// Seed for the running CRC of every frame.
pub const SERIAL_CRC_INITIAL_VALUE: u8 = 0x00;

/// CRC-8/CCITT generator polynomial (x^8 + x^2 + x + 1), MSB first.
pub const CRC8_CCITT_POLY: u8 = 0x07;

/// Default serial device the gimbal controller is attached to.
pub const DEFAULT_PORT: &str = "/dev/gimbal";

/// Default link bit rate.
pub const DEFAULT_BAUDRATE: u32 = 115_200;
