//! Error types for the gimbal link.
//!
//! Framing errors never abort decoding: the parser reports them and goes back
//! to hunting for a start byte. Transport errors come from the serial
//! peripheral and are handed to the caller untouched, the link does not retry.

use thiserror::Error;

/// A completed inbound frame that failed validation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum FrameError {
    /// The trailing byte disagreed with the CRC computed over the frame.
    #[error("crc mismatch: computed {expected:#04x}, received {actual:#04x}")]
    ChecksumMismatch {
        /// CRC accumulated over the start byte and payload.
        expected: u8,
        /// Byte found in the CRC slot.
        actual: u8,
    },
}

/// Failure reported by the serial transport underneath a
/// [`GimbalSerializer`](crate::driver::GimbalSerializer).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum GimbalError<E: core::fmt::Debug> {
    /// Writing a frame byte failed.
    #[error("serial write failed: {0:?}")]
    Write(E),
    /// Flushing the transmit path failed.
    #[error("serial flush failed: {0:?}")]
    Flush(E),
    /// Reading from the receive path failed.
    #[error("serial read failed: {0:?}")]
    Read(E),
    /// A global link was used before it was set up.
    #[error("gimbal link has not been set up")]
    NotSetUp,
}
