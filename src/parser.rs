//! Byte-wise decoder for inbound gimbal frames.
//!
//! [`FrameParser`] is fed one byte at a time, in arrival order, and hands back
//! a payload once a complete frame has passed its CRC check. There is no
//! escape mechanism and no length prefix: a frame is a start byte, exactly
//! [`SERIAL_IN_PAYLOAD_LEN`] payload bytes and one CRC byte.
//!
//! ## Resynchronization
//!
//! Once a start byte has been seen, the next `SERIAL_IN_PAYLOAD_LEN + 1` bytes
//! belong to that frame whatever their value. A start-byte value inside a
//! payload is never taken as a new frame. After byte loss the parser may
//! misframe for a while; it recovers once a CRC fails and a real start byte is
//! found. The link underneath is assumed to be close to lossless.

use crate::consts::{SERIAL_CRC_INITIAL_VALUE, SERIAL_IN_PAYLOAD_LEN, SERIAL_IN_START_BYTE};
use crate::crc::crc8_ccitt_update;
use crate::encoding::{Attitude, decode_attitude};
use crate::error::FrameError;

/// Position of the [`FrameParser`] within the current frame.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ParseState {
    /// Waiting for a start byte. Anything else is discarded.
    #[default]
    Idle,
    /// Start byte seen, collecting payload bytes.
    AwaitingPayload,
    /// Payload complete; the next byte is the CRC.
    AwaitingCrc,
}

/// Incremental decoder for inbound frames.
///
/// One parser serves one link. It is not meant to be shared: feed it from a
/// single receive path, or wrap it (see [`crate::link`]) when an interrupt
/// handler and the main loop both need it.
#[derive(Debug)]
pub struct FrameParser {
    /// Marker that opens a frame.
    start_byte: u8,

    /// Current position in the frame.
    state: ParseState,

    /// Running CRC over the start byte and the payload bytes seen so far.
    crc: u8,

    /// Payload bytes collected for the current frame.
    buf: [u8; SERIAL_IN_PAYLOAD_LEN],

    /// Number of valid bytes in `buf`. Never exceeds `SERIAL_IN_PAYLOAD_LEN`.
    filled: usize,

    /// Frames dropped because of a CRC mismatch.
    crc_errors: u32,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Creates an idle parser expecting [`SERIAL_IN_START_BYTE`].
    pub fn new() -> Self {
        Self::with_start_byte(SERIAL_IN_START_BYTE)
    }

    /// Creates an idle parser for a link whose frames open with `start_byte`.
    pub fn with_start_byte(start_byte: u8) -> Self {
        Self {
            start_byte,
            state: ParseState::Idle,
            crc: SERIAL_CRC_INITIAL_VALUE,
            buf: [0u8; SERIAL_IN_PAYLOAD_LEN],
            filled: 0,
            crc_errors: 0,
        }
    }

    /// Current position within the frame.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// The start byte this parser synchronizes on.
    pub fn start_byte(&self) -> u8 {
        self.start_byte
    }

    /// Number of frames dropped on a CRC mismatch since creation.
    ///
    /// Purely informational. Saturates instead of wrapping.
    pub fn crc_error_count(&self) -> u32 {
        self.crc_errors
    }

    /// Abandons any partial frame and goes back to waiting for a start byte.
    ///
    /// The error counter is kept. Call this when the transport reconnects.
    pub fn reset(&mut self) {
        self.state = ParseState::Idle;
        self.crc = SERIAL_CRC_INITIAL_VALUE;
        self.filled = 0;
    }

    /// Consumes one received byte.
    ///
    /// # Returns
    /// - `Ok(Some(payload))`: this byte was a matching CRC; the frame is valid
    /// - `Ok(None)`: no frame boundary yet, or the byte was noise outside a frame
    /// - `Err(FrameError::ChecksumMismatch)`: this byte closed a frame whose CRC
    ///   did not match; the frame is gone and the error counter was bumped
    ///
    /// Either way a frame boundary leaves the parser in [`ParseState::Idle`].
    pub fn feed_checked(
        &mut self,
        byte: u8,
    ) -> Result<Option<[u8; SERIAL_IN_PAYLOAD_LEN]>, FrameError> {
        match self.state {
            ParseState::Idle => {
                if byte == self.start_byte {
                    self.crc = crc8_ccitt_update(SERIAL_CRC_INITIAL_VALUE, byte);
                    self.filled = 0;
                    self.state = ParseState::AwaitingPayload;
                }
                Ok(None)
            }
            ParseState::AwaitingPayload => {
                // `filled < SERIAL_IN_PAYLOAD_LEN` holds in this state: the
                // byte that fills the buffer moves us to `AwaitingCrc`.
                self.crc = crc8_ccitt_update(self.crc, byte);
                self.buf[self.filled] = byte;
                self.filled += 1;
                if self.filled == SERIAL_IN_PAYLOAD_LEN {
                    self.state = ParseState::AwaitingCrc;
                }
                Ok(None)
            }
            ParseState::AwaitingCrc => {
                self.state = ParseState::Idle;
                if byte != self.crc {
                    self.crc_errors = self.crc_errors.saturating_add(1);
                    #[cfg(feature = "log")]
                    log::warn!(
                        "dropping gimbal frame: crc {:#04x} != {:#04x} ({} errors)",
                        byte,
                        self.crc,
                        self.crc_errors
                    );
                    #[cfg(feature = "defmt-0-3")]
                    defmt::warn!(
                        "dropping gimbal frame: crc {=u8:#x} != {=u8:#x} ({=u32} errors)",
                        byte,
                        self.crc,
                        self.crc_errors
                    );
                    return Err(FrameError::ChecksumMismatch {
                        expected: self.crc,
                        actual: byte,
                    });
                }

                #[cfg(feature = "log")]
                log::trace!("gimbal frame complete");
                #[cfg(feature = "defmt-0-3")]
                defmt::trace!("gimbal frame complete");

                Ok(Some(self.buf))
            }
        }
    }

    /// Consumes one received byte, returning the payload of a frame that
    /// just completed with a valid CRC.
    ///
    /// CRC failures are swallowed here; they only show up in
    /// [`crc_error_count`](FrameParser::crc_error_count).
    pub fn feed(&mut self, byte: u8) -> Option<[u8; SERIAL_IN_PAYLOAD_LEN]> {
        self.feed_checked(byte).ok().flatten()
    }

    /// Like [`feed`](FrameParser::feed), decoding a completed payload as
    /// roll, pitch and yaw.
    pub fn feed_attitude(&mut self, byte: u8) -> Option<Attitude> {
        self.feed(byte).map(|payload| decode_attitude(&payload))
    }
}
