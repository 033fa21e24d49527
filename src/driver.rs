//! Serial link driver for a 3-axis gimbal controller.
//!
//! This module provides the [`GimbalSerializer`] struct, which ties the frame
//! encoder and the [`FrameParser`] to a byte transport implementing the
//! `embedded-hal-nb` serial traits.
//!
//! Commands go out as one 14-byte frame each. Attitude frames come in either
//! pushed one byte at a time from a receive interrupt
//! ([`rx_byte`](GimbalSerializer::rx_byte)) or pulled from the transport
//! ([`poll`](GimbalSerializer::poll)).
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::serial::{Mock as Serial, Transaction};
//! use gimbal_serial::config::LinkConfig;
//! use gimbal_serial::driver::GimbalSerializer;
//! use gimbal_serial::encoding::{Command, encode_command};
//!
//! # let frame = encode_command(0.0, 15.0, -30.0);
//! # let serial = Serial::new(&[Transaction::write_many(frame), Transaction::flush()]);
//! let mut gimbal = GimbalSerializer::new(serial, LinkConfig::default());
//!
//! gimbal.send_command(Command::new(0.0, 15.0, -30.0)).unwrap();
//! assert_eq!(gimbal.status().frames_sent, 1);
//! # gimbal.serial.done();
//! ```
//!
//! ## Design Notes
//!
//! The driver never retries. A transport error is logged (with the `log` or
//! `defmt-0-3` feature) and returned. CRC failures on the receive path are
//! counted and otherwise ignored.

use embedded_hal_nb::serial::{Read, Write};
use nb::block;

use crate::config::LinkConfig;
use crate::consts::SERIAL_OUT_MSG_LEN;
use crate::encoding::{Attitude, Command, encode_command_with};
use crate::error::GimbalError;
use crate::parser::FrameParser;

/// Snapshot of a link's traffic, the equivalent of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct GimbalStatus {
    /// Last command written in full to the transport.
    pub last_command: Option<Command>,
    /// Last attitude received with a valid CRC.
    pub last_attitude: Option<Attitude>,
    /// Command frames written and flushed.
    pub frames_sent: u32,
    /// Attitude frames accepted.
    pub frames_received: u32,
    /// Attitude frames dropped on a CRC mismatch.
    pub crc_errors: u32,
}

/// An encoded command frame on its way out, written one transport call at a
/// time by [`GimbalSerializer::send_step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCommand {
    command: Command,
    frame: [u8; SERIAL_OUT_MSG_LEN],
    /// Bytes accepted by the transport so far.
    written: usize,
    done: bool,
}

impl PendingCommand {
    /// The command being sent.
    pub fn command(&self) -> Command {
        self.command
    }

    /// The complete frame, start byte through CRC.
    pub fn frame(&self) -> &[u8; SERIAL_OUT_MSG_LEN] {
        &self.frame
    }

    /// Whether every byte was written and the transport flushed.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// A gimbal controller attached to a serial transport.
///
/// ## Type Parameters
///
/// - `S`: the transport, implementing [`embedded_hal_nb::serial::Read`] and
///   [`embedded_hal_nb::serial::Write`] for `u8` words
///
/// ## Notes
///
/// - Sending blocks (via `nb::block!`) only as long as the transport reports
///   `WouldBlock`. [`send_step`](GimbalSerializer::send_step) is the
///   non-blocking form.
/// - The receive side holds decoder state. Feed it from a single context, or
///   share the driver through [`crate::link`].
#[derive(Debug)]
pub struct GimbalSerializer<S>
where
    S: Read<u8> + Write<u8>,
{
    /// Serial transport
    pub serial: S,
    /// Inbound frame decoder
    pub parser: FrameParser,
    out_start_byte: u8,
    last_command: Option<Command>,
    last_attitude: Option<Attitude>,

    /// Command frames written and flushed without error.
    tx_good: u32,

    /// Attitude frames that passed the CRC check.
    rx_good: u32,
}

impl<S> GimbalSerializer<S>
where
    S: Read<u8> + Write<u8>,
{
    /// Creates a driver on top of an already opened transport.
    ///
    /// # Arguments
    /// - `serial`: The byte transport to the controller.
    /// - `config`: Link settings; the start bytes select the frame markers.
    ///   Nothing else is kept, so `config` may borrow a short-lived port name.
    pub fn new(serial: S, config: LinkConfig<'_>) -> Self {
        Self {
            serial,
            parser: FrameParser::with_start_byte(config.in_start_byte),
            out_start_byte: config.out_start_byte,
            last_command: None,
            last_attitude: None,
            tx_good: 0,
            rx_good: 0,
        }
    }

    /// Marker written at the head of every command frame.
    pub fn out_start_byte(&self) -> u8 {
        self.out_start_byte
    }

    /// Encodes `command` with this link's start byte, ready for
    /// [`send_step`](GimbalSerializer::send_step). Touches no transport.
    pub fn prepare_command(&self, command: Command) -> PendingCommand {
        PendingCommand {
            command,
            frame: encode_command_with(self.out_start_byte, &command),
            written: 0,
            done: false,
        }
    }

    /// Makes at most one transport call towards sending `pending`: the next
    /// byte, or the final flush once all bytes are out.
    ///
    /// # Returns
    /// - `Ok(())`: the frame is written and flushed, and now counted
    /// - `Err(nb::Error::WouldBlock)`: call again; progress is kept in `pending`
    /// - `Err(nb::Error::Other(_))`: [`GimbalError::Write`] or
    ///   [`GimbalError::Flush`]; the frame is abandoned and not counted
    ///
    /// Calling it again on a finished frame returns `Ok(())` and does nothing.
    pub fn send_step(
        &mut self,
        pending: &mut PendingCommand,
    ) -> nb::Result<(), GimbalError<S::Error>> {
        if pending.done {
            return Ok(());
        }

        if pending.written < SERIAL_OUT_MSG_LEN {
            let byte = pending.frame[pending.written];
            self.serial.write(byte).map_err(|e| match e {
                nb::Error::WouldBlock => nb::Error::WouldBlock,
                nb::Error::Other(e) => {
                    #[cfg(feature = "log")]
                    log::warn!("gimbal command write failed: {:?}", e);
                    #[cfg(feature = "defmt-0-3")]
                    defmt::warn!("gimbal command write failed");
                    nb::Error::Other(GimbalError::Write(e))
                }
            })?;
            pending.written += 1;
            return Err(nb::Error::WouldBlock);
        }

        self.serial.flush().map_err(|e| match e {
            nb::Error::WouldBlock => nb::Error::WouldBlock,
            nb::Error::Other(e) => {
                #[cfg(feature = "log")]
                log::warn!("gimbal command flush failed: {:?}", e);
                #[cfg(feature = "defmt-0-3")]
                defmt::warn!("gimbal command flush failed");
                nb::Error::Other(GimbalError::Flush(e))
            }
        })?;

        pending.done = true;
        self.tx_good = self.tx_good.saturating_add(1);
        self.last_command = Some(pending.command);
        Ok(())
    }

    /// Encodes `command` and writes the whole frame, then flushes.
    ///
    /// # Errors
    /// - [`GimbalError::Write`] if any byte could not be written
    /// - [`GimbalError::Flush`] if the flush failed
    ///
    /// A failed frame is not retried and not counted. Part of it may already
    /// be on the wire; the controller's CRC check discards it.
    pub fn send_command(&mut self, command: Command) -> Result<(), GimbalError<S::Error>> {
        let mut pending = self.prepare_command(command);
        block!(self.send_step(&mut pending))
    }

    /// Receive callback: consumes one byte from the transport.
    ///
    /// # Returns
    /// The decoded attitude when this byte completed a valid frame.
    pub fn rx_byte(&mut self, byte: u8) -> Option<Attitude> {
        let attitude = self.parser.feed_attitude(byte)?;
        self.rx_good = self.rx_good.saturating_add(1);
        self.last_attitude = Some(attitude);
        #[cfg(feature = "log")]
        log::debug!(
            "gimbal attitude roll={} pitch={} yaw={}",
            attitude.roll,
            attitude.pitch,
            attitude.yaw
        );
        #[cfg(feature = "defmt-0-3")]
        defmt::debug!("gimbal attitude {}", attitude);
        Some(attitude)
    }

    /// Reads a single byte from the transport and feeds it to the decoder.
    ///
    /// # Returns
    /// - `Ok(Some(attitude))`: that byte completed a valid frame
    /// - `Ok(None)`: a byte was consumed, no frame yet
    /// - `Err(nb::Error::WouldBlock)`: nothing to read
    /// - `Err(nb::Error::Other(GimbalError::Read(_)))`: the transport failed
    pub fn poll_byte(&mut self) -> nb::Result<Option<Attitude>, GimbalError<S::Error>> {
        let byte = self.serial.read().map_err(|e| match e {
            nb::Error::WouldBlock => nb::Error::WouldBlock,
            nb::Error::Other(e) => {
                #[cfg(feature = "log")]
                log::warn!("gimbal read failed: {:?}", e);
                #[cfg(feature = "defmt-0-3")]
                defmt::warn!("gimbal read failed");
                nb::Error::Other(GimbalError::Read(e))
            }
        })?;
        Ok(self.rx_byte(byte))
    }

    /// Reads from the transport until a frame completes or no byte is ready.
    ///
    /// # Returns
    /// - `Ok(attitude)`: a valid frame completed; bytes after it stay in the transport
    /// - `Err(nb::Error::WouldBlock)`: the transport ran dry first; partial
    ///   frames are kept for the next call
    /// - `Err(nb::Error::Other(GimbalError::Read(_)))`: the transport failed
    pub fn poll(&mut self) -> nb::Result<Attitude, GimbalError<S::Error>> {
        loop {
            if let Some(attitude) = self.poll_byte()? {
                return Ok(attitude);
            }
        }
    }

    /// Drops any partially received frame, e.g. after the transport reconnects.
    pub fn reset_parser(&mut self) {
        self.parser.reset();
    }

    /// Current counters and last values.
    pub fn status(&self) -> GimbalStatus {
        GimbalStatus {
            last_command: self.last_command,
            last_attitude: self.last_attitude,
            frames_sent: self.tx_good,
            frames_received: self.rx_good,
            crc_errors: self.parser.crc_error_count(),
        }
    }
}
