//! Link configuration.
//!
//! `port` and `baudrate` are carried for whoever opens the serial device; the
//! codec itself only cares about the start bytes. The port name is borrowed,
//! so it can come from a runtime parameter as well as a literal. The driver
//! copies the start bytes out and does not keep the borrow.

use crate::consts::{DEFAULT_BAUDRATE, DEFAULT_PORT, SERIAL_IN_START_BYTE, SERIAL_OUT_START_BYTE};

/// Settings for one gimbal link.
///
/// # Example
/// ```rust
/// use gimbal_serial::config::LinkConfig;
///
/// let config = LinkConfig::new("/dev/ttyUSB0", 57_600);
/// assert_eq!(config.out_start_byte, gimbal_serial::consts::SERIAL_OUT_START_BYTE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct LinkConfig<'a> {
    /// Serial device the controller is attached to. Read only by the caller
    /// that opens the transport.
    pub port: &'a str,
    /// Link bit rate.
    pub baudrate: u32,
    /// Marker written at the head of every command frame.
    pub out_start_byte: u8,
    /// Marker expected at the head of every attitude frame.
    pub in_start_byte: u8,
}

impl Default for LinkConfig<'static> {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, DEFAULT_BAUDRATE)
    }
}

impl<'a> LinkConfig<'a> {
    /// A configuration for `port` at `baudrate`, with the protocol's default
    /// start bytes.
    pub const fn new(port: &'a str, baudrate: u32) -> Self {
        Self {
            port,
            baudrate,
            out_start_byte: SERIAL_OUT_START_BYTE,
            in_start_byte: SERIAL_IN_START_BYTE,
        }
    }

    /// Overrides the start bytes, for firmware that uses different markers.
    pub const fn with_start_bytes(mut self, out_start_byte: u8, in_start_byte: u8) -> Self {
        self.out_start_byte = out_start_byte;
        self.in_start_byte = in_start_byte;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.port, "/dev/gimbal");
        assert_eq!(config.baudrate, 115_200);
        assert_eq!(config.out_start_byte, SERIAL_OUT_START_BYTE);
        assert_eq!(config.in_start_byte, SERIAL_IN_START_BYTE);
    }

    #[test]
    fn test_start_byte_override() {
        let config = LinkConfig::new("/dev/ttyACM0", 921_600).with_start_bytes(0x7E, 0x7F);
        assert_eq!(config.port, "/dev/ttyACM0");
        assert_eq!(config.baudrate, 921_600);
        assert_eq!(config.out_start_byte, 0x7E);
        assert_eq!(config.in_start_byte, 0x7F);
    }

    #[test]
    fn test_port_from_runtime_parameter() {
        let index = 3;
        let port = format!("/dev/ttyUSB{index}");
        let config = LinkConfig::new(&port, DEFAULT_BAUDRATE);
        assert_eq!(config.port, "/dev/ttyUSB3");
        assert_eq!(config.baudrate, DEFAULT_BAUDRATE);
        assert_eq!(config, LinkConfig::new("/dev/ttyUSB3", 115_200));
    }
}
