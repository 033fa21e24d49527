//! Scheduling helpers for driving a gimbal link.
//!
//! Two ways to keep bytes flowing into a [`GimbalSerializer`](crate::driver::GimbalSerializer):
//! a receive interrupt that shares one global driver with the main loop through
//! `critical_section::with` (`rx-isr` feature), or a blocking loop that polls the
//! transport and sleeps between polls (`poll-loop` feature).
//!
//! Contains:
//! - `byte_time_us` / `frame_time_us`: wire time on an 8N1 link, for sizing poll intervals
//! - `run_rx_poll_loop`: blocking receive loop for `DelayNs` (feature `poll-loop`)
//! - `global_gimbal_*` and `init_gimbal_link!()` / `setup_gimbal_link!()` /
//!   `rx_gimbal_byte!()`: interrupt-shared driver access (feature `rx-isr`)
//!
//! Wire time of one 14-byte frame:
//!
//! | Baud rate | Byte time | Frame time |
//! |-----------|-----------|------------|
//! |    57 600 |    174 µs |    2431 µs |
//! |   115 200 |     87 µs |    1216 µs |
//! |   921 600 |     11 µs |     152 µs |

#[cfg(feature = "poll-loop")]
mod poll;
#[cfg_attr(feature = "poll-loop", allow(unused_imports))]
#[cfg(feature = "poll-loop")]
pub use poll::*;

#[cfg(feature = "rx-isr")]
mod isr;
#[cfg_attr(feature = "rx-isr", allow(unused_imports))]
#[cfg(feature = "rx-isr")]
pub use isr::*;

#[cfg(feature = "rx-isr")]
mod macros;

/// Start bit, eight data bits and one stop bit.
pub const BITS_PER_BYTE_8N1: u32 = 10;

/// 1,000,000 microseconds = 1 second
pub const MICROSECONDS_PER_SECOND: u32 = 1_000_000;

/// Time to put one byte on the wire, rounded up.
///
/// # Arguments
/// - `baudrate`: link bit rate (e.g., 115200)
///
/// # Returns
/// - Microseconds per byte; `u32::MAX` for a zero baud rate
pub const fn byte_time_us(baudrate: u32) -> u32 {
    if baudrate == 0 {
        return u32::MAX;
    }
    (BITS_PER_BYTE_8N1 * MICROSECONDS_PER_SECOND).div_ceil(baudrate)
}

/// Time to put `frame_len` bytes on the wire, rounded up.
///
/// # Arguments
/// - `baudrate`: link bit rate (e.g., 115200)
/// - `frame_len`: bytes per frame (e.g., [`SERIAL_IN_MSG_LEN`](crate::consts::SERIAL_IN_MSG_LEN))
///
/// # Returns
/// - Microseconds per frame, saturating at `u32::MAX`
pub const fn frame_time_us(baudrate: u32, frame_len: usize) -> u32 {
    if baudrate == 0 {
        return u32::MAX;
    }
    let bits = BITS_PER_BYTE_8N1 as u64 * frame_len as u64 * MICROSECONDS_PER_SECOND as u64;
    let us = bits.div_ceil(baudrate as u64);
    if us > u32::MAX as u64 {
        u32::MAX
    } else {
        us as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DEFAULT_BAUDRATE, SERIAL_IN_MSG_LEN};

    #[test]
    fn test_byte_time() {
        assert_eq!(byte_time_us(DEFAULT_BAUDRATE), 87);
        assert_eq!(byte_time_us(57_600), 174);
        assert_eq!(byte_time_us(1_000_000), 10);
        assert_eq!(byte_time_us(0), u32::MAX);
    }

    #[test]
    fn test_frame_time() {
        assert_eq!(frame_time_us(DEFAULT_BAUDRATE, SERIAL_IN_MSG_LEN), 1216);
        assert_eq!(frame_time_us(57_600, SERIAL_IN_MSG_LEN), 2431);
        assert_eq!(frame_time_us(921_600, SERIAL_IN_MSG_LEN), 152);
        assert_eq!(frame_time_us(0, SERIAL_IN_MSG_LEN), u32::MAX);
    }
}
