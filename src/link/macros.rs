/// Declares a static global `GIMBAL_LINK` instance protected by a `critical_section` mutex.
///
/// The static is shared between the receive interrupt and the main loop.
///
/// # Arguments
/// - `$serial`: The concrete transport type (must implement the
///   `embedded-hal-nb` serial `Read<u8>` and `Write<u8>` traits)
///
/// # Example
/// ```rust,ignore
/// init_gimbal_link!(MyUartType);
/// ```
#[macro_export]
macro_rules! init_gimbal_link {
    ( $serial:ty ) => {
        pub static GIMBAL_LINK: $crate::link::GlobalGimbal<$serial> =
            $crate::link::global_gimbal_init::<$serial>();
    };
}

/// Stores a new driver in the `GIMBAL_LINK` created by `init_gimbal_link!`.
///
/// # Arguments
/// - `$serial`: The transport value
/// - `$config`: Optional [`LinkConfig`](crate::config::LinkConfig); defaults apply when omitted
///
/// # Example
/// ```rust,ignore
/// main() {
///     setup_gimbal_link!(uart);
///     // or
///     setup_gimbal_link!(uart, LinkConfig::new("/dev/ttyS1", 57_600));
/// }
/// ```
#[macro_export]
macro_rules! setup_gimbal_link {
    ( $serial:expr ) => {
        $crate::setup_gimbal_link!($serial, $crate::config::LinkConfig::default())
    };
    ( $serial:expr, $config:expr ) => {
        $crate::link::global_gimbal_setup(&GIMBAL_LINK, $serial, $config)
    };
}

/// Feeds one received byte to `GIMBAL_LINK`, evaluating to the attitude if
/// the byte completed a valid frame.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn UART1() {
///     if let Some(attitude) = rx_gimbal_byte!(read_rx_register()) {
///         ATTITUDE_SIGNAL.signal(attitude);
///     }
/// }
/// ```
///
/// # Notes
/// - Silently does nothing until `setup_gimbal_link!` has run.
#[macro_export]
macro_rules! rx_gimbal_byte {
    ( $byte:expr ) => {
        $crate::link::global_gimbal_rx_byte(&GIMBAL_LINK, $byte)
    };
}

#[cfg(test)]
mod tests {
    use crate::encoding::{Attitude, encode_command};
    use embedded_hal_mock::eh1::serial::Mock as SerialMock;

    init_gimbal_link!(SerialMock<u8>);

    #[test]
    fn test_macros_drive_global_link() {
        assert_eq!(rx_gimbal_byte!(0xA5), None);

        setup_gimbal_link!(SerialMock::new(&[]));

        let mut received = None;
        for &b in &encode_command(6.0, 7.0, 8.0) {
            received = received.or(rx_gimbal_byte!(b));
        }
        assert_eq!(
            received,
            Some(Attitude {
                roll: 6.0,
                pitch: 7.0,
                yaw: 8.0
            })
        );

        critical_section::with(|cs| {
            if let Some(gimbal) = GIMBAL_LINK.borrow(cs).borrow_mut().as_mut() {
                gimbal.serial.done();
            }
        });
    }
}
