use crate::driver::GimbalSerializer;
use crate::encoding::Attitude;
use crate::error::GimbalError;
use embedded_hal::delay::DelayNs;
use embedded_hal_nb::serial::{Read, Write};

/// Runs a blocking loop that drains the transport into the gimbal driver.
///
/// For firmware without a receive interrupt. Each completed attitude is
/// handed to `on_attitude`; whenever the transport has nothing to read the
/// loop sleeps for `poll_us`.
///
/// # Arguments
/// - `gimbal`: A mutable reference to a `GimbalSerializer` instance.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `poll_us`: Sleep between empty polls, in microseconds. Keep it well under
///   the transport's receive buffer fill time; see
///   [`byte_time_us`](crate::link::byte_time_us).
/// - `on_attitude`: Called with every valid attitude frame.
///
/// # Returns
/// Only when the transport reports a read error, which is handed back.
///
/// # Example
/// ```rust,ignore
/// let err = run_rx_poll_loop(&mut gimbal, &mut delay, byte_time_us(115_200), |attitude| {
///     publish(attitude);
/// });
/// ```
pub fn run_rx_poll_loop<D, S, F>(
    gimbal: &mut GimbalSerializer<S>,
    delay: &mut D,
    poll_us: u32,
    mut on_attitude: F,
) -> GimbalError<S::Error>
where
    D: DelayNs,
    S: Read<u8> + Write<u8>,
    F: FnMut(Attitude),
{
    loop {
        match gimbal.poll() {
            Ok(attitude) => on_attitude(attitude),
            Err(nb::Error::WouldBlock) => delay.delay_us(poll_us),
            Err(nb::Error::Other(e)) => return e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkConfig;
    use crate::encoding::encode_command;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::serial::{Mock as SerialMock, Transaction as SerialTransaction};
    use embedded_hal_nb::serial::ErrorKind;

    #[test]
    fn test_loop_delivers_attitudes_until_read_error() {
        let first = encode_command(1.0, 2.0, 3.0);
        let second = encode_command(-1.0, -2.0, -3.0);
        let serial = SerialMock::new(&[
            SerialTransaction::read_many(first),
            SerialTransaction::read_error(nb::Error::WouldBlock),
            SerialTransaction::read_many(&second[..8]),
            SerialTransaction::read_error(nb::Error::WouldBlock),
            SerialTransaction::read_many(&second[8..]),
            SerialTransaction::read_error(nb::Error::Other(ErrorKind::Noise)),
        ]);
        let mut gimbal = GimbalSerializer::new(serial, LinkConfig::default());
        let mut delay = NoopDelay::new();

        let mut received = Vec::new();
        let err = run_rx_poll_loop(&mut gimbal, &mut delay, 87, |attitude| {
            received.push(attitude)
        });

        assert_eq!(err, GimbalError::Read(ErrorKind::Noise));
        assert_eq!(
            received,
            vec![
                Attitude {
                    roll: 1.0,
                    pitch: 2.0,
                    yaw: 3.0
                },
                Attitude {
                    roll: -1.0,
                    pitch: -2.0,
                    yaw: -3.0
                },
            ]
        );
        assert_eq!(gimbal.status().frames_received, 2);
        gimbal.serial.done();
    }
}
