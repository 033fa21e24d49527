use crate::config::LinkConfig;
use crate::driver::{GimbalSerializer, GimbalStatus, PendingCommand};
use crate::encoding::{Attitude, Command};
use crate::error::GimbalError;
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal_nb::serial::{Read, Write};

/// A driver shared between a receive interrupt and the main loop.
pub type GlobalGimbal<S> = Mutex<RefCell<Option<GimbalSerializer<S>>>>;

/// Used to initialize the global static `GimbalSerializer` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use gimbal_serial::link::{GlobalGimbal, global_gimbal_init};
/// use some_hal::Uart1;
///
/// static GIMBAL: GlobalGimbal<Uart1> = global_gimbal_init::<Uart1>();
/// ```
pub const fn global_gimbal_init<S: Read<u8> + Write<u8>>() -> GlobalGimbal<S> {
    Mutex::new(RefCell::new(None))
}

/// Builds a driver around `serial` and stores it in the global slot,
/// replacing any previous one.
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     global_gimbal_setup(&GIMBAL, uart, LinkConfig::default());
/// }
/// ```
pub fn global_gimbal_setup<S: Read<u8> + Write<u8>>(
    global_gimbal: &'static GlobalGimbal<S>,
    serial: S,
    config: LinkConfig<'_>,
) {
    critical_section::with(|cs| {
        let _ = global_gimbal
            .borrow(cs)
            .replace(Some(GimbalSerializer::new(serial, config)));
    });
}

/// Receive callback for a byte-at-a-time UART interrupt.
///
/// Returns the attitude when `byte` completed a valid frame. Does nothing
/// before [`global_gimbal_setup`].
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn UART1() {
///     let byte = read_rx_register();
///     global_gimbal_rx_byte(&GIMBAL, byte);
/// }
/// ```
pub fn global_gimbal_rx_byte<S: Read<u8> + Write<u8>>(
    global_gimbal: &'static GlobalGimbal<S>,
    byte: u8,
) -> Option<Attitude> {
    critical_section::with(|cs| {
        global_gimbal
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .and_then(|gimbal| gimbal.rx_byte(byte))
    })
}

/// Drains the transport from an RX-ready interrupt.
///
/// Each byte is read in its own critical section, so a steady stream of noise
/// never keeps interrupts masked for longer than one transport read.
///
/// See [`GimbalSerializer::poll`].
pub fn global_gimbal_poll<S: Read<u8> + Write<u8>>(
    global_gimbal: &'static GlobalGimbal<S>,
) -> nb::Result<Attitude, GimbalError<S::Error>> {
    loop {
        let step = critical_section::with(|cs| {
            match global_gimbal.borrow(cs).borrow_mut().as_mut() {
                Some(gimbal) => gimbal.poll_byte(),
                None => Err(nb::Error::Other(GimbalError::NotSetUp)),
            }
        });
        if let Some(attitude) = step? {
            return Ok(attitude);
        }
    }
}

/// Encodes `command` with the global driver's start byte, for
/// [`global_gimbal_send_step`].
///
/// # Errors
/// [`GimbalError::NotSetUp`] before [`global_gimbal_setup`].
pub fn global_gimbal_prepare<S: Read<u8> + Write<u8>>(
    global_gimbal: &'static GlobalGimbal<S>,
    command: Command,
) -> Result<PendingCommand, GimbalError<S::Error>> {
    critical_section::with(|cs| {
        global_gimbal
            .borrow(cs)
            .borrow()
            .as_ref()
            .map(|gimbal| gimbal.prepare_command(command))
            .ok_or(GimbalError::NotSetUp)
    })
}

/// One transport call towards sending `pending`, inside a short critical
/// section. Receive interrupts run between steps.
///
/// See [`GimbalSerializer::send_step`].
pub fn global_gimbal_send_step<S: Read<u8> + Write<u8>>(
    global_gimbal: &'static GlobalGimbal<S>,
    pending: &mut PendingCommand,
) -> nb::Result<(), GimbalError<S::Error>> {
    critical_section::with(|cs| match global_gimbal.borrow(cs).borrow_mut().as_mut() {
        Some(gimbal) => gimbal.send_step(pending),
        None => Err(nb::Error::Other(GimbalError::NotSetUp)),
    })
}

/// Sends a command through the global driver.
///
/// Blocks until the frame is flushed, but only ever holds the critical
/// section for a single byte write (or the flush). `WouldBlock` retries happen
/// with interrupts enabled.
pub fn global_gimbal_send<S: Read<u8> + Write<u8>>(
    global_gimbal: &'static GlobalGimbal<S>,
    command: Command,
) -> Result<(), GimbalError<S::Error>> {
    let mut pending = global_gimbal_prepare(global_gimbal, command)?;
    nb::block!(global_gimbal_send_step(global_gimbal, &mut pending))
}

/// Snapshot of the global driver's status, if it has been set up.
pub fn global_gimbal_status<S: Read<u8> + Write<u8>>(
    global_gimbal: &'static GlobalGimbal<S>,
) -> Option<GimbalStatus> {
    critical_section::with(|cs| {
        global_gimbal
            .borrow(cs)
            .borrow()
            .as_ref()
            .map(GimbalSerializer::status)
    })
}

/// Drops any partial frame held by the global driver, e.g. on reconnect.
pub fn global_gimbal_reset<S: Read<u8> + Write<u8>>(global_gimbal: &'static GlobalGimbal<S>) {
    critical_section::with(|cs| {
        if let Some(gimbal) = global_gimbal.borrow(cs).borrow_mut().as_mut() {
            gimbal.reset_parser();
        }
    });
}
