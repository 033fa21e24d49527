//! # gimbal-serial
//!
//! A portable, no_std Rust codec and driver for 3-axis gimbal controllers attached
//! over a byte-oriented serial link.
//!
//! The link exchanges fixed-length binary frames:
//! - outbound: `[start][x: f32][y: f32][z: f32][crc]`, a 3-axis command (14 bytes)
//! - inbound: `[start][roll: f32][pitch: f32][yaw: f32][crc]`, an attitude readback
//!
//! using:
//! - CRC-8/CCITT (poly `0x07`, init `0x00`) over start byte and payload
//! - a byte-at-a-time decoder that resynchronizes after corruption
//! - `embedded-hal-nb` serial traits for the transport
//! - interrupt-safe driver access with `critical-section`
//!
//! ## Crate features
//! | Feature            | Description |
//! |--------------------|-------------|
//! | `std`              | Disables `#![no_std]` support and enables `std` in `thiserror`, `log` and `critical-section` |
//! | `poll-loop`        | Blocking receive loop driven by `embedded_hal::delay::DelayNs` |
//! | `rx-isr` (default) | Global driver shared with a receive interrupt via `critical_section::with` |
//! | `defmt-0-3`        | Uses `defmt` logging |
//! | `log`              | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust
//! use gimbal_serial::encoding::encode_command;
//! use gimbal_serial::parser::FrameParser;
//!
//! let frame = encode_command(0.0, 10.0, -45.0);
//! assert_eq!(frame.len(), 14);
//!
//! let mut parser = FrameParser::new();
//! let mut attitude = None;
//! for byte in frame {
//!     attitude = attitude.or(parser.feed_attitude(byte));
//! }
//! assert_eq!(attitude.map(|a| a.yaw), Some(-45.0));
//! ```
//!
//! With a transport, use [`driver::GimbalSerializer`]:
//!
//! ```rust,ignore
//! let mut gimbal = GimbalSerializer::new(uart, LinkConfig::default());
//! gimbal.send_command(Command::new(0.0, 10.0, -45.0))?;
//! if let Ok(attitude) = gimbal.poll() {
//!     // ...
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - Floats travel in native byte order; host and firmware must agree
//! - The decoder has no timeout. Call `reset` on reconnect to drop a stale partial frame
//! - Only one receive path may feed a given decoder
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "rx-isr")]
pub use critical_section;

pub mod config;
pub mod consts;
pub mod crc;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod link;
pub mod parser;
