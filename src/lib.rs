//! PS/2-to-USB HID keyboard bridge: the protocol and translation core.
//!
//! This crate decodes a PS/2 scancode-set-2 byte stream into key
//! events and translates those events into USB HID keyboard reports.
//! It is hardware-agnostic: the PIO sampling, bit-banged host-to-device
//! transmit, USB stack, and status LED live in the `embedded` feature's
//! binary target, which links this library.
#![cfg_attr(not(test), no_std)]

pub mod config;
#[cfg(feature = "embedded")]
pub mod embedded;
pub mod error;
pub mod hid;
pub mod ps2;
pub mod status;

pub use error::{FrameError, SendError};
pub use hid::mapping::{lookup, KeyAction};
pub use hid::report::{KeyReport, ReportBuilder};
pub use ps2::frame::decode_frame;
pub use ps2::scancode::{KeyEvent, ScancodeFsm};
pub use status::Status;
