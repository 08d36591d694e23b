//! Hardware-facing glue: PIO line sampling, the bit-banged
//! host-to-device sender, USB HID wiring, the status LED driver, and
//! the watchdog supervisor. Everything here is feature-gated behind
//! `embedded` and depends on `embassy-rp`; the protocol/translation
//! core in the crate root has no hardware dependency at all.

pub mod led;
pub mod pio_sampler;
pub mod sender;
pub mod status_cell;
pub mod supervisor;
pub mod usb;
