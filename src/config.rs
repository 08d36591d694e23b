//! Compile-time configuration.
//!
//! This firmware has no runtime configuration by design: pin
//! assignments and protocol timing constants are fixed at build time.

/// GPIO driving the PS/2 clock line. DATA must be [`PS2_DATA_PIN`],
/// i.e. `PS2_CLK_PIN + 1`.
pub const PS2_CLK_PIN: u8 = 0;
/// GPIO driving the PS/2 data line. Must be `PS2_CLK_PIN + 1`.
pub const PS2_DATA_PIN: u8 = 1;

/// GPIO driving the on-board status NeoPixel.
pub const STATUS_LED_PIN: u8 = 16;

/// Minimum host CLK-low inhibit duration before a host-to-device send
/// (the protocol requires >= 100 us; 120 us gives margin).
pub const HOST_INHIBIT_US: u32 = 120;

/// Per-wait timeout inside a host-to-device byte transmit. A wait that
/// exceeds this fails the whole send.
pub const HOST_BIT_TIMEOUT_US: u32 = 10_000;

/// Delay between the two bytes of a two-byte host-to-device command.
pub const HOST_INTERBYTE_DELAY_MS: u64 = 5;

/// Timeout waiting for the device's logical `0xFA` ACK after a
/// physically-acknowledged byte.
pub const HOST_ACK_TIMEOUT_MS: u64 = 200;

/// Settle time after releasing the lines before the PIO sampler is
/// reactivated.
pub const LINE_SETTLE_US: u32 = 50;

/// Read-loop FIFO poll interval.
pub const READ_LOOP_POLL_MS: u64 = 1;

/// Supervisor liveness-check interval.
pub const SUPERVISOR_INTERVAL_MS: u64 = 1_000;

/// Hardware watchdog timeout. Must be comfortably larger than
/// [`SUPERVISOR_INTERVAL_MS`] so a single slow-but-alive tick doesn't
/// trip a reset.
pub const SUPERVISOR_WATCHDOG_MS: u64 = 2_500;

/// USB HID interrupt-in endpoint poll interval advertised in the
/// descriptor.
pub const USB_HID_POLL_MS: u8 = 10;

/// How long a `PS2_ERR` status persists before auto-clearing to
/// `READY`, absent further errors.
pub const PS2_ERR_CLEAR_MS: u64 = 1_000;

/// How long the `READY` LED stays "bright" after the last key activity.
pub const ACTIVITY_FLASH_MS: u64 = 100;

/// USB device identity. `0x16c0`/`0x27dd` is the shared pid.codes
/// Generic HID VID/PID range used by hobbyist HID devices.
pub const USB_VID: u16 = 0x16c0;
pub const USB_PID: u16 = 0x27dd;
pub const USB_MANUFACTURER: &str = "diy-hid";
pub const USB_PRODUCT: &str = "PS/2 to USB HID Bridge";
pub const USB_SERIAL: &str = "PS2USB-0001";
