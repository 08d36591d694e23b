//! Error types for the protocol/translation core.
//!
//! These are plain enums rather than exceptions: every fallible
//! boundary in this crate returns a `Result`.

/// A raw 22-bit PIO frame failed framing or parity validation.
///
/// Both variants are handled identically by callers: the byte is
/// silently dropped and parser state is left untouched. The
/// distinction exists only so a debug log can say which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Start bit was not 0, or stop bit was not 1.
    Framing { start: bool, stop: bool },
    /// `popcount(data) + parity` was even (should be odd).
    Parity { data: u8, parity: bool },
}

/// A host-to-device command failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum SendError {
    /// A CLK wait exceeded its timeout while transmitting a byte.
    Timeout,
    /// The device's physical ACK bit was 1 instead of 0.
    PhysicalNack,
    /// The physical byte transmitted, but no logical `0xFA` arrived
    /// via the scancode stream within the ACK timeout.
    AckTimeout,
}
